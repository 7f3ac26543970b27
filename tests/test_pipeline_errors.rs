//! Structural error paths through the full pipeline
//!
//! Each structural failure class aborts the analysis with a single
//! descriptive error rather than a partial result.

use pidscope::{analyze, AnalysisConfig, AnalysisError, AnalysisRequest};

fn request(plant_num: &[f64], plant_den: &[f64]) -> AnalysisRequest {
    AnalysisRequest {
        plant_num: plant_num.to_vec(),
        plant_den: plant_den.to_vec(),
        kp: 1.0,
        ki: 0.0,
        kd: 0.0,
        tf_filter: 0.01,
    }
}

#[test]
fn test_singular_feedback_aborts() {
    // G = -1 under unity proportional control: 1 + L vanishes identically
    let r = request(&[-1.0], &[1.0]);
    assert!(matches!(
        analyze(&r, &AnalysisConfig::default()),
        Err(AnalysisError::SingularFeedback)
    ));
}

#[test]
fn test_undefined_dc_gain_aborts() {
    // G = -1/(s+1) closes into T = -1/s: genuine pole at the origin
    let r = request(&[-1.0], &[1.0, 1.0]);
    assert!(matches!(
        analyze(&r, &AnalysisConfig::default()),
        Err(AnalysisError::UndefinedGain)
    ));
}

#[test]
fn test_singularity_on_sweep_reports_frequency() {
    // G = 1/(s^2+1) has poles at +/-j; a sweep starting at w = 1 exactly
    // hits the singularity and must name the offending frequency.
    let config = AnalysisConfig {
        freq_min: 1.0,
        freq_max: 1e2,
        freq_samples: 5,
        ..AnalysisConfig::default()
    };
    let r = request(&[1.0], &[1.0, 0.0, 1.0]);
    match analyze(&r, &config) {
        Err(AnalysisError::DivisionBySingularity { omega }) => {
            assert!((omega - 1.0).abs() < 1e-12);
        }
        other => panic!("expected DivisionBySingularity, got {other:?}"),
    }
}

#[test]
fn test_zero_denominator_plant_rejected() {
    let r = request(&[1.0], &[0.0, 0.0]);
    assert!(matches!(
        analyze(&r, &AnalysisConfig::default()),
        Err(AnalysisError::InvalidPolynomial { .. })
    ));
}

#[test]
fn test_bad_sweep_config_rejected() {
    let config = AnalysisConfig {
        freq_min: 1.0,
        freq_max: 0.1,
        ..AnalysisConfig::default()
    };
    assert!(matches!(
        analyze(&request(&[1.0], &[1.0, 1.0]), &config),
        Err(AnalysisError::InvalidInput { .. })
    ));
}

#[test]
fn test_errors_format_descriptively() {
    let err = analyze(&request(&[-1.0], &[1.0]), &AnalysisConfig::default()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("denominator"));
}
