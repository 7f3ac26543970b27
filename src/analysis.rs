//! End-to-end closed-loop analysis pipeline
//!
//! One call wires the whole chain together: synthesize the filtered PID
//! controller, cascade it with the plant into the open loop L, close unity
//! negative feedback into T, then fan out into the independent stages:
//! frequency response and margins on L, pole classification and step
//! simulation on T, metrics on the simulated response.
//!
//! The pipeline is a pure function of its inputs: no globals, no caches, no
//! I/O. Structural failures abort with a single [`AnalysisError`]; advisory
//! conditions (negative gains, unmet metric thresholds, a diverged
//! simulation) are collected as warning strings and the remaining fields are
//! still returned. Non-finite values never cross the boundary: scalars are
//! normalized to `None`, arrays containing non-finite entries are dropped
//! whole with a warning.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::frequency::{log_grid, FrequencyResponse};
use crate::margins::StabilityMargins;
use crate::metrics::{step_metrics, StepMetrics};
use crate::pid::{filtered_pid, PidGains};
use crate::stability::{classify_closed_loop, StabilityVerdict};
use crate::step::{step_response, StepResponse};
use crate::transfer_function::TransferFunction;

/// Floor applied to the derivative filter time constant. Tf at or below
/// zero approximates an ideal derivative and destabilizes the realization,
/// so requests are clamped here instead of rejected.
pub const TF_FILTER_FLOOR: f64 = 1e-6;

/// Plant and controller description, as received from the host boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Plant numerator coefficients, descending powers of s.
    pub plant_num: Vec<f64>,
    /// Plant denominator coefficients, descending powers of s.
    pub plant_den: Vec<f64>,
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Derivative filter time constant Tf in seconds.
    pub tf_filter: f64,
}

/// Tunable knobs of the analysis pipeline.
///
/// The stability and warning stages are orthogonal and can be toggled off
/// independently; everything else always runs.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// End of the step-response time grid in seconds (starts at 0).
    pub time_horizon: f64,
    /// Number of evenly spaced samples on the time grid.
    pub time_samples: usize,
    /// Lower edge of the frequency sweep in rad/s.
    pub freq_min: f64,
    /// Upper edge of the frequency sweep in rad/s.
    pub freq_max: f64,
    /// Number of logarithmically spaced frequency samples.
    pub freq_samples: usize,
    /// Run the pole-based stability classification stage.
    pub classify_stability: bool,
    /// Collect advisory warnings (negative gains, absent metrics).
    pub collect_warnings: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            time_horizon: 10.0,
            time_samples: 1000,
            freq_min: 1e-2,
            freq_max: 1e2,
            freq_samples: 100,
            classify_stability: true,
            collect_warnings: true,
        }
    }
}

/// Open-loop Bode data: magnitude in dB and phase in degrees (wrapped per
/// sample) over the angular-frequency sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodeData {
    pub omega: Vec<f64>,
    pub magnitude_db: Vec<f64>,
    pub phase_deg: Vec<f64>,
}

/// Aggregated analysis output. Every field may be absent per the rules of
/// the producing stage; absent is always `None`, never a sentinel number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub gain_margin_db: Option<f64>,
    pub phase_margin_deg: Option<f64>,
    pub gain_crossover_freq: Option<f64>,
    pub phase_crossover_freq: Option<f64>,
    pub rise_time: Option<f64>,
    pub settling_time: Option<f64>,
    pub overshoot_percent: Option<f64>,
    pub steady_state_error: Option<f64>,
    pub stability: Option<StabilityVerdict>,
    pub step_response: Option<StepResponse>,
    pub frequency_response: Option<BodeData>,
    /// Advisory messages in pipeline order; never causes an abort.
    pub warnings: Vec<String>,
}

/// Run the full analysis for one plant/controller pair.
///
/// # Example
///
/// ```
/// use pidscope::{analyze, AnalysisConfig, AnalysisRequest};
///
/// // Unity-gain first-order plant under pure proportional control
/// let request = AnalysisRequest {
///     plant_num: vec![1.0],
///     plant_den: vec![1.0, 1.0],
///     kp: 1.0,
///     ki: 0.0,
///     kd: 0.0,
///     tf_filter: 0.01,
/// };
/// let result = analyze(&request, &AnalysisConfig::default()).unwrap();
/// assert_eq!(result.stability, Some(pidscope::StabilityVerdict::Stable));
/// // T = G/(1+G) halves the DC gain, so the unit reference misses by 0.5
/// assert!((result.steady_state_error.unwrap() - 0.5).abs() < 1e-9);
/// ```
pub fn analyze(
    request: &AnalysisRequest,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    validate(request, config)?;

    let mut warnings = Vec::new();
    let gains = PidGains::new(request.kp, request.ki, request.kd);
    if config.collect_warnings {
        for term in gains.negative_terms() {
            warnings.push(format!("{term} is negative"));
        }
    }

    let tf_filter = if request.tf_filter < TF_FILTER_FLOOR {
        warn!(
            requested = request.tf_filter,
            floor = TF_FILTER_FLOOR,
            "clamping derivative filter time constant"
        );
        if config.collect_warnings {
            warnings.push(format!(
                "derivative filter time constant clamped to {TF_FILTER_FLOOR}"
            ));
        }
        TF_FILTER_FLOOR
    } else {
        request.tf_filter
    };

    let plant = TransferFunction::from_coeffs(&request.plant_num, &request.plant_den)?;
    let controller = filtered_pid(gains, tf_filter)?;
    let open_loop = plant.cascade(&controller);
    let closed_loop = open_loop.feedback(1.0)?;
    debug!(
        open_loop_order = open_loop.den().degree(),
        closed_loop_order = closed_loop.den().degree(),
        "loop transfer functions assembled"
    );

    let omega = log_grid(config.freq_min, config.freq_max, config.freq_samples);
    let response = FrequencyResponse::evaluate(&open_loop, &omega)?;
    let margins = StabilityMargins::from_response(&response);

    let stability = if config.classify_stability {
        Some(classify_closed_loop(&closed_loop)?)
    } else {
        None
    };

    let ss = closed_loop.dc_gain()?;
    let step = step_response(&closed_loop, config.time_horizon, config.time_samples)?;

    let (step, metrics) = if step.output.iter().all(|y| y.is_finite()) {
        let metrics = step_metrics(&step, ss);
        (Some(step), metrics)
    } else {
        warn!("step response diverged to non-finite values");
        if config.collect_warnings {
            warnings.push("step response diverged to non-finite values".into());
        }
        let metrics = StepMetrics {
            steady_state_error: Some((1.0 - ss).abs()),
            ..StepMetrics::default()
        };
        (None, metrics)
    };

    if config.collect_warnings {
        for (name, value) in [
            ("rise time", metrics.rise_time),
            ("settling time", metrics.settling_time),
            ("overshoot", metrics.overshoot_percent),
        ] {
            if value.is_none() {
                warnings.push(format!("{name} unavailable within the simulated horizon"));
            }
        }
    }

    let frequency_response = bode_data(&response, &mut warnings, config.collect_warnings);

    Ok(AnalysisResult {
        gain_margin_db: finite(margins.gain_margin_db()),
        phase_margin_deg: finite(margins.phase_margin_deg),
        gain_crossover_freq: finite(margins.gain_crossover),
        phase_crossover_freq: finite(margins.phase_crossover),
        rise_time: finite(metrics.rise_time),
        settling_time: finite(metrics.settling_time),
        overshoot_percent: finite(metrics.overshoot_percent),
        steady_state_error: finite(metrics.steady_state_error),
        stability,
        step_response: step,
        frequency_response,
        warnings,
    })
}

/// Reject malformed numeric inputs before any algebra runs.
fn validate(request: &AnalysisRequest, config: &AnalysisConfig) -> Result<(), AnalysisError> {
    for (name, coeffs) in [
        ("plant numerator", &request.plant_num),
        ("plant denominator", &request.plant_den),
    ] {
        if coeffs.is_empty() {
            return Err(AnalysisError::InvalidInput {
                what: format!("{name} has no coefficients"),
            });
        }
        if coeffs.iter().any(|c| !c.is_finite()) {
            return Err(AnalysisError::InvalidInput {
                what: format!("{name} contains a non-finite coefficient"),
            });
        }
    }
    for (name, value) in [
        ("kp", request.kp),
        ("ki", request.ki),
        ("kd", request.kd),
        ("tf_filter", request.tf_filter),
    ] {
        if !value.is_finite() {
            return Err(AnalysisError::InvalidInput {
                what: format!("{name} is not finite"),
            });
        }
    }

    // The controller is biproper, so a proper plant keeps the loop
    // realizable for step simulation.
    let num_degree = effective_degree(&request.plant_num);
    let den_degree = effective_degree(&request.plant_den);
    if num_degree > den_degree {
        return Err(AnalysisError::InvalidInput {
            what: "plant is improper: numerator degree exceeds denominator degree".into(),
        });
    }

    if !(config.time_horizon > 0.0) || !config.time_horizon.is_finite() {
        return Err(AnalysisError::InvalidInput {
            what: "time horizon must be positive and finite".into(),
        });
    }
    if config.time_samples < 2 {
        return Err(AnalysisError::InvalidInput {
            what: "need at least 2 time samples".into(),
        });
    }
    if !(config.freq_min > 0.0) || !(config.freq_max > config.freq_min) {
        return Err(AnalysisError::InvalidInput {
            what: "frequency sweep bounds must satisfy 0 < min < max".into(),
        });
    }
    if config.freq_samples < 2 {
        return Err(AnalysisError::InvalidInput {
            what: "need at least 2 frequency samples".into(),
        });
    }
    Ok(())
}

/// Degree after ignoring leading zero coefficients; 0 for all-zero input.
fn effective_degree(coeffs: &[f64]) -> usize {
    let leading_zeros = coeffs.iter().take_while(|&&c| c == 0.0).count();
    coeffs.len().saturating_sub(leading_zeros + 1)
}

/// Convert the evaluated sweep to Bode arrays, dropping the whole block if
/// any entry is non-finite (a literal zero magnitude sample turns into -inf
/// in dB, which cannot be serialized downstream).
fn bode_data(
    response: &FrequencyResponse,
    warnings: &mut Vec<String>,
    collect_warnings: bool,
) -> Option<BodeData> {
    let magnitude_db = response.magnitude_db();
    let phase_deg = response.phase_deg();
    let all_finite = magnitude_db
        .iter()
        .chain(&phase_deg)
        .chain(response.omega())
        .all(|v| v.is_finite());
    if !all_finite {
        warn!("frequency response contains non-finite samples");
        if collect_warnings {
            warnings.push("frequency response contains non-finite samples".into());
        }
        return None;
    }
    Some(BodeData {
        omega: response.omega().to_vec(),
        magnitude_db,
        phase_deg,
    })
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kp: f64, ki: f64, kd: f64) -> AnalysisRequest {
        AnalysisRequest {
            plant_num: vec![1.0],
            plant_den: vec![1.0, 1.0],
            kp,
            ki,
            kd,
            tf_filter: 0.01,
        }
    }

    #[test]
    fn test_validate_rejects_empty_plant() {
        let mut r = request(1.0, 0.0, 0.0);
        r.plant_num.clear();
        assert!(matches!(
            analyze(&r, &AnalysisConfig::default()),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_nan_gain() {
        let r = request(f64::NAN, 0.0, 0.0);
        assert!(matches!(
            analyze(&r, &AnalysisConfig::default()),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_improper_plant() {
        let mut r = request(1.0, 0.0, 0.0);
        r.plant_num = vec![1.0, 0.0, 0.0];
        r.plant_den = vec![1.0, 1.0];
        assert!(matches!(
            analyze(&r, &AnalysisConfig::default()),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_leading_zeros_do_not_make_plant_improper() {
        let mut r = request(1.0, 0.0, 0.0);
        r.plant_num = vec![0.0, 0.0, 1.0];
        r.plant_den = vec![1.0, 1.0];
        assert!(analyze(&r, &AnalysisConfig::default()).is_ok());
    }

    #[test]
    fn test_tf_filter_clamped_with_warning() {
        let mut r = request(1.0, 0.5, 0.1);
        r.tf_filter = 0.0;
        let result = analyze(&r, &AnalysisConfig::default()).unwrap();
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("clamped")));
    }

    #[test]
    fn test_negative_gains_warn_once_each() {
        let result = analyze(&request(-1.0, -0.5, -0.1), &AnalysisConfig::default()).unwrap();
        for term in ["kp", "ki", "kd"] {
            let count = result
                .warnings
                .iter()
                .filter(|w| w.starts_with(term))
                .count();
            assert_eq!(count, 1, "expected exactly one warning for {term}");
        }
    }

    #[test]
    fn test_stages_toggle_off() {
        let config = AnalysisConfig {
            classify_stability: false,
            collect_warnings: false,
            ..AnalysisConfig::default()
        };
        let result = analyze(&request(-2.0, 0.0, 0.0), &config).unwrap();
        assert!(result.stability.is_none());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_effective_degree() {
        assert_eq!(effective_degree(&[1.0, 2.0, 3.0]), 2);
        assert_eq!(effective_degree(&[0.0, 1.0, 2.0]), 1);
        assert_eq!(effective_degree(&[0.0, 0.0, 0.0]), 0);
    }
}
