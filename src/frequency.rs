//! Frequency-response evaluation over a logarithmic sweep
//!
//! Evaluates H(jw) = num(jw)/den(jw) sample by sample. Magnitude is stored
//! linear (unitless) and phase in radians as atan2(im, re), wrapped into
//! (-pi, pi] independently per sample. The stored phase is deliberately NOT
//! unwrapped across the sweep: downstream consumers receive the raw
//! per-sample values, discontinuities at wrap points included.

use num_complex::Complex64;

use crate::error::AnalysisError;
use crate::transfer_function::TransferFunction;

/// Logarithmically spaced angular-frequency grid over [w_min, w_max].
///
/// Both endpoints are included; `points` must be at least 2 and the bounds
/// strictly positive with w_min < w_max (validated by the analysis boundary).
pub fn log_grid(w_min: f64, w_max: f64, points: usize) -> Vec<f64> {
    assert!(points >= 2, "log grid needs at least 2 points");
    let lo = w_min.log10();
    let hi = w_max.log10();
    let step = (hi - lo) / (points - 1) as f64;
    (0..points).map(|i| 10f64.powf(lo + i as f64 * step)).collect()
}

/// Complex frequency response of a transfer function over an increasing
/// angular-frequency sweep.
///
/// The three arrays are index-aligned and immutable once evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyResponse {
    omega: Vec<f64>,
    magnitude: Vec<f64>,
    phase: Vec<f64>,
}

impl FrequencyResponse {
    /// Evaluate `tf` at s = jw for every w in `omega`.
    ///
    /// Fails with [`AnalysisError::DivisionBySingularity`] (reporting the
    /// offending frequency) if the denominator is exactly zero at a sample.
    pub fn evaluate(tf: &TransferFunction, omega: &[f64]) -> Result<Self, AnalysisError> {
        let mut magnitude = Vec::with_capacity(omega.len());
        let mut phase = Vec::with_capacity(omega.len());

        for &w in omega {
            let s = Complex64::new(0.0, w);
            let den = tf.den().eval_complex(s);
            if den.norm() == 0.0 {
                return Err(AnalysisError::DivisionBySingularity { omega: w });
            }
            let response = tf.num().eval_complex(s) / den;
            magnitude.push(response.norm());
            phase.push(response.arg());
        }

        Ok(Self {
            omega: omega.to_vec(),
            magnitude,
            phase,
        })
    }

    pub fn len(&self) -> usize {
        self.omega.len()
    }

    pub fn is_empty(&self) -> bool {
        self.omega.is_empty()
    }

    /// Angular frequencies in rad/s, strictly increasing.
    pub fn omega(&self) -> &[f64] {
        &self.omega
    }

    /// Linear (unitless) magnitude per sample.
    pub fn magnitude(&self) -> &[f64] {
        &self.magnitude
    }

    /// Phase in radians, wrapped per sample into (-pi, pi].
    pub fn phase(&self) -> &[f64] {
        &self.phase
    }

    /// Magnitude converted to decibels: 20*log10(|H|).
    pub fn magnitude_db(&self) -> Vec<f64> {
        self.magnitude.iter().map(|&m| 20.0 * m.log10()).collect()
    }

    /// Phase converted to degrees, still wrapped per sample.
    pub fn phase_deg(&self) -> Vec<f64> {
        self.phase.iter().map(|&p| p.to_degrees()).collect()
    }
}
