//! Filtered-derivative PID controller synthesis
//!
//! Builds the rational transfer function of a PID compensator whose
//! derivative term is rolled off by a first-order filter:
//!
//! ```text
//! C(s) = Kp + Ki/s + Kd*s/(Tf*s + 1)
//! ```
//!
//! Combining the three terms over the common denominator s*(Tf*s + 1) gives
//! the closed-form coefficients used below; this is an exact algebraic
//! identity, not a numeric fit.

use crate::error::AnalysisError;
use crate::transfer_function::TransferFunction;

/// Proportional, integral, and derivative gains of a PID compensator.
///
/// Negative gains are representable; whether they make sense is the caller's
/// judgment, so the analysis pipeline surfaces them as warnings rather than
/// rejecting them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    /// Names of the gain terms that are negative, in kp/ki/kd order.
    pub fn negative_terms(&self) -> Vec<&'static str> {
        let mut terms = Vec::new();
        if self.kp < 0.0 {
            terms.push("kp");
        }
        if self.ki < 0.0 {
            terms.push("ki");
        }
        if self.kd < 0.0 {
            terms.push("kd");
        }
        terms
    }
}

/// Synthesize the filtered PID transfer function.
///
/// Expanding C(s) = Kp + Ki/s + Kd*s/(Tf*s + 1) over the common denominator
/// s*(Tf*s + 1) yields exactly:
///
/// ```text
/// num = [Kp*Tf + Kd,  Kp + Ki*Tf,  Ki]      (descending powers)
/// den = [Tf,          1,           0 ]      (= Tf*s^2 + s)
/// ```
///
/// `tf_filter` must be strictly positive; Tf -> 0 approaches the ideal
/// unfiltered derivative and is numerically fragile, so callers clamp to a
/// small floor (see [`crate::analysis::TF_FILTER_FLOOR`]) instead of passing
/// zero.
pub fn filtered_pid(gains: PidGains, tf_filter: f64) -> Result<TransferFunction, AnalysisError> {
    if !(tf_filter > 0.0) || !tf_filter.is_finite() {
        return Err(AnalysisError::InvalidInput {
            what: format!(
                "derivative filter time constant must be strictly positive, got {tf_filter}"
            ),
        });
    }
    TransferFunction::from_coeffs(
        &[
            gains.kp * tf_filter + gains.kd,
            gains.kp + gains.ki * tf_filter,
            gains.ki,
        ],
        &[tf_filter, 1.0, 0.0],
    )
}
