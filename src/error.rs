//! Analysis error taxonomy

use thiserror::Error;

/// Errors raised by the analysis pipeline.
///
/// Every variant is a structural failure: it aborts the analysis and is
/// surfaced to the caller as a single descriptive error. Advisory conditions
/// (negative gains, unmet metric thresholds) are collected as warning strings
/// on [`crate::AnalysisResult`] instead and never abort.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Malformed or missing coefficient/gain values, caught before the
    /// numeric pipeline runs.
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    /// A polynomial that cannot represent a rational function term.
    #[error("Invalid polynomial: {what}")]
    InvalidPolynomial { what: &'static str },

    /// Closing the loop produced the zero polynomial as denominator.
    #[error("Singular feedback interconnection: closed-loop denominator vanished")]
    SingularFeedback,

    /// The transfer function has no finite value at s = 0.
    #[error("DC gain is undefined: denominator is zero at s = 0")]
    UndefinedGain,

    /// The denominator vanishes exactly at a requested frequency sample.
    #[error("Frequency response undefined: denominator vanishes at {omega} rad/s")]
    DivisionBySingularity { omega: f64 },
}
