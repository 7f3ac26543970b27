//! pidscope - classical linear-control analysis for SISO PID loops
//!
//! Given a continuous-time plant and filtered-derivative PID gains, pidscope
//! builds the open- and closed-loop transfer functions, evaluates the
//! frequency response, computes classical stability margins and pole-based
//! stability, simulates the closed-loop unit-step response, and extracts the
//! standard time-domain performance metrics.
//!
//! # Architecture
//!
//! The crate is a pure numeric core with no I/O:
//! - [`Polynomial`] and [`TransferFunction`] carry the rational-function
//!   algebra (cascade, feedback, DC gain);
//! - [`filtered_pid`] synthesizes the controller from gains;
//! - [`FrequencyResponse`] and [`StabilityMargins`] cover the frequency
//!   domain, [`step_response`] and [`step_metrics`] the time domain;
//! - [`analyze`] wires the stages into one pipeline and aggregates an
//!   [`AnalysisResult`] for the hosting service.
//!
//! Every value is immutable after construction and each analysis call is a
//! pure function of its inputs, so concurrent invocations need no locking.
//!
//! # Example
//!
//! ```
//! use pidscope::{analyze, AnalysisConfig, AnalysisRequest};
//!
//! let request = AnalysisRequest {
//!     plant_num: vec![1.0],
//!     plant_den: vec![1.0, 1.0],
//!     kp: 1.0,
//!     ki: 0.5,
//!     kd: 0.1,
//!     tf_filter: 0.01,
//! };
//! let result = analyze(&request, &AnalysisConfig::default()).unwrap();
//!
//! // Integral action drives the steady-state error to zero
//! assert!(result.steady_state_error.unwrap() < 1e-9);
//! assert_eq!(result.stability, Some(pidscope::StabilityVerdict::Stable));
//! ```

pub mod analysis;
pub mod error;
pub mod frequency;
pub mod margins;
pub mod metrics;
pub mod pid;
pub mod polynomial;
pub mod stability;
pub mod step;
pub mod transfer_function;

pub use analysis::{analyze, AnalysisConfig, AnalysisRequest, AnalysisResult, BodeData};
pub use error::AnalysisError;
pub use frequency::{log_grid, FrequencyResponse};
pub use margins::StabilityMargins;
pub use metrics::{step_metrics, StepMetrics};
pub use pid::{filtered_pid, PidGains};
pub use polynomial::Polynomial;
pub use stability::{classify_closed_loop, poles, polynomial_roots, StabilityVerdict};
pub use step::{step_response, StateSpace, StepResponse};
pub use transfer_function::TransferFunction;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::analysis::{analyze, AnalysisConfig, AnalysisRequest, AnalysisResult};
    pub use crate::error::AnalysisError;
    pub use crate::frequency::{log_grid, FrequencyResponse};
    pub use crate::margins::StabilityMargins;
    pub use crate::metrics::{step_metrics, StepMetrics};
    pub use crate::pid::{filtered_pid, PidGains};
    pub use crate::polynomial::Polynomial;
    pub use crate::stability::{classify_closed_loop, StabilityVerdict};
    pub use crate::step::{step_response, StepResponse};
    pub use crate::transfer_function::TransferFunction;
}
