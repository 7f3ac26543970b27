//! Step-response simulation via state-space realization
//!
//! A proper transfer function H(s) = B(s)/A(s) is realized in observable
//! canonical form (matching scipy.signal's tf-to-ss conversion):
//!
//! ```text
//! A = [-a_{n-1}  -a_{n-2}  ...  -a_1  -a_0 ]      B = [1]
//!     [   1         0      ...   0     0   ]          [0]
//!     [   0         1      ...   0     0   ]          [.]
//!     [   .         .      .     .     .   ]          [0]
//!     [   0         0      ...   1     0   ]
//!
//! C = strictly proper numerator coefficients,  D = b_n (when degrees match)
//! ```
//!
//! after normalizing the denominator to monic form. The unit-step response
//! is then integrated with fixed-step RK4 between consecutive grid points;
//! the input is constant, so the four stages share u = 1.
//!
//! References:
//! - Ogata, K. (2010). Modern Control Engineering (5th ed.). Section 5.6
//! - Chen, C.T. (1999). Linear System Theory and Design (3rd ed.). Section 5.5

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::transfer_function::TransferFunction;

/// Minimal SISO state-space system dx/dt = Ax + Bu, y = Cx + Du.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace {
    a: DMatrix<f64>,
    b: DVector<f64>,
    c: DVector<f64>,
    d: f64,
}

impl StateSpace {
    /// Realize a proper transfer function in observable canonical form.
    ///
    /// Leading zero coefficients are stripped from both polynomials first;
    /// an improper function (effective numerator degree above denominator
    /// degree) cannot be realized and is rejected as invalid input.
    pub fn from_transfer_function(tf: &TransferFunction) -> Result<Self, AnalysisError> {
        let den: Vec<f64> = tf
            .den()
            .coeffs()
            .iter()
            .copied()
            .skip_while(|&c| c == 0.0)
            .collect();
        if den.is_empty() {
            return Err(AnalysisError::InvalidPolynomial {
                what: "denominator is the zero polynomial",
            });
        }
        let mut num: Vec<f64> = tf
            .num()
            .coeffs()
            .iter()
            .copied()
            .skip_while(|&c| c == 0.0)
            .collect();
        if num.is_empty() {
            num.push(0.0);
        }
        if num.len() > den.len() {
            return Err(AnalysisError::InvalidInput {
                what: "improper transfer function: numerator degree exceeds denominator degree"
                    .into(),
            });
        }

        // Normalize to a monic denominator and pad the numerator to the same
        // length so the direct feedthrough falls out of the leading slot.
        let lead = den[0];
        let den_norm: Vec<f64> = den.iter().map(|&c| c / lead).collect();
        let mut num_norm: Vec<f64> = num.iter().map(|&c| c / lead).collect();
        while num_norm.len() < den_norm.len() {
            num_norm.insert(0, 0.0);
        }

        let n = den_norm.len() - 1;
        let d_value = num_norm[0];

        // Strictly proper part: num - D*den, leading entry vanishes.
        let mut a = DMatrix::zeros(n, n);
        let mut b = DVector::zeros(n);
        let mut c = DVector::zeros(n);
        for j in 0..n {
            a[(0, j)] = -den_norm[j + 1];
            c[j] = num_norm[j + 1] - d_value * den_norm[j + 1];
        }
        for i in 1..n {
            a[(i, i - 1)] = 1.0;
        }
        if n > 0 {
            b[0] = 1.0;
        }

        Ok(Self { a, b, c, d: d_value })
    }

    /// Number of states (the system order).
    pub fn order(&self) -> usize {
        self.a.nrows()
    }

    /// True when the D term is nonzero (direct input-to-output feedthrough).
    pub fn has_feedthrough(&self) -> bool {
        self.d != 0.0
    }

    fn derivative(&self, x: &DVector<f64>, u: f64) -> DVector<f64> {
        &self.a * x + &self.b * u
    }

    fn output(&self, x: &DVector<f64>, u: f64) -> f64 {
        self.c.dot(x) + self.d * u
    }
}

/// Simulated step response: index-aligned time and output arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResponse {
    /// Sample times in seconds, starting at 0, strictly increasing.
    pub time: Vec<f64>,
    /// System output at each sample time.
    pub output: Vec<f64>,
}

/// Unit-step response over `samples` evenly spaced points on [0, horizon].
///
/// The state starts at zero and one RK4 step is taken per grid interval.
/// For a stable system the terminal value approaches the transfer function's
/// DC gain; modes much faster than the grid spacing or much slower than the
/// horizon are integrated as-is, without any silent truncation or horizon
/// adaptation.
pub fn step_response(
    tf: &TransferFunction,
    horizon: f64,
    samples: usize,
) -> Result<StepResponse, AnalysisError> {
    if !(horizon > 0.0) || !horizon.is_finite() {
        return Err(AnalysisError::InvalidInput {
            what: format!("simulation horizon must be positive and finite, got {horizon}"),
        });
    }
    if samples < 2 {
        return Err(AnalysisError::InvalidInput {
            what: format!("need at least 2 time samples, got {samples}"),
        });
    }

    let system = StateSpace::from_transfer_function(tf)?;
    let dt = horizon / (samples - 1) as f64;
    let u = 1.0;

    let mut x = DVector::zeros(system.order());
    let mut time = Vec::with_capacity(samples);
    let mut output = Vec::with_capacity(samples);
    time.push(0.0);
    output.push(system.output(&x, u));

    for k in 1..samples {
        x = rk4_step(&system, &x, u, dt);
        time.push(k as f64 * dt);
        output.push(system.output(&x, u));
    }

    Ok(StepResponse { time, output })
}

/// One classical RK4 step of dx/dt = Ax + Bu with constant input.
fn rk4_step(system: &StateSpace, x: &DVector<f64>, u: f64, dt: f64) -> DVector<f64> {
    let k1 = system.derivative(x, u);
    let k2 = system.derivative(&(x + &k1 * (0.5 * dt)), u);
    let k3 = system.derivative(&(x + &k2 * (0.5 * dt)), u);
    let k4 = system.derivative(&(x + &k3 * dt), u);
    x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
}
