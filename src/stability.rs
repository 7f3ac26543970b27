//! Pole computation and stability classification
//!
//! Poles are the roots of the closed-loop denominator polynomial, computed
//! as the eigenvalues of the companion matrix (the same route a general
//! polynomial root finder such as numpy's `roots` takes). Complex-conjugate
//! pairs fall out of the eigensolve naturally.
//!
//! Classification is strict: a pole with real part exactly zero counts as
//! unstable. Marginal stability is deliberately not a separate verdict.

use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::polynomial::Polynomial;
use crate::transfer_function::TransferFunction;

/// Pole-based stability verdict for a closed-loop system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StabilityVerdict {
    Stable,
    Unstable,
}

/// Roots of a real polynomial via companion-matrix eigenvalues.
///
/// Leading zero coefficients carry no root information and are stripped
/// before the companion matrix is assembled. A degree-0 polynomial has no
/// roots; the zero polynomial has no defined root set and is rejected.
pub fn polynomial_roots(p: &Polynomial) -> Result<Vec<Complex64>, AnalysisError> {
    let coeffs: Vec<f64> = p
        .coeffs()
        .iter()
        .copied()
        .skip_while(|&c| c == 0.0)
        .collect();
    if coeffs.is_empty() {
        return Err(AnalysisError::InvalidPolynomial {
            what: "the zero polynomial has no root set",
        });
    }

    let n = coeffs.len() - 1;
    if n == 0 {
        return Ok(Vec::new());
    }

    // Monic companion form: first row holds the negated normalized
    // coefficients, identity on the subdiagonal.
    let lead = coeffs[0];
    let mut companion = DMatrix::<f64>::zeros(n, n);
    for (j, &c) in coeffs[1..].iter().enumerate() {
        companion[(0, j)] = -c / lead;
    }
    for i in 1..n {
        companion[(i, i - 1)] = 1.0;
    }

    Ok(companion
        .complex_eigenvalues()
        .iter()
        .map(|e| Complex64::new(e.re, e.im))
        .collect())
}

/// Poles of a transfer function: roots of its denominator.
pub fn poles(tf: &TransferFunction) -> Result<Vec<Complex64>, AnalysisError> {
    polynomial_roots(tf.den())
}

/// Stable iff every pole has a strictly negative real part.
///
/// An empty pole set (a static system) is vacuously stable.
pub fn classify(poles: &[Complex64]) -> StabilityVerdict {
    if poles.iter().all(|p| p.re < 0.0) {
        StabilityVerdict::Stable
    } else {
        StabilityVerdict::Unstable
    }
}

/// Classify a closed-loop transfer function from its denominator roots.
pub fn classify_closed_loop(tf: &TransferFunction) -> Result<StabilityVerdict, AnalysisError> {
    Ok(classify(&poles(tf)?))
}
