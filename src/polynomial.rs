//! Polynomial arithmetic for rational transfer functions
//!
//! Coefficients are stored in **descending powers** of s:
//! `[c_n, c_{n-1}, ..., c_1, c_0]` represents
//! `c_n*s^n + c_{n-1}*s^{n-1} + ... + c_0`.
//!
//! Polynomials are immutable: every operation returns a new value and never
//! normalizes away zero coefficients, so the degree a caller constructed is
//! the degree that flows through the algebra.

use num_complex::Complex64;

use crate::error::AnalysisError;

/// Real polynomial in one variable, coefficients in descending powers.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Create a polynomial from coefficients in descending powers.
    ///
    /// An empty coefficient sequence has no defined degree and is rejected.
    pub fn new(coeffs: impl Into<Vec<f64>>) -> Result<Self, AnalysisError> {
        let coeffs = coeffs.into();
        if coeffs.is_empty() {
            return Err(AnalysisError::InvalidPolynomial {
                what: "empty coefficient sequence",
            });
        }
        Ok(Self { coeffs })
    }

    /// Coefficients in descending powers.
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// Degree = number of coefficients minus one.
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// True when every coefficient is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|&c| c == 0.0)
    }

    /// Constant term c_0 (the value at s = 0).
    pub fn constant_term(&self) -> f64 {
        self.coeffs.last().copied().unwrap_or(0.0)
    }

    /// Sum of two polynomials.
    ///
    /// The shorter coefficient sequence is padded with leading zeros so the
    /// constant terms line up; the result keeps the longer length.
    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let n = self.coeffs.len().max(other.coeffs.len());
        let mut out = vec![0.0; n];
        for (i, &c) in self.coeffs.iter().enumerate() {
            out[n - self.coeffs.len() + i] += c;
        }
        for (i, &c) in other.coeffs.iter().enumerate() {
            out[n - other.coeffs.len() + i] += c;
        }
        Polynomial { coeffs: out }
    }

    /// Product of two polynomials: discrete convolution of the coefficient
    /// sequences, result length = len(p) + len(q) - 1.
    pub fn mul(&self, other: &Polynomial) -> Polynomial {
        let mut out = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in other.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Polynomial { coeffs: out }
    }

    /// Polynomial scaled by a real constant.
    pub fn scale(&self, k: f64) -> Polynomial {
        Polynomial {
            coeffs: self.coeffs.iter().map(|&c| k * c).collect(),
        }
    }

    /// Evaluate at a real point using Horner's rule.
    pub fn eval(&self, s: f64) -> f64 {
        self.coeffs.iter().fold(0.0, |acc, &c| acc * s + c)
    }

    /// Evaluate at a complex point using Horner's rule.
    ///
    /// Used for s = jω sweeps; powers of j cycle through 1, j, -1, -j via
    /// ordinary complex multiplication.
    pub fn eval_complex(&self, s: Complex64) -> Complex64 {
        self.coeffs
            .iter()
            .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * s + c)
    }

    /// Number of trailing coefficients that are exactly 0.0, capped so at
    /// least the constant-term slot remains.
    ///
    /// k trailing zeros mean the polynomial carries an exact s^k factor.
    pub(crate) fn trailing_zeros(&self) -> usize {
        self.coeffs
            .iter()
            .rev()
            .take_while(|&&c| c == 0.0)
            .count()
            .min(self.coeffs.len() - 1)
    }

    /// Divide by s^k by dropping k trailing zero coefficients.
    ///
    /// Caller must ensure k <= trailing_zeros(); only exact zeros are dropped.
    pub(crate) fn shift_down(&self, k: usize) -> Polynomial {
        debug_assert!(k <= self.trailing_zeros());
        Polynomial {
            coeffs: self.coeffs[..self.coeffs.len() - k].to_vec(),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn mul_is_commutative_with_convolution_length(
            a in prop::collection::vec(-10.0_f64..10.0, 1..7),
            b in prop::collection::vec(-10.0_f64..10.0, 1..7),
        ) {
            let p = Polynomial::new(a).unwrap();
            let q = Polynomial::new(b).unwrap();
            let pq = p.mul(&q);
            let qp = q.mul(&p);

            prop_assert_eq!(
                pq.coeffs().len(),
                p.coeffs().len() + q.coeffs().len() - 1
            );
            for (x, y) in pq.coeffs().iter().zip(qp.coeffs()) {
                let scale = x.abs().max(y.abs()).max(1.0);
                prop_assert!((x - y).abs() <= 1e-9 * scale);
            }
        }
    }
}
