//! Rational transfer functions in the Laplace domain
//!
//! A transfer function is a numerator/denominator polynomial pair:
//!   H(s) = B(s) / A(s) = (b_n s^n + ... + b_0) / (a_m s^m + ... + a_0)
//!
//! with both polynomials in descending powers of s. Instances are immutable;
//! the algebra (series cascade, feedback closure) always returns new values.
//!
//! References:
//! - Ogata, K. (2010). Modern Control Engineering (5th ed.). Chapter 2
//! - Franklin, Powell & Emami-Naeini (2015). Feedback Control of Dynamic
//!   Systems (7th ed.). Section 3.1

use crate::error::AnalysisError;
use crate::polynomial::Polynomial;

/// Continuous-time SISO transfer function H(s) = num(s)/den(s).
///
/// Invariant: the denominator is never the zero polynomial.
///
/// # Example
///
/// ```
/// use pidscope::TransferFunction;
///
/// // G(s) = 1/(s + 1)
/// let g = TransferFunction::from_coeffs(&[1.0], &[1.0, 1.0]).unwrap();
/// // Unity negative feedback: T(s) = G/(1 + G) = 1/(s + 2)
/// let t = g.feedback(1.0).unwrap();
/// assert_eq!(t.den().coeffs(), &[1.0, 2.0]);
/// assert_eq!(t.dc_gain().unwrap(), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    num: Polynomial,
    den: Polynomial,
}

impl TransferFunction {
    /// Build a transfer function from a numerator/denominator pair.
    pub fn new(num: Polynomial, den: Polynomial) -> Result<Self, AnalysisError> {
        if den.is_zero() {
            return Err(AnalysisError::InvalidPolynomial {
                what: "denominator is the zero polynomial",
            });
        }
        Ok(Self { num, den })
    }

    /// Build a transfer function directly from coefficient slices in
    /// descending powers of s.
    pub fn from_coeffs(num: &[f64], den: &[f64]) -> Result<Self, AnalysisError> {
        Self::new(Polynomial::new(num)?, Polynomial::new(den)?)
    }

    /// Numerator polynomial.
    pub fn num(&self) -> &Polynomial {
        &self.num
    }

    /// Denominator polynomial.
    pub fn den(&self) -> &Polynomial {
        &self.den
    }

    /// Series (cascade) connection: (self * other)(s).
    ///
    /// Numerators and denominators multiply independently; no cancellation
    /// is attempted.
    pub fn cascade(&self, other: &TransferFunction) -> TransferFunction {
        TransferFunction {
            num: self.num.mul(&other.num),
            den: self.den.mul(&other.den),
        }
    }

    /// Close a negative feedback loop around this open-loop function:
    ///
    /// ```text
    /// T(s) = L(s) / (1 + gain * L(s))
    /// ```
    ///
    /// With L = num/den this is num / (den + gain*num), using the same
    /// degree-alignment rule as polynomial addition.
    ///
    /// An exact s^k factor shared by the resulting numerator and denominator
    /// (literal trailing 0.0 coefficients on both, produced structurally when
    /// the integral gain is zero) is cancelled so that the closed loop's DC
    /// behavior and pole set reflect the reduced form. Only exact zeros are
    /// cancelled; no tolerance is applied and no significant term is dropped.
    pub fn feedback(&self, gain: f64) -> Result<TransferFunction, AnalysisError> {
        let den = self.den.add(&self.num.scale(gain));
        if den.is_zero() {
            return Err(AnalysisError::SingularFeedback);
        }
        let closed = TransferFunction {
            num: self.num.clone(),
            den,
        };
        Ok(closed.cancel_shared_s_factor())
    }

    /// Steady-state (DC) gain: the value of H(s) as s -> 0.
    ///
    /// Evaluated as num(0)/den(0) after cancelling an exact shared s^k
    /// factor, which is the limit of the unreduced form. Fails with
    /// [`AnalysisError::UndefinedGain`] when the reduced denominator is still
    /// zero at s = 0 (a genuine pole at the origin).
    pub fn dc_gain(&self) -> Result<f64, AnalysisError> {
        let k = self.num.trailing_zeros().min(self.den.trailing_zeros());
        let n0 = self.num.shift_down(k).constant_term();
        let d0 = self.den.shift_down(k).constant_term();
        if d0 == 0.0 {
            return Err(AnalysisError::UndefinedGain);
        }
        Ok(n0 / d0)
    }

    /// Drop an exact s^k factor common to numerator and denominator.
    fn cancel_shared_s_factor(self) -> TransferFunction {
        let k = self.num.trailing_zeros().min(self.den.trailing_zeros());
        if k == 0 {
            return self;
        }
        TransferFunction {
            num: self.num.shift_down(k),
            den: self.den.shift_down(k),
        }
    }
}
