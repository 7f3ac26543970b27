//! Gain and phase margins from a sampled frequency response
//!
//! Classical single-loop margins, read off the open-loop sweep:
//!
//! - the **gain crossover** is the first frequency (scanning upward) where
//!   |L(jw)| crosses unity; the phase margin is 180 deg plus the phase there;
//! - the **phase crossover** is the first frequency where the phase crosses
//!   -180 deg; the gain margin is the reciprocal of |L| there.
//!
//! Crossings are bracketed between adjacent samples and refined by linear
//! interpolation. A margin with no crossover in the sweep is reported as
//! absent, never as a sentinel value.
//!
//! References:
//! - Franklin, Powell & Emami-Naeini (2015). Feedback Control of Dynamic
//!   Systems (7th ed.). Section 6.4

use crate::frequency::FrequencyResponse;

/// Stability margins of an open-loop frequency response.
///
/// Each field is independent: any subset may be absent depending on which
/// crossovers exist inside the evaluated sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StabilityMargins {
    /// Gain margin as a linear ratio (1/|L| at the phase crossover).
    pub gain_margin: Option<f64>,
    /// Phase margin in degrees (180 + phase at the gain crossover).
    pub phase_margin_deg: Option<f64>,
    /// Gain crossover frequency in rad/s (|L| = 1 here).
    pub gain_crossover: Option<f64>,
    /// Phase crossover frequency in rad/s (phase = -180 deg here).
    pub phase_crossover: Option<f64>,
}

impl StabilityMargins {
    /// Scan a frequency response for the first gain and phase crossovers.
    pub fn from_response(resp: &FrequencyResponse) -> Self {
        let omega = resp.omega();
        let mag = resp.magnitude();
        let phase_deg = resp.phase_deg();

        let mut margins = StabilityMargins::default();

        // Gain crossover: first sign change of |L| - 1.
        for i in 1..mag.len() {
            let e0 = mag[i - 1] - 1.0;
            let e1 = mag[i] - 1.0;
            if e0 * e1 <= 0.0 {
                let t = interp_fraction(e0, e1);
                let w = lerp(omega[i - 1], omega[i], t);
                let ph = lerp(phase_deg[i - 1], phase_deg[i], t);
                margins.gain_crossover = Some(w);
                margins.phase_margin_deg = Some(180.0 + ph);
                break;
            }
        }

        // Phase crossover: first crossing of -180 deg. The stored phase is
        // wrapped into (-180, 180], so the offset (phase + 180) is reduced to
        // the same branch before the sign test; a genuine crossing shows a
        // small-magnitude sign change there, while the wrap discontinuity at
        // phase = 0 shows a jump of ~360 and is skipped.
        let offset: Vec<f64> = phase_deg.iter().map(|&p| wrap_deg(p + 180.0)).collect();
        for i in 1..offset.len() {
            let d0 = offset[i - 1];
            let d1 = offset[i];
            if d0 * d1 <= 0.0 && (d0 - d1).abs() <= 180.0 {
                let t = interp_fraction(d0, d1);
                let w = lerp(omega[i - 1], omega[i], t);
                let m = lerp(mag[i - 1], mag[i], t);
                margins.phase_crossover = Some(w);
                if m > 0.0 {
                    margins.gain_margin = Some(1.0 / m);
                }
                break;
            }
        }

        margins
    }

    /// Gain margin in decibels, defined only when the linear margin is
    /// positive: 20*log10(gm).
    pub fn gain_margin_db(&self) -> Option<f64> {
        self.gain_margin
            .filter(|&gm| gm > 0.0)
            .map(|gm| 20.0 * gm.log10())
    }
}

/// Fraction of the way from the left sample to the zero of the line through
/// (0, a) and (1, b).
fn interp_fraction(a: f64, b: f64) -> f64 {
    if a == b {
        0.0
    } else {
        a / (a - b)
    }
}

fn lerp(x0: f64, x1: f64, t: f64) -> f64 {
    x0 + t * (x1 - x0)
}

/// Reduce an angle in degrees to the (-180, 180] branch.
fn wrap_deg(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{log_grid, FrequencyResponse};
    use crate::transfer_function::TransferFunction;
    use approx::assert_relative_eq;

    #[test]
    fn test_integrator_has_gain_crossover_only() {
        // L = 1/s: |L| = 1/w crosses unity at w = 1, phase is -90 deg
        // everywhere, so there is no phase crossover.
        let l = TransferFunction::from_coeffs(&[1.0], &[1.0, 0.0]).unwrap();
        let resp = FrequencyResponse::evaluate(&l, &log_grid(1e-2, 1e2, 200)).unwrap();
        let m = StabilityMargins::from_response(&resp);

        let wcp = m.gain_crossover.unwrap();
        assert_relative_eq!(wcp, 1.0, epsilon = 5e-3);
        assert_relative_eq!(m.phase_margin_deg.unwrap(), 90.0, epsilon = 1e-6);
        assert!(m.phase_crossover.is_none());
        assert!(m.gain_margin.is_none());
        assert!(m.gain_margin_db().is_none());
    }

    #[test]
    fn test_third_order_margins_match_hand_computation() {
        // L = 2/(s+1)^3.
        // Phase crossover: 3*atan(w) = 180 deg -> w = sqrt(3), |L| there is
        // 2/8, so gm = 4 (12.04 dB).
        // Gain crossover: |L| = 1 -> w = sqrt(2^(2/3) - 1) ~ 0.7664, phase
        // there is -3*atan(w) ~ -112.4 deg -> pm ~ 67.6 deg.
        let l = TransferFunction::from_coeffs(&[2.0], &[1.0, 3.0, 3.0, 1.0]).unwrap();
        let resp = FrequencyResponse::evaluate(&l, &log_grid(1e-2, 1e2, 100)).unwrap();
        let m = StabilityMargins::from_response(&resp);

        assert_relative_eq!(m.phase_crossover.unwrap(), 3f64.sqrt(), max_relative = 5e-3);
        assert_relative_eq!(m.gain_margin.unwrap(), 4.0, max_relative = 2e-2);
        assert_relative_eq!(m.gain_margin_db().unwrap(), 12.0412, max_relative = 2e-2);

        let wc = (2f64.powf(2.0 / 3.0) - 1.0).sqrt();
        assert_relative_eq!(m.gain_crossover.unwrap(), wc, max_relative = 5e-3);
        let pm = 180.0 - 3.0 * wc.atan().to_degrees();
        assert!((m.phase_margin_deg.unwrap() - pm).abs() < 0.5);
    }

    #[test]
    fn test_first_crossover_wins() {
        // L = 100/(s+1)^3 has |L| > 1 until well past the -180 crossing; the
        // reported crossovers must be the first ones scanning upward. The
        // phase crossover is still at sqrt(3), where |L| = 100/8, so the
        // linear gain margin is below unity (an unstable loop).
        let l = TransferFunction::from_coeffs(&[100.0], &[1.0, 3.0, 3.0, 1.0]).unwrap();
        let resp = FrequencyResponse::evaluate(&l, &log_grid(1e-2, 1e2, 400)).unwrap();
        let m = StabilityMargins::from_response(&resp);

        assert_relative_eq!(m.phase_crossover.unwrap(), 3f64.sqrt(), max_relative = 5e-3);
        assert_relative_eq!(m.gain_margin.unwrap(), 8.0 / 100.0, max_relative = 2e-2);
        // Gain margin below 1 means negative dB
        assert!(m.gain_margin_db().unwrap() < 0.0);
    }

    #[test]
    fn test_no_crossovers_all_absent() {
        // L = 0.1/(s+1): magnitude never reaches 1, phase never reaches -180
        let l = TransferFunction::from_coeffs(&[0.1], &[1.0, 1.0]).unwrap();
        let resp = FrequencyResponse::evaluate(&l, &log_grid(1e-2, 1e2, 100)).unwrap();
        let m = StabilityMargins::from_response(&resp);

        assert_eq!(m, StabilityMargins::default());
    }

    #[test]
    fn test_exact_unity_sample_detected() {
        // L = 1: every sample sits exactly on unity gain, so the very first
        // bracket reports a crossover at the left sample.
        let l = TransferFunction::from_coeffs(&[1.0], &[1.0]).unwrap();
        let grid = log_grid(1e-1, 1e1, 50);
        let resp = FrequencyResponse::evaluate(&l, &grid).unwrap();
        let m = StabilityMargins::from_response(&resp);

        assert_relative_eq!(m.gain_crossover.unwrap(), grid[0], epsilon = 1e-12);
        assert_relative_eq!(m.phase_margin_deg.unwrap(), 180.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wrap_deg_branch() {
        assert_relative_eq!(wrap_deg(190.0), -170.0);
        assert_relative_eq!(wrap_deg(-190.0), 170.0);
        assert_relative_eq!(wrap_deg(180.0), 180.0);
        assert_relative_eq!(wrap_deg(360.0), 0.0);
    }
}
