//! Time-domain performance metrics from a simulated step response
//!
//! All thresholds are relative to the closed-loop DC gain: rise time spans
//! the first 10% and 90% reaches, settling uses a +/-2% band, overshoot is
//! the peak excess over the final value, and the steady-state error assumes
//! a unit reference. A metric whose defining condition is never met inside
//! the simulated horizon is reported as absent, never as 0 or as the horizon
//! end time.

use serde::{Deserialize, Serialize};

use crate::step::StepResponse;

/// Settling band as a fraction of the steady-state value.
pub const SETTLE_BAND: f64 = 0.02;

const RISE_LOW: f64 = 0.1;
const RISE_HIGH: f64 = 0.9;

/// Step-response performance metrics; absent fields mean the defining
/// condition was never satisfied within the simulated horizon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepMetrics {
    /// Seconds between first reaching 10% and first reaching 90% of the
    /// steady-state value.
    pub rise_time: Option<f64>,
    /// First time after which the response stays within the settling band
    /// for the remainder of the horizon.
    pub settling_time: Option<f64>,
    /// 100 * (peak - steady state) / steady state, clamped to 0 when the
    /// response never exceeds its final value.
    pub overshoot_percent: Option<f64>,
    /// |1 - steady state|, assuming a unit reference.
    pub steady_state_error: Option<f64>,
}

/// Extract step metrics from a response and the system's DC gain `ss`.
///
/// With `ss` zero or non-finite the response-relative metrics are undefined
/// and come back absent; the steady-state error only needs `ss` itself.
pub fn step_metrics(resp: &StepResponse, ss: f64) -> StepMetrics {
    let mut metrics = StepMetrics::default();
    if !ss.is_finite() {
        return metrics;
    }
    metrics.steady_state_error = Some((1.0 - ss).abs());
    if ss == 0.0 {
        return metrics;
    }

    // Normalizing by ss orients the thresholds for negative gains too.
    let normalized: Vec<f64> = resp.output.iter().map(|&y| y / ss).collect();

    let t_low = first_reach(&resp.time, &normalized, RISE_LOW);
    let t_high = first_reach(&resp.time, &normalized, RISE_HIGH);
    if let (Some(lo), Some(hi)) = (t_low, t_high) {
        if hi >= lo {
            metrics.rise_time = Some(hi - lo);
        }
    }

    metrics.settling_time = settling_time(&resp.time, &normalized);

    let peak = resp
        .output
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let overshoot = 100.0 * (peak - ss) / ss;
    if overshoot.is_finite() {
        metrics.overshoot_percent = Some(overshoot.max(0.0));
    }

    metrics
}

/// Time of the first sample at or beyond `threshold` (normalized units).
fn first_reach(time: &[f64], normalized: &[f64], threshold: f64) -> Option<f64> {
    normalized
        .iter()
        .position(|&y| y >= threshold)
        .map(|i| time[i])
}

/// First time after which |y - 1| stays within the settling band.
///
/// Scans for the last sample outside the band: the response settles at the
/// next sample, unless the last excursion is the final sample (never
/// settles) in which case the metric is absent.
fn settling_time(time: &[f64], normalized: &[f64]) -> Option<f64> {
    match normalized
        .iter()
        .rposition(|&y| (y - 1.0).abs() > SETTLE_BAND)
    {
        None => time.first().copied(),
        Some(i) if i + 1 < time.len() => Some(time[i + 1]),
        Some(_) => None,
    }
}
