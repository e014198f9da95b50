//! # Daily Energy Consumption
//!
//! ```text
//! daily Ah = (continuous × h + intermittent × h × duty) / V
//! ```
//!
//! Usage hours are clamped to the policy cap (24 h). A zero or unusable
//! system voltage falls back to [`FALLBACK_SYSTEM_VOLTAGE`] so the division
//! is always defined.
//!
//! [`FALLBACK_SYSTEM_VOLTAGE`]: crate::policy::FALLBACK_SYSTEM_VOLTAGE

use tracing::warn;

use super::loads::LoadSummary;
use crate::policy::EnginePolicy;
use crate::units::{AmpHours, Volts, Watts};

/// System voltage to divide by: the given one when positive and finite,
/// otherwise the policy fallback.
pub fn effective_system_voltage(system_voltage: f64, policy: &EnginePolicy) -> f64 {
    if system_voltage.is_finite() && system_voltage > 0.0 {
        system_voltage
    } else {
        warn!(
            system_voltage,
            fallback = policy.fallback_system_voltage,
            "unusable system voltage, using fallback"
        );
        policy.fallback_system_voltage
    }
}

/// Usage hours clamped to `[0, max_usage_hours]`; non-finite counts as zero.
pub fn clamp_usage_hours(usage_hours: f64, policy: &EnginePolicy) -> f64 {
    if usage_hours.is_finite() {
        usage_hours.clamp(0.0, policy.max_usage_hours)
    } else {
        0.0
    }
}

/// Estimate daily consumption in amp-hours.
///
/// # Example
///
/// ```rust
/// use marine_core::calculations::energy::estimate_daily_energy;
/// use marine_core::calculations::loads::LoadSummary;
/// use marine_core::policy::EnginePolicy;
///
/// let loads = LoadSummary { continuous_w: 120.0, intermittent_w: 0.0, peak_w: 120.0 };
/// let ah = estimate_daily_energy(&loads, 10.0, 12.0, &EnginePolicy::default());
/// assert!((ah - 100.0).abs() < 1e-9);
/// ```
pub fn estimate_daily_energy(loads: &LoadSummary, usage_hours: f64, system_voltage: f64, policy: &EnginePolicy) -> f64 {
    let hours = clamp_usage_hours(usage_hours, policy);
    let volts = Volts(effective_system_voltage(system_voltage, policy));

    let continuous = Watts(loads.continuous_w).over_hours(hours);
    let intermittent = Watts(loads.intermittent_w).over_hours(hours) * policy.duty_cycle;

    let daily: AmpHours = (continuous + intermittent).at(volts);
    daily.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loads(continuous_w: f64, intermittent_w: f64) -> LoadSummary {
        LoadSummary {
            continuous_w,
            intermittent_w,
            peak_w: continuous_w + intermittent_w * 0.3,
        }
    }

    #[test]
    fn test_mixed_loads() {
        // (155 × 10 + 120 × 10 × 0.3) / 12 = 159.1667
        let ah = estimate_daily_energy(&loads(155.0, 120.0), 10.0, 12.0, &EnginePolicy::default());
        assert!((ah - 159.1667).abs() < 0.001);
    }

    #[test]
    fn test_higher_voltage_halves_ah() {
        let policy = EnginePolicy::default();
        let at_12 = estimate_daily_energy(&loads(200.0, 100.0), 8.0, 12.0, &policy);
        let at_24 = estimate_daily_energy(&loads(200.0, 100.0), 8.0, 24.0, &policy);
        assert!((at_12 - 2.0 * at_24).abs() < 1e-9);
    }

    #[test]
    fn test_usage_hours_clamped() {
        let policy = EnginePolicy::default();
        let full_day = estimate_daily_energy(&loads(120.0, 0.0), 24.0, 12.0, &policy);
        let over = estimate_daily_energy(&loads(120.0, 0.0), 30.0, 12.0, &policy);
        assert_eq!(full_day, over);
        assert_eq!(estimate_daily_energy(&loads(120.0, 0.0), -3.0, 12.0, &policy), 0.0);
        assert_eq!(estimate_daily_energy(&loads(120.0, 0.0), f64::NAN, 12.0, &policy), 0.0);
    }

    #[test]
    fn test_zero_voltage_uses_fallback() {
        let policy = EnginePolicy::default();
        let fallback = estimate_daily_energy(&loads(120.0, 0.0), 10.0, 0.0, &policy);
        let twelve = estimate_daily_energy(&loads(120.0, 0.0), 10.0, 12.0, &policy);
        assert_eq!(fallback, twelve);
        assert!(fallback.is_finite());
    }

    #[test]
    fn test_effective_voltage() {
        let policy = EnginePolicy::default();
        assert_eq!(effective_system_voltage(24.0, &policy), 24.0);
        assert_eq!(effective_system_voltage(-12.0, &policy), 12.0);
        assert_eq!(effective_system_voltage(f64::INFINITY, &policy), 12.0);
    }
}
