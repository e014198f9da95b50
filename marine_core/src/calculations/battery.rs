//! # Battery Bank Sizing
//!
//! ```text
//! required = daily Ah × autonomy days / (DoD / 100) × temperature factor
//! capacity = ceil(required / 50) × 50
//! units    = ceil(capacity / 100)
//! ```
//!
//! Depth of discharge outside (0, 100] falls back to the policy default
//! (50 %), and a missing autonomy falls back to one day, so neither can
//! produce a division by zero. The temperature factor comes from
//! [`TemperatureDerating`](crate::policy::TemperatureDerating).

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::policy::EnginePolicy;

/// Sized battery bank.
///
/// ## JSON Example
///
/// ```json
/// {
///   "required_capacity_ah": 198.96,
///   "capacity_ah": 200.0,
///   "unit_count": 2,
///   "bank_voltage": 12.0,
///   "temperature_factor": 1.0,
///   "effective_discharge_percent": 80.0,
///   "autonomy_days": 1.0,
///   "series_string": 1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryBank {
    /// Capacity before rounding (Ah)
    pub required_capacity_ah: f64,
    /// Recommended capacity, a multiple of the rounding step (Ah)
    pub capacity_ah: f64,
    /// Number of reference units needed to reach `capacity_ah`
    pub unit_count: u32,
    /// Nominal bank voltage (V)
    pub bank_voltage: f64,
    /// Cold-temperature capacity multiplier that was applied
    pub temperature_factor: f64,
    /// Depth of discharge actually used after fallbacks (%)
    pub effective_discharge_percent: f64,
    /// Autonomy actually used after fallbacks (days)
    pub autonomy_days: f64,
    /// Batteries per series string, when the battery voltage divides the
    /// bank voltage
    pub series_string: Option<u32>,
}

impl BatteryBank {
    /// Physical batteries to fit: one series string per reference unit.
    ///
    /// Reference units are counted at bank voltage, so a 24 V bank built
    /// from 12 V batteries needs two per unit.
    pub fn battery_count(&self) -> Option<u32> {
        self.series_string.map(|series| self.unit_count * series)
    }
}

/// Depth of discharge to size with: the given value when inside (0, 100],
/// otherwise the policy fallback.
pub fn effective_discharge_percent(max_discharge_percent: f64, policy: &EnginePolicy) -> f64 {
    if max_discharge_percent > 0.0 && max_discharge_percent <= 100.0 {
        max_discharge_percent
    } else {
        warn!(
            max_discharge_percent,
            fallback = policy.fallback_max_discharge_percent,
            "depth of discharge out of range, using fallback"
        );
        policy.fallback_max_discharge_percent
    }
}

/// Round `value` up to the next multiple of `step`.
pub fn round_up_to(value: f64, step: f64) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    (value / step).ceil() * step
}

/// Batteries per series string, if `battery_voltage` divides `bank_voltage`
/// exactly.
pub fn series_string(battery_voltage: f64, bank_voltage: f64) -> Option<u32> {
    if !(battery_voltage > 0.0 && battery_voltage <= bank_voltage) {
        return None;
    }
    let ratio = bank_voltage / battery_voltage;
    let whole = ratio.round();
    if (ratio - whole).abs() < 1e-9 {
        Some(whole as u32)
    } else {
        None
    }
}

/// Size the battery bank for a day's consumption.
///
/// `bank_voltage` is the nominal system voltage the bank must supply.
///
/// # Example
///
/// ```rust
/// use marine_core::calculations::battery::size_battery_bank;
/// use marine_core::policy::EnginePolicy;
///
/// // 100 Ah/day, one day, 50 % DoD, warm: 200 Ah → 2 × 100 Ah
/// let bank = size_battery_bank(100.0, 1.0, 50.0, 25.0, 12.0, 12.0, &EnginePolicy::default());
/// assert_eq!(bank.capacity_ah, 200.0);
/// assert_eq!(bank.unit_count, 2);
/// ```
pub fn size_battery_bank(
    daily_ah: f64,
    autonomy_days: f64,
    max_discharge_percent: f64,
    temperature_c: f64,
    battery_voltage: f64,
    bank_voltage: f64,
    policy: &EnginePolicy,
) -> BatteryBank {
    let discharge_percent = effective_discharge_percent(max_discharge_percent, policy);
    let autonomy = if autonomy_days.is_finite() && autonomy_days > 0.0 {
        autonomy_days
    } else {
        policy.default_autonomy_days
    };
    let daily = if daily_ah.is_finite() { daily_ah.max(0.0) } else { 0.0 };

    let temperature_factor = policy.derating.factor(temperature_c);
    let base = daily * autonomy / (discharge_percent / 100.0);
    let required = base * temperature_factor;

    let capacity = round_up_to(required, policy.battery_rounding_ah);
    let unit_count = (capacity / policy.battery_unit_ah).ceil() as u32;

    BatteryBank {
        required_capacity_ah: required,
        capacity_ah: capacity,
        unit_count,
        bank_voltage,
        temperature_factor,
        effective_discharge_percent: discharge_percent,
        autonomy_days: autonomy,
        series_string: series_string(battery_voltage, bank_voltage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(daily_ah: f64, dod: f64, temp: f64) -> BatteryBank {
        size_battery_bank(daily_ah, 1.0, dod, temp, 12.0, 12.0, &EnginePolicy::default())
    }

    #[test]
    fn test_rounds_up_to_fifty() {
        // 159.17 / 0.8 = 198.96 → 200
        let bank = size(159.1667, 80.0, 20.0);
        assert!((bank.required_capacity_ah - 198.958).abs() < 0.01);
        assert_eq!(bank.capacity_ah, 200.0);
        assert_eq!(bank.unit_count, 2);
    }

    #[test]
    fn test_exact_multiple_not_bumped() {
        let bank = size(50.0, 50.0, 20.0);
        assert_eq!(bank.capacity_ah, 100.0);
        assert_eq!(bank.unit_count, 1);
    }

    #[test]
    fn test_odd_fifty_needs_extra_unit() {
        // 75 / 0.5 = 150 Ah → 2 × 100 Ah units
        let bank = size(75.0, 50.0, 20.0);
        assert_eq!(bank.capacity_ah, 150.0);
        assert_eq!(bank.unit_count, 2);
    }

    #[test]
    fn test_cold_derating() {
        // 100 / 0.5 = 200, × 1.20 at 0 °C = 240 → 250
        let bank = size(100.0, 50.0, 0.0);
        assert!((bank.temperature_factor - 1.2).abs() < 1e-9);
        assert!((bank.required_capacity_ah - 240.0).abs() < 1e-9);
        assert_eq!(bank.capacity_ah, 250.0);
        assert_eq!(bank.unit_count, 3);
    }

    #[test]
    fn test_zero_discharge_falls_back() {
        let bank = size(100.0, 0.0, 20.0);
        assert_eq!(bank.effective_discharge_percent, 50.0);
        assert_eq!(bank.capacity_ah, 200.0);
    }

    #[test]
    fn test_over_hundred_discharge_falls_back() {
        let bank = size(100.0, 150.0, 20.0);
        assert_eq!(bank.effective_discharge_percent, 50.0);
    }

    #[test]
    fn test_autonomy_days_multiply() {
        let policy = EnginePolicy::default();
        let bank = size_battery_bank(60.0, 3.0, 50.0, 20.0, 12.0, 12.0, &policy);
        // 60 × 3 / 0.5 = 360 → 400
        assert_eq!(bank.capacity_ah, 400.0);
        assert_eq!(bank.autonomy_days, 3.0);

        let default_autonomy = size_battery_bank(60.0, 0.0, 50.0, 20.0, 12.0, 12.0, &policy);
        assert_eq!(default_autonomy.autonomy_days, 1.0);
    }

    #[test]
    fn test_no_consumption() {
        let bank = size(0.0, 50.0, 20.0);
        assert_eq!(bank.capacity_ah, 0.0);
        assert_eq!(bank.unit_count, 0);
    }

    #[test]
    fn test_series_string() {
        assert_eq!(series_string(12.0, 24.0), Some(2));
        assert_eq!(series_string(6.0, 12.0), Some(2));
        assert_eq!(series_string(12.0, 12.0), Some(1));
        assert_eq!(series_string(24.0, 12.0), None);
        assert_eq!(series_string(5.0, 12.0), None);
        assert_eq!(series_string(0.0, 12.0), None);
    }

    #[test]
    fn test_battery_count_at_bank_voltage() {
        let policy = EnginePolicy::default();
        // 100 Ah/day at 50 % → 200 Ah at 24 V: two units, each a pair of 12 V batteries
        let bank = size_battery_bank(100.0, 1.0, 50.0, 20.0, 12.0, 24.0, &policy);
        assert_eq!(bank.unit_count, 2);
        assert_eq!(bank.series_string, Some(2));
        assert_eq!(bank.battery_count(), Some(4));

        let matched = size_battery_bank(100.0, 1.0, 50.0, 20.0, 12.0, 12.0, &policy);
        assert_eq!(matched.battery_count(), Some(2));

        let mismatched = size_battery_bank(100.0, 1.0, 50.0, 20.0, 24.0, 12.0, &policy);
        assert_eq!(mismatched.battery_count(), None);
    }

    #[test]
    fn test_round_up_to() {
        assert_eq!(round_up_to(0.1, 50.0), 50.0);
        assert_eq!(round_up_to(50.0, 50.0), 50.0);
        assert_eq!(round_up_to(50.01, 50.0), 100.0);
        assert_eq!(round_up_to(0.0, 50.0), 0.0);
    }
}
