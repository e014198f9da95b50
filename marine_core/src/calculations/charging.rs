//! # Charging Balance
//!
//! Sums the charging sources and nets their daily yield against
//! consumption:
//!
//! ```text
//! charging Ah = (alternator + solar + wind + shore) × charging hours / V
//! balance     = charging Ah − daily Ah
//! ```
//!
//! The balance keeps its sign: positive is a surplus, negative a deficit.

use serde::{Deserialize, Serialize};

use super::energy::effective_system_voltage;
use crate::inputs::MarineInputs;
use crate::policy::EnginePolicy;
use crate::units::{Volts, Watts};

/// Charging source ratings (W). All optional, default 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargingSources {
    pub alternator_w: f64,
    pub solar_w: f64,
    pub wind_w: f64,
    pub shore_power_w: f64,
}

impl ChargingSources {
    /// Total rated charging power (W)
    pub fn total_w(&self) -> f64 {
        (Watts(self.alternator_w) + Watts(self.solar_w) + Watts(self.wind_w) + Watts(self.shore_power_w)).value()
    }
}

impl From<&MarineInputs> for ChargingSources {
    fn from(inputs: &MarineInputs) -> Self {
        ChargingSources {
            alternator_w: inputs.alternator_w,
            solar_w: inputs.solar_w,
            wind_w: inputs.wind_w,
            shore_power_w: inputs.shore_power_w,
        }
    }
}

/// Daily charging yield netted against consumption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargingBalance {
    /// Sum of all charging sources (W)
    pub total_charging_w: f64,
    /// Charge delivered over the nominal charging hours (Ah/day)
    pub charging_ah: f64,
    /// Charging minus consumption (Ah/day, signed)
    pub energy_balance_ah: f64,
}

impl ChargingBalance {
    pub fn is_deficit(&self) -> bool {
        self.energy_balance_ah < 0.0
    }
}

/// Compute the daily energy balance.
///
/// # Example
///
/// ```rust
/// use marine_core::calculations::charging::{compute_energy_balance, ChargingSources};
/// use marine_core::policy::EnginePolicy;
///
/// let sources = ChargingSources { solar_w: 150.0, ..ChargingSources::default() };
/// let balance = compute_energy_balance(&sources, 60.0, 12.0, &EnginePolicy::default());
/// // 150 × 8 / 12 = 100 Ah, minus 60 Ah
/// assert!((balance.energy_balance_ah - 40.0).abs() < 1e-9);
/// ```
pub fn compute_energy_balance(
    sources: &ChargingSources,
    daily_ah: f64,
    system_voltage: f64,
    policy: &EnginePolicy,
) -> ChargingBalance {
    let volts = Volts(effective_system_voltage(system_voltage, policy));
    let total_charging_w = sources.total_w();
    let charging_ah = Watts(total_charging_w).over_hours(policy.charging_hours).at(volts).value();

    ChargingBalance {
        total_charging_w,
        charging_ah,
        energy_balance_ah: charging_ah - daily_ah,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_sum() {
        let sources = ChargingSources {
            alternator_w: 60.0,
            solar_w: 100.0,
            wind_w: 50.0,
            shore_power_w: 0.0,
        };
        assert_eq!(sources.total_w(), 210.0);
    }

    #[test]
    fn test_deficit_sign_preserved() {
        let sources = ChargingSources {
            alternator_w: 60.0,
            solar_w: 100.0,
            ..ChargingSources::default()
        };
        // 160 × 8 / 12 = 106.67 Ah
        let balance = compute_energy_balance(&sources, 159.1667, 12.0, &EnginePolicy::default());
        assert!((balance.charging_ah - 106.667).abs() < 0.001);
        assert!((balance.energy_balance_ah + 52.5).abs() < 0.001);
        assert!(balance.is_deficit());
    }

    #[test]
    fn test_no_sources_is_deficit() {
        let balance = compute_energy_balance(&ChargingSources::default(), 10.0, 24.0, &EnginePolicy::default());
        assert_eq!(balance.total_charging_w, 0.0);
        assert_eq!(balance.energy_balance_ah, -10.0);
    }

    #[test]
    fn test_zero_voltage_stays_finite() {
        let sources = ChargingSources {
            shore_power_w: 600.0,
            ..ChargingSources::default()
        };
        let balance = compute_energy_balance(&sources, 0.0, 0.0, &EnginePolicy::default());
        assert!(balance.energy_balance_ah.is_finite());
        assert_eq!(balance.charging_ah, 400.0);
    }

    #[test]
    fn test_from_inputs() {
        let inputs = MarineInputs {
            wind_w: 400.0,
            shore_power_w: 1000.0,
            ..MarineInputs::default()
        };
        let sources = ChargingSources::from(&inputs);
        assert_eq!(sources.total_w(), 1400.0);
    }
}
