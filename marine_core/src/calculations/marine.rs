//! # Marine Electrical Sizing
//!
//! The full pipeline from [`MarineInputs`] to [`MarineResults`]:
//!
//! ```text
//! inputs ─► loads ─► daily energy ─┬─► battery bank
//!             │                    └─► charging balance
//!             ├─► cable (peak current only)
//!             └─► inverter (peak load only)
//!                                       ─► compliance (everything)
//! ```
//!
//! The calculation is total. Every edge condition resolves to a documented
//! fallback, so the output never contains NaN or infinity and nothing is
//! returned as an error. Unsatisfiable requirements, such as a voltage drop
//! limit no cable can meet, surface as non-compliant checks instead.
//!
//! ## Example
//!
//! ```rust
//! use marine_core::calculations::marine::calculate_marine;
//! use marine_core::inputs::MarineInputs;
//!
//! let inputs = MarineInputs {
//!     vessel_length_m: 7.6,
//!     navigation_lights_w: 15.0,
//!     cabin_lights_w: 60.0,
//!     galley_load_w: 120.0,
//!     electronics_w: 80.0,
//!     daily_usage_hours: 10.0,
//!     alternator_w: 60.0,
//!     solar_w: 100.0,
//!     max_discharge_percent: 80.0,
//!     ..MarineInputs::default()
//! };
//!
//! let results = calculate_marine(&inputs);
//! assert!((results.peak_load_w - 191.0).abs() < 1e-9);
//! assert_eq!(results.recommended_battery_capacity_ah, 200.0);
//! assert!(results.energy_balance_ah < 0.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::battery::size_battery_bank;
use super::cable::size_cable;
use super::charging::{compute_energy_balance, ChargingSources};
use super::compliance::{evaluate_compliance, ComplianceCheck, Recommendation, RuleContext, DEFAULT_RULES};
use super::energy::estimate_daily_energy;
use super::inverter::size_inverter;
use super::loads::aggregate_loads;
use crate::inputs::MarineInputs;
use crate::policy::{EnginePolicy, DEFAULT_POLICY};

/// Complete sizing output.
///
/// ## JSON Example
///
/// ```json
/// {
///   "total_continuous_load_w": 155.0,
///   "total_intermittent_load_w": 120.0,
///   "peak_load_w": 191.0,
///   "daily_energy_consumption_ah": 159.17,
///   "recommended_battery_capacity_ah": 200.0,
///   "number_of_batteries": 2,
///   "battery_bank_voltage": 12.0,
///   "total_charging_capacity_w": 160.0,
///   "energy_balance_ah": -52.5,
///   "recommended_cable_size_mm2": 1.5,
///   "cable_type": "Standard marine-grade copper",
///   "actual_voltage_drop_percent": 0.0,
///   "recommended_inverter_size_w": 300.0,
///   "inverter_type": "Pure sine wave",
///   "compliance_checks": [
///     {
///       "regulation": "ABYC E-11",
///       "rule": "energy-balance",
///       "status": "warning",
///       "message": "Charging deficit of 52.5 Ah/day: ..."
///     }
///   ],
///   "recommendations": [
///     { "category": "Charging", "message": "Increase charging capacity by at least 79 W ..." }
///   ],
///   "peak_current_a": 15.92,
///   "required_battery_capacity_ah": 198.96,
///   "temperature_derating_factor": 1.0,
///   "charging_ah_per_day": 106.67,
///   "cable_rated_current_a": 20.0,
///   "cable_table_exhausted": false,
///   "autonomy_days_used": 1.0,
///   "discharge_percent_used": 80.0,
///   "drop_limit_percent_used": 3.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarineResults {
    // === Loads ===
    pub total_continuous_load_w: f64,
    pub total_intermittent_load_w: f64,
    /// Continuous plus duty-weighted intermittent load
    pub peak_load_w: f64,
    pub daily_energy_consumption_ah: f64,

    // === Battery ===
    /// Multiple of the policy rounding step (50 Ah)
    pub recommended_battery_capacity_ah: f64,
    /// Count of 100 Ah reference units
    pub number_of_batteries: u32,
    pub battery_bank_voltage: f64,

    // === Charging ===
    pub total_charging_capacity_w: f64,
    /// Charging minus consumption per day; negative is a deficit
    pub energy_balance_ah: f64,

    // === Distribution ===
    pub recommended_cable_size_mm2: f64,
    pub cable_type: String,
    pub actual_voltage_drop_percent: f64,
    pub recommended_inverter_size_w: f64,
    pub inverter_type: String,

    // === Compliance ===
    pub compliance_checks: Vec<ComplianceCheck>,
    pub recommendations: Vec<Recommendation>,

    // === Supporting detail ===
    pub peak_current_a: f64,
    /// Battery capacity before rounding
    pub required_battery_capacity_ah: f64,
    pub temperature_derating_factor: f64,
    pub charging_ah_per_day: f64,
    /// Continuous current rating of the recommended cable size (A)
    pub cable_rated_current_a: f64,
    /// True when no cable in the table meets the voltage drop limit
    pub cable_table_exhausted: bool,
    /// Autonomy the bank was sized for, after fallbacks (days)
    pub autonomy_days_used: f64,
    /// Depth of discharge the bank was sized for, after fallbacks (%)
    pub discharge_percent_used: f64,
    /// Voltage drop limit the cable was sized against, after fallbacks (%)
    pub drop_limit_percent_used: f64,
}

/// Size the installation with the default policy.
pub fn calculate_marine(inputs: &MarineInputs) -> MarineResults {
    calculate_marine_with(inputs, &DEFAULT_POLICY)
}

/// Size the installation with an explicit policy.
///
/// Inputs are sanitized first (see [`MarineInputs::sanitized`]), so records
/// that fail the validity gate still produce a complete result.
pub fn calculate_marine_with(inputs: &MarineInputs, policy: &EnginePolicy) -> MarineResults {
    let inputs = inputs.sanitized();
    let volts = inputs.system_voltage.volts();

    let loads = aggregate_loads(&inputs, policy);
    debug!(
        continuous_w = loads.continuous_w,
        intermittent_w = loads.intermittent_w,
        peak_w = loads.peak_w,
        "loads aggregated"
    );

    let daily_ah = estimate_daily_energy(&loads, inputs.daily_usage_hours, volts, policy);
    debug!(daily_ah, "daily consumption estimated");

    let battery = size_battery_bank(
        daily_ah,
        inputs.autonomy_days,
        inputs.max_discharge_percent,
        inputs.ambient_temperature_c,
        inputs.battery_voltage,
        volts,
        policy,
    );
    debug!(
        capacity_ah = battery.capacity_ah,
        units = battery.unit_count,
        temperature_factor = battery.temperature_factor,
        "battery bank sized"
    );

    let charging = compute_energy_balance(&ChargingSources::from(&inputs), daily_ah, volts, policy);
    debug!(
        charging_ah = charging.charging_ah,
        balance_ah = charging.energy_balance_ah,
        "energy balance computed"
    );

    let cable = size_cable(
        loads.peak_w,
        volts,
        inputs.cable_length_m,
        inputs.voltage_drop_limit_percent,
        inputs.saltwater_exposure,
        policy,
    );
    let inverter = size_inverter(loads.peak_w, inputs.electronics_w, policy);
    debug!(size_w = inverter.size_w, kind = %inverter.inverter_type, "inverter sized");

    let context = RuleContext {
        inputs: &inputs,
        loads: &loads,
        daily_energy_ah: daily_ah,
        battery: &battery,
        charging: &charging,
        cable: &cable,
    };
    let report = evaluate_compliance(&context, &DEFAULT_RULES, policy);
    debug!(
        checks = report.checks.len(),
        recommendations = report.recommendations.len(),
        "compliance evaluated"
    );

    MarineResults {
        total_continuous_load_w: loads.continuous_w,
        total_intermittent_load_w: loads.intermittent_w,
        peak_load_w: loads.peak_w,
        daily_energy_consumption_ah: daily_ah,
        recommended_battery_capacity_ah: battery.capacity_ah,
        number_of_batteries: battery.unit_count,
        battery_bank_voltage: battery.bank_voltage,
        total_charging_capacity_w: charging.total_charging_w,
        energy_balance_ah: charging.energy_balance_ah,
        recommended_cable_size_mm2: cable.cable_size_mm2,
        cable_type: cable.cable_type,
        actual_voltage_drop_percent: cable.actual_drop_percent,
        recommended_inverter_size_w: inverter.size_w,
        inverter_type: inverter.inverter_type,
        compliance_checks: report.checks,
        recommendations: report.recommendations,
        peak_current_a: cable.peak_current_a,
        required_battery_capacity_ah: battery.required_capacity_ah,
        temperature_derating_factor: battery.temperature_factor,
        charging_ah_per_day: charging.charging_ah,
        cable_rated_current_a: cable.rated_current_a,
        cable_table_exhausted: cable.table_exhausted,
        autonomy_days_used: battery.autonomy_days,
        discharge_percent_used: battery.effective_discharge_percent,
        drop_limit_percent_used: cable.drop_limit_percent,
    }
}

impl MarineResults {
    /// Find the compliance check produced by a named rule
    pub fn check(&self, rule: &str) -> Option<&ComplianceCheck> {
        self.compliance_checks.iter().find(|c| c.rule == rule)
    }

    /// Every numeric field, for finiteness checks
    pub fn numeric_fields(&self) -> [(&'static str, f64); 19] {
        [
            ("total_continuous_load_w", self.total_continuous_load_w),
            ("total_intermittent_load_w", self.total_intermittent_load_w),
            ("peak_load_w", self.peak_load_w),
            ("daily_energy_consumption_ah", self.daily_energy_consumption_ah),
            ("recommended_battery_capacity_ah", self.recommended_battery_capacity_ah),
            ("battery_bank_voltage", self.battery_bank_voltage),
            ("total_charging_capacity_w", self.total_charging_capacity_w),
            ("energy_balance_ah", self.energy_balance_ah),
            ("recommended_cable_size_mm2", self.recommended_cable_size_mm2),
            ("actual_voltage_drop_percent", self.actual_voltage_drop_percent),
            ("recommended_inverter_size_w", self.recommended_inverter_size_w),
            ("peak_current_a", self.peak_current_a),
            ("required_battery_capacity_ah", self.required_battery_capacity_ah),
            ("temperature_derating_factor", self.temperature_derating_factor),
            ("charging_ah_per_day", self.charging_ah_per_day),
            ("cable_rated_current_a", self.cable_rated_current_a),
            ("autonomy_days_used", self.autonomy_days_used),
            ("discharge_percent_used", self.discharge_percent_used),
            ("drop_limit_percent_used", self.drop_limit_percent_used),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::cable::{STANDARD_CABLE_TYPE, TINNED_CABLE_TYPE};
    use crate::calculations::compliance::ComplianceStatus;
    use crate::inputs::{BatteryType, SystemVoltage};

    fn scenario_a() -> MarineInputs {
        MarineInputs {
            vessel_length_m: 7.6,
            system_voltage: SystemVoltage::V12,
            navigation_lights_w: 15.0,
            cabin_lights_w: 60.0,
            galley_load_w: 120.0,
            electronics_w: 80.0,
            daily_usage_hours: 10.0,
            alternator_w: 60.0,
            solar_w: 100.0,
            max_discharge_percent: 80.0,
            ..MarineInputs::default()
        }
    }

    fn status_of(results: &MarineResults, rule: &str) -> Option<ComplianceStatus> {
        results.check(rule).map(|c| c.status)
    }

    #[test]
    fn test_scenario_a_weekend_cruiser() {
        let results = calculate_marine(&scenario_a());

        assert_eq!(results.total_continuous_load_w, 155.0);
        assert_eq!(results.total_intermittent_load_w, 120.0);
        assert!((results.peak_load_w - 191.0).abs() < 1e-9);

        // (155 × 10 + 120 × 10 × 0.3) / 12
        assert!((results.daily_energy_consumption_ah - 159.1667).abs() < 0.001);

        // 159.17 / 0.8 = 198.96 → 200 Ah, 2 × 100 Ah
        assert_eq!(results.recommended_battery_capacity_ah, 200.0);
        assert_eq!(results.number_of_batteries, 2);
        assert_eq!(results.battery_bank_voltage, 12.0);

        // 160 W × 8 h / 12 V = 106.67 Ah
        assert_eq!(results.total_charging_capacity_w, 160.0);
        assert!((results.charging_ah_per_day - 106.667).abs() < 0.001);
        assert!((results.energy_balance_ah + 52.5).abs() < 0.001);

        // No cable run given: the smallest conductor carries it with no drop
        assert_eq!(results.recommended_cable_size_mm2, 1.5);
        assert_eq!(results.cable_type, STANDARD_CABLE_TYPE);
        assert_eq!(results.actual_voltage_drop_percent, 0.0);

        // 191 × 1.25 = 238.75 → 300 W
        assert_eq!(results.recommended_inverter_size_w, 300.0);
        assert_eq!(results.inverter_type, "Pure sine wave");

        assert_eq!(status_of(&results, "energy-balance"), Some(ComplianceStatus::Warning));
        // 80 % on AGM is well past the 50 % ceiling
        assert_eq!(
            status_of(&results, "battery-discharge"),
            Some(ComplianceStatus::NonCompliant)
        );
        assert_eq!(status_of(&results, "voltage-drop"), Some(ComplianceStatus::Compliant));
    }

    #[test]
    fn test_scenario_a_with_lithium_is_discharge_compliant() {
        let inputs = MarineInputs {
            battery_type: BatteryType::Lithium,
            ..scenario_a()
        };
        let results = calculate_marine(&inputs);
        assert_eq!(status_of(&results, "battery-discharge"), Some(ComplianceStatus::Compliant));
    }

    #[test]
    fn test_scenario_b_no_charging_is_deficit() {
        let inputs = MarineInputs {
            alternator_w: 0.0,
            solar_w: 0.0,
            wind_w: 0.0,
            shore_power_w: 0.0,
            ..scenario_a()
        };
        let results = calculate_marine(&inputs);
        assert!(results.daily_energy_consumption_ah > 0.0);
        assert!(results.energy_balance_ah < 0.0);
        assert_eq!(status_of(&results, "energy-balance"), Some(ComplianceStatus::Warning));
        assert!(results.recommendations.iter().any(|r| r.category == "Charging"));
    }

    #[test]
    fn test_scenario_c_impossible_drop_limit() {
        let inputs = MarineInputs {
            cable_length_m: 50.0,
            voltage_drop_limit_percent: 0.1,
            ..scenario_a()
        };
        let results = calculate_marine(&inputs);
        assert_eq!(results.recommended_cable_size_mm2, 95.0);
        assert!(results.cable_table_exhausted);
        assert!(results.actual_voltage_drop_percent > 0.1);
        assert_eq!(status_of(&results, "voltage-drop"), Some(ComplianceStatus::NonCompliant));
    }

    #[test]
    fn test_scenario_d_zero_length_still_completes() {
        let inputs = MarineInputs {
            vessel_length_m: 0.0,
            ..MarineInputs::default()
        };
        assert!(!inputs.meets_validity_gate());

        let results = calculate_marine(&inputs);
        for (name, value) in results.numeric_fields() {
            assert!(value.is_finite(), "{} is not finite", name);
        }
        assert_eq!(results.peak_load_w, 0.0);
        assert_eq!(results.recommended_battery_capacity_ah, 0.0);
        assert_eq!(results.recommended_inverter_size_w, 0.0);
        assert!(!results.compliance_checks.is_empty());
    }

    #[test]
    fn test_garbage_inputs_stay_finite() {
        let inputs = MarineInputs {
            vessel_length_m: f64::NAN,
            galley_load_w: -500.0,
            cabin_lights_w: f64::INFINITY,
            daily_usage_hours: f64::NAN,
            max_discharge_percent: f64::NAN,
            autonomy_days: -2.0,
            battery_voltage: f64::NAN,
            solar_w: f64::NEG_INFINITY,
            cable_length_m: f64::NAN,
            voltage_drop_limit_percent: f64::NAN,
            ambient_temperature_c: f64::NAN,
            ..MarineInputs::default()
        };
        let results = calculate_marine(&inputs);
        for (name, value) in results.numeric_fields() {
            assert!(value.is_finite(), "{} is not finite", name);
        }
        // Unknown battery voltage leaves the battery-voltage rule undecided
        assert!(results.check("battery-voltage").is_none());
    }

    #[test]
    fn test_saltwater_and_shore_power() {
        let inputs = MarineInputs {
            saltwater_exposure: true,
            shore_power_w: 2000.0,
            cable_length_m: 4.0,
            ..scenario_a()
        };
        let results = calculate_marine(&inputs);
        assert_eq!(results.cable_type, TINNED_CABLE_TYPE);
        let conductor = results.check("conductor-material").unwrap();
        assert_eq!(conductor.status, ComplianceStatus::Compliant);
        assert!(!conductor.message.is_empty());
        assert!(results.recommendations.iter().any(|r| r.category == "Shore Power"));
        // 2160 W × 8 / 12 = 1440 Ah against 159 Ah
        assert!(results.energy_balance_ah > 0.0);
    }

    #[test]
    fn test_cold_weather_derates() {
        let warm = calculate_marine(&scenario_a());
        let cold = calculate_marine(&MarineInputs {
            ambient_temperature_c: 0.0,
            ..scenario_a()
        });
        assert!((cold.temperature_derating_factor - 1.2).abs() < 1e-9);
        assert!(cold.recommended_battery_capacity_ah > warm.recommended_battery_capacity_ah);
        assert!(cold.check("battery-temperature").unwrap().message.contains("derating"));
    }

    #[test]
    fn test_higher_voltage_reduces_current() {
        let heavy = MarineInputs {
            winch_w: 6000.0,
            galley_load_w: 2000.0,
            cable_length_m: 3.0,
            ..scenario_a()
        };
        let at_12 = calculate_marine(&heavy);
        let at_24 = calculate_marine(&MarineInputs {
            system_voltage: SystemVoltage::V24,
            ..heavy.clone()
        });
        // 2555 W: 212.9 A at 12 V, half that at 24 V
        assert!((at_12.peak_current_a - 2.0 * at_24.peak_current_a).abs() < 1e-9);
        assert!(at_24.recommended_cable_size_mm2 <= at_12.recommended_cable_size_mm2);
        assert_eq!(status_of(&at_12, "system-current"), Some(ComplianceStatus::Warning));
        assert_eq!(at_12.inverter_type, "Pure sine wave inverter/charger");
    }

    #[test]
    fn test_24v_bank_of_12v_batteries() {
        let inputs = MarineInputs {
            vessel_length_m: 9.0,
            system_voltage: SystemVoltage::V24,
            battery_voltage: 12.0,
            cabin_lights_w: 240.0,
            daily_usage_hours: 10.0,
            max_discharge_percent: 50.0,
            ..MarineInputs::default()
        };
        let results = calculate_marine(&inputs);
        // 240 W × 10 h / 24 V = 100 Ah → 200 Ah at 50 %
        assert_eq!(results.recommended_battery_capacity_ah, 200.0);
        assert_eq!(results.number_of_batteries, 2);

        let check = results.check("battery-voltage").unwrap();
        assert_eq!(check.status, ComplianceStatus::Compliant);
        assert!(check.message.starts_with("4 × 12V batteries"), "{}", check.message);
    }

    #[test]
    fn test_short_heavy_run_exceeds_cable_rating() {
        let inputs = MarineInputs {
            vessel_length_m: 7.6,
            winch_w: 8000.0,
            cabin_lights_w: 400.0,
            cable_length_m: 0.2,
            ..MarineInputs::default()
        };
        let results = calculate_marine(&inputs);
        // 400 + 8000 × 0.3 = 2800 W → 233.3 A; 6 mm² drops 2.57 % over 0.2 m
        assert!((results.peak_current_a - 233.333).abs() < 0.001);
        assert_eq!(results.recommended_cable_size_mm2, 6.0);
        assert_eq!(status_of(&results, "voltage-drop"), Some(ComplianceStatus::Compliant));
        assert_eq!(results.cable_rated_current_a, 55.0);
        assert_eq!(status_of(&results, "cable-ampacity"), Some(ComplianceStatus::NonCompliant));
        assert!(results
            .recommendations
            .iter()
            .any(|r| r.category == "Cabling" && r.message.contains("70 mm²")));
    }

    #[test]
    fn test_custom_policy() {
        let policy = EnginePolicy {
            duty_cycle: 0.5,
            charging_hours: 6.0,
            ..EnginePolicy::default()
        };
        let results = calculate_marine_with(&scenario_a(), &policy);
        // 155 + 120 × 0.5
        assert!((results.peak_load_w - 215.0).abs() < 1e-9);
        // 160 × 6 / 12
        assert!((results.charging_ah_per_day - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_results_serialization() {
        let results = calculate_marine(&scenario_a());
        let json = serde_json::to_string_pretty(&results).unwrap();
        assert!(json.contains("\"peak_load_w\""));
        assert!(json.contains("\"status\": \"warning\""));
        let parsed: MarineResults = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.number_of_batteries, results.number_of_batteries);
        assert_eq!(parsed.compliance_checks, results.compliance_checks);
    }
}
