//! # Engine Policy
//!
//! Every constant the sizing pipeline relies on (duty cycle, charging hours,
//! derating curve, cable resistance table, chemistry ceilings, inverter
//! ratings) lives in one immutable [`EnginePolicy`]. The default policy is
//! built once on first use and shared by reference; an alternative policy
//! can be loaded from TOML.
//!
//! ## TOML Example
//!
//! Any field left out keeps its default.
//!
//! ```toml
//! duty_cycle = 0.25
//! charging_hours = 6.0
//!
//! [derating]
//! reference_temperature_c = 25.0
//! ```
//!
//! ```rust
//! use marine_core::policy::EnginePolicy;
//!
//! let policy = EnginePolicy::from_toml_str("duty_cycle = 0.25").unwrap();
//! assert_eq!(policy.duty_cycle, 0.25);
//! assert_eq!(policy.charging_hours, 8.0);
//! ```

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::inputs::{
    BatteryType, DEFAULT_MAX_DISCHARGE_PERCENT, DEFAULT_VOLTAGE_DROP_LIMIT_PERCENT,
};

/// Fraction of time an intermittent load is assumed to draw power
pub const INTERMITTENT_DUTY_CYCLE: f64 = 0.3;

/// Average daily charging run time (h)
pub const NOMINAL_CHARGING_HOURS: f64 = 8.0;

/// System voltage used when the given one is zero or unusable (V)
pub const FALLBACK_SYSTEM_VOLTAGE: f64 = 12.0;

/// Days of autonomy used when none is given
pub const DEFAULT_AUTONOMY_DAYS: f64 = 1.0;

/// Battery capacity is rounded up to a multiple of this (Ah)
pub const BATTERY_ROUNDING_AH: f64 = 50.0;

/// Capacity of the reference battery unit (Ah)
pub const BATTERY_UNIT_AH: f64 = 100.0;

/// Process-wide default policy
pub static DEFAULT_POLICY: Lazy<EnginePolicy> = Lazy::new(EnginePolicy::default);

/// Complete set of constants used by the sizing pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnginePolicy {
    /// Duty cycle applied to intermittent loads (0..=1)
    pub duty_cycle: f64,
    /// Hours per day the charging sources are assumed to run
    pub charging_hours: f64,
    /// Upper bound for daily usage hours
    pub max_usage_hours: f64,
    /// System voltage used when the given one is zero or unusable
    pub fallback_system_voltage: f64,
    /// Depth of discharge used when the given one is out of (0, 100]
    pub fallback_max_discharge_percent: f64,
    /// Autonomy used when none is given
    pub default_autonomy_days: f64,
    /// Battery capacity rounding step (Ah)
    pub battery_rounding_ah: f64,
    /// Reference battery unit size (Ah)
    pub battery_unit_ah: f64,
    /// Voltage drop limit used when the given one is unusable (%)
    pub fallback_voltage_drop_limit_percent: f64,
    /// Share of the drop limit above which the drop is flagged as a warning
    pub voltage_drop_warning_fraction: f64,
    /// Peak current above which a higher system voltage is recommended (A)
    pub high_current_threshold_a: f64,
    /// Percentage points above the chemistry ceiling that make a
    /// depth-of-discharge setting non-compliant rather than a warning
    pub severe_discharge_margin_percent: f64,
    /// Lowest temperature lithium cells may be charged at (°C)
    pub lithium_min_charge_temperature_c: f64,
    /// Highest ambient temperature for battery compartments (°C)
    pub max_battery_temperature_c: f64,
    pub derating: TemperatureDerating,
    pub discharge_ceilings: DischargeCeilings,
    pub inverter: InverterPolicy,
    /// Standard conductor sizes in ascending order
    pub cables: Vec<CableSpec>,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        EnginePolicy {
            duty_cycle: INTERMITTENT_DUTY_CYCLE,
            charging_hours: NOMINAL_CHARGING_HOURS,
            max_usage_hours: 24.0,
            fallback_system_voltage: FALLBACK_SYSTEM_VOLTAGE,
            fallback_max_discharge_percent: DEFAULT_MAX_DISCHARGE_PERCENT,
            default_autonomy_days: DEFAULT_AUTONOMY_DAYS,
            battery_rounding_ah: BATTERY_ROUNDING_AH,
            battery_unit_ah: BATTERY_UNIT_AH,
            fallback_voltage_drop_limit_percent: DEFAULT_VOLTAGE_DROP_LIMIT_PERCENT,
            voltage_drop_warning_fraction: 0.9,
            high_current_threshold_a: 150.0,
            severe_discharge_margin_percent: 20.0,
            lithium_min_charge_temperature_c: 0.0,
            max_battery_temperature_c: 45.0,
            derating: TemperatureDerating::default(),
            discharge_ceilings: DischargeCeilings::default(),
            inverter: InverterPolicy::default(),
            cables: standard_cable_table(),
        }
    }
}

impl EnginePolicy {
    /// Parse a policy from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let policy: EnginePolicy = toml::from_str(text)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Read, parse and validate a policy file.
    pub fn from_toml_file(path: &Path) -> CalcResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        Self::from_toml_str(&text)
    }

    /// Check that the policy can drive the pipeline without producing
    /// NaN or infinity.
    pub fn validate(&self) -> CalcResult<()> {
        if !(0.0..=1.0).contains(&self.duty_cycle) {
            return Err(CalcError::invalid_input(
                "duty_cycle",
                self.duty_cycle.to_string(),
                "Duty cycle must be between 0 and 1",
            ));
        }
        if !(0.0..=24.0).contains(&self.charging_hours) {
            return Err(CalcError::invalid_input(
                "charging_hours",
                self.charging_hours.to_string(),
                "Charging hours must be between 0 and 24",
            ));
        }
        if !(0.0..=24.0).contains(&self.max_usage_hours) {
            return Err(CalcError::invalid_input(
                "max_usage_hours",
                self.max_usage_hours.to_string(),
                "Usage hours cap must be between 0 and 24",
            ));
        }
        let positives = [
            ("fallback_system_voltage", self.fallback_system_voltage),
            ("default_autonomy_days", self.default_autonomy_days),
            ("battery_rounding_ah", self.battery_rounding_ah),
            ("battery_unit_ah", self.battery_unit_ah),
            ("fallback_voltage_drop_limit_percent", self.fallback_voltage_drop_limit_percent),
            ("high_current_threshold_a", self.high_current_threshold_a),
        ];
        for (field, value) in positives {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be positive"));
            }
        }
        if !(self.fallback_max_discharge_percent > 0.0 && self.fallback_max_discharge_percent <= 100.0) {
            return Err(CalcError::invalid_input(
                "fallback_max_discharge_percent",
                self.fallback_max_discharge_percent.to_string(),
                "Depth of discharge must be greater than 0 and at most 100",
            ));
        }
        if !(self.voltage_drop_warning_fraction > 0.0 && self.voltage_drop_warning_fraction <= 1.0) {
            return Err(CalcError::invalid_input(
                "voltage_drop_warning_fraction",
                self.voltage_drop_warning_fraction.to_string(),
                "Warning fraction must be greater than 0 and at most 1",
            ));
        }
        self.derating.validate()?;
        self.inverter.validate()?;
        validate_cable_table(&self.cables)
    }

    /// Safe depth-of-discharge ceiling for a chemistry (%)
    pub fn discharge_ceiling(&self, battery: BatteryType) -> f64 {
        self.discharge_ceilings.for_battery(battery)
    }
}

// ============================================================================
// Temperature Derating
// ============================================================================

/// Linear cold-temperature derating of usable battery capacity.
///
/// ```text
/// factor = min(1 + per_degree × (reference − T), max_factor)   for T < reference
/// factor = 1                                                    otherwise
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemperatureDerating {
    /// Temperature at which rated capacity applies (°C)
    pub reference_temperature_c: f64,
    /// Additional required capacity per °C below the reference (fraction)
    pub per_degree: f64,
    /// Upper bound on the multiplier
    pub max_factor: f64,
}

impl Default for TemperatureDerating {
    fn default() -> Self {
        TemperatureDerating {
            reference_temperature_c: 20.0,
            per_degree: 0.01,
            max_factor: 1.5,
        }
    }
}

impl TemperatureDerating {
    /// Capacity multiplier at `temperature_c`. Always ≥ 1 and non-increasing
    /// in temperature.
    pub fn factor(&self, temperature_c: f64) -> f64 {
        if !temperature_c.is_finite() || temperature_c >= self.reference_temperature_c {
            return 1.0;
        }
        let below = self.reference_temperature_c - temperature_c;
        (1.0 + self.per_degree * below).min(self.max_factor)
    }

    fn validate(&self) -> CalcResult<()> {
        if !self.reference_temperature_c.is_finite() {
            return Err(CalcError::invalid_input(
                "derating.reference_temperature_c",
                self.reference_temperature_c.to_string(),
                "Reference temperature must be finite",
            ));
        }
        if !(self.per_degree.is_finite() && self.per_degree >= 0.0) {
            return Err(CalcError::invalid_input(
                "derating.per_degree",
                self.per_degree.to_string(),
                "Per-degree derating cannot be negative",
            ));
        }
        if !(self.max_factor.is_finite() && self.max_factor >= 1.0) {
            return Err(CalcError::invalid_input(
                "derating.max_factor",
                self.max_factor.to_string(),
                "Maximum derating factor must be at least 1",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Chemistry Ceilings
// ============================================================================

/// Safe depth-of-discharge ceiling per chemistry (%)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DischargeCeilings {
    pub lead_acid: f64,
    pub agm: f64,
    pub gel: f64,
    pub lithium: f64,
}

impl Default for DischargeCeilings {
    fn default() -> Self {
        DischargeCeilings {
            lead_acid: 50.0,
            agm: 50.0,
            gel: 50.0,
            lithium: 80.0,
        }
    }
}

impl DischargeCeilings {
    pub fn for_battery(&self, battery: BatteryType) -> f64 {
        match battery {
            BatteryType::LeadAcid => self.lead_acid,
            BatteryType::Agm => self.agm,
            BatteryType::Gel => self.gel,
            BatteryType::Lithium => self.lithium,
        }
    }
}

// ============================================================================
// Inverter Ratings
// ============================================================================

/// Inverter sizing constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InverterPolicy {
    /// Multiplier applied to peak load before picking a rating
    pub headroom: f64,
    /// Standard continuous ratings in ascending order (W)
    pub standard_sizes_w: Vec<f64>,
    /// Step used to round up beyond the largest standard rating (W)
    pub oversize_step_w: f64,
    /// Ratings above this are specified as combined inverter/chargers (W)
    pub charger_threshold_w: f64,
}

impl Default for InverterPolicy {
    fn default() -> Self {
        InverterPolicy {
            headroom: 1.25,
            standard_sizes_w: vec![300.0, 600.0, 1000.0, 1500.0, 2000.0, 3000.0, 4000.0, 5000.0],
            oversize_step_w: 1000.0,
            charger_threshold_w: 2000.0,
        }
    }
}

impl InverterPolicy {
    fn validate(&self) -> CalcResult<()> {
        if !(self.headroom.is_finite() && self.headroom >= 1.0) {
            return Err(CalcError::invalid_input(
                "inverter.headroom",
                self.headroom.to_string(),
                "Headroom must be at least 1",
            ));
        }
        if !(self.oversize_step_w.is_finite() && self.oversize_step_w > 0.0) {
            return Err(CalcError::invalid_input(
                "inverter.oversize_step_w",
                self.oversize_step_w.to_string(),
                "Oversize step must be positive",
            ));
        }
        if !is_strictly_ascending(self.standard_sizes_w.iter().copied()) {
            return Err(CalcError::invalid_input(
                "inverter.standard_sizes_w",
                format!("{:?}", self.standard_sizes_w),
                "Ratings must be positive and strictly ascending",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Cable Table
// ============================================================================

/// One standard conductor size with its resistance per metre at 20 °C and
/// its continuous current rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CableSpec {
    /// Nominal cross-section (mm²)
    pub size_mm2: f64,
    /// Plain annealed copper, class 5 flexible (Ω/m)
    pub standard_ohm_per_m: f64,
    /// Tinned annealed copper, class 5 flexible (Ω/m)
    pub tinned_ohm_per_m: f64,
    /// Continuous current rating, single conductor outside engine spaces (A)
    pub max_current_a: f64,
}

impl CableSpec {
    pub const fn new(size_mm2: f64, standard_ohm_per_m: f64, tinned_ohm_per_m: f64, max_current_a: f64) -> Self {
        CableSpec {
            size_mm2,
            standard_ohm_per_m,
            tinned_ohm_per_m,
            max_current_a,
        }
    }

    /// Resistance per metre for the installation environment
    pub fn ohm_per_m(&self, tinned: bool) -> f64 {
        if tinned {
            self.tinned_ohm_per_m
        } else {
            self.standard_ohm_per_m
        }
    }
}

/// IEC 60228 class 5 maximum conductor resistance at 20 °C, with ratings
/// for 105 °C insulation
pub fn standard_cable_table() -> Vec<CableSpec> {
    vec![
        CableSpec::new(1.5, 0.0133, 0.0137, 20.0),
        CableSpec::new(2.5, 0.00798, 0.00821, 30.0),
        CableSpec::new(4.0, 0.00495, 0.00509, 40.0),
        CableSpec::new(6.0, 0.00330, 0.00339, 55.0),
        CableSpec::new(10.0, 0.00191, 0.00195, 75.0),
        CableSpec::new(16.0, 0.00121, 0.00124, 100.0),
        CableSpec::new(25.0, 0.000780, 0.000795, 140.0),
        CableSpec::new(35.0, 0.000554, 0.000565, 170.0),
        CableSpec::new(50.0, 0.000386, 0.000393, 210.0),
        CableSpec::new(70.0, 0.000272, 0.000277, 270.0),
        CableSpec::new(95.0, 0.000206, 0.000210, 330.0),
    ]
}

fn validate_cable_table(cables: &[CableSpec]) -> CalcResult<()> {
    if cables.is_empty() {
        return Err(CalcError::invalid_input("cables", "[]", "Cable table cannot be empty"));
    }
    if !is_strictly_ascending(cables.iter().map(|c| c.size_mm2)) {
        return Err(CalcError::invalid_input(
            "cables",
            format!("{} entries", cables.len()),
            "Cable sizes must be positive and strictly ascending",
        ));
    }
    for cable in cables {
        let resistances = [cable.standard_ohm_per_m, cable.tinned_ohm_per_m];
        if resistances.iter().any(|r| !(r.is_finite() && *r > 0.0)) {
            return Err(CalcError::invalid_input(
                "cables",
                format!("{} mm²", cable.size_mm2),
                "Resistance per metre must be positive",
            ));
        }
        if !(cable.max_current_a.is_finite() && cable.max_current_a > 0.0) {
            return Err(CalcError::invalid_input(
                "cables",
                format!("{} mm²", cable.size_mm2),
                "Current rating must be positive",
            ));
        }
    }
    Ok(())
}

fn is_strictly_ascending(values: impl Iterator<Item = f64>) -> bool {
    let mut previous = 0.0;
    for value in values {
        if !value.is_finite() || value <= previous {
            return false;
        }
        previous = value;
    }
    true
}
