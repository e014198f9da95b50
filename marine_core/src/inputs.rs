//! # Calculator Inputs
//!
//! The flat [`MarineInputs`] record consumed by the sizing pipeline, plus the
//! enumerations it is built from. Every field has a documented default so a
//! partial JSON document deserializes into a complete record.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "vessel_type": "yacht",
//!   "vessel_length_m": 7.6,
//!   "system_voltage": 12,
//!   "navigation_lights_w": 15.0,
//!   "cabin_lights_w": 60.0,
//!   "galley_load_w": 120.0,
//!   "electronics_w": 80.0,
//!   "daily_usage_hours": 10.0,
//!   "battery_type": "lithium",
//!   "max_discharge_percent": 80.0,
//!   "alternator_w": 60.0,
//!   "solar_w": 100.0
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Ambient temperature assumed when none is given (°C)
pub const DEFAULT_AMBIENT_TEMPERATURE_C: f64 = 20.0;

/// Voltage drop limit assumed when none is given (%)
pub const DEFAULT_VOLTAGE_DROP_LIMIT_PERCENT: f64 = 3.0;

/// Depth of discharge assumed when none is given (%)
pub const DEFAULT_MAX_DISCHARGE_PERCENT: f64 = 50.0;

/// Nominal voltage of a single battery when none is given (V)
pub const DEFAULT_BATTERY_VOLTAGE: f64 = 12.0;

// ============================================================================
// Vessel Type
// ============================================================================

/// Kind of vessel the installation is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VesselType {
    #[default]
    Yacht,
    Sailboat,
    Cruiser,
    Fishing,
    Catamaran,
    Narrowboat,
}

impl VesselType {
    /// All vessel types for selection lists
    pub const ALL: [VesselType; 6] = [
        VesselType::Yacht,
        VesselType::Sailboat,
        VesselType::Cruiser,
        VesselType::Fishing,
        VesselType::Catamaran,
        VesselType::Narrowboat,
    ];

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "yacht" | "motoryacht" => Ok(VesselType::Yacht),
            "sailboat" | "sailingyacht" | "sail" => Ok(VesselType::Sailboat),
            "cruiser" | "motorcruiser" => Ok(VesselType::Cruiser),
            "fishing" | "fishingvessel" | "fishingboat" => Ok(VesselType::Fishing),
            "catamaran" | "cat" => Ok(VesselType::Catamaran),
            "narrowboat" | "canalboat" => Ok(VesselType::Narrowboat),
            _ => Err(CalcError::unknown_variant("vessel type", s)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            VesselType::Yacht => "Yacht",
            VesselType::Sailboat => "Sailboat",
            VesselType::Cruiser => "Cruiser",
            VesselType::Fishing => "Fishing Vessel",
            VesselType::Catamaran => "Catamaran",
            VesselType::Narrowboat => "Narrowboat",
        }
    }
}

impl std::fmt::Display for VesselType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// System Voltage
// ============================================================================

/// Nominal DC system voltage.
///
/// Serialized as a bare number (`12`, `24`, `48`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "f64", into = "u32")]
pub enum SystemVoltage {
    #[default]
    V12,
    V24,
    V48,
}

impl SystemVoltage {
    /// All supported system voltages
    pub const ALL: [SystemVoltage; 3] = [SystemVoltage::V12, SystemVoltage::V24, SystemVoltage::V48];

    /// Nominal voltage in volts
    pub fn volts(&self) -> f64 {
        match self {
            SystemVoltage::V12 => 12.0,
            SystemVoltage::V24 => 24.0,
            SystemVoltage::V48 => 48.0,
        }
    }

    /// Parse from text such as "24", "24V" or "24 v"
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let digits = s.trim().trim_end_matches(['v', 'V']).trim();
        digits
            .parse::<f64>()
            .map_err(|_| CalcError::unknown_variant("system voltage", s))
            .and_then(SystemVoltage::try_from)
    }
}

impl TryFrom<f64> for SystemVoltage {
    type Error = CalcError;

    fn try_from(volts: f64) -> Result<Self, Self::Error> {
        SystemVoltage::ALL
            .into_iter()
            .find(|v| v.volts() == volts)
            .ok_or_else(|| CalcError::unknown_variant("system voltage", volts.to_string()))
    }
}

impl From<SystemVoltage> for u32 {
    fn from(v: SystemVoltage) -> Self {
        v.volts() as u32
    }
}

impl std::fmt::Display for SystemVoltage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}V", self.volts())
    }
}

// ============================================================================
// Battery Chemistry
// ============================================================================

/// Battery chemistry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BatteryType {
    /// Flooded lead-acid
    LeadAcid,
    /// Absorbed glass mat
    #[default]
    Agm,
    /// Gel
    Gel,
    /// Lithium iron phosphate
    Lithium,
}

impl BatteryType {
    /// All chemistries for selection lists
    pub const ALL: [BatteryType; 4] = [
        BatteryType::LeadAcid,
        BatteryType::Agm,
        BatteryType::Gel,
        BatteryType::Lithium,
    ];

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "leadacid" | "flooded" | "wet" => Ok(BatteryType::LeadAcid),
            "agm" => Ok(BatteryType::Agm),
            "gel" => Ok(BatteryType::Gel),
            "lithium" | "lifepo4" | "lfp" => Ok(BatteryType::Lithium),
            _ => Err(CalcError::unknown_variant("battery type", s)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            BatteryType::LeadAcid => "Flooded Lead-Acid",
            BatteryType::Agm => "AGM",
            BatteryType::Gel => "Gel",
            BatteryType::Lithium => "Lithium (LiFePO4)",
        }
    }
}

impl std::fmt::Display for BatteryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// Validated calculator inputs.
///
/// Loads are split by how the engine treats them: navigation lights, cabin
/// lights and electronics are continuous; galley, pumps, fans, winch and the
/// additional load are intermittent and weighted by the duty cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarineInputs {
    pub vessel_type: VesselType,

    /// Length overall in metres
    pub vessel_length_m: f64,

    pub system_voltage: SystemVoltage,

    // === Loads (W) ===
    pub navigation_lights_w: f64,
    pub cabin_lights_w: f64,
    pub galley_load_w: f64,
    pub pumps_w: f64,
    pub fans_w: f64,
    pub electronics_w: f64,
    pub winch_w: f64,
    pub additional_load_w: f64,

    // === Usage pattern ===
    /// Hours per day the electrical system is in use
    pub daily_usage_hours: f64,
    /// Share of the day spent under engine
    pub motoring_percent: f64,
    /// Share of the day spent at anchor
    pub anchored_percent: f64,

    // === Battery ===
    pub battery_type: BatteryType,
    /// Nominal voltage of a single battery
    pub battery_voltage: f64,
    /// Depth of discharge the bank may be taken to (%)
    pub max_discharge_percent: f64,
    /// Days the bank must carry the load without charging (0 = policy default)
    pub autonomy_days: f64,

    // === Charging sources (W) ===
    pub alternator_w: f64,
    pub solar_w: f64,
    pub wind_w: f64,
    pub shore_power_w: f64,

    // === Cable and environment ===
    /// One-way cable run from battery to distribution panel
    pub cable_length_m: f64,
    pub voltage_drop_limit_percent: f64,
    pub ambient_temperature_c: f64,
    pub saltwater_exposure: bool,
}

impl Default for MarineInputs {
    fn default() -> Self {
        MarineInputs {
            vessel_type: VesselType::default(),
            vessel_length_m: 0.0,
            system_voltage: SystemVoltage::default(),
            navigation_lights_w: 0.0,
            cabin_lights_w: 0.0,
            galley_load_w: 0.0,
            pumps_w: 0.0,
            fans_w: 0.0,
            electronics_w: 0.0,
            winch_w: 0.0,
            additional_load_w: 0.0,
            daily_usage_hours: 0.0,
            motoring_percent: 0.0,
            anchored_percent: 0.0,
            battery_type: BatteryType::default(),
            battery_voltage: DEFAULT_BATTERY_VOLTAGE,
            max_discharge_percent: DEFAULT_MAX_DISCHARGE_PERCENT,
            autonomy_days: 0.0,
            alternator_w: 0.0,
            solar_w: 0.0,
            wind_w: 0.0,
            shore_power_w: 0.0,
            cable_length_m: 0.0,
            voltage_drop_limit_percent: DEFAULT_VOLTAGE_DROP_LIMIT_PERCENT,
            ambient_temperature_c: DEFAULT_AMBIENT_TEMPERATURE_C,
            saltwater_exposure: false,
        }
    }
}

/// Floor for wattages and lengths: non-finite or negative becomes zero
fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

impl MarineInputs {
    /// Whether the record passes the minimum-validity gate for calculating.
    pub fn meets_validity_gate(&self) -> bool {
        self.vessel_length_m.is_finite() && self.vessel_length_m > 0.0
    }

    /// Copy with every wattage and length floored at zero and a non-finite
    /// temperature replaced by the reference temperature.
    ///
    /// Fields with their own fallback policy (usage hours, depth of
    /// discharge, autonomy, drop limit) are left for the component that owns
    /// the fallback.
    pub fn sanitized(&self) -> MarineInputs {
        MarineInputs {
            vessel_length_m: non_negative(self.vessel_length_m),
            navigation_lights_w: non_negative(self.navigation_lights_w),
            cabin_lights_w: non_negative(self.cabin_lights_w),
            galley_load_w: non_negative(self.galley_load_w),
            pumps_w: non_negative(self.pumps_w),
            fans_w: non_negative(self.fans_w),
            electronics_w: non_negative(self.electronics_w),
            winch_w: non_negative(self.winch_w),
            additional_load_w: non_negative(self.additional_load_w),
            motoring_percent: non_negative(self.motoring_percent),
            anchored_percent: non_negative(self.anchored_percent),
            battery_voltage: non_negative(self.battery_voltage),
            alternator_w: non_negative(self.alternator_w),
            solar_w: non_negative(self.solar_w),
            wind_w: non_negative(self.wind_w),
            shore_power_w: non_negative(self.shore_power_w),
            cable_length_m: non_negative(self.cable_length_m),
            ambient_temperature_c: if self.ambient_temperature_c.is_finite() {
                self.ambient_temperature_c
            } else {
                DEFAULT_AMBIENT_TEMPERATURE_C
            },
            ..self.clone()
        }
    }

    /// Strict validation for front ends that want to warn about values the
    /// engine will silently default. The engine itself never calls this.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.meets_validity_gate() {
            return Err(CalcError::invalid_input(
                "vessel_length_m",
                self.vessel_length_m.to_string(),
                "Vessel length must be positive",
            ));
        }
        let loads = [
            ("navigation_lights_w", self.navigation_lights_w),
            ("cabin_lights_w", self.cabin_lights_w),
            ("galley_load_w", self.galley_load_w),
            ("pumps_w", self.pumps_w),
            ("fans_w", self.fans_w),
            ("electronics_w", self.electronics_w),
            ("winch_w", self.winch_w),
            ("additional_load_w", self.additional_load_w),
            ("alternator_w", self.alternator_w),
            ("solar_w", self.solar_w),
            ("wind_w", self.wind_w),
            ("shore_power_w", self.shore_power_w),
            ("cable_length_m", self.cable_length_m),
        ];
        for (field, value) in loads {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), "Value cannot be negative"));
            }
        }
        if !(0.0..=24.0).contains(&self.daily_usage_hours) {
            return Err(CalcError::invalid_input(
                "daily_usage_hours",
                self.daily_usage_hours.to_string(),
                "Usage hours must be between 0 and 24",
            ));
        }
        if !(self.max_discharge_percent > 0.0 && self.max_discharge_percent <= 100.0) {
            return Err(CalcError::invalid_input(
                "max_discharge_percent",
                self.max_discharge_percent.to_string(),
                "Depth of discharge must be greater than 0 and at most 100",
            ));
        }
        if self.voltage_drop_limit_percent <= 0.0 || !self.voltage_drop_limit_percent.is_finite() {
            return Err(CalcError::invalid_input(
                "voltage_drop_limit_percent",
                self.voltage_drop_limit_percent.to_string(),
                "Voltage drop limit must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "vessel_length_m": 9.5, "cabin_lights_w": 40 }"#;
        let inputs: MarineInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.vessel_length_m, 9.5);
        assert_eq!(inputs.cabin_lights_w, 40.0);
        assert_eq!(inputs.system_voltage, SystemVoltage::V12);
        assert_eq!(inputs.max_discharge_percent, DEFAULT_MAX_DISCHARGE_PERCENT);
        assert_eq!(inputs.ambient_temperature_c, DEFAULT_AMBIENT_TEMPERATURE_C);
        assert_eq!(inputs.voltage_drop_limit_percent, DEFAULT_VOLTAGE_DROP_LIMIT_PERCENT);
    }

    #[test]
    fn test_system_voltage_serializes_as_number() {
        let json = serde_json::to_string(&SystemVoltage::V24).unwrap();
        assert_eq!(json, "24");
        let parsed: SystemVoltage = serde_json::from_str("48").unwrap();
        assert_eq!(parsed, SystemVoltage::V48);
        assert!(serde_json::from_str::<SystemVoltage>("36").is_err());
    }

    #[test]
    fn test_system_voltage_flexible_parse() {
        assert_eq!(SystemVoltage::from_str_flexible("24V").unwrap(), SystemVoltage::V24);
        assert_eq!(SystemVoltage::from_str_flexible(" 12 ").unwrap(), SystemVoltage::V12);
        assert!(SystemVoltage::from_str_flexible("110").is_err());
        assert!(SystemVoltage::from_str_flexible("twelve").is_err());
    }

    #[test]
    fn test_enum_flexible_parse() {
        assert_eq!(VesselType::from_str_flexible("Fishing Boat").unwrap(), VesselType::Fishing);
        assert_eq!(VesselType::from_str_flexible("narrow-boat").unwrap(), VesselType::Narrowboat);
        assert_eq!(BatteryType::from_str_flexible("lead_acid").unwrap(), BatteryType::LeadAcid);
        assert_eq!(BatteryType::from_str_flexible("LiFePO4").unwrap(), BatteryType::Lithium);
        assert_eq!(
            BatteryType::from_str_flexible("nicad").unwrap_err().error_code(),
            "UNKNOWN_VARIANT"
        );
    }

    #[test]
    fn test_battery_type_serialization() {
        let json = serde_json::to_string(&BatteryType::LeadAcid).unwrap();
        assert_eq!(json, "\"lead-acid\"");
    }

    #[test]
    fn test_sanitized_floors_bad_values() {
        let inputs = MarineInputs {
            galley_load_w: -50.0,
            solar_w: f64::NAN,
            cable_length_m: f64::INFINITY,
            ambient_temperature_c: f64::NAN,
            ..MarineInputs::default()
        };
        let clean = inputs.sanitized();
        assert_eq!(clean.galley_load_w, 0.0);
        assert_eq!(clean.solar_w, 0.0);
        assert_eq!(clean.cable_length_m, 0.0);
        assert_eq!(clean.ambient_temperature_c, DEFAULT_AMBIENT_TEMPERATURE_C);
    }

    #[test]
    fn test_validity_gate() {
        let mut inputs = MarineInputs::default();
        assert!(!inputs.meets_validity_gate());
        assert!(inputs.validate().is_err());

        inputs.vessel_length_m = 7.6;
        assert!(inputs.meets_validity_gate());
        assert!(inputs.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let inputs = MarineInputs {
            vessel_length_m: 10.0,
            daily_usage_hours: 30.0,
            ..MarineInputs::default()
        };
        let err = inputs.validate().unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "daily_usage_hours"));
    }
}
