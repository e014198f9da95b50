//! # Input Form
//!
//! Raw text entry for front ends. A [`MarineForm`] keeps exactly what the
//! user typed, one string per [`FormField`], and turns it into
//! [`MarineInputs`] in a single [`commit`](MarineForm::commit). Blank or
//! unparsable entries take the field's documented default; wattages and
//! lengths are floored at zero.
//!
//! ```rust
//! use marine_core::form::{FormField, MarineForm};
//!
//! let mut form = MarineForm::new();
//! form.set(FormField::VesselLength, "7.6");
//! form.set(FormField::CabinLights, "60");
//! form.set(FormField::Galley, "not a number");
//! assert!(form.can_calculate());
//!
//! let inputs = form.commit();
//! assert_eq!(inputs.cabin_lights_w, 60.0);
//! assert_eq!(inputs.galley_load_w, 0.0);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{CalcError, CalcResult};
use crate::inputs::{BatteryType, MarineInputs, SystemVoltage, VesselType};

/// One editable input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    VesselType,
    VesselLength,
    SystemVoltage,
    NavigationLights,
    CabinLights,
    Galley,
    Pumps,
    Fans,
    Electronics,
    Winch,
    AdditionalLoad,
    DailyUsageHours,
    MotoringPercent,
    AnchoredPercent,
    BatteryType,
    BatteryVoltage,
    MaxDischarge,
    AutonomyDays,
    Alternator,
    Solar,
    Wind,
    ShorePower,
    CableLength,
    VoltageDropLimit,
    AmbientTemperature,
    SaltwaterExposure,
}

/// How a field's text is interpreted on commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free number, default when blank
    Number,
    /// Number floored at zero
    NonNegative,
    /// One of a fixed set of names
    Choice,
    /// Yes/no
    Flag,
}

impl FormField {
    pub const ALL: [FormField; 26] = [
        FormField::VesselType,
        FormField::VesselLength,
        FormField::SystemVoltage,
        FormField::NavigationLights,
        FormField::CabinLights,
        FormField::Galley,
        FormField::Pumps,
        FormField::Fans,
        FormField::Electronics,
        FormField::Winch,
        FormField::AdditionalLoad,
        FormField::DailyUsageHours,
        FormField::MotoringPercent,
        FormField::AnchoredPercent,
        FormField::BatteryType,
        FormField::BatteryVoltage,
        FormField::MaxDischarge,
        FormField::AutonomyDays,
        FormField::Alternator,
        FormField::Solar,
        FormField::Wind,
        FormField::ShorePower,
        FormField::CableLength,
        FormField::VoltageDropLimit,
        FormField::AmbientTemperature,
        FormField::SaltwaterExposure,
    ];

    /// Key of the matching [`MarineInputs`] field
    pub fn key(&self) -> &'static str {
        match self {
            FormField::VesselType => "vessel_type",
            FormField::VesselLength => "vessel_length_m",
            FormField::SystemVoltage => "system_voltage",
            FormField::NavigationLights => "navigation_lights_w",
            FormField::CabinLights => "cabin_lights_w",
            FormField::Galley => "galley_load_w",
            FormField::Pumps => "pumps_w",
            FormField::Fans => "fans_w",
            FormField::Electronics => "electronics_w",
            FormField::Winch => "winch_w",
            FormField::AdditionalLoad => "additional_load_w",
            FormField::DailyUsageHours => "daily_usage_hours",
            FormField::MotoringPercent => "motoring_percent",
            FormField::AnchoredPercent => "anchored_percent",
            FormField::BatteryType => "battery_type",
            FormField::BatteryVoltage => "battery_voltage",
            FormField::MaxDischarge => "max_discharge_percent",
            FormField::AutonomyDays => "autonomy_days",
            FormField::Alternator => "alternator_w",
            FormField::Solar => "solar_w",
            FormField::Wind => "wind_w",
            FormField::ShorePower => "shore_power_w",
            FormField::CableLength => "cable_length_m",
            FormField::VoltageDropLimit => "voltage_drop_limit_percent",
            FormField::AmbientTemperature => "ambient_temperature_c",
            FormField::SaltwaterExposure => "saltwater_exposure",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            FormField::VesselType => "Vessel type",
            FormField::VesselLength => "Vessel length (m)",
            FormField::SystemVoltage => "System voltage",
            FormField::NavigationLights => "Navigation lights (W)",
            FormField::CabinLights => "Cabin lights (W)",
            FormField::Galley => "Galley (W)",
            FormField::Pumps => "Pumps (W)",
            FormField::Fans => "Fans (W)",
            FormField::Electronics => "Electronics (W)",
            FormField::Winch => "Winch (W)",
            FormField::AdditionalLoad => "Additional load (W)",
            FormField::DailyUsageHours => "Daily usage (h)",
            FormField::MotoringPercent => "Motoring (%)",
            FormField::AnchoredPercent => "Anchored (%)",
            FormField::BatteryType => "Battery type",
            FormField::BatteryVoltage => "Battery voltage (V)",
            FormField::MaxDischarge => "Max discharge (%)",
            FormField::AutonomyDays => "Autonomy (days)",
            FormField::Alternator => "Alternator (W)",
            FormField::Solar => "Solar (W)",
            FormField::Wind => "Wind (W)",
            FormField::ShorePower => "Shore power (W)",
            FormField::CableLength => "Cable run (m)",
            FormField::VoltageDropLimit => "Voltage drop limit (%)",
            FormField::AmbientTemperature => "Ambient temperature (°C)",
            FormField::SaltwaterExposure => "Saltwater exposure",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FormField::VesselType | FormField::SystemVoltage | FormField::BatteryType => FieldKind::Choice,
            FormField::SaltwaterExposure => FieldKind::Flag,
            FormField::VesselLength
            | FormField::DailyUsageHours
            | FormField::MaxDischarge
            | FormField::AutonomyDays
            | FormField::VoltageDropLimit
            | FormField::AmbientTemperature => FieldKind::Number,
            _ => FieldKind::NonNegative,
        }
    }

    /// Parse a field name. Accepts the input key (`galley_load_w`), the key
    /// without its unit suffix (`galley_load`), camelCase and kebab-case.
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let wanted = normalize(s);
        FormField::ALL
            .into_iter()
            .find(|field| {
                let key = field.key();
                normalize(key) == wanted || normalize(strip_unit(key)) == wanted || normalize(&format!("{:?}", field)) == wanted
            })
            .ok_or_else(|| CalcError::unknown_variant("form field", s))
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace([' ', '_', '-'], "")
}

fn strip_unit(key: &str) -> &str {
    ["_w", "_m", "_c", "_percent"]
        .iter()
        .find_map(|suffix| key.strip_suffix(suffix))
        .unwrap_or(key)
}

/// Parse `raw` as a finite number, or return `default`.
pub fn parse_or(raw: &str, default: f64) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => default,
    }
}

/// Parse a yes/no entry, or return `default`.
pub fn parse_flag_or(raw: &str, default: bool) -> bool {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => true,
        "false" | "no" | "n" | "off" | "0" => false,
        _ => default,
    }
}

/// Raw form state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarineForm {
    values: BTreeMap<FormField, String>,
}

impl MarineForm {
    /// Empty form; every field commits to its default
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: FormField, raw: impl Into<String>) {
        self.values.insert(field, raw.into());
    }

    /// Set a field by name, see [`FormField::from_str_flexible`]
    pub fn set_by_key(&mut self, key: &str, raw: impl Into<String>) -> CalcResult<FormField> {
        let field = FormField::from_str_flexible(key)?;
        self.set(field, raw);
        Ok(field)
    }

    /// Apply a `key=value` assignment
    pub fn apply_assignment(&mut self, assignment: &str) -> CalcResult<FormField> {
        let (key, raw) = assignment.split_once('=').ok_or_else(|| {
            CalcError::invalid_input("assignment", assignment, "Expected key=value")
        })?;
        self.set_by_key(key, raw.trim())
    }

    /// Current text of a field; blank when never set
    pub fn get(&self, field: FormField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn clear(&mut self, field: FormField) {
        self.values.remove(&field);
    }

    /// Whether the form passes the validity gate (vessel length > 0)
    pub fn can_calculate(&self) -> bool {
        self.number(FormField::VesselLength, 0.0) > 0.0
    }

    /// Derive the calculator inputs.
    pub fn commit(&self) -> MarineInputs {
        let defaults = MarineInputs::default();
        MarineInputs {
            vessel_type: self.choice(FormField::VesselType, VesselType::from_str_flexible, defaults.vessel_type),
            vessel_length_m: self.number(FormField::VesselLength, defaults.vessel_length_m),
            system_voltage: self.choice(
                FormField::SystemVoltage,
                SystemVoltage::from_str_flexible,
                defaults.system_voltage,
            ),
            navigation_lights_w: self.non_negative(FormField::NavigationLights, defaults.navigation_lights_w),
            cabin_lights_w: self.non_negative(FormField::CabinLights, defaults.cabin_lights_w),
            galley_load_w: self.non_negative(FormField::Galley, defaults.galley_load_w),
            pumps_w: self.non_negative(FormField::Pumps, defaults.pumps_w),
            fans_w: self.non_negative(FormField::Fans, defaults.fans_w),
            electronics_w: self.non_negative(FormField::Electronics, defaults.electronics_w),
            winch_w: self.non_negative(FormField::Winch, defaults.winch_w),
            additional_load_w: self.non_negative(FormField::AdditionalLoad, defaults.additional_load_w),
            daily_usage_hours: self.number(FormField::DailyUsageHours, defaults.daily_usage_hours),
            motoring_percent: self.non_negative(FormField::MotoringPercent, defaults.motoring_percent),
            anchored_percent: self.non_negative(FormField::AnchoredPercent, defaults.anchored_percent),
            battery_type: self.choice(FormField::BatteryType, BatteryType::from_str_flexible, defaults.battery_type),
            battery_voltage: self.non_negative(FormField::BatteryVoltage, defaults.battery_voltage),
            max_discharge_percent: self.number(FormField::MaxDischarge, defaults.max_discharge_percent),
            autonomy_days: self.number(FormField::AutonomyDays, defaults.autonomy_days),
            alternator_w: self.non_negative(FormField::Alternator, defaults.alternator_w),
            solar_w: self.non_negative(FormField::Solar, defaults.solar_w),
            wind_w: self.non_negative(FormField::Wind, defaults.wind_w),
            shore_power_w: self.non_negative(FormField::ShorePower, defaults.shore_power_w),
            cable_length_m: self.non_negative(FormField::CableLength, defaults.cable_length_m),
            voltage_drop_limit_percent: self.number(
                FormField::VoltageDropLimit,
                defaults.voltage_drop_limit_percent,
            ),
            ambient_temperature_c: self.number(FormField::AmbientTemperature, defaults.ambient_temperature_c),
            saltwater_exposure: parse_flag_or(self.get(FormField::SaltwaterExposure), defaults.saltwater_exposure),
        }
    }

    fn number(&self, field: FormField, default: f64) -> f64 {
        parse_or(self.get(field), default)
    }

    fn non_negative(&self, field: FormField, default: f64) -> f64 {
        self.number(field, default).max(0.0)
    }

    fn choice<T: Copy>(&self, field: FormField, parse: fn(&str) -> CalcResult<T>, default: T) -> T {
        let raw = self.get(field).trim();
        if raw.is_empty() {
            return default;
        }
        parse(raw).unwrap_or_else(|err| {
            warn!(field = field.key(), error = %err, "unrecognised choice, using default");
            default
        })
    }
}

/// Text for a choice field, as it appears in JSON
fn choice_text<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

impl From<&MarineInputs> for MarineForm {
    fn from(inputs: &MarineInputs) -> Self {
        let mut form = MarineForm::new();
        for field in FormField::ALL {
            let text = match field {
                FormField::VesselType => choice_text(&inputs.vessel_type),
                FormField::VesselLength => inputs.vessel_length_m.to_string(),
                FormField::SystemVoltage => choice_text(&inputs.system_voltage),
                FormField::NavigationLights => inputs.navigation_lights_w.to_string(),
                FormField::CabinLights => inputs.cabin_lights_w.to_string(),
                FormField::Galley => inputs.galley_load_w.to_string(),
                FormField::Pumps => inputs.pumps_w.to_string(),
                FormField::Fans => inputs.fans_w.to_string(),
                FormField::Electronics => inputs.electronics_w.to_string(),
                FormField::Winch => inputs.winch_w.to_string(),
                FormField::AdditionalLoad => inputs.additional_load_w.to_string(),
                FormField::DailyUsageHours => inputs.daily_usage_hours.to_string(),
                FormField::MotoringPercent => inputs.motoring_percent.to_string(),
                FormField::AnchoredPercent => inputs.anchored_percent.to_string(),
                FormField::BatteryType => choice_text(&inputs.battery_type),
                FormField::BatteryVoltage => inputs.battery_voltage.to_string(),
                FormField::MaxDischarge => inputs.max_discharge_percent.to_string(),
                FormField::AutonomyDays => inputs.autonomy_days.to_string(),
                FormField::Alternator => inputs.alternator_w.to_string(),
                FormField::Solar => inputs.solar_w.to_string(),
                FormField::Wind => inputs.wind_w.to_string(),
                FormField::ShorePower => inputs.shore_power_w.to_string(),
                FormField::CableLength => inputs.cable_length_m.to_string(),
                FormField::VoltageDropLimit => inputs.voltage_drop_limit_percent.to_string(),
                FormField::AmbientTemperature => inputs.ambient_temperature_c.to_string(),
                FormField::SaltwaterExposure => inputs.saltwater_exposure.to_string(),
            };
            form.set(field, text);
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{DEFAULT_AMBIENT_TEMPERATURE_C, DEFAULT_MAX_DISCHARGE_PERCENT};

    #[test]
    fn test_empty_form_commits_defaults() {
        let form = MarineForm::new();
        assert!(!form.can_calculate());
        assert_eq!(form.commit(), MarineInputs::default());
    }

    #[test]
    fn test_unparsable_numbers_default() {
        let mut form = MarineForm::new();
        form.set(FormField::MaxDischarge, "eighty");
        form.set(FormField::AmbientTemperature, "");
        form.set(FormField::Solar, "NaN");
        let inputs = form.commit();
        assert_eq!(inputs.max_discharge_percent, DEFAULT_MAX_DISCHARGE_PERCENT);
        assert_eq!(inputs.ambient_temperature_c, DEFAULT_AMBIENT_TEMPERATURE_C);
        assert_eq!(inputs.solar_w, 0.0);
    }

    #[test]
    fn test_loads_floored_temperature_not() {
        let mut form = MarineForm::new();
        form.set(FormField::Winch, "-1200");
        form.set(FormField::AmbientTemperature, "-10");
        let inputs = form.commit();
        assert_eq!(inputs.winch_w, 0.0);
        assert_eq!(inputs.ambient_temperature_c, -10.0);
    }

    #[test]
    fn test_choices() {
        let mut form = MarineForm::new();
        form.set(FormField::SystemVoltage, "24V");
        form.set(FormField::BatteryType, "LiFePO4");
        form.set(FormField::VesselType, "submarine");
        let inputs = form.commit();
        assert_eq!(inputs.system_voltage, SystemVoltage::V24);
        assert_eq!(inputs.battery_type, BatteryType::Lithium);
        assert_eq!(inputs.vessel_type, VesselType::default());
    }

    #[test]
    fn test_flags() {
        assert!(parse_flag_or("yes", false));
        assert!(!parse_flag_or("Off", true));
        assert!(parse_flag_or("maybe", true));
    }

    #[test]
    fn test_gate() {
        let mut form = MarineForm::new();
        form.set(FormField::VesselLength, "0");
        assert!(!form.can_calculate());
        form.set(FormField::VesselLength, " 8.5 ");
        assert!(form.can_calculate());
        form.clear(FormField::VesselLength);
        assert!(!form.can_calculate());
    }

    #[test]
    fn test_field_names() {
        assert_eq!(FormField::from_str_flexible("galley_load_w").unwrap(), FormField::Galley);
        assert_eq!(FormField::from_str_flexible("galley-load").unwrap(), FormField::Galley);
        assert_eq!(FormField::from_str_flexible("vesselLength").unwrap(), FormField::VesselLength);
        assert_eq!(FormField::from_str_flexible("shorePower").unwrap(), FormField::ShorePower);
        assert_eq!(
            FormField::from_str_flexible("max_discharge").unwrap(),
            FormField::MaxDischarge
        );
        assert_eq!(
            FormField::from_str_flexible("warp_drive").unwrap_err().error_code(),
            "UNKNOWN_VARIANT"
        );
        for field in FormField::ALL {
            assert_eq!(FormField::from_str_flexible(field.key()).unwrap(), field);
        }
    }

    #[test]
    fn test_assignments() {
        let mut form = MarineForm::new();
        assert_eq!(form.apply_assignment("solar=150").unwrap(), FormField::Solar);
        assert_eq!(form.get(FormField::Solar), "150");
        assert!(form.apply_assignment("solar").is_err());
        assert!(form.apply_assignment("flux=1").is_err());
    }

    #[test]
    fn test_round_trip_from_inputs() {
        let inputs = MarineInputs {
            vessel_type: VesselType::Catamaran,
            vessel_length_m: 12.2,
            system_voltage: SystemVoltage::V24,
            cabin_lights_w: 45.5,
            winch_w: 1500.0,
            battery_type: BatteryType::LeadAcid,
            solar_w: 400.0,
            ambient_temperature_c: -3.5,
            saltwater_exposure: true,
            ..MarineInputs::default()
        };
        let form = MarineForm::from(&inputs);
        assert_eq!(form.get(FormField::BatteryType), "lead-acid");
        assert_eq!(form.get(FormField::SystemVoltage), "24");
        assert_eq!(form.commit(), inputs);
    }
}
