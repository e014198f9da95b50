//! # Cable & Voltage-Drop Sizing
//!
//! Picks the smallest conductor from the policy cable table whose voltage
//! drop stays within the limit. DC circuits run out to the load and back, so
//! the conductor length is twice the cable run:
//!
//! ```text
//! I      = P / V
//! drop % = 2 × I × L × R/m / V × 100
//! ```
//!
//! When no size satisfies the limit the largest entry is returned with
//! `table_exhausted` set; the compliance evaluator reports it as
//! non-compliant.
//!
//! Saltwater exposure selects tinned conductors, which carry slightly higher
//! resistance than plain copper.
//!
//! Selection is by voltage drop alone. The chosen size's current rating is
//! carried through in `rated_current_a` and checked against the peak current
//! by the `cable-ampacity` compliance rule.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::energy::effective_system_voltage;
use crate::policy::{CableSpec, EnginePolicy};
use crate::units::{Amps, Metres, Volts, Watts};

/// Label for conductors in saltwater-exposed installations
pub const TINNED_CABLE_TYPE: &str = "Tinned marine-grade copper";

/// Label for conductors in sheltered installations
pub const STANDARD_CABLE_TYPE: &str = "Standard marine-grade copper";

/// Selected conductor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableSelection {
    /// Conductor cross-section (mm²)
    pub cable_size_mm2: f64,
    /// Conductor type label
    pub cable_type: String,
    /// Voltage drop with the selected size (%)
    pub actual_drop_percent: f64,
    /// Drop limit the selection was made against (%)
    pub drop_limit_percent: f64,
    /// Current carried at peak load (A)
    pub peak_current_a: f64,
    /// Continuous current rating of the selected size (A)
    pub rated_current_a: f64,
    /// True when even the largest size exceeds the drop limit
    pub table_exhausted: bool,
}

impl CableSelection {
    pub fn within_limit(&self) -> bool {
        !self.table_exhausted && self.actual_drop_percent <= self.drop_limit_percent
    }
}

/// Conductor label for the installation environment
pub fn cable_type_for(saltwater_exposure: bool) -> &'static str {
    if saltwater_exposure {
        TINNED_CABLE_TYPE
    } else {
        STANDARD_CABLE_TYPE
    }
}

/// Voltage drop (%) across a round-trip run of `cable` carrying `current_a`.
pub fn voltage_drop_percent(cable: &CableSpec, tinned: bool, current_a: f64, length_m: f64, volts: f64) -> f64 {
    let conductor = Metres(length_m).round_trip();
    let resistance = conductor.value() * cable.ohm_per_m(tinned);
    let drop = Amps(current_a).drop_across(resistance);
    drop.percent_of(Volts(volts))
}

/// Drop limit to size against: the given one unless negative or
/// non-finite, in which case the policy fallback.
fn effective_drop_limit(limit_percent: f64, policy: &EnginePolicy) -> f64 {
    if limit_percent.is_finite() && limit_percent >= 0.0 {
        limit_percent
    } else {
        warn!(
            limit_percent,
            fallback = policy.fallback_voltage_drop_limit_percent,
            "unusable voltage drop limit, using fallback"
        );
        policy.fallback_voltage_drop_limit_percent
    }
}

/// Select the minimum conductor for the peak load.
///
/// # Example
///
/// ```rust
/// use marine_core::calculations::cable::size_cable;
/// use marine_core::policy::EnginePolicy;
///
/// // 240 W at 12 V = 20 A over a 5 m run, 3 % limit
/// let cable = size_cable(240.0, 12.0, 5.0, 3.0, false, &EnginePolicy::default());
/// assert_eq!(cable.cable_size_mm2, 16.0);
/// assert!(cable.within_limit());
/// ```
pub fn size_cable(
    peak_load_w: f64,
    system_voltage: f64,
    cable_length_m: f64,
    voltage_drop_limit_percent: f64,
    saltwater_exposure: bool,
    policy: &EnginePolicy,
) -> CableSelection {
    let volts = effective_system_voltage(system_voltage, policy);
    let limit = effective_drop_limit(voltage_drop_limit_percent, policy);
    let current = Watts(peak_load_w.max(0.0)).current_at(Volts(volts)).value();
    let length = if cable_length_m.is_finite() { cable_length_m.max(0.0) } else { 0.0 };
    let cable_type = cable_type_for(saltwater_exposure).to_string();

    let drop_for = |cable: &CableSpec| voltage_drop_percent(cable, saltwater_exposure, current, length, volts);

    if let Some(cable) = policy.cables.iter().find(|c| drop_for(c) <= limit) {
        let actual = drop_for(cable);
        debug!(size_mm2 = cable.size_mm2, drop_percent = actual, "cable selected");
        return CableSelection {
            cable_size_mm2: cable.size_mm2,
            cable_type,
            actual_drop_percent: actual,
            drop_limit_percent: limit,
            peak_current_a: current,
            rated_current_a: cable.max_current_a,
            table_exhausted: false,
        };
    }

    // Policy validation guarantees a non-empty table; an empty one from an
    // unvalidated policy reports a zero size.
    let largest = policy.cables.last().copied();
    let (size, actual, rating) = match largest {
        Some(cable) => (cable.size_mm2, drop_for(&cable), cable.max_current_a),
        None => (0.0, f64::MAX, 0.0),
    };
    warn!(
        current_a = current,
        length_m = length,
        limit_percent = limit,
        size_mm2 = size,
        drop_percent = actual,
        "no cable size meets the voltage drop limit"
    );
    CableSelection {
        cable_size_mm2: size,
        cable_type,
        actual_drop_percent: actual,
        drop_limit_percent: limit,
        peak_current_a: current,
        rated_current_a: rating,
        table_exhausted: true,
    }
}
