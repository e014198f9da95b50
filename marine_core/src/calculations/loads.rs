//! # Load Aggregation
//!
//! Splits the appliance loads into continuous and intermittent groups and
//! produces the duty-weighted peak:
//!
//! ```text
//! continuous   = navigation lights + cabin lights + electronics
//! intermittent = galley + pumps + fans + winch + additional
//! peak         = continuous + intermittent × duty cycle
//! ```
//!
//! A single duty cycle applies to every intermittent category.

use serde::{Deserialize, Serialize};

use crate::inputs::MarineInputs;
use crate::policy::EnginePolicy;
use crate::units::Watts;

/// Aggregated electrical load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadSummary {
    /// Loads that draw for the whole usage period (W)
    pub continuous_w: f64,
    /// Loads that cycle on and off (W, nameplate)
    pub intermittent_w: f64,
    /// Continuous plus duty-weighted intermittent (W)
    pub peak_w: f64,
}

/// Aggregate the appliance loads of `inputs`.
///
/// Inputs are expected to be floored already (see
/// [`MarineInputs::sanitized`]); the function has no error conditions.
///
/// # Example
///
/// ```rust
/// use marine_core::calculations::loads::aggregate_loads;
/// use marine_core::inputs::MarineInputs;
/// use marine_core::policy::EnginePolicy;
///
/// let inputs = MarineInputs {
///     navigation_lights_w: 15.0,
///     cabin_lights_w: 60.0,
///     electronics_w: 80.0,
///     galley_load_w: 120.0,
///     ..MarineInputs::default()
/// };
/// let loads = aggregate_loads(&inputs, &EnginePolicy::default());
/// assert_eq!(loads.continuous_w, 155.0);
/// assert!((loads.peak_w - 191.0).abs() < 1e-9);
/// ```
pub fn aggregate_loads(inputs: &MarineInputs, policy: &EnginePolicy) -> LoadSummary {
    let continuous = Watts(inputs.navigation_lights_w) + Watts(inputs.cabin_lights_w) + Watts(inputs.electronics_w);

    let intermittent = Watts(inputs.galley_load_w)
        + Watts(inputs.pumps_w)
        + Watts(inputs.fans_w)
        + Watts(inputs.winch_w)
        + Watts(inputs.additional_load_w);

    let peak = continuous + intermittent * policy.duty_cycle;

    LoadSummary {
        continuous_w: continuous.value(),
        intermittent_w: intermittent.value(),
        peak_w: peak.value(),
    }
}
