//! # Inverter Sizing
//!
//! Maps the peak load, plus headroom for start-up surges, onto the smallest
//! standard continuous rating. Loads beyond the largest standard rating are
//! rounded up to the next oversize step.

use serde::{Deserialize, Serialize};

use super::battery::round_up_to;
use crate::policy::EnginePolicy;

pub const INVERTER_NOT_REQUIRED: &str = "Not required";
pub const PURE_SINE_CHARGER: &str = "Pure sine wave inverter/charger";
pub const PURE_SINE: &str = "Pure sine wave";
pub const MODIFIED_SINE: &str = "Modified sine wave";

/// Recommended inverter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InverterSelection {
    /// Continuous rating (W)
    pub size_w: f64,
    pub inverter_type: String,
}

/// Size an inverter for `peak_load_w`.
///
/// Sensitive electronics call for a pure sine output; large inverters are
/// specified as combined inverter/chargers.
///
/// # Example
///
/// ```rust
/// use marine_core::calculations::inverter::size_inverter;
/// use marine_core::policy::EnginePolicy;
///
/// // 700 W × 1.25 = 875 W → 1000 W
/// let inverter = size_inverter(700.0, 80.0, &EnginePolicy::default());
/// assert_eq!(inverter.size_w, 1000.0);
/// assert_eq!(inverter.inverter_type, "Pure sine wave");
/// ```
pub fn size_inverter(peak_load_w: f64, electronics_w: f64, policy: &EnginePolicy) -> InverterSelection {
    if !(peak_load_w.is_finite() && peak_load_w > 0.0) {
        return InverterSelection {
            size_w: 0.0,
            inverter_type: INVERTER_NOT_REQUIRED.to_string(),
        };
    }

    let inverter = &policy.inverter;
    let required = peak_load_w * inverter.headroom;
    let size_w = inverter
        .standard_sizes_w
        .iter()
        .copied()
        .find(|&rating| rating >= required)
        .unwrap_or_else(|| round_up_to(required, inverter.oversize_step_w));

    let inverter_type = if size_w > inverter.charger_threshold_w {
        PURE_SINE_CHARGER
    } else if electronics_w > 0.0 {
        PURE_SINE
    } else {
        MODIFIED_SINE
    };

    InverterSelection {
        size_w,
        inverter_type: inverter_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rating() {
        // 191 × 1.25 = 238.75 → 300
        let inverter = size_inverter(191.0, 80.0, &EnginePolicy::default());
        assert_eq!(inverter.size_w, 300.0);
        assert_eq!(inverter.inverter_type, PURE_SINE);
    }

    #[test]
    fn test_exact_rating_not_bumped() {
        // 800 × 1.25 = 1000
        let inverter = size_inverter(800.0, 0.0, &EnginePolicy::default());
        assert_eq!(inverter.size_w, 1000.0);
        assert_eq!(inverter.inverter_type, MODIFIED_SINE);
    }

    #[test]
    fn test_large_load_is_charger() {
        let inverter = size_inverter(2000.0, 0.0, &EnginePolicy::default());
        assert_eq!(inverter.size_w, 3000.0);
        assert_eq!(inverter.inverter_type, PURE_SINE_CHARGER);
    }

    #[test]
    fn test_beyond_table_rounds_up() {
        // 5000 × 1.25 = 6250 → 7000
        let inverter = size_inverter(5000.0, 0.0, &EnginePolicy::default());
        assert_eq!(inverter.size_w, 7000.0);
    }

    #[test]
    fn test_no_load() {
        let inverter = size_inverter(0.0, 0.0, &EnginePolicy::default());
        assert_eq!(inverter.size_w, 0.0);
        assert_eq!(inverter.inverter_type, INVERTER_NOT_REQUIRED);
    }
}
