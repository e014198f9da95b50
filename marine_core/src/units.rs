//! # Unit Types
//!
//! Type-safe wrappers for the electrical units used by the sizing engine.
//! They are plain f64 newtypes so JSON stays clean (just numbers) while the
//! conversions between power, energy and charge are spelled out in one place.
//!
//! ## Units
//!
//! - Power: watts (W)
//! - Energy: watt-hours (Wh)
//! - Charge: amp-hours (Ah)
//! - Potential: volts (V)
//! - Current: amps (A)
//! - Length: metres (m)
//!
//! ## Example
//!
//! ```rust
//! use marine_core::units::{AmpHours, Volts, Watts};
//!
//! let load = Watts(120.0);
//! let energy = load.over_hours(10.0);        // 1200 Wh
//! let charge: AmpHours = energy.at(Volts(12.0));
//! assert!((charge.0 - 100.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

// ============================================================================
// Power and Energy
// ============================================================================

/// Power in watts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watts(pub f64);

/// Energy in watt-hours
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WattHours(pub f64);

/// Charge in amp-hours
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmpHours(pub f64);

impl Watts {
    /// Energy delivered when this power is drawn for `hours`
    pub fn over_hours(self, hours: f64) -> WattHours {
        WattHours(self.0 * hours)
    }

    /// Current drawn at the given potential, I = P / V
    pub fn current_at(self, volts: Volts) -> Amps {
        Amps(self.0 / volts.0)
    }
}

impl WattHours {
    /// Charge equivalent at the given potential, Ah = Wh / V
    pub fn at(self, volts: Volts) -> AmpHours {
        AmpHours(self.0 / volts.0)
    }
}

// ============================================================================
// Electrical
// ============================================================================

/// Potential in volts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volts(pub f64);

/// Current in amps
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amps(pub f64);

impl Amps {
    /// Voltage lost across a conductor of total resistance `ohms`, V = I·R
    pub fn drop_across(self, ohms: f64) -> Volts {
        Volts(self.0 * ohms)
    }
}

impl Volts {
    /// This potential as a percentage of `nominal`
    pub fn percent_of(self, nominal: Volts) -> f64 {
        self.0 / nominal.0 * 100.0
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metres(pub f64);

impl Metres {
    /// Conductor length for a DC circuit: the run out to the load and back
    pub fn round_trip(self) -> Metres {
        Metres(self.0 * 2.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Watts);
impl_arithmetic!(WattHours);
impl_arithmetic!(AmpHours);
impl_arithmetic!(Volts);
impl_arithmetic!(Amps);
impl_arithmetic!(Metres);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_to_charge() {
        let ah = Watts(60.0).over_hours(8.0).at(Volts(24.0));
        assert!((ah.0 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_current_and_drop() {
        let amps = Watts(240.0).current_at(Volts(12.0));
        assert_eq!(amps.0, 20.0);

        let drop = amps.drop_across(0.018);
        assert!((drop.percent_of(Volts(12.0)) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_trip_length() {
        assert_eq!(Metres(7.5).round_trip(), Metres(15.0));
    }

    #[test]
    fn test_arithmetic() {
        let a = Watts(100.0);
        let b = Watts(40.0);
        assert_eq!((a + b).0, 140.0);
        assert_eq!((a * 0.3).0, 30.0);
    }

    #[test]
    fn test_serialization_is_transparent() {
        let json = serde_json::to_string(&AmpHours(150.0)).unwrap();
        assert_eq!(json, "150.0");
    }
}
