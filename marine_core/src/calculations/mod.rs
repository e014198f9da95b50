//! # Sizing Calculations
//!
//! Each stage of the electrical sizing is a pure function in its own module.
//! Stages take plain numbers plus an [`EnginePolicy`](crate::policy::EnginePolicy)
//! and return a small JSON-serializable record:
//!
//! - [`loads`] - continuous, intermittent and peak load
//! - [`energy`] - daily amp-hour consumption
//! - [`battery`] - bank capacity, unit count and derating
//! - [`charging`] - charging yield and the daily energy balance
//! - [`cable`] - conductor size and voltage drop
//! - [`inverter`] - inverter rating and waveform
//! - [`compliance`] - ABYC E-11 / ISO 13297 rule table
//! - [`marine`] - the full pipeline, [`calculate_marine`]

pub mod battery;
pub mod cable;
pub mod charging;
pub mod compliance;
pub mod energy;
pub mod inverter;
pub mod loads;
pub mod marine;

// Re-export commonly used types
pub use compliance::{worst_status, ComplianceCheck, ComplianceStatus, Recommendation};
pub use marine::{calculate_marine, calculate_marine_with, MarineResults};
