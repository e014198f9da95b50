//! # marine_core - Marine Electrical Load & Energy Balance Engine
//!
//! `marine_core` sizes the DC electrical system of a small vessel: it turns
//! appliance loads, usage pattern, battery preferences and charging sources
//! into a recommended battery bank, charging balance, cable size, inverter
//! and a set of ABYC E-11 / ISO 13297 compliance findings. All inputs and
//! outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: one pure function from inputs to results
//! - **Total**: every edge condition has a named fallback; nothing panics
//! - **JSON-First**: all types implement Serialize/Deserialize
//! - **Configurable**: constants live in an [`EnginePolicy`] loadable from TOML
//!
//! ## Quick Start
//!
//! ```rust
//! use marine_core::{calculate_marine, MarineInputs};
//!
//! let inputs = MarineInputs {
//!     vessel_length_m: 9.0,
//!     cabin_lights_w: 40.0,
//!     electronics_w: 60.0,
//!     daily_usage_hours: 8.0,
//!     solar_w: 200.0,
//!     ..MarineInputs::default()
//! };
//!
//! let results = calculate_marine(&inputs);
//! assert_eq!(results.peak_load_w, 100.0);
//!
//! let json = serde_json::to_string_pretty(&results).unwrap();
//! assert!(json.contains("compliance_checks"));
//! ```
//!
//! ## Modules
//!
//! - [`inputs`] - the input record and its enumerations
//! - [`form`] - raw text form state with a single commit into [`MarineInputs`]
//! - [`calculations`] - sizing stages and the pipeline
//! - [`policy`] - engine constants and tables, TOML-loadable
//! - [`units`] - type-safe unit wrappers
//! - [`errors`] - structured error types

pub mod calculations;
pub mod errors;
pub mod form;
pub mod inputs;
pub mod policy;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate_marine, calculate_marine_with, MarineResults};
pub use errors::{CalcError, CalcResult};
pub use form::{FormField, MarineForm};
pub use inputs::{BatteryType, MarineInputs, SystemVoltage, VesselType};
pub use policy::{EnginePolicy, DEFAULT_POLICY};
