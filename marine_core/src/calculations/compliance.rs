//! # Compliance Rules
//!
//! A fixed table of rules, each checking the derived figures against one
//! requirement of ABYC E-11 or ISO 13297. Rules are plain data
//! ([`ComplianceRule`]) folded over by [`evaluate_compliance`], so adding a
//! regulation means adding a table entry.
//!
//! Every rule classifies independently into a [`RuleOutcome`]:
//!
//! - `Verdict` - one check, plus at most one recommendation
//! - `NotApplicable` - a compliant check with an empty message
//! - `Unavailable` - the rule lacked the data to decide and is left out of
//!   the check list rather than reported as a pass
//!
//! | Rule                  | Regulation | Non-compliant / warning when                      |
//! |-----------------------|------------|---------------------------------------------------|
//! | voltage-drop          | ABYC E-11  | drop over limit / within 10 % of limit            |
//! | cable-ampacity        | ABYC E-11  | peak current over the size's rating / -           |
//! | energy-balance        | ABYC E-11  | - / daily deficit                                  |
//! | battery-discharge     | ISO 13297  | DoD 20 points over ceiling / over ceiling          |
//! | battery-voltage       | ISO 13297  | battery V does not divide the bank V / -           |
//! | battery-temperature   | ISO 13297  | - / lithium below 0 °C or compartment over 45 °C   |
//! | conductor-material    | ABYC E-11  | untinned in saltwater / -                          |
//! | shore-power-isolation | ISO 13297  | - / - (recommendation only)                        |
//! | system-current        | ABYC E-11  | - / peak current over 150 A                        |

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::battery::BatteryBank;
use super::cable::{CableSelection, TINNED_CABLE_TYPE};
use super::charging::ChargingBalance;
use super::loads::LoadSummary;
use crate::inputs::{BatteryType, MarineInputs, SystemVoltage};
use crate::policy::EnginePolicy;

/// Regulation identifiers cited by the rule table.
pub mod regulation {
    /// AC and DC electrical systems on boats
    pub const ABYC_E11: &str = "ABYC E-11";
    /// Small craft electrical systems
    pub const ISO_13297: &str = "ISO 13297";
}

/// Recommendation categories
pub mod category {
    pub const CABLING: &str = "Cabling";
    pub const CHARGING: &str = "Charging";
    pub const BATTERY: &str = "Battery";
    pub const ENVIRONMENT: &str = "Environment";
    pub const SHORE_POWER: &str = "Shore Power";
    pub const SYSTEM_VOLTAGE: &str = "System Voltage";
}

/// Outcome of a single compliance check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceStatus {
    Compliant,
    Warning,
    NonCompliant,
}

impl ComplianceStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "Compliant",
            ComplianceStatus::Warning => "Warning",
            ComplianceStatus::NonCompliant => "Non-compliant",
        }
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One evaluated rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    /// Regulation identifier, e.g. "ABYC E-11"
    pub regulation: String,
    /// Rule name, e.g. "voltage-drop"
    pub rule: String,
    pub status: ComplianceStatus,
    /// Human-readable finding; empty when the rule does not apply
    pub message: String,
}

/// Suggested remedy or improvement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub message: String,
}

impl Recommendation {
    pub fn new(category: &str, message: impl Into<String>) -> Self {
        Recommendation {
            category: category.to_string(),
            message: message.into(),
        }
    }
}

/// How a rule classified the installation.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Verdict {
        status: ComplianceStatus,
        message: String,
        recommendation: Option<Recommendation>,
    },
    NotApplicable,
    Unavailable,
}

impl RuleOutcome {
    fn compliant(message: impl Into<String>) -> Self {
        RuleOutcome::Verdict {
            status: ComplianceStatus::Compliant,
            message: message.into(),
            recommendation: None,
        }
    }

    fn flagged(status: ComplianceStatus, message: impl Into<String>, recommendation: Recommendation) -> Self {
        RuleOutcome::Verdict {
            status,
            message: message.into(),
            recommendation: Some(recommendation),
        }
    }
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub inputs: &'a MarineInputs,
    pub loads: &'a LoadSummary,
    pub daily_energy_ah: f64,
    pub battery: &'a BatteryBank,
    pub charging: &'a ChargingBalance,
    pub cable: &'a CableSelection,
}

/// A compliance rule: identification plus a pure classifier.
#[derive(Clone, Copy)]
pub struct ComplianceRule {
    pub name: &'static str,
    pub regulation: &'static str,
    pub evaluate: fn(&RuleContext<'_>, &EnginePolicy) -> RuleOutcome,
}

impl ComplianceRule {
    pub const fn new(
        name: &'static str,
        regulation: &'static str,
        evaluate: fn(&RuleContext<'_>, &EnginePolicy) -> RuleOutcome,
    ) -> Self {
        ComplianceRule {
            name,
            regulation,
            evaluate,
        }
    }
}

impl std::fmt::Debug for ComplianceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplianceRule")
            .field("name", &self.name)
            .field("regulation", &self.regulation)
            .finish_non_exhaustive()
    }
}

/// Checks and recommendations from one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub checks: Vec<ComplianceCheck>,
    pub recommendations: Vec<Recommendation>,
}

impl ComplianceReport {
    /// Find the check produced by a named rule
    pub fn check(&self, rule: &str) -> Option<&ComplianceCheck> {
        self.checks.iter().find(|c| c.rule == rule)
    }
}

/// Most severe status across `checks`; compliant when there are none.
pub fn worst_status(checks: &[ComplianceCheck]) -> ComplianceStatus {
    checks
        .iter()
        .map(|c| c.status)
        .max()
        .unwrap_or(ComplianceStatus::Compliant)
}

/// The standard rule table
pub fn default_rules() -> Vec<ComplianceRule> {
    vec![
        ComplianceRule::new("voltage-drop", regulation::ABYC_E11, voltage_drop),
        ComplianceRule::new("cable-ampacity", regulation::ABYC_E11, cable_ampacity),
        ComplianceRule::new("energy-balance", regulation::ABYC_E11, energy_balance),
        ComplianceRule::new("battery-discharge", regulation::ISO_13297, battery_discharge),
        ComplianceRule::new("battery-voltage", regulation::ISO_13297, battery_voltage),
        ComplianceRule::new("battery-temperature", regulation::ISO_13297, battery_temperature),
        ComplianceRule::new("conductor-material", regulation::ABYC_E11, conductor_material),
        ComplianceRule::new("shore-power-isolation", regulation::ISO_13297, shore_power_isolation),
        ComplianceRule::new("system-current", regulation::ABYC_E11, system_current),
    ]
}

/// Process-wide standard rule table
pub static DEFAULT_RULES: Lazy<Vec<ComplianceRule>> = Lazy::new(default_rules);

/// Evaluate every rule against the derived figures.
pub fn evaluate_compliance(context: &RuleContext<'_>, rules: &[ComplianceRule], policy: &EnginePolicy) -> ComplianceReport {
    rules.iter().fold(ComplianceReport::default(), |mut report, rule| {
        let (status, message, recommendation) = match (rule.evaluate)(context, policy) {
            RuleOutcome::Verdict {
                status,
                message,
                recommendation,
            } => (status, message, recommendation),
            RuleOutcome::NotApplicable => (ComplianceStatus::Compliant, String::new(), None),
            RuleOutcome::Unavailable => return report,
        };
        report.checks.push(ComplianceCheck {
            regulation: rule.regulation.to_string(),
            rule: rule.name.to_string(),
            status,
            message,
        });
        report.recommendations.extend(recommendation);
        report
    })
}

// ============================================================================
// Rules
// ============================================================================

fn voltage_drop(ctx: &RuleContext<'_>, policy: &EnginePolicy) -> RuleOutcome {
    let cable = ctx.cable;
    let drop = cable.actual_drop_percent;
    let limit = cable.drop_limit_percent;
    if !drop.is_finite() || !limit.is_finite() {
        return RuleOutcome::Unavailable;
    }

    if !cable.within_limit() {
        return RuleOutcome::flagged(
            ComplianceStatus::NonCompliant,
            format!(
                "Voltage drop {:.2}% exceeds the {:.1}% limit even with {} mm² cable",
                drop, limit, cable.cable_size_mm2
            ),
            Recommendation::new(
                category::CABLING,
                "Shorten the cable run, split the circuit or move to a higher system voltage",
            ),
        );
    }

    if limit > 0.0 && drop >= limit * policy.voltage_drop_warning_fraction {
        let next_size = policy
            .cables
            .iter()
            .find(|c| c.size_mm2 > cable.cable_size_mm2)
            .map(|c| format!("{} mm²", c.size_mm2));
        let advice = match next_size {
            Some(size) => format!("Consider {} cable for margin against the voltage drop limit", size),
            None => "Consider a shorter cable run for margin against the voltage drop limit".to_string(),
        };
        return RuleOutcome::flagged(
            ComplianceStatus::Warning,
            format!("Voltage drop {:.2}% is close to the {:.1}% limit", drop, limit),
            Recommendation::new(category::CABLING, advice),
        );
    }

    RuleOutcome::compliant(format!(
        "Voltage drop {:.2}% within the {:.1}% limit using {} mm² cable",
        drop, limit, cable.cable_size_mm2
    ))
}

fn cable_ampacity(ctx: &RuleContext<'_>, policy: &EnginePolicy) -> RuleOutcome {
    let cable = ctx.cable;
    let current = cable.peak_current_a;
    let rating = cable.rated_current_a;
    if !current.is_finite() || !rating.is_finite() {
        return RuleOutcome::Unavailable;
    }

    if current <= rating {
        return RuleOutcome::compliant(format!(
            "Peak current {:.1} A within the {:.0} A rating of {} mm² cable",
            current, rating, cable.cable_size_mm2
        ));
    }

    let advice = match policy.cables.iter().find(|c| c.max_current_a >= current) {
        Some(adequate) => format!(
            "Use at least {} mm² cable (rated {:.0} A) for this circuit",
            adequate.size_mm2, adequate.max_current_a
        ),
        None => "No standard cable carries this current; split the circuit or raise the system voltage".to_string(),
    };
    RuleOutcome::flagged(
        ComplianceStatus::NonCompliant,
        format!(
            "Peak current {:.1} A exceeds the {:.0} A rating of {} mm² cable",
            current, rating, cable.cable_size_mm2
        ),
        Recommendation::new(category::CABLING, advice),
    )
}

fn energy_balance(ctx: &RuleContext<'_>, policy: &EnginePolicy) -> RuleOutcome {
    let balance = ctx.charging.energy_balance_ah;
    if !balance.is_finite() {
        return RuleOutcome::Unavailable;
    }

    if ctx.charging.is_deficit() {
        let deficit = -balance;
        let advice = if policy.charging_hours > 0.0 {
            let extra_w = deficit * ctx.battery.bank_voltage / policy.charging_hours;
            format!(
                "Increase charging capacity by at least {:.0} W (solar, wind or a larger alternator)",
                extra_w.ceil()
            )
        } else {
            "Increase charging capacity (solar, wind or a larger alternator)".to_string()
        };
        return RuleOutcome::flagged(
            ComplianceStatus::Warning,
            format!(
                "Charging deficit of {:.1} Ah/day: sources supply {:.1} Ah against {:.1} Ah consumed",
                deficit, ctx.charging.charging_ah, ctx.daily_energy_ah
            ),
            Recommendation::new(category::CHARGING, advice),
        );
    }

    RuleOutcome::compliant(format!("Charging surplus of {:.1} Ah/day", balance))
}

fn battery_discharge(ctx: &RuleContext<'_>, policy: &EnginePolicy) -> RuleOutcome {
    let chemistry = ctx.inputs.battery_type;
    let ceiling = policy.discharge_ceiling(chemistry);
    let dod = ctx.battery.effective_discharge_percent;

    let advice = if chemistry == BatteryType::Lithium {
        format!("Limit depth of discharge to {:.0}%", ceiling)
    } else {
        format!(
            "Limit depth of discharge to {:.0}% or change to lithium for deeper cycling",
            ceiling
        )
    };

    if dod > ceiling + policy.severe_discharge_margin_percent {
        return RuleOutcome::flagged(
            ComplianceStatus::NonCompliant,
            format!(
                "{:.0}% depth of discharge far exceeds the {:.0}% safe limit for {}",
                dod, ceiling, chemistry
            ),
            Recommendation::new(category::BATTERY, advice),
        );
    }
    if dod > ceiling {
        return RuleOutcome::flagged(
            ComplianceStatus::Warning,
            format!(
                "{:.0}% depth of discharge exceeds the {:.0}% recommended limit for {}",
                dod, ceiling, chemistry
            ),
            Recommendation::new(category::BATTERY, advice),
        );
    }

    RuleOutcome::compliant(format!(
        "{:.0}% depth of discharge within the {:.0}% limit for {}",
        dod, ceiling, chemistry
    ))
}

fn battery_voltage(ctx: &RuleContext<'_>, _policy: &EnginePolicy) -> RuleOutcome {
    let battery_v = ctx.inputs.battery_voltage;
    let bank_v = ctx.battery.bank_voltage;
    if !(battery_v.is_finite() && battery_v > 0.0) {
        return RuleOutcome::Unavailable;
    }

    let bank = ctx.battery;
    match (bank.series_string, bank.battery_count()) {
        (Some(1), _) => RuleOutcome::compliant(format!("{}V batteries match the {}V system", battery_v, bank_v)),
        (Some(series), Some(count)) => {
            let strings = if bank.unit_count == 1 { "string" } else { "strings" };
            RuleOutcome::compliant(format!(
                "{} × {}V batteries ({} {} of {} in series) for the {}V system",
                count, battery_v, bank.unit_count, strings, series, bank_v
            ))
        }
        _ => RuleOutcome::flagged(
            ComplianceStatus::NonCompliant,
            format!("{}V batteries cannot form a {}V bank", battery_v, bank_v),
            Recommendation::new(
                category::BATTERY,
                format!("Use batteries whose nominal voltage divides {}V", bank_v),
            ),
        ),
    }
}

fn battery_temperature(ctx: &RuleContext<'_>, policy: &EnginePolicy) -> RuleOutcome {
    let ambient = ctx.inputs.ambient_temperature_c;
    if !ambient.is_finite() {
        return RuleOutcome::Unavailable;
    }

    if ctx.inputs.battery_type == BatteryType::Lithium && ambient < policy.lithium_min_charge_temperature_c {
        return RuleOutcome::flagged(
            ComplianceStatus::Warning,
            format!(
                "Lithium cells must not be charged below {:.0}°C (ambient {:.0}°C)",
                policy.lithium_min_charge_temperature_c, ambient
            ),
            Recommendation::new(
                category::ENVIRONMENT,
                "Fit a battery heater or a BMS with low-temperature charge cut-off",
            ),
        );
    }
    if ambient > policy.max_battery_temperature_c {
        return RuleOutcome::flagged(
            ComplianceStatus::Warning,
            format!(
                "Ambient {:.0}°C exceeds the {:.0}°C battery compartment limit",
                ambient, policy.max_battery_temperature_c
            ),
            Recommendation::new(category::ENVIRONMENT, "Ventilate or relocate the battery compartment"),
        );
    }

    let factor = ctx.battery.temperature_factor;
    if factor > 1.0 {
        RuleOutcome::compliant(format!(
            "Temperature derating of {:.0}% applied for {:.0}°C",
            (factor - 1.0) * 100.0,
            ambient
        ))
    } else {
        RuleOutcome::compliant(format!("Battery temperature {:.0}°C within limits", ambient))
    }
}

fn conductor_material(ctx: &RuleContext<'_>, _policy: &EnginePolicy) -> RuleOutcome {
    if !ctx.inputs.saltwater_exposure {
        return RuleOutcome::NotApplicable;
    }
    if ctx.cable.cable_type == TINNED_CABLE_TYPE {
        RuleOutcome::compliant("Tinned conductors specified for saltwater exposure")
    } else {
        RuleOutcome::flagged(
            ComplianceStatus::NonCompliant,
            format!("{} is not suitable for saltwater exposure", ctx.cable.cable_type),
            Recommendation::new(category::CABLING, "Use tinned copper conductors throughout"),
        )
    }
}

fn shore_power_isolation(ctx: &RuleContext<'_>, _policy: &EnginePolicy) -> RuleOutcome {
    let shore = ctx.inputs.shore_power_w;
    if !(shore.is_finite() && shore > 0.0) {
        return RuleOutcome::NotApplicable;
    }
    RuleOutcome::Verdict {
        status: ComplianceStatus::Compliant,
        message: format!("Shore power connection of {:.0} W", shore),
        recommendation: Some(Recommendation::new(
            category::SHORE_POWER,
            "Fit a galvanic isolator or isolation transformer on the shore power earth",
        )),
    }
}

fn system_current(ctx: &RuleContext<'_>, policy: &EnginePolicy) -> RuleOutcome {
    let current = ctx.cable.peak_current_a;
    let peak_w = ctx.loads.peak_w;
    if !current.is_finite() {
        return RuleOutcome::Unavailable;
    }
    let threshold = policy.high_current_threshold_a;
    if current <= threshold {
        return RuleOutcome::compliant(format!(
            "Peak current {:.0} A ({:.0} W) within the {:.0} A distribution limit",
            current, peak_w, threshold
        ));
    }

    let advice = match ctx.inputs.system_voltage {
        SystemVoltage::V12 => "Consider a 24V system to halve the current and cable sizes".to_string(),
        SystemVoltage::V24 => "Consider a 48V system to halve the current and cable sizes".to_string(),
        SystemVoltage::V48 => "Split the load across separate distribution circuits".to_string(),
    };
    RuleOutcome::flagged(
        ComplianceStatus::Warning,
        format!(
            "Peak current {:.0} A ({:.0} W at {}) exceeds {:.0} A",
            current, peak_w, ctx.inputs.system_voltage, threshold
        ),
        Recommendation::new(category::SYSTEM_VOLTAGE, advice),
    )
}
