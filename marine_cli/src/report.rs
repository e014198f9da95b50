//! Text rendering of a sizing run.
//!
//! Pure formatting: every figure shown comes from [`MarineResults`] or the
//! policy constants; nothing is recalculated beyond rounding for display.

use marine_core::calculations::energy::clamp_usage_hours;
use marine_core::calculations::{worst_status, ComplianceStatus};
use marine_core::{EnginePolicy, MarineInputs, MarineResults};

const RULE: &str = "═══════════════════════════════════════";

fn status_icon(status: ComplianceStatus) -> &'static str {
    match status {
        ComplianceStatus::Compliant => "[OK]",
        ComplianceStatus::Warning => "[WARN]",
        ComplianceStatus::NonCompliant => "[FAIL]",
    }
}

fn plural(count: f64, unit: &str) -> String {
    if (count - 1.0).abs() < f64::EPSILON {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// Full report: summary, compliance, and the worked narrative.
pub fn render_report(inputs: &MarineInputs, results: &MarineResults, policy: &EnginePolicy) -> String {
    let mut lines = vec![
        RULE.to_string(),
        "  MARINE ELECTRICAL SYSTEM".to_string(),
        RULE.to_string(),
        String::new(),
        "Vessel:".to_string(),
        format!("  Type:    {}", inputs.vessel_type),
        format!("  Length:  {:.1} m", inputs.vessel_length_m),
        format!("  System:  {} DC", inputs.system_voltage),
        String::new(),
        "Loads:".to_string(),
        format!("  Continuous:   {:.0} W", results.total_continuous_load_w),
        format!("  Intermittent: {:.0} W", results.total_intermittent_load_w),
        format!("  Peak:         {:.0} W ({:.1} A)", results.peak_load_w, results.peak_current_a),
        format!("  Daily use:    {:.1} Ah", results.daily_energy_consumption_ah),
        String::new(),
        "Battery Bank:".to_string(),
        format!(
            "  Capacity:  {:.0} Ah at {:.0} V ({})",
            results.recommended_battery_capacity_ah, results.battery_bank_voltage, inputs.battery_type
        ),
        format!("  Units:     {} × {:.0} Ah", results.number_of_batteries, policy.battery_unit_ah),
        String::new(),
        "Charging:".to_string(),
        format!("  Sources:   {:.0} W", results.total_charging_capacity_w),
        format!("  Yield:     {:.1} Ah/day", results.charging_ah_per_day),
        format!("  Balance:   {:+.1} Ah/day", results.energy_balance_ah),
        String::new(),
        "Distribution:".to_string(),
        format!(
            "  Cable:     {} mm² {} ({:.2}% drop, rated {:.0} A)",
            results.recommended_cable_size_mm2,
            results.cable_type,
            results.actual_voltage_drop_percent,
            results.cable_rated_current_a
        ),
    ];

    if results.recommended_inverter_size_w > 0.0 {
        lines.push(format!(
            "  Inverter:  {:.0} W {}",
            results.recommended_inverter_size_w, results.inverter_type
        ));
    } else {
        lines.push(format!("  Inverter:  {}", results.inverter_type));
    }

    lines.push(String::new());
    let overall = worst_status(&results.compliance_checks);
    lines.push(format!("Compliance Checks: {} {}", status_icon(overall), overall));
    for check in &results.compliance_checks {
        let message = if check.message.is_empty() {
            "not applicable".to_string()
        } else {
            check.message.clone()
        };
        lines.push(format!(
            "  {:7} {:10} {:22} {}",
            status_icon(check.status),
            check.regulation,
            check.rule,
            message
        ));
    }

    if !results.recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Recommendations:".to_string());
        for rec in &results.recommendations {
            lines.push(format!("  - [{}] {}", rec.category, rec.message));
        }
    }

    lines.push(String::new());
    lines.push(RULE.to_string());
    lines.push("  HOW IT WORKED OUT".to_string());
    lines.push(RULE.to_string());
    lines.extend(narrative(inputs, results, policy));
    lines.push(String::new());

    lines.join("\n")
}

/// Step-by-step explanation of each figure.
pub fn narrative(inputs: &MarineInputs, results: &MarineResults, policy: &EnginePolicy) -> Vec<String> {
    let volts = inputs.system_voltage.volts();
    let hours = clamp_usage_hours(inputs.daily_usage_hours, policy);
    let duty = policy.duty_cycle;
    let mut steps = Vec::new();

    steps.push(format!(
        "1. Peak load: {:.0} W continuous + {:.0} W intermittent × {:.0}% duty = {:.0} W",
        results.total_continuous_load_w,
        results.total_intermittent_load_w,
        duty * 100.0,
        results.peak_load_w
    ));

    steps.push(format!(
        "2. Daily use: ({:.0} W × {} h + {:.0} W × {} h × {:.2}) ÷ {:.0} V = {:.1} Ah",
        results.total_continuous_load_w,
        hours,
        results.total_intermittent_load_w,
        hours,
        duty,
        volts,
        results.daily_energy_consumption_ah
    ));

    let base_ah = if results.temperature_derating_factor > 0.0 {
        results.required_battery_capacity_ah / results.temperature_derating_factor
    } else {
        results.required_battery_capacity_ah
    };
    steps.push(format!(
        "3. Battery: {:.1} Ah × {} ÷ {:.0}% depth of discharge = {:.1} Ah",
        results.daily_energy_consumption_ah,
        plural(results.autonomy_days_used, "day"),
        results.discharge_percent_used,
        base_ah
    ));
    if results.temperature_derating_factor > 1.0 {
        steps.push(format!(
            "   Temperature derating applied for {:.0}°C: × {:.2} = {:.1} Ah",
            inputs.ambient_temperature_c, results.temperature_derating_factor, results.required_battery_capacity_ah
        ));
    }
    steps.push(format!(
        "   Rounded up to {:.0} Ah = {} × {:.0} Ah batteries",
        results.recommended_battery_capacity_ah, results.number_of_batteries, policy.battery_unit_ah
    ));

    steps.push(format!(
        "4. Charging: {:.0} W × {} h ÷ {:.0} V = {:.1} Ah/day, less {:.1} Ah used = {:+.1} Ah/day",
        results.total_charging_capacity_w,
        policy.charging_hours,
        volts,
        results.charging_ah_per_day,
        results.daily_energy_consumption_ah,
        results.energy_balance_ah
    ));

    steps.push(format!(
        "5. Cable: {:.0} W ÷ {:.0} V = {:.1} A; {} mm² over a {} m run (× 2 for the return) drops {:.2}% against a {}% limit",
        results.peak_load_w,
        volts,
        results.peak_current_a,
        results.recommended_cable_size_mm2,
        inputs.cable_length_m.max(0.0),
        results.actual_voltage_drop_percent,
        results.drop_limit_percent_used
    ));
    if results.cable_table_exhausted {
        steps.push("   No standard size meets the limit; the largest is shown".to_string());
    }

    if results.recommended_inverter_size_w > 0.0 {
        steps.push(format!(
            "6. Inverter: {:.0} W × {} headroom = {:.0} W → {:.0} W {}",
            results.peak_load_w,
            policy.inverter.headroom,
            results.peak_load_w * policy.inverter.headroom,
            results.recommended_inverter_size_w,
            results.inverter_type
        ));
    } else {
        steps.push("6. Inverter: no load to supply".to_string());
    }

    steps
}
