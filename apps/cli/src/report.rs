//! Human-readable rendering of calculator outputs.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use roi_core::format::{currency, multiple, number, percent, ratio_percent};
use roi_core::{
    AgencyOutput, EcommerceOutput, LeadGenOutput, ScenarioInput, Status,
    NEGOTIATION_RECOMMENDATIONS,
};

/// A rendered report: the metrics table plus trailing verdict lines.
pub struct Report {
    pub table: Table,
    pub notes: Vec<String>,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.table)?;
        for note in &self.notes {
            writeln!(f, "{note}")?;
        }
        Ok(())
    }
}

fn label(status: Status) -> &'static str {
    match status {
        Status::Success => "OK",
        Status::Warning => "WARN",
        Status::Danger => "LOSS",
    }
}

fn metrics_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value", "Help key"]);
    table
}

fn row(table: &mut Table, metric: &str, value: String, key: &str) {
    table.add_row(vec![metric.to_string(), value, key.to_string()]);
}

pub fn ecommerce(out: &EcommerceOutput, scenario: &ScenarioInput) -> Report {
    let mut table = metrics_table();
    row(&mut table, "Monthly revenue", currency(out.monthly_revenue), "aov");
    row(
        &mut table,
        &format!("Profit / loss per month [{}]", label(out.profit_status)),
        currency(out.profit),
        "profitLoss",
    );
    row(&mut table, "Platform ROAS", multiple(out.platform_roas), "platformROAS");
    row(&mut table, "MER", multiple(out.mer), "mer");
    row(
        &mut table,
        "Contribution per order (pre-ads)",
        currency(out.contribution_per_order_pre_ads),
        "contributionPerOrder",
    );
    row(
        &mut table,
        "Contribution margin",
        ratio_percent(out.contribution_margin),
        "contributionMargin",
    );
    row(&mut table, "Break-even ROAS", multiple(out.break_even_roas), "breakEvenROAS");
    row(&mut table, "Max CPA", currency(out.max_cpa), "maxCPA");
    row(&mut table, "Max CPC", currency(out.max_cpc), "maxCPC");

    if *scenario != ScenarioInput::default() {
        row(&mut table, "Scenario max CPA", currency(out.new_max_cpa), "maxCPA");
        row(&mut table, "Scenario max CPC", currency(out.new_max_cpc), "maxCPC");
        row(
            &mut table,
            "Scenario break-even ROAS",
            multiple(out.new_break_even_roas),
            "breakEvenROAS",
        );
    }

    Report {
        table,
        notes: vec![out.profit_message().to_string()],
    }
}

pub fn leadgen(out: &LeadGenOutput) -> Report {
    let mut table = metrics_table();
    row(
        &mut table,
        &format!("Current CPL [{}]", label(out.status)),
        currency(out.current_cpl),
        "currentCPL",
    );
    row(&mut table, "Break-even CPL", currency(out.break_even_cpl), "breakEvenCPL");
    row(&mut table, "Leads generated", number(out.leads_generated, 0), "landingPageCVR");
    row(&mut table, "Sales closed", number(out.sales_closed, 0), "leadToSaleCloseRate");
    row(
        &mut table,
        "Total gross profit",
        currency(out.total_gross_profit),
        "grossMarginPercentage",
    );
    row(
        &mut table,
        "Total marketing cost",
        currency(out.total_marketing_cost),
        "monthlyAdSpend",
    );
    row(
        &mut table,
        &format!("Net marketing profit [{}]", label(out.net_profit_status())),
        currency(out.net_profit),
        "netMarketingProfit",
    );
    row(
        &mut table,
        &format!("Net marketing ROI [{}]", label(out.roi_status())),
        percent(out.net_marketing_roi),
        "netMarketingROI",
    );
    row(
        &mut table,
        "Close rate needed to break even",
        percent(out.target_close_rate),
        "leadToSaleCloseRate",
    );
    row(
        &mut table,
        "Sale value needed to break even",
        currency(out.target_sale_value),
        "avgSaleValue",
    );

    Report {
        table,
        notes: vec![out.status_message().to_string()],
    }
}

pub fn agency(out: &AgencyOutput) -> Report {
    let mut table = metrics_table();
    row(
        &mut table,
        &format!("Total monthly agency cost [{}]", label(out.cost_status())),
        currency(out.total_monthly_agency_cost),
        "totalAgencyCost",
    );
    row(
        &mut table,
        "Fee % of ad revenue",
        percent(out.fee_percentage_of_revenue),
        "totalAgencyCost",
    );
    row(
        &mut table,
        "Fee % of ad spend",
        percent(out.fee_percentage_of_spend),
        "totalAgencyCost",
    );
    row(
        &mut table,
        "Break-even ROAS increase",
        multiple(out.break_even_roas_increase),
        "breakEvenRoasIncrease",
    );

    let mut notes = Vec::new();
    if out.red_flags.is_empty() {
        notes.push("No red flags.".to_string());
    } else {
        notes.push("Red flags:".to_string());
        notes.extend(out.red_flags.iter().map(|flag| format!("  ! {flag}")));
    }
    notes.push("Negotiation points:".to_string());
    notes.extend(
        NEGOTIATION_RECOMMENDATIONS
            .iter()
            .map(|tip| format!("  - {tip}")),
    );

    Report { table, notes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roi_core::{AgencyInput, EcommerceInput, LeadGenInput};

    #[test]
    fn ecommerce_report_shows_headline_metrics() {
        let input = EcommerceInput::default();
        let out = roi_engine::ecommerce::compute(&input, &ScenarioInput::default());
        let text = ecommerce(&out, &ScenarioInput::default()).to_string();
        assert!(text.contains("$60,000.00"));
        assert!(text.contains("$20,860.00"));
        assert!(text.contains("breakEvenROAS"));
        assert!(!text.contains("Scenario"));
        assert!(text.contains("Profitable!"));
    }

    #[test]
    fn scenario_rows_only_when_adjusted() {
        let scenario = ScenarioInput {
            increase_cvr: 10.0,
            ..ScenarioInput::default()
        };
        let out = roi_engine::ecommerce::compute(&EcommerceInput::default(), &scenario);
        let text = ecommerce(&out, &scenario).to_string();
        assert!(text.contains("Scenario max CPC"));
    }

    #[test]
    fn leadgen_report_has_verdict() {
        let out = roi_engine::leadgen::compute(&LeadGenInput::default());
        let report = leadgen(&out);
        assert_eq!(report.notes, vec!["Profitable!".to_string()]);
        let text = report.to_string();
        assert!(text.contains("$60.00"));
        assert!(text.contains("6.00%"));
        // 83.33 leads and 8.33 sales show as whole counts
        assert!(text.contains(" 83 "));
        assert!(text.contains(" 8 "));
        assert!(!text.contains("83.3"));
    }

    #[test]
    fn agency_report_lists_flags_then_tips() {
        let out = roi_engine::agency::compute(&AgencyInput::default());
        let report = agency(&out);
        assert_eq!(report.notes[0], "Red flags:");
        assert!(report.notes[2].contains("18.50%"));
        assert_eq!(report.notes[3], "Negotiation points:");
        assert_eq!(report.notes.len(), 4 + NEGOTIATION_RECOMMENDATIONS.len());
        assert!(report.to_string().contains("$3,700.00"));
    }
}
