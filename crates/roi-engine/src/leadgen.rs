//! Lead generation economics.

use crate::frac;
use roi_core::{LeadGenInput, LeadGenOutput, Status};

/// Compute cost-per-lead economics for one month.
///
/// Leads are only counted when ad spend, CPC and landing-page CVR are all
/// positive; otherwise lead volume is zero rather than an infinity sentinel.
pub fn compute(input: &LeadGenInput) -> LeadGenOutput {
    let cpc = input.cpc.get();
    let cvr = input.landing_page_conversion_rate.get();
    let close_rate = input.lead_to_sale_close_rate.get();
    let margin = input.gross_margin_percentage.get();
    let ad_spend = input.monthly_ad_spend.get();

    let current_cpl = if cvr > 0.0 {
        cpc / frac(cvr)
    } else {
        f64::INFINITY
    };
    let gross_profit_per_sale = input.avg_sale_value.get() * frac(margin);
    let break_even_cpl = gross_profit_per_sale * frac(close_rate);

    let status = if current_cpl < break_even_cpl {
        Status::Success
    } else if current_cpl > break_even_cpl {
        Status::Danger
    } else {
        Status::Warning
    };

    let leads_generated = if ad_spend > 0.0 && cpc > 0.0 && cvr > 0.0 {
        ad_spend / current_cpl
    } else {
        0.0
    };
    let sales_closed = leads_generated * frac(close_rate);
    let total_gross_profit = sales_closed * gross_profit_per_sale;
    let total_marketing_cost = ad_spend
        + input.agency_fees.get()
        + input.tools_software.get()
        + input.creative_landing_pages.get();
    let net_profit = total_gross_profit - total_marketing_cost;
    let net_marketing_roi = if total_marketing_cost > 0.0 {
        net_profit / total_marketing_cost * 100.0
    } else {
        0.0
    };

    let target_close_rate = if gross_profit_per_sale > 0.0 {
        current_cpl / gross_profit_per_sale * 100.0
    } else {
        f64::INFINITY
    };
    let target_denominator = frac(margin) * frac(close_rate);
    let target_sale_value = if target_denominator > 0.0 {
        current_cpl / target_denominator
    } else {
        f64::INFINITY
    };

    LeadGenOutput {
        current_cpl,
        break_even_cpl,
        status,
        leads_generated,
        sales_closed,
        total_gross_profit,
        total_marketing_cost,
        net_profit,
        net_marketing_roi,
        target_close_rate,
        target_sale_value,
    }
}
