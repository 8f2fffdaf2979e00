//! E-commerce unit economics.

use crate::frac;
use roi_core::{
    AgencyFeeType, AllowanceType, EcommerceInput, EcommerceOutput, PaymentProcessing,
    ScenarioInput, Status,
};

/// Standard gateway pricing: 2.9% of the order plus a fixed $0.30.
pub const STANDARD_PROCESSING_RATE: f64 = 0.029;
pub const STANDARD_PROCESSING_FIXED: f64 = 0.30;

/// Per-order variable costs that do not scale with COGS.
#[derive(Clone, Copy, Debug)]
struct OrderCosts {
    shipping: f64,
    payment_fee: f64,
    returns: f64,
    pick_pack: f64,
}

impl OrderCosts {
    fn total(&self) -> f64 {
        self.shipping + self.payment_fee + self.returns + self.pick_pack
    }
}

/// Payment processing fee for a single order of value `aov`.
pub fn payment_fee(input: &EcommerceInput, aov: f64) -> f64 {
    match input.payment_processing_type {
        PaymentProcessing::Standard => aov * STANDARD_PROCESSING_RATE + STANDARD_PROCESSING_FIXED,
        PaymentProcessing::CustomPercent => {
            aov * frac(input.payment_processing_custom_percent.get())
        }
        PaymentProcessing::FlatFee => input.payment_processing_custom_fee.get(),
    }
}

/// Returns/warranty allowance per order.
pub fn returns_amount(input: &EcommerceInput, aov: f64) -> f64 {
    match input.returns_allowance_type {
        AllowanceType::Percentage => aov * frac(input.returns_allowance.get()),
        AllowanceType::Amount => input.returns_allowance.get(),
    }
}

/// Monthly agency fee for the given ad spend.
pub fn agency_fee(input: &EcommerceInput, ad_spend: f64) -> f64 {
    let pct = ad_spend * frac(input.agency_percentage.get());
    let flat = input.agency_flat_fee.get();
    match input.agency_fee_type {
        AgencyFeeType::None => 0.0,
        AgencyFeeType::Percentage => pct,
        AgencyFeeType::Flat => flat,
        AgencyFeeType::Hybrid => pct + flat,
    }
}

/// Contribution per order divided by AOV; zero when AOV is not positive.
fn margin_of(contribution: f64, aov: f64) -> f64 {
    if aov > 0.0 {
        contribution / aov
    } else {
        0.0
    }
}

/// ROAS needed to cover ad spend, the percentage fee on it and fixed fees.
///
/// `+inf` when the margin is not positive. With zero ad spend the fixed-fee
/// term is itself `+inf` (or NaN when there are no fixed fees either).
fn break_even_roas(fee_pct_of_spend: f64, fixed_fees: f64, ad_spend: f64, margin: f64) -> f64 {
    if margin > 0.0 {
        ((1.0 + fee_pct_of_spend) + fixed_fees / ad_spend) / margin
    } else {
        f64::INFINITY
    }
}

fn max_cpa(contribution: f64, fixed_fees: f64, orders: f64) -> f64 {
    if orders > 0.0 {
        contribution - fixed_fees / orders
    } else {
        0.0
    }
}

/// Compute the e-commerce metrics and the what-if scenario.
///
/// Blank fields count as zero. The scenario's `new_max_cpc` is derived from
/// the current `max_cpa`, not the scenario's `new_max_cpa`; the CVR slider
/// only moves the click-to-order rate.
pub fn compute(input: &EcommerceInput, scenario: &ScenarioInput) -> EcommerceOutput {
    let aov = input.aov.get();
    let orders = input.orders_per_month.get();
    let cogs_frac = frac(input.cogs_percentage.get());
    let ad_spend = input.monthly_ad_spend.get();
    let conversion_rate = input.conversion_rate.get();

    let monthly_revenue = aov * orders;
    let cogs_amount = aov * cogs_frac;
    let costs = OrderCosts {
        shipping: input.shipping_subsidy.get(),
        payment_fee: payment_fee(input, aov),
        returns: returns_amount(input, aov),
        pick_pack: input.pick_pack_ops.get(),
    };

    let contribution = aov - cogs_amount - costs.total();
    let contribution_margin = margin_of(contribution, aov);

    let fixed_fees = agency_fee(input, ad_spend)
        + input.setup_fees.get()
        + input.tools_software.get()
        + input.creative_costs.get();
    let fee_pct_of_spend = if input.agency_fee_type.has_percentage() {
        frac(input.agency_percentage.get())
    } else {
        0.0
    };

    let break_even = break_even_roas(fee_pct_of_spend, fixed_fees, ad_spend, contribution_margin);
    let platform_roas = if ad_spend > 0.0 {
        monthly_revenue / ad_spend
    } else {
        f64::INFINITY
    };
    let profit = monthly_revenue * contribution_margin - ad_spend - fixed_fees;
    let marketing_cost = ad_spend + fixed_fees;
    let mer = if marketing_cost > 0.0 {
        monthly_revenue / marketing_cost
    } else {
        f64::INFINITY
    };
    let max_cpa_now = max_cpa(contribution, fixed_fees, orders);
    let max_cpc = max_cpa_now * frac(conversion_rate);

    // What-if: payment fee and returns stay at their current per-order values.
    let new_aov = aov * (1.0 + frac(scenario.increase_aov));
    let new_cogs = new_aov * cogs_frac * (1.0 - frac(scenario.reduce_cogs));
    let new_contribution = new_aov - new_cogs - costs.total();
    let new_max_cpa = max_cpa(new_contribution, fixed_fees, orders);
    let new_conversion_rate = conversion_rate * (1.0 + frac(scenario.increase_cvr));
    let new_max_cpc = max_cpa_now * frac(new_conversion_rate);
    let new_margin = margin_of(new_contribution, new_aov);
    let new_break_even = break_even_roas(fee_pct_of_spend, fixed_fees, ad_spend, new_margin);

    EcommerceOutput {
        monthly_revenue,
        contribution_per_order_pre_ads: contribution,
        contribution_margin,
        break_even_roas: break_even,
        platform_roas,
        profit,
        mer,
        max_cpa: max_cpa_now,
        max_cpc,
        profit_status: Status::from_sign(profit),
        new_max_cpc,
        new_max_cpa,
        new_break_even_roas: new_break_even,
    }
}
