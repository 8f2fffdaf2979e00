//! Agency fee audit: what the agency really costs and what looks suspicious.

use crate::frac;
use roi_core::format;
use roi_core::{AgencyInput, AgencyOutput, FeeStructure};

/// Fee share of ad spend (percent) above which the fee is flagged.
pub const HIGH_FEE_PCT_OF_SPEND: f64 = 15.0;
/// Minimum commitment (months) above which the contract is flagged.
pub const LONG_COMMITMENT_MONTHS: f64 = 6.0;

/// The values red-flag rules are evaluated against.
#[derive(Clone, Copy, Debug)]
struct Snapshot {
    brand_roas: f64,
    non_brand_roas: f64,
    overall_mer: f64,
    margin_pct: f64,
    fee_pct_of_spend: f64,
    minimum_commitment: f64,
}

/// A red-flag rule: when `applies` holds, `message` is reported.
struct Rule {
    applies: fn(&Snapshot) -> bool,
    message: fn(&Snapshot) -> String,
}

/// Rules in reporting order. Each fires independently of the others.
const RULES: [Rule; 4] = [
    Rule {
        applies: blended_reporting,
        message: blended_reporting_message,
    },
    Rule {
        applies: overall_loss,
        message: overall_loss_message,
    },
    Rule {
        applies: high_fee,
        message: high_fee_message,
    },
    Rule {
        applies: long_commitment,
        message: long_commitment_message,
    },
];

/// Strong brand ROAS propping up a weak non-brand ROAS into a healthy average.
fn blended_reporting(s: &Snapshot) -> bool {
    s.brand_roas > 5.0 && s.non_brand_roas < 4.0 && (s.brand_roas + s.non_brand_roas) / 2.0 > 4.0
}

/// Overall MER below the break-even ROAS implied by the margin.
fn overall_loss(s: &Snapshot) -> bool {
    s.overall_mer > 0.0 && s.margin_pct > 0.0 && s.overall_mer < 1.0 / frac(s.margin_pct)
}

fn high_fee(s: &Snapshot) -> bool {
    s.fee_pct_of_spend > HIGH_FEE_PCT_OF_SPEND
}

fn long_commitment(s: &Snapshot) -> bool {
    s.minimum_commitment > LONG_COMMITMENT_MONTHS
}

fn blended_reporting_message(_: &Snapshot) -> String {
    "Blended brand/non-brand reporting might be hiding poor non-brand performance.".to_string()
}

fn overall_loss_message(_: &Snapshot) -> String {
    "MER tracking indicates you may be losing money overall, even if ROAS looks good.".to_string()
}

fn high_fee_message(s: &Snapshot) -> String {
    format!(
        "High fee percentage ({}) of ad spend.",
        format::percent(s.fee_pct_of_spend)
    )
}

fn long_commitment_message(_: &Snapshot) -> String {
    "Long minimum commitment reduces your flexibility.".to_string()
}

/// Monthly agency fee excluding setup and tools.
pub fn agency_fee_cost(input: &AgencyInput) -> f64 {
    let pct = input.monthly_ad_spend.get() * frac(input.base_percentage.get());
    let retainer = input.monthly_retainer.get();
    match input.agency_fee_type {
        FeeStructure::Percentage => pct,
        FeeStructure::Flat => retainer,
        FeeStructure::Hybrid => pct + retainer,
    }
}

fn share_of(cost: f64, base: f64) -> f64 {
    if base > 0.0 {
        cost / base * 100.0
    } else {
        0.0
    }
}

/// Compute the agency fee audit.
pub fn compute(input: &AgencyInput) -> AgencyOutput {
    let ad_spend = input.monthly_ad_spend.get();
    let margin_pct = input.contribution_margin.get();

    let total_monthly_agency_cost =
        agency_fee_cost(input) + input.setup_fees.get() + input.additional_tool_costs.get();
    let fee_percentage_of_revenue =
        share_of(total_monthly_agency_cost, input.monthly_revenue_from_ads.get());
    let fee_percentage_of_spend = share_of(total_monthly_agency_cost, ad_spend);

    let base_break_even = if margin_pct > 0.0 {
        1.0 / frac(margin_pct)
    } else {
        f64::INFINITY
    };
    let with_agency_break_even = if margin_pct > 0.0 && ad_spend > 0.0 {
        (ad_spend + total_monthly_agency_cost) / (ad_spend * frac(margin_pct))
    } else {
        f64::INFINITY
    };

    let snapshot = Snapshot {
        brand_roas: input.brand_roas.get(),
        non_brand_roas: input.non_brand_roas.get(),
        overall_mer: input.overall_mer.get(),
        margin_pct,
        fee_pct_of_spend: fee_percentage_of_spend,
        minimum_commitment: input.minimum_commitment.get(),
    };
    let red_flags = RULES
        .iter()
        .filter(|rule| (rule.applies)(&snapshot))
        .map(|rule| (rule.message)(&snapshot))
        .collect();

    AgencyOutput {
        total_monthly_agency_cost,
        fee_percentage_of_revenue,
        fee_percentage_of_spend,
        break_even_roas_increase: with_agency_break_even - base_break_even,
        red_flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use roi_core::{Amount, Status};

    const BLENDED: &str =
        "Blended brand/non-brand reporting might be hiding poor non-brand performance.";
    const LOSS: &str =
        "MER tracking indicates you may be losing money overall, even if ROAS looks good.";
    const COMMITMENT: &str = "Long minimum commitment reduces your flexibility.";

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn default_audit_reference_case() {
        let input = AgencyInput::default();
        assert!(close(agency_fee_cost(&input), 3000.0));
        let out = compute(&input);
        assert!(close(out.total_monthly_agency_cost, 3700.0));
        assert!(close(out.fee_percentage_of_spend, 18.5));
        assert!(close(out.fee_percentage_of_revenue, 4.625));
        assert!(close(out.break_even_roas_increase, 1.975 - 1.0 / 0.6));
        assert_eq!(
            out.red_flags,
            vec![
                BLENDED.to_string(),
                "High fee percentage (18.50%) of ad spend.".to_string()
            ]
        );
        assert_eq!(out.cost_status(), Status::Warning);
    }

    #[test]
    fn all_flags_fire_in_fixed_order() {
        let input = AgencyInput {
            overall_mer: Amount::Value(1.2),
            minimum_commitment: Amount::Value(12.0),
            ..AgencyInput::default()
        };
        let out = compute(&input);
        assert_eq!(out.red_flags.len(), 4);
        assert_eq!(out.red_flags[0], BLENDED);
        assert_eq!(out.red_flags[1], LOSS);
        assert!(out.red_flags[2].starts_with("High fee percentage"));
        assert_eq!(out.red_flags[3], COMMITMENT);
    }

    #[test]
    fn subset_keeps_relative_order() {
        let input = AgencyInput {
            brand_roas: Amount::Value(4.0),
            overall_mer: Amount::Value(1.2),
            minimum_commitment: Amount::Value(7.0),
            agency_fee_type: FeeStructure::Flat,
            monthly_retainer: Amount::Value(100.0),
            ..AgencyInput::default()
        };
        let out = compute(&input);
        assert_eq!(out.red_flags, vec![LOSS.to_string(), COMMITMENT.to_string()]);
    }

    #[test]
    fn clean_audit_has_no_flags() {
        let input = AgencyInput {
            agency_fee_type: FeeStructure::Percentage,
            base_percentage: Amount::Value(8.0),
            setup_fees: Amount::Value(0.0),
            additional_tool_costs: Amount::Value(0.0),
            brand_roas: Amount::Value(6.0),
            non_brand_roas: Amount::Value(4.5),
            ..AgencyInput::default()
        };
        let out = compute(&input);
        assert!(out.red_flags.is_empty());
        assert_eq!(out.cost_status(), Status::Success);
    }

    #[test]
    fn zero_spend_and_margin_guards() {
        let input = AgencyInput {
            monthly_ad_spend: Amount::Value(0.0),
            monthly_revenue_from_ads: Amount::Blank,
            ..AgencyInput::default()
        };
        let out = compute(&input);
        assert_eq!(out.fee_percentage_of_spend, 0.0);
        assert_eq!(out.fee_percentage_of_revenue, 0.0);
        assert_eq!(out.break_even_roas_increase, f64::INFINITY);

        let input = AgencyInput {
            contribution_margin: Amount::Value(0.0),
            ..AgencyInput::default()
        };
        let out = compute(&input);
        // inf - inf: margin unknown, increase is indeterminate
        assert!(out.break_even_roas_increase.is_nan());
        assert!(!out.red_flags.contains(&LOSS.to_string()));
    }

    #[test]
    fn high_fee_boundary_is_exclusive() {
        let input = AgencyInput {
            agency_fee_type: FeeStructure::Flat,
            monthly_retainer: Amount::Value(2300.0),
            ..AgencyInput::default()
        };
        let out = compute(&input);
        assert!(close(out.fee_percentage_of_spend, 15.0));
        assert!(out.red_flags.iter().all(|f| !f.starts_with("High fee")));
    }

    proptest! {
        #[test]
        fn flags_empty_iff_no_rule_holds(
            brand in 0.0f64..20.0,
            non_brand in 0.0f64..10.0,
            mer in 0.0f64..6.0,
            margin in 0.0f64..100.0,
            pct in 0.0f64..30.0,
            months in 0u32..24,
        ) {
            let input = AgencyInput {
                brand_roas: Amount::Value(brand),
                non_brand_roas: Amount::Value(non_brand),
                overall_mer: Amount::Value(mer),
                contribution_margin: Amount::Value(margin),
                agency_fee_type: FeeStructure::Percentage,
                base_percentage: Amount::Value(pct),
                setup_fees: Amount::Value(0.0),
                additional_tool_costs: Amount::Value(0.0),
                minimum_commitment: Amount::Value(months as f64),
                ..AgencyInput::default()
            };
            let out = compute(&input);
            let any = (brand > 5.0 && non_brand < 4.0 && (brand + non_brand) / 2.0 > 4.0)
                || (mer > 0.0 && margin > 0.0 && mer < 1.0 / (margin / 100.0))
                || out.fee_percentage_of_spend > 15.0
                || months > 6;
            prop_assert_eq!(out.red_flags.is_empty(), !any);
        }
    }
}
