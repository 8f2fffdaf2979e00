#![deny(warnings)]

//! Core records for the marketing profitability calculators.
//!
//! This crate defines the serializable input and output records for the three
//! calculators (e-commerce unit economics, lead generation, agency fee audit),
//! their domain defaults, the form-field mutation layer and display formatting.
//! Percentages are stored the way users type them (0-100) and only turned into
//! fractions inside formulas.

mod amount;
mod metric;
pub mod form;
pub mod format;

pub use amount::Amount;
pub use form::{set_field, FieldError};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// An input record that the surrounding layer persists under a fixed key.
pub trait InputRecord: Serialize + DeserializeOwned + Default + Clone {
    /// Storage key for the serialized record.
    const STORAGE_KEY: &'static str;
}

/// The three calculators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Domain {
    Ecommerce,
    LeadGen,
    Agency,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Ecommerce, Domain::LeadGen, Domain::Agency];

    /// Key under which the domain's input record is persisted.
    pub fn storage_key(self) -> &'static str {
        match self {
            Domain::Ecommerce => EcommerceInput::STORAGE_KEY,
            Domain::LeadGen => LeadGenInput::STORAGE_KEY,
            Domain::Agency => AgencyInput::STORAGE_KEY,
        }
    }
}

/// Profitability verdict attached to a headline metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Danger,
    Warning,
}

impl Status {
    /// Positive is success, negative is danger, zero (or NaN) is warning.
    pub fn from_sign(value: f64) -> Self {
        if value > 0.0 {
            Status::Success
        } else if value < 0.0 {
            Status::Danger
        } else {
            Status::Warning
        }
    }
}

/// How the payment gateway charges per order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentProcessing {
    /// 2.9% of the order plus $0.30.
    #[default]
    Standard,
    /// A custom percentage of the order value.
    CustomPercent,
    /// A fixed fee per order.
    FlatFee,
}

/// Whether the returns allowance is a share of AOV or a dollar amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceType {
    #[default]
    Percentage,
    Amount,
}

/// Agency compensation for the e-commerce calculator, including no agency.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgencyFeeType {
    None,
    #[default]
    Percentage,
    Flat,
    Hybrid,
}

impl AgencyFeeType {
    /// Whether a share of ad spend is charged.
    pub fn has_percentage(self) -> bool {
        matches!(self, AgencyFeeType::Percentage | AgencyFeeType::Hybrid)
    }
}

/// Fee structure of the agency under audit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStructure {
    Percentage,
    Flat,
    #[default]
    Hybrid,
}

/// E-commerce unit economics inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcommerceInput {
    /// Average order value in USD.
    pub aov: Amount,
    pub orders_per_month: Amount,
    /// Cost of goods as a percentage of AOV.
    pub cogs_percentage: Amount,
    /// Shipping cost absorbed per order.
    pub shipping_subsidy: Amount,
    pub payment_processing_type: PaymentProcessing,
    /// Used when processing is `custom_percent`.
    pub payment_processing_custom_percent: Amount,
    /// Used when processing is `flat_fee`.
    pub payment_processing_custom_fee: Amount,
    pub returns_allowance: Amount,
    pub returns_allowance_type: AllowanceType,
    /// Fulfilment cost per order.
    pub pick_pack_ops: Amount,
    pub monthly_ad_spend: Amount,
    pub cpc: Amount,
    /// Click-to-order conversion rate, percent.
    pub conversion_rate: Amount,
    pub agency_fee_type: AgencyFeeType,
    /// Percentage of ad spend charged by the agency.
    pub agency_percentage: Amount,
    pub agency_flat_fee: Amount,
    /// Setup or audit fees, amortized per month.
    pub setup_fees: Amount,
    pub tools_software: Amount,
    pub creative_costs: Amount,
}

impl Default for EcommerceInput {
    fn default() -> Self {
        Self {
            aov: Amount::Value(120.0),
            orders_per_month: Amount::Value(500.0),
            cogs_percentage: Amount::Value(30.0),
            shipping_subsidy: Amount::Value(5.0),
            payment_processing_type: PaymentProcessing::Standard,
            payment_processing_custom_percent: Amount::Value(2.9),
            payment_processing_custom_fee: Amount::Value(0.30),
            returns_allowance: Amount::Value(5.0),
            returns_allowance_type: AllowanceType::Percentage,
            pick_pack_ops: Amount::Value(3.0),
            monthly_ad_spend: Amount::Value(10_000.0),
            cpc: Amount::Value(2.50),
            conversion_rate: Amount::Value(2.0),
            agency_fee_type: AgencyFeeType::Percentage,
            agency_percentage: Amount::Value(15.0),
            agency_flat_fee: Amount::Value(0.0),
            setup_fees: Amount::Value(0.0),
            tools_software: Amount::Value(250.0),
            creative_costs: Amount::Value(500.0),
        }
    }
}

impl InputRecord for EcommerceInput {
    const STORAGE_KEY: &'static str = "ecommerceInputs";
}

/// What-if adjustments applied on top of the e-commerce inputs, in percent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioInput {
    #[serde(rename = "increaseCVR")]
    pub increase_cvr: f64,
    #[serde(rename = "increaseAOV")]
    pub increase_aov: f64,
    #[serde(rename = "reduceCOGS")]
    pub reduce_cogs: f64,
}

/// E-commerce calculator results.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EcommerceOutput {
    #[serde(serialize_with = "metric::serialize")]
    pub monthly_revenue: f64,
    #[serde(serialize_with = "metric::serialize")]
    pub contribution_per_order_pre_ads: f64,
    /// Fraction of AOV left after variable costs.
    #[serde(serialize_with = "metric::serialize")]
    pub contribution_margin: f64,
    #[serde(rename = "breakEvenROAS")]
    #[serde(serialize_with = "metric::serialize")]
    pub break_even_roas: f64,
    #[serde(rename = "platformROAS")]
    #[serde(serialize_with = "metric::serialize")]
    pub platform_roas: f64,
    #[serde(serialize_with = "metric::serialize")]
    pub profit: f64,
    #[serde(serialize_with = "metric::serialize")]
    pub mer: f64,
    #[serde(rename = "maxCPA")]
    #[serde(serialize_with = "metric::serialize")]
    pub max_cpa: f64,
    #[serde(rename = "maxCPC")]
    #[serde(serialize_with = "metric::serialize")]
    pub max_cpc: f64,
    pub profit_status: Status,
    #[serde(rename = "newMaxCPC")]
    #[serde(serialize_with = "metric::serialize")]
    pub new_max_cpc: f64,
    #[serde(rename = "newMaxCPA")]
    #[serde(serialize_with = "metric::serialize")]
    pub new_max_cpa: f64,
    #[serde(rename = "newBreakEvenROAS")]
    #[serde(serialize_with = "metric::serialize")]
    pub new_break_even_roas: f64,
}

impl EcommerceOutput {
    /// One-line verdict for the monthly profit.
    pub fn profit_message(&self) -> &'static str {
        match self.profit_status {
            Status::Success => "Profitable! Your campaigns are generating a positive return.",
            Status::Warning => "Break-even. You are not making or losing money.",
            Status::Danger => "Losing Money. Your campaigns are costing more than they generate.",
        }
    }
}

/// Lead generation inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadGenInput {
    pub cpc: Amount,
    /// Visitor-to-lead rate, percent.
    pub landing_page_conversion_rate: Amount,
    /// Lead-to-customer rate, percent.
    pub lead_to_sale_close_rate: Amount,
    pub avg_sale_value: Amount,
    pub gross_margin_percentage: Amount,
    pub monthly_ad_spend: Amount,
    pub agency_fees: Amount,
    pub tools_software: Amount,
    pub creative_landing_pages: Amount,
}

impl Default for LeadGenInput {
    fn default() -> Self {
        Self {
            cpc: Amount::Value(3.00),
            landing_page_conversion_rate: Amount::Value(5.0),
            lead_to_sale_close_rate: Amount::Value(10.0),
            avg_sale_value: Amount::Value(2000.0),
            gross_margin_percentage: Amount::Value(50.0),
            monthly_ad_spend: Amount::Value(5000.0),
            agency_fees: Amount::Value(1000.0),
            tools_software: Amount::Value(150.0),
            creative_landing_pages: Amount::Value(300.0),
        }
    }
}

impl InputRecord for LeadGenInput {
    const STORAGE_KEY: &'static str = "leadGenInputs";
}

/// Lead generation results.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadGenOutput {
    #[serde(rename = "currentCPL")]
    #[serde(serialize_with = "metric::serialize")]
    pub current_cpl: f64,
    #[serde(rename = "breakEvenCPL")]
    #[serde(serialize_with = "metric::serialize")]
    pub break_even_cpl: f64,
    pub status: Status,
    #[serde(serialize_with = "metric::serialize")]
    pub leads_generated: f64,
    #[serde(serialize_with = "metric::serialize")]
    pub sales_closed: f64,
    #[serde(serialize_with = "metric::serialize")]
    pub total_gross_profit: f64,
    #[serde(serialize_with = "metric::serialize")]
    pub total_marketing_cost: f64,
    #[serde(serialize_with = "metric::serialize")]
    pub net_profit: f64,
    /// Percent.
    #[serde(rename = "netMarketingROI")]
    #[serde(serialize_with = "metric::serialize")]
    pub net_marketing_roi: f64,
    /// Close rate (percent) needed to break even at the current CPL.
    #[serde(serialize_with = "metric::serialize")]
    pub target_close_rate: f64,
    /// Sale value needed to break even at the current CPL.
    #[serde(serialize_with = "metric::serialize")]
    pub target_sale_value: f64,
}

impl LeadGenOutput {
    pub fn status_message(&self) -> &'static str {
        match self.status {
            Status::Success => "Profitable!",
            Status::Danger => "Losing money per lead.",
            Status::Warning => "Breaking even.",
        }
    }

    /// Net profit is either making money or not; there is no break-even tag.
    pub fn net_profit_status(&self) -> Status {
        if self.net_profit > 0.0 {
            Status::Success
        } else {
            Status::Danger
        }
    }

    pub fn roi_status(&self) -> Status {
        if self.net_marketing_roi > 0.0 {
            Status::Success
        } else {
            Status::Danger
        }
    }
}

/// Agency fee audit inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgencyInput {
    pub monthly_ad_spend: Amount,
    pub monthly_revenue_from_ads: Amount,
    /// Contribution margin, percent.
    pub contribution_margin: Amount,
    pub agency_fee_type: FeeStructure,
    /// Percentage of ad spend charged by the agency.
    pub base_percentage: Amount,
    pub monthly_retainer: Amount,
    pub setup_fees: Amount,
    /// Minimum contract length in months.
    pub minimum_commitment: Amount,
    pub additional_tool_costs: Amount,
    pub brand_roas: Amount,
    pub non_brand_roas: Amount,
    pub overall_mer: Amount,
}

impl Default for AgencyInput {
    fn default() -> Self {
        Self {
            monthly_ad_spend: Amount::Value(20_000.0),
            monthly_revenue_from_ads: Amount::Value(80_000.0),
            contribution_margin: Amount::Value(60.0),
            agency_fee_type: FeeStructure::Hybrid,
            base_percentage: Amount::Value(10.0),
            monthly_retainer: Amount::Value(1000.0),
            setup_fees: Amount::Value(500.0),
            minimum_commitment: Amount::Value(3.0),
            additional_tool_costs: Amount::Value(200.0),
            brand_roas: Amount::Value(15.0),
            non_brand_roas: Amount::Value(3.5),
            overall_mer: Amount::Value(3.0),
        }
    }
}

impl InputRecord for AgencyInput {
    const STORAGE_KEY: &'static str = "agencyInputs";
}

/// Agency fee audit results.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyOutput {
    #[serde(serialize_with = "metric::serialize")]
    pub total_monthly_agency_cost: f64,
    /// Percent of ad revenue.
    #[serde(serialize_with = "metric::serialize")]
    pub fee_percentage_of_revenue: f64,
    /// Percent of ad spend.
    #[serde(serialize_with = "metric::serialize")]
    pub fee_percentage_of_spend: f64,
    #[serde(rename = "breakEvenROASIncrease")]
    #[serde(serialize_with = "metric::serialize")]
    pub break_even_roas_increase: f64,
    /// Triggered warnings in rule order.
    pub red_flags: Vec<String>,
}

impl AgencyOutput {
    /// Above 20% of spend is danger, above 15% a warning.
    pub fn cost_status(&self) -> Status {
        if self.fee_percentage_of_spend > 20.0 {
            Status::Danger
        } else if self.fee_percentage_of_spend > 15.0 {
            Status::Warning
        } else {
            Status::Success
        }
    }
}

/// Standing advice shown alongside an agency audit.
pub const NEGOTIATION_RECOMMENDATIONS: [&str; 4] = [
    "Suggested Structure: Consider a lower base percentage with performance bonuses tied to non-brand ROAS or MER growth.",
    "Performance Bonuses: Propose a bonus for exceeding a target MER, ensuring the agency is aligned with true profitability.",
    "Reporting: Demand separate reporting for Brand vs. Non-Brand campaigns to understand true acquisition performance.",
    "Commitments: Negotiate for a shorter commitment (e.g., 3 months) or a 30-day out-clause after the initial term.",
];

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ecommerce_roundtrip_keeps_blank_fields() {
        let mut input = EcommerceInput::default();
        input.setup_fees = Amount::Blank;
        let s = serde_json::to_string(&input).unwrap();
        assert!(s.contains("\"setupFees\":\"\""));
        assert!(s.contains("\"paymentProcessingType\":\"standard\""));
        let back: EcommerceInput = serde_json::from_str(&s).unwrap();
        assert_eq!(back, input);
    }

    #[test]
    fn missing_fields_take_domain_defaults() {
        let back: AgencyInput =
            serde_json::from_str(r#"{"monthlyAdSpend": 5000, "somethingElse": true}"#).unwrap();
        assert_eq!(back.monthly_ad_spend, Amount::Value(5000.0));
        assert_eq!(back.contribution_margin, Amount::Value(60.0));
        assert_eq!(back.agency_fee_type, FeeStructure::Hybrid);
    }

    #[test]
    fn yaml_inputs_parse() {
        let text = "cpc: 4\nlandingPageConversionRate: 8\navgSaleValue:\n";
        let back: LeadGenInput = serde_yaml::from_str(text).unwrap();
        assert_eq!(back.cpc, Amount::Value(4.0));
        assert_eq!(back.avg_sale_value, Amount::Blank);
        assert_eq!(back.gross_margin_percentage, Amount::Value(50.0));
    }

    #[test]
    fn storage_keys_are_fixed() {
        assert_eq!(Domain::Ecommerce.storage_key(), "ecommerceInputs");
        assert_eq!(Domain::LeadGen.storage_key(), "leadGenInputs");
        assert_eq!(Domain::Agency.storage_key(), "agencyInputs");
    }

    #[test]
    fn scenario_uses_acronym_keys() {
        let s: ScenarioInput =
            serde_json::from_str(r#"{"increaseCVR": 10, "reduceCOGS": 5}"#).unwrap();
        assert_eq!(s.increase_cvr, 10.0);
        assert_eq!(s.increase_aov, 0.0);
        assert_eq!(s.reduce_cogs, 5.0);
    }

    #[test]
    fn agency_cost_status_thresholds() {
        let mut out = AgencyOutput {
            total_monthly_agency_cost: 0.0,
            fee_percentage_of_revenue: 0.0,
            fee_percentage_of_spend: 18.5,
            break_even_roas_increase: 0.0,
            red_flags: vec![],
        };
        assert_eq!(out.cost_status(), Status::Warning);
        out.fee_percentage_of_spend = 20.01;
        assert_eq!(out.cost_status(), Status::Danger);
        out.fee_percentage_of_spend = 15.0;
        assert_eq!(out.cost_status(), Status::Success);
    }

    proptest! {
        #[test]
        fn status_follows_sign(v in -1.0e9f64..1.0e9) {
            let s = Status::from_sign(v);
            if v > 0.0 {
                prop_assert_eq!(s, Status::Success);
            } else if v < 0.0 {
                prop_assert_eq!(s, Status::Danger);
            } else {
                prop_assert_eq!(s, Status::Warning);
            }
        }

        #[test]
        fn leadgen_roundtrip(cpc in 0u32..500, cvr in 0u32..100) {
            let input = LeadGenInput {
                cpc: Amount::Value(cpc as f64),
                landing_page_conversion_rate: Amount::Value(cvr as f64),
                ..LeadGenInput::default()
            };
            let s = serde_json::to_string(&input).unwrap();
            let back: LeadGenInput = serde_json::from_str(&s).unwrap();
            prop_assert_eq!(back, input);
        }
    }

    #[test]
    fn nan_status_is_warning() {
        assert_eq!(Status::from_sign(f64::NAN), Status::Warning);
    }
}
