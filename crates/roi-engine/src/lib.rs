#![deny(warnings)]

//! Profitability engines for the three calculators.
//!
//! Each engine is a total, pure function from an input record to an output
//! record:
//! - [`ecommerce::compute`]: unit economics, break-even ROAS, max CPA/CPC and
//!   what-if scenario deltas
//! - [`leadgen::compute`]: cost-per-lead economics, net marketing ROI and
//!   optimization targets
//! - [`agency::compute`]: agency fee decomposition, break-even ROAS inflation
//!   and red-flag rules
//!
//! No engine returns an error. Degenerate inputs surface as IEEE-754
//! sentinels: `+inf` where the business answer is "can't break even" and NaN
//! where the inputs are indeterminate (0/0).

pub mod agency;
pub mod ecommerce;
pub mod leadgen;

pub use roi_core::{
    AgencyInput, AgencyOutput, EcommerceInput, EcommerceOutput, LeadGenInput, LeadGenOutput,
    ScenarioInput, Status,
};

/// Percent (0-100) to fraction.
#[inline]
pub(crate) fn frac(percent: f64) -> f64 {
    percent / 100.0
}
