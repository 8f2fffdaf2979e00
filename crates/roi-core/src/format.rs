//! Display formatting for calculator outputs.
//!
//! Every formatter maps NaN and infinities to a zero display string so "can't
//! compute" never shows up as `inf` or `NaN` text. Rounding is half away from
//! zero on the decimal representation of the value.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// US dollar amount with thousands separators, e.g. `$60,000.00`, `-$12.50`.
pub fn currency(value: f64) -> String {
    if !value.is_finite() {
        return "$0.00".to_string();
    }
    let text = number(value, 2);
    match text.strip_prefix('-') {
        Some(body) => format!("-${body}"),
        None => format!("${text}"),
    }
}

/// A fraction shown as a percentage: `0.5518` becomes `55.18%`.
pub fn ratio_percent(value: f64) -> String {
    percent(value * 100.0)
}

/// A value already expressed in percent: `18.5` becomes `18.50%`.
pub fn percent(value: f64) -> String {
    if !value.is_finite() {
        return "0.00%".to_string();
    }
    format!("{}%", fixed(value, 2))
}

/// Plain number with thousands separators and a fixed number of decimals.
pub fn number(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return fixed(0.0, decimals);
    }
    group_thousands(&fixed(value, decimals))
}

/// A multiple such as ROAS or MER, e.g. `4.00x`.
pub fn multiple(value: f64) -> String {
    format!("{}x", number(value, 2))
}

fn fixed(value: f64, decimals: u32) -> String {
    match Decimal::from_f64(value) {
        Some(d) => {
            let mut d = d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
            if d.is_zero() {
                d.set_sign_positive(true);
            }
            d.rescale(decimals);
            d.to_string()
        }
        // beyond Decimal's range
        None => format!("{:.*}", decimals as usize, value),
    }
}

fn group_thousands(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
