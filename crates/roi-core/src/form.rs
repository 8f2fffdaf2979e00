//! Field-by-field mutation of input records from raw form text.

use crate::Amount;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Errors produced when applying a form edit.
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    /// The record has no field with this (camelCase) name.
    #[error("unknown field: {0}")]
    UnknownField(String),
    /// A categorical field was given a value outside its choices.
    #[error("invalid value {value:?} for field {field}")]
    InvalidChoice { field: String, value: String },
    /// The record does not serialize to a flat key-value object.
    #[error("record is not a key-value object")]
    NotAnObject,
}

/// Apply one edit to `record`, addressing the field by its serialized name.
///
/// Numeric fields take the text through [`Amount::parse_lenient`]: empty text
/// blanks the field, non-numeric text becomes zero. Categorical fields take
/// their wire names (`flat_fee`, `hybrid`, ...). On error the record is left
/// untouched.
pub fn set_field<T>(record: &mut T, field: &str, raw: &str) -> Result<(), FieldError>
where
    T: Serialize + DeserializeOwned,
{
    let mut value = serde_json::to_value(&*record).map_err(|_| FieldError::NotAnObject)?;
    let map = value.as_object_mut().ok_or(FieldError::NotAnObject)?;
    let slot = map
        .get_mut(field)
        .ok_or_else(|| FieldError::UnknownField(field.to_string()))?;
    let next = match &*slot {
        // blank amounts serialize as "", which no categorical field uses
        Value::Number(_) | Value::Null => amount_value(raw),
        Value::String(s) if s.is_empty() => amount_value(raw),
        Value::String(_) => Value::String(raw.trim().to_string()),
        _ => return Err(FieldError::NotAnObject),
    };
    *slot = next;
    let updated: T = serde_json::from_value(value).map_err(|_| FieldError::InvalidChoice {
        field: field.to_string(),
        value: raw.to_string(),
    })?;
    debug!(field, raw, "applied form edit");
    *record = updated;
    Ok(())
}

fn amount_value(raw: &str) -> Value {
    match Amount::parse_lenient(raw) {
        Amount::Blank => Value::String(String::new()),
        Amount::Value(v) => serde_json::Number::from_f64(v)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(String::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AgencyInput, EcommerceInput, FeeStructure, PaymentProcessing, ScenarioInput};

    #[test]
    fn numeric_edit_and_clear() {
        let mut input = EcommerceInput::default();
        set_field(&mut input, "aov", "150").unwrap();
        assert_eq!(input.aov, Amount::Value(150.0));
        set_field(&mut input, "aov", "").unwrap();
        assert_eq!(input.aov, Amount::Blank);
        // a blank field can be filled again
        set_field(&mut input, "aov", "99.5").unwrap();
        assert_eq!(input.aov, Amount::Value(99.5));
    }

    #[test]
    fn non_numeric_text_coerces_to_zero() {
        let mut input = AgencyInput::default();
        set_field(&mut input, "brandRoas", "lots").unwrap();
        assert_eq!(input.brand_roas, Amount::Value(0.0));
    }

    #[test]
    fn categorical_edit() {
        let mut input = EcommerceInput::default();
        set_field(&mut input, "paymentProcessingType", "flat_fee").unwrap();
        assert_eq!(input.payment_processing_type, PaymentProcessing::FlatFee);

        let mut agency = AgencyInput::default();
        set_field(&mut agency, "agencyFeeType", "flat").unwrap();
        assert_eq!(agency.agency_fee_type, FeeStructure::Flat);
    }

    #[test]
    fn invalid_choice_leaves_record_untouched() {
        let mut agency = AgencyInput::default();
        let err = set_field(&mut agency, "agencyFeeType", "none").unwrap_err();
        assert_eq!(
            err,
            FieldError::InvalidChoice {
                field: "agencyFeeType".into(),
                value: "none".into()
            }
        );
        assert_eq!(agency, AgencyInput::default());
    }

    #[test]
    fn unknown_field() {
        let mut input = EcommerceInput::default();
        assert_eq!(
            set_field(&mut input, "aovv", "1"),
            Err(FieldError::UnknownField("aovv".into()))
        );
    }

    #[test]
    fn scenario_fields_are_editable() {
        let mut s = ScenarioInput::default();
        set_field(&mut s, "increaseAOV", "12.5").unwrap();
        assert_eq!(s.increase_aov, 12.5);
    }
}
