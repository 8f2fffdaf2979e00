use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A numeric form value that may be left blank.
///
/// Blank and zero are distinct in the record so a cleared field stays cleared
/// across edits and saves. Formulas read both as zero through [`Amount::get`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Amount {
    /// Field was cleared or never filled in.
    #[default]
    Blank,
    /// A concrete number as typed by the user.
    Value(f64),
}

impl Amount {
    /// Value used inside formulas. Blank and NaN read as zero.
    pub fn get(self) -> f64 {
        match self {
            Amount::Value(v) if !v.is_nan() => v,
            _ => 0.0,
        }
    }

    /// Whether the field is in the blank state.
    pub fn is_blank(self) -> bool {
        matches!(self, Amount::Blank)
    }

    /// Parse raw form text. Empty text is blank; anything that is not a
    /// finite number coerces to zero.
    pub fn parse_lenient(raw: &str) -> Self {
        let text = raw.trim();
        if text.is_empty() {
            return Amount::Blank;
        }
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Amount::Value(v),
            _ => Amount::Value(0.0),
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Amount::Blank => serializer.serialize_str(""),
            Amount::Value(v) => serializer.serialize_f64(*v),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // null and "" both mean the user cleared the field; a number JSON
        // cannot hold (YAML `.inf`, `.nan`) coerces to zero like bad text
        Ok(match Option::<RawAmount>::deserialize(deserializer)? {
            None => Amount::Blank,
            Some(RawAmount::Number(v)) if v.is_finite() => Amount::Value(v),
            Some(RawAmount::Number(_)) => Amount::Value(0.0),
            Some(RawAmount::Text(s)) => Amount::parse_lenient(&s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_reads_as_zero_but_stays_blank() {
        let a = Amount::Blank;
        assert_eq!(a.get(), 0.0);
        assert!(a.is_blank());
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"\"");
    }

    #[test]
    fn lenient_parse() {
        assert_eq!(Amount::parse_lenient(""), Amount::Blank);
        assert_eq!(Amount::parse_lenient("  "), Amount::Blank);
        assert_eq!(Amount::parse_lenient("2.5"), Amount::Value(2.5));
        assert_eq!(Amount::parse_lenient("abc"), Amount::Value(0.0));
        assert_eq!(Amount::parse_lenient("inf"), Amount::Value(0.0));
    }

    #[test]
    fn deserializes_numbers_text_and_null() {
        let v: Vec<Amount> = serde_json::from_str(r#"[12, 0.5, "", null, "7"]"#).unwrap();
        assert_eq!(
            v,
            vec![
                Amount::Value(12.0),
                Amount::Value(0.5),
                Amount::Blank,
                Amount::Blank,
                Amount::Value(7.0)
            ]
        );
    }

    #[test]
    fn non_finite_yaml_numbers_coerce_to_zero() {
        let v: Vec<Amount> = serde_yaml::from_str("[.inf, -.inf, .nan, 3]").unwrap();
        assert_eq!(
            v,
            vec![
                Amount::Value(0.0),
                Amount::Value(0.0),
                Amount::Value(0.0),
                Amount::Value(3.0)
            ]
        );
    }

    #[test]
    fn nan_reads_as_zero() {
        assert_eq!(Amount::Value(f64::NAN).get(), 0.0);
        assert_eq!(Amount::Value(f64::INFINITY).get(), f64::INFINITY);
    }
}
