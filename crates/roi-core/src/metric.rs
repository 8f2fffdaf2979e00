//! Wire form of computed metrics.
//!
//! JSON has no infinity or NaN, and serde_json would write both as `null`.
//! "Can't break even" (`+inf`) and "indeterminate" (NaN) mean different
//! things, so non-finite metrics are written as the strings `"Infinity"`,
//! `"-Infinity"` and `"NaN"`.

use serde::Serializer;

pub(crate) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.is_infinite() {
        serializer.serialize_str(if *value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        serializer.serialize_f64(*value)
    }
}
