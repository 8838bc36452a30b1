use serde::{Serialize, Serializer};

/// Newtype-struct name the value builder recognizes as an [`Int64`].
pub(crate) const INT64_TOKEN: &str = "$lineage_serde::private::Int64";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::I64(i) => Some(i),
            Number::U64(u) => i64::try_from(u).ok(),
            Number::F64(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::I64(i) => i as f64,
            Number::U64(u) => u as f64,
            Number::F64(f) => f,
        }
    }
}

impl core::fmt::Display for Number {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Number::I64(i) => write!(f, "{}", i),
            Number::U64(u) => write!(f, "{}", u),
            Number::F64(num) => f.write_str(&format_f64(*num)),
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Number::I64(i) => serializer.serialize_i64(i),
            Number::U64(u) => serializer.serialize_u64(u),
            Number::F64(f) => serializer.serialize_f64(f),
        }
    }
}

/// A 64-bit integer boxed by an external numeric library (a dataframe cell,
/// an array scalar). It is not a native JSON number: the normalizer only
/// unwraps it when numeric support is available, otherwise it survives
/// normalization and renders as a placeholder.
///
/// Serialized through serde_json directly it is just an integer; the
/// lineage value builder recognizes it and keeps it distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Int64(pub i64);

impl Int64 {
    /// Qualified type name used in placeholders.
    pub const TYPE_NAME: &'static str = "int64";

    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for Int64 {
    fn from(value: i64) -> Self {
        Int64(value)
    }
}

impl Serialize for Int64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(INT64_TOKEN, &self.0)
    }
}

/// Shortest round-tripping text for a float, used where a float has to
/// become a map key. Non-finite values keep their conventional names.
pub(crate) fn format_f64(value: f64) -> String {
    if value.is_nan() {
        return String::from("NaN");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "Infinity" } else { "-Infinity" });
    }
    let mut buf = ryu::Buffer::new();
    buf.format_finite(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_keys_are_shortest_form() {
        assert_eq!(format_f64(1.5), "1.5");
        assert_eq!(format_f64(1.0), "1.0");
        assert_eq!(format_f64(f64::NAN), "NaN");
        assert_eq!(format_f64(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn u64_beyond_i64_has_no_i64_view() {
        assert_eq!(Number::U64(u64::MAX).as_i64(), None);
        assert_eq!(Number::U64(7).as_i64(), Some(7));
    }
}
