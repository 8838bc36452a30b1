//! Recursive cleanup applied to every record before it is rendered.
//!
//! - enumerations collapse to their underlying value
//! - null map entries are dropped
//! - sequences lose null, `{}` and `[]` elements
//! - foreign int64 wrappers become plain integers when numeric support is available
//! - non-finite floats become null

use serde::Serialize;

use crate::{
    Result,
    options::{Int64Support, Options},
    ser,
    value::{Map, Number, Value},
};

#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    int64: Int64Support,
}

impl Normalizer {
    pub fn new(int64: Int64Support) -> Self {
        Self { int64 }
    }

    pub fn from_options(options: &Options) -> Self {
        Self::new(options.int64)
    }

    /// Returns a cleaned copy of `value`; the input is left untouched.
    pub fn normalize(&self, value: &Value) -> Value {
        match value {
            Value::Enum(e) => self.normalize(e.value()),
            Value::Object(map) => Value::Object(self.normalize_map(map)),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .filter(|v| !v.is_null())
                    .map(|v| self.normalize(v))
                    .filter(|v| !v.is_empty())
                    .collect(),
            ),
            Value::Int64(n) if self.int64.is_available() => Value::Number(Number::I64(n.get())),
            // JSON has no NaN or infinity; the value builder maps them to null too.
            Value::Number(Number::F64(f)) if !f.is_finite() => Value::Null,
            other => other.clone(),
        }
    }

    pub fn normalize_map(&self, map: &Map) -> Map {
        map.iter()
            .filter_map(|(k, v)| {
                let v = self.normalize(v);
                (!v.is_null()).then(|| (k.clone(), v))
            })
            .collect()
    }

    /// Flattens `obj` into a mapping and normalizes it.
    pub fn to_dict<T: Serialize + ?Sized>(&self, obj: &T) -> Result<Map> {
        let map = ser::to_mapping(obj)?;
        let cleaned = self.normalize_map(&map);
        tracing::trace!(
            entries = map.len(),
            kept = cleaned.len(),
            "normalized record"
        );
        Ok(cleaned)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Int64Support::detect())
    }
}
