//! Turns structured records into [`Value`] trees.
//!
//! A record's derived `Serialize` impl is its field list: the value builder
//! walks it and produces plain mappings, sequences and scalars while keeping
//! enumerations and foreign integers tagged for the normalizer.

use serde::Serialize;

use crate::{
    Result,
    error::Error,
    value::{Map, Value},
};

mod value_builder;

pub use value_builder::to_value;

/// Flattens a record (or an existing mapping) into a plain mapping.
///
/// Fails with [`Error::NotAMapping`] when `value` serializes to anything
/// other than a mapping, e.g. a bare integer or a sequence.
pub fn to_mapping<T: Serialize + ?Sized>(value: &T) -> Result<Map> {
    match to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::NotAMapping {
            found: other.kind(),
        }),
    }
}
