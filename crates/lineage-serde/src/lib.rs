#![doc = include_str!("../README.md")]

pub mod atlan;
pub mod error;
pub mod normalize;
pub mod number;
pub mod options;
pub mod render;
pub mod ser;
pub mod value;

pub use crate::error::{Error, Result};
pub use crate::normalize::Normalizer;
pub use crate::options::{Int64Support, Options, Style};
pub use crate::value::{EnumValue, Int64, Map, Number, Value};

use std::io::Write;

use serde::Serialize;

/// Flattens `obj` into a mapping and strips nulls, empty sequence elements
/// and enum wrappers from it.
pub fn to_dict<T: Serialize + ?Sized>(obj: &T, options: &Options) -> Result<Map> {
    Normalizer::from_options(options).to_dict(obj)
}

/// [`to_dict`] rendered as JSON with keys sorted at every level.
pub fn to_json<T: Serialize + ?Sized>(obj: &T, options: &Options) -> Result<String> {
    let dict = to_dict(obj, options)?;
    render::to_string(&Value::Object(dict), options.style)
}

pub fn to_json_writer<W: Write, T: Serialize + ?Sized>(
    writer: W,
    obj: &T,
    options: &Options,
) -> Result<()> {
    let dict = to_dict(obj, options)?;
    render::to_writer(writer, &Value::Object(dict), options.style)
}
