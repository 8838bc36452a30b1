//! JSON rendering with sorted keys.
//!
//! Values with no JSON representation left over after normalization render
//! as `<<non-serializable: TYPE>>` strings; rendering never fails on them.

use std::io;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};

use crate::{
    Result,
    options::Style,
    value::{Int64, Value},
};

pub fn placeholder(type_name: &str) -> String {
    format!("<<non-serializable: {}>>", type_name)
}

/// Serializes a [`Value`] as plain JSON. `Map` is ordered, so keys come out
/// sorted at every level regardless of serde_json's map features.
struct Rendered<'a>(&'a Value);

impl Serialize for Rendered<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        match self.0 {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&Rendered(item))?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, &Rendered(v))?;
                }
                out.end()
            }
            Value::Enum(e) => serializer.serialize_str(&placeholder(e.type_name())),
            Value::Int64(_) => serializer.serialize_str(&placeholder(Int64::TYPE_NAME)),
            Value::Opaque(type_name) => serializer.serialize_str(&placeholder(type_name)),
        }
    }
}

/// `{"a": 1, "b": [2, 3]}`: compact layout with a space after each separator.
#[derive(Debug, Default)]
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

pub fn to_writer<W: io::Write>(writer: W, value: &Value, style: Style) -> Result<()> {
    let rendered = Rendered(value);
    match style {
        Style::Compact => {
            let mut ser = serde_json::Serializer::with_formatter(writer, CompactFormatter);
            rendered.serialize(&mut ser)?;
        }
        Style::Spaced => {
            let mut ser = serde_json::Serializer::with_formatter(writer, SpacedFormatter);
            rendered.serialize(&mut ser)?;
        }
        Style::Pretty => {
            let mut ser = serde_json::Serializer::with_formatter(writer, PrettyFormatter::new());
            rendered.serialize(&mut ser)?;
        }
    }
    Ok(())
}

pub fn to_string(value: &Value, style: Style) -> Result<String> {
    let mut buf = Vec::with_capacity(128);
    to_writer(&mut buf, value, style)?;
    String::from_utf8(buf).map_err(|e| crate::Error::Message(e.to_string()))
}

/// The JSON view of `value`, with placeholders substituted.
pub fn to_json_value(value: &Value) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(Rendered(value))?)
}
