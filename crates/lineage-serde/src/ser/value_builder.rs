use serde::Serialize;
use serde::ser::*;

use crate::error::Error;
use crate::number::INT64_TOKEN;
use crate::value::{ENUM_TOKEN, EnumValue, Int64, Map, Number, OPAQUE_TOKEN, Value};

pub fn to_value<T: Serialize + ?Sized>(value: &T) -> crate::Result<Value> {
    let mut ser = ValueSerializer;
    value.serialize(&mut ser)
}

struct ValueSerializer;

impl Serializer for &mut ValueSerializer {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = TupleVariantSerializer;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = StructVariantSerializer;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Bool(v))
    }
    fn serialize_i8(self, v: i8) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Number(Number::I64(v as i64)))
    }
    fn serialize_i16(self, v: i16) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Number(Number::I64(v as i64)))
    }
    fn serialize_i32(self, v: i32) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Number(Number::I64(v as i64)))
    }
    fn serialize_i64(self, v: i64) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Number(Number::I64(v)))
    }
    fn serialize_u8(self, v: u8) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Number(Number::I64(v as i64)))
    }
    fn serialize_u16(self, v: u16) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Number(Number::I64(v as i64)))
    }
    fn serialize_u32(self, v: u32) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Number(Number::I64(v as i64)))
    }
    fn serialize_u64(self, v: u64) -> Result<Self::Ok, Self::Error> {
        // Small unsigned values compare equal to their signed JSON parse.
        match i64::try_from(v) {
            Ok(i) => Ok(Value::Number(Number::I64(i))),
            Err(_) => Ok(Value::Number(Number::U64(v))),
        }
    }
    fn serialize_i128(self, v: i128) -> Result<Self::Ok, Self::Error> {
        if let Ok(i) = i64::try_from(v) {
            Ok(Value::Number(Number::I64(i)))
        } else if let Ok(u) = u64::try_from(v) {
            Ok(Value::Number(Number::U64(u)))
        } else {
            Ok(Value::Opaque("i128".to_string()))
        }
    }
    fn serialize_u128(self, v: u128) -> Result<Self::Ok, Self::Error> {
        if let Ok(i) = i64::try_from(v) {
            Ok(Value::Number(Number::I64(i)))
        } else if let Ok(u) = u64::try_from(v) {
            Ok(Value::Number(Number::U64(u)))
        } else {
            Ok(Value::Opaque("u128".to_string()))
        }
    }
    fn serialize_f32(self, v: f32) -> Result<Self::Ok, Self::Error> {
        self.serialize_f64(v as f64)
    }
    fn serialize_f64(self, f: f64) -> Result<Self::Ok, Self::Error> {
        if f.is_finite() {
            Ok(Value::Number(Number::F64(f)))
        } else {
            Ok(Value::Null)
        }
    }
    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        Ok(Value::String(v.to_string()))
    }
    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        Ok(Value::String(v.to_string()))
    }
    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Opaque("bytes".to_string()))
    }
    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Null)
    }
    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }
    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Null)
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Null)
    }
    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Enum(EnumValue::new(name, variant)))
    }
    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        let inner = value.serialize(&mut *self)?;
        match name {
            INT64_TOKEN => match inner {
                Value::Number(n) => n
                    .as_i64()
                    .map(|i| Value::Int64(Int64(i)))
                    .ok_or_else(|| Error::Message(format!("int64 out of range: {}", n))),
                other => Err(Error::Message(format!(
                    "int64 wrapper around {}",
                    other.kind()
                ))),
            },
            OPAQUE_TOKEN => match inner {
                Value::String(type_name) => Ok(Value::Opaque(type_name)),
                other => Err(Error::Message(format!(
                    "opaque value tagged with {}",
                    other.kind()
                ))),
            },
            ENUM_TOKEN => match inner {
                Value::Array(mut parts) if parts.len() == 2 => {
                    let value = parts.pop().unwrap_or(Value::Null);
                    match parts.pop() {
                        Some(Value::String(type_name)) => {
                            Ok(Value::Enum(EnumValue::new(type_name, value)))
                        }
                        _ => Err(Error::Message("enum without a type name".into())),
                    }
                }
                other => Err(Error::Message(format!("malformed enum: {}", other.kind()))),
            },
            _ => Ok(inner),
        }
    }
    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        let mut m = Map::new();
        let mut inner = ValueSerializer;
        m.insert(variant.to_string(), value.serialize(&mut inner)?);
        Ok(Value::Object(m))
    }
    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(SeqSerializer {
            elems: Vec::with_capacity(len.unwrap_or(0)),
        })
    }
    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        self.serialize_seq(Some(len))
    }
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        self.serialize_seq(Some(len))
    }
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(TupleVariantSerializer {
            elems: Vec::with_capacity(len),
            name: variant.to_string(),
        })
    }
    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(MapSerializer {
            map: Map::new(),
            next_key: None,
        })
    }
    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(MapSerializer {
            map: Map::new(),
            next_key: None,
        })
    }
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(StructVariantSerializer {
            map: Map::new(),
            name: variant.to_string(),
        })
    }
}

pub struct SeqSerializer {
    elems: Vec<Value>,
}

impl SerializeSeq for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        let mut ser = ValueSerializer;
        self.elems.push(value.serialize(&mut ser)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Array(self.elems))
    }
}

impl SerializeTuple for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        SerializeSeq::serialize_element(self, value)
    }
    fn end(self) -> Result<Self::Ok, Self::Error> {
        SerializeSeq::end(self)
    }
}

impl SerializeTupleStruct for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        SerializeSeq::serialize_element(self, value)
    }
    fn end(self) -> Result<Self::Ok, Self::Error> {
        SerializeSeq::end(self)
    }
}

pub struct TupleVariantSerializer {
    elems: Vec<Value>,
    name: String,
}

impl SerializeTupleVariant for TupleVariantSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        let mut ser = ValueSerializer;
        self.elems.push(value.serialize(&mut ser)?);
        Ok(())
    }
    fn end(self) -> Result<Self::Ok, Self::Error> {
        let mut outer = Map::new();
        outer.insert(self.name, Value::Array(self.elems));
        Ok(Value::Object(outer))
    }
}

pub struct MapSerializer {
    map: Map,
    next_key: Option<String>,
}

/// JSON object keys are strings; scalars are stringified the way a JSON
/// encoder would, anything else is rejected.
fn key_to_string(key: Value) -> crate::Result<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(if b { "true".into() } else { "false".into() }),
        Value::Null => Ok("null".into()),
        Value::Int64(n) => Ok(n.get().to_string()),
        Value::Enum(e) => match e.value() {
            Value::String(s) => Ok(s.clone()),
            other => key_to_string(other.clone()),
        },
        other => Err(Error::InvalidKey {
            found: other.kind(),
        }),
    }
}

impl SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Self::Error> {
        let mut ser = ValueSerializer;
        let v = key.serialize(&mut ser)?;
        self.next_key = Some(key_to_string(v)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        let mut ser = ValueSerializer;
        let v = value.serialize(&mut ser)?;
        let k = self.next_key.take().unwrap_or_default();
        self.map.insert(k, v);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(Value::Object(self.map))
    }
}

impl SerializeStruct for MapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        let mut ser = ValueSerializer;
        let v = value.serialize(&mut ser)?;
        self.map.insert(key.to_string(), v);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        SerializeMap::end(self)
    }
}

pub struct StructVariantSerializer {
    map: Map,
    name: String,
}

impl SerializeStructVariant for StructVariantSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        let mut ser = ValueSerializer;
        let v = value.serialize(&mut ser)?;
        self.map.insert(key.to_string(), v);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        let mut outer = Map::new();
        outer.insert(self.name, Value::Object(self.map));
        Ok(Value::Object(outer))
    }
}
