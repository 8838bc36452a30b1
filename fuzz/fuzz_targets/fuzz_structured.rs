#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::{arbitrary, fuzz_target};
use lineage_serde::{EnumValue, Int64, Int64Support, Map, Normalizer, Number, Style, Value};

const MAX_DEPTH: usize = 8;
const MAX_ARRAY_SIZE: usize = 20;
const MAX_OBJECT_SIZE: usize = 20;

#[derive(Arbitrary, Debug)]
struct FuzzValue {
    choice: u8,
}

impl FuzzValue {
    fn to_value(&self, u: &mut arbitrary::Unstructured, depth: usize) -> arbitrary::Result<Value> {
        if depth >= MAX_DEPTH {
            return Ok(Value::Null);
        }

        Ok(match self.choice % 12 {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => Value::Number(Number::I64(u.arbitrary()?)),
            3 => Value::Number(Number::F64(u.arbitrary()?)),
            4 => Value::String(u.arbitrary()?),
            5 => Value::Int64(Int64(u.arbitrary()?)),
            6 => {
                let inner: FuzzValue = u.arbitrary()?;
                Value::Enum(EnumValue::new("Fuzz", inner.to_value(u, depth + 1)?))
            }
            7 => Value::Opaque(u.arbitrary()?),
            8..=9 => {
                let size = u.int_in_range(0..=MAX_ARRAY_SIZE)?;
                let mut arr = Vec::with_capacity(size);
                for _ in 0..size {
                    let fv: FuzzValue = u.arbitrary()?;
                    arr.push(fv.to_value(u, depth + 1)?);
                }
                Value::Array(arr)
            }
            _ => {
                let size = u.int_in_range(0..=MAX_OBJECT_SIZE)?;
                let mut obj = Map::new();
                for _ in 0..size {
                    let key: String = u.arbitrary()?;
                    let fv: FuzzValue = u.arbitrary()?;
                    obj.insert(key, fv.to_value(u, depth + 1)?);
                }
                Value::Object(obj)
            }
        })
    }
}

fn check_clean(v: &Value) {
    match v {
        Value::Enum(_) | Value::Int64(_) => panic!("wrapper survived normalization: {:?}", v),
        Value::Array(items) => items.iter().for_each(|item| {
            assert!(!item.is_empty(), "empty element survived: {:?}", item);
            check_clean(item);
        }),
        Value::Object(map) => map.values().for_each(|item| {
            assert!(!item.is_null(), "null entry survived");
            check_clean(item);
        }),
        _ => {}
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = arbitrary::Unstructured::new(data);

    if let Ok(fv) = u.arbitrary::<FuzzValue>() {
        if let Ok(value) = fv.to_value(&mut u, 0) {
            let normalizer = Normalizer::new(Int64Support::Available);
            let once = normalizer.normalize(&value);
            check_clean(&once);
            // Compared through Debug since NaN never equals itself.
            let twice = normalizer.normalize(&once);
            if format!("{:?}", once) != format!("{:?}", twice) {
                panic!("normalize is not idempotent!\nOnce: {:?}\nTwice: {:?}", once, twice);
            }
            lineage_serde::render::to_string(&once, Style::Compact)
                .expect("rendering never fails on leaf types");
        }
    }
});
