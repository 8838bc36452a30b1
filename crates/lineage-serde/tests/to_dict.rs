use std::collections::BTreeMap;

use lineage_serde::{Error, Int64, Int64Support, Map, Options, Value, to_dict, to_json};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum EventType {
    Start,
    Complete,
    Fail,
}

#[derive(Debug, Serialize)]
struct Job {
    namespace: String,
    name: String,
    facets: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Run {
    run_id: String,
    facets: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Serialize)]
struct Dataset {
    namespace: String,
    name: String,
    facets: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunEvent {
    event_type: Option<EventType>,
    event_time: String,
    run: Run,
    job: Job,
    inputs: Vec<Option<Dataset>>,
    outputs: Vec<Dataset>,
    producer: String,
}

fn sample_event(event_type: Option<EventType>) -> RunEvent {
    RunEvent {
        event_type,
        event_time: "2024-05-01T12:34:56Z".into(),
        run: Run {
            run_id: "d6a1c2f4-0000-4000-8000-000000000001".into(),
            facets: None,
        },
        job: Job {
            namespace: "warehouse".into(),
            name: "daily_rollup".into(),
            facets: BTreeMap::new(),
        },
        inputs: vec![
            None,
            Some(Dataset {
                namespace: "postgres://db".into(),
                name: "public.orders".into(),
                facets: None,
            }),
        ],
        outputs: vec![],
        producer: "https://example.com/producer".into(),
    }
}

fn options() -> Options {
    Options::default().with_int64(Int64Support::Available)
}

#[test]
fn documented_example() -> Result<(), Box<dyn std::error::Error>> {
    #[derive(Serialize)]
    enum SomeEnum {
        #[serde(rename = "foo")]
        Foo,
    }

    #[derive(Serialize)]
    struct Example {
        a: Option<i32>,
        b: Vec<Option<BTreeMap<&'static str, i32>>>,
        c: SomeEnum,
    }

    let input = Example {
        a: None,
        b: vec![None, Some(BTreeMap::new()), Some(BTreeMap::from([("x", 1)]))],
        c: SomeEnum::Foo,
    };
    let dict = to_dict(&input, &options())?;
    assert_eq!(
        Value::Object(dict),
        Value::from(json!({"b": [{"x": 1}], "c": "foo"}))
    );
    Ok(())
}

#[test]
fn event_is_cleaned() -> Result<(), Box<dyn std::error::Error>> {
    let dict = to_dict(&sample_event(Some(EventType::Start)), &options())?;
    let expected = json!({
        "eventType": "START",
        "eventTime": "2024-05-01T12:34:56Z",
        "run": {"runId": "d6a1c2f4-0000-4000-8000-000000000001"},
        "job": {"namespace": "warehouse", "name": "daily_rollup", "facets": {}},
        "inputs": [{"namespace": "postgres://db", "name": "public.orders"}],
        "outputs": [],
        "producer": "https://example.com/producer"
    });
    assert_eq!(Value::Object(dict), Value::from(expected));
    Ok(())
}

#[test]
fn missing_enum_field_is_dropped() -> Result<(), Box<dyn std::error::Error>> {
    let dict = to_dict(&sample_event(None), &options())?;
    assert!(!dict.contains_key("eventType"));
    Ok(())
}

#[test]
fn every_event_type_unwraps() -> Result<(), Box<dyn std::error::Error>> {
    for (ty, wire) in [
        (EventType::Start, "START"),
        (EventType::Complete, "COMPLETE"),
        (EventType::Fail, "FAIL"),
    ] {
        let dict = to_dict(&sample_event(Some(ty)), &options())?;
        assert_eq!(dict.get("eventType"), Some(&Value::from(wire)));
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Stats {
    row_count: Int64,
    sizes: Vec<Int64>,
}

#[test]
fn int64_coerced_when_available() -> Result<(), Box<dyn std::error::Error>> {
    let stats = Stats {
        row_count: Int64(7),
        sizes: vec![Int64(1), Int64(2)],
    };
    let dict = to_dict(&stats, &options())?;
    assert_eq!(
        Value::Object(dict),
        Value::from(json!({"rowCount": 7, "sizes": [1, 2]}))
    );
    Ok(())
}

#[test]
fn int64_kept_when_unavailable() -> Result<(), Box<dyn std::error::Error>> {
    let stats = Stats {
        row_count: Int64(7),
        sizes: vec![],
    };
    let opts = Options::default().with_int64(Int64Support::Unavailable);
    let dict = to_dict(&stats, &opts)?;
    assert_eq!(dict.get("rowCount"), Some(&Value::Int64(Int64(7))));
    Ok(())
}

#[test]
fn plain_integer_is_a_type_error() {
    let err = to_dict(&5, &options()).unwrap_err();
    assert!(matches!(err, Error::NotAMapping { found: "number" }));
    assert!(err.to_string().contains("expected a mapping"));
}

#[test]
fn existing_mapping_is_accepted() -> Result<(), Box<dyn std::error::Error>> {
    let raw: BTreeMap<String, Option<&str>> =
        BTreeMap::from([("a".into(), None), ("b".into(), Some("x"))]);
    let dict = to_dict(&raw, &options())?;
    assert_eq!(Value::Object(dict), Value::from(json!({"b": "x"})));
    Ok(())
}

#[test]
fn input_is_not_mutated() -> Result<(), Box<dyn std::error::Error>> {
    let original = Value::from(json!({"a": null, "b": [null, {}]}));
    let snapshot = original.clone();
    let dict = to_dict(&original, &options())?;
    assert_eq!(original, snapshot);
    assert_eq!(Value::Object(dict), Value::from(json!({"b": []})));
    Ok(())
}

fn random_value(rng: &mut StdRng, depth: usize) -> Value {
    let choice = if depth >= 4 { rng.random_range(0..6) } else { rng.random_range(0..9) };
    match choice {
        0 => Value::Null,
        1 => Value::Bool(rng.random()),
        2 => Value::from(rng.random_range(-50i64..50)),
        3 => Value::from(format!("s{}", rng.random_range(0..10))),
        4 => Value::Int64(Int64(rng.random_range(-5..5))),
        5 => Value::Enum(lineage_serde::EnumValue::new("Kind", "k")),
        6 => Value::Array(vec![]),
        7 => Value::Array(
            (0..rng.random_range(0..5))
                .map(|_| random_value(rng, depth + 1))
                .collect(),
        ),
        _ => Value::Object(
            (0..rng.random_range(0..5))
                .map(|_| {
                    let key = format!("k{}", rng.random_range(0..100));
                    (key, random_value(rng, depth + 1))
                })
                .collect(),
        ),
    }
}

fn assert_clean(v: &Value) {
    match v {
        Value::Enum(_) | Value::Int64(_) => panic!("residual wrapper: {:?}", v),
        Value::Array(items) => {
            for item in items {
                assert!(!item.is_empty(), "empty element survived: {:?}", item);
                assert_clean(item);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                assert!(!item.is_null(), "null value survived");
                assert_clean(item);
            }
        }
        _ => {}
    }
}

#[test]
fn random_trees_come_out_clean_and_sorted() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(0x11_5e_a9e);
    for _ in 0..500 {
        let root: Map = (0..rng.random_range(0..6))
            .map(|i| (format!("f{}", i), random_value(&mut rng, 0)))
            .collect();
        let dict = to_dict(&root, &options())?;
        assert_clean(&Value::Object(dict));

        let rendered = to_json(&root, &options())?;
        let mut de = serde_json::Deserializer::from_str(&rendered);
        SortedKeys::deserialize(&mut de)?;
    }
    Ok(())
}

/// Accepts any JSON document whose object keys appear in ascending order
/// at every level, in the order they occur in the text.
struct SortedKeys;

impl<'de> Deserialize<'de> for SortedKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SortedKeysVisitor)
    }
}

struct SortedKeysVisitor;

impl<'de> Visitor<'de> for SortedKeysVisitor {
    type Value = SortedKeys;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SortedKeys, A::Error> {
        let mut previous: Option<String> = None;
        while let Some(key) = map.next_key::<String>()? {
            if let Some(prev) = &previous {
                if prev.as_str() >= key.as_str() {
                    return Err(de::Error::custom(format!("key {:?} after {:?}", key, prev)));
                }
            }
            map.next_value::<SortedKeys>()?;
            previous = Some(key);
        }
        Ok(SortedKeys)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<SortedKeys, A::Error> {
        while seq.next_element::<SortedKeys>()?.is_some() {}
        Ok(SortedKeys)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<SortedKeys, E> {
        Ok(SortedKeys)
    }
    fn visit_i64<E: de::Error>(self, _: i64) -> Result<SortedKeys, E> {
        Ok(SortedKeys)
    }
    fn visit_u64<E: de::Error>(self, _: u64) -> Result<SortedKeys, E> {
        Ok(SortedKeys)
    }
    fn visit_f64<E: de::Error>(self, _: f64) -> Result<SortedKeys, E> {
        Ok(SortedKeys)
    }
    fn visit_str<E: de::Error>(self, _: &str) -> Result<SortedKeys, E> {
        Ok(SortedKeys)
    }
    fn visit_unit<E: de::Error>(self) -> Result<SortedKeys, E> {
        Ok(SortedKeys)
    }
}

#[test]
fn out_of_order_keys_are_detected() {
    let mut de = serde_json::Deserializer::from_str(r#"{"a":{"z":1,"b":2}}"#);
    assert!(SortedKeys::deserialize(&mut de).is_err());
}
