#![no_main]
use libfuzzer_sys::fuzz_target;
use lineage_serde::{Options, Value, render, to_dict, to_json};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(original) = serde_json::from_str::<serde_json::Value>(s) {
            let opts = Options::default();
            match to_dict(&original, &opts) {
                Ok(dict) => {
                    let json = to_json(&original, &opts).expect("rendering a cleaned mapping");
                    let parsed: serde_json::Value =
                        serde_json::from_str(&json).expect("rendered JSON parses");
                    let expected = render::to_json_value(&Value::Object(dict)).unwrap();
                    if parsed != expected {
                        panic!(
                            "Render mismatch!\nOriginal: {}\nRendered: {}",
                            serde_json::to_string_pretty(&original).unwrap(),
                            json
                        );
                    }
                }
                Err(_) => assert!(!original.is_object(), "object rejected: {}", s),
            }
        }
    }
});
