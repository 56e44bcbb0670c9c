// === CLIENT EXTENSION FILTERING ===
// Only extension entries whose values have the expected shape for their key
// are forwarded to the platform API; everything else is dropped silently so a
// malformed optional hint from the server cannot abort the whole ceremony
// with a platform-side validation error.

use serde_json::{Map, Value};

use log::debug;

type Validator = fn(&Value) -> bool;

/// Allow-list of recognized client extensions. Adding a newly recognized
/// extension is a new row here, not new conditional logic.
const RECOGNIZED_EXTENSIONS: &[(&str, Validator)] = &[
    ("credProps", is_true),
    ("appid", is_http_url),
    ("appidExclude", is_http_url),
];

fn is_true(value: &Value) -> bool {
    value.as_bool() == Some(true)
}

fn is_http_url(value: &Value) -> bool {
    value
        .as_str()
        .map(|s| s.starts_with("https://") || s.starts_with("http://"))
        .unwrap_or(false)
}

/// Keep only recognized, well-formed extension entries, passing their values
/// through verbatim.
pub fn filter_extensions(raw: &Map<String, Value>) -> Map<String, Value> {
    let mut filtered = Map::new();
    for (key, value) in raw {
        match RECOGNIZED_EXTENSIONS.iter().find(|(name, _)| name == key) {
            Some((_, validate)) if validate(value) => {
                filtered.insert(key.clone(), value.clone());
            }
            Some(_) => {
                debug!("Dropping malformed extension entry '{}'", key);
            }
            None => {
                debug!("Dropping unrecognized extension entry '{}'", key);
            }
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_cred_props_must_be_true() {
        let filtered = filter_extensions(&as_map(json!({
            "credProps": true,
        })));
        assert_eq!(filtered.get("credProps"), Some(&json!(true)));

        for bad in [json!(false), json!("true"), json!(1)] {
            let filtered = filter_extensions(&as_map(json!({ "credProps": bad })));
            assert!(filtered.is_empty());
        }
    }

    #[test]
    fn test_appid_exclude_must_be_http_url() {
        let filtered = filter_extensions(&as_map(json!({
            "appidExclude": "https://example.com/appid.json",
        })));
        assert_eq!(filtered.len(), 1);

        let filtered = filter_extensions(&as_map(json!({
            "appidExclude": "not-a-url",
        })));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_unrecognized_keys_dropped() {
        let filtered = filter_extensions(&as_map(json!({
            "credProps": true,
            "largeBlob": {"support": "required"},
            "prf": {},
        })));
        assert_eq!(filtered.len(), 1);
        assert!(filtered.contains_key("credProps"));
    }
}
