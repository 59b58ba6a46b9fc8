//! Table-of-contents parsing.
//!
//! The help site exposes a `contents.js` listing mapping page titles to
//! relative paths. Depending on site version the payload is plain JSON (an
//! object, or an array of entries with optional nested children) or a JS
//! assignment wrapping that JSON (`var contents = [...];`). Anything that
//! doesn't match degrades to an empty map — the fetcher then falls back to
//! guessed Doxygen file names.

use indexmap::IndexMap;
use serde_json::Value;

pub fn parse_toc(payload: &str) -> IndexMap<String, String> {
    let mut map = IndexMap::new();
    let Some(value) = extract_json(payload) else {
        tracing::debug!("TOC payload is not parseable, degrading to empty map");
        return map;
    };
    collect_entries(&value, &mut map);
    map
}

/// Parse the payload as JSON, stripping a JS `var x = ...;` wrapper if the
/// direct parse fails.
fn extract_json(payload: &str) -> Option<Value> {
    if let Ok(v) = serde_json::from_str::<Value>(payload) {
        return Some(v);
    }
    let start = payload.find(['[', '{'])?;
    let end = payload.rfind([']', '}'])?;
    if end < start {
        return None;
    }
    serde_json::from_str(&payload[start..=end]).ok()
}

fn collect_entries(value: &Value, map: &mut IndexMap<String, String>) {
    match value {
        // {"FBModel": "class_f_b_model.html", ...}
        Value::Object(obj) => {
            // Entry-shaped objects: {"ttl": ..., "ln": ..., "children": [...]}
            if let Some(title) = string_field(obj, &["ttl", "title", "t", "name"]) {
                if let Some(link) = string_field(obj, &["ln", "link", "path", "url", "p"]) {
                    map.insert(title, link);
                }
                if let Some(children) = obj.get("children").or_else(|| obj.get("ic")) {
                    collect_entries(children, map);
                }
                return;
            }
            for (k, v) in obj {
                if let Value::String(path) = v {
                    map.insert(k.clone(), path.clone());
                } else {
                    collect_entries(v, map);
                }
            }
        }
        Value::Array(items) => {
            // ["FBModel", "class_f_b_model.html"] pair arrays
            if items.len() == 2
                && let (Some(name), Some(path)) = (items[0].as_str(), items[1].as_str())
            {
                map.insert(name.to_string(), path.to_string());
                return;
            }
            for item in items {
                collect_entries(item, map);
            }
        }
        _ => {}
    }
}

fn string_field(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_object() {
        let toc = parse_toc(r#"{"FBModel": "class_f_b_model.html", "FBCamera": "class_f_b_camera.html"}"#);
        assert_eq!(toc["FBModel"], "class_f_b_model.html");
        assert_eq!(toc["FBCamera"], "class_f_b_camera.html");
    }

    #[test]
    fn test_js_array_literal_wrapper() {
        let toc = parse_toc(
            r#"var contents = [["FBModel", "class_f_b_model.html"], ["pyfbsdk", "namespacepyfbsdk.html"]];"#,
        );
        assert_eq!(toc["FBModel"], "class_f_b_model.html");
        assert_eq!(toc["pyfbsdk"], "namespacepyfbsdk.html");
    }

    #[test]
    fn test_entry_objects_with_children() {
        let toc = parse_toc(
            r#"[{"ttl": "Classes", "ln": "classes.html", "children": [
                {"ttl": "FBModel", "ln": "class_f_b_model.html"}
            ]}]"#,
        );
        assert_eq!(toc["Classes"], "classes.html");
        assert_eq!(toc["FBModel"], "class_f_b_model.html");
    }

    #[test]
    fn test_garbage_degrades_to_empty() {
        assert!(parse_toc("not a payload at all").is_empty());
        assert!(parse_toc("").is_empty());
        assert!(parse_toc("var contents = ;").is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let toc = parse_toc(r#"[["B", "b.html"], ["A", "a.html"]]"#);
        let keys: Vec<_> = toc.keys().cloned().collect();
        assert_eq!(keys, vec!["B", "A"]);
    }
}
