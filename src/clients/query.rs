//! Query string encoding with bracket syntax for nested values.
//!
//! Query strings are represented as JSON objects so that nested lists and
//! maps survive a parse/build cycle: `a[]=1&a[]=2` parses to
//! `{"a": ["1", "2"]}` and `filter[city]=Sofia` to `{"filter": {"city": "Sofia"}}`.
//! The same builder produces `application/x-www-form-urlencoded` bodies.

use serde_json::{Map, Value};

/// Parses a query string into a JSON object.
///
/// Every leaf value is a string. Keys ending in `[]` or a numeric `[n]`
/// segment build a list and `[name]` segments create nested objects. A later
/// plain key overwrites an earlier one.
///
/// # Example
///
/// ```rust
/// use econt_api::clients::query;
/// use serde_json::json;
///
/// let parsed = query::parse("countryCode=BGR&ids[]=1&ids[]=2&office[code]=1000");
/// assert_eq!(
///     serde_json::Value::Object(parsed),
///     json!({"countryCode": "BGR", "ids": ["1", "2"], "office": {"code": "1000"}})
/// );
/// ```
#[must_use]
pub fn parse(query: &str) -> Map<String, Value> {
    let mut result = Map::new();

    for pair in query.trim_start_matches('?').split('&') {
        if pair.is_empty() {
            continue;
        }
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode(raw_key);
        let value = Value::String(decode(raw_value));

        let (base, segments) = split_key(&key);
        if base.is_empty() {
            continue;
        }
        insert(&mut result, base, &segments, value);
    }

    result
}

/// Builds a query string from a JSON object.
///
/// Lists are written with numeric indices (`ids[0]=1&ids[1]=2`), objects with
/// named segments, booleans as `1`/`0`. `null` values are skipped. Spaces are
/// encoded as `+`.
///
/// # Example
///
/// ```rust
/// use econt_api::clients::query;
/// use serde_json::json;
///
/// let value = json!({"countryCode": "BGR", "name": "Sofia city"});
/// let built = query::build(value.as_object().unwrap());
/// assert_eq!(built, "countryCode=BGR&name=Sofia+city");
/// ```
#[must_use]
pub fn build(params: &Map<String, Value>) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params {
        flatten(&encode(key), value, &mut pairs);
    }
    pairs.join("&")
}

/// Merges `other` into `base`.
///
/// Objects are merged key by key and lists are concatenated. A scalar
/// merged into a list is appended to it; any other value from `other`
/// replaces the one in `base`.
pub fn merge(base: &mut Map<String, Value>, other: Map<String, Value>) {
    for (key, incoming) in other {
        match (base.get_mut(&key), incoming) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => merge(existing, incoming),
            (Some(Value::Array(existing)), Value::Array(incoming)) => existing.extend(incoming),
            (
                Some(Value::Array(existing)),
                incoming @ (Value::Bool(_) | Value::Number(_) | Value::String(_)),
            ) => existing.push(incoming),
            (_, incoming) => {
                base.insert(key, incoming);
            }
        }
    }
}

fn flatten(prefix: &str, value: &Value, pairs: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => pairs.push(format!("{prefix}={}", u8::from(*flag))),
        Value::Number(number) => pairs.push(format!("{prefix}={number}")),
        Value::String(text) => pairs.push(format!("{prefix}={}", encode(text))),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(&format!("{prefix}%5B{index}%5D"), item, pairs);
            }
        }
        Value::Object(entries) => {
            for (key, item) in entries {
                flatten(&format!("{prefix}%5B{}%5D", encode(key)), item, pairs);
            }
        }
    }
}

fn split_key(key: &str) -> (&str, Vec<&str>) {
    let Some(open) = key.find('[') else {
        return (key, Vec::new());
    };
    let base = &key[..open];
    let mut segments = Vec::new();
    let mut rest = &key[open..];

    while let Some(stripped) = rest.strip_prefix('[') {
        let Some(close) = stripped.find(']') else {
            break;
        };
        segments.push(&stripped[..close]);
        rest = &stripped[close + 1..];
    }

    (base, segments)
}

fn insert(target: &mut Map<String, Value>, key: &str, segments: &[&str], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        target.insert(key.to_string(), value);
        return;
    };

    if first.is_empty() || first.bytes().all(|b| b.is_ascii_digit()) {
        let index = first.parse::<usize>().ok();
        let entry = target
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
        if let Value::Array(items) = entry {
            let slot = index.filter(|i| *i < items.len());
            match (slot, rest.split_first()) {
                (Some(i), None) => items[i] = value,
                (Some(i), Some((next, tail))) => {
                    if let Value::Object(nested) = &mut items[i] {
                        insert(nested, next, tail, value);
                    } else {
                        let mut nested = Map::new();
                        insert(&mut nested, next, tail, value);
                        items[i] = Value::Object(nested);
                    }
                }
                (None, None) => items.push(value),
                (None, Some((next, tail))) => {
                    let mut nested = Map::new();
                    insert(&mut nested, next, tail, value);
                    items.push(Value::Object(nested));
                }
            }
        }
        return;
    }

    let entry = target
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    if let Value::Object(nested) = entry {
        insert(nested, first, rest, value);
    }
}

fn encode(text: &str) -> String {
    urlencoding::encode(text).replace("%20", "+")
}

fn decode(text: &str) -> String {
    let plus_decoded = text.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(plus_decoded.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_parse_simple_pairs() {
        let parsed = parse("a=1&b=two&empty=");
        assert_eq!(Value::Object(parsed), json!({"a": "1", "b": "two", "empty": ""}));
    }

    #[test]
    fn test_parse_decodes_plus_and_percent() {
        let parsed = parse("name=Sofia+city&q=%D0%A1%D0%BE%D1%84%D0%B8%D1%8F");
        assert_eq!(parsed["name"], "Sofia city");
        assert_eq!(parsed["q"], "София");
    }

    #[test]
    fn test_parse_bracket_lists_and_maps() {
        let parsed = parse("ids[]=1&ids[]=2&f[city][name]=Varna&f%5Bzip%5D=9000");
        assert_eq!(
            Value::Object(parsed),
            json!({"ids": ["1", "2"], "f": {"city": {"name": "Varna"}, "zip": "9000"}})
        );
    }

    #[test]
    fn test_parse_numeric_indices_build_lists() {
        let parsed = parse("ids%5B0%5D=1&ids%5B1%5D=2&rows[0][id]=7&rows[0][name]=x");
        assert_eq!(
            Value::Object(parsed),
            json!({"ids": ["1", "2"], "rows": [{"id": "7", "name": "x"}]})
        );
    }

    #[test]
    fn test_parse_later_plain_key_wins() {
        let parsed = parse("a=1&a=2");
        assert_eq!(parsed["a"], "2");
    }

    #[test]
    fn test_build_nested_values() {
        let params = object(json!({
            "ids": [1, 2],
            "flag": true,
            "skip": null,
            "office": {"code": "1000"}
        }));
        assert_eq!(
            build(&params),
            "flag=1&ids%5B0%5D=1&ids%5B1%5D=2&office%5Bcode%5D=1000"
        );
    }

    #[test]
    fn test_build_then_parse_preserves_nested_map() {
        let params = object(json!({"filter": {"city": "Sofia", "zip": "1000"}}));
        let parsed = parse(&build(&params));
        assert_eq!(Value::Object(parsed), json!({"filter": {"city": "Sofia", "zip": "1000"}}));
    }

    #[test]
    fn test_merge_overrides_scalars_and_extends_lists() {
        let mut base = object(json!({"a": "1", "ids": ["1"], "m": {"x": "1"}}));
        merge(
            &mut base,
            object(json!({"a": "2", "ids": ["2"], "m": {"y": "2"}, "new": "v"})),
        );
        assert_eq!(
            Value::Object(base),
            json!({"a": "2", "ids": ["1", "2"], "m": {"x": "1", "y": "2"}, "new": "v"})
        );
    }

    #[test]
    fn test_merge_appends_scalar_to_list() {
        let mut base = object(json!({"ids": ["1", "2"], "page": "1"}));
        merge(&mut base, object(json!({"ids": "3", "page": "2"})));
        assert_eq!(Value::Object(base), json!({"ids": ["1", "2", "3"], "page": "2"}));
    }
}
