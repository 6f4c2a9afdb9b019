//! Property Filter
//!
//! Case-insensitive substring search over a fixed list of (possibly dotted)
//! properties of serialized rows.

use serde::Serialize;
use serde_json::Value;

/// Walk a dotted path (`task.hashlist.name`) through nested objects.
/// Array segments accept a numeric index.
pub fn resolve_path<'a>(path: &str, value: &'a Value) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

fn searchable_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// True when any of `props` on `item` contains `term`, ignoring case.
/// An empty term matches everything.
pub fn matches_props(item: &Value, term: &str, props: &[String]) -> bool {
    let needle = term.trim().to_uppercase();
    if needle.is_empty() {
        return true;
    }
    props.iter().any(|prop| {
        resolve_path(prop, item)
            .and_then(searchable_text)
            .is_some_and(|text| text.to_uppercase().contains(&needle))
    })
}

/// Keep the items matching `term` on any of `props`.
pub fn filter_by_props<T: Serialize + Clone>(items: &[T], term: &str, props: &[String]) -> Vec<T> {
    items
        .iter()
        .filter(|item| {
            serde_json::to_value(item)
                .map(|value| matches_props(&value, term, props))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}
