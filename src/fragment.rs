//! Style fragments and the flatten rule.
//!
//! A [`Fragment`] is one flat attribute map contributed by a single source
//! (a default, a compiled rule, a plugin) during one resolution pass. The
//! cascade collects fragments in precedence order and [`flatten`]s them
//! left-to-right: a later fragment's attributes overwrite same-named
//! attributes from earlier fragments, and non-colliding attributes from
//! every fragment survive.

use serde_json::Value;

/// A single style attribute value.
///
/// Values are heterogeneous: color strings, numbers, arrays, or nested
/// objects such as a structured font specification.
pub type StyleValue = Value;

/// A flat attribute map: one style fragment, rule body, or props bag.
pub type Fragment = serde_json::Map<String, StyleValue>;

/// Component input attributes, current or previous.
pub type Props = Fragment;

/// Merges fragments left-to-right; later values win per attribute.
///
/// # Example
///
/// ```rust
/// use restyle::{flatten, Fragment};
/// use serde_json::json;
///
/// let default: Fragment = json!({"color": "red", "margin": 4})
///     .as_object().unwrap().clone();
/// let rule: Fragment = json!({"color": "green"})
///     .as_object().unwrap().clone();
///
/// let flat = flatten([&default, &rule]);
/// assert_eq!(flat["color"], json!("green"));
/// assert_eq!(flat["margin"], json!(4));
/// ```
pub fn flatten<'a>(fragments: impl IntoIterator<Item = &'a Fragment>) -> Fragment {
    let mut out = Fragment::new();
    for fragment in fragments {
        for (name, value) in fragment {
            out.insert(name.clone(), value.clone());
        }
    }
    out
}

/// True if a props value is present and defined.
///
/// `null` counts as undefined so hosts can model optional attributes with
/// JSON nulls.
pub fn is_defined(value: Option<&StyleValue>) -> bool {
    matches!(value, Some(v) if !v.is_null())
}

/// A defined attribute value from the component's own props, falling back
/// to its inherited context.
pub fn defined_value<'a>(props: &'a Props, context: &'a Props, attr: &str) -> Option<&'a StyleValue> {
    props
        .get(attr)
        .filter(|v| !v.is_null())
        .or_else(|| context.get(attr).filter(|v| !v.is_null()))
}

/// Interprets a raw value as a list of fragments.
///
/// Accepts a single object (one fragment) or an array of objects. Anything
/// else contributes nothing, matching the permissive resolution contract.
pub fn fragments_from_value(value: &StyleValue) -> Vec<Fragment> {
    match value {
        Value::Object(map) => vec![map.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_object().cloned())
            .collect(),
        _ => Vec::new(),
    }
}
