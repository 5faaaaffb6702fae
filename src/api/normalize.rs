//! Discriminator key normalization.
//!
//! YouTrack tags polymorphic payloads with a reserved `$type` key. Callers
//! mapping responses onto structures that can't carry that name can copy it to
//! a plain `type` key first.

use serde_json::Value;

/// The reserved discriminator key.
pub const DISCRIMINATOR_KEY: &str = "$type";

/// The plain key the discriminator is copied to.
pub const PLAIN_TYPE_KEY: &str = "type";

/// Copy `$type` to `type` in every object nested anywhere inside `value`.
///
/// `$type` itself is kept. The copy is made before descending, so when the
/// discriminator holds a nested structure both copies are normalized.
/// Running it again only re-sets the same values.
pub fn normalize_type_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(discriminator) = map.get(DISCRIMINATOR_KEY).cloned() {
                map.insert(PLAIN_TYPE_KEY.to_string(), discriminator);
            }
            for child in map.values_mut() {
                normalize_type_keys(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                normalize_type_keys(item);
            }
        }
        _ => {}
    }
}
