//! User profile and owner persona types.
//!
//! Both carry a free-form attribute map (relationship, nicknames, traits,
//! standing instructions, ...). The pipeline never interprets individual
//! keys; it only serializes the map into the prompt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form personalization attributes.
///
/// `serde_json::Map` keeps keys sorted, so serializing the same map twice
/// always yields identical text.
pub type AttributeMap = serde_json::Map<String, serde_json::Value>;

/// How the bot should address a specific user. At most one per `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    /// Display name, informational only.
    pub user_name: Option<String>,
    pub attributes: AttributeMap,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The bot's simulated operator identity, keyed by a well-known persona id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub persona_id: String,
    pub attributes: AttributeMap,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create, replace, or patch a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertProfileRequest {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

/// Request to replace or patch the persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertPersonaRequest {
    #[serde(default)]
    pub attributes: serde_json::Value,
}

/// Parse a JSON value into an attribute map. Only objects are accepted.
pub fn attributes_from_value(value: serde_json::Value) -> Result<AttributeMap, String> {
    match value {
        serde_json::Value::Object(map) => Ok(map),
        serde_json::Value::Null => Ok(AttributeMap::new()),
        other => Err(format!(
            "attributes must be a JSON object, got {}",
            json_kind(&other)
        )),
    }
}

/// Merge `patch` into `base` key by key; `null` values remove the key.
pub fn merge_attributes(base: &mut AttributeMap, patch: AttributeMap) {
    for (key, value) in patch {
        if value.is_null() {
            base.remove(&key);
        } else {
            base.insert(key, value);
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attributes_from_object() {
        let map = attributes_from_value(json!({"nicknames": ["babe"], "role": "friend"})).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["role"], "friend");
    }

    #[test]
    fn test_attributes_from_null_is_empty() {
        assert!(attributes_from_value(serde_json::Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_attributes_reject_non_object() {
        let err = attributes_from_value(json!(["a", "b"])).unwrap_err();
        assert!(err.contains("array"));
    }

    #[test]
    fn test_attribute_map_serializes_sorted() {
        let a = attributes_from_value(json!({"zeta": 1, "alpha": 2})).unwrap();
        let b = attributes_from_value(json!({"alpha": 2, "zeta": 1})).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_merge_attributes() {
        let mut base = attributes_from_value(json!({"role": "friend", "nature": "calm"})).unwrap();
        let patch = attributes_from_value(json!({"role": "sister", "nature": null, "likes": "chowmein"})).unwrap();
        merge_attributes(&mut base, patch);
        assert_eq!(base["role"], "sister");
        assert_eq!(base["likes"], "chowmein");
        assert!(!base.contains_key("nature"));
    }
}
