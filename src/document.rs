//! Raw document access - Typed field reads over a generic JSON value
//!
//! The ecosystem document arrives as a generic tagged value; everything the
//! loader consumes goes through these accessors so that a type mismatch
//! always surfaces as an `InvalidField` citing the exact field path, never
//! as a silent coercion.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{EntryRef, LoadError};

/// Required non-empty string field
pub fn require_str<'a>(
    entry: &EntryRef,
    obj: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, LoadError> {
    match obj.get(field) {
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(LoadError::invalid_field(entry, field, "expected a string")),
        None => Err(LoadError::invalid_field(entry, field, "missing required field")),
    }
}

/// Optional string field
pub fn optional_str<'a>(
    entry: &EntryRef,
    obj: &'a Map<String, Value>,
    field: &str,
) -> Result<Option<&'a str>, LoadError> {
    match obj.get(field) {
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(LoadError::invalid_field(entry, field, "expected a string")),
        None => Ok(None),
    }
}

/// Optional boolean field
pub fn optional_bool(
    entry: &EntryRef,
    obj: &Map<String, Value>,
    field: &str,
) -> Result<Option<bool>, LoadError> {
    match obj.get(field) {
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(_) => Err(LoadError::invalid_field(entry, field, "expected a boolean")),
        None => Ok(None),
    }
}

/// Optional non-negative integer field
pub fn optional_u64(
    entry: &EntryRef,
    obj: &Map<String, Value>,
    field: &str,
) -> Result<Option<u64>, LoadError> {
    match obj.get(field) {
        Some(value) => match value.as_u64() {
            Some(parsed) => Ok(Some(parsed)),
            None => Err(LoadError::invalid_field(
                entry,
                field,
                "expected a non-negative integer",
            )),
        },
        None => Ok(None),
    }
}

/// Optional array field
pub fn optional_array<'a>(
    entry: &EntryRef,
    obj: &'a Map<String, Value>,
    field: &str,
) -> Result<Option<&'a Vec<Value>>, LoadError> {
    match obj.get(field) {
        Some(Value::Array(values)) => Ok(Some(values)),
        Some(_) => Err(LoadError::invalid_field(entry, field, "expected an array")),
        None => Ok(None),
    }
}

/// Build an environment-variable map from a profile block.
///
/// Keys must be non-empty. Values are strings, or scalars stringified by the
/// explicit coercion rule of [`coerce_env_value`]; anything else is an
/// `InvalidField` naming the offending key.
pub fn env_map(
    entry: &EntryRef,
    field: &str,
    value: &Value,
) -> Result<BTreeMap<String, String>, LoadError> {
    let Value::Object(block) = value else {
        return Err(LoadError::invalid_field(entry, field, "expected an object"));
    };

    let mut env = BTreeMap::new();
    for (key, raw) in block {
        if key.is_empty() {
            return Err(LoadError::invalid_field(
                entry,
                field,
                "variable names must be non-empty",
            ));
        }
        let coerced = coerce_env_value(raw).ok_or_else(|| {
            LoadError::invalid_field(
                entry,
                format!("{field}.{key}"),
                "expected a string, number, or boolean",
            )
        })?;
        env.insert(key.clone(), coerced);
    }
    Ok(env)
}

/// The one coercion the loader performs: scalar env values become the string
/// the process environment would carry (`3100` -> `"3100"`, `true` ->
/// `"true"`). Arrays, objects, and null are rejected.
pub fn coerce_env_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn require_str_distinguishes_missing_from_mistyped() {
        let entry = EntryRef::new(0);
        let fixture = obj(json!({ "name": 7 }));

        let mistyped = require_str(&entry, &fixture, "name").unwrap_err();
        assert!(mistyped.to_string().contains("expected a string"));

        let missing = require_str(&entry, &fixture, "entryPoint").unwrap_err();
        assert!(missing.to_string().contains("missing required field"));
    }

    #[test]
    fn optional_u64_rejects_floats_and_negatives() {
        let entry = EntryRef::new(0);
        let fixture = obj(json!({ "delay": 1.5, "neg": -1, "ok": 100 }));

        assert!(optional_u64(&entry, &fixture, "delay").is_err());
        assert!(optional_u64(&entry, &fixture, "neg").is_err());
        assert_eq!(optional_u64(&entry, &fixture, "ok").unwrap(), Some(100));
        assert_eq!(optional_u64(&entry, &fixture, "absent").unwrap(), None);
    }

    #[test]
    fn env_map_stringifies_scalars() {
        let entry = EntryRef::new(0);
        let env = env_map(
            &entry,
            "env",
            &json!({ "PORT": 3100, "DEBUG": true, "NODE_ENV": "development" }),
        )
        .unwrap();

        assert_eq!(env.get("PORT").map(String::as_str), Some("3100"));
        assert_eq!(env.get("DEBUG").map(String::as_str), Some("true"));
        assert_eq!(env.get("NODE_ENV").map(String::as_str), Some("development"));
    }

    #[test]
    fn env_map_rejects_nested_values_and_null() {
        let entry = EntryRef::new(0);

        let nested = env_map(&entry, "env", &json!({ "BAD": { "a": 1 } })).unwrap_err();
        assert!(nested.to_string().contains("env.BAD"));

        assert!(env_map(&entry, "env", &json!({ "BAD": null })).is_err());
        assert!(env_map(&entry, "env", &json!({ "BAD": [1, 2] })).is_err());
    }

    #[test]
    fn env_map_rejects_empty_variable_names() {
        let entry = EntryRef::new(0);
        assert!(env_map(&entry, "env", &json!({ "": "x" })).is_err());
    }

    #[test]
    fn env_map_rejects_non_object_blocks() {
        let entry = EntryRef::new(0);
        assert!(env_map(&entry, "env", &json!("not a map")).is_err());
    }
}
