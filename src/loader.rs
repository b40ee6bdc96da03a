//! Loader - Validate an ecosystem document and resolve the active profile
//!
//! A single-shot transform: generic document in, ordered descriptor sequence
//! out. Pure and synchronous; any failure aborts the whole load rather than
//! returning a partially validated fleet.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::descriptor::{AppDescriptor, RestartPolicy};
use crate::document;
use crate::error::{EntryRef, LoadError};
use crate::size;

/// Name of the implicit base profile every entry declares via its `env` block
pub const DEFAULT_PROFILE: &str = "default";

/// Prefix of PM2-heritage profile blocks (`env_production` declares "production")
const ENV_BLOCK_PREFIX: &str = "env_";

/// Per-entry table of declared profiles, keyed by profile name
type ProfileTable = BTreeMap<String, BTreeMap<String, String>>;

/// Validate `document` and resolve `profile_name` into normalized descriptors.
///
/// The returned sequence preserves document order. An empty `profile_name`
/// (or `"default"`) resolves each entry's base environment; any other name
/// must be declared by every entry, otherwise the load fails with
/// `UnknownProfile` rather than silently falling back.
pub fn load(document: &Value, profile_name: &str) -> Result<Vec<AppDescriptor>, LoadError> {
    let entries = top_level_entries(document)?;

    // Names first: a duplicate name is reported even when other fields
    // of the colliding entries are invalid.
    let named = check_names(&entries)?;

    let mut descriptors = Vec::with_capacity(named.len());
    for (index, (obj, name)) in named.into_iter().enumerate() {
        let entry = EntryRef::named(index, name.clone());
        descriptors.push(load_entry(&entry, name, obj, profile_name)?);
    }

    info!(
        apps = descriptors.len(),
        profile = effective_profile(profile_name),
        "ecosystem document loaded"
    );
    Ok(descriptors)
}

fn effective_profile(profile_name: &str) -> &str {
    if profile_name.is_empty() {
        DEFAULT_PROFILE
    } else {
        profile_name
    }
}

fn top_level_entries(document: &Value) -> Result<Vec<&Map<String, Value>>, LoadError> {
    let Value::Object(root) = document else {
        return Err(LoadError::MalformedDocument {
            reason: "document is not an object".to_string(),
        });
    };
    let apps = match root.get("apps") {
        Some(Value::Array(apps)) => apps,
        Some(_) => {
            return Err(LoadError::MalformedDocument {
                reason: "`apps` is not an array".to_string(),
            })
        }
        None => {
            return Err(LoadError::MalformedDocument {
                reason: "missing top-level `apps` array".to_string(),
            })
        }
    };

    apps.iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Object(obj) => Ok(obj),
            _ => Err(LoadError::MalformedDocument {
                reason: format!("apps[{index}] is not an object"),
            }),
        })
        .collect()
}

fn check_names<'a>(
    entries: &[&'a Map<String, Value>],
) -> Result<Vec<(&'a Map<String, Value>, String)>, LoadError> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut named = Vec::with_capacity(entries.len());
    for (index, obj) in entries.iter().enumerate() {
        let entry = EntryRef::new(index);
        let name = document::require_str(&entry, obj, "name")?;
        if name.is_empty() {
            return Err(LoadError::invalid_field(&entry, "name", "must be non-empty"));
        }
        if !seen.insert(name) {
            return Err(LoadError::DuplicateName {
                name: name.to_string(),
            });
        }
        named.push((*obj, name.to_string()));
    }
    Ok(named)
}

fn load_entry(
    entry: &EntryRef,
    name: String,
    obj: &Map<String, Value>,
    profile_name: &str,
) -> Result<AppDescriptor, LoadError> {
    let entry_point = PathBuf::from(document::require_str(entry, obj, "entryPoint")?);

    let max_memory_bytes = match document::optional_str(entry, obj, "maxMemoryRestart")? {
        Some(raw) => Some(size::parse_size(raw).map_err(|e| LoadError::InvalidSize {
            entry: entry.clone(),
            value: raw.to_string(),
            reason: e.to_string(),
        })?),
        None => None,
    };

    let restart_policy = RestartPolicy {
        max_memory_bytes,
        stop_exit_codes: stop_exit_codes(entry, obj)?,
        backoff_initial_delay_ms: document::optional_u64(entry, obj, "backoffInitialDelayMs")?
            .unwrap_or(0),
    };

    let watch_enabled = document::optional_bool(entry, obj, "watch")?.unwrap_or(false);
    let watch_ignore_patterns = string_array(entry, obj, "watchIgnorePatterns")?;

    let profiles = profile_table(entry, obj)?;
    let environment = resolve_profile(entry, &profiles, profile_name)?;

    debug!(
        app = %name,
        max_memory = %restart_policy.max_memory_string(),
        vars = environment.len(),
        "entry validated"
    );

    Ok(AppDescriptor {
        name,
        entry_point,
        restart_policy,
        watch_enabled,
        watch_ignore_patterns,
        environment,
    })
}

/// Normalize `stopExitCodes` into a set; duplicates collapse, anything
/// outside [0, 255] or non-integer is rejected.
fn stop_exit_codes(entry: &EntryRef, obj: &Map<String, Value>) -> Result<BTreeSet<i32>, LoadError> {
    let mut codes = BTreeSet::new();
    let Some(values) = document::optional_array(entry, obj, "stopExitCodes")? else {
        return Ok(codes);
    };
    for (position, value) in values.iter().enumerate() {
        let field = format!("stopExitCodes[{position}]");
        let code = value
            .as_i64()
            .ok_or_else(|| LoadError::invalid_field(entry, &field, "expected an integer"))?;
        if !(0..=255).contains(&code) {
            return Err(LoadError::invalid_field(
                entry,
                &field,
                "must be within [0, 255]",
            ));
        }
        codes.insert(code as i32);
    }
    Ok(codes)
}

fn string_array(
    entry: &EntryRef,
    obj: &Map<String, Value>,
    field: &str,
) -> Result<Vec<String>, LoadError> {
    let Some(values) = document::optional_array(entry, obj, field)? else {
        return Ok(Vec::new());
    };
    values
        .iter()
        .enumerate()
        .map(|(position, value)| match value {
            Value::String(s) => Ok(s.clone()),
            _ => Err(LoadError::invalid_field(
                entry,
                format!("{field}[{position}]"),
                "expected a string",
            )),
        })
        .collect()
}

/// Collect every profile an entry declares: the `env` block as "default",
/// plus each `envProfiles` entry and each PM2-heritage `env_<name>` key.
fn profile_table(entry: &EntryRef, obj: &Map<String, Value>) -> Result<ProfileTable, LoadError> {
    let mut profiles = ProfileTable::new();

    if let Some(value) = obj.get("env") {
        profiles.insert(
            DEFAULT_PROFILE.to_string(),
            document::env_map(entry, "env", value)?,
        );
    }

    if let Some(value) = obj.get("envProfiles") {
        let Value::Object(blocks) = value else {
            return Err(LoadError::invalid_field(
                entry,
                "envProfiles",
                "expected an object",
            ));
        };
        for (profile, block) in blocks {
            if profile.is_empty() {
                return Err(LoadError::invalid_field(
                    entry,
                    "envProfiles",
                    "profile names must be non-empty",
                ));
            }
            let field = format!("envProfiles.{profile}");
            let env = document::env_map(entry, &field, block)?;
            declare_profile(entry, &mut profiles, profile, env)?;
        }
    }

    for (key, value) in obj {
        let Some(profile) = key.strip_prefix(ENV_BLOCK_PREFIX) else {
            continue;
        };
        if profile.is_empty() {
            return Err(LoadError::invalid_field(
                entry,
                key,
                "profile names must be non-empty",
            ));
        }
        let env = document::env_map(entry, key, value)?;
        declare_profile(entry, &mut profiles, profile, env)?;
    }

    // An entry with no env block still declares an empty base profile.
    profiles.entry(DEFAULT_PROFILE.to_string()).or_default();
    Ok(profiles)
}

fn declare_profile(
    entry: &EntryRef,
    profiles: &mut ProfileTable,
    profile: &str,
    env: BTreeMap<String, String>,
) -> Result<(), LoadError> {
    if profiles.contains_key(profile) {
        return Err(LoadError::DuplicateProfile {
            entry: entry.clone(),
            profile: profile.to_string(),
        });
    }
    profiles.insert(profile.to_string(), env);
    Ok(())
}

/// Overlay the requested profile onto the base environment.
///
/// Shallow override: a key present in the named profile replaces the
/// default's value, keys absent from it keep the default's value.
fn resolve_profile(
    entry: &EntryRef,
    profiles: &ProfileTable,
    profile_name: &str,
) -> Result<BTreeMap<String, String>, LoadError> {
    let mut resolved = profiles.get(DEFAULT_PROFILE).cloned().unwrap_or_default();
    if profile_name.is_empty() || profile_name == DEFAULT_PROFILE {
        return Ok(resolved);
    }

    let Some(overlay) = profiles.get(profile_name) else {
        return Err(LoadError::UnknownProfile {
            entry: entry.clone(),
            profile: profile_name.to_string(),
            declared: profiles.keys().cloned().collect(),
        });
    };
    for (key, value) in overlay {
        resolved.insert(key.clone(), value.clone());
    }
    Ok(resolved)
}
