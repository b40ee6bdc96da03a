//! Load errors - Typed failures surfaced by document validation

use thiserror::Error;

/// Points at the document entry a failure refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRef {
    /// Zero-based position in the `apps` array
    pub index: usize,
    /// The entry's `name`, once it has parsed
    pub name: Option<String>,
}

impl EntryRef {
    pub fn new(index: usize) -> Self {
        Self { index, name: None }
    }

    pub fn named(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: Some(name.into()),
        }
    }
}

impl std::fmt::Display for EntryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "apps[{}] ('{}')", self.index, name),
            None => write!(f, "apps[{}]", self.index),
        }
    }
}

/// Errors produced while validating an ecosystem document.
///
/// Every variant names the offending entry and the field or constraint
/// violated. A load either returns the full descriptor sequence or one of
/// these; there is no partial result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// Top-level document shape violated
    #[error("malformed document: {reason}")]
    MalformedDocument { reason: String },

    /// A required or typed field is missing or has the wrong type
    #[error("{entry}: field `{field}`: {reason}")]
    InvalidField {
        entry: EntryRef,
        field: String,
        reason: String,
    },

    /// A memory-size string could not be parsed to a positive byte count
    #[error("{entry}: field `maxMemoryRestart`: invalid size `{value}`: {reason}")]
    InvalidSize {
        entry: EntryRef,
        value: String,
        reason: String,
    },

    /// The same environment profile is declared more than once in one entry
    #[error("{entry}: profile '{profile}' declared more than once")]
    DuplicateProfile { entry: EntryRef, profile: String },

    /// Two entries share the same `name`
    #[error("duplicate app name '{name}'")]
    DuplicateName { name: String },

    /// The requested profile is not declared by this entry
    #[error("{entry}: unknown profile '{profile}' (declared: {})", .declared.join(", "))]
    UnknownProfile {
        entry: EntryRef,
        profile: String,
        declared: Vec<String>,
    },
}

impl LoadError {
    pub(crate) fn invalid_field(
        entry: &EntryRef,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            entry: entry.clone(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_ref_display_includes_name_once_parsed() {
        assert_eq!(EntryRef::new(3).to_string(), "apps[3]");
        assert_eq!(EntryRef::named(0, "web").to_string(), "apps[0] ('web')");
    }

    #[test]
    fn unknown_profile_message_lists_declared_profiles() {
        let err = LoadError::UnknownProfile {
            entry: EntryRef::named(0, "web"),
            profile: "staging".to_string(),
            declared: vec!["default".to_string(), "production".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("staging"));
        assert!(message.contains("default, production"));
    }
}
