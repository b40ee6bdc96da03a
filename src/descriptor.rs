//! Descriptor model - Normalized launch configuration for one managed application

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::size::format_bytes;

/// Restart policy the supervisor applies to a managed application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestartPolicy {
    /// Restart when resident memory exceeds this many bytes (None = unlimited)
    pub max_memory_bytes: Option<u64>,
    /// Exit codes treated as an intentional stop, never restarted
    pub stop_exit_codes: BTreeSet<i32>,
    /// Initial delay for exponential restart back-off, in milliseconds
    pub backoff_initial_delay_ms: u64,
}

impl RestartPolicy {
    /// Whether an exit code signals an intentional stop
    pub fn is_stop_code(&self, code: i32) -> bool {
        self.stop_exit_codes.contains(&code)
    }

    /// Format the memory limit as a human-readable string
    pub fn max_memory_string(&self) -> String {
        match self.max_memory_bytes {
            Some(bytes) => format_bytes(bytes),
            None => "unlimited".to_string(),
        }
    }
}

/// Normalized, immutable launch configuration for one managed application.
///
/// Built once per load and handed to the external supervisor; the
/// environment map is already resolved for the requested profile and the
/// other declared profiles are discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    /// Display name, unique within the document
    pub name: String,
    /// Path to the script to launch (existence is the supervisor's concern)
    pub entry_point: PathBuf,
    /// Restart policy
    pub restart_policy: RestartPolicy,
    /// Restart on filesystem changes
    pub watch_enabled: bool,
    /// Glob patterns excluded from watching
    pub watch_ignore_patterns: Vec<String>,
    /// Environment variables resolved for the requested profile
    pub environment: BTreeMap<String, String>,
}
