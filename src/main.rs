//! appfleet - Validate ecosystem files and print resolved descriptors
//!
//! Reads an ecosystem document, resolves the profile named by
//! `APPFLEET_PROFILE`, and prints the normalized descriptor sequence as JSON
//! for a supervisor (or an operator) to inspect. Exits nonzero on any
//! validation failure.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use appfleet::{load, source, DEFAULT_PROFILE};

/// Environment variable naming the profile to resolve
pub const PROFILE_VAR: &str = "APPFLEET_PROFILE";

/// Environment variable naming the document path when no argument is given
pub const CONFIG_VAR: &str = "APPFLEET_CONFIG";

fn main() -> Result<()> {
    init_logging();

    let path = document_path()?;
    let profile = std::env::var(PROFILE_VAR).unwrap_or_default();

    info!(
        "loading {} (profile '{}')",
        path.display(),
        if profile.is_empty() {
            DEFAULT_PROFILE
        } else {
            &profile
        }
    );

    let document = source::read_document(&path)?;
    let descriptors = load(&document, &profile)?;

    println!("{}", serde_json::to_string_pretty(&descriptors)?);
    Ok(())
}

/// Resolve the document path: first CLI argument, then `APPFLEET_CONFIG`,
/// then the well-known locations.
fn document_path() -> Result<PathBuf> {
    if let Some(arg) = std::env::args_os().nth(1) {
        return Ok(PathBuf::from(arg));
    }
    if let Some(var) = std::env::var_os(CONFIG_VAR) {
        return Ok(PathBuf::from(var));
    }
    source::discover()
        .with_context(|| format!("no ecosystem file found; pass a path or set {CONFIG_VAR}"))
}

/// Initialize the logging system
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("appfleet=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
