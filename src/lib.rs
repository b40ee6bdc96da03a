//! appfleet - Ecosystem document loading for process supervision
//!
//! Parses a declarative configuration document describing one or more managed
//! applications, validates field types and semantic constraints, resolves the
//! requested environment profile, and produces normalized [`AppDescriptor`]
//! values for an external process supervisor to consume. The supervisor owns
//! everything after that: spawning, crash detection, restart back-off, memory
//! enforcement, and file watching.

pub mod descriptor;
pub mod document;
pub mod error;
pub mod loader;
pub mod size;
pub mod source;

pub use descriptor::{AppDescriptor, RestartPolicy};
pub use error::{EntryRef, LoadError};
pub use loader::{load, DEFAULT_PROFILE};
pub use source::{discover, read_document, SourceError};
