//! Theme manifest model.
//!
//! The manifest is a JSON object whose top-level keys name feature sections.
//! It is decoded once into typed sections and then only read.

pub mod coerce;
pub mod loader;
pub mod sections;

pub use loader::{Manifest, ManifestError, DEFAULT_MANIFEST_FILE};
