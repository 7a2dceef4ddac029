//! Core logic for themekit.
//!
//! Reads a theme manifest and turns each declared feature into calls
//! against an abstract host platform API.

pub mod host;
pub mod logging;
pub mod manifest;
pub mod registrar;

pub use host::{
    Host, HostCall, HostError, HostRegistry, HostResult, IdentityTranslator, PluralLabel,
    RecordingHost, RegisteredPostType, RegistrySnapshot, RemovalHost, Translator,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use manifest::{Manifest, ManifestError, DEFAULT_MANIFEST_FILE};
pub use registrar::contact::ContactMethodDelta;
pub use registrar::removal::{
    DeferredApplier, ExtensionPoint, MetaBoxRemoval, RemovalSets, SubmenuRemoval, SupportRemoval,
};
pub use registrar::status::{EditScreenOptions, StatusLabel, StatusOption, StatusPresentation};
pub use registrar::{Registrar, RegistrarConfig, SetupError, SetupOutcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
