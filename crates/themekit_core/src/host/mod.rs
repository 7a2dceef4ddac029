//! Host platform capability contracts.
//!
//! # Responsibility
//! - Describe every host primitive the registrar consumes, split into
//!   translation, read-only registry lookups, registration and removal.
//! - Keep the registrar testable without a live host.
//!
//! # Invariants
//! - Registry lookups never mutate host state.
//! - Host errors are returned unchanged to the caller; the registrar never
//!   retries.

pub mod recording;
pub mod snapshot;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use recording::{HostCall, RecordingHost};
pub use snapshot::{RegisteredPostType, RegistrySnapshot};

/// Failure reported by one host primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host operation `{operation}` failed: {message}")]
pub struct HostError {
    pub operation: &'static str,
    pub message: String,
}

impl HostError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

pub type HostResult<T> = Result<T, HostError>;

/// Plural label pair registered for later translation.
///
/// Serialized shape matches what hosts expect for `label_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluralLabel {
    pub singular: String,
    pub plural: String,
    pub context: Option<String>,
    pub domain: String,
}

/// String translation primitives, scoped by text domain.
pub trait Translator {
    fn translate(&self, text: &str, domain: &str) -> String;

    fn translate_with_context(&self, text: &str, context: &str, domain: &str) -> String;

    /// Registers plural forms without translating them yet.
    fn plural_noop(&self, singular: &str, plural: &str, domain: &str) -> PluralLabel {
        PluralLabel {
            singular: singular.to_string(),
            plural: plural.to_string(),
            context: None,
            domain: domain.to_string(),
        }
    }
}

/// Translator that returns every string unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, text: &str, _domain: &str) -> String {
        text.to_string()
    }

    fn translate_with_context(&self, text: &str, _context: &str, _domain: &str) -> String {
        text.to_string()
    }
}

/// Read-only view of the host's live registries.
pub trait HostRegistry {
    /// Whether the current request renders an admin screen.
    fn is_admin(&self) -> bool;

    /// Internal name of a registered post type, `None` when unknown.
    fn post_type_name(&self, post_type: &str) -> Option<String>;

    fn registered_post_types(&self) -> Vec<String>;

    fn registered_widget_ids(&self) -> Vec<String>;

    fn registered_sidebar_ids(&self) -> Vec<String>;
}

/// Unregister primitives consumed by deferred removal appliers.
pub trait RemovalHost {
    fn unregister_widget(&mut self, widget: &str) -> HostResult<()>;

    fn unregister_sidebar(&mut self, sidebar: &str) -> HostResult<()>;

    fn remove_meta_box(&mut self, id: &str, screen: &str, context: &str) -> HostResult<()>;

    fn remove_post_type_support(&mut self, post_type: &str, feature: &str) -> HostResult<()>;

    fn remove_menu_page(&mut self, slug: &str) -> HostResult<()>;

    fn remove_submenu_page(&mut self, parent: &str, slug: &str) -> HostResult<()>;
}

/// Full host capability set used during setup.
pub trait Host: Translator + HostRegistry + RemovalHost {
    fn load_text_domain(&mut self, domain: &str) -> HostResult<()>;

    /// Enables one theme feature, with an optional payload.
    fn add_theme_support(&mut self, feature: &str, payload: Option<&Value>) -> HostResult<()>;

    fn register_nav_menu(&mut self, location: &str, label: &str) -> HostResult<()>;

    fn register_post_type(&mut self, post_type: &str, args: &Map<String, Value>)
        -> HostResult<()>;

    fn register_post_status(&mut self, status: &str, args: &Map<String, Value>)
        -> HostResult<()>;

    fn register_sidebar(&mut self, args: &Map<String, Value>) -> HostResult<()>;

    fn register_widget(&mut self, widget: &str) -> HostResult<()>;

    fn unregister_post_type(&mut self, post_type: &str) -> HostResult<()>;

    fn set_option(&mut self, name: &str, value: &Value) -> HostResult<()>;

    /// Hands cleanup options to the host's markup cleanup routine.
    fn run_cleanup(&mut self, options: &Value) -> HostResult<()>;
}
