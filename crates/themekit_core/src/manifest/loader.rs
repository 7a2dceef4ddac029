//! Manifest loading.
//!
//! # Responsibility
//! - Read one JSON manifest from disk (or memory) and decode every known
//!   section into typed form.
//! - Fail fast: a missing file, invalid JSON or a malformed section aborts
//!   the load with an error naming the path or section.
//!
//! # Invariants
//! - A loaded `Manifest` is never mutated.
//! - An absent section decodes to `None`; unknown top-level keys are ignored.

use crate::manifest::sections::{
    decode_contact_methods, decode_navigations, decode_post_status, decode_post_types,
    decode_sidebars, decode_theme_features, decode_theme_support, decode_widgets,
    ContactMethodsSection, NavigationEntry, PostStatusSection, PostTypesSection, SidebarEntry,
    ThemeFeatures, ThemeSupportEntry, SECTION_CONTACT_METHODS, SECTION_NAVIGATIONS,
    SECTION_POST_STATUS, SECTION_POST_TYPES, SECTION_SIDEBARS, SECTION_THEME_FEATURES,
    SECTION_THEME_SUPPORT, SECTION_WIDGETS,
};
use log::{error, info};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default manifest location, relative to the theme root.
pub const DEFAULT_MANIFEST_FILE: &str = "manifest.json";

/// Manifest key overriding the translation namespace.
pub const KEY_NAMESPACE: &str = "namespace";
/// Preferred manifest key for the environment status.
pub const KEY_ENVIRONMENT_STATUS: &str = "environment-status";
/// Legacy short manifest key for the environment status.
pub const KEY_ENV_STATUS: &str = "env-status";

/// Manifest load failures. All of them abort setup.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The file is missing or unreadable.
    #[error("failed to read manifest `{}`: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The content is not a JSON object.
    #[error("manifest `{origin}` is not valid JSON: {message}")]
    Parse { origin: String, message: String },
    /// A section is present but does not have the expected shape.
    #[error("manifest section `{section}` is malformed: {message}")]
    Shape {
        section: &'static str,
        message: String,
    },
}

/// Parsed, immutable theme manifest.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Manifest {
    source: Option<PathBuf>,
    namespace: Option<String>,
    environment_status: Option<String>,
    env_status: Option<String>,
    theme_support: Option<Vec<ThemeSupportEntry>>,
    navigations: Option<Vec<NavigationEntry>>,
    post_types: Option<PostTypesSection>,
    post_status: Option<PostStatusSection>,
    sidebars: Option<Vec<SidebarEntry>>,
    widgets: Option<Vec<String>>,
    contact_methods: Option<ContactMethodsSection>,
    theme_features: Option<ThemeFeatures>,
}

impl Manifest {
    /// Reads and decodes the manifest at `path`.
    ///
    /// # Side effects
    /// - One synchronous file read.
    /// - Emits `manifest_load` logging events.
    ///
    /// # Errors
    /// - `ManifestError::Load` when the file cannot be read.
    /// - `ManifestError::Parse` when the content is not a JSON object.
    /// - `ManifestError::Shape` when a known section is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        info!(
            "event=manifest_load module=manifest status=start path={}",
            path.display()
        );

        let result = std::fs::read_to_string(path)
            .map_err(|source| ManifestError::Load {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|raw| Self::parse(&raw, &path.display().to_string()))
            .map(|mut manifest| {
                manifest.source = Some(path.to_path_buf());
                manifest
            });

        match &result {
            Ok(manifest) => info!(
                "event=manifest_load module=manifest status=ok path={} sections={}",
                path.display(),
                manifest.section_count()
            ),
            Err(err) => error!(
                "event=manifest_load module=manifest status=error path={} error={}",
                path.display(),
                err
            ),
        }
        result
    }

    /// Decodes a manifest from an in-memory JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ManifestError> {
        Self::parse(raw, "<inline>")
    }

    /// Decodes a manifest from an already-parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Self, ManifestError> {
        let root = value.as_object().ok_or_else(|| ManifestError::Parse {
            origin: "<value>".to_string(),
            message: "top-level value must be an object".to_string(),
        })?;
        Self::from_root(root)
    }

    fn parse(raw: &str, origin: &str) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(raw).map_err(|err| ManifestError::Parse {
            origin: origin.to_string(),
            message: err.to_string(),
        })?;
        let root = value.as_object().ok_or_else(|| ManifestError::Parse {
            origin: origin.to_string(),
            message: "top-level value must be an object".to_string(),
        })?;
        Self::from_root(root)
    }

    fn from_root(root: &Map<String, Value>) -> Result<Self, ManifestError> {
        Ok(Self {
            source: None,
            namespace: scalar_string(root, KEY_NAMESPACE)?,
            environment_status: scalar_string(root, KEY_ENVIRONMENT_STATUS)?,
            env_status: scalar_string(root, KEY_ENV_STATUS)?,
            theme_support: section(root, SECTION_THEME_SUPPORT, decode_theme_support)?,
            navigations: section(root, SECTION_NAVIGATIONS, decode_navigations)?,
            post_types: section(root, SECTION_POST_TYPES, decode_post_types)?,
            post_status: section(root, SECTION_POST_STATUS, decode_post_status)?,
            sidebars: section(root, SECTION_SIDEBARS, decode_sidebars)?,
            widgets: section(root, SECTION_WIDGETS, decode_widgets)?,
            contact_methods: section(root, SECTION_CONTACT_METHODS, decode_contact_methods)?,
            theme_features: section(root, SECTION_THEME_FEATURES, decode_theme_features)?,
        })
    }

    /// Path the manifest was loaded from, if it came from disk.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn environment_status(&self) -> Option<&str> {
        self.environment_status.as_deref()
    }

    pub fn env_status(&self) -> Option<&str> {
        self.env_status.as_deref()
    }

    pub fn theme_support(&self) -> Option<&[ThemeSupportEntry]> {
        self.theme_support.as_deref()
    }

    pub fn navigations(&self) -> Option<&[NavigationEntry]> {
        self.navigations.as_deref()
    }

    pub fn post_types(&self) -> Option<&PostTypesSection> {
        self.post_types.as_ref()
    }

    pub fn post_status(&self) -> Option<&PostStatusSection> {
        self.post_status.as_ref()
    }

    pub fn sidebars(&self) -> Option<&[SidebarEntry]> {
        self.sidebars.as_deref()
    }

    pub fn widgets(&self) -> Option<&[String]> {
        self.widgets.as_deref()
    }

    pub fn contact_methods(&self) -> Option<&ContactMethodsSection> {
        self.contact_methods.as_ref()
    }

    pub fn theme_features(&self) -> Option<&ThemeFeatures> {
        self.theme_features.as_ref()
    }

    /// Number of known feature sections present.
    pub fn section_count(&self) -> usize {
        [
            self.theme_support.is_some(),
            self.navigations.is_some(),
            self.post_types.is_some(),
            self.post_status.is_some(),
            self.sidebars.is_some(),
            self.widgets.is_some(),
            self.contact_methods.is_some(),
            self.theme_features.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

fn section<T>(
    root: &Map<String, Value>,
    name: &'static str,
    decode: fn(&Value) -> Result<T, String>,
) -> Result<Option<T>, ManifestError> {
    root.get(name)
        .map(|value| {
            decode(value).map_err(|message| ManifestError::Shape {
                section: name,
                message,
            })
        })
        .transpose()
}

fn scalar_string(
    root: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<String>, ManifestError> {
    match root.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => Ok(Some(raw.clone())),
        Some(_) => Err(ManifestError::Shape {
            section: name,
            message: "must be a string".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{Manifest, ManifestError};
    use serde_json::json;

    #[test]
    fn empty_object_has_no_sections() {
        let manifest = Manifest::from_json_str("{}").expect("empty manifest");
        assert_eq!(manifest.section_count(), 0);
        assert!(manifest.post_types().is_none());
        assert!(manifest.source().is_none());
    }

    #[test]
    fn ignores_unknown_top_level_keys() {
        let manifest = Manifest::from_value(&json!({
            "version": "1.0.0",
            "widgets": ["Footer_Widget"]
        }))
        .expect("manifest with extras");
        assert_eq!(manifest.section_count(), 1);
        assert_eq!(manifest.widgets(), Some(&["Footer_Widget".to_string()][..]));
    }

    #[test]
    fn rejects_non_object_root() {
        let err = Manifest::from_json_str("[1, 2]").expect_err("array root must fail");
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn rejects_invalid_json() {
        let err = Manifest::from_json_str("{ \"widgets\": [ }").expect_err("bad json");
        assert!(matches!(err, ManifestError::Parse { .. }));
    }

    #[test]
    fn names_the_malformed_section() {
        let err = Manifest::from_value(&json!({ "navigations": "primary" }))
            .expect_err("scalar navigations must fail");
        match err {
            ManifestError::Shape { section, .. } => assert_eq!(section, "navigations"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_string_namespace() {
        let err = Manifest::from_value(&json!({ "namespace": 7 })).expect_err("numeric namespace");
        assert!(err.to_string().contains("`namespace`"));
    }
}
