//! In-memory registry snapshot.

use crate::host::HostRegistry;
use serde::{Deserialize, Serialize};

/// One registered post type as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredPostType {
    pub id: String,
    /// Internal name; defaults to `id` when omitted.
    #[serde(default)]
    pub name: Option<String>,
}

impl RegisteredPostType {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }

    pub fn internal_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Serializable copy of the host registries taken before setup runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySnapshot {
    pub is_admin: bool,
    pub post_types: Vec<RegisteredPostType>,
    pub widgets: Vec<String>,
    pub sidebars: Vec<String>,
}

impl RegistrySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    pub fn with_post_types<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.post_types
            .extend(ids.into_iter().map(RegisteredPostType::new));
        self
    }

    pub fn with_widgets<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.widgets.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_sidebars<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sidebars.extend(ids.into_iter().map(Into::into));
        self
    }
}

impl HostRegistry for RegistrySnapshot {
    fn is_admin(&self) -> bool {
        self.is_admin
    }

    fn post_type_name(&self, post_type: &str) -> Option<String> {
        self.post_types
            .iter()
            .find(|entry| entry.id == post_type)
            .map(|entry| entry.internal_name().to_string())
    }

    fn registered_post_types(&self) -> Vec<String> {
        self.post_types
            .iter()
            .map(|entry| entry.internal_name().to_string())
            .collect()
    }

    fn registered_widget_ids(&self) -> Vec<String> {
        self.widgets.clone()
    }

    fn registered_sidebar_ids(&self) -> Vec<String> {
        self.sidebars.clone()
    }
}
