//! Custom post status presentation on admin screens.
//!
//! Hosts list only built-in statuses in their status dropdowns and row
//! badges. These callbacks surface the manifest's custom statuses there.

use crate::host::Translator;
use crate::manifest::sections::PostStatusSection;
use serde::Serialize;

/// Translated display label of one custom status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLabel {
    pub status: String,
    pub label: String,
}

/// One `<option>` in a status dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Dropdown content for the single-post edit screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditScreenOptions {
    pub options: Vec<StatusOption>,
    /// Label shown next to "Status:" when the post uses a custom status.
    pub current_label: Option<String>,
}

/// Presentation callbacks derived from the `post-status` section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StatusPresentation {
    labels: Vec<StatusLabel>,
}

impl StatusPresentation {
    /// Builds labels with plain translation; a status without `label`
    /// falls back to its key.
    pub fn from_section<T: Translator + ?Sized>(
        section: &PostStatusSection,
        translator: &T,
        domain: &str,
    ) -> Self {
        let labels = section
            .entries
            .iter()
            .map(|entry| {
                let raw = entry.label().unwrap_or(entry.status.as_str());
                StatusLabel {
                    status: entry.status.clone(),
                    label: translator.translate(raw, domain),
                }
            })
            .collect();
        Self { labels }
    }

    pub fn labels(&self) -> &[StatusLabel] {
        &self.labels
    }

    fn label_of(&self, status: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|entry| entry.status == status)
            .map(|entry| entry.label.as_str())
    }

    /// Options appended to the quick-edit status dropdown.
    pub fn quick_edit_options(&self) -> Vec<StatusOption> {
        self.labels
            .iter()
            .map(|entry| StatusOption {
                value: entry.status.clone(),
                label: entry.label.clone(),
                selected: false,
            })
            .collect()
    }

    /// Options appended to the edit-screen dropdown for a post currently in
    /// `current_status`.
    pub fn edit_screen_options(&self, current_status: &str) -> EditScreenOptions {
        let options = self
            .labels
            .iter()
            .map(|entry| StatusOption {
                value: entry.status.clone(),
                label: entry.label.clone(),
                selected: entry.status == current_status,
            })
            .collect();
        EditScreenOptions {
            options,
            current_label: self.label_of(current_status).map(str::to_string),
        }
    }

    /// Row badges for a post in `post_status`.
    ///
    /// Replaces `existing` with the custom label unless the list is already
    /// filtered to that status.
    pub fn status_badges(
        &self,
        post_status: &str,
        queried_status: Option<&str>,
        existing: Vec<String>,
    ) -> Vec<String> {
        if queried_status == Some(post_status) {
            return existing;
        }
        match self.label_of(post_status) {
            Some(label) => vec![label.to_string()],
            None => existing,
        }
    }
}
