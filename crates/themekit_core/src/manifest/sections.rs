//! Typed manifest sections.
//!
//! # Responsibility
//! - Decode each top-level manifest section into its typed form once, at
//!   load time.
//! - Reject present-but-malformed sections with a message naming the
//!   offending entry.
//!
//! # Invariants
//! - Entry order follows document order.
//! - The reserved `remove` key never appears as a registration entry.

use crate::manifest::coerce::{coerce_bool, TRUE_LITERAL};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// Section key for theme feature flags.
pub const SECTION_THEME_SUPPORT: &str = "theme-support";
/// Section key for navigation menu locations.
pub const SECTION_NAVIGATIONS: &str = "navigations";
/// Section key for custom post types.
pub const SECTION_POST_TYPES: &str = "post-types";
/// Section key for custom post statuses.
pub const SECTION_POST_STATUS: &str = "post-status";
/// Section key for sidebars.
pub const SECTION_SIDEBARS: &str = "sidebars";
/// Section key for widget classes.
pub const SECTION_WIDGETS: &str = "widgets";
/// Section key for user contact methods.
pub const SECTION_CONTACT_METHODS: &str = "contact-methods";
/// Section key for feature toggles (comments, widget, cleanup).
pub const SECTION_THEME_FEATURES: &str = "theme-features";

/// Reserved key holding removal directives inside a section.
pub const REMOVE_KEY: &str = "remove";

static REGISTRY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_-]{1,20}$").expect("valid registry key regex"));

/// Returns whether the host stores `key` unchanged as a post type or post
/// status key.
///
/// Host registries store these keys in 20-character columns, lowercase.
/// Other keys are still handed over; the host normalizes or rejects them.
pub fn is_valid_registry_key(key: &str) -> bool {
    REGISTRY_KEY_RE.is_match(key)
}

/// Decoded value of one `theme-support` entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeSupport {
    /// Boolean toggle (`"true"` is already folded into `Flag(true)`).
    Flag(bool),
    /// Array or object payload passed through to the host.
    Payload(Value),
    /// String payload passed through to the host.
    Text(String),
    /// Number or null; never reaches the host.
    Unsupported,
}

impl ThemeSupport {
    /// Classifies one raw manifest value.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(flag) => Self::Flag(*flag),
            Value::String(raw) if raw == TRUE_LITERAL => Self::Flag(true),
            Value::String(raw) => Self::Text(raw.clone()),
            Value::Array(_) | Value::Object(_) => Self::Payload(value.clone()),
            Value::Number(_) | Value::Null => Self::Unsupported,
        }
    }
}

/// One `theme-support` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeSupportEntry {
    pub feature: String,
    pub value: ThemeSupport,
}

/// One navigation menu location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    pub location: String,
    /// Untranslated human label.
    pub label: String,
}

/// One custom post type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct PostTypeEntry {
    pub post_type: String,
    /// Raw registration arguments, untranslated and uncoerced.
    pub args: Map<String, Value>,
}

/// The `post-types` section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostTypesSection {
    pub entries: Vec<PostTypeEntry>,
    /// Post type ids listed under `remove`.
    pub remove: Vec<String>,
}

/// One custom post status declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct PostStatusEntry {
    pub status: String,
    pub args: Map<String, Value>,
}

impl PostStatusEntry {
    /// Untranslated `label` argument, if declared.
    pub fn label(&self) -> Option<&str> {
        self.args.get("label").and_then(Value::as_str)
    }
}

/// The `post-status` section.
///
/// A `remove` key is accepted and ignored: hosts offer no status
/// unregistration primitive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostStatusSection {
    pub entries: Vec<PostStatusEntry>,
}

/// One sidebar declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarEntry {
    pub args: Map<String, Value>,
}

/// The `contact-methods` section split into its add and remove halves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactMethodsSection {
    pub add: Vec<(String, String)>,
    pub remove: Vec<String>,
}

/// The `theme-features` section. Only the known toggles are kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThemeFeatures {
    pub comments: Option<Value>,
    pub widget: Option<Value>,
    pub cleanup: Option<Value>,
}

impl ThemeFeatures {
    /// True when `comments` is declared and resolves to `false`.
    pub fn comments_disabled(&self) -> bool {
        self.comments.as_ref().and_then(coerce_bool) == Some(false)
    }

    /// True when `widget` is declared and resolves to `true`.
    pub fn widget_removal_requested(&self) -> bool {
        self.widget.as_ref().and_then(coerce_bool) == Some(true)
    }

    /// Cleanup options, unless cleanup is absent or switched off.
    pub fn cleanup_options(&self) -> Option<&Value> {
        let options = self.cleanup.as_ref()?;
        match coerce_bool(options) {
            Some(false) => None,
            _ => Some(options),
        }
    }
}

pub(crate) fn decode_theme_support(value: &Value) -> Result<Vec<ThemeSupportEntry>, String> {
    let object = expect_object(value, "section")?;
    Ok(object
        .iter()
        .map(|(feature, raw)| ThemeSupportEntry {
            feature: feature.clone(),
            value: ThemeSupport::from_value(raw),
        })
        .collect())
}

pub(crate) fn decode_navigations(value: &Value) -> Result<Vec<NavigationEntry>, String> {
    let object = expect_object(value, "section")?;
    object
        .iter()
        .map(|(location, raw)| {
            let label = expect_str(raw, location)?;
            Ok(NavigationEntry {
                location: location.clone(),
                label: label.to_string(),
            })
        })
        .collect()
}

pub(crate) fn decode_post_types(value: &Value) -> Result<PostTypesSection, String> {
    let object = expect_object(value, "section")?;
    let mut section = PostTypesSection::default();
    for (key, raw) in object {
        if key == REMOVE_KEY {
            section.remove = expect_string_list(raw, REMOVE_KEY)?;
            continue;
        }
        warn_unusual_key("post_type", key);
        let args = expect_object(raw, key)?.clone();
        if let Some(labels) = args.get("labels") {
            let labels = expect_object(labels, &format!("{key}.labels"))?;
            for (label_key, label) in labels {
                expect_str(label, &format!("{key}.labels.{label_key}"))?;
            }
        }
        for text_key in ["label", "description"] {
            if let Some(text) = args.get(text_key) {
                expect_str(text, &format!("{key}.{text_key}"))?;
            }
        }
        section.entries.push(PostTypeEntry {
            post_type: key.clone(),
            args,
        });
    }
    Ok(section)
}

pub(crate) fn decode_post_status(value: &Value) -> Result<PostStatusSection, String> {
    let object = expect_object(value, "section")?;
    let mut section = PostStatusSection::default();
    for (key, raw) in object {
        if key == REMOVE_KEY {
            continue;
        }
        warn_unusual_key("post_status", key);
        let args = expect_object(raw, key)?.clone();
        if let Some(label) = args.get("label") {
            expect_str(label, &format!("{key}.label"))?;
        }
        if let Some(count) = args.get("label_count") {
            let forms = expect_string_list(count, &format!("{key}.label_count"))?;
            if forms.len() != 2 {
                return Err(format!(
                    "`{key}.label_count` must hold exactly [singular, plural], got {} entries",
                    forms.len()
                ));
            }
        }
        section.entries.push(PostStatusEntry {
            status: key.clone(),
            args,
        });
    }
    Ok(section)
}

pub(crate) fn decode_sidebars(value: &Value) -> Result<Vec<SidebarEntry>, String> {
    let items = expect_array(value, "section")?;
    items
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let path = format!("[{index}]");
            let args = expect_object(raw, &path)?.clone();
            for text_key in ["name", "description"] {
                if let Some(text) = args.get(text_key) {
                    expect_str(text, &format!("{path}.{text_key}"))?;
                }
            }
            Ok(SidebarEntry { args })
        })
        .collect()
}

pub(crate) fn decode_widgets(value: &Value) -> Result<Vec<String>, String> {
    expect_string_list(value, "section")
}

pub(crate) fn decode_contact_methods(value: &Value) -> Result<ContactMethodsSection, String> {
    let object = expect_object(value, "section")?;
    let mut section = ContactMethodsSection::default();
    for (key, raw) in object {
        if key == REMOVE_KEY {
            section.remove = expect_string_list(raw, REMOVE_KEY)?;
            continue;
        }
        let label = expect_str(raw, key)?;
        section.add.push((key.clone(), label.to_string()));
    }
    Ok(section)
}

pub(crate) fn decode_theme_features(value: &Value) -> Result<ThemeFeatures, String> {
    let object = expect_object(value, "section")?;
    Ok(ThemeFeatures {
        comments: object.get("comments").cloned(),
        widget: object.get("widget").cloned(),
        cleanup: object.get("cleanup").cloned(),
    })
}

fn warn_unusual_key(kind: &str, key: &str) {
    if !is_valid_registry_key(key) {
        warn!(
            "event=manifest_decode module=manifest status=warn {kind}={key} reason=not_lowercase_key_of_1_to_20_chars"
        );
    }
}

fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, String> {
    value
        .as_object()
        .ok_or_else(|| format!("`{path}` must be an object, got {}", kind_of(value)))
}

fn expect_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, String> {
    value
        .as_array()
        .ok_or_else(|| format!("`{path}` must be an array, got {}", kind_of(value)))
}

fn expect_str<'a>(value: &'a Value, path: &str) -> Result<&'a str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("`{path}` must be a string, got {}", kind_of(value)))
}

fn expect_string_list(value: &Value, path: &str) -> Result<Vec<String>, String> {
    expect_array(value, path)?
        .iter()
        .enumerate()
        .map(|(index, item)| expect_str(item, &format!("{path}[{index}]")).map(str::to_string))
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
