//! Section processors.
//!
//! # Responsibility
//! - Translate one manifest section into host registration calls and
//!   queued removals.
//!
//! # Invariants
//! - An absent section returns `Ok(None)` without touching the host or the
//!   setup state.
//! - Registration calls are issued in manifest document order.
//! - Host errors are returned as-is; nothing is retried.

use crate::host::{Host, HostResult};
use crate::manifest::coerce::coerce_true_literals;
use crate::manifest::sections::ThemeSupport;
use crate::manifest::Manifest;
use crate::registrar::contact::ContactMethodDelta;
use crate::registrar::removal::{MetaBoxRemoval, RemovalSets, SubmenuRemoval, SupportRemoval};
use crate::registrar::status::StatusPresentation;
use log::{debug, warn};
use serde_json::{json, Value};

/// Label keys translated with a gettext context instead of plain
/// translation.
pub const POST_TYPE_LABEL_CONTEXTS: &[(&str, &str)] = &[
    ("name", "post type general name"),
    ("singular_name", "post type singular name"),
    ("menu_name", "admin menu"),
    ("name_admin_bar", "add new on admin bar"),
];

/// Context used when translating post status labels.
pub const POST_STATUS_LABEL_CONTEXT: &str = "post";

/// Built-in widget classes removed when the widget feature is switched off.
pub const BUILTIN_WIDGETS: &[&str] = &[
    "WP_Widget_Pages",
    "WP_Widget_Archives",
    "WP_Widget_Meta",
    "WP_Widget_Text",
    "WP_Widget_Recent_Posts",
    "WP_Widget_Recent_Comments",
    "WP_Widget_Calendar",
    "WP_Widget_Links",
    "WP_Widget_Search",
    "WP_Widget_Categories",
    "WP_Widget_RSS",
    "WP_Widget_Tag_Cloud",
    "WP_Nav_Menu_Widget",
    "Twenty_Eleven_Ephemera_Widget",
];

/// Options zeroed when comments are switched off.
pub const COMMENT_NOTIFICATION_OPTIONS: &[&str] = &["comments_notify", "default_pingback_flag"];

const DEFAULT_POST_TYPE: &str = "post";
const POST_LIST_URL: &str = "edit.php";

/// Mutable state threaded through the processors during one setup pass.
#[derive(Debug, Clone, Default)]
pub struct SectionState {
    pub namespace: String,
    pub removals: RemovalSets,
    pub contacts: ContactMethodDelta,
    pub status_presentation: Option<StatusPresentation>,
}

impl SectionState {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }
}

/// Processor signature: `Ok(None)` when the section is absent, otherwise the
/// number of host calls issued plus removals queued.
pub type Processor<H> = fn(&Manifest, &mut SectionState, &mut H) -> HostResult<Option<usize>>;

/// Processors in their fixed execution order.
pub fn ordered<H: Host>() -> [(&'static str, Processor<H>); 11] {
    [
        ("theme-support", theme_support::<H>),
        ("navigations", navigations::<H>),
        ("post-types", post_types::<H>),
        ("post-status", post_status::<H>),
        ("sidebars", sidebars::<H>),
        ("widgets", widgets::<H>),
        ("post-type-removal", post_type_removal::<H>),
        ("comments-removal", comments_removal::<H>),
        ("widget-feature-removal", widget_feature_removal::<H>),
        ("contact-methods", contact_methods::<H>),
        ("cleanup", cleanup::<H>),
    ]
}

pub fn theme_support<H: Host>(
    manifest: &Manifest,
    _state: &mut SectionState,
    host: &mut H,
) -> HostResult<Option<usize>> {
    let Some(entries) = manifest.theme_support() else {
        return Ok(None);
    };
    let mut calls = 0;
    for entry in entries {
        match &entry.value {
            ThemeSupport::Flag(true) => host.add_theme_support(&entry.feature, None)?,
            ThemeSupport::Flag(false) => continue,
            ThemeSupport::Payload(payload) => {
                host.add_theme_support(&entry.feature, Some(payload))?
            }
            ThemeSupport::Text(text) => {
                host.add_theme_support(&entry.feature, Some(&Value::String(text.clone())))?
            }
            ThemeSupport::Unsupported => {
                debug!(
                    "event=theme_support module=registrar status=skip feature={} reason=unsupported_type",
                    entry.feature
                );
                continue;
            }
        }
        calls += 1;
    }
    Ok(Some(calls))
}

pub fn navigations<H: Host>(
    manifest: &Manifest,
    state: &mut SectionState,
    host: &mut H,
) -> HostResult<Option<usize>> {
    let Some(entries) = manifest.navigations() else {
        return Ok(None);
    };
    for entry in entries {
        let label = host.translate(&entry.label, &state.namespace);
        host.register_nav_menu(&entry.location, &label)?;
    }
    Ok(Some(entries.len()))
}

pub fn post_types<H: Host>(
    manifest: &Manifest,
    state: &mut SectionState,
    host: &mut H,
) -> HostResult<Option<usize>> {
    let Some(section) = manifest.post_types() else {
        return Ok(None);
    };
    let domain = state.namespace.as_str();
    for entry in &section.entries {
        let mut args = entry.args.clone();
        if let Some(Value::Object(labels)) = args.get_mut("labels") {
            for (key, value) in labels.iter_mut() {
                let Some(text) = value.as_str() else {
                    continue;
                };
                let translated = match label_context(key) {
                    Some(context) => host.translate_with_context(text, context, domain),
                    None => host.translate(text, domain),
                };
                *value = Value::String(translated);
            }
        }
        translate_keys(&mut args, &["label", "description"], &*host, domain);
        let coerced = coerce_true_literals(&mut args);
        if !coerced.is_empty() {
            debug!(
                "event=post_type_args module=registrar status=ok post_type={} coerced={}",
                entry.post_type,
                coerced.join(",")
            );
        }
        host.register_post_type(&entry.post_type, &args)?;
    }
    Ok(Some(section.entries.len()))
}

pub fn post_status<H: Host>(
    manifest: &Manifest,
    state: &mut SectionState,
    host: &mut H,
) -> HostResult<Option<usize>> {
    let Some(section) = manifest.post_status() else {
        return Ok(None);
    };
    let domain = state.namespace.clone();
    for entry in &section.entries {
        let mut args = entry.args.clone();
        if let Some(label) = args.get("label").and_then(Value::as_str) {
            let translated =
                host.translate_with_context(label, POST_STATUS_LABEL_CONTEXT, &domain);
            args.insert("label".to_string(), Value::String(translated));
        }
        let forms = args
            .get("label_count")
            .and_then(Value::as_array)
            .and_then(|forms| {
                let singular = forms.first()?.as_str()?;
                let plural = forms.get(1)?.as_str()?;
                Some((singular.to_string(), plural.to_string()))
            });
        if let Some((singular, plural)) = forms {
            let noop = host.plural_noop(&singular, &plural, &domain);
            args.insert(
                "label_count".to_string(),
                json!({
                    "singular": noop.singular,
                    "plural": noop.plural,
                    "context": noop.context,
                    "domain": noop.domain,
                }),
            );
        }
        host.register_post_status(&entry.status, &args)?;
    }
    if host.is_admin() {
        state.status_presentation =
            Some(StatusPresentation::from_section(section, &*host, &domain));
    }
    Ok(Some(section.entries.len()))
}

pub fn sidebars<H: Host>(
    manifest: &Manifest,
    state: &mut SectionState,
    host: &mut H,
) -> HostResult<Option<usize>> {
    let Some(entries) = manifest.sidebars() else {
        return Ok(None);
    };
    for entry in entries {
        let mut args = entry.args.clone();
        translate_keys(&mut args, &["name", "description"], &*host, &state.namespace);
        host.register_sidebar(&args)?;
    }
    Ok(Some(entries.len()))
}

pub fn widgets<H: Host>(
    manifest: &Manifest,
    _state: &mut SectionState,
    host: &mut H,
) -> HostResult<Option<usize>> {
    let Some(widgets) = manifest.widgets() else {
        return Ok(None);
    };
    for widget in widgets {
        host.register_widget(widget)?;
    }
    Ok(Some(widgets.len()))
}

pub fn post_type_removal<H: Host>(
    manifest: &Manifest,
    state: &mut SectionState,
    host: &mut H,
) -> HostResult<Option<usize>> {
    let Some(section) = manifest.post_types() else {
        return Ok(None);
    };
    if section.remove.is_empty() {
        return Ok(None);
    }
    let mut effects = 0;
    for post_type in &section.remove {
        let Some(name) = host.post_type_name(post_type) else {
            warn!(
                "event=post_type_removal module=registrar status=skip post_type={} reason=not_registered",
                post_type
            );
            continue;
        };
        host.unregister_post_type(post_type)?;
        state.removals.admin_menu.push(post_list_url(&name));
        effects += 2;
    }
    Ok(Some(effects))
}

/// Admin menu URL listing posts of the given internal type name.
pub fn post_list_url(name: &str) -> String {
    if name == DEFAULT_POST_TYPE {
        POST_LIST_URL.to_string()
    } else {
        format!("{POST_LIST_URL}?post_type={name}")
    }
}

pub fn comments_removal<H: Host>(
    manifest: &Manifest,
    state: &mut SectionState,
    host: &mut H,
) -> HostResult<Option<usize>> {
    let Some(features) = manifest.theme_features() else {
        return Ok(None);
    };
    if !features.comments_disabled() {
        return Ok(None);
    }
    for option in COMMENT_NOTIFICATION_OPTIONS {
        host.set_option(option, &json!(0))?;
    }
    let removals = &mut state.removals;
    let before = queued(removals);
    for post_type in host.registered_post_types() {
        removals
            .meta_boxes
            .push(MetaBoxRemoval::new("commentstatusdiv", post_type.as_str(), "normal"));
        removals
            .meta_boxes
            .push(MetaBoxRemoval::new("trackbacksdiv", post_type.as_str(), "normal"));
        removals
            .post_type_supports
            .push(SupportRemoval::new(post_type.as_str(), "comments"));
        removals
            .post_type_supports
            .push(SupportRemoval::new(post_type, "trackbacks"));
    }
    removals.meta_boxes.push(MetaBoxRemoval::new(
        "dashboard_recent_comments",
        "dashboard",
        "normal",
    ));
    removals.admin_menu.push("edit-comments.php".to_string());
    removals
        .admin_submenu
        .push(SubmenuRemoval::new("options-general.php", "options-discussion.php"));
    Ok(Some(COMMENT_NOTIFICATION_OPTIONS.len() + queued(removals) - before))
}

pub fn widget_feature_removal<H: Host>(
    manifest: &Manifest,
    state: &mut SectionState,
    host: &mut H,
) -> HostResult<Option<usize>> {
    let Some(features) = manifest.theme_features() else {
        return Ok(None);
    };
    if !features.widget_removal_requested() {
        return Ok(None);
    }
    let removals = &mut state.removals;
    let before = queued(removals);
    removals
        .widgets
        .extend(BUILTIN_WIDGETS.iter().map(|widget| widget.to_string()));
    removals.widgets.extend(host.registered_widget_ids());
    removals.sidebars.extend(host.registered_sidebar_ids());
    removals
        .admin_submenu
        .push(SubmenuRemoval::new("themes.php", "widgets.php"));
    Ok(Some(queued(removals) - before))
}

pub fn contact_methods<H: Host>(
    manifest: &Manifest,
    state: &mut SectionState,
    _host: &mut H,
) -> HostResult<Option<usize>> {
    let Some(section) = manifest.contact_methods() else {
        return Ok(None);
    };
    state.contacts = ContactMethodDelta::from_section(section);
    Ok(Some(section.add.len() + section.remove.len()))
}

pub fn cleanup<H: Host>(
    manifest: &Manifest,
    _state: &mut SectionState,
    host: &mut H,
) -> HostResult<Option<usize>> {
    let Some(options) = manifest
        .theme_features()
        .and_then(|features| features.cleanup_options())
    else {
        return Ok(None);
    };
    host.run_cleanup(options)?;
    Ok(Some(1))
}

fn label_context(key: &str) -> Option<&'static str> {
    POST_TYPE_LABEL_CONTEXTS
        .iter()
        .find(|(label_key, _)| *label_key == key)
        .map(|(_, context)| *context)
}

fn translate_keys<H: Host>(
    args: &mut serde_json::Map<String, Value>,
    keys: &[&str],
    host: &H,
    domain: &str,
) {
    for key in keys {
        if let Some(Value::String(text)) = args.get_mut(*key) {
            *text = host.translate(text, domain);
        }
    }
}

fn queued(removals: &RemovalSets) -> usize {
    removals.admin_menu.len()
        + removals.admin_submenu.len()
        + removals.meta_boxes.len()
        + removals.post_type_supports.len()
        + removals.widgets.len()
        + removals.sidebars.len()
}
