//! Removal sets and their deferred appliers.
//!
//! # Responsibility
//! - Accumulate everything setup decided to remove, in insertion order.
//! - Turn non-empty sets into one-shot appliers bound to host extension
//!   points.
//!
//! # Invariants
//! - An empty set never yields an applier.
//! - An applier is consumed by `apply`; it cannot run twice.
//! - Admin-only sets yield appliers only when the host renders admin screens.

use crate::host::{HostResult, RemovalHost};
use log::debug;
use serde::Serialize;

/// Host lifecycle points the registrar binds callbacks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionPoint {
    /// Widget subsystem initialization.
    WidgetsInit,
    /// Admin menu construction.
    AdminMenu,
    /// Admin screen initialization.
    AdminInit,
    /// User profile contact-method filter.
    UserContactMethods,
    /// Post list row state badges.
    DisplayPostStates,
    /// Footer of the post list screen (quick edit).
    EditListFooter,
    /// Footer of the post edit screen.
    PostEditFooter,
    /// Footer of the new-post screen.
    PostNewFooter,
}

impl ExtensionPoint {
    /// Stable host hook name.
    pub fn hook_name(self) -> &'static str {
        match self {
            Self::WidgetsInit => "widgets_init",
            Self::AdminMenu => "admin_menu",
            Self::AdminInit => "admin_init",
            Self::UserContactMethods => "user_contactmethods",
            Self::DisplayPostStates => "display_post_states",
            Self::EditListFooter => "admin_footer-edit.php",
            Self::PostEditFooter => "admin_footer-post.php",
            Self::PostNewFooter => "admin_footer-post-new.php",
        }
    }

    /// Binding priority; widget removal must run after default widget
    /// registration (priority 10).
    pub fn priority(self) -> i32 {
        match self {
            Self::WidgetsInit => 11,
            _ => 10,
        }
    }
}

/// One meta box to remove from a screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaBoxRemoval {
    pub id: String,
    pub screen: String,
    pub context: String,
}

impl MetaBoxRemoval {
    pub fn new(
        id: impl Into<String>,
        screen: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            screen: screen.into(),
            context: context.into(),
        }
    }
}

/// One feature support to strip from a post type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportRemoval {
    pub post_type: String,
    pub feature: String,
}

impl SupportRemoval {
    pub fn new(post_type: impl Into<String>, feature: impl Into<String>) -> Self {
        Self {
            post_type: post_type.into(),
            feature: feature.into(),
        }
    }
}

/// One admin submenu entry to hide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmenuRemoval {
    pub parent: String,
    pub slug: String,
}

impl SubmenuRemoval {
    pub fn new(parent: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            slug: slug.into(),
        }
    }
}

/// Everything queued for removal during setup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RemovalSets {
    pub admin_menu: Vec<String>,
    pub admin_submenu: Vec<SubmenuRemoval>,
    pub meta_boxes: Vec<MetaBoxRemoval>,
    pub post_type_supports: Vec<SupportRemoval>,
    pub widgets: Vec<String>,
    pub sidebars: Vec<String>,
}

impl RemovalSets {
    pub fn is_empty(&self) -> bool {
        self.admin_menu.is_empty()
            && self.admin_submenu.is_empty()
            && self.meta_boxes.is_empty()
            && self.post_type_supports.is_empty()
            && self.widgets.is_empty()
            && self.sidebars.is_empty()
    }

    /// Converts the sets into appliers, skipping empty ones.
    ///
    /// Widget and sidebar removal always apply; menu, meta box and support
    /// removal only make sense on admin screens.
    pub fn into_appliers(self, is_admin: bool) -> Vec<DeferredApplier> {
        let mut appliers = vec![
            DeferredApplier::RemoveWidgets(self.widgets),
            DeferredApplier::RemoveSidebars(self.sidebars),
        ];
        if is_admin {
            appliers.extend([
                DeferredApplier::RemoveAdminMenuItems(self.admin_menu),
                DeferredApplier::RemoveAdminSubmenuItems(self.admin_submenu),
                DeferredApplier::RemoveMetaBoxes(self.meta_boxes),
                DeferredApplier::RemovePostTypeSupports(self.post_type_supports),
            ]);
        }
        appliers.retain(|applier| !applier.is_empty());
        appliers
    }
}

/// One-shot callback consuming a single removal set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "applier", content = "entries", rename_all = "snake_case")]
pub enum DeferredApplier {
    RemoveWidgets(Vec<String>),
    RemoveSidebars(Vec<String>),
    RemoveAdminMenuItems(Vec<String>),
    RemoveAdminSubmenuItems(Vec<SubmenuRemoval>),
    RemoveMetaBoxes(Vec<MetaBoxRemoval>),
    RemovePostTypeSupports(Vec<SupportRemoval>),
}

impl DeferredApplier {
    pub fn extension_point(&self) -> ExtensionPoint {
        match self {
            Self::RemoveWidgets(_) | Self::RemoveSidebars(_) => ExtensionPoint::WidgetsInit,
            Self::RemoveAdminMenuItems(_) | Self::RemoveAdminSubmenuItems(_) => {
                ExtensionPoint::AdminMenu
            }
            Self::RemoveMetaBoxes(_) | Self::RemovePostTypeSupports(_) => {
                ExtensionPoint::AdminInit
            }
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RemoveWidgets(_) => "remove_widgets",
            Self::RemoveSidebars(_) => "remove_sidebars",
            Self::RemoveAdminMenuItems(_) => "remove_admin_menu_items",
            Self::RemoveAdminSubmenuItems(_) => "remove_admin_submenu_items",
            Self::RemoveMetaBoxes(_) => "remove_meta_boxes",
            Self::RemovePostTypeSupports(_) => "remove_post_type_supports",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::RemoveWidgets(items)
            | Self::RemoveSidebars(items)
            | Self::RemoveAdminMenuItems(items) => items.len(),
            Self::RemoveAdminSubmenuItems(items) => items.len(),
            Self::RemoveMetaBoxes(items) => items.len(),
            Self::RemovePostTypeSupports(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls the matching unregister primitive once per entry, in order.
    ///
    /// Stops at the first host error and returns it.
    pub fn apply<H: RemovalHost + ?Sized>(self, host: &mut H) -> HostResult<usize> {
        let name = self.name();
        let count = self.len();
        match self {
            Self::RemoveWidgets(items) => {
                for widget in &items {
                    host.unregister_widget(widget)?;
                }
            }
            Self::RemoveSidebars(items) => {
                for sidebar in &items {
                    host.unregister_sidebar(sidebar)?;
                }
            }
            Self::RemoveAdminMenuItems(items) => {
                for slug in &items {
                    host.remove_menu_page(slug)?;
                }
            }
            Self::RemoveAdminSubmenuItems(items) => {
                for item in &items {
                    host.remove_submenu_page(&item.parent, &item.slug)?;
                }
            }
            Self::RemoveMetaBoxes(items) => {
                for item in &items {
                    host.remove_meta_box(&item.id, &item.screen, &item.context)?;
                }
            }
            Self::RemovePostTypeSupports(items) => {
                for item in &items {
                    host.remove_post_type_support(&item.post_type, &item.feature)?;
                }
            }
        }
        debug!("event=deferred_apply module=registrar status=ok applier={name} count={count}");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DeferredApplier, ExtensionPoint, MetaBoxRemoval, RemovalSets, SubmenuRemoval,
        SupportRemoval,
    };
    use crate::host::{HostCall, RecordingHost, RegistrySnapshot};

    fn populated_sets() -> RemovalSets {
        RemovalSets {
            admin_menu: vec!["edit-comments.php".to_string()],
            admin_submenu: vec![SubmenuRemoval::new("themes.php", "widgets.php")],
            meta_boxes: vec![MetaBoxRemoval::new("trackbacksdiv", "post", "normal")],
            post_type_supports: vec![SupportRemoval::new("post", "comments")],
            widgets: vec!["WP_Widget_Meta".to_string()],
            sidebars: vec!["footer-1".to_string()],
        }
    }

    #[test]
    fn empty_sets_yield_no_appliers() {
        let sets = RemovalSets::default();
        assert!(sets.is_empty());
        assert!(sets.into_appliers(true).is_empty());
    }

    #[test]
    fn admin_only_sets_are_dropped_outside_admin() {
        let appliers = populated_sets().into_appliers(false);
        let names: Vec<_> = appliers.iter().map(DeferredApplier::name).collect();
        assert_eq!(names, vec!["remove_widgets", "remove_sidebars"]);
        assert!(appliers
            .iter()
            .all(|applier| applier.extension_point() == ExtensionPoint::WidgetsInit));
    }

    #[test]
    fn only_non_empty_sets_become_appliers() {
        let sets = RemovalSets {
            admin_menu: vec!["edit.php".to_string()],
            sidebars: vec!["footer-1".to_string()],
            ..RemovalSets::default()
        };
        assert!(!sets.is_empty());

        let appliers = sets.into_appliers(true);

        assert_eq!(
            appliers,
            vec![
                DeferredApplier::RemoveSidebars(vec!["footer-1".to_string()]),
                DeferredApplier::RemoveAdminMenuItems(vec!["edit.php".to_string()]),
            ]
        );
        assert!(appliers.iter().all(|applier| !applier.is_empty()));
    }

    #[test]
    fn admin_appliers_bind_to_menu_and_init_points() {
        let appliers = populated_sets().into_appliers(true);
        let points: Vec<_> = appliers
            .iter()
            .map(DeferredApplier::extension_point)
            .collect();
        assert_eq!(
            points,
            vec![
                ExtensionPoint::WidgetsInit,
                ExtensionPoint::WidgetsInit,
                ExtensionPoint::AdminMenu,
                ExtensionPoint::AdminMenu,
                ExtensionPoint::AdminInit,
                ExtensionPoint::AdminInit,
            ]
        );
    }

    #[test]
    fn apply_calls_primitive_once_per_entry_in_order() {
        let mut host = RecordingHost::new(RegistrySnapshot::new());
        let applier = DeferredApplier::RemoveMetaBoxes(vec![
            MetaBoxRemoval::new("commentstatusdiv", "post", "normal"),
            MetaBoxRemoval::new("dashboard_recent_comments", "dashboard", "normal"),
        ]);

        let applied = applier.apply(&mut host).expect("apply meta boxes");

        assert_eq!(applied, 2);
        assert_eq!(
            host.calls(),
            &[
                HostCall::RemoveMetaBox {
                    id: "commentstatusdiv".to_string(),
                    screen: "post".to_string(),
                    context: "normal".to_string(),
                },
                HostCall::RemoveMetaBox {
                    id: "dashboard_recent_comments".to_string(),
                    screen: "dashboard".to_string(),
                    context: "normal".to_string(),
                },
            ]
        );
    }

    #[test]
    fn apply_propagates_host_errors() {
        let mut host =
            RecordingHost::new(RegistrySnapshot::new()).fail_on("remove_submenu_page");
        let applier =
            DeferredApplier::RemoveAdminSubmenuItems(vec![SubmenuRemoval::new("a.php", "b.php")]);
        let err = applier.apply(&mut host).expect_err("host error must surface");
        assert_eq!(err.operation, "remove_submenu_page");
    }

    #[test]
    fn widgets_init_runs_after_default_priority() {
        assert_eq!(ExtensionPoint::WidgetsInit.priority(), 11);
        assert_eq!(ExtensionPoint::AdminMenu.priority(), 10);
        assert_eq!(ExtensionPoint::WidgetsInit.hook_name(), "widgets_init");
    }
}
