//! Recording host used for dry runs and tests.
//!
//! Every primitive appends one `HostCall` and succeeds, unless the operation
//! was marked to fail with `fail_on`.

use crate::host::{
    Host, HostError, HostRegistry, HostResult, RegistrySnapshot, RemovalHost, Translator,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// One recorded host primitive invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    LoadTextDomain {
        domain: String,
    },
    AddThemeSupport {
        feature: String,
        payload: Option<Value>,
    },
    RegisterNavMenu {
        location: String,
        label: String,
    },
    RegisterPostType {
        post_type: String,
        args: Map<String, Value>,
    },
    RegisterPostStatus {
        status: String,
        args: Map<String, Value>,
    },
    RegisterSidebar {
        args: Map<String, Value>,
    },
    RegisterWidget {
        widget: String,
    },
    UnregisterPostType {
        post_type: String,
    },
    SetOption {
        name: String,
        value: Value,
    },
    RunCleanup {
        options: Value,
    },
    UnregisterWidget {
        widget: String,
    },
    UnregisterSidebar {
        sidebar: String,
    },
    RemoveMetaBox {
        id: String,
        screen: String,
        context: String,
    },
    RemovePostTypeSupport {
        post_type: String,
        feature: String,
    },
    RemoveMenuPage {
        slug: String,
    },
    RemoveSubmenuPage {
        parent: String,
        slug: String,
    },
}

/// Host stand-in backed by a registry snapshot.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    snapshot: RegistrySnapshot,
    calls: Vec<HostCall>,
    mark_translations: bool,
    fail_on: Option<&'static str>,
}

impl RecordingHost {
    pub fn new(snapshot: RegistrySnapshot) -> Self {
        Self {
            snapshot,
            ..Self::default()
        }
    }

    /// Makes translations visible: `text` becomes `text@domain` (or
    /// `text@domain#context`).
    pub fn with_marked_translations(mut self) -> Self {
        self.mark_translations = true;
        self
    }

    /// Makes the named operation return an error instead of recording.
    pub fn fail_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    pub fn snapshot(&self) -> &RegistrySnapshot {
        &self.snapshot
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<HostCall> {
        self.calls
    }

    fn record(&mut self, operation: &'static str, call: HostCall) -> HostResult<()> {
        if self.fail_on == Some(operation) {
            return Err(HostError::new(operation, "rejected by recording host"));
        }
        self.calls.push(call);
        Ok(())
    }
}

impl Translator for RecordingHost {
    fn translate(&self, text: &str, domain: &str) -> String {
        if self.mark_translations {
            format!("{text}@{domain}")
        } else {
            text.to_string()
        }
    }

    fn translate_with_context(&self, text: &str, context: &str, domain: &str) -> String {
        if self.mark_translations {
            format!("{text}@{domain}#{context}")
        } else {
            text.to_string()
        }
    }
}

impl HostRegistry for RecordingHost {
    fn is_admin(&self) -> bool {
        self.snapshot.is_admin()
    }

    fn post_type_name(&self, post_type: &str) -> Option<String> {
        self.snapshot.post_type_name(post_type)
    }

    fn registered_post_types(&self) -> Vec<String> {
        self.snapshot.registered_post_types()
    }

    fn registered_widget_ids(&self) -> Vec<String> {
        self.snapshot.registered_widget_ids()
    }

    fn registered_sidebar_ids(&self) -> Vec<String> {
        self.snapshot.registered_sidebar_ids()
    }
}

impl RemovalHost for RecordingHost {
    fn unregister_widget(&mut self, widget: &str) -> HostResult<()> {
        self.record(
            "unregister_widget",
            HostCall::UnregisterWidget {
                widget: widget.to_string(),
            },
        )
    }

    fn unregister_sidebar(&mut self, sidebar: &str) -> HostResult<()> {
        self.record(
            "unregister_sidebar",
            HostCall::UnregisterSidebar {
                sidebar: sidebar.to_string(),
            },
        )
    }

    fn remove_meta_box(&mut self, id: &str, screen: &str, context: &str) -> HostResult<()> {
        self.record(
            "remove_meta_box",
            HostCall::RemoveMetaBox {
                id: id.to_string(),
                screen: screen.to_string(),
                context: context.to_string(),
            },
        )
    }

    fn remove_post_type_support(&mut self, post_type: &str, feature: &str) -> HostResult<()> {
        self.record(
            "remove_post_type_support",
            HostCall::RemovePostTypeSupport {
                post_type: post_type.to_string(),
                feature: feature.to_string(),
            },
        )
    }

    fn remove_menu_page(&mut self, slug: &str) -> HostResult<()> {
        self.record(
            "remove_menu_page",
            HostCall::RemoveMenuPage {
                slug: slug.to_string(),
            },
        )
    }

    fn remove_submenu_page(&mut self, parent: &str, slug: &str) -> HostResult<()> {
        self.record(
            "remove_submenu_page",
            HostCall::RemoveSubmenuPage {
                parent: parent.to_string(),
                slug: slug.to_string(),
            },
        )
    }
}

impl Host for RecordingHost {
    fn load_text_domain(&mut self, domain: &str) -> HostResult<()> {
        self.record(
            "load_text_domain",
            HostCall::LoadTextDomain {
                domain: domain.to_string(),
            },
        )
    }

    fn add_theme_support(&mut self, feature: &str, payload: Option<&Value>) -> HostResult<()> {
        self.record(
            "add_theme_support",
            HostCall::AddThemeSupport {
                feature: feature.to_string(),
                payload: payload.cloned(),
            },
        )
    }

    fn register_nav_menu(&mut self, location: &str, label: &str) -> HostResult<()> {
        self.record(
            "register_nav_menu",
            HostCall::RegisterNavMenu {
                location: location.to_string(),
                label: label.to_string(),
            },
        )
    }

    fn register_post_type(
        &mut self,
        post_type: &str,
        args: &Map<String, Value>,
    ) -> HostResult<()> {
        self.record(
            "register_post_type",
            HostCall::RegisterPostType {
                post_type: post_type.to_string(),
                args: args.clone(),
            },
        )
    }

    fn register_post_status(
        &mut self,
        status: &str,
        args: &Map<String, Value>,
    ) -> HostResult<()> {
        self.record(
            "register_post_status",
            HostCall::RegisterPostStatus {
                status: status.to_string(),
                args: args.clone(),
            },
        )
    }

    fn register_sidebar(&mut self, args: &Map<String, Value>) -> HostResult<()> {
        self.record(
            "register_sidebar",
            HostCall::RegisterSidebar { args: args.clone() },
        )
    }

    fn register_widget(&mut self, widget: &str) -> HostResult<()> {
        self.record(
            "register_widget",
            HostCall::RegisterWidget {
                widget: widget.to_string(),
            },
        )
    }

    fn unregister_post_type(&mut self, post_type: &str) -> HostResult<()> {
        self.record(
            "unregister_post_type",
            HostCall::UnregisterPostType {
                post_type: post_type.to_string(),
            },
        )
    }

    fn set_option(&mut self, name: &str, value: &Value) -> HostResult<()> {
        self.record(
            "set_option",
            HostCall::SetOption {
                name: name.to_string(),
                value: value.clone(),
            },
        )
    }

    fn run_cleanup(&mut self, options: &Value) -> HostResult<()> {
        self.record(
            "run_cleanup",
            HostCall::RunCleanup {
                options: options.clone(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{HostCall, RecordingHost};
    use crate::host::{Host, RegistrySnapshot, Translator};

    #[test]
    fn records_calls_in_order() {
        let mut host = RecordingHost::new(RegistrySnapshot::new());
        host.register_widget("Footer_Widget").expect("widget call");
        host.register_nav_menu("primary", "Primary").expect("menu call");

        assert_eq!(
            host.calls(),
            &[
                HostCall::RegisterWidget {
                    widget: "Footer_Widget".to_string()
                },
                HostCall::RegisterNavMenu {
                    location: "primary".to_string(),
                    label: "Primary".to_string()
                },
            ]
        );
    }

    #[test]
    fn failing_operation_is_not_recorded() {
        let mut host = RecordingHost::new(RegistrySnapshot::new()).fail_on("register_widget");
        let err = host
            .register_widget("Footer_Widget")
            .expect_err("marked operation must fail");
        assert_eq!(err.operation, "register_widget");
        assert!(host.calls().is_empty());
    }

    #[test]
    fn marked_translations_expose_domain_and_context() {
        let host = RecordingHost::default().with_marked_translations();
        assert_eq!(host.translate("Books", "theme"), "Books@theme");
        assert_eq!(
            host.translate_with_context("Books", "admin menu", "theme"),
            "Books@theme#admin menu"
        );
    }

    #[test]
    fn serializes_with_call_tag() {
        let call = HostCall::RemoveMenuPage {
            slug: "edit.php".to_string(),
        };
        let json = serde_json::to_value(&call).expect("call serialization");
        assert_eq!(json["call"], "remove_menu_page");
        assert_eq!(json["slug"], "edit.php");
    }
}
