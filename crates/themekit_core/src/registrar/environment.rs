//! Environment status and namespace resolution.

use crate::manifest::Manifest;

/// Environment variable consulted first for the environment status.
pub const DEFAULT_ENV_VAR: &str = "WP_ENV";
/// Environment status used when nothing else is declared.
pub const DEFAULT_ENVIRONMENT: &str = "production";
/// Environment status that switches debug mode on.
pub const DEVELOPMENT_ENVIRONMENT: &str = "development";
/// Translation namespace used when the manifest declares none.
pub const DEFAULT_NAMESPACE: &str = "theme";

/// Resolves the environment status.
///
/// Precedence: environment variable, manifest `environment-status`,
/// manifest `env-status`, then `default`. A set variable wins even when
/// empty.
pub fn resolve_environment(
    env_value: Option<String>,
    manifest: &Manifest,
    default: &str,
) -> String {
    env_value
        .or_else(|| manifest.environment_status().map(str::to_string))
        .or_else(|| manifest.env_status().map(str::to_string))
        .unwrap_or_else(|| default.to_string())
}

/// Resolves the translation namespace; an empty manifest value falls back
/// to `default`.
pub fn resolve_namespace(manifest: &Manifest, default: &str) -> String {
    manifest
        .namespace()
        .filter(|namespace| !namespace.is_empty())
        .unwrap_or(default)
        .to_string()
}

pub fn is_debug_environment(environment: &str) -> bool {
    environment == DEVELOPMENT_ENVIRONMENT
}

#[cfg(test)]
mod tests {
    use super::{
        is_debug_environment, resolve_environment, resolve_namespace, DEFAULT_ENVIRONMENT,
        DEFAULT_NAMESPACE,
    };
    use crate::manifest::Manifest;
    use serde_json::json;

    #[test]
    fn variable_beats_manifest() {
        let manifest =
            Manifest::from_value(&json!({ "environment-status": "production" })).expect("manifest");
        let resolved =
            resolve_environment(Some("staging".to_string()), &manifest, DEFAULT_ENVIRONMENT);
        assert_eq!(resolved, "staging");
    }

    #[test]
    fn long_key_beats_short_key() {
        let manifest = Manifest::from_value(&json!({
            "env-status": "development",
            "environment-status": "staging"
        }))
        .expect("manifest");
        assert_eq!(
            resolve_environment(None, &manifest, DEFAULT_ENVIRONMENT),
            "staging"
        );
    }

    #[test]
    fn short_key_then_default() {
        let manifest =
            Manifest::from_value(&json!({ "env-status": "development" })).expect("manifest");
        assert_eq!(
            resolve_environment(None, &manifest, DEFAULT_ENVIRONMENT),
            "development"
        );

        let empty = Manifest::default();
        assert_eq!(
            resolve_environment(None, &empty, DEFAULT_ENVIRONMENT),
            "production"
        );
    }

    #[test]
    fn namespace_ignores_empty_value() {
        let manifest = Manifest::from_value(&json!({ "namespace": "" })).expect("manifest");
        assert_eq!(resolve_namespace(&manifest, DEFAULT_NAMESPACE), "theme");

        let manifest = Manifest::from_value(&json!({ "namespace": "harbor" })).expect("manifest");
        assert_eq!(resolve_namespace(&manifest, DEFAULT_NAMESPACE), "harbor");
    }

    #[test]
    fn only_development_enables_debug() {
        assert!(is_debug_environment("development"));
        assert!(!is_debug_environment("staging"));
        assert!(!is_debug_environment("Development"));
    }
}
