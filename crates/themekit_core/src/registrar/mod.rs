//! Manifest-driven registrar.
//!
//! # Responsibility
//! - Run one setup pass: resolve environment and namespace, load the text
//!   domain, then run every section processor in a fixed order.
//! - Return an explicit `SetupOutcome` owning everything the host must
//!   invoke later (removal appliers, contact filter, status presentation).
//!
//! # Invariants
//! - Any error aborts setup; no partial outcome is returned.
//! - The outcome only lists callbacks that have work to do.
//! - Each deferred applier runs at most once.

pub mod contact;
pub mod environment;
pub mod processors;
pub mod removal;
pub mod status;

use crate::host::{Host, HostError, HostResult, RemovalHost};
use crate::manifest::{Manifest, ManifestError, DEFAULT_MANIFEST_FILE};
use contact::ContactMethodDelta;
use environment::{
    is_debug_environment, resolve_environment, resolve_namespace, DEFAULT_ENVIRONMENT,
    DEFAULT_ENV_VAR, DEFAULT_NAMESPACE,
};
use log::{debug, error, info};
use processors::SectionState;
use removal::{DeferredApplier, ExtensionPoint};
use status::StatusPresentation;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Setup failures. Both abort the whole pass.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Registrar settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrarConfig {
    /// Manifest location used by `Registrar::setup_from_path`.
    pub manifest_path: PathBuf,
    /// Environment variable holding the environment status.
    pub env_var: String,
    /// Namespace used when the manifest declares none.
    pub default_namespace: String,
    /// Environment status used when nothing declares one.
    pub default_environment: String,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_FILE),
            env_var: DEFAULT_ENV_VAR.to_string(),
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            default_environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Runs setup passes against a host.
pub struct Registrar {
    config: RegistrarConfig,
    env_lookup: EnvLookup,
}

impl Registrar {
    /// Creates a registrar reading the process environment.
    pub fn new(config: RegistrarConfig) -> Self {
        Self {
            config,
            env_lookup: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Replaces the environment lookup, e.g. for hermetic tests.
    pub fn with_env_lookup(
        mut self,
        lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.env_lookup = Box::new(lookup);
        self
    }

    pub fn config(&self) -> &RegistrarConfig {
        &self.config
    }

    /// Loads the configured manifest, then runs `setup`.
    pub fn setup_from_path<H: Host>(&self, host: &mut H) -> Result<SetupOutcome, SetupError> {
        let manifest = Manifest::load(&self.config.manifest_path)?;
        self.setup(&manifest, host)
    }

    /// Runs one setup pass.
    ///
    /// # Side effects
    /// - Loads the text domain and issues registration calls against `host`
    ///   in section order.
    /// - Emits `setup` and `section` logging events.
    ///
    /// # Errors
    /// - Returns the first host error; later sections do not run.
    pub fn setup<H: Host>(
        &self,
        manifest: &Manifest,
        host: &mut H,
    ) -> Result<SetupOutcome, SetupError> {
        let started_at = Instant::now();
        let env_value = (self.env_lookup)(&self.config.env_var);
        let environment =
            resolve_environment(env_value, manifest, &self.config.default_environment);
        let namespace = resolve_namespace(manifest, &self.config.default_namespace);
        let debug_enabled = is_debug_environment(&environment);
        let is_admin = host.is_admin();
        info!(
            "event=setup module=registrar status=start environment={} namespace={} debug={} admin={}",
            environment, namespace, debug_enabled, is_admin
        );

        if let Err(err) = host.load_text_domain(&namespace) {
            error!(
                "event=setup module=registrar status=error step=load_text_domain error={}",
                err
            );
            return Err(err.into());
        }

        let mut state = SectionState::new(namespace.as_str());
        for (section, processor) in processors::ordered::<H>() {
            match processor(manifest, &mut state, host) {
                Ok(Some(effects)) => debug!(
                    "event=section module=registrar status=ok section={} effects={}",
                    section, effects
                ),
                Ok(None) => debug!(
                    "event=section module=registrar status=skip section={} reason=absent",
                    section
                ),
                Err(err) => {
                    error!(
                        "event=section module=registrar status=error section={} duration_ms={} error={}",
                        section,
                        started_at.elapsed().as_millis(),
                        err
                    );
                    return Err(err.into());
                }
            }
        }

        if state.removals.is_empty() {
            debug!("event=removals module=registrar status=skip reason=nothing_queued");
        }
        let outcome = SetupOutcome {
            environment,
            namespace,
            debug: debug_enabled,
            is_admin,
            deferred: state.removals.into_appliers(is_admin),
            contact_methods: Some(state.contacts).filter(|delta| !delta.is_empty()),
            status_presentation: state.status_presentation,
        };
        info!(
            "event=setup module=registrar status=ok duration_ms={} deferred={} hooks={}",
            started_at.elapsed().as_millis(),
            outcome.deferred.len(),
            outcome.extension_points().len()
        );
        Ok(outcome)
    }
}

/// Result of one setup pass, owned by the host until every extension point
/// has fired.
#[derive(Debug, Clone, PartialEq)]
pub struct SetupOutcome {
    pub environment: String,
    pub namespace: String,
    /// True in the development environment.
    pub debug: bool,
    pub is_admin: bool,
    /// Pending removal appliers, in binding order.
    pub deferred: Vec<DeferredApplier>,
    /// Contact-method filter, present only when it changes something.
    pub contact_methods: Option<ContactMethodDelta>,
    /// Status presentation callbacks, present only on admin screens with a
    /// `post-status` section.
    pub status_presentation: Option<StatusPresentation>,
}

impl SetupOutcome {
    /// Extension points the host must bind, in binding order.
    pub fn extension_points(&self) -> Vec<ExtensionPoint> {
        let mut points = Vec::new();
        if self.status_presentation.is_some() {
            points.extend([
                ExtensionPoint::DisplayPostStates,
                ExtensionPoint::EditListFooter,
                ExtensionPoint::PostEditFooter,
                ExtensionPoint::PostNewFooter,
            ]);
        }
        points.extend(self.deferred.iter().map(DeferredApplier::extension_point));
        if self.contact_methods.is_some() {
            points.push(ExtensionPoint::UserContactMethods);
        }
        points
    }

    /// Removes and returns the appliers bound to `point`.
    pub fn take_appliers(&mut self, point: ExtensionPoint) -> Vec<DeferredApplier> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.deferred)
            .into_iter()
            .partition(|applier| applier.extension_point() == point);
        self.deferred = kept;
        taken
    }

    /// Fires `point`: runs every applier bound to it once, in order.
    ///
    /// Returns the number of host primitives invoked; firing the same point
    /// again is a no-op.
    pub fn fire<H: RemovalHost + ?Sized>(
        &mut self,
        point: ExtensionPoint,
        host: &mut H,
    ) -> HostResult<usize> {
        let mut applied = 0;
        for applier in self.take_appliers(point) {
            applied += applier.apply(host)?;
        }
        Ok(applied)
    }
}
