//! Manifest dry-run CLI.
//!
//! # Responsibility
//! - Run one setup pass against a recording host and print what a real host
//!   would be asked to do.
//! - Keep output line-oriented JSON so two runs can be diffed.

use clap::{Args, Parser, Subcommand};
use log::info;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use themekit_core::registrar::environment::{
    is_debug_environment, resolve_environment, DEFAULT_ENV_VAR, DEFAULT_NAMESPACE,
};
use themekit_core::{
    core_version, default_log_level, init_logging, ContactMethodDelta, LoggingError, Manifest,
    ManifestError, RecordingHost, Registrar, RegistrarConfig, RegistrySnapshot, SetupError,
    DEFAULT_MANIFEST_FILE,
};
use thiserror::Error;

/// Inspect what a theme manifest registers.
#[derive(Parser, Debug)]
#[command(name = "themekit", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run setup against a recording host and print every call.
    Plan(PlanArgs),
    /// Print contact methods after the manifest filter.
    Contacts(ContactsArgs),
    /// Print the core version.
    Version,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[arg(long, default_value = DEFAULT_MANIFEST_FILE)]
    manifest: PathBuf,
    /// JSON registry snapshot the recording host starts from.
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Simulate admin screens.
    #[arg(long)]
    admin: bool,
    /// Variable holding the environment status.
    #[arg(long, default_value = DEFAULT_ENV_VAR)]
    env_var: String,
    /// Namespace used when the manifest declares none.
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; no logs without it.
    #[arg(long)]
    log_dir: Option<String>,
}

#[derive(Args, Debug)]
struct ContactsArgs {
    #[arg(long, default_value = DEFAULT_MANIFEST_FILE)]
    manifest: PathBuf,
    /// Current contact methods as `id=label`.
    #[arg(long, num_args = 1.., value_parser = parse_contact)]
    existing: Vec<(String, String)>,
}

#[derive(Debug, Error)]
enum SnapshotError {
    #[error("failed to read snapshot `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid snapshot `{}`: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Plan(args) => run_plan(args),
        Commands::Contacts(args) => run_contacts(args),
        Commands::Version => {
            println!("themekit_core version={}", core_version());
            Ok(())
        }
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("themekit: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let registrar = Registrar::new(RegistrarConfig {
        manifest_path: args.manifest,
        env_var: args.env_var,
        default_namespace: args.namespace,
        ..RegistrarConfig::default()
    });
    let config = registrar.config();

    if let Some(log_dir) = &args.log_dir {
        let environment = planned_environment(config);
        let level = plan_log_level(args.log_level.as_deref(), &environment);
        init_logging(level, log_dir)?;
    }

    let manifest = Manifest::load(&config.manifest_path)?;
    let mut snapshot = match &args.snapshot {
        Some(path) => read_snapshot(path)?,
        None => RegistrySnapshot::new(),
    };
    if args.admin {
        snapshot = snapshot.with_admin(true);
    }

    let mut host = RecordingHost::new(snapshot);
    let outcome = registrar.setup(&manifest, &mut host)?;
    info!(
        "event=plan module=cli status=ok calls={} deferred={}",
        host.calls().len(),
        outcome.deferred.len()
    );

    print_line(&json!({
        "environment": outcome.environment,
        "namespace": outcome.namespace,
        "debug": outcome.debug,
        "admin": outcome.is_admin,
    }))?;
    for call in host.calls() {
        print_line(call)?;
    }
    for applier in &outcome.deferred {
        let point = applier.extension_point();
        print_line(&json!({
            "hook": point.hook_name(),
            "priority": point.priority(),
            "deferred": applier,
        }))?;
    }
    if let Some(presentation) = &outcome.status_presentation {
        print_line(&json!({ "hook": "display_post_states", "statuses": presentation.labels() }))?;
    }
    if let Some(delta) = &outcome.contact_methods {
        let add: Map<String, Value> = delta
            .additions()
            .iter()
            .map(|(id, label)| (id.clone(), Value::String(label.clone())))
            .collect();
        print_line(&json!({
            "hook": "user_contactmethods",
            "add": add,
            "remove": delta.removals(),
        }))?;
    }
    Ok(())
}

/// Environment used to pick the log level before logging starts.
///
/// Reads the manifest quietly; the logged load happens afterwards.
fn planned_environment(config: &RegistrarConfig) -> String {
    let manifest = std::fs::read_to_string(&config.manifest_path)
        .ok()
        .and_then(|raw| Manifest::from_json_str(&raw).ok())
        .unwrap_or_default();
    resolve_environment(
        std::env::var(&config.env_var).ok(),
        &manifest,
        &config.default_environment,
    )
}

fn run_contacts(args: ContactsArgs) -> Result<(), CliError> {
    let manifest = Manifest::load(&args.manifest)?;
    let delta = manifest
        .contact_methods()
        .map(ContactMethodDelta::from_section)
        .unwrap_or_default();
    let existing: BTreeMap<String, String> = args.existing.into_iter().collect();
    for (id, label) in delta.apply(existing) {
        println!("{id}={label}");
    }
    Ok(())
}

fn print_line<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<RegistrySnapshot, SnapshotError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SnapshotError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Explicit level wins; development raises the default to `debug`.
fn plan_log_level<'a>(requested: Option<&'a str>, environment: &str) -> &'a str {
    match requested {
        Some(level) => level,
        None if is_debug_environment(environment) => "debug",
        None => default_log_level(),
    }
}

fn parse_contact(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((id, label)) if !id.trim().is_empty() => {
            Ok((id.trim().to_string(), label.to_string()))
        }
        _ => Err(format!("expected `id=label`, got `{raw}`")),
    }
}
