//! Configuration management for `shelf`.
//!
//! Configuration is resolved, lowest precedence first, from:
//! - Built-in defaults (`books.json`, 60-day loans, 3 loans per holder)
//! - A YAML file (`--config`, `SHELF_CONFIG`, or `shelf.yaml` in the working directory)
//! - CLI flags and environment overrides (`--catalog`, `SHELF_CATALOG`)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use shelf_lib::LendingPolicy;

use crate::error::CliError;

/// Catalog file used when nothing else is configured.
pub const DEFAULT_CATALOG: &str = "books.json";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "shelf.yaml";

/// Values passed on the command line (or through their env fallbacks).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub catalog: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// On-disk config layout.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    catalog: Option<PathBuf>,
    lending: LendingPolicy,
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub catalog: PathBuf,
    pub policy: LendingPolicy,
    /// Config file that contributed, if any.
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from(DEFAULT_CATALOG),
            policy: LendingPolicy::default(),
            source: None,
        }
    }
}

/// Resolve configuration for this run.
///
/// # Errors
///
/// Returns `InputNotFound` if an explicitly named config file is missing,
/// or `Config` if a config file cannot be read or parsed.
pub fn load(cli: &CliOverrides) -> Result<Config, CliError> {
    let mut config = Config::default();

    let config_path = match &cli.config {
        Some(path) if !path.exists() => return Err(CliError::InputNotFound(path.clone())),
        Some(path) => Some(path.clone()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
    };

    if let Some(path) = config_path {
        let file = read_config_file(&path)?;
        if let Some(catalog) = file.catalog {
            config.catalog = resolve_relative(&path, catalog);
        }
        config.policy = file.lending;
        validate_policy(&path, &config.policy)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        config.source = Some(path);
    }

    if let Some(catalog) = &cli.catalog {
        config.catalog.clone_from(catalog);
    }

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<FileConfig, CliError> {
    let text = fs::read_to_string(path).map_err(|e| CliError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if text.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(&text).map_err(|e| CliError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn validate_policy(path: &Path, policy: &LendingPolicy) -> Result<(), CliError> {
    if policy.max_loan_days < 0 {
        return Err(CliError::Config {
            path: path.to_path_buf(),
            reason: "lending.max_loan_days must be >= 0".to_string(),
        });
    }
    policy.max_loan().map_err(|_| CliError::Config {
        path: path.to_path_buf(),
        reason: format!("lending.max_loan_days {} is out of range", policy.max_loan_days),
    })?;
    Ok(())
}

/// Catalog paths in a config file are relative to that file.
fn resolve_relative(config_path: &Path, catalog: PathBuf) -> PathBuf {
    if catalog.is_absolute() {
        return catalog;
    }
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(catalog),
        _ => catalog,
    }
}
