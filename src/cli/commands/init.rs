use crate::cli::InitArgs;
use crate::config::Config;
use crate::error::CliError;
use crate::format::OutputContext;
use anyhow::{Context, Result};
use shelf_lib::Repository;
use std::fs;

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the catalog already exists (without `--force`) or
/// the file cannot be written.
pub fn execute(args: &InitArgs, config: &Config, ctx: &OutputContext) -> Result<()> {
    let path = &config.catalog;

    if path.exists() && !args.force {
        return Err(CliError::AlreadyInitialized { path: path.clone() }.into());
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    Repository::new(config.policy).save_to(path)?;

    if ctx.is_json() {
        ctx.json(&serde_json::json!({ "catalog": path }))?;
    } else {
        ctx.status(&format!("Initialized empty catalog in {}", path.display()));
    }
    Ok(())
}
