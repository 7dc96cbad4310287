//! Batch command implementation.
//!
//! Runs a script of commands against one loaded catalog, one command per
//! line, stopping at the first failure. Blank lines and lines starting
//! with `#` are skipped. Arguments are split on whitespace; wrap an
//! argument in double quotes to keep spaces in it.
//!
//! ```text
//! # morning desk
//! add new-arrivals.json
//! take "Ann Smith" 2024-05-01 2024-05-20 978-0441013593
//! filter issued=true
//! ```

use crate::cli::{BatchArgs, Commands, dispatch};
use crate::error::CliError;
use crate::format::OutputContext;
use anyhow::{Context, Result};
use clap::Parser;
use shelf_lib::Repository;
use std::fs;
use std::path::Path;

/// A single script line, parsed with the same grammar as the top-level CLI.
#[derive(Parser, Debug)]
#[command(name = "shelf", no_binary_name = true)]
struct BatchLine {
    #[command(subcommand)]
    command: Commands,
}

/// Execute the batch command.
///
/// Changes made by lines before a failing one stay in the repository; the
/// caller persists them.
///
/// # Errors
///
/// Returns the first failing line's error, annotated with its line number.
pub fn execute(args: &BatchArgs, repo: &mut Repository, ctx: &OutputContext) -> Result<()> {
    let script = read_script(&args.file)?;

    for (index, raw) in script.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens = tokenize(trimmed).map_err(|reason| CliError::InvalidInput {
            path: args.file.clone(),
            reason: format!("line {line}: {reason}"),
        })?;
        let parsed = BatchLine::try_parse_from(tokens)
            .with_context(|| format!("line {line}: cannot parse \"{trimmed}\""))?;

        tracing::debug!("batch line {line}: {}", parsed.command.name());
        dispatch(parsed.command, repo, ctx, Some(line))
            .with_context(|| format!("line {line}: \"{trimmed}\" failed"))?;
    }
    Ok(())
}

fn read_script(path: &Path) -> Result<String, CliError> {
    if !path.exists() {
        return Err(CliError::InputNotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|e| CliError::InvalidInput {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Split a line on whitespace, honouring double-quoted runs.
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err("unterminated quote".to_string());
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
