//! Command-line interface for `shelf`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use shelf_lib::{Repository, Reservation};

use crate::config::{self, CliOverrides};
use crate::error::CliError;
use crate::format::OutputContext;
use crate::logging::{self, LogFormat};

const AFTER_HELP: &str = "\
Filter predicates (all must match, applied left to right):
    author=<author>      category=<category>    language=<language>
    isbn=<isbn>          name=<name>            issued=<true|false>

Exit codes: 0 ok, 1 too few arguments, 2 file not found, 3 not found,
4 insufficient amount, 5 user error, 6 storage error.";

/// `shelf` - Inventory and lending manager for a small library.
#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(
    author,
    version,
    about = "Inventory and lending manager for a small library (JSON file storage)",
    long_about = None,
    arg_required_else_help = true,
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Encoding of diagnostic log lines on stderr
    #[arg(long, global = true, value_enum, env = "SHELF_LOG_FORMAT", value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Catalog file to operate on
    #[arg(long, global = true, env = "SHELF_CATALOG", value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Configuration file (YAML)
    #[arg(long, global = true, env = "SHELF_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty catalog file
    Init(InitArgs),

    /// Add copies of a book described in a JSON file
    Add(AddArgs),

    /// Lend one copy of a book
    Take(LoanArgs),

    /// Return a lent copy (all four fields must match the loan)
    Return(LoanArgs),

    /// List books matching field=value predicates
    #[command(alias = "list")]
    Filter(FilterArgs),

    /// Remove copies of a book
    Delete(DeleteArgs),

    /// List active loans
    Loans(LoansArgs),

    /// Run one command per line from a file
    Batch(BatchArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Overwrite an existing catalog
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// JSON file holding one book or an array of books
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct LoanArgs {
    /// Borrower name
    pub holder: String,

    /// First day of the loan (YYYY-MM-DD)
    pub from: NaiveDate,

    /// Last day of the loan (YYYY-MM-DD)
    pub to: NaiveDate,

    /// ISBN of the edition
    pub isbn: String,
}

impl LoanArgs {
    #[must_use]
    pub fn reservation(&self) -> Reservation {
        Reservation::new(self.holder.clone(), self.from, self.to, self.isbn.clone())
    }
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Predicates of the form field=value
    #[arg(value_name = "FIELD=VALUE")]
    pub predicates: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// ISBN of the edition
    pub isbn: String,

    /// Number of copies to remove
    pub amount: u32,
}

#[derive(Args, Debug, Default)]
pub struct LoansArgs {
    /// Only loans held by this person
    #[arg(long)]
    pub holder: Option<String>,

    /// Only loans past their end date
    #[arg(long)]
    pub overdue: bool,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Script with one command per line
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if argument parsing or the command fails.
pub fn run() -> Result<()> {
    let cli = Cli::try_parse()?;
    logging::init_logging(cli.verbose, cli.quiet, cli.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let overrides = CliOverrides {
        catalog: cli.catalog,
        config: cli.config,
    };
    let ctx = OutputContext::new(cli.json, cli.quiet);
    execute(cli.command, &overrides, &ctx)
}

/// Execute one top-level command.
///
/// Catalog commands load the repository, run, and write it back if
/// anything changed. The write also happens when the command fails after
/// earlier changes were made (a batch stopping halfway).
///
/// # Errors
///
/// Returns the command's error, or the load/save error.
pub fn execute(command: Commands, overrides: &CliOverrides, ctx: &OutputContext) -> Result<()> {
    tracing::debug!("Running {}", command.name());

    if let Commands::Completions(args) = &command {
        commands::completions::execute(args);
        return Ok(());
    }

    let config = config::load(overrides)?;
    if let Commands::Init(args) = &command {
        return commands::init::execute(args, &config, ctx);
    }

    let mut repo = Repository::open_with_policy(&config.catalog, config.policy)
        .with_context(|| format!("Failed to load catalog {}", config.catalog.display()))?;

    let outcome = dispatch(command, &mut repo, ctx, None);

    if repo.is_dirty() {
        let flushed = repo
            .save()
            .with_context(|| format!("Failed to save catalog {}", config.catalog.display()));
        match (&outcome, flushed) {
            (Ok(()), Err(e)) => return Err(e),
            (Err(_), Err(e)) => tracing::error!("{e:#}"),
            (_, Ok(())) => {}
        }
    }

    outcome
}

/// Run a catalog command against an open repository.
///
/// `line` is set when the command comes from a batch script.
///
/// # Errors
///
/// Returns the command's error.
pub fn dispatch(
    command: Commands,
    repo: &mut Repository,
    ctx: &OutputContext,
    line: Option<usize>,
) -> Result<()> {
    match command {
        Commands::Add(args) => commands::add::execute(&args, repo, ctx),
        Commands::Take(args) => commands::take::execute(&args, repo, ctx),
        Commands::Return(args) => commands::return_::execute(&args, repo, ctx),
        Commands::Filter(args) => commands::filter::execute(&args, repo, ctx),
        Commands::Delete(args) => commands::delete::execute(&args, repo, ctx),
        Commands::Loans(args) => commands::loans::execute(&args, repo, ctx),
        Commands::Batch(args) if line.is_none() => commands::batch::execute(&args, repo, ctx),
        other => Err(CliError::NotBatchable {
            line: line.unwrap_or_default(),
            command: other.name(),
        }
        .into()),
    }
}

impl Commands {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Add(_) => "add",
            Self::Take(_) => "take",
            Self::Return(_) => "return",
            Self::Filter(_) => "filter",
            Self::Delete(_) => "delete",
            Self::Loans(_) => "loans",
            Self::Batch(_) => "batch",
            Self::Completions(_) => "completions",
        }
    }
}
