//! CLI-side errors and exit codes for `shelf`.
//!
//! Core failures arrive as [`LibraryError`]; plumbing failures (input
//! files, configuration, batch scripts) as [`CliError`]. [`exit_status`]
//! walks an `anyhow` chain and picks the process exit code.

use std::path::PathBuf;

use clap::error::ErrorKind as ClapErrorKind;
use shelf_lib::{ErrorKind, LibraryError};
use thiserror::Error;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitStatus {
    Success = 0,
    TooFewArguments = 1,
    FileNotFound = 2,
    NotFound = 3,
    InsufficientAmount = 4,
    UserError = 5,
    Storage = 6,
}

impl ExitStatus {
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl From<ErrorKind> for ExitStatus {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::UserError => Self::UserError,
            ErrorKind::NotFound => Self::NotFound,
            ErrorKind::InsufficientAmount => Self::InsufficientAmount,
            ErrorKind::FileNotFound => Self::FileNotFound,
            ErrorKind::Storage => Self::Storage,
        }
    }
}

/// Errors raised by the CLI layer itself.
#[derive(Error, Debug)]
pub enum CliError {
    /// Catalog file already exists and `--force` was not given.
    #[error("Catalog already exists at {path}; use --force to overwrite")]
    AlreadyInitialized { path: PathBuf },

    /// An input file named on the command line does not exist.
    #[error("File \"{0}\" does not exist")]
    InputNotFound(PathBuf),

    /// An input file could not be understood.
    #[error("Invalid input in {path}: {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    /// Configuration file could not be read or parsed.
    #[error("Configuration error in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// A batch line tried to run a command that only works on its own.
    #[error("line {line}: `{command}` cannot be used inside a batch")]
    NotBatchable { line: usize, command: &'static str },
}

impl CliError {
    #[must_use]
    pub const fn exit_status(&self) -> ExitStatus {
        match self {
            Self::InputNotFound(_) => ExitStatus::FileNotFound,
            Self::AlreadyInitialized { .. }
            | Self::InvalidInput { .. }
            | Self::Config { .. }
            | Self::NotBatchable { .. } => ExitStatus::UserError,
        }
    }
}

/// Exit status for a clap parse failure.
#[must_use]
pub const fn clap_exit_status(kind: ClapErrorKind) -> ExitStatus {
    match kind {
        ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => ExitStatus::Success,
        ClapErrorKind::MissingRequiredArgument
        | ClapErrorKind::MissingSubcommand
        | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        | ClapErrorKind::TooFewValues
        | ClapErrorKind::WrongNumberOfValues => ExitStatus::TooFewArguments,
        _ => ExitStatus::UserError,
    }
}

/// Pick the exit status for an error, looking through any added context.
#[must_use]
pub fn exit_status(err: &anyhow::Error) -> ExitStatus {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<LibraryError>() {
            return e.kind().into();
        }
        if let Some(e) = cause.downcast_ref::<CliError>() {
            return e.exit_status();
        }
        if let Some(e) = cause.downcast_ref::<clap::Error>() {
            return clap_exit_status(e.kind());
        }
    }
    ExitStatus::Storage
}
