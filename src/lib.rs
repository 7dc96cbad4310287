//! `shelf` - Inventory and lending manager library
//!
//! This crate provides the command-line layer for the `shelf` tool on top
//! of the `shelf_lib` engine.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Configuration management (YAML file + overrides)
//! - [`error`] - CLI errors and exit codes
//! - [`format`] - Output formatting (text, JSON)
//! - [`logging`] - tracing subscriber setup

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;

pub use cli::run;
pub use error::{CliError, ExitStatus};
