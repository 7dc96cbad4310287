//! Output formatting for `shelf`.
//!
//! Supports both human-readable text output and machine-parseable JSON.
//! With `--json`, stdout carries only JSON documents; diagnostics go to stderr.
//!
//! # JSON Output Types
//!
//! - [`BookWithLoans`] - Book with its active reservation count (filter)
//! - [`Receipt`] - Outcome of a mutating command (add/take/return/delete)

mod output;
mod text;

pub use output::{BookWithLoans, OutputContext, Receipt};
pub use text::{format_book_line, format_late_return, format_reservation_line};
