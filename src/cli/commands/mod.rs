//! One module per `shelf` subcommand.

pub mod add;
pub mod batch;
pub mod completions;
pub mod delete;
pub mod filter;
pub mod init;
pub mod loans;
pub mod return_;
pub mod take;
