use crate::cli::{Cli, CompletionsArgs};
use clap::CommandFactory;
use std::io;

/// Execute the completions command.
pub fn execute(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "shelf", &mut io::stdout());
}
