//! `shelf` - Inventory and lending manager for a small library.
//!
//! One command per invocation (or a `batch` script), operating on a JSON
//! catalog file that is loaded at start and written back at the end.

use shelf::error::{ExitStatus, exit_status};
use shelf::run;

fn main() {
    if let Err(e) = run() {
        match e.downcast_ref::<clap::Error>() {
            Some(clap_err) if e.chain().count() == 1 => {
                let _ = clap_err.print();
            }
            _ => eprintln!("Error: {e:#}"),
        }
        let status = exit_status(&e);
        std::process::exit(status.code());
    }
    std::process::exit(ExitStatus::Success.code());
}
