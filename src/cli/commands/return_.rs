//! Return command implementation.
//!
//! The loan is identified by all four of its fields, exactly as they were
//! given to `take`.

use crate::cli::LoanArgs;
use crate::format::{OutputContext, Receipt, format_book_line, format_late_return};
use anyhow::Result;
use chrono::Local;
use shelf_lib::Repository;

/// Execute the return command.
///
/// # Errors
///
/// Returns an error if no matching loan exists or the book has left the catalog.
pub fn execute(args: &LoanArgs, repo: &mut Repository, ctx: &OutputContext) -> Result<()> {
    let reservation = args.reservation();
    let book = repo.return_book(&reservation)?;

    let today = Local::now().date_naive();
    let late = format_late_return(&reservation, today);
    if let Some(note) = &late {
        tracing::info!("{} {note}", reservation);
    }

    if ctx.is_json() {
        ctx.json(&Receipt {
            action: "returned",
            book,
            reservation: Some(reservation),
        })?;
    } else {
        ctx.status(&format!(
            "Returned {} from {}",
            format_book_line(&book),
            reservation.holder
        ));
        if let Some(note) = late {
            ctx.status(&note);
        }
    }
    Ok(())
}
