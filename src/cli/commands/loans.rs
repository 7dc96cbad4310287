use crate::cli::LoansArgs;
use crate::format::{OutputContext, format_reservation_line};
use anyhow::Result;
use chrono::Local;
use shelf_lib::{Repository, Reservation};

/// Execute the loans command.
///
/// # Errors
///
/// Returns an error if JSON output cannot be written.
pub fn execute(args: &LoansArgs, repo: &Repository, ctx: &OutputContext) -> Result<()> {
    let today = Local::now().date_naive();
    let loans: Vec<&Reservation> = repo
        .reservations()
        .iter()
        .filter(|r| args.holder.as_deref().is_none_or(|h| r.holder == h))
        .filter(|r| !args.overdue || r.is_overdue(today))
        .collect();

    if ctx.is_json() {
        ctx.json(&loans)?;
    } else {
        for loan in loans {
            ctx.line(&format_reservation_line(loan, today));
        }
    }
    Ok(())
}
