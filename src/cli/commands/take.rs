use crate::cli::LoanArgs;
use crate::format::{OutputContext, Receipt, format_book_line};
use anyhow::Result;
use shelf_lib::Repository;

/// Execute the take command.
///
/// # Errors
///
/// Returns an error if the loan is rejected by the repository.
pub fn execute(args: &LoanArgs, repo: &mut Repository, ctx: &OutputContext) -> Result<()> {
    let reservation = args.reservation();
    let book = repo.take(reservation.clone())?;

    if ctx.is_json() {
        ctx.json(&Receipt {
            action: "taken",
            book,
            reservation: Some(reservation),
        })?;
    } else {
        ctx.status(&format!(
            "Lent {} to {} until {}",
            format_book_line(&book),
            reservation.holder,
            reservation.to
        ));
    }
    Ok(())
}
