use crate::cli::DeleteArgs;
use crate::format::{OutputContext, Receipt, format_book_line};
use anyhow::Result;
use shelf_lib::Repository;

/// Execute the delete command.
///
/// # Errors
///
/// Returns an error if the ISBN is unknown or too few copies remain.
pub fn execute(args: &DeleteArgs, repo: &mut Repository, ctx: &OutputContext) -> Result<()> {
    let removed = repo.delete(&args.isbn, args.amount)?;

    if ctx.is_json() {
        ctx.json(&Receipt {
            action: "deleted",
            book: removed,
            reservation: None,
        })?;
    } else {
        ctx.status(&format!("Removed {}", format_book_line(&removed)));
        if repo.book(&args.isbn).is_none() {
            ctx.status(&format!("{} is no longer catalogued.", args.isbn));
        }
    }
    Ok(())
}
