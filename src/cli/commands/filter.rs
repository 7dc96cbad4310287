//! Filter command implementation.
//!
//! Primary discovery interface: `field=value` predicates narrow the
//! catalog left to right.

use crate::cli::FilterArgs;
use crate::format::{BookWithLoans, OutputContext, format_book_line};
use anyhow::Result;
use shelf_lib::Repository;

/// Execute the filter command.
///
/// # Errors
///
/// Returns an error if a predicate is malformed or names an unknown field.
pub fn execute(args: &FilterArgs, repo: &Repository, ctx: &OutputContext) -> Result<()> {
    let books = repo.filter(args.predicates.as_slice())?;
    tracing::debug!("{} book(s) matched {:?}", books.len(), args.predicates);

    if ctx.is_json() {
        let with_loans: Vec<BookWithLoans> = books
            .into_iter()
            .map(|book| {
                let reserved = repo.reserved_count(&book.isbn);
                BookWithLoans { book, reserved }
            })
            .collect();
        ctx.json(&with_loans)?;
    } else {
        for book in &books {
            ctx.line(&format_book_line(book));
        }
    }
    Ok(())
}
