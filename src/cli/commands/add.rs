//! Add command implementation.
//!
//! Reads a book description (or an array of them) from a JSON file and
//! merges it into the catalog.

use crate::cli::AddArgs;
use crate::error::CliError;
use crate::format::{OutputContext, Receipt, format_book_line};
use anyhow::Result;
use serde::Deserialize;
use shelf_lib::{Book, LibraryError, Repository};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum BookInput {
    One(Book),
    Many(Vec<Book>),
}

/// Execute the add command.
///
/// # Errors
///
/// Returns an error if the file is missing, is not a valid book description,
/// a book has an empty ISBN, or the copy count would overflow.
pub fn execute(args: &AddArgs, repo: &mut Repository, ctx: &OutputContext) -> Result<()> {
    let books = read_books(&args.file)?;
    for book in &books {
        validate(book)?;
    }
    check_totals(repo, &books)?;

    let mut receipts = Vec::with_capacity(books.len());
    for book in books {
        repo.add(book.clone());
        receipts.push(Receipt {
            action: "added",
            book,
            reservation: None,
        });
    }

    if ctx.is_json() {
        ctx.json(&receipts)?;
    } else {
        for receipt in &receipts {
            ctx.status(&format!("Added {}", format_book_line(&receipt.book)));
        }
    }
    Ok(())
}

fn read_books(path: &Path) -> Result<Vec<Book>, CliError> {
    if !path.exists() {
        return Err(CliError::InputNotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|e| CliError::InvalidInput {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let input: BookInput = serde_json::from_str(&text).map_err(|e| CliError::InvalidInput {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(match input {
        BookInput::One(book) => vec![book],
        BookInput::Many(books) => books,
    })
}

fn validate(book: &Book) -> Result<(), LibraryError> {
    if book.isbn.trim().is_empty() {
        return Err(LibraryError::validation("isbn", "cannot be empty"));
    }
    Ok(())
}

/// Reject input that would push an edition past `u32::MAX` copies.
fn check_totals(repo: &Repository, books: &[Book]) -> Result<(), LibraryError> {
    let mut totals: HashMap<&str, u32> = HashMap::new();
    for book in books {
        let total = totals
            .entry(book.key())
            .or_insert_with(|| repo.book(book.key()).map_or(0, |b| b.amount));
        let current = *total;
        *total = current.checked_add(book.amount).ok_or_else(|| {
            LibraryError::validation(
                "amount",
                format!(
                    "adding {} copies of {} to {current} exceeds {}",
                    book.amount,
                    book.isbn,
                    u32::MAX
                ),
            )
        })?;
    }
    Ok(())
}
