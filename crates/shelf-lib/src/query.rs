//! Predicate filtering over the catalog.
//!
//! A query is a chain of `field=value` predicates applied left to right,
//! each narrowing the output of the one before it. Field names resolve
//! through a static dispatch table; a miss is an `UnknownField` error.

use std::collections::HashMap;

use crate::error::{LibraryError, Result};
use crate::model::Book;
use crate::store::Repository;

/// Books still in the running, keyed by ISBN.
type WorkingSet = HashMap<String, Book>;

/// Applies one predicate value to the working set.
type Narrow = fn(&Repository, WorkingSet, &Predicate<'_>) -> Result<WorkingSet>;

/// Recognised filter fields.
const FIELDS: &[(&str, Narrow)] = &[
    ("author", by_author),
    ("category", by_category),
    ("language", by_language),
    ("isbn", by_isbn),
    ("name", by_name),
    ("issued", by_issued),
];

/// Names accepted on the left of `=`, in table order.
pub fn field_names() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|(name, _)| *name)
}

/// One parsed `field=value` term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Predicate<'a> {
    pub raw: &'a str,
    pub field: &'a str,
    pub value: &'a str,
}

impl<'a> Predicate<'a> {
    /// Split on the first `=`.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPredicate` if there is no `=`.
    pub fn parse(raw: &'a str) -> Result<Self> {
        let (field, value) = raw
            .split_once('=')
            .ok_or_else(|| LibraryError::MalformedPredicate {
                predicate: raw.to_string(),
            })?;
        Ok(Self { raw, field, value })
    }

    fn narrow_fn(&self) -> Result<Narrow> {
        FIELDS
            .iter()
            .find(|(name, _)| *name == self.field)
            .map(|(_, narrow)| *narrow)
            .ok_or_else(|| LibraryError::UnknownField {
                field: self.field.to_string(),
                predicate: self.raw.to_string(),
            })
    }
}

impl Repository {
    /// Books matching every predicate, sorted by ISBN.
    ///
    /// With no predicates this lists the whole catalog. An `issued=true`
    /// term replaces each remaining book's `amount` with its number of
    /// active reservations before dropping books at zero.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPredicate`, `UnknownField` or `NotABoolean`.
    pub fn filter<S: AsRef<str>>(&self, predicates: &[S]) -> Result<Vec<Book>> {
        let mut books: WorkingSet = self.catalog().clone();
        for raw in predicates {
            let predicate = Predicate::parse(raw.as_ref())?;
            let narrow = predicate.narrow_fn()?;
            books = narrow(self, books, &predicate)?;
        }

        let mut books: Vec<Book> = books.into_values().collect();
        books.sort_by(|a, b| a.key().cmp(b.key()));
        Ok(books)
    }
}

fn retain_where(mut books: WorkingSet, keep: impl Fn(&Book) -> bool) -> WorkingSet {
    books.retain(|_, book| keep(book));
    books
}

fn by_author(_: &Repository, books: WorkingSet, p: &Predicate<'_>) -> Result<WorkingSet> {
    Ok(retain_where(books, |b| b.author == p.value))
}

fn by_category(_: &Repository, books: WorkingSet, p: &Predicate<'_>) -> Result<WorkingSet> {
    Ok(retain_where(books, |b| b.category == p.value))
}

fn by_language(_: &Repository, books: WorkingSet, p: &Predicate<'_>) -> Result<WorkingSet> {
    Ok(retain_where(books, |b| b.language == p.value))
}

fn by_name(_: &Repository, books: WorkingSet, p: &Predicate<'_>) -> Result<WorkingSet> {
    Ok(retain_where(books, |b| b.name == p.value))
}

fn by_isbn(_: &Repository, mut books: WorkingSet, p: &Predicate<'_>) -> Result<WorkingSet> {
    Ok(books.remove_entry(p.value).into_iter().collect())
}

fn by_issued(repo: &Repository, books: WorkingSet, p: &Predicate<'_>) -> Result<WorkingSet> {
    let issued = parse_bool(p.value).ok_or_else(|| LibraryError::NotABoolean {
        value: p.value.to_string(),
        predicate: p.raw.to_string(),
    })?;

    let books = if issued {
        books
            .into_iter()
            .map(|(isbn, book)| {
                let lent = u32::try_from(repo.reserved_count(&isbn)).unwrap_or(u32::MAX);
                let annotated = book.with_amount(lent);
                (isbn, annotated)
            })
            .collect()
    } else {
        books
    };
    Ok(retain_where(books, |b| b.amount > 0))
}

fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
