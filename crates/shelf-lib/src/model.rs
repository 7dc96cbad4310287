//! Core data types for shelf-lib.
//!
//! A [`Book`] is one edition, not one physical copy: ISBN identifies an
//! edition, so copies are counted in `amount`. A [`Reservation`] is one
//! active loan of one copy.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{LibraryError, Result};

const fn default_amount() -> u32 {
    1
}

/// One catalogued edition and the number of copies on the shelf.
///
/// Equality and hashing use `isbn` only: two values with the same ISBN are
/// the same catalog entry whatever their other fields say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub name: String,
    pub author: String,
    pub category: String,
    pub language: String,
    pub publication_date: NaiveDate,
    pub isbn: String,
    /// Copies available (not lent out).
    #[serde(default = "default_amount")]
    pub amount: u32,
}

impl Book {
    /// Catalog key. Every membership test goes through this.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.isbn
    }

    /// Same edition with a different copy count.
    #[must_use]
    pub fn with_amount(&self, amount: u32) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" by {} ({}, {}, {}) ISBN {} x{}",
            self.name,
            self.author,
            self.category,
            self.language,
            self.publication_date,
            self.isbn,
            self.amount
        )
    }
}

/// One active loan: who holds a copy of which edition, and until when.
///
/// Lookup on return compares all four fields, so the caller has to present
/// exactly the reservation that `take` recorded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reservation {
    pub holder: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub isbn: String,
}

impl Reservation {
    #[must_use]
    pub fn new(
        holder: impl Into<String>,
        from: NaiveDate,
        to: NaiveDate,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            holder: holder.into(),
            from,
            to,
            isbn: isbn.into(),
        }
    }

    /// Length of the loan window. Negative when the dates are swapped.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.to.signed_duration_since(self.from)
    }

    /// True once `today` is past the end of the window.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.to < today
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} holds ISBN {} from {} to {}",
            self.holder, self.isbn, self.from, self.to
        )
    }
}

/// Lending rules checked by `take`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LendingPolicy {
    /// Longest allowed `to - from`, in days.
    pub max_loan_days: i64,
    /// Simultaneous loans a single holder may have, across all editions.
    pub max_loans_per_holder: usize,
}

impl LendingPolicy {
    pub const DEFAULT_MAX_LOAN_DAYS: i64 = 60;
    pub const DEFAULT_MAX_LOANS_PER_HOLDER: usize = 3;

    /// Longest allowed loan window.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `max_loan_days` does not fit in a `Duration`.
    pub fn max_loan(&self) -> Result<Duration> {
        Duration::try_days(self.max_loan_days).ok_or_else(|| {
            LibraryError::validation(
                "max_loan_days",
                format!("{} days is out of range", self.max_loan_days),
            )
        })
    }
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            max_loan_days: Self::DEFAULT_MAX_LOAN_DAYS,
            max_loans_per_holder: Self::DEFAULT_MAX_LOANS_PER_HOLDER,
        }
    }
}
