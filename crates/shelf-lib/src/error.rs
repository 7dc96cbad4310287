//! Error types for `shelf-lib`.
//!
//! Every core failure is a rejected operation: the repository is left
//! exactly as it was before the call. [`LibraryError::kind`] folds the
//! specific variants into the coarse categories the CLI reports.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Coarse outcome category of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input, invalid predicate, loan window or borrowing-limit violation.
    UserError,
    /// A referenced book or reservation does not exist.
    NotFound,
    /// Requested quantity exceeds what is available.
    InsufficientAmount,
    /// The catalog file (or an input file) is missing.
    FileNotFound,
    /// The catalog file could not be read, parsed or written.
    Storage,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserError => "user_error",
            Self::NotFound => "not_found",
            Self::InsufficientAmount => "insufficient_amount",
            Self::FileNotFound => "file_not_found",
            Self::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary error type for shelf-lib operations.
#[derive(Error, Debug)]
pub enum LibraryError {
    // === Lending Errors ===
    /// Loan window exceeds the policy maximum.
    #[error("Cannot take a book for longer than {max_days} days (requested {days})")]
    LoanTooLong { days: i64, max_days: i64 },

    /// `from` lies after `to`.
    #[error("[from] and [to] are mixed up ({from} > {to}), resulting in negative duration")]
    ReversedWindow { from: NaiveDate, to: NaiveDate },

    /// Holder already has the maximum number of simultaneous loans.
    #[error("{holder} already has {limit} books; a single person can have no more than {limit} at once")]
    BorrowLimit { holder: String, limit: usize },

    // === Query Errors ===
    /// Predicate does not follow the `field=value` convention.
    #[error("Failed to interpret \"{predicate}\", expected field=value")]
    MalformedPredicate { predicate: String },

    /// Predicate names a field the filter engine does not know.
    #[error("Unknown field \"{field}\" in \"{predicate}\"")]
    UnknownField { field: String, predicate: String },

    /// `issued=` value is not a boolean.
    #[error("Failed to convert \"{value}\" in \"{predicate}\" into a boolean")]
    NotABoolean { value: String, predicate: String },

    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    // === Lookup Errors ===
    /// No book with the given ISBN is catalogued.
    #[error("Book with ISBN {isbn} doesn't exist")]
    BookNotFound { isbn: String },

    /// No active reservation matches all four fields.
    #[error("Reservation not found: {reservation}")]
    ReservationNotFound { reservation: String },

    // === Quantity Errors ===
    /// Every copy of the book is already lent out.
    #[error("All copies of book with ISBN {isbn} are already reserved")]
    NoCopiesLeft { isbn: String },

    /// Fewer copies remain than were asked for.
    #[error("Not enough copies of ISBN {isbn}: requested {requested}, available {available}")]
    NotEnoughCopies {
        isbn: String,
        requested: u32,
        available: u32,
    },

    // === Storage Errors ===
    /// File not found at the specified path.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Catalog file exists but is not a valid snapshot.
    #[error("Malformed catalog {path}: {reason}")]
    SnapshotParse { path: PathBuf, reason: String },

    /// Generic storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LibraryError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Category this error is reported under.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::LoanTooLong { .. }
            | Self::ReversedWindow { .. }
            | Self::BorrowLimit { .. }
            | Self::MalformedPredicate { .. }
            | Self::UnknownField { .. }
            | Self::NotABoolean { .. }
            | Self::Validation { .. } => ErrorKind::UserError,
            Self::BookNotFound { .. } | Self::ReservationNotFound { .. } => ErrorKind::NotFound,
            Self::NoCopiesLeft { .. } | Self::NotEnoughCopies { .. } => {
                ErrorKind::InsufficientAmount
            }
            Self::FileNotFound(_) => ErrorKind::FileNotFound,
            Self::SnapshotParse { .. } | Self::Storage(_) | Self::Io(_) | Self::Json(_) => {
                ErrorKind::Storage
            }
        }
    }
}

/// Result type using `LibraryError`.
pub type Result<T> = std::result::Result<T, LibraryError>;
