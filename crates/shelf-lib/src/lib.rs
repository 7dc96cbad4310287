//! `shelf-lib`: in-process book inventory and lending engine.
//!
//! Tracks editions and their copy counts, the loans made against them, and
//! answers `field=value` queries over the catalog. Data is held in memory
//! and persisted as a single JSON snapshot.
//!
//! # Quick Start
//!
//! ```no_run
//! use shelf_lib::{Repository, Reservation};
//! use chrono::NaiveDate;
//!
//! // Load existing file
//! let mut repo = Repository::open("books.json").unwrap();
//!
//! // Query
//! let english = repo.filter(&["language=en"]).unwrap();
//!
//! // Lend a copy
//! let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let to = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! let lent = repo.take(Reservation::new("Patrick", from, to, "978-0441013593")).unwrap();
//!
//! // Save back
//! repo.save().unwrap();
//! ```

pub mod error;
pub mod model;
pub mod query;
pub mod snapshot;
pub mod store;

pub use error::{ErrorKind, LibraryError, Result};
pub use model::{Book, LendingPolicy, Reservation};
pub use query::{Predicate, field_names};
pub use store::Repository;
