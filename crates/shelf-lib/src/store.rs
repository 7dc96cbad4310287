//! In-memory book repository backed by `HashMap`.
//!
//! Holds the catalog (editions keyed by ISBN) and the reservation ledger,
//! and owns every rule that links the two. Operations validate all of their
//! preconditions before touching state, so a failed call changes nothing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{LibraryError, Result};
use crate::model::{Book, LendingPolicy, Reservation};
use crate::snapshot::{self, Snapshot};

/// Catalog plus reservation ledger.
///
/// Use `open()` to load from a catalog file and `save()` to persist back.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    books: HashMap<String, Book>,
    reservations: Vec<Reservation>,
    policy: LendingPolicy,
    path: Option<PathBuf>,
    dirty: bool,
}

impl Repository {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create a new empty repository.
    #[must_use]
    pub fn new(policy: LendingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Open and load from a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the file is absent, or `SnapshotParse`
    /// if it is malformed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_policy(path, LendingPolicy::default())
    }

    /// Open a catalog file and lend under `policy`.
    ///
    /// # Errors
    ///
    /// Same as [`Repository::open`].
    pub fn open_with_policy(path: impl AsRef<Path>, policy: LendingPolicy) -> Result<Self> {
        let path = path.as_ref();
        let loaded = snapshot::load(path)?;

        let mut repo = Self::new(policy);
        repo.path = Some(path.to_path_buf());

        for book in loaded.books {
            if repo.books.contains_key(book.key()) {
                tracing::warn!(
                    "Duplicate ISBN {} in {}; merging copy counts",
                    book.isbn,
                    path.display()
                );
            }
            repo.merge(book);
        }
        repo.reservations = loaded.reservations;
        repo.dirty = false;

        tracing::debug!(
            "Loaded {} books and {} reservations from {}",
            repo.books.len(),
            repo.reservations.len(),
            path.display()
        );
        Ok(repo)
    }

    /// Save to the file that was opened.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if no file path is set, or `Io` on write failure.
    pub fn save(&self) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| LibraryError::Storage("No file path set; use save_to()".to_string()))?;
        self.save_to(path)
    }

    /// Save to a specific file path.
    ///
    /// # Errors
    ///
    /// Returns `Io` on write failure.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let snapshot = Snapshot {
            books: self.books().into_iter().cloned().collect(),
            reservations: self.reservations.clone(),
        };
        snapshot::save(path.as_ref(), &snapshot)
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub const fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Add copies of an edition.
    ///
    /// An already catalogued ISBN keeps its descriptive fields and gains the
    /// incoming `amount`; the incoming name, author and so on are ignored.
    /// The count saturates at `u32::MAX`; callers that need to reject
    /// overflow check the total first.
    pub fn add(&mut self, copy: Book) {
        tracing::debug!("Adding {} copies of {}", copy.amount, copy.isbn);
        self.merge(copy);
        self.dirty = true;
    }

    /// Remove `amount` copies of an edition.
    ///
    /// The record is dropped entirely once no copies remain and no
    /// reservation references it. Returns the removed copies: the book's
    /// fields with `amount` set to what was taken off the shelf.
    ///
    /// # Errors
    ///
    /// Returns `BookNotFound` if the ISBN is unknown, or `NotEnoughCopies`
    /// if fewer than `amount` copies are available.
    pub fn delete(&mut self, isbn: &str, amount: u32) -> Result<Book> {
        let book = self.find(isbn)?;
        if book.amount < amount {
            return Err(LibraryError::NotEnoughCopies {
                isbn: isbn.to_string(),
                requested: amount,
                available: book.amount,
            });
        }

        let receipt = book.with_amount(amount);
        let remaining = book.amount - amount;
        if remaining > 0 || self.reserved_count(isbn) > 0 {
            self.replace_amount(isbn, remaining);
        } else {
            self.books.remove(isbn);
            tracing::debug!("Removed {isbn} from the catalog");
        }
        self.dirty = true;

        Ok(receipt)
    }

    // ========================================================================
    // Lending
    // ========================================================================

    /// Lend one copy.
    ///
    /// Checks run in order and the first failure wins: window too long,
    /// window reversed, unknown ISBN, no copies left, holder at the limit.
    /// Returns the lent copy (the book with `amount == 1`).
    ///
    /// # Errors
    ///
    /// Returns `LoanTooLong`, `ReversedWindow`, `BookNotFound`,
    /// `NoCopiesLeft` or `BorrowLimit`, or `Validation` if the policy's
    /// loan length is out of range.
    pub fn take(&mut self, reservation: Reservation) -> Result<Book> {
        let duration = reservation.duration();
        if duration > self.policy.max_loan()? {
            return Err(LibraryError::LoanTooLong {
                days: duration.num_days(),
                max_days: self.policy.max_loan_days,
            });
        }
        if duration < chrono::Duration::zero() {
            return Err(LibraryError::ReversedWindow {
                from: reservation.from,
                to: reservation.to,
            });
        }

        let book = self.find(&reservation.isbn)?;
        if book.amount == 0 {
            return Err(LibraryError::NoCopiesLeft {
                isbn: reservation.isbn,
            });
        }

        let limit = self.policy.max_loans_per_holder;
        if self.loans_of(&reservation.holder).len() >= limit {
            return Err(LibraryError::BorrowLimit {
                holder: reservation.holder,
                limit,
            });
        }

        let lent = book.with_amount(1);
        let remaining = book.amount - 1;
        self.replace_amount(&reservation.isbn, remaining);
        tracing::debug!("Lent {}", reservation);
        self.reservations.push(reservation);
        self.dirty = true;

        Ok(lent)
    }

    /// Close a loan.
    ///
    /// `reservation` must equal an active one in every field. Returns the
    /// returned copy (the book with `amount == 1`).
    ///
    /// # Errors
    ///
    /// Returns `ReservationNotFound` if no active reservation matches, or
    /// `BookNotFound` if the edition has since left the catalog.
    pub fn return_book(&mut self, reservation: &Reservation) -> Result<Book> {
        let index = self
            .reservations
            .iter()
            .position(|r| r == reservation)
            .ok_or_else(|| LibraryError::ReservationNotFound {
                reservation: reservation.to_string(),
            })?;
        let book = self.find(&reservation.isbn)?;

        let returned = book.with_amount(1);
        let restored = book.amount.saturating_add(1);
        self.replace_amount(&reservation.isbn, restored);
        self.reservations.remove(index);
        self.dirty = true;
        tracing::debug!("Closed {}", reservation);

        Ok(returned)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Look up a book by ISBN.
    #[must_use]
    pub fn book(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    /// All books, sorted by ISBN.
    #[must_use]
    pub fn books(&self) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books.values().collect();
        books.sort_by(|a, b| a.key().cmp(b.key()));
        books
    }

    /// Active reservations in the order they were made.
    #[must_use]
    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    /// Number of copies of `isbn` currently lent out.
    #[must_use]
    pub fn reserved_count(&self, isbn: &str) -> usize {
        self.reservations.iter().filter(|r| r.isbn == isbn).count()
    }

    /// Active reservations held by `holder`.
    #[must_use]
    pub fn loans_of(&self, holder: &str) -> Vec<&Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.holder == holder)
            .collect()
    }

    /// Number of catalogued editions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Drop every book and reservation.
    pub fn clear(&mut self) {
        self.books.clear();
        self.reservations.clear();
        self.dirty = true;
    }

    // ========================================================================
    // Dirty tracking
    // ========================================================================

    /// True if any operation changed state since load.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    pub(crate) fn catalog(&self) -> &HashMap<String, Book> {
        &self.books
    }

    fn find(&self, isbn: &str) -> Result<Book> {
        self.books
            .get(isbn)
            .cloned()
            .ok_or_else(|| LibraryError::BookNotFound {
                isbn: isbn.to_string(),
            })
    }

    fn merge(&mut self, copy: Book) {
        match self.books.get(copy.key()) {
            Some(existing) => {
                let merged = existing.with_amount(existing.amount.saturating_add(copy.amount));
                self.books.insert(merged.isbn.clone(), merged);
            }
            None => {
                self.books.insert(copy.isbn.clone(), copy);
            }
        }
    }

    fn replace_amount(&mut self, isbn: &str, amount: u32) {
        if let Some(book) = self.books.get(isbn) {
            let updated = book.with_amount(amount);
            self.books.insert(updated.isbn.clone(), updated);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::{Duration, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_book(isbn: &str, amount: u32) -> Book {
        Book {
            name: format!("Book {isbn}"),
            author: "Terry Pratchett".to_string(),
            category: "fantasy".to_string(),
            language: "en".to_string(),
            publication_date: date(1983, 11, 24),
            isbn: isbn.to_string(),
            amount,
        }
    }

    fn loan(holder: &str, isbn: &str, days: i64) -> Reservation {
        let from = date(2024, 1, 1);
        Reservation::new(holder, from, from + Duration::days(days), isbn)
    }

    fn repo_with(books: &[(&str, u32)]) -> Repository {
        let mut repo = Repository::default();
        for (isbn, amount) in books {
            repo.add(make_book(isbn, *amount));
        }
        repo
    }

    #[test]
    fn test_add_new() {
        let repo = repo_with(&[("A", 2)]);
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.book("A").unwrap().amount, 2);
        assert!(repo.is_dirty());
    }

    #[test]
    fn test_add_existing_sums_and_keeps_fields() {
        let mut repo = repo_with(&[("A", 2)]);
        let mut incoming = make_book("A", 3);
        incoming.name = "Renamed".to_string();
        repo.add(incoming);

        let book = repo.book("A").unwrap();
        assert_eq!(repo.len(), 1);
        assert_eq!(book.amount, 5);
        assert_eq!(book.name, "Book A");
    }

    #[test]
    fn test_add_twice_doubles() {
        let mut repo = Repository::default();
        let book = make_book("A", 4);
        repo.add(book.clone());
        repo.add(book);
        assert_eq!(repo.book("A").unwrap().amount, 8);
    }

    #[test]
    fn test_delete_partial() {
        let mut repo = repo_with(&[("A", 3)]);
        let receipt = repo.delete("A", 2).unwrap();
        assert_eq!(receipt.amount, 2);
        assert_eq!(receipt.name, "Book A");
        assert_eq!(repo.book("A").unwrap().amount, 1);
    }

    #[test]
    fn test_delete_all_removes_book() {
        let mut repo = repo_with(&[("A", 1)]);
        let receipt = repo.delete("A", 1).unwrap();
        assert_eq!(receipt.amount, 1);
        assert!(repo.book("A").is_none());
        assert!(repo.filter(&[] as &[&str]).unwrap().is_empty());
    }

    #[test]
    fn test_delete_all_keeps_book_with_reservations() {
        let mut repo = repo_with(&[("A", 2)]);
        repo.take(loan("Patrick", "A", 30)).unwrap();
        repo.delete("A", 1).unwrap();

        let book = repo.book("A").unwrap();
        assert_eq!(book.amount, 0);
        assert_eq!(repo.reserved_count("A"), 1);
    }

    #[test]
    fn test_delete_more_than_available() {
        let mut repo = repo_with(&[("A", 2)]);
        let err = repo.delete("A", 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientAmount);
        assert_eq!(repo.book("A").unwrap().amount, 2);
    }

    #[test]
    fn test_delete_nonexistent() {
        let mut repo = repo_with(&[("A", 2)]);
        let err = repo.delete("Z", 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_take_scenario() {
        let mut repo = repo_with(&[("A", 2)]);
        let lent = repo.take(loan("Patrick", "A", 30)).unwrap();
        assert_eq!(lent.amount, 1);
        assert_eq!(lent.isbn, "A");
        assert_eq!(repo.book("A").unwrap().amount, 1);
        assert_eq!(repo.reserved_count("A"), 1);
    }

    #[test]
    fn test_take_duration_bounds() {
        let mut repo = repo_with(&[("A", 5)]);
        assert!(repo.take(loan("Patrick", "A", 60)).is_ok());

        let err = repo.take(loan("Patrick", "A", 61)).unwrap_err();
        assert!(matches!(err, LibraryError::LoanTooLong { days: 61, .. }));

        let err = repo.take(loan("Patrick", "A", -1)).unwrap_err();
        assert!(matches!(err, LibraryError::ReversedWindow { .. }));
        assert_eq!(err.kind(), ErrorKind::UserError);

        assert_eq!(repo.reservations().len(), 1);
    }

    #[test]
    fn test_take_same_day_loan() {
        let mut repo = repo_with(&[("A", 1)]);
        assert!(repo.take(loan("Patrick", "A", 0)).is_ok());
    }

    #[test]
    fn test_take_nonexistent() {
        let mut repo = repo_with(&[("A", 1)]);
        let err = repo.take(loan("Patrick", "Z", 30)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_take_when_empty() {
        let mut repo = repo_with(&[("A", 1)]);
        repo.take(loan("Patrick", "A", 30)).unwrap();
        let err = repo.take(loan("Sandy", "A", 30)).unwrap_err();
        assert!(matches!(err, LibraryError::NoCopiesLeft { .. }));
        assert_eq!(repo.reservations().len(), 1);
    }

    #[test]
    fn test_take_validation_order() {
        let mut repo = repo_with(&[("A", 0)]);
        // Too long beats unknown ISBN.
        let err = repo.take(loan("Patrick", "Z", 90)).unwrap_err();
        assert!(matches!(err, LibraryError::LoanTooLong { .. }));
        // Unknown ISBN beats no copies.
        let err = repo.take(loan("Patrick", "Z", 10)).unwrap_err();
        assert!(matches!(err, LibraryError::BookNotFound { .. }));
        // No copies beats borrow limit.
        let err = repo.take(loan("Patrick", "A", 10)).unwrap_err();
        assert!(matches!(err, LibraryError::NoCopiesLeft { .. }));
    }

    #[test]
    fn test_take_too_many_per_person() {
        let mut repo = repo_with(&[("A", 1), ("B", 1), ("C", 1), ("D", 1)]);
        for isbn in ["A", "B", "C"] {
            repo.take(loan("Patrick", isbn, 30)).unwrap();
        }
        let err = repo.take(loan("Patrick", "D", 30)).unwrap_err();
        assert!(matches!(err, LibraryError::BorrowLimit { limit: 3, .. }));
        assert_eq!(repo.book("D").unwrap().amount, 1);

        // Someone else can still borrow.
        assert!(repo.take(loan("Sandy", "D", 30)).is_ok());
    }

    #[test]
    fn test_add_saturates_copy_count() {
        let mut repo = Repository::default();
        repo.add(make_book("A", u32::MAX));
        repo.add(make_book("A", 5));
        assert_eq!(repo.book("A").unwrap().amount, u32::MAX);
    }

    #[test]
    fn test_custom_policy() {
        let policy = LendingPolicy {
            max_loan_days: 14,
            max_loans_per_holder: 1,
        };
        let mut repo = Repository::new(policy);
        repo.add(make_book("A", 3));
        assert_eq!(repo.policy().max_loans_per_holder, 1);
        assert!(repo.take(loan("Patrick", "A", 15)).is_err());
        repo.take(loan("Patrick", "A", 14)).unwrap();
        assert!(repo.take(loan("Patrick", "A", 1)).is_err());
    }

    #[test]
    fn test_take_with_unrepresentable_policy_is_rejected() {
        let policy = LendingPolicy {
            max_loan_days: 200_000_000_000_000,
            ..LendingPolicy::default()
        };
        let mut repo = Repository::new(policy);
        repo.add(make_book("A", 1));
        repo.clear_dirty();

        let err = repo.take(loan("Patrick", "A", 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UserError);
        assert_eq!(repo.book("A").unwrap().amount, 1);
        assert!(repo.reservations().is_empty());
        assert!(!repo.is_dirty());
    }

    #[test]
    fn test_return() {
        let mut repo = repo_with(&[("A", 1)]);
        let reservation = loan("Patrick", "A", 30);
        repo.take(reservation.clone()).unwrap();

        let returned = repo.return_book(&reservation).unwrap();
        assert_eq!(returned.amount, 1);
        assert_eq!(repo.book("A").unwrap().amount, 1);
        assert!(repo.reservations().is_empty());
    }

    #[test]
    fn test_return_requires_exact_match() {
        let mut repo = repo_with(&[("A", 1)]);
        let reservation = loan("Patrick", "A", 30);
        repo.take(reservation.clone()).unwrap();

        let wrong_holder = Reservation {
            holder: "Sandy".to_string(),
            ..reservation.clone()
        };
        let wrong_window = Reservation {
            to: reservation.to + Duration::days(1),
            ..reservation.clone()
        };
        let wrong_isbn = Reservation {
            isbn: "Z".to_string(),
            ..reservation.clone()
        };
        for candidate in [wrong_holder, wrong_window, wrong_isbn] {
            let err = repo.return_book(&candidate).unwrap_err();
            assert!(matches!(err, LibraryError::ReservationNotFound { .. }));
        }
        assert_eq!(repo.reservations().len(), 1);
    }

    #[test]
    fn test_return_twice_fails() {
        let mut repo = repo_with(&[("A", 1)]);
        let reservation = loan("Patrick", "A", 30);
        repo.take(reservation.clone()).unwrap();
        repo.return_book(&reservation).unwrap();
        assert!(repo.return_book(&reservation).is_err());
        assert_eq!(repo.book("A").unwrap().amount, 1);
    }

    #[test]
    fn test_return_removes_only_one_of_identical_loans() {
        let mut repo = repo_with(&[("A", 2)]);
        let reservation = loan("Patrick", "A", 30);
        repo.take(reservation.clone()).unwrap();
        repo.take(reservation.clone()).unwrap();

        repo.return_book(&reservation).unwrap();
        assert_eq!(repo.reserved_count("A"), 1);
        assert_eq!(repo.book("A").unwrap().amount, 1);
    }

    #[test]
    fn test_return_after_book_vanished() {
        let mut repo = repo_with(&[("A", 1)]);
        let reservation = loan("Patrick", "A", 30);
        repo.take(reservation.clone()).unwrap();
        // Simulate an inconsistent file: the ledger references a missing book.
        repo.books.remove("A");

        let err = repo.return_book(&reservation).unwrap_err();
        assert!(matches!(err, LibraryError::BookNotFound { .. }));
        assert_eq!(repo.reservations().len(), 1);
        assert!(repo.book("A").is_none());
    }

    #[test]
    fn test_ledger_keeps_order() {
        let mut repo = repo_with(&[("A", 3)]);
        let first = loan("Ann", "A", 1);
        let second = loan("Bob", "A", 2);
        let third = loan("Cid", "A", 3);
        for r in [&first, &second, &third] {
            repo.take(r.clone()).unwrap();
        }
        repo.return_book(&second).unwrap();
        assert_eq!(repo.reservations(), &[first, third]);
    }

    #[test]
    fn test_loans_of() {
        let mut repo = repo_with(&[("A", 3), ("B", 1)]);
        repo.take(loan("Ann", "A", 1)).unwrap();
        repo.take(loan("Ann", "B", 1)).unwrap();
        repo.take(loan("Bob", "A", 1)).unwrap();
        assert_eq!(repo.loans_of("Ann").len(), 2);
        assert_eq!(repo.loans_of("Bob").len(), 1);
        assert!(repo.loans_of("Cid").is_empty());
    }

    #[test]
    fn test_clear() {
        let mut repo = repo_with(&[("A", 3)]);
        repo.take(loan("Ann", "A", 1)).unwrap();
        repo.clear();
        assert!(repo.is_empty());
        assert!(repo.reservations().is_empty());
    }

    #[test]
    fn test_dirty_tracking() {
        let mut repo = Repository::default();
        assert!(!repo.is_dirty());
        repo.add(make_book("A", 1));
        assert!(repo.is_dirty());
        repo.clear_dirty();

        assert!(repo.delete("A", 5).is_err());
        assert!(!repo.is_dirty());
    }

    #[test]
    fn test_save_without_path() {
        let repo = Repository::default();
        assert!(matches!(repo.save(), Err(LibraryError::Storage(_))));
    }

    #[test]
    fn test_roundtrip_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");

        let mut repo = repo_with(&[("A", 2), ("B", 1)]);
        repo.take(loan("Patrick", "A", 30)).unwrap();
        repo.take(loan("Sandy", "B", 10)).unwrap();
        repo.take(loan("Patrick", "A", 5)).unwrap();
        repo.save_to(&path).unwrap();

        let loaded = Repository::open(&path).unwrap();
        assert!(!loaded.is_dirty());
        assert_eq!(loaded.len(), 2);
        for book in repo.books() {
            assert_eq!(loaded.book(&book.isbn).unwrap().amount, book.amount);
        }
        assert_eq!(loaded.reservations(), repo.reservations());
        assert_eq!(loaded.path(), Some(path.as_path()));
    }

    #[test]
    fn test_open_merges_duplicate_isbns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        let snapshot = Snapshot {
            books: vec![make_book("A", 2), make_book("A", 3)],
            reservations: vec![],
        };
        snapshot::save(&path, &snapshot).unwrap();

        let repo = Repository::open(&path).unwrap();
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.book("A").unwrap().amount, 5);
    }
}
