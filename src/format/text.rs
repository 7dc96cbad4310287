//! Text formatting functions for `shelf`.
//!
//! Plain, tab-free single-line renderings meant to be grepped:
//! - Book lines: `{isbn} x{amount} "{name}" by {author} [{category}, {language}, {date}]`
//! - Reservation lines: `{holder}: {isbn} {from} -> {to}`

use chrono::NaiveDate;
use shelf_lib::{Book, Reservation};

/// Format a single-line book summary.
#[must_use]
pub fn format_book_line(book: &Book) -> String {
    format!(
        "{} x{} \"{}\" by {} [{}, {}, {}]",
        book.isbn,
        book.amount,
        book.name,
        book.author,
        book.category,
        book.language,
        book.publication_date,
    )
}

/// Format a single-line reservation summary, flagging overdue loans.
#[must_use]
pub fn format_reservation_line(reservation: &Reservation, today: NaiveDate) -> String {
    let mut line = format!(
        "{}: {} {} -> {}",
        reservation.holder, reservation.isbn, reservation.from, reservation.to
    );
    if reservation.is_overdue(today) {
        line.push_str(" (overdue)");
    }
    line
}

/// Note printed when a copy comes back after its due date.
#[must_use]
pub fn format_late_return(reservation: &Reservation, today: NaiveDate) -> Option<String> {
    if !reservation.is_overdue(today) {
        return None;
    }
    let days = today.signed_duration_since(reservation.to).num_days();
    let unit = if days == 1 { "day" } else { "days" };
    Some(format!(
        "Returned {days} {unit} late (due {}).",
        reservation.to
    ))
}
