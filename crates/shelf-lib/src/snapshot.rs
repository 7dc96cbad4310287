//! Catalog file I/O.
//!
//! The whole repository lives in one pretty-printed JSON document:
//!
//! ```json
//! { "books": [ ... ], "reservations": [ ... ] }
//! ```
//!
//! It is read once at startup and written back wholesale.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, Result};
use crate::model::{Book, Reservation};

/// On-disk shape of the repository.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
}

/// Load a snapshot from disk.
///
/// # Errors
///
/// Returns `FileNotFound` if the file is absent, `Io` if it cannot be read,
/// or `SnapshotParse` if its content is not a valid snapshot.
pub fn load(path: &Path) -> Result<Snapshot> {
    let text = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LibraryError::FileNotFound(path.to_path_buf())
        } else {
            LibraryError::Io(e)
        }
    })?;

    serde_json::from_str(&text).map_err(|e| LibraryError::SnapshotParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Save a snapshot with atomic write.
///
/// Uses write-to-temp + rename so a crash never leaves a half-written catalog.
///
/// # Errors
///
/// Returns `Json` if serialization fails or `Io` if the file cannot be written.
pub fn save(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;

    let tmp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&tmp_path)?;
    writeln!(file, "{json}")?;
    file.flush()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    tracing::debug!(
        "Wrote {} books and {} reservations to {}",
        snapshot.books.len(),
        snapshot.reservations.len(),
        path.display()
    );

    Ok(())
}
