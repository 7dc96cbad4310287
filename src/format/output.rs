use serde::Serialize;
use shelf_lib::{Book, Reservation};

/// Book with its lent-out count for filter views.
#[derive(Debug, Clone, Serialize)]
pub struct BookWithLoans {
    #[serde(flatten)]
    pub book: Book,
    pub reserved: usize,
}

/// Result of a mutating command.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub action: &'static str,
    pub book: Book,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<Reservation>,
}

/// Where and how command output is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputContext {
    json: bool,
    quiet: bool,
}

impl OutputContext {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }

    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.json
    }

    /// Print a value as a single JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn json<T: Serialize>(&self, value: &T) -> serde_json::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print a status message. Suppressed by `--quiet`.
    pub fn status(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }

    /// Print a data line. Never suppressed.
    pub fn line(&self, line: &str) {
        println!("{line}");
    }
}
