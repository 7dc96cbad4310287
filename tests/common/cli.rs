use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use std::process::ExitStatus;
use tempfile::TempDir;

/// Scratch directory that `shelf` runs in; `books.json` lives at its root.
pub struct ShelfWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl ShelfWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self { temp_dir, root }
    }

    /// Workspace with an empty catalog already created.
    pub fn initialized() -> Self {
        let workspace = Self::new();
        let output = run_shelf(&workspace, ["init"], "init");
        assert!(output.status.success(), "init failed: {}", output.stderr);
        workspace
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.root.join("books.json")
    }

    pub fn catalog(&self) -> serde_json::Value {
        let text = fs::read_to_string(self.catalog_path()).expect("read catalog");
        serde_json::from_str(&text).expect("parse catalog")
    }

    /// Write a book description file and return its name.
    pub fn write_book(&self, isbn: &str, name: &str, author: &str, amount: u32) -> String {
        let file = format!("{isbn}.json");
        let body = serde_json::json!({
            "name": name,
            "author": author,
            "category": "fiction",
            "language": "en",
            "publication_date": "1990-01-01",
            "isbn": isbn,
            "amount": amount,
        });
        fs::write(self.root.join(&file), body.to_string()).expect("write book");
        file
    }

    pub fn write_file(&self, name: &str, contents: &str) {
        fs::write(self.root.join(name), contents).expect("write file");
    }
}

pub struct RunOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }
}

pub fn shelf_cmd(workspace: &ShelfWorkspace) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shelf"));
    cmd.current_dir(&workspace.root)
        .env_remove("SHELF_CATALOG")
        .env_remove("SHELF_CONFIG")
        .env_remove("SHELF_LOG_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

pub fn run_shelf<I, S>(workspace: &ShelfWorkspace, args: I, label: &str) -> RunOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let output = shelf_cmd(workspace)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("{label}: failed to run shelf: {e}"));
    RunOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
