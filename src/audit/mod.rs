mod file_ops;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use self::file_ops::append_line;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only record of every command line the user attempted.
pub struct CommandLog {
    file_path: PathBuf,
    failed: bool,
}

impl CommandLog {
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            failed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Records `raw` with the current local time. Write failures are reported
    /// once through the returned error; later failures are swallowed.
    pub fn record(&mut self, raw: &str) -> Result<(), std::io::Error> {
        self.record_at(raw, Local::now())
    }

    fn record_at(&mut self, raw: &str, at: DateTime<Local>) -> Result<(), std::io::Error> {
        let entry = format_entry(raw, at);
        match append_line(&self.file_path, &entry) {
            Ok(()) => Ok(()),
            Err(_) if self.failed => Ok(()),
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }
}

fn format_entry(raw: &str, at: DateTime<Local>) -> String {
    format!("[{}] {}", at.format(TIMESTAMP_FORMAT), raw)
}
