use crate::error::Result;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Name of the log directory inside the output directory.
pub const LOG_DIR_NAME: &str = "logs";

/// Stores the tool output of each cut under `<output_dir>/logs/`.
///
/// Files are named `<YYYY-MM-DD><sep><token>.log`, with a fresh random
/// token per file.
#[derive(Debug, Clone)]
pub struct RunLog {
    dir: PathBuf,
    separator: char,
}

impl RunLog {
    pub fn new(output_dir: &Path, separator: char) -> Self {
        Self {
            dir: output_dir.join(LOG_DIR_NAME),
            separator,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for a new log file. Nothing is created.
    pub fn next_path(&self) -> PathBuf {
        let date = Local::now().format("%Y-%m-%d").to_string();
        let token = Uuid::new_v4().simple();
        self.dir.join(format!("{date}{}{token}.log", self.separator))
    }

    /// Write `contents` to a new log file and return its path.
    pub fn write(&self, contents: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.next_path();
        fs::write(&path, contents)?;
        debug!("Wrote log {}", path.display());
        Ok(path)
    }
}
