// ============================================================
// Layer 6 — Result Logger
// ============================================================
// Appends tagged plain-text lines to the configured log file:
//
//   [TEST] --- --- ---
//   [LOSS] Loss: 0.4213;
//   [METRIC] f1_micro = 0.8710
//
// The file and its parent directories are created on first
// use; earlier runs are kept (append mode). Every line is also
// sent to tracing so it shows up on the console.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

pub struct ResultLogger {
    path: PathBuf,
}

impl ResultLogger {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create log directory '{}'", parent.display()))?;
        }
        Ok(Self { path })
    }

    /// Append `[tag] message` as one line.
    pub fn info(&self, message: &str, tag: &str) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Cannot open log file '{}'", self.path.display()))?;

        writeln!(f, "[{}] {}", tag, message)?;
        tracing::info!(tag, "{}", message);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_appended_with_tags() {
        let dir = tempfile::tempdir().unwrap();
        let logger = ResultLogger::new(dir.path().join("logs/test.log")).unwrap();

        logger.info("--- --- ---", "TEST").unwrap();
        logger.info("Loss: 0.5;", "LOSS").unwrap();

        let text = fs::read_to_string(logger.path()).unwrap();
        assert_eq!(text, "[TEST] --- --- ---\n[LOSS] Loss: 0.5;\n");
    }

    #[test]
    fn test_second_logger_keeps_previous_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");

        ResultLogger::new(&path).unwrap().info("first", "RUN").unwrap();
        ResultLogger::new(&path).unwrap().info("second", "RUN").unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
