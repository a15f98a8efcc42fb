// ============================================================
// Layer 4 — Table Loader
// ============================================================
// Loads annotated tables from a directory of .json files.
//
// Every file holds exactly one table:
//
//   {
//     "id": "movies_17",
//     "columns": [
//       { "name": "title",    "cells": ["Alien", "Heat"], "label": 12 },
//       { "name": "released", "cells": ["1979", "1995"],  "label": 40 }
//     ]
//   }
//
// "id" and "name" are optional; a missing id becomes the file
// stem. Files are read in sorted order so batches are
// reproducible between runs.
//
// Reference: serde_json crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::table::Table;
use crate::domain::traits::TableSource;

/// Loads all .json tables from a given directory.
/// Implements the TableSource trait from Layer 3.
pub struct JsonTableLoader {
    dir: PathBuf,
}

impl JsonTableLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TableSource for JsonTableLoader {
    fn load_all(&self) -> Result<Vec<Table>> {
        // A test run without data is a configuration mistake
        if !self.dir.is_dir() {
            bail!("Dataset directory '{}' does not exist", self.dir.display());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)
            .with_context(|| format!("Cannot read directory '{}'", self.dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut tables = Vec::with_capacity(paths.len());
        for path in &paths {
            match load_single_table(path) {
                Ok(table) => {
                    tracing::debug!(
                        "Loaded: {} ({} columns)",
                        table.id,
                        table.columns.len()
                    );
                    tables.push(table);
                }
                // One bad file should not abort the whole run
                Err(e) => {
                    tracing::warn!("Skipping '{}': {:#}", path.display(), e);
                }
            }
        }

        tracing::info!(
            "Loaded {} tables from '{}'",
            tables.len(),
            self.dir.display()
        );
        Ok(tables)
    }
}

/// Parse a single .json file into a Table.
fn load_single_table(path: &Path) -> Result<Table> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let mut table: Table = serde_json::from_str(&text)
        .with_context(|| format!("Invalid table JSON in '{}'", path.display()))?;

    if table.id.is_empty() {
        table.id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();
    }

    Ok(table)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_loads_json_tables_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.json", r#"{"columns": [{"cells": ["x"], "label": 2}]}"#);
        write(dir.path(), "a.json", r#"{"id": "first", "columns": [{"cells": ["y"], "label": 1}]}"#);
        write(dir.path(), "notes.txt", "not a table");

        let tables = JsonTableLoader::new(dir.path()).load_all().unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].id, "first");
        // Missing id falls back to the file stem
        assert_eq!(tables[1].id, "b");
    }

    #[test]
    fn test_skips_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "good.json", r#"{"columns": []}"#);
        write(dir.path(), "bad.json", "{ this is not json");

        let tables = JsonTableLoader::new(dir.path()).load_all().unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].id, "good");
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = JsonTableLoader::new(dir.path().join("nope"));
        assert!(loader.load_all().is_err());
    }
}
