// ============================================================
// Layer 3 — Table Domain Type
// ============================================================
// A table is a list of columns. Every column carries the cells
// read from disk and the index of its semantic type (the class
// the model has to predict for that column).
//
// Example:
//   Table "movies_17"
//     ├── Column "title"    cells ["Alien", "Heat"]     label 12
//     └── Column "released" cells ["1979", "1995"]      label 40
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// One annotated column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Header text, kept for traceability only; it is not fed
    /// to the model
    #[serde(default)]
    pub name: String,

    /// Cell values from top to bottom
    pub cells: Vec<String>,

    /// Class index of the column type
    pub label: u32,
}

#[cfg(test)]
impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<String>, label: u32) -> Self {
        Self {
            name: name.into(),
            cells,
            label,
        }
    }
}

/// A table loaded from the dataset directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Identifier, defaults to the file stem when absent in the file
    #[serde(default)]
    pub id: String,

    pub columns: Vec<Column>,
}

#[cfg(test)]
impl Table {
    pub fn new(id: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            id: id.into(),
            columns,
        }
    }
}

impl Table {
    /// Column labels in column order
    pub fn labels(&self) -> Vec<u32> {
        self.columns.iter().map(|c| c.label).collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_follow_column_order() {
        let table = Table::new(
            "t",
            vec![
                Column::new("a", vec!["x".into()], 3),
                Column::new("b", vec!["y".into()], 1),
            ],
        );
        assert_eq!(table.labels(), vec![3, 1]);
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{"columns": [{"cells": ["1", "2"], "label": 4}]}"#;
        let table: Table = serde_json::from_str(json).unwrap();
        assert!(table.id.is_empty());
        assert_eq!(table.columns[0].name, "");
        assert_eq!(table.columns[0].label, 4);
    }
}
