// ============================================================
// Layer 4 — Table Serializer
// ============================================================
// Flattens tables into token id sequences the model can read.
// Every column starts with the marker token ([CLS]); the model
// output at that position is the column's class vector.
//
//   table_wise  → one sample per table
//                 [CLS] col1 tokens [CLS] col2 tokens ... [SEP]
//                 labels = [label1, label2, ...]
//
//   column_wise → one sample per column
//                 [CLS] col tokens [SEP]
//                 labels = [label]
//
// Cells of a column are joined with spaces and only the first
// `num_rows` cells are used. Table-wise samples give every
// column the same token budget so truncation can never drop
// a column's marker.
//
// Reference: Devlin et al. (2019) BERT, §3 (input representation)

use anyhow::Result;

use crate::data::dataset::TableSample;
use crate::domain::table::{Column, Table};

/// Anything that can turn text into token ids without adding
/// special tokens.
pub trait CellEncoder {
    fn encode_text(&self, text: &str) -> Result<Vec<u32>>;
}

/// Ids of the special tokens the serializer inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialTokens {
    /// Marker placed in front of every column
    pub cls: u32,
    /// End of sequence
    pub sep: u32,
}

/// How a table is turned into samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Serialization {
    TableWise,
    ColumnWise,
}

impl Serialization {
    /// Map the configured name to a serialization.
    /// Unknown names fall back to table-wise.
    pub fn from_name(name: &str) -> Self {
        match name {
            "table_wise" => Self::TableWise,
            "column_wise" => Self::ColumnWise,
            other => {
                tracing::warn!(
                    "Unknown table serialization type '{}', using table_wise",
                    other
                );
                Self::TableWise
            }
        }
    }
}

pub struct TableSerializer<'a, E: CellEncoder> {
    encoder:       &'a E,
    special:       SpecialTokens,
    serialization: Serialization,
    num_rows:      usize,
    max_len:       usize,
}

impl<'a, E: CellEncoder> TableSerializer<'a, E> {
    pub fn new(
        encoder:       &'a E,
        special:       SpecialTokens,
        serialization: Serialization,
        num_rows:      usize,
        max_len:       usize,
    ) -> Self {
        Self { encoder, special, serialization, num_rows, max_len }
    }

    /// Serialize every table, skipping tables that cannot be
    /// represented (no columns, or more columns than markers fit).
    pub fn serialize_all(&self, tables: &[Table]) -> Result<Vec<TableSample>> {
        let mut samples = Vec::new();
        for table in tables {
            match self.serialization {
                Serialization::TableWise => {
                    if let Some(sample) = self.table_wise(table)? {
                        samples.push(sample);
                    }
                }
                Serialization::ColumnWise => {
                    for column in &table.columns {
                        samples.push(self.column_wise(column)?);
                    }
                }
            }
        }

        tracing::info!(
            "Serialized {} tables into {} samples ({:?})",
            tables.len(),
            samples.len(),
            self.serialization
        );
        Ok(samples)
    }

    fn table_wise(&self, table: &Table) -> Result<Option<TableSample>> {
        let n_columns = table.columns.len();
        if n_columns == 0 {
            tracing::warn!("Skipping table '{}': no columns", table.id);
            return Ok(None);
        }
        // n markers + final [SEP]
        if n_columns + 1 > self.max_len {
            tracing::warn!(
                "Skipping table '{}': {} columns do not fit in {} tokens",
                table.id,
                n_columns,
                self.max_len
            );
            return Ok(None);
        }

        let budget = ((self.max_len - 1) / n_columns).saturating_sub(1);

        let mut data = Vec::with_capacity(self.max_len);
        for column in &table.columns {
            data.push(self.special.cls);
            data.extend(self.column_tokens(column, budget)?);
        }
        data.push(self.special.sep);

        Ok(Some(TableSample::new(data, table.labels())))
    }

    fn column_wise(&self, column: &Column) -> Result<TableSample> {
        let budget = self.max_len.saturating_sub(2);

        let mut data = vec![self.special.cls];
        data.extend(self.column_tokens(column, budget)?);
        data.push(self.special.sep);

        Ok(TableSample::new(data, vec![column.label]))
    }

    fn column_tokens(&self, column: &Column, budget: usize) -> Result<Vec<u32>> {
        let text = column
            .cells
            .iter()
            .take(self.num_rows)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        let mut ids = self.encoder.encode_text(&text)?;
        ids.truncate(budget);
        Ok(ids)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// One token per whitespace-separated word, id = word length + 10
    struct WordLenEncoder;

    impl CellEncoder for WordLenEncoder {
        fn encode_text(&self, text: &str) -> Result<Vec<u32>> {
            Ok(text.split_whitespace().map(|w| w.len() as u32 + 10).collect())
        }
    }

    const SPECIAL: SpecialTokens = SpecialTokens { cls: 101, sep: 102 };

    fn cells(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn two_column_table() -> Table {
        Table::new(
            "t",
            vec![
                Column::new("a", cells(&["x", "yy", "zzz"]), 5),
                Column::new("b", cells(&["abcd"]), 7),
            ],
        )
    }

    #[test]
    fn test_table_wise_marks_every_column() {
        let s = TableSerializer::new(&WordLenEncoder, SPECIAL, Serialization::TableWise, 10, 64);
        let samples = s.serialize_all(&[two_column_table()]).unwrap();

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].data, vec![101, 11, 12, 13, 101, 14, 102]);
        assert_eq!(samples[0].labels, vec![5, 7]);
    }

    #[test]
    fn test_column_wise_one_sample_per_column() {
        let s = TableSerializer::new(&WordLenEncoder, SPECIAL, Serialization::ColumnWise, 10, 64);
        let samples = s.serialize_all(&[two_column_table()]).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].data, vec![101, 11, 12, 13, 102]);
        assert_eq!(samples[1].data, vec![101, 14, 102]);
        assert_eq!(samples[1].labels, vec![7]);
    }

    #[test]
    fn test_num_rows_limits_cells() {
        let s = TableSerializer::new(&WordLenEncoder, SPECIAL, Serialization::ColumnWise, 1, 64);
        let samples = s.serialize_all(&[two_column_table()]).unwrap();
        assert_eq!(samples[0].data, vec![101, 11, 102]);
    }

    #[test]
    fn test_truncation_keeps_all_markers() {
        // budget = (7 - 1) / 2 - 1 = 2 tokens per column
        let s = TableSerializer::new(&WordLenEncoder, SPECIAL, Serialization::TableWise, 10, 7);
        let samples = s.serialize_all(&[two_column_table()]).unwrap();

        let data = &samples[0].data;
        assert!(data.len() <= 7);
        assert_eq!(data.iter().filter(|&&t| t == 101).count(), 2);
        assert_eq!(data, &vec![101, 11, 12, 101, 14, 102]);
    }

    #[test]
    fn test_tables_that_cannot_fit_are_skipped() {
        let s = TableSerializer::new(&WordLenEncoder, SPECIAL, Serialization::TableWise, 10, 2);
        let empty = Table::new("empty", Vec::new());
        let samples = s.serialize_all(&[two_column_table(), empty]).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_unknown_serialization_falls_back_to_table_wise() {
        assert_eq!(Serialization::from_name("column_wise"), Serialization::ColumnWise);
        assert_eq!(Serialization::from_name("row_wise"), Serialization::TableWise);
    }
}
