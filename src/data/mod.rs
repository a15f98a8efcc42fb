// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from table files on disk to tensor batches.
//
//   *.json tables
//       │
//       ▼
//   JsonTableLoader   → reads files into domain Tables
//       │
//       ▼
//   TableSerializer   → [CLS] col1 [CLS] col2 ... [SEP] token ids
//       │
//       ▼
//   TableDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   TableBatcher      → right-pads samples into one batch
//       │
//       ▼
//   DataLoader        → feeds batches to the evaluator
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads .json tables from a directory
pub mod loader;

/// Turns tables into token id samples
pub mod serializer;

/// Implements Burn's Dataset trait for table samples
pub mod dataset;

/// Implements Burn's Batcher trait (collation with padding)
pub mod batcher;
