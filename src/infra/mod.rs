// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File formats and outside resources:
//
//   config.rs          — the JSON evaluation config
//   pretrained.rs      — config.json / tokenizer.json of the
//                        pretrained model (local dir or hub)
//   tokenizer_store.rs — tokenizer loading, special token ids
//   checkpoint.rs      — fine-tuned weights (PyTorch or Burn)
//   metrics.rs         — F1 scores over the collected labels
//   logger.rs          — tagged result lines in the log file
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Evaluation config file
pub mod config;

/// Pretrained model files and architecture
pub mod pretrained;

/// Tokenizer loading
pub mod tokenizer_store;

/// Model checkpoint loading
pub mod checkpoint;

/// Multi-class F1 metrics
pub mod metrics;

/// Result log file
pub mod logger;
