// ============================================================
// Layer 6 — Evaluation Config
// ============================================================
// The JSON file that drives a test run, e.g.
//
//   {
//     "pretrained_model_name": "bert-base-uncased",
//     "table_serialization_type": "table_wise",
//     "dataset": { "data_dir": "data", "test_path": "test", "num_rows": 10 },
//     "dataloader": { "num_workers": 0 },
//     "batch_size": 8,
//     "num_gpu": 1,
//     "checkpoint_dir": "checkpoints",
//     "checkpoint_name": "model.pt",
//     "num_labels": 78,
//     "test_log_filename": "logs/test.log",
//     "metrics": ["f1_micro", "f1_macro", "f1_weighted"]
//   }
//
// Directory and file names are joined as paths, so a trailing
// slash on the directories is optional.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::infra::metrics::METRIC_NAMES;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub data_dir:  String,
    pub test_path: String,
    /// Cells kept per column
    #[serde(default = "default_num_rows")]
    pub num_rows:  usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataLoaderConfig {
    #[serde(default)]
    pub num_workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    pub pretrained_model_name:    String,
    #[serde(default = "default_serialization")]
    pub table_serialization_type: String,
    pub dataset:                  DatasetConfig,
    #[serde(default)]
    pub dataloader:               DataLoaderConfig,
    pub batch_size:               usize,
    #[serde(default)]
    pub num_gpu:                  usize,
    pub checkpoint_dir:           String,
    pub checkpoint_name:          String,
    pub num_labels:               usize,
    pub test_log_filename:        String,
    #[serde(default = "default_metrics")]
    pub metrics:                  Vec<String>,
}

fn default_num_rows() -> usize { 10 }

fn default_serialization() -> String { "table_wise".to_string() }

fn default_metrics() -> Vec<String> {
    METRIC_NAMES.iter().map(|m| m.to_string()).collect()
}

impl EvalConfig {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

        let cfg: EvalConfig = serde_json::from_str(&json)
            .with_context(|| format!("Malformed config '{}'", path.display()))?;
        cfg.validate()?;

        tracing::debug!("Loaded config from '{}': {:?}", path.display(), cfg);
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("batch_size must be greater than 0");
        }
        if self.num_labels == 0 {
            bail!("num_labels must be greater than 0");
        }
        if let Some(unknown) = self.metrics.iter().find(|m| !METRIC_NAMES.contains(&m.as_str())) {
            bail!(
                "Unknown metric '{}', expected one of {:?}",
                unknown,
                METRIC_NAMES
            );
        }
        Ok(())
    }

    /// Directory holding the test tables
    pub fn test_dir(&self) -> PathBuf {
        Path::new(&self.dataset.data_dir).join(&self.dataset.test_path)
    }

    pub fn checkpoint_path(&self) -> PathBuf {
        Path::new(&self.checkpoint_dir).join(&self.checkpoint_name)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "pretrained_model_name": "bert-base-uncased",
        "table_serialization_type": "column_wise",
        "dataset": { "data_dir": "data/", "test_path": "test", "num_rows": 5 },
        "dataloader": { "num_workers": 2 },
        "batch_size": 8,
        "num_gpu": 1,
        "checkpoint_dir": "checkpoints",
        "checkpoint_name": "model.pt",
        "num_labels": 78,
        "test_log_filename": "logs/test.log",
        "metrics": ["f1_micro", "f1_weighted"]
    }"#;

    fn write_config(body: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_full_config() {
        let (_dir, path) = write_config(FULL);
        let cfg = EvalConfig::load(&path).unwrap();

        assert_eq!(cfg.batch_size, 8);
        assert_eq!(cfg.dataloader.num_workers, 2);
        assert_eq!(cfg.dataset.num_rows, 5);
        assert_eq!(cfg.metrics, vec!["f1_micro", "f1_weighted"]);
        assert_eq!(cfg.test_dir(), PathBuf::from("data/test"));
        assert_eq!(cfg.checkpoint_path(), PathBuf::from("checkpoints/model.pt"));
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let (_dir, path) = write_config(r#"{
            "pretrained_model_name": "bert-base-uncased",
            "dataset": { "data_dir": "data", "test_path": "test" },
            "batch_size": 4,
            "checkpoint_dir": "ckpt",
            "checkpoint_name": "m.mpk.gz",
            "num_labels": 3,
            "test_log_filename": "test.log"
        }"#);
        let cfg = EvalConfig::load(&path).unwrap();

        assert_eq!(cfg.table_serialization_type, "table_wise");
        assert_eq!(cfg.dataloader.num_workers, 0);
        assert_eq!(cfg.num_gpu, 0);
        assert_eq!(cfg.dataset.num_rows, 10);
        assert_eq!(cfg.metrics.len(), METRIC_NAMES.len());
    }

    #[test]
    fn test_example_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.example.json");
        let cfg = EvalConfig::load(path).unwrap();
        assert_eq!(cfg.metrics.len(), 3);
    }

    #[test]
    fn test_unknown_metric_is_rejected() {
        let (_dir, path) = write_config(&FULL.replace("f1_weighted", "auc"));
        let err = EvalConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("auc"));
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let (_dir, path) = write_config(&FULL.replace("\"batch_size\": 8", "\"batch_size\": 0"));
        assert!(EvalConfig::load(&path).is_err());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let (_dir, path) = write_config("{ \"batch_size\": ");
        assert!(EvalConfig::load(&path).is_err());
    }
}
