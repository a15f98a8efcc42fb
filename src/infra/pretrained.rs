// ============================================================
// Layer 6 — Pretrained Model Files
// ============================================================
// Finds the config.json and tokenizer.json that belong to the
// configured pretrained model name:
//
//   - an existing local directory → files inside it
//   - anything else               → HuggingFace hub repo id,
//                                   downloaded (and cached) by
//                                   hf-hub
//
// The weights themselves always come from the fine-tuned
// checkpoint; only the architecture and vocabulary are taken
// from the pretrained model.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::ml::model::BertClassifierConfig;

#[derive(Debug, Clone)]
pub struct PretrainedFiles {
    pub config:    PathBuf,
    pub tokenizer: PathBuf,
}

/// Locate or download the files of `name`.
pub fn resolve(name: &str) -> Result<PretrainedFiles> {
    let dir = Path::new(name);
    if dir.is_dir() {
        tracing::info!("Using local pretrained files in '{}'", dir.display());
        return Ok(PretrainedFiles {
            config:    dir.join("config.json"),
            tokenizer: dir.join("tokenizer.json"),
        });
    }

    tracing::info!("Fetching '{}' from the HuggingFace hub", name);
    let api = hf_hub::api::sync::Api::new().context("Failed to initialize HuggingFace API")?;
    let repo = api.model(name.to_string());

    let config = repo
        .get("config.json")
        .with_context(|| format!("Failed to download 'config.json' from {}", name))?;
    let tokenizer = repo
        .get("tokenizer.json")
        .with_context(|| format!("Failed to download 'tokenizer.json' from {}", name))?;

    Ok(PretrainedFiles { config, tokenizer })
}

/// The subset of a HuggingFace BERT config.json the classifier needs.
#[derive(Debug, Clone, Deserialize)]
pub struct PretrainedBertConfig {
    pub vocab_size:              usize,
    pub hidden_size:             usize,
    pub num_hidden_layers:       usize,
    pub num_attention_heads:     usize,
    pub intermediate_size:       usize,
    #[serde(default = "default_max_positions")]
    pub max_position_embeddings: usize,
    #[serde(default = "default_type_vocab")]
    pub type_vocab_size:         usize,
    #[serde(default = "default_dropout")]
    pub hidden_dropout_prob:     f64,
    #[serde(default = "default_dropout")]
    pub attention_probs_dropout_prob: f64,
    #[serde(default = "default_eps")]
    pub layer_norm_eps:          f64,
}

fn default_max_positions() -> usize { 512 }
fn default_type_vocab() -> usize { 2 }
fn default_dropout() -> f64 { 0.1 }
fn default_eps() -> f64 { 1e-12 }

impl PretrainedBertConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read model config '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed model config '{}'", path.display()))
    }

    /// Classifier architecture with `num_labels` output classes.
    pub fn classifier(&self, num_labels: usize) -> BertClassifierConfig {
        BertClassifierConfig::new(
            self.vocab_size,
            self.hidden_size,
            self.num_hidden_layers,
            self.num_attention_heads,
            self.intermediate_size,
            self.max_position_embeddings,
            self.type_vocab_size,
            num_labels,
        )
        .with_hidden_dropout_prob(self.hidden_dropout_prob)
        .with_attention_dropout_prob(self.attention_probs_dropout_prob)
        .with_layer_norm_eps(self.layer_norm_eps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BERT_BASE: &str = r#"{
        "architectures": ["BertForMaskedLM"],
        "attention_probs_dropout_prob": 0.1,
        "hidden_act": "gelu",
        "hidden_dropout_prob": 0.1,
        "hidden_size": 768,
        "initializer_range": 0.02,
        "intermediate_size": 3072,
        "layer_norm_eps": 1e-12,
        "max_position_embeddings": 512,
        "model_type": "bert",
        "num_attention_heads": 12,
        "num_hidden_layers": 12,
        "pad_token_id": 0,
        "type_vocab_size": 2,
        "vocab_size": 30522
    }"#;

    #[test]
    fn test_local_directory_is_used_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let name = dir.path().to_str().unwrap();
        let files = resolve(name).unwrap();
        assert_eq!(files.config, dir.path().join("config.json"));
        assert_eq!(files.tokenizer, dir.path().join("tokenizer.json"));
    }

    #[test]
    fn test_parse_bert_base_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, BERT_BASE).unwrap();

        let cfg = PretrainedBertConfig::load(&path).unwrap();
        let classifier = cfg.classifier(78);
        assert_eq!(classifier.hidden_size, 768);
        assert_eq!(classifier.num_hidden_layers, 12);
        assert_eq!(classifier.max_position_embeddings, 512);
        assert_eq!(classifier.num_labels, 78);
    }

    #[test]
    fn test_missing_fields_use_bert_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"vocab_size": 100, "hidden_size": 8, "num_hidden_layers": 1,
            "num_attention_heads": 2, "intermediate_size": 16}"#).unwrap();

        let cfg = PretrainedBertConfig::load(&path).unwrap();
        assert_eq!(cfg.max_position_embeddings, 512);
        assert_eq!(cfg.type_vocab_size, 2);
    }
}
