// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads the pretrained model's tokenizer.json and looks up the
// special tokens the serializer needs ([CLS] and [SEP]).
//
// Reference: HuggingFace tokenizers crate documentation

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tokenizers::Tokenizer;

use crate::data::serializer::{CellEncoder, SpecialTokens};

pub const CLS_TOKEN: &str = "[CLS]";
pub const SEP_TOKEN: &str = "[SEP]";

/// A loaded tokenizer together with its special token ids.
pub struct TokenizerStore {
    tokenizer: Tokenizer,
    special:   SpecialTokens,
}

impl TokenizerStore {
    /// Load a tokenizer from a tokenizer.json file
    pub fn load(path: &Path) -> Result<Self> {
        let tokenizer = Tokenizer::from_file(path)
            .map_err(|e| anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e))?;
        Self::from_tokenizer(tokenizer)
            .with_context(|| format!("Unusable tokenizer '{}'", path.display()))
    }

    pub fn from_tokenizer(tokenizer: Tokenizer) -> Result<Self> {
        let lookup = |token: &str| {
            tokenizer
                .token_to_id(token)
                .ok_or_else(|| anyhow!("Tokenizer has no '{}' token", token))
        };
        let special = SpecialTokens {
            cls: lookup(CLS_TOKEN)?,
            sep: lookup(SEP_TOKEN)?,
        };

        tracing::info!(
            "Tokenizer ready: vocab={}, cls={}, sep={}",
            tokenizer.get_vocab_size(true),
            special.cls,
            special.sep
        );
        Ok(Self { tokenizer, special })
    }

    pub fn special_tokens(&self) -> SpecialTokens {
        self.special
    }

    /// Id of the marker token whose logits classify a column
    pub fn marker_id(&self) -> u32 {
        self.special.cls
    }
}

impl CellEncoder for TokenizerStore {
    fn encode_text(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow!("Tokenisation error: {e}"))?;
        Ok(encoding.get_ids().to_vec())
    }
}
