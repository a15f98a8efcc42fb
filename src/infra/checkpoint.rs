// ============================================================
// Layer 6 — Checkpoint Loader
// ============================================================
// Restores fine-tuned classifier weights into a freshly built
// BertClassifier.
//
// The format is picked by file extension:
//
//   *.pt / *.pth  — PyTorch checkpoint. The parameters live
//                   under the "model_state_dict" key and use
//                   HuggingFace BERT names; KEY_REMAP rewrites
//                   them onto this crate's module names:
//
//     bert.encoder.layer.3.attention.self.query.weight
//       → bert.encoder.layers.3.attention.query.weight
//     bert.encoder.layer.3.output.LayerNorm.weight
//       → bert.encoder.layers.3.output_norm.weight
//
//                   A "module." prefix (weights saved from a
//                   data-parallel wrapper) is dropped. The
//                   PyTorch adapter transposes Linear weights and
//                   renames LayerNorm weight/bias to gamma/beta.
//                   Unused entries (pooler, position_ids) are
//                   ignored.
//
//   *.mpk         — Burn record from CompactRecorder
//   *.mpk.gz      — Burn record from NamedMpkGzFileRecorder
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            burn-import PyTorch recorder documentation

use anyhow::{bail, Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};
use burn_import::pytorch::{LoadArgs, PyTorchFileRecorder};
use std::path::{Path, PathBuf};

use crate::ml::model::{BertClassifier, BertClassifierRecord};

/// Top-level key of the PyTorch checkpoint dictionary
pub const STATE_DICT_KEY: &str = "model_state_dict";

/// Regex rewrites applied in order to every PyTorch key
pub const KEY_REMAP: [(&str, &str); 9] = [
    (r"^module\.", ""),
    (r"^bert\.encoder\.layer\.([0-9]+)\.", "bert.encoder.layers.$1."),
    (r"\.attention\.self\.(query|key|value)\.", ".attention.$1."),
    (r"\.attention\.output\.dense\.", ".attention.output."),
    (r"\.attention\.output\.LayerNorm\.", ".attention_norm."),
    (r"\.intermediate\.dense\.", ".intermediate."),
    (r"(layers\.[0-9]+)\.output\.dense\.", "$1.output."),
    (r"(layers\.[0-9]+)\.output\.LayerNorm\.", "$1.output_norm."),
    (r"\.LayerNorm\.", ".layer_norm."),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointFormat {
    PyTorch,
    /// `.mpk`, half precision
    Mpk,
    /// `.mpk.gz`, full precision
    MpkGz,
}

impl CheckpointFormat {
    pub fn detect(path: &Path) -> Result<Self> {
        let name = path.to_string_lossy();
        if name.ends_with(".mpk.gz") {
            return Ok(Self::MpkGz);
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("pt") | Some("pth") => Ok(Self::PyTorch),
            Some("mpk") => Ok(Self::Mpk),
            _ => bail!(
                "Unsupported checkpoint '{}', expected .pt, .pth, .mpk or .mpk.gz",
                path.display()
            ),
        }
    }
}

pub struct CheckpointLoader {
    path: PathBuf,
}

impl CheckpointLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the checkpoint and return `model` with its weights.
    pub fn load<B: Backend>(
        &self,
        model:  BertClassifier<B>,
        device: &B::Device,
    ) -> Result<BertClassifier<B>> {
        let format = CheckpointFormat::detect(&self.path)?;
        if !self.path.is_file() {
            bail!("Checkpoint '{}' does not exist", self.path.display());
        }
        tracing::info!("Loading {:?} checkpoint '{}'", format, self.path.display());

        let record = match format {
            CheckpointFormat::PyTorch => self.load_pytorch::<B>(device)?,
            CheckpointFormat::Mpk => CompactRecorder::new()
                .load(self.path.clone(), device)
                .with_context(|| format!("Cannot load checkpoint '{}'", self.path.display()))?,
            CheckpointFormat::MpkGz => NamedMpkGzFileRecorder::<FullPrecisionSettings>::new()
                // the recorder sets "mpk.gz" itself: x.mpk.gz → x.mpk → x.mpk.gz
                .load(self.path.with_extension(""), device)
                .with_context(|| format!("Cannot load checkpoint '{}'", self.path.display()))?,
        };

        Ok(model.load_record(record))
    }

    fn load_pytorch<B: Backend>(&self, device: &B::Device) -> Result<BertClassifierRecord<B>> {
        let mut args = LoadArgs::new(self.path.clone()).with_top_level_key(STATE_DICT_KEY);
        for (pattern, replacement) in KEY_REMAP.iter() {
            args = args.with_key_remap(pattern, replacement);
        }

        PyTorchFileRecorder::<FullPrecisionSettings>::default()
            .load(args, device)
            .with_context(|| {
                format!("Cannot load PyTorch checkpoint '{}'", self.path.display())
            })
    }
}
