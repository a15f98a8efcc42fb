// ============================================================
// Layer 5 — Evaluation Loop
// ============================================================
// Runs a trained classifier over every test batch.
//
// The backend passed in must NOT be an autodiff backend: on a
// plain backend dropout is a no-op and no graph is recorded,
// which is evaluation mode with gradients disabled.
//
// Per batch:
//   1. attention mask = token id != PAD_TOKEN_ID
//   2. forward pass            → [batch, seq, num_labels]
//   3. marker logits           → [n_markers, num_labels]
//   4. cross-entropy vs labels → running loss
//   5. argmax predictions and targets kept for the F1 metrics
//
// The reported loss is the summed batch loss divided by the
// configured batch size (not by the number of batches).
//
// Reference: Burn Book §5 (Training / validation step)

use anyhow::{bail, Result};
use burn::{nn::loss::CrossEntropyLossConfig, prelude::*, tensor::ElementConversion};
use std::collections::BTreeMap;

use crate::data::batcher::{TableBatch, PAD_TOKEN_ID};
use crate::infra::metrics::multiple_f1_score;
use crate::ml::extract::get_token_logits;
use crate::ml::model::TokenClassifier;

/// Final numbers of a test run.
#[derive(Debug, Clone)]
pub struct EvalReport {
    /// Summed batch loss / configured batch size
    pub loss: f64,

    /// Metric name → score
    pub metrics: BTreeMap<String, f64>,

    /// Number of batches seen
    pub batches: usize,
}

/// Per-batch outputs collected before the metrics are computed.
#[derive(Debug, Default)]
pub struct Accumulator {
    pub running_loss: f64,
    pub predictions:  Vec<Vec<usize>>,
    pub targets:      Vec<Vec<usize>>,
}

pub struct Evaluator {
    marker_id:  u32,
    batch_size: usize,
    num_labels: usize,
}

impl Evaluator {
    pub fn new(marker_id: u32, batch_size: usize, num_labels: usize) -> Self {
        Self { marker_id, batch_size, num_labels }
    }

    /// Run `model` over all `batches` and compute loss and metrics.
    pub fn evaluate<B, M, I>(&self, model: &M, batches: I) -> Result<EvalReport>
    where
        B: Backend,
        M: TokenClassifier<B>,
        I: IntoIterator<Item = TableBatch<B>>,
    {
        let mut acc = Accumulator::default();
        let mut n_batches = 0usize;

        for batch in batches {
            self.step(model, batch, &mut acc)?;
            n_batches += 1;

            if n_batches % 50 == 0 {
                tracing::info!("Evaluated {} batches", n_batches);
            }
        }

        let loss = acc.running_loss / self.batch_size as f64;
        let metrics = multiple_f1_score(&acc.predictions, &acc.targets, self.num_labels)?;

        tracing::info!("Evaluation done: {} batches, loss={:.4}", n_batches, loss);
        Ok(EvalReport { loss, metrics, batches: n_batches })
    }

    fn step<B, M>(&self, model: &M, batch: TableBatch<B>, acc: &mut Accumulator) -> Result<()>
    where
        B: Backend,
        M: TokenClassifier<B>,
    {
        let TableBatch { data, labels } = batch;

        let attention_mask = data.clone().equal_elem(PAD_TOKEN_ID as i64).bool_not();
        let logits = model.forward(data.clone(), attention_mask);
        let marker_logits = get_token_logits(data, logits, self.marker_id);

        // Zero or repeated markers in an example shift rows against labels
        let [n_rows, _] = marker_logits.dims();
        let [n_labels] = labels.dims();
        if n_rows != n_labels {
            bail!(
                "Found {} marker tokens but {} labels in batch",
                n_rows,
                n_labels
            );
        }

        let ce = CrossEntropyLossConfig::new().init(&marker_logits.device());
        let loss = ce.forward(marker_logits.clone(), labels.clone());
        acc.running_loss += loss.into_scalar().elem::<f64>();

        let predicted: Vec<usize> = marker_logits
            .argmax(1)
            .flatten::<1>(0, 1)
            .into_data()
            .iter::<i64>()
            .map(|p| p as usize)
            .collect();
        let truth: Vec<usize> = labels
            .into_data()
            .iter::<i64>()
            .map(|t| t as usize)
            .collect();

        acc.predictions.push(predicted);
        acc.targets.push(truth);
        Ok(())
    }
}
