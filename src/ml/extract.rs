// ============================================================
// Layer 5 — Marker Token Logits
// ============================================================
// Picks the class vector of every marker token out of the full
// [batch, seq, num_labels] logits tensor.
//
// Rows come out in row-major order of the token matrix:
// example 0 first (left to right), then example 1, ...
// This is the same order the batcher concatenates labels in,
// so row i lines up with label i.
//
// An example with no marker contributes no row; an example
// with several markers contributes one row per marker.

use burn::{prelude::*, tensor::TensorData};

/// (example index, position index) of every `marker` in a
/// row-major [_, seq_len] token buffer.
pub fn marker_positions(tokens: &[i64], seq_len: usize, marker: i64) -> Vec<(usize, usize)> {
    if seq_len == 0 {
        return Vec::new();
    }
    tokens
        .iter()
        .enumerate()
        .filter(|(_, &t)| t == marker)
        .map(|(i, _)| (i / seq_len, i % seq_len))
        .collect()
}

/// tokens: [batch, seq], logits: [batch, seq, num_labels]
/// → [matches, num_labels]
pub fn get_token_logits<B: Backend>(
    tokens:   Tensor<B, 2, Int>,
    logits:   Tensor<B, 3>,
    token_id: u32,
) -> Tensor<B, 2> {
    let [batch_size, seq_len, num_labels] = logits.dims();
    let device = logits.device();

    let ids: Vec<i64> = tokens.into_data().iter::<i64>().collect();
    let positions = marker_positions(&ids, seq_len, token_id as i64);

    if positions.is_empty() {
        return Tensor::zeros([0, num_labels], &device);
    }

    // Flat row index into the [batch * seq, num_labels] view
    let rows: Vec<i64> = positions
        .iter()
        .map(|&(j, k)| (j * seq_len + k) as i64)
        .collect();
    let n_rows = rows.len();
    let index = Tensor::<B, 1, Int>::from_data(TensorData::new(rows, [n_rows]), &device);

    logits
        .reshape([batch_size * seq_len, num_labels])
        .select(0, index)
}
