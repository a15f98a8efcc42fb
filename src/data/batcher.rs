// ============================================================
// Layer 4 — Table Batcher
// ============================================================
// Implements Burn's Batcher trait to collate a Vec<TableSample>
// into one batch.
//
// Samples have different lengths, so every sequence is padded
// on the right with PAD_TOKEN_ID up to the longest sequence of
// this batch (not a global maximum):
//
//   [101, 5, 6]            → [101, 5, 6,   0, 0]
//   [101, 7, 101, 8, 9]    → [101, 7, 101, 8, 9]
//
// Samples can carry a different number of labels (one per
// column), so labels are concatenated, never stacked:
//
//   [1] ++ [0, 2]          → [1, 0, 2]
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::dataset::TableSample;

/// Token id used for padding; attention ignores these positions
pub const PAD_TOKEN_ID: u32 = 0;

/// A collated batch. Both tensors live on the batcher's device.
#[derive(Debug, Clone)]
pub struct TableBatch<B: Backend> {
    /// Token ids — shape: [batch_size, longest_seq_len]
    pub data: Tensor<B, 2, Int>,

    /// Concatenated labels — shape: [total labels in batch]
    pub labels: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct TableBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TableBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<TableSample, TableBatch<B>> for TableBatcher<B> {
    fn batch(&self, items: Vec<TableSample>) -> TableBatch<B> {
        let batch_size = items.len();
        let max_len = items.iter().map(TableSample::seq_len).max().unwrap_or(0);

        // Row-major [batch_size, max_len], right padded
        let mut data_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
        for item in &items {
            data_flat.extend(item.data.iter().map(|&t| t as i64));
            data_flat.extend(
                std::iter::repeat(PAD_TOKEN_ID as i64).take(max_len - item.seq_len()),
            );
        }

        let labels_flat: Vec<i64> = items
            .iter()
            .flat_map(|item| item.labels.iter().map(|&l| l as i64))
            .collect();
        let n_labels = labels_flat.len();

        let data = Tensor::<B, 2, Int>::from_data(
            TensorData::new(data_flat, [batch_size, max_len]),
            &self.device,
        );
        let labels = Tensor::<B, 1, Int>::from_data(
            TensorData::new(labels_flat, [n_labels]),
            &self.device,
        );

        TableBatch { data, labels }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn two_samples() -> Vec<TableSample> {
        vec![
            TableSample::new(vec![101, 5, 6], vec![1]),
            TableSample::new(vec![101, 7, 101, 8, 9], vec![0, 2]),
        ]
    }

    #[test]
    fn test_first_dimension_is_number_of_examples() {
        let batcher = TableBatcher::<TestBackend>::new(Default::default());
        for n in 1..=4 {
            let items: Vec<TableSample> = (0..n)
                .map(|i| TableSample::new(vec![101; i + 1], vec![0]))
                .collect();
            let batch = batcher.batch(items);
            assert_eq!(batch.data.dims(), [n, n]);
        }
    }

    #[test]
    fn test_pads_right_to_longest_sequence() {
        let batcher = TableBatcher::<TestBackend>::new(Default::default());
        let batch = batcher.batch(two_samples());

        assert_eq!(batch.data.dims(), [2, 5]);
        let data: Vec<i64> = batch.data.into_data().iter::<i64>().collect();
        assert_eq!(data, vec![101, 5, 6, 0, 0, 101, 7, 101, 8, 9]);
    }

    #[test]
    fn test_labels_are_concatenated() {
        let batcher = TableBatcher::<TestBackend>::new(Default::default());
        let batch = batcher.batch(two_samples());

        assert_eq!(batch.labels.dims(), [3]);
        let labels: Vec<i64> = batch.labels.into_data().iter::<i64>().collect();
        assert_eq!(labels, vec![1, 0, 2]);
    }
}
