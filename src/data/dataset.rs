use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One serialized example.
/// Sequence format: [CLS] col1 ... [CLS] colN ... [SEP] (unpadded)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSample {
    pub data:   Vec<u32>,
    pub labels: Vec<u32>,
}

impl TableSample {
    pub fn new(data: Vec<u32>, labels: Vec<u32>) -> Self {
        Self { data, labels }
    }

    pub fn seq_len(&self) -> usize {
        self.data.len()
    }
}

pub struct TableDataset {
    samples: Vec<TableSample>,
}

impl TableDataset {
    pub fn new(samples: Vec<TableSample>) -> Self { Self { samples } }

    /// Total number of labels over all samples
    pub fn label_count(&self) -> usize {
        self.samples.iter().map(|s| s.labels.len()).sum()
    }
}

impl Dataset<TableSample> for TableDataset {
    fn get(&self, index: usize) -> Option<TableSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
