// ============================================================
// Layer 6 — Classification Metrics
// ============================================================
// F1 scores over all classified columns of a test run.
//
// Input is what the evaluator collects: one Vec of predicted
// labels and one Vec of true labels per batch. The batches are
// flattened and a confusion matrix over `num_labels` classes is
// built from them.
//
// Reported names:
//   f1_micro     — F1 from the global TP / FP / FN counts
//   f1_macro     — unweighted mean of per-class F1
//   f1_weighted  — per-class F1 weighted by class support
//
// Macro and weighted averages only include classes that appear
// in the targets or the predictions. A class with no predicted
// or no true instance scores 0 for the undefined ratio.
//
// Reference: scikit-learn f1_score documentation

use anyhow::{bail, Result};
use std::collections::BTreeMap;

pub const F1_MICRO: &str = "f1_micro";
pub const F1_MACRO: &str = "f1_macro";
pub const F1_WEIGHTED: &str = "f1_weighted";

/// Every metric name multiple_f1_score reports
pub const METRIC_NAMES: [&str; 3] = [F1_MICRO, F1_MACRO, F1_WEIGHTED];

/// Square confusion matrix, rows = true class, cols = predicted.
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn new(n_classes: usize) -> Self {
        Self { counts: vec![vec![0; n_classes]; n_classes] }
    }

    pub fn n_classes(&self) -> usize {
        self.counts.len()
    }

    pub fn add(&mut self, truth: usize, predicted: usize) -> Result<()> {
        let n = self.n_classes();
        if truth >= n || predicted >= n {
            bail!(
                "Label out of range: true={}, predicted={}, num_labels={}",
                truth,
                predicted,
                n
            );
        }
        self.counts[truth][predicted] += 1;
        Ok(())
    }

    pub fn true_positives(&self, class: usize) -> usize {
        self.counts[class][class]
    }

    pub fn false_positives(&self, class: usize) -> usize {
        (0..self.n_classes())
            .filter(|&t| t != class)
            .map(|t| self.counts[t][class])
            .sum()
    }

    pub fn false_negatives(&self, class: usize) -> usize {
        (0..self.n_classes())
            .filter(|&p| p != class)
            .map(|p| self.counts[class][p])
            .sum()
    }

    /// Number of true instances of `class`
    pub fn support(&self, class: usize) -> usize {
        self.counts[class].iter().sum()
    }

    fn predicted(&self, class: usize) -> usize {
        (0..self.n_classes()).map(|t| self.counts[t][class]).sum()
    }

    fn f1(tp: usize, fp: usize, fn_: usize) -> f64 {
        let (tp, fp, fn_) = (tp as f64, fp as f64, fn_ as f64);
        let p = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
        let r = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
        if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 }
    }

    pub fn f1_micro(&self) -> f64 {
        let classes = 0..self.n_classes();
        let tp = classes.clone().map(|c| self.true_positives(c)).sum();
        let fp = classes.clone().map(|c| self.false_positives(c)).sum();
        let fn_ = classes.map(|c| self.false_negatives(c)).sum();
        Self::f1(tp, fp, fn_)
    }

    /// Classes with at least one true or predicted instance
    fn present_classes(&self) -> Vec<usize> {
        (0..self.n_classes())
            .filter(|&c| self.support(c) > 0 || self.predicted(c) > 0)
            .collect()
    }

    fn class_f1(&self, class: usize) -> f64 {
        Self::f1(
            self.true_positives(class),
            self.false_positives(class),
            self.false_negatives(class),
        )
    }

    pub fn f1_macro(&self) -> f64 {
        let classes = self.present_classes();
        if classes.is_empty() {
            return 0.0;
        }
        classes.iter().map(|&c| self.class_f1(c)).sum::<f64>() / classes.len() as f64
    }

    pub fn f1_weighted(&self) -> f64 {
        let classes = self.present_classes();
        let total: usize = classes.iter().map(|&c| self.support(c)).sum();
        if total == 0 {
            return 0.0;
        }
        classes
            .iter()
            .map(|&c| self.class_f1(c) * self.support(c) as f64)
            .sum::<f64>()
            / total as f64
    }
}

/// Aggregate F1 scores from per-batch predictions and targets.
pub fn multiple_f1_score(
    predictions: &[Vec<usize>],
    targets:     &[Vec<usize>],
    num_labels:  usize,
) -> Result<BTreeMap<String, f64>> {
    let y_pred: Vec<usize> = predictions.iter().flatten().copied().collect();
    let y_true: Vec<usize> = targets.iter().flatten().copied().collect();

    if y_pred.len() != y_true.len() {
        bail!(
            "Collected {} predictions but {} targets",
            y_pred.len(),
            y_true.len()
        );
    }

    let mut cm = ConfusionMatrix::new(num_labels);
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        cm.add(t, p)?;
    }

    let mut scores = BTreeMap::new();
    scores.insert(F1_MICRO.to_string(), cm.f1_micro());
    scores.insert(F1_MACRO.to_string(), cm.f1_macro());
    scores.insert(F1_WEIGHTED.to_string(), cm.f1_weighted());

    tracing::debug!("F1 over {} labels: {:?}", y_true.len(), scores);
    Ok(scores)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_perfect_predictions() {
        let preds = vec![vec![0, 1], vec![2]];
        let scores = multiple_f1_score(&preds, &preds, 3).unwrap();
        for name in METRIC_NAMES {
            assert!(close(scores[name], 1.0), "{name}");
        }
    }

    #[test]
    fn test_micro_equals_accuracy_for_single_label_columns() {
        // 3 of 4 correct
        let preds = vec![vec![0, 1], vec![1, 2]];
        let truth = vec![vec![0, 1], vec![2, 2]];
        let scores = multiple_f1_score(&preds, &truth, 3).unwrap();
        assert!(close(scores[F1_MICRO], 0.75));
    }

    #[test]
    fn test_macro_and_weighted() {
        // class 0: tp=1 fp=0 fn=0 → f1 1
        // class 1: tp=1 fp=1 fn=0 → p .5 r 1 → f1 2/3
        // class 2: tp=1 fp=0 fn=1 → p 1 r .5 → f1 2/3
        let preds = vec![vec![0, 1, 1, 2]];
        let truth = vec![vec![0, 1, 2, 2]];
        let scores = multiple_f1_score(&preds, &truth, 5).unwrap();

        // classes 3 and 4 never appear and are left out
        assert!(close(scores[F1_MACRO], (1.0 + 2.0 / 3.0 + 2.0 / 3.0) / 3.0));
        // supports 1, 1, 2
        assert!(close(
            scores[F1_WEIGHTED],
            (1.0 + 2.0 / 3.0 + 2.0 * 2.0 / 3.0) / 4.0
        ));
    }

    #[test]
    fn test_predicted_only_class_counts_for_macro() {
        // class 1 is predicted but never true: f1 0
        let scores = multiple_f1_score(&[vec![1]], &[vec![0]], 2).unwrap();
        assert!(close(scores[F1_MACRO], 0.0));
        assert!(close(scores[F1_WEIGHTED], 0.0));
    }

    #[test]
    fn test_out_of_range_label_is_an_error() {
        assert!(multiple_f1_score(&[vec![4]], &[vec![0]], 3).is_err());
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        assert!(multiple_f1_score(&[vec![0, 1]], &[vec![0]], 3).is_err());
    }

    #[test]
    fn test_empty_input_scores_zero() {
        let scores = multiple_f1_score(&[], &[], 3).unwrap();
        assert!(close(scores[F1_MICRO], 0.0));
        assert!(close(scores[F1_MACRO], 0.0));
    }
}
