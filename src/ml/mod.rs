// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Tensor code lives here.
//
//   model.rs      — BERT encoder with a per-token classification
//                   head, plus the TokenClassifier trait the
//                   evaluator is written against
//
//   extract.rs    — picks the logits of every marker ([CLS])
//                   token out of the model output
//
//   evaluator.rs  — the gradient-free loop: forward pass,
//                   cross-entropy, predictions for the metrics
//
//   device.rs     — accelerator negotiation and backend choice
//
// Reference: Burn Book §3 (Building Blocks)
//            Devlin et al. (2019) BERT

/// BERT token classifier
pub mod model;

/// Marker token logit extraction
pub mod extract;

/// Evaluation loop
pub mod evaluator;

/// Device negotiation
pub mod device;
