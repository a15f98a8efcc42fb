// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: no tensor math, no printing,
// no file formats. Every step is delegated to the data, ml
// and infra layers.

// The evaluation workflow
pub mod test_use_case;
