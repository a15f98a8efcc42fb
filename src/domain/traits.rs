// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer only talks to these traits, so the
// table format on disk can change without touching it.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::table::Table;

// ─── TableSource ──────────────────────────────────────────────────────────────
/// Any component that can load annotated tables.
///
/// Implementations:
///   - JsonTableLoader → loads a directory of .json tables
pub trait TableSource {
    /// Load every table available from this source, in a
    /// stable order.
    fn load_all(&self) -> Result<Vec<Table>>;
}
