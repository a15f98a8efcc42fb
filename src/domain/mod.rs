// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing the tables the
// evaluator works on.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO tokenisation or tensor code
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A table with annotated columns
pub mod table;

// Core abstractions (traits) that other layers implement
pub mod traits;
