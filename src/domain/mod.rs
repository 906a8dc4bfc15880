// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define the core
// concepts of the fine-tuning data pipeline.
//
// Rules for this layer:
//   - NO burn types here
//   - NO file I/O
//   - NO concrete tokenizer (only the capability trait)
//
// The data layer and the infra layer depend on this one,
// never the other way around.

/// Raw and tokenized training pairs
pub mod sample;

/// The tokenizer capability the loader and dataset are built against
pub mod traits;

/// Error taxonomy shared by every layer below the CLI
pub mod error;
