// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that touch the filesystem:
//
//   tokenizer_store.rs — loads tokenizer.json and adapts it to
//                        the TokenEncoder trait from Layer 3
//
//   export.rs          — writes padded items as JSON Lines and
//                        a manifest describing the run
//
// Nothing in the data layer reads or writes files except the
// loader's single read of the dataset.

/// Tokenizer loading and the HuggingFace TokenEncoder adapter
pub mod tokenizer_store;

/// JSONL and manifest output
pub mod export;
