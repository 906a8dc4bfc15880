// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to prepare a fine-tuning run.
//
// Rules for this layer:
//   - No padding or encoding logic here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination and logging

// Dataset file → padded JSONL splits + manifest
pub mod prepare_use_case;
