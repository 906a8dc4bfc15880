// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the dataset file to tensor batches.
//
//   dialogs.json
//       │
//       ▼
//   SampleLoader     → parses records, encodes, filters by length
//       │
//       ▼
//   split_train_val  → optional seeded holdout
//       │
//       ▼
//   SftDataset       → appends eos, pads on lookup (burn Dataset)
//       │
//       ▼
//   SftBatcher       → stacks padded items into Int tensors
//
// Each module is responsible for exactly one step.

/// Reads and encodes {input, output} records
pub mod loader;

/// Padding dataset over tokenized samples
pub mod dataset;

/// Implements burn's Batcher trait for padded items
pub mod batcher;

/// Shuffles and splits samples into train/validation sets
pub mod splitter;

#[cfg(test)]
pub(crate) mod fake_encoder;
