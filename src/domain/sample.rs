// ============================================================
// Layer 3 — Sample Domain Types
// ============================================================
// A training pair moves through three shapes:
//
//   RawSample        {input, output} strings from the dataset file
//       │
//       ▼
//   TokenizedSample  {input_tokens, output_tokens} after encoding
//       │
//       ▼
//   PaddedItem       {input_ids, attention_mask, labels}
//                    fixed width, produced by SftDataset
//
// RawSample and TokenizedSample are transient: they exist only
// while the loader runs. PaddedItem is rebuilt on every lookup.

use serde::{Deserialize, Serialize};

/// Label value excluded from the training loss.
pub const IGNORE_INDEX: i64 = -100;

/// One training pair as it appears in the dataset file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSample {
    /// What the user said
    pub input: String,
    /// What the model should answer
    pub output: String,
}

impl RawSample {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// A training pair after encoding, before the end-of-sequence id is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedSample {
    pub input_tokens: Vec<u32>,
    pub output_tokens: Vec<u32>,
}

impl TokenizedSample {
    pub fn new(input_tokens: Vec<u32>, output_tokens: Vec<u32>) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}

/// One fixed-width training item.
///
/// `input_ids` and `attention_mask` are `max_input_len` long,
/// `labels` is `max_output_len` long. Padding is always trailing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddedItem {
    pub input_ids: Vec<u32>,
    /// 1 = real token, 0 = padding
    pub attention_mask: Vec<u32>,
    /// Target ids followed by `IGNORE_INDEX` for every pad position
    pub labels: Vec<i64>,
}

#[cfg(test)]
impl PaddedItem {
    /// Number of real (unpadded) input tokens
    pub fn input_len(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m == 1).count()
    }

    /// Number of real (unpadded) label positions
    pub fn label_len(&self) -> usize {
        self.labels.iter().filter(|&&l| l != IGNORE_INDEX).count()
    }
}

/// Ids of the three special tokens the dataset needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTokenIds {
    pub bos: u32,
    pub eos: u32,
    pub pad: u32,
}
