// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Fatal errors propagate as SftError. Per-record problems during
// loading are NOT errors: they become SkippedRecord values that
// the loader logs, counts and moves past.

use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum SftError {
    /// The dataset file is not JSON, or its top level is not an array
    #[error("malformed dataset '{path}': {reason}")]
    DatasetFormat { path: String, reason: String },

    /// A special token does not map to exactly one id
    #[error("special token '{token}' must resolve to exactly one id, got {ids:?}")]
    TokenizerConfiguration { token: String, ids: Vec<u32> },

    #[error("index {index} out of range for dataset of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// The tokenizer failed to encode a piece of text
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why one dataset record was left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The array element is not a JSON object
    NotAnObject,
    /// `input` or `output` is absent or not a string
    MissingField { field: String },
    /// The tokenizer rejected the text
    Encoding { message: String },
    /// One side reached the length cutoff after encoding
    TooLong { input_len: usize, output_len: usize },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotAnObject => write!(f, "record is not an object"),
            SkipReason::MissingField { field } => {
                write!(f, "field '{field}' is missing or not a string")
            }
            SkipReason::Encoding { message } => write!(f, "encoding failed: {message}"),
            SkipReason::TooLong {
                input_len,
                output_len,
            } => write!(
                f,
                "too long (input {input_len} tokens, output {output_len} tokens)"
            ),
        }
    }
}

/// A record the loader skipped, with its position in the source array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: SkipReason,
}

pub type SftResult<T> = std::result::Result<T, SftError>;
