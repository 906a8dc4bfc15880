// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads a HuggingFace tokenizer.json and adapts it to the
// TokenEncoder capability used by the data layer.
//
// Two details matter for fine-tuning data:
//   - encode() never adds the model's own special tokens; the
//     prompt markers are written into the text explicitly
//   - truncation is applied per call, so the same tokenizer can
//     encode a capped input and an uncapped output; any truncation
//     or padding stored in tokenizer.json is switched off on load

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

use crate::domain::error::{SftError, SftResult};
use crate::domain::traits::TokenEncoder;

pub struct TokenizerStore {
    path: PathBuf,
}

impl TokenizerStore {
    /// Point the store at a tokenizer.json file, or at a directory holding one.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let path = if path.is_dir() {
            path.join("tokenizer.json")
        } else {
            path.to_path_buf()
        };
        Self { path }
    }

    /// Load the tokenizer from disk
    pub fn load(&self) -> Result<HfEncoder> {
        let tokenizer = Tokenizer::from_file(&self.path).map_err(|e| {
            anyhow::anyhow!("Cannot load tokenizer from '{}': {}", self.path.display(), e)
        })?;

        let encoder = HfEncoder::new(tokenizer)?;
        tracing::info!(
            "Loaded tokenizer '{}' (vocab size {})",
            self.path.display(),
            encoder.vocab_size()
        );
        Ok(encoder)
    }
}

/// A HuggingFace tokenizer behind the TokenEncoder trait.
pub struct HfEncoder {
    inner: Tokenizer,
}

impl HfEncoder {
    /// Wrap `inner`, dropping its own truncation and padding so the
    /// returned ids are exactly the encoded text.
    pub fn new(mut inner: Tokenizer) -> SftResult<Self> {
        inner
            .with_truncation(None)
            .map_err(|e| SftError::Tokenizer(e.to_string()))?;
        inner.with_padding(None);
        Ok(Self { inner })
    }

    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }
}

impl TokenEncoder for HfEncoder {
    fn encode(&self, text: &str, truncation: bool, max_length: Option<usize>)
        -> SftResult<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| SftError::Tokenizer(e.to_string()))?;

        let mut ids = encoding.get_ids().to_vec();
        if let (true, Some(max)) = (truncation, max_length) {
            ids.truncate(max);
        }
        Ok(ids)
    }

    /// Registered tokens resolve through the vocabulary; anything else
    /// is encoded so a multi-id split shows up to the caller.
    fn token_ids(&self, token: &str) -> SftResult<Vec<u32>> {
        match self.inner.token_to_id(token) {
            Some(id) => Ok(vec![id]),
            None => self.encode(token, false, None),
        }
    }
}
