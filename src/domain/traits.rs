// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The loader and the dataset never see a concrete tokenizer.
// They are handed something that implements TokenEncoder:
//
//   - HfEncoder    → wraps a HuggingFace tokenizer.json (infra)
//   - FakeEncoder  → deterministic vocabulary used in tests
//
// Passing the encoder in as a parameter replaces any kind of
// process-wide tokenizer singleton.

use crate::domain::error::SftResult;

/// The tokenizer capability needed to build training data.
pub trait TokenEncoder {
    /// Encode `text` into token ids without adding the model's own
    /// special tokens. When `truncation` is set and `max_length` is
    /// given, the result holds at most `max_length` ids (trailing ids
    /// are dropped).
    fn encode(&self, text: &str, truncation: bool, max_length: Option<usize>)
        -> SftResult<Vec<u32>>;

    /// Every id a special-token string maps to.
    ///
    /// A well-configured tokenizer returns exactly one id. The default
    /// implementation simply encodes the token text.
    fn token_ids(&self, token: &str) -> SftResult<Vec<u32>> {
        self.encode(token, false, None)
    }
}

impl<T: TokenEncoder + ?Sized> TokenEncoder for &T {
    fn encode(&self, text: &str, truncation: bool, max_length: Option<usize>)
        -> SftResult<Vec<u32>> {
        (**self).encode(text, truncation, max_length)
    }

    fn token_ids(&self, token: &str) -> SftResult<Vec<u32>> {
        (**self).token_ids(token)
    }
}
