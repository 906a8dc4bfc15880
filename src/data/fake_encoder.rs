// Deterministic TokenEncoder for unit tests.
//
// Text is split into `<marker>` pieces and whitespace-separated
// words; every piece is looked up in a fixed table. Unknown
// pieces are an encoding error.

use std::collections::HashMap;

use crate::domain::error::{SftError, SftResult};
use crate::domain::traits::TokenEncoder;

pub const PAD: u32 = 0;
pub const BOS: u32 = 1;
pub const EOS: u32 = 2;
pub const CONTEXT: u32 = 3;
pub const EXTRA: u32 = 4;

#[derive(Debug, Clone)]
pub struct FakeEncoder {
    pieces: HashMap<String, Vec<u32>>,
}

impl FakeEncoder {
    pub fn new() -> Self {
        let mut pieces = HashMap::new();
        pieces.insert("<pad>".to_string(), vec![PAD]);
        pieces.insert("<s>".to_string(), vec![BOS]);
        pieces.insert("</s>".to_string(), vec![EOS]);
        pieces.insert("<SC6>".to_string(), vec![CONTEXT]);
        pieces.insert("<extra_id_0>".to_string(), vec![EXTRA]);
        Self { pieces }
            .with("hi", &[5])
            .with("hello", &[6, 7])
            .with("there", &[9])
            .with("x", &[10])
    }

    pub fn with(mut self, piece: &str, ids: &[u32]) -> Self {
        self.pieces.insert(piece.to_string(), ids.to_vec());
        self
    }

    pub fn without(mut self, piece: &str) -> Self {
        self.pieces.remove(piece);
        self
    }

    fn lookup(&self, piece: &str, out: &mut Vec<u32>) -> SftResult<()> {
        let ids = self
            .pieces
            .get(piece)
            .ok_or_else(|| SftError::Tokenizer(format!("unknown piece '{piece}'")))?;
        out.extend_from_slice(ids);
        Ok(())
    }
}

impl TokenEncoder for FakeEncoder {
    fn encode(&self, text: &str, truncation: bool, max_length: Option<usize>)
        -> SftResult<Vec<u32>> {
        let mut ids = Vec::new();
        let mut rest = text;

        while !rest.is_empty() {
            match rest.find('<') {
                Some(start) => {
                    for word in rest[..start].split_whitespace() {
                        self.lookup(word, &mut ids)?;
                    }
                    let end = rest[start..]
                        .find('>')
                        .map(|e| start + e + 1)
                        .ok_or_else(|| SftError::Tokenizer("unclosed marker".to_string()))?;
                    self.lookup(&rest[start..end], &mut ids)?;
                    rest = &rest[end..];
                }
                None => {
                    for word in rest.split_whitespace() {
                        self.lookup(word, &mut ids)?;
                    }
                    rest = "";
                }
            }
        }

        if let (true, Some(max)) = (truncation, max_length) {
            ids.truncate(max);
        }
        Ok(ids)
    }
}
