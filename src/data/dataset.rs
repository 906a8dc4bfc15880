// ============================================================
// Layer 4 — SFT Padding Dataset
// ============================================================
// Holds (input_ids, output_ids + [eos]) pairs and pads them on
// lookup to the widest entry seen at construction:
//
//   input_ids       [5, 9, PAD, PAD]        ← max_input_len
//   attention_mask  [1, 1, 0,   0  ]
//   labels          [6, 2, -100       ]     ← max_output_len
//
// Labels are padded with IGNORE_INDEX, never with the pad id,
// so padded positions never contribute to the loss.
//
// Both maxima are fixed once construction finishes. Lookups
// never mutate anything, so the dataset can be shared freely
// between DataLoader workers.

use burn::data::dataset::Dataset;

use crate::domain::error::{SftError, SftResult};
use crate::domain::sample::{PaddedItem, SpecialTokenIds, TokenizedSample, IGNORE_INDEX};
use crate::domain::traits::TokenEncoder;

/// Text of the special tokens resolved through the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialTokens {
    pub bos: String,
    pub eos: String,
    pub pad: String,
}

impl Default for SpecialTokens {
    fn default() -> Self {
        Self {
            bos: "<s>".to_string(),
            eos: "</s>".to_string(),
            pad: "<pad>".to_string(),
        }
    }
}

impl SpecialTokens {
    /// Resolve every token to its single id, failing on the first
    /// token that is unknown or ambiguous.
    pub fn resolve(&self, encoder: &impl TokenEncoder) -> SftResult<SpecialTokenIds> {
        Ok(SpecialTokenIds {
            bos: resolve_one(encoder, &self.bos)?,
            eos: resolve_one(encoder, &self.eos)?,
            pad: resolve_one(encoder, &self.pad)?,
        })
    }
}

fn resolve_one(encoder: &impl TokenEncoder, token: &str) -> SftResult<u32> {
    // a token the tokenizer cannot encode counts as undefined
    let ids = encoder.token_ids(token).unwrap_or_default();
    match ids.as_slice() {
        [id] => Ok(*id),
        _ => Err(SftError::TokenizerConfiguration {
            token: token.to_string(),
            ids,
        }),
    }
}

#[derive(Debug, Clone)]
pub struct SftDataset {
    entries: Vec<(Vec<u32>, Vec<u32>)>,
    special: SpecialTokenIds,
    max_input_len: usize,
    max_output_len: usize,
}

impl SftDataset {
    /// Build the dataset, resolving the default special tokens through `encoder`.
    pub fn new(samples: Vec<TokenizedSample>, encoder: &impl TokenEncoder) -> SftResult<Self> {
        let special = SpecialTokens::default().resolve(encoder)?;
        Ok(Self::with_special_ids(samples, special))
    }

    /// Build the dataset from ids that were already resolved.
    pub fn with_special_ids(samples: Vec<TokenizedSample>, special: SpecialTokenIds) -> Self {
        let mut entries = Vec::with_capacity(samples.len());
        let mut max_input_len = 0;
        let mut max_output_len = 0;

        for sample in samples {
            let input_ids = sample.input_tokens;
            let mut output_ids = sample.output_tokens;
            output_ids.push(special.eos);

            max_input_len = max_input_len.max(input_ids.len());
            max_output_len = max_output_len.max(output_ids.len());
            entries.push((input_ids, output_ids));
        }

        tracing::debug!(
            "Built dataset: {} entries, max_input_len={}, max_output_len={}",
            entries.len(),
            max_input_len,
            max_output_len
        );

        Self {
            entries,
            special,
            max_input_len,
            max_output_len,
        }
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_input_len(&self) -> usize {
        self.max_input_len
    }

    pub fn max_output_len(&self) -> usize {
        self.max_output_len
    }

    pub fn special_ids(&self) -> SpecialTokenIds {
        self.special
    }

    /// The stored (unpadded) entry; `output_ids` already ends with eos.
    #[cfg(test)]
    pub fn entry(&self, index: usize) -> Option<(&[u32], &[u32])> {
        self.entries
            .get(index)
            .map(|(input, output)| (input.as_slice(), output.as_slice()))
    }

    /// Build the padded item at `index`.
    pub fn try_get(&self, index: usize) -> SftResult<PaddedItem> {
        let (input, output) = self.entries.get(index).ok_or(SftError::IndexOutOfRange {
            index,
            size: self.entries.len(),
        })?;

        let input_pad = self.max_input_len - input.len();
        let mut input_ids = Vec::with_capacity(self.max_input_len);
        input_ids.extend_from_slice(input);
        input_ids.resize(self.max_input_len, self.special.pad);

        let mut attention_mask = vec![1u32; input.len()];
        attention_mask.resize(input.len() + input_pad, 0);

        let mut labels: Vec<i64> = Vec::with_capacity(self.max_output_len);
        labels.extend(output.iter().map(|&id| id as i64));
        labels.resize(self.max_output_len, IGNORE_INDEX);

        Ok(PaddedItem {
            input_ids,
            attention_mask,
            labels,
        })
    }

    /// Every padded item, in order.
    pub fn items(&self) -> impl Iterator<Item = PaddedItem> + '_ {
        (0..self.size()).filter_map(move |i| self.try_get(i).ok())
    }
}

impl Dataset<PaddedItem> for SftDataset {
    fn get(&self, index: usize) -> Option<PaddedItem> {
        self.try_get(index).ok()
    }

    fn len(&self) -> usize {
        self.size()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fake_encoder::{FakeEncoder, BOS, EOS, PAD};

    const IDS: SpecialTokenIds = SpecialTokenIds { bos: BOS, eos: EOS, pad: PAD };

    fn sample(input: &[u32], output: &[u32]) -> TokenizedSample {
        TokenizedSample::new(input.to_vec(), output.to_vec())
    }

    #[test]
    fn test_single_entry_without_padding() {
        let ds = SftDataset::new(vec![sample(&[5], &[6, 7])], &FakeEncoder::new()).unwrap();

        assert_eq!(ds.entry(0), Some((&[5u32][..], &[6u32, 7, 2][..])));
        assert_eq!(ds.max_input_len(), 1);
        assert_eq!(ds.max_output_len(), 3);
        assert_eq!(
            ds.try_get(0).unwrap(),
            PaddedItem {
                input_ids: vec![5],
                attention_mask: vec![1],
                labels: vec![6, 7, 2],
            }
        );
    }

    #[test]
    fn test_shorter_entry_is_right_padded() {
        // stored entries: ([5],[6,7,2]) and ([5,9],[6,2])
        let ds = SftDataset::with_special_ids(
            vec![sample(&[5], &[6, 7]), sample(&[5, 9], &[6])],
            IDS,
        );

        assert_eq!(ds.max_input_len(), 2);
        assert_eq!(ds.max_output_len(), 3);
        assert_eq!(
            ds.try_get(1).unwrap(),
            PaddedItem {
                input_ids: vec![5, 9],
                attention_mask: vec![1, 1],
                labels: vec![6, 2, IGNORE_INDEX],
            }
        );
        assert_eq!(
            ds.try_get(0).unwrap(),
            PaddedItem {
                input_ids: vec![5, PAD],
                attention_mask: vec![1, 0],
                labels: vec![6, 7, 2],
            }
        );
    }

    #[test]
    fn test_labels_use_ignore_index_not_pad_id() {
        let ids = SpecialTokenIds { bos: 1, eos: 2, pad: 77 };
        let ds = SftDataset::with_special_ids(
            vec![sample(&[5], &[6]), sample(&[5, 5, 5], &[6, 6, 6, 6])],
            ids,
        );

        let item = ds.try_get(0).unwrap();
        assert_eq!(item.input_ids, vec![5, 77, 77]);
        assert_eq!(item.labels, vec![6, 2, -100, -100, -100]);
        assert!(!item.labels.contains(&77));
    }

    #[test]
    fn test_mask_and_labels_have_fixed_width() {
        let samples = vec![
            sample(&[5], &[6]),
            sample(&[5, 9, 9, 9], &[6, 7]),
            sample(&[5, 9], &[6, 7, 7, 7, 7]),
        ];
        let ds = SftDataset::with_special_ids(samples.clone(), IDS);

        for (i, s) in samples.iter().enumerate() {
            let item = ds.try_get(i).unwrap();
            let out_len = s.output_tokens.len() + 1;

            assert_eq!(item.input_ids.len(), ds.max_input_len());
            assert_eq!(item.attention_mask.len(), ds.max_input_len());
            assert_eq!(item.labels.len(), ds.max_output_len());

            for (pos, &m) in item.attention_mask.iter().enumerate() {
                assert_eq!(m == 1, pos < s.input_tokens.len());
            }
            for (pos, &l) in item.labels.iter().enumerate() {
                assert_eq!(l == IGNORE_INDEX, pos >= out_len);
            }
            // eos appended exactly once, right after the real output
            assert_eq!(item.labels[out_len - 1], EOS as i64);
        }
    }

    #[test]
    fn test_get_is_idempotent() {
        let ds = SftDataset::with_special_ids(vec![sample(&[5], &[6]), sample(&[5, 9], &[6])], IDS);
        assert_eq!(ds.try_get(0).unwrap(), ds.try_get(0).unwrap());
        assert_eq!(Dataset::get(&ds, 1), Dataset::get(&ds, 1));
    }

    #[test]
    fn test_out_of_range_index() {
        let ds = SftDataset::with_special_ids(vec![sample(&[5], &[6])], IDS);

        let err = ds.try_get(1).unwrap_err();
        assert!(matches!(err, SftError::IndexOutOfRange { index: 1, size: 1 }));
        assert!(Dataset::get(&ds, 1).is_none());
    }

    #[test]
    fn test_empty_dataset_is_valid() {
        let ds = SftDataset::new(Vec::new(), &FakeEncoder::new()).unwrap();
        assert_eq!(ds.size(), 0);
        assert_eq!(Dataset::len(&ds), 0);
        assert_eq!(ds.max_input_len(), 0);
        assert_eq!(ds.max_output_len(), 0);
        assert_eq!(ds.items().count(), 0);
    }

    #[test]
    fn test_unknown_special_token_fails_fast() {
        let enc = FakeEncoder::new().without("<pad>");
        let err = SftDataset::new(vec![sample(&[5], &[6])], &enc).unwrap_err();
        match err {
            SftError::TokenizerConfiguration { token, ids } => {
                assert_eq!(token, "<pad>");
                assert!(ids.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ambiguous_special_token_fails_fast() {
        let enc = FakeEncoder::new().with("</s>", &[2, 2]);
        let err = SftDataset::new(vec![sample(&[5], &[6])], &enc).unwrap_err();
        match err {
            SftError::TokenizerConfiguration { token, ids } => {
                assert_eq!(token, "</s>");
                assert_eq!(ids, vec![2, 2]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_special_token_encoding_fails_fast() {
        let enc = FakeEncoder::new().with("<s>", &[]);
        let err = SpecialTokens::default().resolve(&enc).unwrap_err();
        assert!(matches!(err, SftError::TokenizerConfiguration { .. }));
    }

    #[test]
    fn test_dataset_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SftDataset>();
    }
}
