// ============================================================
// Layer 4 — SFT Batcher
// ============================================================
// Implements burn's Batcher trait to stack PaddedItems into
// Int tensors for the training loop.
//
//   Input:  N PaddedItems, each max_input_len / max_output_len wide
//   Output: SftBatch with
//             input_ids       [N, max_input_len]
//             attention_mask  [N, max_input_len]
//             labels          [N, max_output_len]
//
// No padding happens here: SftDataset already pads every item
// to the dataset-wide maxima, so rows are flattened and reshaped.

use burn::{data::dataloader::batcher::Batcher, prelude::*, tensor::TensorData};

use crate::domain::sample::PaddedItem;

#[derive(Debug, Clone)]
pub struct SftBatch<B: Backend> {
    pub input_ids: Tensor<B, 2, Int>,
    /// 1 = real token, 0 = padding
    pub attention_mask: Tensor<B, 2, Int>,
    /// Target ids, -100 where the loss must ignore the position
    pub labels: Tensor<B, 2, Int>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SftBatcher;

impl SftBatcher {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Batcher<B, PaddedItem, SftBatch<B>> for SftBatcher {
    fn batch(&self, items: Vec<PaddedItem>, device: &B::Device) -> SftBatch<B> {
        let batch_size = items.len();
        let input_len = items.first().map_or(0, |i| i.input_ids.len());
        let label_len = items.first().map_or(0, |i| i.labels.len());

        let input_flat = flatten(&items, input_len, "input_ids", |i| {
            i.input_ids.iter().map(|&x| x as i64).collect()
        });
        let mask_flat = flatten(&items, input_len, "attention_mask", |i| {
            i.attention_mask.iter().map(|&x| x as i64).collect()
        });
        let label_flat = flatten(&items, label_len, "labels", |i| i.labels.clone());

        SftBatch {
            input_ids: int_tensor(input_flat, [batch_size, input_len], device),
            attention_mask: int_tensor(mask_flat, [batch_size, input_len], device),
            labels: int_tensor(label_flat, [batch_size, label_len], device),
        }
    }
}

/// Concatenate one field of every item, checking that all rows share a width.
fn flatten(
    items: &[PaddedItem],
    width: usize,
    field: &str,
    row: impl Fn(&PaddedItem) -> Vec<i64>,
) -> Vec<i64> {
    let mut flat = Vec::with_capacity(items.len() * width);
    for (i, item) in items.iter().enumerate() {
        let values = row(item);
        assert_eq!(
            values.len(),
            width,
            "{field} of item {i} has width {}, expected {width}; items must come from one SftDataset",
            values.len()
        );
        flat.extend(values);
    }
    flat
}

fn int_tensor<B: Backend>(flat: Vec<i64>, shape: [usize; 2], device: &B::Device) -> Tensor<B, 2, Int> {
    Tensor::from_data(TensorData::new(flat, shape), device)
}
