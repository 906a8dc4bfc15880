// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Runs the data preparation pipeline in order:
//
//   Step 1: Load tokenizer, log special ids       (Layer 6)
//   Step 2: Load and encode samples               (Layer 4)
//   Step 3: Split train/validation                (Layer 4)
//   Step 4: Build padding datasets                (Layer 4)
//   Step 5: Stack a preview batch                 (Layer 4)
//   Step 6: Export JSONL splits and manifest      (Layer 6)

use anyhow::{Context, Result};
use burn::{backend::ndarray::NdArrayDevice, data::dataloader::batcher::Batcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::data::{
    batcher::{SftBatch, SftBatcher},
    dataset::{SftDataset, SpecialTokens},
    loader::{LoaderConfig, SampleLoader},
    splitter::split_train_val,
};
use crate::domain::sample::PaddedItem;
use crate::domain::traits::TokenEncoder;
use crate::infra::{
    export::{save_manifest, write_jsonl, Manifest, SplitStats},
    tokenizer_store::TokenizerStore,
};

type PreviewBackend = burn::backend::NdArray;

// ─── Prepare Configuration ───────────────────────────────────────────────────
// Saved verbatim in manifest.json so a run can be reproduced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepareConfig {
    pub dataset_path: String,
    pub tokenizer_path: String,
    pub output_dir: String,
    /// Share of kept samples held out for validation, in [0, 1]
    pub val_fraction: f64,
    pub seed: u64,
    /// Items stacked through the batcher as a sanity check; 0 disables
    pub preview_batch: usize,
    pub loader: LoaderConfig,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            dataset_path: "data/dialogs.json".to_string(),
            tokenizer_path: "tokenizer.json".to_string(),
            output_dir: "out".to_string(),
            val_fraction: 0.0,
            seed: 42,
            preview_batch: 4,
            loader: LoaderConfig::default(),
        }
    }
}

/// Shapes of the preview batch tensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchShape {
    pub input_ids: [usize; 2],
    pub attention_mask: [usize; 2],
    pub labels: [usize; 2],
}

/// What a prepare run produced.
#[derive(Debug, Clone)]
pub struct PrepareSummary {
    pub total_records: usize,
    pub kept_records: usize,
    pub skipped_records: usize,
    pub train_items: usize,
    pub val_items: usize,
    pub output_dir: PathBuf,
    pub preview: Option<BatchShape>,
}

pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<PrepareSummary> {
        let cfg = &self.config;
        anyhow::ensure!(
            cfg.val_fraction.is_finite() && (0.0..=1.0).contains(&cfg.val_fraction),
            "val_fraction must be between 0 and 1, got {}",
            cfg.val_fraction
        );
        let output_dir = PathBuf::from(&cfg.output_dir);

        // ── Step 1: Tokenizer ────────────────────────────────────────────────
        let encoder = TokenizerStore::new(&cfg.tokenizer_path).load()?;
        for (token, ids) in special_token_report(&encoder) {
            tracing::info!("token \"{}\" ids={:?}", token, ids);
        }

        // ── Step 2: Load samples ─────────────────────────────────────────────
        let loader = SampleLoader::new(&encoder, cfg.loader.clone());
        let report = loader
            .load_path(&cfg.dataset_path)
            .with_context(|| format!("Cannot load dataset '{}'", cfg.dataset_path))?;
        let total_records = report.total;
        let kept_records = report.kept();
        tracing::info!("Train samples: {}", kept_records);

        // ── Step 3: Train / validation split ─────────────────────────────────
        let (train_samples, val_samples) =
            split_train_val(report.samples, 1.0 - cfg.val_fraction, cfg.seed);

        // ── Step 4: Padding datasets ─────────────────────────────────────────
        // special ids are resolved once, for the training split
        let train = SftDataset::new(train_samples, &encoder)
            .context("Tokenizer cannot be used for fine-tuning")?;
        let special_ids = train.special_ids();
        let val = (!val_samples.is_empty())
            .then(|| SftDataset::with_special_ids(val_samples, special_ids));

        // ── Step 5: Preview batch ────────────────────────────────────────────
        let preview = preview_batch(&train, cfg.preview_batch);

        // ── Step 6: Export ───────────────────────────────────────────────────
        let train_stats = export_split(&output_dir, "train.jsonl", &train)?;
        let val_stats = val
            .as_ref()
            .map(|ds| export_split(&output_dir, "val.jsonl", ds))
            .transpose()?;

        save_manifest(
            &output_dir,
            &Manifest {
                config: cfg.clone(),
                special_ids,
                total_records,
                kept_records,
                skipped: report.skipped.clone(),
                train: train_stats,
                val: val_stats,
            },
        )?;

        Ok(PrepareSummary {
            total_records,
            kept_records,
            skipped_records: report.skipped.len(),
            train_items: train.size(),
            val_items: val.as_ref().map_or(0, SftDataset::size),
            output_dir,
            preview,
        })
    }
}

/// Every default special token with the ids the tokenizer gives it.
pub fn special_token_report(encoder: &impl TokenEncoder) -> Vec<(String, Vec<u32>)> {
    let tokens = SpecialTokens::default();
    [tokens.bos, tokens.eos, tokens.pad]
        .into_iter()
        .map(|token| {
            let ids = encoder.token_ids(&token).unwrap_or_default();
            (token, ids)
        })
        .collect()
}

fn export_split(dir: &Path, file: &str, dataset: &SftDataset) -> Result<SplitStats> {
    let items = write_jsonl(&dir.join(file), dataset.items())?;
    tracing::info!(
        "Exported {} items to {} (max_input_len={}, max_output_len={})",
        items,
        file,
        dataset.max_input_len(),
        dataset.max_output_len()
    );

    Ok(SplitStats {
        file: file.to_string(),
        items,
        max_input_len: dataset.max_input_len(),
        max_output_len: dataset.max_output_len(),
    })
}

/// Stack the first `size` items into tensors to check they batch cleanly.
fn preview_batch(dataset: &SftDataset, size: usize) -> Option<BatchShape> {
    if size == 0 || dataset.is_empty() {
        return None;
    }

    let items: Vec<PaddedItem> = dataset.items().take(size).collect();
    let batch: SftBatch<PreviewBackend> = SftBatcher::new().batch(items, &NdArrayDevice::Cpu);

    let shape = BatchShape {
        input_ids: batch.input_ids.dims(),
        attention_mask: batch.attention_mask.dims(),
        labels: batch.labels.dims(),
    };
    tracing::info!(
        "Preview batch: input_ids {:?}, labels {:?}",
        shape.input_ids,
        shape.labels
    );
    Some(shape)
}
