// ============================================================
// Layer 6 — Export
// ============================================================
// Writes prepared data to disk for an external training loop.
//
// Files written per run:
//   out/
//     train.jsonl     ← one padded item per line
//     val.jsonl       ← only when a validation split exists
//     manifest.json   ← config, special ids, split sizes, skip counts
//
// Example train.jsonl line:
//   {"input_ids":[4,6,5,0],"attention_mask":[1,1,1,0],"labels":[5,7,2,-100]}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::application::prepare_use_case::PrepareConfig;
use crate::domain::error::SkippedRecord;
use crate::domain::sample::{PaddedItem, SpecialTokenIds};

/// Size and width of one exported split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitStats {
    pub file: String,
    pub items: usize,
    pub max_input_len: usize,
    pub max_output_len: usize,
}

/// Everything needed to reproduce or audit a prepare run.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub config: PrepareConfig,
    pub special_ids: SpecialTokenIds,
    pub total_records: usize,
    pub kept_records: usize,
    pub skipped: Vec<SkippedRecord>,
    pub train: SplitStats,
    pub val: Option<SplitStats>,
}

/// Write items as JSON Lines. Returns the number of lines written.
pub fn write_jsonl(path: &Path, items: impl IntoIterator<Item = PaddedItem>) -> Result<usize> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path).with_context(|| format!("Cannot create '{}'", path.display()))?;
    let mut out = BufWriter::new(file);
    let mut count = 0;

    for item in items {
        serde_json::to_writer(&mut out, &item)?;
        out.write_all(b"\n")?;
        count += 1;
    }
    out.flush()?;

    tracing::debug!("Wrote {} items to '{}'", count, path.display());
    Ok(count)
}

/// Save the manifest as pretty JSON in `dir`.
pub fn save_manifest(dir: &Path, manifest: &Manifest) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join("manifest.json");

    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&path, json).with_context(|| format!("Cannot write '{}'", path.display()))?;

    tracing::info!("Manifest saved to '{}'", path.display());
    Ok(path)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::IGNORE_INDEX;

    #[test]
    fn test_jsonl_has_one_line_per_item() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("train.jsonl");
        let items = vec![
            PaddedItem { input_ids: vec![5, 0], attention_mask: vec![1, 0], labels: vec![6, 2] },
            PaddedItem { input_ids: vec![5, 9], attention_mask: vec![1, 1], labels: vec![2, IGNORE_INDEX] },
        ];

        assert_eq!(write_jsonl(&path, items.clone()).unwrap(), 2);

        let text = fs::read_to_string(&path).unwrap();
        let parsed: Vec<PaddedItem> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(parsed, items);
        assert!(text.contains("-100"));
    }

    #[test]
    fn test_manifest_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest {
            config: PrepareConfig::default(),
            special_ids: SpecialTokenIds { bos: 1, eos: 2, pad: 0 },
            total_records: 3,
            kept_records: 2,
            skipped: Vec::new(),
            train: SplitStats {
                file: "train.jsonl".to_string(),
                items: 2,
                max_input_len: 4,
                max_output_len: 5,
            },
            val: None,
        };

        let path = save_manifest(dir.path(), &manifest).unwrap();
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["kept_records"], 2);
        assert_eq!(value["special_ids"]["eos"], 2);
        assert!(value["val"].is_null());
    }
}
