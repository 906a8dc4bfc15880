// ============================================================
// Layer 4 — Sample Loader
// ============================================================
// Reads {input, output} pairs from a JSON array and encodes them.
//
// For each record:
//   input  text = <SC6> + input + <extra_id_0>
//   output text = <extra_id_0> + output
//
//   input  is encoded with truncation (max 1024 ids)
//   output is encoded without truncation
//
// The pair is kept only if BOTH sides are shorter than 768 ids.
//
// A bad record never aborts the pass. It is logged, recorded in
// the LoadReport and skipped. Only a file that is not a JSON
// array at all is fatal.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::{SftError, SftResult, SkipReason, SkippedRecord};
use crate::domain::sample::{RawSample, TokenizedSample};
use crate::domain::traits::TokenEncoder;

/// Prompt markers and length limits applied while loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Opens every model input
    pub context_marker: String,
    /// Closes the input and opens the output
    pub extra_id_marker: String,
    /// Truncation cap applied when encoding the input
    pub encode_max_length: usize,
    /// Inputs must be strictly shorter than this
    pub max_input_tokens: usize,
    /// Outputs must be strictly shorter than this
    pub max_output_tokens: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            context_marker: "<SC6>".to_string(),
            extra_id_marker: "<extra_id_0>".to_string(),
            encode_max_length: 1024,
            max_input_tokens: 768,
            max_output_tokens: 768,
        }
    }
}

/// Outcome of one loading pass.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Kept samples, in source order
    pub samples: Vec<TokenizedSample>,
    /// Number of array elements seen
    pub total: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl LoadReport {
    pub fn kept(&self) -> usize {
        self.samples.len()
    }
}

/// Turns a dataset file into tokenized samples using an injected encoder.
pub struct SampleLoader<E> {
    encoder: E,
    config: LoaderConfig,
}

impl<E: TokenEncoder> SampleLoader<E> {
    pub fn new(encoder: E, config: LoaderConfig) -> Self {
        Self { encoder, config }
    }

    /// Read and load a dataset file.
    pub fn load_path(&self, path: impl AsRef<Path>) -> SftResult<LoadReport> {
        let path = path.as_ref();
        tracing::info!("Loading dataset '{}'", path.display());

        let text = fs::read_to_string(path).map_err(|source| SftError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.load_str_from(&text, &path.display().to_string())
    }

    /// Load a dataset held in memory.
    #[cfg(test)]
    pub fn load_str(&self, json: &str) -> SftResult<LoadReport> {
        self.load_str_from(json, "<memory>")
    }

    fn load_str_from(&self, json: &str, origin: &str) -> SftResult<LoadReport> {
        let value: Value = serde_json::from_str(json).map_err(|e| SftError::DatasetFormat {
            path: origin.to_string(),
            reason: e.to_string(),
        })?;

        match value {
            Value::Array(records) => Ok(self.load_records(records)),
            other => Err(SftError::DatasetFormat {
                path: origin.to_string(),
                reason: format!("top-level value is {}, expected an array", kind_of(&other)),
            }),
        }
    }

    /// Encode every record, skipping the ones that fail.
    pub fn load_records(&self, records: Vec<Value>) -> LoadReport {
        let mut report = LoadReport {
            total: records.len(),
            ..LoadReport::default()
        };

        for (index, record) in records.into_iter().enumerate() {
            match self.load_record(record) {
                Ok(sample) => report.samples.push(sample),
                Err(reason) => {
                    match &reason {
                        SkipReason::TooLong { .. } => {
                            tracing::debug!("Skipping record {}: {}", index, reason)
                        }
                        _ => tracing::warn!("Skipping record {}: {}", index, reason),
                    }
                    report.skipped.push(SkippedRecord { index, reason });
                }
            }
        }

        tracing::info!(
            "Kept {} of {} samples ({} skipped)",
            report.kept(),
            report.total,
            report.skipped.len()
        );
        report
    }

    fn load_record(&self, record: Value) -> Result<TokenizedSample, SkipReason> {
        let raw = parse_record(record)?;
        self.encode_sample(&raw)
    }

    /// Encode one raw pair and apply the length filter.
    pub fn encode_sample(&self, raw: &RawSample) -> Result<TokenizedSample, SkipReason> {
        let cfg = &self.config;

        let seed = format!("{}{}{}", cfg.context_marker, raw.input, cfg.extra_id_marker);
        let reply = format!("{}{}", cfg.extra_id_marker, raw.output);

        let input_tokens = self
            .encoder
            .encode(&seed, true, Some(cfg.encode_max_length))
            .map_err(encoding_failure)?;
        let output_tokens = self
            .encoder
            .encode(&reply, false, None)
            .map_err(encoding_failure)?;

        if input_tokens.len() >= cfg.max_input_tokens || output_tokens.len() >= cfg.max_output_tokens {
            return Err(SkipReason::TooLong {
                input_len: input_tokens.len(),
                output_len: output_tokens.len(),
            });
        }

        Ok(TokenizedSample::new(input_tokens, output_tokens))
    }
}

/// Pull the two string fields out of one array element.
fn parse_record(record: Value) -> Result<RawSample, SkipReason> {
    let Value::Object(mut fields) = record else {
        return Err(SkipReason::NotAnObject);
    };

    let mut take = |field: &str| match fields.remove(field) {
        Some(Value::String(s)) => Ok(s),
        _ => Err(SkipReason::MissingField {
            field: field.to_string(),
        }),
    };

    let input = take("input")?;
    let output = take("output")?;
    Ok(RawSample::new(input, output))
}

fn encoding_failure(e: SftError) -> SkipReason {
    SkipReason::Encoding {
        message: e.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
