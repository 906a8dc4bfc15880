// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Four subcommands:
//   prepare — dataset file → padded JSONL splits + manifest
//   tokens  — show how the tokenizer resolves <s>, </s>, <pad>
//   prompt  — print the chat prompt for one message
//   clean   — print a decoded model output with artefacts removed

use clap::{Args, Subcommand};

use crate::application::prepare_use_case::PrepareConfig;
use crate::data::loader::LoaderConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tokenize and pad a JSON dialog dataset for fine-tuning
    Prepare(PrepareArgs),

    /// Show the ids the tokenizer assigns to the special tokens
    Tokens(TokensArgs),

    /// Build the generation prompt for a user message
    Prompt(PromptArgs),

    /// Clean a decoded model reply
    Clean(CleanArgs),
}

/// All arguments for the `prepare` command.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// JSON array of {"input": ..., "output": ...} records
    #[arg(long)]
    pub dataset: String,

    /// tokenizer.json, or a directory containing one
    #[arg(long)]
    pub tokenizer: String,

    /// Where train.jsonl, val.jsonl and manifest.json are written
    #[arg(long, default_value = "out")]
    pub output_dir: String,

    /// Share of kept samples held out for validation
    #[arg(long, default_value_t = 0.0, value_parser = parse_fraction)]
    pub val_fraction: f64,

    /// Seed for the train/validation shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Items stacked into a preview tensor batch (0 = skip)
    #[arg(long, default_value_t = 4)]
    pub preview_batch: usize,

    /// Truncation cap when encoding inputs
    #[arg(long, default_value_t = 1024)]
    pub encode_max_length: usize,

    /// Inputs must be shorter than this many tokens
    #[arg(long, default_value_t = 768)]
    pub max_input_tokens: usize,

    /// Outputs must be shorter than this many tokens
    #[arg(long, default_value_t = 768)]
    pub max_output_tokens: usize,
}

/// A finite number in [0, 1].
fn parse_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{s} is not a fraction between 0 and 1"))
    }
}

/// The application layer never sees clap types.
impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            dataset_path: a.dataset,
            tokenizer_path: a.tokenizer,
            output_dir: a.output_dir,
            val_fraction: a.val_fraction,
            seed: a.seed,
            preview_batch: a.preview_batch,
            loader: LoaderConfig {
                encode_max_length: a.encode_max_length,
                max_input_tokens: a.max_input_tokens,
                max_output_tokens: a.max_output_tokens,
                ..LoaderConfig::default()
            },
        }
    }
}

#[derive(Args, Debug)]
pub struct TokensArgs {
    /// tokenizer.json, or a directory containing one
    #[arg(long)]
    pub tokenizer: String,
}

#[derive(Args, Debug)]
pub struct PromptArgs {
    /// Name of the person talking to the bot
    #[arg(long)]
    pub user: String,

    #[arg(long)]
    pub message: String,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Decoded model output
    #[arg(long)]
    pub text: String,
}
