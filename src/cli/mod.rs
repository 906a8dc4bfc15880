// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and delegates to Layer 2.
// The only layer that prints to stdout.

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{CleanArgs, Commands, PrepareArgs, PromptArgs, TokensArgs};

use crate::application::prepare_use_case::{special_token_report, PrepareUseCase};
use crate::chat::prompt::PromptTemplate;
use crate::infra::tokenizer_store::TokenizerStore;

#[derive(Parser, Debug)]
#[command(
    name = "petal-sft",
    version,
    about = "Prepare padded fine-tuning data for the Petal chat model."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route the subcommand; nothing is computed here.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => run_prepare(args),
            Commands::Tokens(args) => run_tokens(args),
            Commands::Prompt(args) => run_prompt(args),
            Commands::Clean(args) => run_clean(args),
        }
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    tracing::info!("Preparing dataset: {}", args.dataset);

    let summary = PrepareUseCase::new(args.into()).execute()?;

    println!(
        "Kept {} of {} samples ({} skipped): {} train, {} validation",
        summary.kept_records,
        summary.total_records,
        summary.skipped_records,
        summary.train_items,
        summary.val_items,
    );
    if let Some(shape) = summary.preview {
        println!(
            "Preview batch: input_ids {:?}, attention_mask {:?}, labels {:?}",
            shape.input_ids, shape.attention_mask, shape.labels
        );
    }
    println!("Output written to {}", summary.output_dir.display());
    Ok(())
}

fn run_tokens(args: TokensArgs) -> Result<()> {
    let encoder = TokenizerStore::new(&args.tokenizer).load()?;
    for (token, ids) in special_token_report(&encoder) {
        let status = if ids.len() == 1 { "ok" } else { "NOT USABLE" };
        println!("token \"{token}\" ids={ids:?} {status}");
    }
    Ok(())
}

fn run_prompt(args: PromptArgs) -> Result<()> {
    let prompt = PromptTemplate::default()
        .build(&args.user, &args.message)
        .context("Cannot build prompt")?;
    println!("{prompt}");
    Ok(())
}

fn run_clean(args: CleanArgs) -> Result<()> {
    println!("{}", PromptTemplate::default().clean_reply(&args.text));
    Ok(())
}
