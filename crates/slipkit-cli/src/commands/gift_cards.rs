//! Gift cards command - one portrait card per gift message.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use slipkit_core::render_gift_cards;

use super::labels::{print_rejected, renderable};
use super::{collect_inputs, extract_files, load_config, print_failures};

/// Arguments for the gift-cards command.
#[derive(Args)]
pub struct GiftCardsArgs {
    /// Input files or glob pattern (PDF or extracted .txt)
    #[arg(required = true)]
    input: String,

    /// Output PDF
    #[arg(short, long, default_value = "gifts.pdf")]
    output: PathBuf,
}

pub fn run(args: GiftCardsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let files = collect_inputs(&args.input)?;
    let outcome = extract_files(&files, &config.extraction);

    let (pairs, rejected) = renderable(outcome.line_items(), &config.labels);
    print_failures(&outcome);
    print_rejected(&rejected);

    match render_gift_cards(pairs.iter().copied())? {
        Some(bytes) => {
            fs::write(&args.output, &bytes)?;
            println!(
                "{} Wrote gift cards to {}",
                style("✓").green(),
                args.output.display()
            );
        }
        None => {
            println!("{} No gift messages found, nothing written", style("ℹ").blue());
        }
    }
    Ok(())
}
