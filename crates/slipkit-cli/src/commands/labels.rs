//! Labels command - render one 4x6 label page per line item.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, warn};

use slipkit_core::models::config::LabelConfig;
use slipkit_core::{check_record, render_labels, LineItem, OrderRecord, RenderError};

use super::{collect_inputs, extract_files, load_config, print_failures};

/// Arguments for the labels command.
#[derive(Args)]
pub struct LabelsArgs {
    /// Input files or glob pattern (PDF or extracted .txt)
    #[arg(required = true)]
    input: String,

    /// Output PDF
    #[arg(short, long, default_value = "labels.pdf")]
    output: PathBuf,

    /// Merge identical line items of the same order
    #[arg(long)]
    group: bool,
}

pub fn run(args: LabelsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;
    config.extraction.group_duplicates |= args.group;

    let files = collect_inputs(&args.input)?;
    let outcome = extract_files(&files, &config.extraction);

    let (pairs, rejected) = renderable(outcome.line_items(), &config.labels);

    print_failures(&outcome);
    print_rejected(&rejected);

    if pairs.is_empty() {
        anyhow::bail!("Nothing to render: no line items were extracted");
    }

    let bytes = render_labels(pairs.iter().copied(), &config.labels)?;
    fs::write(&args.output, &bytes)?;
    debug!("Rendered in {:?}", start.elapsed());

    println!(
        "{} Wrote {} label(s) to {}",
        style("✓").green(),
        pairs.len(),
        args.output.display()
    );
    println!(
        "   {} slip(s) extracted, {} document(s) failed, {} item(s) skipped",
        style(outcome.slips.len()).green(),
        style(outcome.failures.len()).red(),
        style(rejected.len()).yellow()
    );
    Ok(())
}

/// Split pairs into those the label fonts can render and the errors of
/// those they cannot.
pub fn renderable<'a>(
    pairs: Vec<(&'a OrderRecord, &'a LineItem)>,
    config: &LabelConfig,
) -> (Vec<(&'a OrderRecord, &'a LineItem)>, Vec<RenderError>) {
    let mut kept = Vec::with_capacity(pairs.len());
    let mut rejected = Vec::new();
    for (order, item) in pairs {
        match check_record(order, item, config) {
            Ok(()) => kept.push((order, item)),
            Err(e) => {
                warn!("Skipping label: {}", e);
                rejected.push(e);
            }
        }
    }
    (kept, rejected)
}

pub fn print_rejected(rejected: &[RenderError]) {
    if rejected.is_empty() {
        return;
    }
    eprintln!();
    eprintln!("{}", style("Skipped line items:").yellow());
    for error in rejected {
        eprintln!("  - {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderable_drops_unencodable_records() {
        let order = OrderRecord::new("112-3456789-0123456", "a.pdf");
        let good = LineItem::new("TWL-RED-12", 1);
        let mut bad = LineItem::new("HT-2Pcs-White", 1);
        bad.gift = true;
        bad.gift_message = Some("Congrats 🎉".to_string());

        let (kept, rejected) = renderable(vec![(&order, &good), (&order, &bad)], &LabelConfig::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].1.sku, "TWL-RED-12");
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].record(), Some(("112-3456789-0123456", "HT-2Pcs-White")));
    }
}
