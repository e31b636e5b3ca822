//! Summary command - end-of-day production totals.

use std::path::PathBuf;

use clap::Args;

use slipkit_core::catalog::Category;
use slipkit_core::ProductionSummary;

use super::{collect_inputs, extract_files, format_table, load_config, print_failures, write_output, OutputFormat};

/// Arguments for the summary command.
#[derive(Args)]
pub struct SummaryArgs {
    /// Input files or glob pattern (PDF or extracted .txt)
    #[arg(required = true)]
    input: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: SummaryArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let files = collect_inputs(&args.input)?;
    let outcome = extract_files(&files, &config.extraction);
    let summary = ProductionSummary::from_pairs(outcome.line_items());

    let output = match args.format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Csv => format_csv(&summary)?,
        OutputFormat::Table => format_text(&summary),
    };
    write_output(args.output.as_deref(), &output)?;
    print_failures(&outcome);
    Ok(())
}

fn format_csv(summary: &ProductionSummary) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in &summary.colors {
        wtr.serialize(row)?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(summary: &ProductionSummary) -> String {
    let mut headers = vec!["Color"];
    headers.extend(Category::ALL.iter().map(|c| c.as_str()));

    let mut rows: Vec<Vec<String>> = summary
        .colors
        .iter()
        .map(|row| {
            let mut cells = vec![row.color.clone()];
            cells.extend(Category::ALL.iter().map(|&c| row.get(c).to_string()));
            cells
        })
        .collect();
    let mut totals = vec!["Total".to_string()];
    totals.extend(Category::ALL.iter().map(|&c| summary.category_total(c).to_string()));
    rows.push(totals);

    let mut output = format!(
        "Orders: {}\nItems: {}\n\n",
        summary.total_orders, summary.total_quantity
    );
    output.push_str(&format_table(&headers, &rows));

    if !summary.threads.is_empty() {
        let threads: Vec<Vec<String>> = summary
            .threads
            .iter()
            .map(|t| {
                vec![
                    t.color.clone(),
                    t.color_es.clone().unwrap_or_default(),
                    t.items.to_string(),
                ]
            })
            .collect();
        output.push('\n');
        output.push_str(&format_table(&["Thread", "Hilo", "Items"], &threads));
    }

    if !summary.unknown_skus.is_empty() {
        output.push_str(&format!("\nUnknown SKUs: {}\n", summary.unknown_skus.join(", ")));
    }
    output
}
