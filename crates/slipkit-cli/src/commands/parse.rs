//! Parse command - tabular view of every extracted line item.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use slipkit_core::{LineItemRow, LineItemTable};

use super::{collect_inputs, extract_files, format_table, load_config, print_failures, write_output, OutputFormat};

/// Columns shown in the plain text table.
const TABLE_COLUMNS: [&str; 7] = ["order_number", "sku", "quantity", "font", "thread_color", "customization", "gift"];

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input files or glob pattern (PDF or extracted .txt)
    #[arg(required = true)]
    input: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Merge identical line items of the same order
    #[arg(long)]
    group: bool,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    config.extraction.group_duplicates |= args.group;

    let files = collect_inputs(&args.input)?;
    debug!("Parsing {} file(s)", files.len());
    let outcome = extract_files(&files, &config.extraction);
    let table = outcome.table();

    let output = match args.format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&table)?),
        OutputFormat::Csv => format_csv(&table)?,
        OutputFormat::Table => format_text(&table),
    };
    write_output(args.output.as_deref(), &output)?;

    eprintln!(
        "{} {} line item(s) from {} slip(s), {} failed",
        style("ℹ").blue(),
        table.len(),
        outcome.slips.len(),
        style(outcome.failures.len()).red()
    );
    print_failures(&outcome);

    if outcome.slips.is_empty() {
        anyhow::bail!("No packing slips could be extracted");
    }
    Ok(())
}

fn format_csv(table: &LineItemTable) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(LineItemRow::COLUMNS)?;
    for row in &table.rows {
        wtr.write_record(row.cells())?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(table: &LineItemTable) -> String {
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let cells = row.cells();
            TABLE_COLUMNS
                .iter()
                .filter_map(|column| LineItemRow::COLUMNS.iter().position(|c| c == column))
                .map(|idx| cells[idx].clone())
                .collect()
        })
        .collect();
    format_table(&TABLE_COLUMNS, &rows)
}
