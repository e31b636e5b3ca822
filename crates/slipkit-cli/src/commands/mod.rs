//! Subcommands and the helpers they share.

pub mod config;
pub mod gift_cards;
pub mod labels;
pub mod parse;
pub mod summary;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use slipkit_core::models::config::{ExtractionConfig, SlipConfig};
use slipkit_core::{extract_batch, extract_text_batch, BatchOutcome, ParseError, PdfError, SlipDocument};

/// Output format for tabular commands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain text
    Table,
    /// CSV with a header row
    Csv,
    /// Pretty-printed JSON
    Json,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slipkit")
        .join("config.json")
}

/// Load the config given with `-c`, else the user config, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<SlipConfig> {
    if let Some(path) = config_path {
        return SlipConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using config at {}", path.display());
        return SlipConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }
    Ok(SlipConfig::default())
}

/// Expand a glob to packing slip files: PDFs, or `.txt` dumps of their text.
pub fn collect_inputs(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob(pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| matches!(extension(p).as_str(), "pdf" | "txt"))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", pattern);
    }
    Ok(files)
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Extract every file. Unreadable files are reported as failures next to
/// the slips that did extract.
pub fn extract_files(files: &[PathBuf], config: &ExtractionConfig) -> BatchOutcome {
    let pb = ProgressBar::new(files.len() as u64);
    if let Ok(bar_style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(bar_style.progress_chars("=>-"));
    }

    let mut outcome = BatchOutcome::default();
    for path in files {
        let id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        pb.set_message(id.clone());

        match fs::read(path) {
            Ok(data) if extension(path) == "txt" => {
                let text = String::from_utf8_lossy(&data);
                outcome.merge(extract_text_batch([(id.as_str(), &*text)], config));
            }
            Ok(data) => {
                outcome.merge(extract_batch(&[SlipDocument::new(id, data)], config));
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                outcome.failures.push(ParseError::Unreadable {
                    document: id,
                    source: PdfError::Parse(e.to_string()),
                });
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    for warning in &outcome.warnings {
        warn!("{}", warning);
    }
    outcome
}

/// List failed documents on stderr.
pub fn print_failures(outcome: &BatchOutcome) {
    if outcome.failures.is_empty() {
        return;
    }
    eprintln!();
    eprintln!("{}", style("Failed documents:").red());
    for failure in &outcome.failures {
        eprintln!("  - {}", failure);
    }
}

/// Write to `output`, or print to stdout.
pub fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("{} Output written to {}", style("✓").green(), path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Left-aligned plain text table.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut output = line(headers.to_vec());
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    output.push_str(&line(rule.iter().map(String::as_str).collect()));
    for row in rows {
        output.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    output
}
