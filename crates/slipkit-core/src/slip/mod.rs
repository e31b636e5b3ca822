//! Packing slip field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, SlipParser};

use tracing::debug;

use crate::error::ParseError;
use crate::models::slip::SlipDocument;
use rules::{ORDER_NUMBER_ANCHOR, ORDER_NUMBER_VALUE, SHIP_TO_ANCHOR, SKU_ANCHOR};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// How far above an order anchor a block may start to keep its ship-to.
const SHIP_TO_LOOKBACK: usize = 6;

/// Trait for packing slip extractors.
pub trait SlipExtractor {
    /// Extract every slip printed in a PDF document.
    fn extract(&self, document: &SlipDocument) -> Vec<Result<ExtractionResult>>;

    /// Extract every slip printed in already extracted text.
    fn extract_from_text(&self, document_id: &str, text: &str) -> Vec<Result<ExtractionResult>>;
}

/// Normalize extracted text into trimmed, non-empty, single-spaced lines.
pub fn normalize(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .replace(['\r', '\x0C'], "\n")
        .lines()
        .map(|line| {
            line.split(|c: char| c.is_whitespace() || c == '\u{00A0}')
                .filter(|w| !w.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Split a bulk print into one block of lines per order.
///
/// A block starts where a different order number appears. The boundary is
/// moved up to the "Ship To:" anchor printed just above it, as long as that
/// does not cut into the previous order's items.
pub fn split_orders(lines: Vec<String>) -> Vec<Vec<String>> {
    let mut boundaries = vec![0usize];
    let mut current: Option<String> = None;
    let mut last_sku: Option<usize> = None;

    for (idx, line) in lines.iter().enumerate() {
        if SKU_ANCHOR.is_match(line) {
            last_sku = Some(idx);
        }

        let Some(number) = order_number_on(line) else {
            continue;
        };
        if current.as_deref().is_none_or(|seen| seen == number) {
            current = Some(number);
            continue;
        }

        let floor = match last_sku {
            Some(sku) => sku + 1,
            None => boundaries.last().copied().unwrap_or(0) + 1,
        };
        let lookback = idx.saturating_sub(SHIP_TO_LOOKBACK).max(floor);
        let start = (lookback..idx)
            .rev()
            .find(|&i| SHIP_TO_ANCHOR.is_match(&lines[i]))
            .unwrap_or(idx);
        boundaries.push(start);
        last_sku = None;
        current = Some(number);
    }

    debug!("split text into {} order block(s)", boundaries.len());

    let mut blocks = Vec::with_capacity(boundaries.len());
    let mut lines = lines;
    for &start in boundaries.iter().skip(1).rev() {
        blocks.push(lines.split_off(start));
    }
    blocks.push(lines);
    blocks.reverse();
    blocks
}

/// Identifier of block `n` (1-based) out of `total` cut from `document_id`.
pub fn block_id(document_id: &str, n: usize, total: usize) -> String {
    if total > 1 {
        format!("{}#{}", document_id, n)
    } else {
        document_id.to_string()
    }
}

fn order_number_on(line: &str) -> Option<String> {
    let anchor = ORDER_NUMBER_ANCHOR.find(line)?;
    ORDER_NUMBER_VALUE
        .captures(&line[anchor.end()..])
        .map(|caps| caps[1].to_string())
}
