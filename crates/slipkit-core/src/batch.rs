//! Batch extraction with per-document isolation.

use tracing::{info, warn};

use crate::error::ParseError;
use crate::models::config::ExtractionConfig;
use crate::models::slip::{LineItem, OrderRecord, PackingSlip, SlipDocument};
use crate::slip::{ExtractionResult, SlipExtractor, SlipParser};
use crate::table::LineItemTable;

/// Slips that extracted and documents that failed, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub slips: Vec<PackingSlip>,
    pub failures: Vec<ParseError>,
    /// Non-fatal problems, prefixed with the document id.
    pub warnings: Vec<String>,
}

impl BatchOutcome {
    /// `(order, item)` pairs across all slips, in slip then line order.
    pub fn line_items(&self) -> Vec<(&OrderRecord, &LineItem)> {
        self.slips.iter().flat_map(|s| s.pairs()).collect()
    }

    pub fn item_count(&self) -> usize {
        self.slips.iter().map(|s| s.items.len()).sum()
    }

    /// Tabular view of every line item.
    pub fn table(&self) -> LineItemTable {
        LineItemTable::from_pairs(self.line_items())
    }

    /// Append another outcome, keeping input order.
    pub fn merge(&mut self, other: BatchOutcome) {
        self.slips.extend(other.slips);
        self.failures.extend(other.failures);
        self.warnings.extend(other.warnings);
    }

    fn push(&mut self, result: Result<ExtractionResult, ParseError>) {
        match result {
            Ok(extracted) => {
                let id = extracted.slip.order.source.clone();
                self.warnings
                    .extend(extracted.warnings.into_iter().map(|w| format!("{}: {}", id, w)));
                self.slips.push(extracted.slip);
            }
            Err(e) => {
                warn!("{}", e);
                self.failures.push(e);
            }
        }
    }

    fn finish(mut self, config: &ExtractionConfig) -> Self {
        if config.group_duplicates {
            for slip in &mut self.slips {
                slip.items = group_line_items(std::mem::take(&mut slip.items));
            }
        }
        info!(
            "Extracted {} slip(s) with {} item(s), {} failure(s)",
            self.slips.len(),
            self.item_count(),
            self.failures.len()
        );
        self
    }
}

/// Extract every document. A failing document never affects the others.
pub fn extract_batch(documents: &[SlipDocument], config: &ExtractionConfig) -> BatchOutcome {
    let parser = SlipParser::from_config(config);
    let mut outcome = BatchOutcome::default();
    for document in documents {
        for result in parser.extract(document) {
            outcome.push(result);
        }
    }
    outcome.finish(config)
}

/// Same as [`extract_batch`] for already extracted `(document_id, text)` pairs.
pub fn extract_text_batch<I, S, T>(texts: I, config: &ExtractionConfig) -> BatchOutcome
where
    I: IntoIterator<Item = (S, T)>,
    S: AsRef<str>,
    T: AsRef<str>,
{
    let parser = SlipParser::from_config(config);
    let mut outcome = BatchOutcome::default();
    for (id, text) in texts {
        for result in parser.extract_from_text(id.as_ref(), text.as_ref()) {
            outcome.push(result);
        }
    }
    outcome.finish(config)
}

/// Merge items with the same SKU, thread color and customization, summing
/// quantities. The first occurrence keeps its position.
pub fn group_line_items(items: Vec<LineItem>) -> Vec<LineItem> {
    let mut grouped: Vec<LineItem> = Vec::with_capacity(items.len());
    for item in items {
        let existing = grouped.iter_mut().find(|g| {
            g.sku == item.sku
                && g.thread_color == item.thread_color
                && g.customization == item.customization
        });
        match existing {
            Some(g) => {
                g.quantity += item.quantity;
                g.gift |= item.gift;
                g.gift_wrap |= item.gift_wrap;
                if g.gift_message.is_none() {
                    g.gift_message = item.gift_message;
                }
            }
            None => grouped.push(item),
        }
    }
    grouped
}
