//! Core library for Amazon packing-slip processing.
//!
//! This crate provides:
//! - PDF text loading for packing slips
//! - Rule-based extraction of orders and line items
//! - A product catalog, tabular views and production summaries
//! - 4×6 in manufacturing label and gift card rendering
//!
//! Everything here is synchronous and side-effect free: bytes in, records
//! or PDF bytes out.

pub mod batch;
pub mod catalog;
pub mod error;
pub mod label;
pub mod models;
pub mod pdf;
pub mod slip;
pub mod summary;
pub mod table;

pub use batch::{extract_batch, extract_text_batch, group_line_items, BatchOutcome};
pub use error::{ParseError, PdfError, RenderError, Result, SlipError};
pub use label::{check_record, render_gift_cards, render_labels, LabelRenderer};
pub use models::config::{ExtractionConfig, LabelConfig, SlipConfig};
pub use models::slip::{LineItem, OrderRecord, PackingSlip, ShipTo, SlipDocument, SlipField};
pub use pdf::{PdfProcessor, PdfType};
pub use slip::{ExtractionResult, SlipExtractor, SlipParser};
pub use summary::ProductionSummary;
pub use table::{LineItemRow, LineItemTable};

/// Extract a single packing slip from already extracted text.
///
/// The text must hold exactly one order; use [`extract_text_batch`] for bulk
/// prints.
pub fn extract_slip(document_id: &str, text: &str) -> std::result::Result<PackingSlip, ParseError> {
    SlipParser::new()
        .with_split_orders(false)
        .parse(document_id, text)
        .map(|result| result.slip)
}

/// Extract a single packing slip from PDF bytes.
pub fn extract_slip_pdf(document: &SlipDocument) -> std::result::Result<PackingSlip, ParseError> {
    let text = pdf::read_text(&document.data).map_err(|source| ParseError::Unreadable {
        document: document.id.clone(),
        source,
    })?;
    extract_slip(&document.id, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_then_render_scenario() {
        let slip = extract_slip("single.pdf", include_str!("../fixtures/single_item.txt")).unwrap();
        assert_eq!(slip.items.len(), 1);
        assert_eq!(slip.order.order_number, "112-3456789-0123456");
        assert_eq!(slip.items[0].sku, "TWL-RED-12");
        assert_eq!(slip.items[0].quantity, 2);

        let config = LabelConfig::default();
        let first = render_labels(slip.pairs(), &config).unwrap();
        let again = extract_slip("single.pdf", include_str!("../fixtures/single_item.txt")).unwrap();
        let second = render_labels(again.pairs(), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unreadable_pdf() {
        let err = extract_slip_pdf(&SlipDocument::new("junk.pdf", b"not a pdf".to_vec())).unwrap_err();
        assert_eq!(err.document(), "junk.pdf");
        assert!(matches!(err, ParseError::Unreadable { .. }));
    }
}
