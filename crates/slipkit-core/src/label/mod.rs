//! 4×6 in label rendering.
//!
//! Pages are composed from a fixed template ([`LabelLayout`]) and written
//! into a single in-memory PDF by [`LabelWriter`]. Rendering is atomic: the
//! caller gets the whole document or a [`RenderError`], never a partial file.

pub mod layout;
pub mod metrics;
mod writer;

pub use layout::{compose_gift_card, LabelLayout, LabelPage, Rect, Region, RegionKind, TextRun};
pub use metrics::{decode_win_ansi, encode_win_ansi, LabelFont};
pub use writer::LabelWriter;

use tracing::{debug, info};

use crate::error::RenderError;
use crate::models::config::LabelConfig;
use crate::models::slip::{LineItem, OrderRecord};

/// Renders line items into label documents.
#[derive(Debug, Clone)]
pub struct LabelRenderer {
    layout: LabelLayout,
}

impl LabelRenderer {
    pub fn new(config: &LabelConfig) -> Self {
        Self {
            layout: LabelLayout::new(config),
        }
    }

    pub fn layout(&self) -> &LabelLayout {
        &self.layout
    }

    /// Compose every page without writing anything.
    pub fn compose<'a>(
        &self,
        pairs: impl IntoIterator<Item = (&'a OrderRecord, &'a LineItem)>,
    ) -> Vec<LabelPage> {
        let pairs: Vec<_> = pairs.into_iter().collect();
        let total = pairs.len();
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (order, item))| self.layout.compose(order, item, i + 1, total))
            .collect()
    }

    /// One landscape page per pair, in input order.
    pub fn render<'a>(
        &self,
        pairs: impl IntoIterator<Item = (&'a OrderRecord, &'a LineItem)>,
    ) -> Result<Vec<u8>, RenderError> {
        let pages = self.compose(pairs);
        let mut writer = LabelWriter::new();
        for page in &pages {
            writer.add_page(page)?;
        }
        let bytes = writer.finish()?;
        info!("Rendered {} label page(s), {} bytes", pages.len(), bytes.len());
        Ok(bytes)
    }

    /// Check that a record can be rendered, without producing a document.
    ///
    /// Lets a host drop records that would fail before calling the atomic
    /// [`LabelRenderer::render`].
    pub fn check(&self, order: &OrderRecord, item: &LineItem) -> Result<(), RenderError> {
        let page = self.layout.compose(order, item, 1, 1);
        check_page(&page)
    }
}

fn check_page(page: &LabelPage) -> Result<(), RenderError> {
    for run in page.runs() {
        encode_win_ansi(&run.text).map_err(|character| RenderError::Unencodable {
            order_number: page.order_number.clone(),
            sku: page.sku.clone(),
            character,
        })?;
    }
    Ok(())
}

/// Render `pairs` into one label PDF using `config`.
pub fn render_labels<'a>(
    pairs: impl IntoIterator<Item = (&'a OrderRecord, &'a LineItem)>,
    config: &LabelConfig,
) -> Result<Vec<u8>, RenderError> {
    LabelRenderer::new(config).render(pairs)
}

/// Check one record against the label fonts, gift card text included.
pub fn check_record(
    order: &OrderRecord,
    item: &LineItem,
    config: &LabelConfig,
) -> Result<(), RenderError> {
    if let Some(message) = item.gift_message.as_deref() {
        check_page(&compose_gift_card(order, item, message))?;
    }
    LabelRenderer::new(config).check(order, item)
}

/// Portrait gift cards, one per gift item with a message.
///
/// Returns `Ok(None)` when no item carries a gift message.
pub fn render_gift_cards<'a>(
    pairs: impl IntoIterator<Item = (&'a OrderRecord, &'a LineItem)>,
) -> Result<Option<Vec<u8>>, RenderError> {
    let mut writer = LabelWriter::new();
    for (order, item) in pairs {
        let message = match item.gift_message.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m,
            _ => continue,
        };
        debug!("Gift card for order {}", order.order_number);
        writer.add_page(&compose_gift_card(order, item, message))?;
    }

    if writer.page_count() == 0 {
        return Ok(None);
    }
    let count = writer.page_count();
    let bytes = writer.finish()?;
    info!("Rendered {} gift card(s)", count);
    Ok(Some(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lopdf::content::Content;
    use lopdf::{Document, Object};
    use pretty_assertions::assert_eq;

    fn record(order_number: &str, sku: &str, quantity: u32) -> (OrderRecord, LineItem) {
        let mut order = OrderRecord::new(order_number, "slips.pdf");
        order.order_date = NaiveDate::from_ymd_opt(2024, 10, 12);
        (order, LineItem::new(sku, quantity))
    }

    fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| match op.operands.first() {
                        Some(Object::String(bytes, _)) => Some(decode_win_ansi(bytes)),
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_single_label_scenario() {
        let (order, item) = record("112-3456789-0123456", "TWL-RED-12", 2);
        let bytes = render_labels([(&order, &item)], &LabelConfig::default()).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.values().next().unwrap();
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let media_box: Vec<f32> = page
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect();
        assert_eq!(media_box, vec![0.0, 0.0, 432.0, 288.0]);

        let texts = &page_texts(&bytes)[0];
        assert!(texts.contains(&"Order 112-3456789-0123456".to_string()));
        assert!(texts.contains(&"TWL-RED-12 × 2".to_string()));
    }

    #[test]
    fn test_one_page_per_pair_in_order() {
        let records = [
            record("111-0000000-0000001", "HT-2Pcs-White", 1),
            record("111-0000000-0000002", "BT-2Pcs-Gray", 3),
            record("111-0000000-0000003", "BS-1Pcs-Navy", 2),
        ];
        let bytes = render_labels(records.iter().map(|(o, i)| (o, i)), &LabelConfig::default()).unwrap();

        let pages = page_texts(&bytes);
        assert_eq!(pages.len(), 3);
        for (texts, (order, item)) in pages.iter().zip(&records) {
            assert_eq!(texts[0], format!("Order {}", order.order_number));
            assert!(texts.contains(&format!("{} × {}", item.sku, item.quantity)));
        }
        assert!(pages[2].contains(&"slips.pdf · 3 / 3".to_string()));
    }

    #[test]
    fn test_render_is_deterministic() {
        let (order, mut item) = record("112-3456789-0123456", "Set-3Pcs-White", 1);
        item.customization = Some("Washcloth: Emma\nBath Towel: The Lopez Family".to_string());
        let config = LabelConfig::default();
        let first = render_labels([(&order, &item)], &config).unwrap();
        let second = render_labels([(&order, &item)], &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unencodable_character_fails_whole_document() {
        let (order, item) = record("112-3456789-0123456", "TWL-RED-12", 1);
        let (other, mut bad) = record("113-0000000-0000000", "HT-2Pcs-White", 1);
        bad.customization = Some("Name: 王".to_string());

        let err = render_labels([(&order, &item), (&other, &bad)], &LabelConfig::default())
            .unwrap_err();
        assert_eq!(err.record(), Some(("113-0000000-0000000", "HT-2Pcs-White")));
        let config = LabelConfig::default();
        assert!(check_record(&order, &item, &config).is_ok());
        assert!(check_record(&other, &bad, &config).is_err());
    }

    #[test]
    fn test_accented_text_renders() {
        let (order, mut item) = record("112-3456789-0123456", "HT-2Pcs-White", 1);
        item.customization = Some("Hand Towel: Núñez".to_string());
        let bytes = render_labels([(&order, &item)], &LabelConfig::default()).unwrap();
        assert!(page_texts(&bytes)[0].contains(&"• Hand Towel: Núñez".to_string()));
    }

    #[test]
    fn test_empty_input_renders_empty_document() {
        let bytes = render_labels(Vec::new(), &LabelConfig::default()).unwrap();
        assert_eq!(page_texts(&bytes).len(), 0);
    }

    #[test]
    fn test_gift_cards() {
        let (order, plain) = record("112-3456789-0123456", "TWL-RED-12", 1);
        assert_eq!(render_gift_cards([(&order, &plain)]).unwrap(), None);
        assert_eq!(render_gift_cards(Vec::new()).unwrap(), None);

        let mut gift = plain.clone();
        gift.gift = true;
        gift.gift_message = Some("Happy housewarming!".to_string());
        let bytes = render_gift_cards([(&order, &plain), (&order, &gift)])
            .unwrap()
            .unwrap();
        let pages = page_texts(&bytes);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0][0], "Happy housewarming!");
    }
}
