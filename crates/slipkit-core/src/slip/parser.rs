//! Rule-driven packing slip parser.

use tracing::{debug, info, warn};

use crate::catalog::strip_hex;
use crate::error::ParseError;
use crate::models::config::ExtractionConfig;
use crate::models::slip::{LineItem, OrderRecord, PackingSlip, ShipTo, SlipDocument, SlipField};
use crate::pdf::read_text;

use super::rules::{
    items::{extract_customization, locate_items, ItemSpan},
    parse_order_date, FieldRule, RuleOutcome, ITEM_RULES, ORDER_RULES,
};
use super::{block_id, normalize, split_orders, Result, SlipExtractor};

/// Result of packing slip extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted order and line items.
    pub slip: PackingSlip,
    /// Optional fields that were present but unusable.
    pub warnings: Vec<String>,
}

/// Packing slip parser driven by the declarative field rules.
#[derive(Debug, Clone)]
pub struct SlipParser {
    /// Whether to split bulk prints into one slip per order.
    split_orders: bool,
    /// Lines above a SKU searched for the item's quantity/title line.
    title_lookback: usize,
}

impl SlipParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            split_orders: config.split_orders,
            title_lookback: config.title_lookback_lines,
        }
    }

    /// Set bulk print splitting.
    pub fn with_split_orders(mut self, split: bool) -> Self {
        self.split_orders = split;
        self
    }

    /// Set how many lines above a SKU may hold the item header.
    pub fn with_title_lookback(mut self, lines: usize) -> Self {
        self.title_lookback = lines;
        self
    }

    /// Extract one slip from text. Any missing or malformed required field
    /// fails the whole slip.
    pub fn parse(&self, document_id: &str, text: &str) -> Result<ExtractionResult> {
        self.parse_lines(document_id, &normalize(text))
    }

    /// Extract one slip from normalized lines.
    pub fn parse_lines(&self, document_id: &str, lines: &[String]) -> Result<ExtractionResult> {
        let mut warnings = Vec::new();
        let spans = locate_items(lines, self.title_lookback);
        let preamble_end = spans.first().map(|s| s.start).unwrap_or(lines.len());

        let order = self.extract_order(document_id, lines, &mut warnings)?;

        if spans.is_empty() {
            return Err(ParseError::MissingField {
                document: document_id.to_string(),
                field: SlipField::Sku,
            });
        }

        let preamble = &lines[..preamble_end];
        let mut items = Vec::with_capacity(spans.len());
        for span in &spans {
            items.push(self.extract_item(document_id, lines, span, preamble, &mut warnings)?);
        }

        debug!(
            "{}: order {} with {} item(s), {} warning(s)",
            document_id,
            order.order_number,
            items.len(),
            warnings.len()
        );

        Ok(ExtractionResult {
            slip: PackingSlip { order, items },
            warnings,
        })
    }

    fn extract_order(
        &self,
        document_id: &str,
        lines: &[String],
        warnings: &mut Vec<String>,
    ) -> Result<OrderRecord> {
        let mut order = OrderRecord::new(String::new(), document_id);

        for rule in ORDER_RULES.iter() {
            let Some(value) = evaluate(rule, document_id, lines, warnings)? else {
                continue;
            };
            match rule.field {
                SlipField::OrderNumber => order.order_number = value,
                SlipField::OrderDate => match parse_order_date(&value) {
                    Some(date) => order.order_date = Some(date),
                    None => {
                        warn!("{}: unrecognized order date {:?}", document_id, value);
                        warnings.push(format!("unrecognized order date: {}", value));
                    }
                },
                SlipField::ShipTo => order.ship_to = Some(parse_ship_to(&value)),
                SlipField::BuyerName => order.buyer_name = Some(value),
                SlipField::ShippingService => order.shipping_service = Some(value),
                _ => {}
            }
        }

        Ok(order)
    }

    fn extract_item(
        &self,
        document_id: &str,
        lines: &[String],
        span: &ItemSpan,
        preamble: &[String],
        warnings: &mut Vec<String>,
    ) -> Result<LineItem> {
        let region = &lines[span.start..span.end];
        let mut item = ItemBuilder::new();
        item.line.title = span.title.clone();

        let mut gift_found = false;
        for rule in ITEM_RULES.iter() {
            // An explicit "Quantity:" anchor beats the header's leading number
            if rule.field == SlipField::Quantity {
                if let Some(quantity) = &span.header_quantity {
                    if let RuleOutcome::Found(m) = rule.evaluate(region) {
                        item.quantity_text = Some(m.value);
                    } else {
                        item.quantity_text = Some(quantity.clone());
                    }
                    continue;
                }
            }
            let Some(value) = evaluate(rule, document_id, region, warnings)? else {
                continue;
            };
            apply_item_field(&mut item, rule.field, value);
            gift_found |= is_gift_field(rule.field);
        }

        // Slip-wide gift options are printed above the items
        if !gift_found {
            for rule in ITEM_RULES.iter().filter(|r| is_gift_field(r.field)) {
                if let Some(value) = evaluate(rule, document_id, preamble, warnings)? {
                    apply_item_field(&mut item, rule.field, value);
                }
            }
        }

        let raw_quantity = item.quantity_text.take().unwrap_or_default();
        item.line.quantity = match raw_quantity.parse::<u32>() {
            Ok(q) if q > 0 => q,
            _ => {
                return Err(ParseError::Malformed {
                    document: document_id.to_string(),
                    field: SlipField::Quantity,
                    value: raw_quantity,
                });
            }
        };

        item.line.customization = extract_customization(region);
        item.line.gift = item.line.gift || item.line.gift_wrap || item.line.gift_message.is_some();

        Ok(item.line)
    }
}

impl Default for SlipParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SlipExtractor for SlipParser {
    fn extract(&self, document: &SlipDocument) -> Vec<Result<ExtractionResult>> {
        match read_text(&document.data) {
            Ok(text) => self.extract_from_text(&document.id, &text),
            Err(source) => {
                warn!("{}: {}", document.id, source);
                vec![Err(ParseError::Unreadable {
                    document: document.id.clone(),
                    source,
                })]
            }
        }
    }

    fn extract_from_text(&self, document_id: &str, text: &str) -> Vec<Result<ExtractionResult>> {
        let lines = normalize(text);
        let blocks = if self.split_orders {
            split_orders(lines)
        } else {
            vec![lines]
        };

        info!("Parsing {} slip(s) from {}", blocks.len(), document_id);

        let total = blocks.len();
        blocks
            .iter()
            .enumerate()
            .map(|(idx, block)| self.parse_lines(&block_id(document_id, idx + 1, total), block))
            .collect()
    }
}

/// Evaluate one rule: `Ok(Some(value))` when found, `Ok(None)` when absent
/// or optional-and-malformed, `Err` when a required field is unusable.
fn evaluate(
    rule: &FieldRule,
    document_id: &str,
    lines: &[String],
    warnings: &mut Vec<String>,
) -> Result<Option<String>> {
    match rule.evaluate(lines) {
        RuleOutcome::Found(m) => Ok(Some(m.value)),
        RuleOutcome::Malformed(value) if rule.required => Err(ParseError::Malformed {
            document: document_id.to_string(),
            field: rule.field,
            value,
        }),
        RuleOutcome::Malformed(value) => {
            debug!("{}: ignoring malformed {} {:?}", document_id, rule.field, value);
            warnings.push(format!("malformed {}: {:?}", rule.field, value));
            Ok(None)
        }
        RuleOutcome::Absent if rule.required => Err(ParseError::MissingField {
            document: document_id.to_string(),
            field: rule.field,
        }),
        RuleOutcome::Absent => Ok(None),
    }
}

/// A line item under construction.
struct ItemBuilder {
    line: LineItem,
    quantity_text: Option<String>,
}

impl ItemBuilder {
    fn new() -> Self {
        Self {
            line: LineItem::new(String::new(), 0),
            quantity_text: None,
        }
    }
}

fn is_gift_field(field: SlipField) -> bool {
    matches!(
        field,
        SlipField::Gift | SlipField::GiftMessage | SlipField::GiftWrap
    )
}

fn apply_item_field(item: &mut ItemBuilder, field: SlipField, value: String) {
    let line = &mut item.line;
    match field {
        SlipField::Sku => line.sku = value,
        SlipField::Quantity => item.quantity_text = Some(value),
        SlipField::Font => line.font = Some(value),
        SlipField::ThreadColor => {
            let color = strip_hex(&value);
            if !color.is_empty() {
                line.thread_color = Some(color);
            }
        }
        SlipField::GiftMessage => line.gift_message = Some(value.replace('\n', " ")),
        SlipField::GiftWrap => {
            let answer = value.to_lowercase();
            line.gift_wrap = answer.starts_with("yes") || answer.starts_with("true");
        }
        SlipField::Gift => line.gift = true,
        _ => {}
    }
}

/// First ship-to line is the recipient, the rest is the address.
fn parse_ship_to(value: &str) -> ShipTo {
    let mut lines = value.lines().map(str::trim).filter(|l| !l.is_empty());
    ShipTo {
        name: lines.next().unwrap_or_default().to_string(),
        address_lines: lines.map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const SINGLE: &str = include_str!("../../fixtures/single_item.txt");
    const TOWEL_SET: &str = include_str!("../../fixtures/towel_set.txt");
    const BULK: &str = include_str!("../../fixtures/bulk_print.txt");

    #[test]
    fn test_single_item_slip() {
        let result = SlipParser::new().parse("single.pdf", SINGLE).unwrap();
        let slip = result.slip;

        assert_eq!(slip.order.order_number, "112-3456789-0123456");
        assert_eq!(slip.order.order_date, NaiveDate::from_ymd_opt(2024, 10, 12));
        assert_eq!(slip.order.recipient(), Some("Jane Doe"));
        assert_eq!(slip.items.len(), 1);

        let item = &slip.items[0];
        assert_eq!(item.sku, "TWL-RED-12");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.title, "Red Cotton Bath Towel");
        assert_eq!(item.customization, None);
        assert!(!item.gift);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_towel_set_fields() {
        let slip = SlipParser::new().parse("set.pdf", TOWEL_SET).unwrap().slip;

        assert_eq!(slip.order.order_number, "113-1111111-2222222");
        let ship_to = slip.order.ship_to.clone().unwrap();
        assert_eq!(ship_to.name, "Maria Lopez");
        assert_eq!(ship_to.address_lines, vec!["42 Ocean Ave", "Miami, FL 33139"]);
        assert_eq!(slip.order.shipping_service.as_deref(), Some("Standard"));
        assert_eq!(slip.items.len(), 2);

        let set = &slip.items[0];
        assert_eq!(set.sku, "Set-3Pcs-White");
        assert_eq!(set.quantity, 1);
        assert_eq!(set.font.as_deref(), Some("Script"));
        assert_eq!(set.thread_color.as_deref(), Some("Navy"));
        assert_eq!(
            set.customization.as_deref(),
            Some("Washcloth: Emma\nHand Towel: Lopez\nBath Towel: The Lopez Family")
        );
        assert!(set.gift);
        assert!(set.gift_wrap);
        assert_eq!(set.gift_message.as_deref(), Some("Happy housewarming! Love, Ana"));

        let sheet = &slip.items[1];
        assert_eq!(sheet.sku, "BS-1Pcs-Mid_Blue");
        assert_eq!(sheet.quantity, 2);
        assert_eq!(sheet.thread_color.as_deref(), Some("Gold"));
        assert_eq!(sheet.customization.as_deref(), Some("Oversized Bath Sheet: M & J"));
        assert!(!sheet.gift);
        assert_eq!(sheet.gift_message, None);
    }

    #[test]
    fn test_item_count_matches_sku_lines() {
        for text in [SINGLE, TOWEL_SET] {
            let sku_lines = normalize(text)
                .iter()
                .filter(|l| l.starts_with("SKU:"))
                .count();
            let slip = SlipParser::new().parse("doc", text).unwrap().slip;
            assert_eq!(slip.items.len(), sku_lines);
        }
    }

    #[test]
    fn test_missing_order_number() {
        let err = SlipParser::new()
            .parse("doc2.pdf", "Ship To: Jane\n1 Towel\nSKU: TWL-RED-12")
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingField {
                document: "doc2.pdf".to_string(),
                field: SlipField::OrderNumber,
            }
        );
    }

    #[test]
    fn test_malformed_order_number() {
        let err = SlipParser::new()
            .parse("doc.pdf", "Order ID: 112-345\n1 Towel\nSKU: TWL-RED-12")
            .unwrap_err();
        assert_eq!(err.field(), Some(SlipField::OrderNumber));
        assert!(matches!(err, ParseError::Malformed { ref value, .. } if value == "112-345"));
    }

    #[test]
    fn test_missing_quantity() {
        let err = SlipParser::new()
            .parse("doc.pdf", "Order ID: 112-3456789-0123456\nSKU: TWL-RED-12")
            .unwrap_err();
        assert_eq!(err.field(), Some(SlipField::Quantity));
        assert!(matches!(err, ParseError::MissingField { .. }));
    }

    #[test]
    fn test_quantity_anchor_and_zero_quantity() {
        let parser = SlipParser::new();
        let ok = parser
            .parse("doc.pdf", "Order ID: 112-3456789-0123456\nSKU: TWL-RED-12\nQuantity: 3")
            .unwrap();
        assert_eq!(ok.slip.items[0].quantity, 3);

        let err = parser
            .parse("doc.pdf", "Order ID: 112-3456789-0123456\nSKU: TWL-RED-12\nQty: 0")
            .unwrap_err();
        assert!(matches!(err, ParseError::Malformed { field: SlipField::Quantity, .. }));
    }

    #[test]
    fn test_quantity_anchor_beats_address_line() {
        let result = SlipParser::new()
            .parse(
                "d.pdf",
                "Order #: 112-3456789-0123456\nShip To:\nJane Doe\n123 Elm Street\nSKU: TWL-RED-12\nQuantity: 2",
            )
            .unwrap();
        let slip = result.slip;

        assert_eq!(slip.items.len(), 1);
        assert_eq!(slip.items[0].quantity, 2);
        assert_ne!(slip.items[0].title, "Elm Street");
        let ship_to = slip.order.ship_to.unwrap();
        assert_eq!(ship_to.address_lines, vec!["123 Elm Street"]);
    }

    #[test]
    fn test_quantity_anchor_beats_header_number() {
        let slip = SlipParser::new()
            .parse(
                "doc.pdf",
                "Order ID: 112-3456789-0123456\n1 Red Towel\nSKU: TWL-RED-12\nQuantity: 4",
            )
            .unwrap()
            .slip;
        assert_eq!(slip.items[0].quantity, 4);
        assert_eq!(slip.items[0].title, "Red Towel");
    }

    #[test]
    fn test_quantity_printed_above_sku() {
        let slip = SlipParser::new()
            .parse(
                "d.pdf",
                "Order ID: 112-3456789-0123456\nProduct: Red Towel\nQuantity: 2\nSKU: TWL-RED-12",
            )
            .unwrap()
            .slip;
        assert_eq!(slip.items.len(), 1);
        assert_eq!(slip.items[0].sku, "TWL-RED-12");
        assert_eq!(slip.items[0].quantity, 2);
    }

    #[test]
    fn test_each_item_keeps_quantity_printed_above_it() {
        let slip = SlipParser::new()
            .parse(
                "d.pdf",
                "Order ID: 112-3456789-0123456\n\
                 Quantity: 2\nSKU: TWL-RED-12\n\
                 Quantity: 1\nSKU: HT-2Pcs-Navy\nFirst Hand Towel: Mr",
            )
            .unwrap()
            .slip;
        let quantities: Vec<_> = slip.items.iter().map(|i| (i.sku.as_str(), i.quantity)).collect();
        assert_eq!(quantities, vec![("TWL-RED-12", 2), ("HT-2Pcs-Navy", 1)]);
        assert_eq!(slip.items[1].customization.as_deref(), Some("First Hand Towel: Mr"));
    }

    #[test]
    fn test_missing_sku() {
        let err = SlipParser::new()
            .parse("doc.pdf", "Order ID: 112-3456789-0123456\n2 Towels")
            .unwrap_err();
        assert_eq!(err.field(), Some(SlipField::Sku));
    }

    #[test]
    fn test_bad_order_date_is_a_warning() {
        let result = SlipParser::new()
            .parse(
                "doc.pdf",
                "Order ID: 112-3456789-0123456\nOrder Date: sometime\n1 Towel\nSKU: TWL-RED-12",
            )
            .unwrap();
        assert_eq!(result.slip.order.order_date, None);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_bulk_print_split() {
        let results = SlipParser::new().extract_from_text("bulk.pdf", BULK);
        assert_eq!(results.len(), 3);

        let first = results[0].as_ref().unwrap();
        assert_eq!(first.slip.order.source, "bulk.pdf#1");
        assert_eq!(first.slip.order.recipient(), Some("Alice Smith"));

        let second = results[1].as_ref().unwrap_err();
        assert_eq!(second.document(), "bulk.pdf#2");
        assert_eq!(second.field(), Some(SlipField::Quantity));

        let third = results[2].as_ref().unwrap();
        assert_eq!(third.slip.order.order_number, "333-3333333-3333333");
        assert_eq!(third.slip.order.recipient(), Some("Carol White"));
        assert_eq!(third.slip.items[0].sku, "HT-2Pcs-Gray");
    }

    #[test]
    fn test_unreadable_document() {
        let doc = SlipDocument::new("broken.pdf", b"%PDF-garbage".to_vec());
        let results = SlipParser::new().extract(&doc);
        assert_eq!(results.len(), 1);
        let err = results[0].as_ref().unwrap_err();
        assert_eq!(err.document(), "broken.pdf");
        assert!(matches!(err, ParseError::Unreadable { .. }));
    }
}
