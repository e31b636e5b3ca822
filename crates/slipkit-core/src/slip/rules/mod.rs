//! Rule-based field extractors for Amazon packing slips.
//!
//! Each field is described by a [`FieldRule`]: an anchor pattern, how the
//! value next to the anchor is captured, and whether the field is required.
//! Rules run against normalized lines, so they can be tested without PDFs.

pub mod dates;
pub mod items;
pub mod patterns;

pub use dates::{parse_order_date, DateExtractor};
pub use items::{locate_items, ItemSpan};
pub use patterns::*;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::slip::SlipField;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from lines.
    fn extract(&self, lines: &[String]) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, lines: &[String]) -> Vec<Self::Output>;
}

/// A value located next to an anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index of the anchor line.
    pub line: usize,
    /// One past the last line the value was read from.
    pub end: usize,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, line: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            line,
            end: line + 1,
            source: source.into(),
        }
    }

    /// Extend the match over the lines following the anchor.
    pub fn through(mut self, end: usize) -> Self {
        self.end = end;
        self
    }
}

/// How the value adjacent to an anchor is captured.
#[derive(Debug, Clone, Copy)]
pub enum Capture {
    /// Rest of the anchor line; the pattern's first group is the value.
    Inline(&'static Regex),
    /// Rest of the anchor line plus up to `max_lines` following lines.
    Block { max_lines: usize },
    /// The anchor alone; the value is the matched anchor text.
    Presence,
}

/// Declarative description of one slip field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: SlipField,
    pub anchor: &'static Regex,
    pub capture: Capture,
    pub required: bool,
}

/// Result of evaluating a rule against a block of lines.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Found(ExtractionMatch<String>),
    /// Anchors exist but none carried a usable value.
    Malformed(String),
    Absent,
}

impl FieldRule {
    pub const fn new(field: SlipField, anchor: &'static Regex, capture: Capture) -> Self {
        Self {
            field,
            anchor,
            capture,
            required: false,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Evaluate the rule. The first anchor with a usable value wins.
    pub fn evaluate(&self, lines: &[String]) -> RuleOutcome {
        let mut first_bad: Option<String> = None;

        for idx in 0..lines.len() {
            match self.capture_at(lines, idx) {
                Some(Ok(m)) => return RuleOutcome::Found(m),
                Some(Err(raw)) => {
                    first_bad.get_or_insert(raw);
                }
                None => {}
            }
        }

        match first_bad {
            Some(raw) => RuleOutcome::Malformed(raw),
            None => RuleOutcome::Absent,
        }
    }

    /// Capture at line `idx`: `None` when the anchor is not on that line,
    /// `Err(raw)` when it is but the value is unusable.
    fn capture_at(
        &self,
        lines: &[String],
        idx: usize,
    ) -> Option<std::result::Result<ExtractionMatch<String>, String>> {
        let line = &lines[idx];
        let anchor = self.anchor.find(line)?;
        let rest = until_next_anchor(&line[anchor.end()..]);

        let result = match self.capture {
            Capture::Inline(pattern) => match pattern.captures(rest) {
                Some(caps) => Ok(ExtractionMatch::new(
                    caps[1].trim().to_string(),
                    idx,
                    line.as_str(),
                )),
                None => Err(rest.to_string()),
            },
            Capture::Block { max_lines } => {
                let mut parts: Vec<&str> = Vec::new();
                if !rest.is_empty() {
                    parts.push(rest);
                }
                // A mid-line anchor already ended the value.
                let cut = rest.len() < line[anchor.end()..].trim().len();
                let mut end = idx + 1;
                if !cut {
                    for next in lines.iter().skip(idx + 1) {
                        if parts.len() >= max_lines || starts_section(next) {
                            break;
                        }
                        end += 1;
                        let kept = until_next_anchor(next);
                        if !kept.is_empty() {
                            parts.push(kept);
                        }
                        if kept.len() < next.len() {
                            break;
                        }
                    }
                }
                if parts.is_empty() {
                    Err(String::new())
                } else {
                    Ok(ExtractionMatch::new(parts.join("\n"), idx, line.as_str()).through(end))
                }
            }
            Capture::Presence => Ok(ExtractionMatch::new(
                anchor.as_str().trim().to_string(),
                idx,
                line.as_str(),
            )),
        };

        Some(result)
    }
}

impl FieldExtractor for FieldRule {
    type Output = ExtractionMatch<String>;

    fn extract(&self, lines: &[String]) -> Option<Self::Output> {
        match self.evaluate(lines) {
            RuleOutcome::Found(m) => Some(m),
            _ => None,
        }
    }

    fn extract_all(&self, lines: &[String]) -> Vec<Self::Output> {
        (0..lines.len())
            .filter_map(|idx| self.capture_at(lines, idx))
            .filter_map(|r| r.ok())
            .collect()
    }
}

/// Text before the next "Label:" anchor, trimmed.
pub fn until_next_anchor(text: &str) -> &str {
    let text = text.trim();
    match ANY_ANCHOR.find(text) {
        Some(m) => text[..m.start()].trim(),
        None => text,
    }
}

/// Whether a line opens a new section (an anchor at its start or the items table).
pub fn starts_section(line: &str) -> bool {
    ITEMS_TABLE_HEADER.is_match(line)
        || ANY_ANCHOR.find(line).is_some_and(|m| m.start() == 0)
        || SECTION_STOP.is_match(line)
}

lazy_static! {
    /// Order-level fields, evaluated against the whole order block.
    pub static ref ORDER_RULES: Vec<FieldRule> = vec![
        FieldRule::new(SlipField::OrderNumber, &ORDER_NUMBER_ANCHOR, Capture::Inline(&ORDER_NUMBER_VALUE)).required(),
        FieldRule::new(SlipField::OrderDate, &ORDER_DATE_ANCHOR, Capture::Inline(&TEXT_VALUE)),
        FieldRule::new(SlipField::ShipTo, &SHIP_TO_ANCHOR, Capture::Block { max_lines: 5 }),
        FieldRule::new(SlipField::BuyerName, &BUYER_NAME_ANCHOR, Capture::Inline(&TEXT_VALUE)),
        FieldRule::new(SlipField::ShippingService, &SHIPPING_SERVICE_ANCHOR, Capture::Inline(&TEXT_VALUE)),
    ];

    /// Item-level fields, evaluated against one item's region.
    pub static ref ITEM_RULES: Vec<FieldRule> = vec![
        FieldRule::new(SlipField::Sku, &SKU_ANCHOR, Capture::Inline(&SKU_VALUE)).required(),
        FieldRule::new(SlipField::Quantity, &QUANTITY_ANCHOR, Capture::Inline(&QUANTITY_VALUE)).required(),
        FieldRule::new(SlipField::Font, &FONT_ANCHOR, Capture::Inline(&TEXT_VALUE)),
        FieldRule::new(SlipField::ThreadColor, &THREAD_COLOR_ANCHOR, Capture::Inline(&TEXT_VALUE)),
        FieldRule::new(SlipField::GiftMessage, &GIFT_MESSAGE_ANCHOR, Capture::Block { max_lines: 4 }),
        FieldRule::new(SlipField::GiftWrap, &GIFT_WRAP_ANCHOR, Capture::Inline(&TEXT_VALUE)),
        FieldRule::new(SlipField::Gift, &GIFT_FLAG, Capture::Presence),
    ];
}
