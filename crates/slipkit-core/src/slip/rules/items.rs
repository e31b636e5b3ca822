//! Line item location and item-level text capture.

use tracing::trace;

use super::patterns::{
    CUSTOMIZATIONS_HEADER, FONT_ANCHOR, ITEMS_TABLE_HEADER, ITEM_HEADER, KEY_VALUE_LINE,
    PIECE_LINE, PRICE, QUANTITY_ANCHOR, SKU_ANCHOR, THREAD_COLOR_ANCHOR, TOTALS_BOILERPLATE,
};
use super::{starts_section, FieldExtractor, ORDER_RULES};
use crate::models::slip::SlipField;

/// Lines that belong to one line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpan {
    /// First line of the item: its "<qty> <title>" header, a "Quantity:"
    /// line printed above the SKU, or the SKU line.
    pub start: usize,
    /// The SKU anchor line.
    pub sku_line: usize,
    /// One past the last line of the item.
    pub end: usize,
    /// Raw quantity text from the header line.
    pub header_quantity: Option<String>,
    /// Title text from the header line and its continuation lines.
    pub title: String,
}

/// Index of the line after the items table header, if the slip prints one.
pub fn items_floor(lines: &[String]) -> Option<usize> {
    lines
        .iter()
        .position(|l| ITEMS_TABLE_HEADER.is_match(l))
        .map(|idx| idx + 1)
}

/// Index of the line after the ship-to block, if the slip prints one.
pub fn ship_to_floor(lines: &[String]) -> Option<usize> {
    ORDER_RULES
        .iter()
        .find(|rule| rule.field == SlipField::ShipTo)?
        .extract(lines)
        .map(|m| m.end)
}

/// Whether `line` opens with a "Quantity:" anchor.
fn is_quantity_line(line: &str) -> bool {
    QUANTITY_ANCHOR.find(line).is_some_and(|m| m.start() == 0)
}

/// Locate one span per SKU anchor line, in slip order.
///
/// The header line is searched upwards from each SKU, at most `lookback`
/// lines and never past the previous SKU, the items table header or the
/// ship-to address. When the first item prints its "Quantity:" line above
/// the SKU, every item is taken to start at such a line.
pub fn locate_items(lines: &[String], lookback: usize) -> Vec<ItemSpan> {
    let sku_lines: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| SKU_ANCHOR.is_match(l))
        .map(|(idx, _)| idx)
        .collect();
    let Some(&first) = sku_lines.first() else {
        return Vec::new();
    };

    let table = items_floor(lines).map(|floor| floor.min(first));
    // An address printed below the items does not bound them
    let ship_to = ship_to_floor(lines).filter(|&end| end <= first);
    let floor = table.into_iter().chain(ship_to).max().unwrap_or(0);

    let first_limit = floor.max(first.saturating_sub(lookback));
    let quantity_first = lines[first_limit..first].iter().any(|l| is_quantity_line(l));

    let mut spans: Vec<ItemSpan> = Vec::with_capacity(sku_lines.len());
    for (k, &sku_line) in sku_lines.iter().enumerate() {
        let limit = if k == 0 { floor } else { sku_lines[k - 1] + 1 };
        let limit = limit.max(sku_line.saturating_sub(lookback));

        let (start, header_quantity, title) = match find_header(lines, limit, sku_line, quantity_first) {
            ItemStart::Header { line, quantity, title } => (line, Some(quantity), title),
            ItemStart::Quantity(line) => (line, None, String::new()),
            ItemStart::Sku => (sku_line, None, String::new()),
        };

        trace!("item {} at lines {}..{} (sku {})", k + 1, start, lines.len(), sku_line);
        spans.push(ItemSpan {
            start,
            sku_line,
            end: lines.len(),
            header_quantity,
            title,
        });
    }

    // Each item ends where the next begins
    for k in 1..spans.len() {
        let next_start = spans[k].start;
        spans[k - 1].end = next_start;
    }

    spans
}

/// Where an item begins, relative to its SKU line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ItemStart {
    /// A "<qty> <title>" line.
    Header {
        line: usize,
        quantity: String,
        title: String,
    },
    /// A "Quantity:" line printed above the SKU.
    Quantity(usize),
    /// The SKU line itself.
    Sku,
}

/// Nearest "<qty> <title>" line in `limit..=sku_line`, with the title
/// continued over the plain lines between it and the SKU.
fn find_header(lines: &[String], limit: usize, sku_line: usize, quantity_first: bool) -> ItemStart {
    // Header merged onto the SKU line itself
    let sku_text = &lines[sku_line];
    if let Some(anchor) = SKU_ANCHOR.find(sku_text) {
        let prefix = sku_text[..anchor.start()].trim();
        if let Some(caps) = ITEM_HEADER.captures(prefix) {
            return ItemStart::Header {
                line: sku_line,
                quantity: caps[1].to_string(),
                title: clean_title(&caps[2]),
            };
        }
    }

    for idx in (limit..sku_line).rev() {
        let line = &lines[idx];
        if quantity_first && is_quantity_line(line) {
            return ItemStart::Quantity(idx);
        }
        if starts_section(line) {
            return ItemStart::Sku;
        }
        if let Some(caps) = ITEM_HEADER.captures(line) {
            let mut parts = vec![clean_title(&caps[2])];
            parts.extend(lines[idx + 1..sku_line].iter().map(|l| clean_title(l)));
            parts.retain(|p| !p.is_empty());
            return ItemStart::Header {
                line: idx,
                quantity: caps[1].to_string(),
                title: parts.join(" "),
            };
        }
    }
    ItemStart::Sku
}

/// Strip prices that share the title's line.
fn clean_title(text: &str) -> String {
    PRICE.replace_all(text, "").trim().to_string()
}

/// Customization text of one item, one `Key: Value` entry per line.
///
/// Uses the lines under a "Customizations:" header when the item has one,
/// otherwise the towel piece lines ("Washcloth: ...", "Hand Towel: ...").
pub fn extract_customization(region: &[String]) -> Option<String> {
    let entries = match region.iter().position(|l| CUSTOMIZATIONS_HEADER.is_match(l)) {
        Some(header) => customization_block(&region[header + 1..]),
        None => region
            .iter()
            .filter_map(|line| PIECE_LINE.captures(line))
            .filter_map(|caps| entry(&caps[1], &caps[2]))
            .collect(),
    };

    if entries.is_empty() {
        None
    } else {
        Some(entries.join("\n"))
    }
}

fn customization_block(lines: &[String]) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    // Whether the previous line produced an entry a continuation may extend
    let mut open = false;

    for line in lines {
        // Font and thread color are item fields of their own
        if FONT_ANCHOR.is_match(line) || THREAD_COLOR_ANCHOR.is_match(line) {
            open = false;
            continue;
        }
        if starts_section(line) {
            break;
        }
        match KEY_VALUE_LINE.captures(line) {
            Some(caps) => match entry(&caps[1], &caps[2]) {
                Some(e) => {
                    entries.push(e);
                    open = true;
                }
                None => open = false,
            },
            None if TOTALS_BOILERPLATE.is_match(line) || PRICE.is_match(line) => break,
            None if open => {
                if let Some(last) = entries.last_mut() {
                    last.push(' ');
                    last.push_str(line);
                }
            }
            None => {}
        }
    }
    entries
}

fn entry(key: &str, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || TOTALS_BOILERPLATE.is_match(value) {
        return None;
    }
    Some(format!("{}: {}", key.trim(), value))
}
