//! Anchor and value patterns for Amazon packing slips.
//!
//! Anchors are matched against normalized lines (see [`crate::slip::normalize`]),
//! so whitespace inside them is always a single space.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Order-level anchors
    pub static ref ORDER_NUMBER_ANCHOR: Regex = Regex::new(
        r"(?i)\border\s*(?:id|number|no\.|#)\s*[:#]?\s*"
    ).unwrap();

    pub static ref ORDER_NUMBER_VALUE: Regex = Regex::new(
        r"^(\d{3}-\d{7}-\d{7})\b"
    ).unwrap();

    pub static ref ORDER_DATE_ANCHOR: Regex = Regex::new(
        r"(?i)\border\s+date\s*:?\s*"
    ).unwrap();

    pub static ref SHIP_TO_ANCHOR: Regex = Regex::new(
        r"(?i)\b(?:ship\s*to|shipping\s+address)\s*:\s*"
    ).unwrap();

    pub static ref BUYER_NAME_ANCHOR: Regex = Regex::new(
        r"(?i)\bbuyer\s+name\s*:\s*"
    ).unwrap();

    pub static ref SHIPPING_SERVICE_ANCHOR: Regex = Regex::new(
        r"(?i)\bshipping\s+service\s*:\s*"
    ).unwrap();

    // Items table
    pub static ref ITEMS_TABLE_HEADER: Regex = Regex::new(
        r"(?i)^(?:quantity|qty)\s+(?:product|item)"
    ).unwrap();

    /// "<qty> <title>" line printed above each SKU.
    pub static ref ITEM_HEADER: Regex = Regex::new(
        r"^(\d{1,4})\s+([A-Za-z].*)$"
    ).unwrap();

    pub static ref SKU_ANCHOR: Regex = Regex::new(
        r"(?i)\bSKU\s*:\s*"
    ).unwrap();

    pub static ref SKU_VALUE: Regex = Regex::new(
        r"^([A-Za-z0-9][A-Za-z0-9 _./\-]*)"
    ).unwrap();

    pub static ref QUANTITY_ANCHOR: Regex = Regex::new(
        r"(?i)\b(?:quantity|qty)\s*:\s*"
    ).unwrap();

    pub static ref QUANTITY_VALUE: Regex = Regex::new(
        r"^(\d{1,4})\b"
    ).unwrap();

    /// Any single-line value.
    pub static ref TEXT_VALUE: Regex = Regex::new(
        r"^(\S.*)$"
    ).unwrap();

    // Personalization
    pub static ref FONT_ANCHOR: Regex = Regex::new(
        r"(?i)\b(?:choose\s+your\s+font|embroidery\s+font|font)\s*:\s*"
    ).unwrap();

    pub static ref THREAD_COLOR_ANCHOR: Regex = Regex::new(
        r"(?i)\b(?:font|thread)\s+colou?r\s*:\s*"
    ).unwrap();

    pub static ref CUSTOMIZATIONS_HEADER: Regex = Regex::new(
        r"(?i)^customi[sz]ations?\s*:?$"
    ).unwrap();

    /// Towel piece lines that carry embroidery text without a header.
    pub static ref PIECE_LINE: Regex = Regex::new(
        r"(?i)^((?:first\s+|second\s+)?(?:washcloth|hand\s+towel|bath\s+towel|oversized\s+bath\s+sheet|guest\s+towel))\s*:\s*(.*)$"
    ).unwrap();

    pub static ref KEY_VALUE_LINE: Regex = Regex::new(
        r"^([^:]{1,40}?)\s*:\s*(.*)$"
    ).unwrap();

    /// Customization values that are really totals printed next to the item.
    pub static ref TOTALS_BOILERPLATE: Regex = Regex::new(
        r"(?i)^(?:item\s+subtotal|promotion|tax|grand\s+total|shipping\s+total|order\s+total)"
    ).unwrap();

    /// Lines that end a customization section.
    pub static ref SECTION_STOP: Regex = Regex::new(
        r"(?i)^(?:item\s+subtotal|grand\s+total|shipping\s+total|order\s+total|tax\b|promotion|gift\s*(?:message|note|card|wrap|bag|options)|this\s+is\s+a\s+gift|asin|condition|order\s+item\s+id|listing\s+id|sku|returning\s+your\s+item|thank)"
    ).unwrap();

    // Gift options
    pub static ref GIFT_MESSAGE_ANCHOR: Regex = Regex::new(
        r"(?i)\bgift\s*(?:message|note|card)\s*:\s*"
    ).unwrap();

    pub static ref GIFT_WRAP_ANCHOR: Regex = Regex::new(
        r"(?i)\bgift\s*(?:wrap|bag)\s*:\s*"
    ).unwrap();

    pub static ref GIFT_FLAG: Regex = Regex::new(
        r"(?i)\bthis\s+is\s+a\s+gift\b"
    ).unwrap();

    /// Every "Label:" anchor; used to cut values where two columns were merged.
    pub static ref ANY_ANCHOR: Regex = Regex::new(
        r"(?i)\b(?:order\s*(?:id|number|no\.|#)|order\s+date|ship\s*to|shipping\s+address|buyer\s+name|shipping\s+service|seller\s+name|sku|asin|condition|order\s+item\s+id|listing\s+id|quantity|qty|customi[sz]ations?|gift\s*(?:message|note|card|wrap|bag)|choose\s+your\s+font|embroidery\s+font|font|(?:font|thread)\s+colou?r)\s*:"
    ).unwrap();

    // Value cleanup
    pub static ref HEX_COLOR: Regex = Regex::new(
        r"\s*\(?#[0-9A-Fa-f]{3,8}\)?"
    ).unwrap();

    pub static ref PRICE: Regex = Regex::new(
        r"\s*(?:US)?\$\s?\d[\d,]*\.\d{2}"
    ).unwrap();

    // Dates
    pub static ref DATE_MONTH_FIRST: Regex = Regex::new(
        r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{4})\b"
    ).unwrap();

    pub static ref DATE_DAY_FIRST: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s+([a-z]{3,9})\.?,?\s+(\d{4})\b"
    ).unwrap();

    pub static ref DATE_ISO: Regex = Regex::new(
        r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_US: Regex = Regex::new(
        r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b"
    ).unwrap();
}
