//! Packing slip data models.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One uploaded packing slip PDF.
#[derive(Debug, Clone)]
pub struct SlipDocument {
    /// Identifier used in error reports (usually the file name).
    pub id: String,
    /// Raw PDF bytes.
    pub data: Vec<u8>,
}

impl SlipDocument {
    pub fn new(id: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
        }
    }
}

/// Fields located on a packing slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlipField {
    OrderNumber,
    OrderDate,
    ShipTo,
    BuyerName,
    ShippingService,
    Sku,
    Quantity,
    Title,
    Font,
    ThreadColor,
    Customization,
    Gift,
    GiftMessage,
    GiftWrap,
}

impl SlipField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlipField::OrderNumber => "order number",
            SlipField::OrderDate => "order date",
            SlipField::ShipTo => "ship to",
            SlipField::BuyerName => "buyer name",
            SlipField::ShippingService => "shipping service",
            SlipField::Sku => "SKU",
            SlipField::Quantity => "quantity",
            SlipField::Title => "product title",
            SlipField::Font => "font",
            SlipField::ThreadColor => "thread color",
            SlipField::Customization => "customization",
            SlipField::Gift => "gift flag",
            SlipField::GiftMessage => "gift message",
            SlipField::GiftWrap => "gift wrap",
        }
    }
}

impl fmt::Display for SlipField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order-level data, one per packing slip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Amazon order number (`ddd-ddddddd-ddddddd`).
    pub order_number: String,

    /// Date the order was placed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,

    /// Shipping address block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_to: Option<ShipTo>,

    /// Buyer name as printed on the slip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,

    /// Shipping service (Standard, Expedited, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_service: Option<String>,

    /// Document the record was extracted from.
    pub source: String,
}

impl OrderRecord {
    pub fn new(order_number: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            order_number: order_number.into(),
            order_date: None,
            ship_to: None,
            buyer_name: None,
            shipping_service: None,
            source: source.into(),
        }
    }

    /// Name to print for the customer: ship-to name, falling back to buyer name.
    pub fn recipient(&self) -> Option<&str> {
        self.ship_to
            .as_ref()
            .map(|s| s.name.as_str())
            .filter(|n| !n.is_empty())
            .or_else(|| self.buyer_name.as_deref().filter(|n| !n.is_empty()))
    }
}

/// Ship-to block: recipient name followed by address lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipTo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address_lines: Vec<String>,
}

impl ShipTo {
    /// Format the address as a single line.
    pub fn format(&self) -> String {
        let mut parts = vec![self.name.clone()];
        parts.extend(self.address_lines.iter().cloned());
        parts.retain(|p| !p.is_empty());
        parts.join(", ")
    }
}

/// One SKU line on a packing slip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Seller SKU.
    pub sku: String,

    /// Product title (may be empty when the slip prints none).
    pub title: String,

    /// Ordered quantity, always positive.
    pub quantity: u32,

    /// Customization text, one customization line per `\n`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customization: Option<String>,

    /// Embroidery font.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,

    /// Thread color in English, hex code stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_color: Option<String>,

    /// Whether the item ships as a gift.
    pub gift: bool,

    /// Whether gift wrap was requested.
    #[serde(default)]
    pub gift_wrap: bool,

    /// Gift note text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gift_message: Option<String>,
}

impl LineItem {
    pub fn new(sku: impl Into<String>, quantity: u32) -> Self {
        Self {
            sku: sku.into(),
            title: String::new(),
            quantity,
            customization: None,
            font: None,
            thread_color: None,
            gift: false,
            gift_wrap: false,
            gift_message: None,
        }
    }

    /// Customization lines in slip order.
    pub fn customization_lines(&self) -> impl Iterator<Item = &str> {
        self.customization
            .as_deref()
            .unwrap_or("")
            .lines()
            .filter(|l| !l.trim().is_empty())
    }
}

/// A packing slip: one order and the line items it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingSlip {
    pub order: OrderRecord,
    pub items: Vec<LineItem>,
}

impl PackingSlip {
    /// `(order, item)` pairs in slip order.
    pub fn pairs(&self) -> impl Iterator<Item = (&OrderRecord, &LineItem)> {
        self.items.iter().map(move |item| (&self.order, item))
    }
}
