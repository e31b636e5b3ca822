//! Read-only tabular projection of extracted line items.

use serde::Serialize;

use crate::catalog::{product_type, thread_color_es, towel_color};
use crate::models::slip::{LineItem, OrderRecord};

/// One row per line item with a fixed column set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemRow {
    pub order_number: String,
    pub order_date: String,
    pub recipient: String,
    pub sku: String,
    pub product: String,
    pub color: String,
    pub quantity: u32,
    pub title: String,
    pub font: String,
    pub thread_color: String,
    pub thread_color_es: String,
    /// Customization lines joined with " / ".
    pub customization: String,
    pub gift: bool,
    pub gift_message: String,
    pub source: String,
}

impl LineItemRow {
    /// Column headings, in field order.
    pub const COLUMNS: [&'static str; 15] = [
        "order_number",
        "order_date",
        "recipient",
        "sku",
        "product",
        "color",
        "quantity",
        "title",
        "font",
        "thread_color",
        "thread_color_es",
        "customization",
        "gift",
        "gift_message",
        "source",
    ];

    pub fn new(order: &OrderRecord, item: &LineItem) -> Self {
        let thread_color = item.thread_color.clone().unwrap_or_default();
        Self {
            order_number: order.order_number.clone(),
            order_date: order
                .order_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            recipient: order.recipient().unwrap_or_default().to_string(),
            sku: item.sku.clone(),
            product: product_type(&item.sku)
                .map(|p| p.label.to_string())
                .unwrap_or_default(),
            color: towel_color(&item.sku).unwrap_or_default(),
            quantity: item.quantity,
            title: item.title.clone(),
            font: item.font.clone().unwrap_or_default(),
            thread_color_es: thread_color_es(&thread_color)
                .unwrap_or_default()
                .to_string(),
            thread_color,
            customization: item.customization_lines().collect::<Vec<_>>().join(" / "),
            gift: item.gift,
            gift_message: item.gift_message.clone().unwrap_or_default(),
            source: order.source.clone(),
        }
    }

    /// Cell values as strings, in column order.
    pub fn cells(&self) -> [String; 15] {
        [
            self.order_number.clone(),
            self.order_date.clone(),
            self.recipient.clone(),
            self.sku.clone(),
            self.product.clone(),
            self.color.clone(),
            self.quantity.to_string(),
            self.title.clone(),
            self.font.clone(),
            self.thread_color.clone(),
            self.thread_color_es.clone(),
            self.customization.clone(),
            if self.gift { "yes" } else { "no" }.to_string(),
            self.gift_message.clone(),
            self.source.clone(),
        ]
    }
}

/// Tabular view over a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LineItemTable {
    pub rows: Vec<LineItemRow>,
}

impl LineItemTable {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a OrderRecord, &'a LineItem)>) -> Self {
        Self {
            rows: pairs
                .into_iter()
                .map(|(order, item)| LineItemRow::new(order, item))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_quantity(&self) -> u32 {
        self.rows.iter().map(|r| r.quantity).sum()
    }
}
