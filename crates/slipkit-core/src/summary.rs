//! End-of-day production summary.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{product_type, thread_color_es, towel_color, Category};
use crate::models::slip::{LineItem, OrderRecord};

/// Sets to produce for one towel color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColorRow {
    pub color: String,
    #[serde(rename = "3/6-Pcs Sets")]
    pub towel_sets: u32,
    #[serde(rename = "Hand Towel Sets")]
    pub hand_towel_sets: u32,
    #[serde(rename = "Bath Towel Sets")]
    pub bath_towel_sets: u32,
    #[serde(rename = "Bath Sheets (1 Pc)")]
    pub bath_sheets: u32,
}

impl ColorRow {
    fn add(&mut self, category: Category, sets: u32) {
        let cell = match category {
            Category::TowelSets => &mut self.towel_sets,
            Category::HandTowelSets => &mut self.hand_towel_sets,
            Category::BathTowelSets => &mut self.bath_towel_sets,
            Category::BathSheets => &mut self.bath_sheets,
        };
        *cell += sets;
    }

    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::TowelSets => self.towel_sets,
            Category::HandTowelSets => self.hand_towel_sets,
            Category::BathTowelSets => self.bath_towel_sets,
            Category::BathSheets => self.bath_sheets,
        }
    }
}

/// Thread needed across the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadRow {
    pub color: String,
    pub color_es: Option<String>,
    pub items: u32,
}

/// Production totals for a batch of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductionSummary {
    pub total_orders: usize,
    pub total_quantity: u32,
    /// Rows sorted by color.
    pub colors: Vec<ColorRow>,
    /// Thread colors sorted by name, quantities summed.
    pub threads: Vec<ThreadRow>,
    /// SKUs outside the catalog, counted in the totals only.
    pub unknown_skus: Vec<String>,
}

impl ProductionSummary {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a OrderRecord, &'a LineItem)>) -> Self {
        let mut summary = ProductionSummary::default();
        let mut orders: Vec<&str> = Vec::new();
        let mut colors: BTreeMap<String, ColorRow> = BTreeMap::new();
        let mut threads: BTreeMap<String, u32> = BTreeMap::new();

        for (order, item) in pairs {
            if !orders.contains(&order.order_number.as_str()) {
                orders.push(&order.order_number);
            }
            summary.total_quantity += item.quantity;

            if let Some(thread) = item.thread_color.as_deref().filter(|t| !t.is_empty()) {
                *threads.entry(thread.to_string()).or_default() += item.quantity;
            }

            match (product_type(&item.sku), towel_color(&item.sku)) {
                (Some(product), Some(color)) => {
                    colors
                        .entry(color.clone())
                        .or_insert_with(|| ColorRow {
                            color,
                            ..Default::default()
                        })
                        .add(product.category, item.quantity * product.sets_per_unit);
                }
                _ => {
                    if !summary.unknown_skus.contains(&item.sku) {
                        summary.unknown_skus.push(item.sku.clone());
                    }
                }
            }
        }

        summary.total_orders = orders.len();
        summary.colors = colors.into_values().collect();
        summary.threads = threads
            .into_iter()
            .map(|(color, items)| ThreadRow {
                color_es: thread_color_es(&color).map(str::to_string),
                color,
                items,
            })
            .collect();
        summary
    }

    /// Total sets in one category across all colors.
    pub fn category_total(&self, category: Category) -> u32 {
        self.colors.iter().map(|r| r.get(category)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(sku: &str, qty: u32, thread: Option<&str>) -> LineItem {
        let mut item = LineItem::new(sku, qty);
        item.thread_color = thread.map(str::to_string);
        item
    }

    #[test]
    fn test_summary_counts_six_piece_sets_twice() {
        let a = OrderRecord::new("111-1111111-1111111", "a.pdf");
        let b = OrderRecord::new("222-2222222-2222222", "a.pdf");
        let items = [
            item("Set-6Pcs-White", 1, Some("Navy")),
            item("Set-3Pcs-White", 2, Some("Gold")),
            item("HT-2Pcs-Navy", 1, Some("Navy")),
            item("TWL-RED-12", 3, None),
        ];
        let pairs = vec![(&a, &items[0]), (&a, &items[1]), (&b, &items[2]), (&b, &items[3])];

        let summary = ProductionSummary::from_pairs(pairs);
        assert_eq!(summary.total_orders, 2);
        assert_eq!(summary.total_quantity, 7);

        assert_eq!(summary.colors.len(), 2);
        assert_eq!(summary.colors[0].color, "Navy");
        assert_eq!(summary.colors[0].hand_towel_sets, 1);
        assert_eq!(summary.colors[1].color, "White");
        assert_eq!(summary.colors[1].towel_sets, 4);
        assert_eq!(summary.category_total(Category::TowelSets), 4);

        assert_eq!(summary.threads[0].color, "Gold");
        assert_eq!(summary.threads[0].color_es.as_deref(), Some("Dorado"));
        assert_eq!(summary.threads[1].items, 2);
        assert_eq!(summary.unknown_skus, vec!["TWL-RED-12"]);
    }

    #[test]
    fn test_empty_summary() {
        let summary = ProductionSummary::from_pairs(Vec::new());
        assert_eq!(summary, ProductionSummary::default());
    }
}
