//! Towel product catalog: SKU prefixes, towel colors and thread color names.

use serde::{Deserialize, Serialize};

use crate::slip::rules::HEX_COLOR;

/// Production category used by the end-of-day summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "3/6-Pcs Sets")]
    TowelSets,
    #[serde(rename = "Hand Towel Sets")]
    HandTowelSets,
    #[serde(rename = "Bath Towel Sets")]
    BathTowelSets,
    #[serde(rename = "Bath Sheets (1 Pc)")]
    BathSheets,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::TowelSets,
        Category::HandTowelSets,
        Category::BathTowelSets,
        Category::BathSheets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::TowelSets => "3/6-Pcs Sets",
            Category::HandTowelSets => "Hand Towel Sets",
            Category::BathTowelSets => "Bath Towel Sets",
            Category::BathSheets => "Bath Sheets (1 Pc)",
        }
    }
}

/// A product line identified by its SKU prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductType {
    pub prefix: &'static str,
    pub label: &'static str,
    pub category: Category,
    /// Summary sets counted per ordered unit.
    pub sets_per_unit: u32,
}

pub const PRODUCT_TYPES: [ProductType; 5] = [
    ProductType {
        prefix: "Set-3Pcs",
        label: "3-Piece Towel Set",
        category: Category::TowelSets,
        sets_per_unit: 1,
    },
    ProductType {
        prefix: "Set-6Pcs",
        label: "6-Piece Towel Set",
        category: Category::TowelSets,
        sets_per_unit: 2,
    },
    ProductType {
        prefix: "HT-2Pcs",
        label: "2-Piece Hand Towel Set",
        category: Category::HandTowelSets,
        sets_per_unit: 1,
    },
    ProductType {
        prefix: "BT-2Pcs",
        label: "2-Piece Bath Towel Set",
        category: Category::BathTowelSets,
        sets_per_unit: 1,
    },
    ProductType {
        prefix: "BS-1Pcs",
        label: "Oversized Bath Sheet",
        category: Category::BathSheets,
        sets_per_unit: 1,
    },
];

/// English thread color → Spanish name used on the production floor.
const THREAD_COLORS_ES: &[(&str, &str)] = &[
    ("White", "Blanco"),
    ("Black", "Negro"),
    ("Gold", "Dorado"),
    ("Silver", "Plateado"),
    ("Red", "Rojo"),
    ("Blue", "Azul"),
    ("Navy", "Azul Marino"),
    ("Light Blue", "Azul Claro"),
    ("Green", "Verde"),
    ("Pink", "Rosa"),
    ("Hot Pink", "Rosa Fucsia"),
    ("Lilac", "Lila"),
    ("Purple", "Morado"),
    ("Yellow", "Amarillo"),
    ("Beige", "Beige"),
    ("Brown", "Marrón"),
    ("Gray", "Gris"),
    ("Grey", "Gris"),
    ("Orange", "Naranja"),
    ("Teal", "Verde Azulado"),
    ("Ivory", "Marfil"),
    ("Champagne", "Champán"),
    ("Dark Grey", "Gris Oscuro"),
    ("Aqua", "Aguamarina"),
    ("Mid Blue", "Azul Medio"),
    ("Light Grey", "Gris Claro"),
];

/// Product type whose prefix starts the SKU (case-insensitive).
pub fn product_type(sku: &str) -> Option<&'static ProductType> {
    let sku = sku.trim();
    PRODUCT_TYPES.iter().find(|p| {
        sku.get(..p.prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(p.prefix))
            && sku[p.prefix.len()..].chars().next().is_none_or(|c| c == '-' || c == '_' || c == ' ')
    })
}

/// Towel color: the SKU remainder after a known prefix, title-cased.
pub fn towel_color(sku: &str) -> Option<String> {
    let product = product_type(sku)?;
    let rest = sku.trim()[product.prefix.len()..]
        .trim_start_matches(['-', '_', ' '])
        .replace('_', " ");
    let color = title_case(&rest);
    if color.is_empty() { None } else { Some(color) }
}

/// Spanish name of an English thread color, if the color is known.
pub fn thread_color_es(color: &str) -> Option<&'static str> {
    let key = title_case(&strip_hex(color));
    THREAD_COLORS_ES
        .iter()
        .find(|(en, _)| *en == key)
        .map(|(_, es)| *es)
}

/// Remove "(#RRGGBB)" style hex codes from a color value.
pub fn strip_hex(color: &str) -> String {
    let stripped = HEX_COLOR.replace_all(color, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// "light BLUE" → "Light Blue"; "MidBlue" → "Mid Blue".
fn title_case(text: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        // Split camel-cased SKU colors
        let mut current = String::new();
        let mut prev_lower = false;
        for c in word.chars() {
            if c.is_uppercase() && prev_lower && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = c.is_lowercase();
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }

    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
