//! Fixed five-region label template.
//!
//! Region bounds depend only on [`LabelConfig`], never on the record, so
//! every page of a document has the same geometry. Text that does not fit
//! its region is wrapped and then truncated with "…"; font sizes never change.

use crate::catalog::{product_type, thread_color_es, towel_color};
use crate::models::config::LabelConfig;
use crate::models::slip::{LineItem, OrderRecord};

use super::metrics::LabelFont;

/// 6 in.
pub const LANDSCAPE_WIDTH: f32 = 432.0;
/// 4 in.
pub const LANDSCAPE_HEIGHT: f32 = 288.0;

const REGION_GAP: f32 = 4.0;
const BULLET: &str = "• ";
const ELLIPSIS: char = '…';
const FOOTER_GRAY: f32 = 0.45;

/// Gift card message style.
const CARD_FONT_SIZE: f32 = 16.0;
const CARD_LEADING: f32 = 22.0;
const CARD_MARGIN: f32 = 36.0;
const CARD_FOOTER_SIZE: f32 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Header,
    Product,
    Customization,
    Gift,
    Footer,
}

/// A single line of text placed at an absolute baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub font: LabelFont,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    /// Fill gray level, 0 = black.
    pub gray: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub kind: RegionKind,
    pub rect: Rect,
    pub runs: Vec<TextRun>,
}

impl Region {
    fn new(kind: RegionKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            runs: Vec::new(),
        }
    }

    fn push(&mut self, text: impl Into<String>, font: LabelFont, size: f32, x: f32, y: f32) {
        self.runs.push(TextRun {
            text: text.into(),
            font,
            size,
            x,
            y,
            gray: 0.0,
        });
    }

    fn push_right(&mut self, text: impl Into<String>, font: LabelFont, size: f32, y: f32) {
        let text = text.into();
        let x = self.rect.right() - font.text_width(&text, size);
        self.push(text, font, size, x, y);
    }
}

/// One composed page, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPage {
    pub width: f32,
    pub height: f32,
    pub regions: Vec<Region>,
    /// Horizontal rules as `(y, x0, x1)`.
    pub rules: Vec<(f32, f32, f32)>,
    /// Record the page was composed from, for error reports.
    pub order_number: String,
    pub sku: String,
}

impl LabelPage {
    pub fn region(&self, kind: RegionKind) -> Option<&Region> {
        self.regions.iter().find(|r| r.kind == kind)
    }

    /// All text runs in drawing order.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.regions.iter().flat_map(|r| r.runs.iter())
    }
}

/// Region geometry for 4×6 in landscape manufacturing labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub header: Rect,
    pub product: Rect,
    pub customization: Rect,
    pub gift: Rect,
    pub footer: Rect,
    /// Customization lines that fit the region.
    pub customization_capacity: usize,
    config: LabelConfig,
}

impl LabelLayout {
    pub fn new(config: &LabelConfig) -> Self {
        let x = config.margin_left;
        let width = (LANDSCAPE_WIDTH - config.margin_left - config.margin_right).max(1.0);
        let top = LANDSCAPE_HEIGHT - config.margin_top;

        let header_height = config.header_font_size + config.line_leading + 6.0;
        let header = Rect {
            x,
            y: top - header_height,
            width,
            height: header_height,
        };

        let product_height = config.product_font_size + 3.0 * config.line_leading + REGION_GAP;
        let product = Rect {
            x,
            y: header.y - REGION_GAP - product_height,
            width,
            height: product_height,
        };

        let footer = Rect {
            x,
            y: config.margin_bottom,
            width,
            height: config.footer_font_size + REGION_GAP,
        };

        let gift = Rect {
            x,
            y: footer.top() + REGION_GAP,
            width,
            height: 2.0 * config.line_leading + REGION_GAP,
        };

        let customization_y = gift.top() + REGION_GAP;
        let customization = Rect {
            x,
            y: customization_y,
            width,
            height: (product.y - REGION_GAP - customization_y).max(config.line_leading),
        };

        let fit = (customization.height / config.line_leading.max(1.0)).floor() as usize;
        let customization_capacity = fit.min(config.customization_lines).max(1);

        Self {
            header,
            product,
            customization,
            gift,
            footer,
            customization_capacity,
            config: config.clone(),
        }
    }

    /// Compose the label for one line item; `index` is 1-based.
    pub fn compose(&self, order: &OrderRecord, item: &LineItem, index: usize, total: usize) -> LabelPage {
        let regions = vec![
            self.header_region(order),
            self.product_region(item),
            self.customization_region(item),
            self.gift_region(item),
            self.footer_region(order, index, total),
        ];

        let rule_x = (self.header.x, self.header.right());
        LabelPage {
            width: LANDSCAPE_WIDTH,
            height: LANDSCAPE_HEIGHT,
            regions,
            rules: vec![
                (self.header.y - REGION_GAP / 2.0, rule_x.0, rule_x.1),
                (self.footer.top() + REGION_GAP / 2.0, rule_x.0, rule_x.1),
            ],
            order_number: order.order_number.clone(),
            sku: item.sku.clone(),
        }
    }

    fn header_region(&self, order: &OrderRecord) -> Region {
        let c = &self.config;
        let mut region = Region::new(RegionKind::Header, self.header);
        let width = self.header.width;

        let baseline = self.header.top() - c.header_font_size;
        let date = order
            .order_date
            .map(|d| d.format("%b %-d, %Y").to_string())
            .unwrap_or_default();
        let date_width = LabelFont::Helvetica.text_width(&date, c.header_font_size);
        let title = format!("Order {}", order.order_number);
        region.push(
            ellipsize(&title, LabelFont::HelveticaBold, c.header_font_size, width - date_width - 12.0),
            LabelFont::HelveticaBold,
            c.header_font_size,
            self.header.x,
            baseline,
        );
        if !date.is_empty() {
            region.push_right(date, LabelFont::Helvetica, c.header_font_size, baseline);
        }

        let baseline = baseline - c.line_leading;
        let service = order.shipping_service.clone().unwrap_or_default();
        let service_width = LabelFont::Helvetica.text_width(&service, c.body_font_size);
        if let Some(name) = order.recipient() {
            region.push(
                ellipsize(name, LabelFont::Helvetica, c.body_font_size, width - service_width - 12.0),
                LabelFont::Helvetica,
                c.body_font_size,
                self.header.x,
                baseline,
            );
        }
        if !service.is_empty() {
            region.push_right(service, LabelFont::Helvetica, c.body_font_size, baseline);
        }

        region
    }

    fn product_region(&self, item: &LineItem) -> Region {
        let c = &self.config;
        let mut region = Region::new(RegionKind::Product, self.product);
        let width = self.product.width;

        let mut baseline = self.product.top() - c.product_font_size;
        let headline = format!("{} × {}", item.sku, item.quantity);
        region.push(
            ellipsize(&headline, LabelFont::HelveticaBold, c.product_font_size, width),
            LabelFont::HelveticaBold,
            c.product_font_size,
            self.product.x,
            baseline,
        );

        let mut lines = Vec::new();
        if !item.title.is_empty() {
            lines.push(item.title.clone());
        }
        if let (Some(product), Some(color)) = (product_type(&item.sku), towel_color(&item.sku)) {
            lines.push(format!("{} – {}", product.label, color));
        }
        let mut details = Vec::new();
        if let Some(thread) = &item.thread_color {
            match thread_color_es(thread) {
                Some(es) if !es.eq_ignore_ascii_case(thread) => {
                    details.push(format!("Thread: {} | {}", thread, es))
                }
                _ => details.push(format!("Thread: {}", thread)),
            }
        }
        if let Some(font) = &item.font {
            details.push(format!("Font: {}", font));
        }
        if !details.is_empty() {
            lines.push(details.join("   "));
        }

        for line in lines.iter().take(3) {
            baseline -= c.line_leading;
            region.push(
                ellipsize(line, LabelFont::Helvetica, c.body_font_size, width),
                LabelFont::Helvetica,
                c.body_font_size,
                self.product.x,
                baseline,
            );
        }

        region
    }

    fn customization_region(&self, item: &LineItem) -> Region {
        let c = &self.config;
        let font = LabelFont::Helvetica;
        let mut region = Region::new(RegionKind::Customization, self.customization);
        let indent = font.text_width(BULLET, c.body_font_size);
        let x = self.customization.x;

        // (text, x offset)
        let mut lines: Vec<(String, f32)> = Vec::new();
        for entry in item.customization_lines() {
            let wrapped = wrap_text(entry, font, c.body_font_size, self.customization.width - indent);
            for (i, text) in wrapped.into_iter().enumerate() {
                if i == 0 {
                    lines.push((format!("{}{}", BULLET, text), 0.0));
                } else {
                    lines.push((text, indent));
                }
            }
        }

        if lines.len() > self.customization_capacity {
            lines.truncate(self.customization_capacity);
            if let Some((text, offset)) = lines.last_mut() {
                let max = self.customization.width - *offset;
                *text = with_ellipsis(text, font, c.body_font_size, max);
            }
        }

        let mut baseline = self.customization.top() - c.body_font_size;
        for (text, offset) in lines {
            region.push(text, font, c.body_font_size, x + offset, baseline);
            baseline -= c.line_leading;
        }

        region
    }

    fn gift_region(&self, item: &LineItem) -> Region {
        let c = &self.config;
        let mut region = Region::new(RegionKind::Gift, self.gift);
        if !item.gift {
            return region;
        }

        let baseline = self.gift.top() - c.body_font_size;
        let flag = format!("GIFT · Wrap: {}", if item.gift_wrap { "Yes" } else { "No" });
        region.push(flag, LabelFont::HelveticaBold, c.body_font_size, self.gift.x, baseline);

        if let Some(message) = item.gift_message.as_deref().filter(|m| !m.is_empty()) {
            region.push(
                ellipsize(message, LabelFont::HelveticaOblique, c.body_font_size, self.gift.width),
                LabelFont::HelveticaOblique,
                c.body_font_size,
                self.gift.x,
                baseline - c.line_leading,
            );
        }

        region
    }

    fn footer_region(&self, order: &OrderRecord, index: usize, total: usize) -> Region {
        let c = &self.config;
        let font = LabelFont::Helvetica;
        let mut region = Region::new(RegionKind::Footer, self.footer);
        let width = self.footer.width;
        let baseline = self.footer.y + REGION_GAP / 2.0;

        let position = format!(" · {} / {}", index, total);
        let position_width = font.text_width(&position, c.footer_font_size);
        let source = ellipsize(&order.source, font, c.footer_font_size, width * 0.6 - position_width);
        let right = format!("{}{}", source, position);
        let right_width = font.text_width(&right, c.footer_font_size);

        if !c.footer_text.is_empty() {
            let left = ellipsize(&c.footer_text, font, c.footer_font_size, width - right_width - 12.0);
            region.push(left, font, c.footer_font_size, self.footer.x, baseline);
        }
        region.push_right(right, font, c.footer_font_size, baseline);

        for run in &mut region.runs {
            run.gray = FOOTER_GRAY;
        }
        region
    }
}

/// Compose a 4×6 in portrait gift card: the message centered in oblique type
/// and a small footer naming the recipient and order.
pub fn compose_gift_card(order: &OrderRecord, item: &LineItem, message: &str) -> LabelPage {
    let (width, height) = (LANDSCAPE_HEIGHT, LANDSCAPE_WIDTH);
    let font = LabelFont::HelveticaOblique;
    let body = Rect {
        x: CARD_MARGIN,
        y: 2.0 * CARD_MARGIN,
        width: width - 2.0 * CARD_MARGIN,
        height: height - 4.0 * CARD_MARGIN,
    };

    let mut lines = wrap_text(message, font, CARD_FONT_SIZE, body.width);
    let capacity = ((body.height / CARD_LEADING).floor() as usize).max(1);
    if lines.len() > capacity {
        lines.truncate(capacity);
        if let Some(last) = lines.last_mut() {
            *last = with_ellipsis(last, font, CARD_FONT_SIZE, body.width);
        }
    }

    let mut message_region = Region::new(RegionKind::Gift, body);
    let block = (lines.len().saturating_sub(1)) as f32 * CARD_LEADING;
    let mut baseline = height / 2.0 + block / 2.0;
    for line in lines {
        let x = (width - font.text_width(&line, CARD_FONT_SIZE)) / 2.0;
        message_region.push(line, font, CARD_FONT_SIZE, x, baseline);
        baseline -= CARD_LEADING;
    }

    let footer_rect = Rect {
        x: CARD_MARGIN,
        y: 0.0,
        width: body.width,
        height: 2.0 * CARD_MARGIN,
    };
    let mut footer = Region::new(RegionKind::Footer, footer_rect);
    let label = match order.recipient() {
        Some(name) => format!("{} – {}", name, order.order_number),
        None => order.order_number.clone(),
    };
    let label = ellipsize(&label, LabelFont::Helvetica, CARD_FOOTER_SIZE, body.width);
    let x = (width - LabelFont::Helvetica.text_width(&label, CARD_FOOTER_SIZE)) / 2.0;
    footer.push(label, LabelFont::Helvetica, CARD_FOOTER_SIZE, x, 28.8);

    LabelPage {
        width,
        height,
        regions: vec![message_region, footer],
        rules: Vec::new(),
        order_number: order.order_number.clone(),
        sku: item.sku.clone(),
    }
}

/// Greedy word wrap to `max_width`. Words wider than a line are broken
/// between characters.
pub fn wrap_text(text: &str, font: LabelFont, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;
    let space_width = font.char_width(' ') * size / 1000.0;

    for word in text.split_whitespace() {
        let word_width = font.text_width(word, size);

        if word_width > max_width {
            // Fill the current line, then hard-break the rest
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut chunk = String::new();
            let mut chunk_width = 0.0;
            for c in word.chars() {
                let w = font.char_width(c) * size / 1000.0;
                if chunk_width + w > max_width && !chunk.is_empty() {
                    lines.push(std::mem::take(&mut chunk));
                    chunk_width = 0.0;
                }
                chunk.push(c);
                chunk_width += w;
            }
            current = chunk;
            current_width = chunk_width;
        } else if current.is_empty() {
            current = word.to_string();
            current_width = word_width;
        } else if current_width + space_width + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space_width + word_width;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// `text` unchanged when it fits, otherwise cut to end in "…".
pub fn ellipsize(text: &str, font: LabelFont, size: f32, max_width: f32) -> String {
    if font.text_width(text, size) <= max_width {
        text.to_string()
    } else {
        with_ellipsis(text, font, size, max_width)
    }
}

/// Cut `text` so that it fits with a trailing "…".
fn with_ellipsis(text: &str, font: LabelFont, size: f32, max_width: f32) -> String {
    let budget = max_width - font.char_width(ELLIPSIS) * size / 1000.0;
    let mut out = String::new();
    let mut width = 0.0;
    for c in text.chars() {
        let w = font.char_width(c) * size / 1000.0;
        if width + w > budget {
            break;
        }
        out.push(c);
        width += w;
    }
    let mut out = out.trim_end().to_string();
    out.push(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record() -> (OrderRecord, LineItem) {
        let mut order = OrderRecord::new("112-3456789-0123456", "slips.pdf");
        order.order_date = NaiveDate::from_ymd_opt(2024, 10, 12);
        order.buyer_name = Some("Jane Doe".to_string());
        (order, LineItem::new("TWL-RED-12", 2))
    }

    fn texts(page: &LabelPage, kind: RegionKind) -> Vec<String> {
        page.region(kind)
            .map(|r| r.runs.iter().map(|run| run.text.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_default_geometry() {
        let layout = LabelLayout::new(&LabelConfig::default());
        assert_eq!(layout.header.top(), 252.0);
        assert_eq!(layout.footer.y, 18.0);
        assert_eq!(layout.customization_capacity, 5);
        assert!(layout.product.y > layout.customization.top());
        assert!(layout.customization.y > layout.gift.top());
        assert!(layout.gift.y > layout.footer.top());
    }

    #[test]
    fn test_compose_scenario() {
        let (order, item) = record();
        let page = LabelLayout::new(&LabelConfig::default()).compose(&order, &item, 1, 1);

        assert_eq!((page.width, page.height), (432.0, 288.0));
        assert_eq!(
            texts(&page, RegionKind::Header),
            vec!["Order 112-3456789-0123456", "Oct 12, 2024", "Jane Doe"]
        );
        assert_eq!(texts(&page, RegionKind::Product), vec!["TWL-RED-12 × 2"]);
        assert!(texts(&page, RegionKind::Customization).is_empty());
        assert!(texts(&page, RegionKind::Gift).is_empty());
        assert_eq!(
            texts(&page, RegionKind::Footer),
            vec!["Check personalization before production", "slips.pdf · 1 / 1"]
        );
    }

    #[test]
    fn test_short_customization_unmodified() {
        let (order, mut item) = record();
        item.customization = Some("Washcloth: Emma\nHand Towel: Lopez".to_string());
        let page = LabelLayout::new(&LabelConfig::default()).compose(&order, &item, 1, 1);
        let lines = texts(&page, RegionKind::Customization);
        assert_eq!(lines, vec!["• Washcloth: Emma", "• Hand Towel: Lopez"]);
        assert!(lines.iter().all(|l| !l.contains('…')));
    }

    #[test]
    fn test_long_customization_truncated() {
        let (order, mut item) = record();
        let long = (1..=12).map(|n| format!("Line {}: Monogram", n)).collect::<Vec<_>>();
        item.customization = Some(long.join("\n"));
        let layout = LabelLayout::new(&LabelConfig::default());
        let page = layout.compose(&order, &item, 1, 1);

        let lines = texts(&page, RegionKind::Customization);
        assert_eq!(lines.len(), layout.customization_capacity);
        assert!(lines.last().unwrap().ends_with('…'));
        assert!(lines[..lines.len() - 1].iter().all(|l| !l.ends_with('…')));

        // Every run stays inside the region
        let region = page.region(RegionKind::Customization).unwrap();
        for run in &region.runs {
            assert!(run.y >= region.rect.y);
            assert!(run.x + run.font.text_width(&run.text, run.size) <= region.rect.right() + 0.01);
        }
    }

    #[test]
    fn test_single_long_entry_wrapped_then_truncated() {
        let (order, mut item) = record();
        let words = "The Lopez Family Est 2024 ".repeat(20);
        item.customization = Some(format!("Bath Towel: {}", words.trim_end()));
        let layout = LabelLayout::new(&LabelConfig::default());
        let config = LabelConfig::default();

        let wrapped = wrap_text(
            item.customization.as_deref().unwrap(),
            LabelFont::Helvetica,
            config.body_font_size,
            layout.customization.width,
        );
        assert!(wrapped.len() > layout.customization_capacity);

        let page = layout.compose(&order, &item, 1, 1);
        let lines = texts(&page, RegionKind::Customization);
        assert_eq!(lines.len(), layout.customization_capacity);
        assert!(lines[0].starts_with("• Bath Towel: The Lopez"));
        assert!(lines[1..].iter().all(|l| !l.starts_with('•')));
        assert!(lines.last().unwrap().ends_with('…'));
        assert_eq!(lines.iter().filter(|l| l.contains('…')).count(), 1);

        let region = page.region(RegionKind::Customization).unwrap();
        for run in &region.runs {
            assert!(run.y >= region.rect.y);
            assert!(run.x >= region.rect.x);
            assert!(run.x + run.font.text_width(&run.text, run.size) <= region.rect.right() + 0.01);
        }
    }

    #[test]
    fn test_gift_region() {
        let (order, mut item) = record();
        item.gift = true;
        item.gift_message = Some("Happy birthday!".to_string());
        let page = LabelLayout::new(&LabelConfig::default()).compose(&order, &item, 2, 3);
        assert_eq!(
            texts(&page, RegionKind::Gift),
            vec!["GIFT · Wrap: No", "Happy birthday!"]
        );
        assert_eq!(texts(&page, RegionKind::Footer)[1], "slips.pdf · 2 / 3");
    }

    #[test]
    fn test_product_details_lines() {
        let (order, mut item) = record();
        item.sku = "Set-3Pcs-White".to_string();
        item.title = "Personalized Towel Set".to_string();
        item.thread_color = Some("Navy".to_string());
        item.font = Some("Script".to_string());
        let page = LabelLayout::new(&LabelConfig::default()).compose(&order, &item, 1, 1);
        assert_eq!(
            texts(&page, RegionKind::Product),
            vec![
                "Set-3Pcs-White × 2",
                "Personalized Towel Set",
                "3-Piece Towel Set – White",
                "Thread: Navy | Azul Marino   Font: Script",
            ]
        );
    }

    #[test]
    fn test_wrap_text() {
        let font = LabelFont::Helvetica;
        let lines = wrap_text("aaa bbb ccc", font, 10.0, font.text_width("aaa bbb", 10.0) + 1.0);
        assert_eq!(lines, vec!["aaa bbb", "ccc"]);

        // Over-long word is broken by character
        let lines = wrap_text("WWWWWWWWWW", font, 10.0, 30.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "WWWWWWWWWW");
    }

    #[test]
    fn test_ellipsize() {
        let font = LabelFont::Helvetica;
        assert_eq!(ellipsize("short", font, 10.0, 100.0), "short");
        let cut = ellipsize("a much longer piece of text", font, 10.0, 50.0);
        assert!(cut.ends_with('…'));
        assert!(font.text_width(&cut, 10.0) <= 50.0);
    }

    #[test]
    fn test_gift_card_centered() {
        let (order, item) = record();
        let page = compose_gift_card(&order, &item, "Enjoy your new towels");
        assert_eq!((page.width, page.height), (288.0, 432.0));
        let run = &page.region(RegionKind::Gift).unwrap().runs[0];
        let width = run.font.text_width(&run.text, run.size);
        assert!(((run.x + width / 2.0) - 144.0).abs() < 0.01);
        assert_eq!(texts(&page, RegionKind::Footer), vec!["Jane Doe – 112-3456789-0123456"]);
    }
}
