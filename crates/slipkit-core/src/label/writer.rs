//! Serializes composed label pages with lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::trace;

use crate::error::RenderError;

use super::layout::{LabelPage, TextRun};
use super::metrics::{encode_win_ansi, LabelFont};

/// Builds one PDF document page by page. Nothing is written until
/// [`LabelWriter::finish`], and no timestamps or ids are embedded, so the
/// same pages always produce the same bytes.
pub struct LabelWriter {
    doc: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl LabelWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in LabelFont::ALL {
            let font_id = doc.add_object(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Font".to_vec())),
                ("Subtype", Object::Name(b"Type1".to_vec())),
                ("BaseFont", Object::Name(font.base_font().as_bytes().to_vec())),
                ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
            ]));
            fonts.set(font.resource(), Object::Reference(font_id));
        }
        let resources_id = doc.add_object(Dictionary::from_iter(vec![(
            "Font",
            Object::Dictionary(fonts),
        )]));

        Self {
            doc,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
        }
    }

    /// Append one page.
    pub fn add_page(&mut self, page: &LabelPage) -> Result<(), RenderError> {
        let mut operations = Vec::new();

        for &(y, x0, x1) in &page.rules {
            operations.push(Operation::new("w", vec![number(0.5)]));
            operations.push(Operation::new("G", vec![number(0.6)]));
            operations.push(Operation::new("m", vec![number(x0), number(y)]));
            operations.push(Operation::new("l", vec![number(x1), number(y)]));
            operations.push(Operation::new("S", vec![]));
        }

        for run in page.runs() {
            let bytes = encode_win_ansi(&run.text).map_err(|character| RenderError::Unencodable {
                order_number: page.order_number.clone(),
                sku: page.sku.clone(),
                character,
            })?;
            text_operations(run, bytes, &mut operations);
        }

        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Serialize(e.to_string()))?;
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), encoded));

        let page_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(self.pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    number(page.width),
                    number(page.height),
                ]),
            ),
            ("Resources", Object::Reference(self.resources_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        trace!("page {} for order {} / {}", self.page_ids.len() + 1, page.order_number, page.sku);
        self.page_ids.push(page_id);
        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Close the page tree and serialize the document.
    pub fn finish(mut self) -> Result<Vec<u8>, RenderError> {
        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(self.page_ids.len() as i64)),
            (
                "Kids",
                Object::Array(self.page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
        ]);
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| RenderError::Serialize(e.to_string()))?;
        Ok(buffer)
    }
}

impl Default for LabelWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn text_operations(run: &TextRun, bytes: Vec<u8>, operations: &mut Vec<Operation>) {
    if run.gray > 0.0 {
        operations.push(Operation::new("g", vec![number(run.gray)]));
    }
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new(
        "Tf",
        vec![
            Object::Name(run.font.resource().as_bytes().to_vec()),
            number(run.size),
        ],
    ));
    operations.push(Operation::new("Td", vec![number(run.x), number(run.y)]));
    operations.push(Operation::new(
        "Tj",
        vec![Object::String(bytes, StringFormat::Literal)],
    ));
    operations.push(Operation::new("ET", vec![]));
    if run.gray > 0.0 {
        operations.push(Operation::new("g", vec![Object::Integer(0)]));
    }
}

/// Coordinates rounded to 1/100 pt; whole numbers are written as integers.
fn number(value: f32) -> Object {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        Object::Integer(rounded as i64)
    } else {
        Object::Real(rounded.into())
    }
}
