// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF canvas — an in-memory lopdf document with drawing primitives in point
// coordinates (bottom-left origin).
//
// Drawing always targets the last page of the document. During authoring the
// canvas holds exactly one page; the assembler uses it to collect many.

use std::collections::HashMap;

use folio_core::Rgba;
use folio_core::error::FolioError;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use tracing::{debug, instrument};

use super::{copy, embed, pdf_error};
use crate::font::Font;

/// Stroke settings for lines and rectangle borders, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
    /// Dash and gap lengths; `None` draws a solid stroke.
    pub dash: Option<(f64, f64)>,
}

/// A parsed PDF whose pages can be copied into a [`PdfCanvas`].
pub struct SourceDocument {
    document: Document,
}

impl SourceDocument {
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, FolioError> {
        let document = Document::load_mem(data).map_err(pdf_error("failed to load PDF"))?;
        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// 1-indexed page numbers in document order.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.document.get_pages().keys().copied().collect()
    }

    /// Size of page `page_number` (1-indexed) in points.
    pub fn page_size(&self, page_number: u32) -> Result<(f64, f64), FolioError> {
        media_box_size(&self.document, self.page_id(page_number)?)
    }

    fn page_id(&self, page_number: u32) -> Result<ObjectId, FolioError> {
        self.document
            .get_pages()
            .get(&page_number)
            .copied()
            .ok_or(FolioError::PageNotFound(page_number as usize))
    }
}

/// The active in-memory document.
pub struct PdfCanvas {
    document: Document,
    pages_id: ObjectId,
    /// Page currently drawn on and its overlay content stream.
    overlay: Option<(ObjectId, ObjectId)>,
    /// Font key -> resource name on the overlay page.
    fonts: HashMap<String, String>,
    /// Alpha pair -> ExtGState resource name on the overlay page.
    states: HashMap<String, String>,
}

impl PdfCanvas {
    /// An empty document with a catalog and an empty page tree.
    pub fn new(version: &str) -> Self {
        let mut document = Document::with_version(version);
        let pages_id = document.new_object_id();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => Object::Name(b"Pages".to_vec()),
                "Kids" => Object::Array(Vec::new()),
                "Count" => Object::Integer(0),
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => Object::Name(b"Catalog".to_vec()),
            "Pages" => Object::Reference(pages_id),
        });
        document.trailer.set("Root", Object::Reference(catalog_id));

        Self {
            document,
            pages_id,
            overlay: None,
            fonts: HashMap::new(),
            states: HashMap::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Append a blank page of `width` x `height` points.
    pub fn add_page(&mut self, width: f64, height: f64) -> Result<ObjectId, FolioError> {
        let page_id = self.document.add_object(dictionary! {
            "Type" => Object::Name(b"Page".to_vec()),
            "Parent" => Object::Reference(self.pages_id),
            "MediaBox" => Object::Array(vec![real(0.0), real(0.0), real(width), real(height)]),
            "Resources" => Dictionary::new(),
        });

        let pages = self
            .document
            .get_object_mut(self.pages_id)
            .and_then(Object::as_dict_mut)
            .map_err(pdf_error("page tree missing"))?;
        if let Ok(Object::Array(kids)) = pages.get_mut(b"Kids") {
            kids.push(Object::Reference(page_id));
        }
        let count = match pages.get(b"Count") {
            Ok(Object::Integer(count)) => *count,
            _ => 0,
        };
        pages.set("Count", Object::Integer(count + 1));

        debug!(width, height, "Page added");
        Ok(page_id)
    }

    /// Copy page `page_number` (1-indexed) of `source` to the end of this
    /// document.
    #[instrument(skip(self, source))]
    pub fn copy_page_from(
        &mut self,
        source: &SourceDocument,
        page_number: u32,
    ) -> Result<ObjectId, FolioError> {
        let source_page = source.page_id(page_number)?;
        copy::copy_page(&source.document, source_page, &mut self.document, self.pages_id)
    }

    /// Size of the active page in points, from its (possibly inherited)
    /// media box.
    pub fn page_size(&self) -> Result<(f64, f64), FolioError> {
        media_box_size(&self.document, self.active_page()?)
    }

    // -- Drawing --------------------------------------------------------------

    /// Draw `text` with its baseline starting at (`x`, `y`).
    pub fn draw_text(
        &mut self,
        font: &Font,
        text: &str,
        x: f64,
        y: f64,
        size: f64,
        color: Rgba,
    ) -> Result<(), FolioError> {
        let encoded = font.encode(text)?;
        let overlay = self.sync_page()?;
        let font_name = self.font_resource(font)?;
        let state = self.alpha_state(color.a, 1.0)?;

        let mut ops = vec![Operation::new("q", vec![])];
        if let Some(state) = state {
            ops.push(Operation::new("gs", vec![name(&state)]));
        }
        ops.extend([
            Operation::new("rg", rgb(color)),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![name(&font_name), real(size)]),
            Operation::new("Td", vec![real(x), real(y)]),
            Operation::new("Tj", vec![Object::String(encoded, StringFormat::Hexadecimal)]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ]);
        self.append(overlay, ops)
    }

    /// Draw a straight line between two points.
    pub fn draw_line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        stroke: &Stroke,
    ) -> Result<(), FolioError> {
        let overlay = self.sync_page()?;
        let state = self.alpha_state(1.0, stroke.color.a)?;

        let mut ops = vec![Operation::new("q", vec![])];
        if let Some(state) = state {
            ops.push(Operation::new("gs", vec![name(&state)]));
        }
        ops.extend(stroke_ops(stroke));
        ops.extend([
            Operation::new("m", vec![real(from.0), real(from.1)]),
            Operation::new("l", vec![real(to.0), real(to.1)]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
        self.append(overlay, ops)
    }

    /// Draw a rectangle whose bottom-left corner is (`x`, `y`).
    pub fn draw_rectangle(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Rgba>,
        stroke: Option<&Stroke>,
    ) -> Result<(), FolioError> {
        let overlay = self.sync_page()?;
        let fill_alpha = fill.map_or(1.0, |c| c.a);
        let stroke_alpha = stroke.map_or(1.0, |s| s.color.a);
        let state = self.alpha_state(fill_alpha, stroke_alpha)?;

        let mut ops = vec![Operation::new("q", vec![])];
        if let Some(state) = state {
            ops.push(Operation::new("gs", vec![name(&state)]));
        }
        if let Some(color) = fill {
            ops.push(Operation::new("rg", rgb(color)));
        }
        if let Some(stroke) = stroke {
            ops.extend(stroke_ops(stroke));
        }
        ops.push(Operation::new(
            "re",
            vec![real(x), real(y), real(width), real(height)],
        ));
        let paint = match (fill.is_some(), stroke.is_some()) {
            (true, true) => "B",
            (true, false) => "f",
            (false, true) => "S",
            (false, false) => "n",
        };
        ops.push(Operation::new(paint, vec![]));
        ops.push(Operation::new("Q", vec![]));
        self.append(overlay, ops)
    }

    // -- Serialisation --------------------------------------------------------

    /// Serialise the document as-is.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, FolioError> {
        let mut output = Vec::new();
        self.document.save_to(&mut output)?;
        Ok(output)
    }

    /// Serialise as a final output file: stamp the info dictionary and
    /// optionally compress streams.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn finish(mut self, compress: bool) -> Result<Vec<u8>, FolioError> {
        let created = chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
        let info_id = self.document.add_object(dictionary! {
            "Producer" => Object::string_literal(concat!("folio ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(created),
        });
        self.document.trailer.set("Info", Object::Reference(info_id));
        if compress {
            self.document.compress();
        }
        self.to_bytes()
    }

    // -- Helpers --------------------------------------------------------------

    fn active_page(&self) -> Result<ObjectId, FolioError> {
        self.document
            .get_pages()
            .values()
            .next_back()
            .copied()
            .ok_or_else(|| FolioError::Pdf("document has no pages".into()))
    }

    /// Make sure the active page has an overlay content stream and return it.
    /// Resource caches are reset whenever the active page changes.
    fn sync_page(&mut self) -> Result<ObjectId, FolioError> {
        let page_id = self.active_page()?;
        if let Some((page, stream)) = self.overlay {
            if page == page_id {
                return Ok(stream);
            }
        }
        self.fonts.clear();
        self.states.clear();

        let existing = self
            .document
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(pdf_error("cannot read page"))?
            .get(b"Contents")
            .ok()
            .cloned();
        let mut existing = match existing {
            Some(Object::Reference(id)) => match self.document.get_object(id) {
                Ok(Object::Array(items)) => items.clone(),
                _ => vec![Object::Reference(id)],
            },
            Some(Object::Array(items)) => items,
            _ => Vec::new(),
        };

        let overlay_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), Vec::new()));
        let mut contents = Vec::with_capacity(existing.len() + 3);
        if !existing.is_empty() {
            // Isolate the page's own graphics state from what we draw.
            let save = self.document.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
            let restore = self.document.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
            contents.push(Object::Reference(save));
            contents.append(&mut existing);
            contents.push(Object::Reference(restore));
        }
        contents.push(Object::Reference(overlay_id));

        self.document
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(pdf_error("cannot update page"))?
            .set("Contents", Object::Array(contents));
        self.overlay = Some((page_id, overlay_id));
        Ok(overlay_id)
    }

    fn append(&mut self, overlay: ObjectId, operations: Vec<Operation>) -> Result<(), FolioError> {
        let encoded = Content { operations }
            .encode()
            .map_err(pdf_error("failed to encode content"))?;
        match self.document.get_object_mut(overlay) {
            Ok(Object::Stream(stream)) => {
                let mut content = stream.content.clone();
                content.extend(encoded);
                stream.set_content(content);
                Ok(())
            }
            _ => Err(FolioError::Pdf("overlay content stream missing".into())),
        }
    }

    fn font_resource(&mut self, font: &Font) -> Result<String, FolioError> {
        if let Some(name) = self.fonts.get(font.key()) {
            return Ok(name.clone());
        }
        let object = embed::font_object(&mut self.document, font)?;
        let name = self.register_resource(b"Font", "FolioF", object)?;
        debug!(font = font.key(), resource = %name, "Font embedded");
        self.fonts.insert(font.key().to_string(), name.clone());
        Ok(name)
    }

    /// ExtGState resource for non-opaque fill/stroke, if one is needed.
    fn alpha_state(&mut self, fill: f64, stroke: f64) -> Result<Option<String>, FolioError> {
        if fill >= 1.0 && stroke >= 1.0 {
            return Ok(None);
        }
        let key = format!("{fill:.3}/{stroke:.3}");
        if let Some(name) = self.states.get(&key) {
            return Ok(Some(name.clone()));
        }
        let object = Object::Dictionary(dictionary! {
            "Type" => Object::Name(b"ExtGState".to_vec()),
            "ca" => real(fill),
            "CA" => real(stroke),
        });
        let name = self.register_resource(b"ExtGState", "FolioGS", object)?;
        self.states.insert(key, name.clone());
        Ok(Some(name))
    }

    /// Add `object` under `category` in the active page's resources, choosing
    /// a name not already used on the page.
    fn register_resource(
        &mut self,
        category: &[u8],
        prefix: &str,
        object: Object,
    ) -> Result<String, FolioError> {
        let page_id = self.active_page()?;
        let resources_id = self.indirect_entry(page_id, b"Resources")?;
        let category_id = self.indirect_entry(resources_id, category)?;
        let object_id = self.document.add_object(object);

        let dict = self
            .document
            .get_object_mut(category_id)
            .and_then(Object::as_dict_mut)
            .map_err(pdf_error("resource dictionary is not a dictionary"))?;
        let mut index = 1;
        let mut name = format!("{prefix}{index}");
        while dict.has(name.as_bytes()) {
            index += 1;
            name = format!("{prefix}{index}");
        }
        dict.set(name.clone(), Object::Reference(object_id));
        Ok(name)
    }

    /// Ensure `holder[key]` is a reference to a dictionary object, moving an
    /// inline dictionary out into its own object. Returns that object's id.
    fn indirect_entry(&mut self, holder: ObjectId, key: &[u8]) -> Result<ObjectId, FolioError> {
        let existing = self
            .document
            .get_object(holder)
            .and_then(Object::as_dict)
            .map_err(pdf_error("expected a dictionary"))?
            .get(key)
            .ok()
            .cloned();
        let id = match existing {
            Some(Object::Reference(id)) => return Ok(id),
            Some(Object::Dictionary(dict)) => self.document.add_object(dict),
            _ => self.document.add_object(Dictionary::new()),
        };
        self.document
            .get_object_mut(holder)
            .and_then(Object::as_dict_mut)
            .map_err(pdf_error("expected a dictionary"))?
            .set(key.to_vec(), Object::Reference(id));
        Ok(id)
    }
}

/// Width and height of a page's media box, rounded to hundredths of a point.
fn media_box_size(document: &Document, page_id: ObjectId) -> Result<(f64, f64), FolioError> {
    let media_box = copy::inherited_attribute(document, page_id, b"MediaBox")
        .ok_or_else(|| FolioError::Pdf("page has no media box".into()))?;
    let media_box = match media_box {
        Object::Reference(id) => document
            .get_object(id)
            .map_err(pdf_error("cannot resolve media box"))?
            .clone(),
        other => other,
    };
    let values: Vec<f64> = match &media_box {
        Object::Array(items) => items.iter().filter_map(number).collect(),
        _ => Vec::new(),
    };
    if values.len() != 4 {
        return Err(FolioError::Pdf(format!("malformed media box: {media_box:?}")));
    }
    Ok((
        round2((values[2] - values[0]).abs()),
        round2((values[3] - values[1]).abs()),
    ))
}

fn stroke_ops(stroke: &Stroke) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("RG", rgb(stroke.color)),
        Operation::new("w", vec![real(stroke.width)]),
    ];
    if let Some((dash, gap)) = stroke.dash {
        ops.push(Operation::new(
            "d",
            vec![Object::Array(vec![real(dash), real(gap)]), Object::Integer(0)],
        ));
    }
    ops
}

fn rgb(color: Rgba) -> Vec<Object> {
    vec![real(color.r), real(color.g), real(color.b)]
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(*value as f64),
        _ => None,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
