// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lopdf backend — page tree and page boxes from the `lopdf` crate.
//
// lopdf parses but does not paint, so rasterization produces the blank page:
// an opaque white canvas of the requested size.

use std::collections::BTreeMap;
use std::path::Path;

use folio_core::geometry::RectD;
use image::{Rgba, RgbaImage};
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, info, instrument, warn};

use crate::error::EngineError;
use crate::sniff;
use crate::traits::{Engine, EngineDocument, PageNumber, RawPixels, RenderRequest};

/// PDF user space: 72 units per inch.
pub const PDF_DPI: f32 = 72.0;

/// Used when neither the page nor any ancestor declares a /MediaBox.
pub const US_LETTER: RectD = RectD::new(0.0, 0.0, 612.0, 792.0);

/// Guards against /Parent cycles in malformed page trees.
const MAX_INHERITANCE_DEPTH: usize = 64;

const PAPER_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Engine backed by `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfEngine;

impl Engine for LopdfEngine {
    fn name(&self) -> &str {
        "lopdf"
    }

    fn is_supported(&self, path: &Path) -> bool {
        sniff::sniff_pdf_file(path).unwrap_or(false)
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    fn open(&self, path: &Path) -> Result<Box<dyn EngineDocument>, EngineError> {
        let bytes = std::fs::read(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = LopdfDocument::from_bytes(&bytes).map_err(|err| match err {
            EngineError::Unrecognized(_) => EngineError::Unrecognized(path.display().to_string()),
            other => other,
        })?;
        info!(pages = document.page_count(), "PDF opened");
        Ok(Box::new(document))
    }
}

/// Page boxes resolved once at open time.
#[derive(Debug, Clone, Copy)]
struct PageBoxes {
    media: RectD,
}

/// An opened PDF. Holds only resolved geometry; the parsed object graph is
/// released once the page tree has been walked.
#[derive(Debug)]
pub struct LopdfDocument {
    /// Keyed by lopdf's own 1-based page numbers.
    pages: BTreeMap<u32, PageBoxes>,
}

impl LopdfDocument {
    /// Parse a PDF already in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        if !sniff::has_pdf_header(bytes) {
            return Err(EngineError::Unrecognized("missing %PDF- header".into()));
        }

        let document =
            Document::load_mem(bytes).map_err(|err| EngineError::Malformed(err.to_string()))?;
        if document.is_encrypted() {
            return Err(EngineError::Encrypted);
        }

        let pages = document
            .get_pages()
            .into_iter()
            .map(|(number, page_id)| {
                let media = inherited_rect(&document, page_id, b"MediaBox").unwrap_or_else(|| {
                    warn!(number, "page has no usable /MediaBox, assuming US Letter");
                    US_LETTER
                });
                (number, PageBoxes { media })
            })
            .collect();

        Ok(Self { pages })
    }

    fn page(&self, page: PageNumber) -> Result<&PageBoxes, EngineError> {
        self.pages
            .get(&page.get())
            .ok_or(EngineError::NoSuchPage(page.get()))
    }
}

impl EngineDocument for LopdfDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn file_dpi(&self) -> f32 {
        PDF_DPI
    }

    fn page_media_box(&self, page: PageNumber) -> Result<RectD, EngineError> {
        Ok(self.page(page)?.media)
    }

    fn page_content_box(&self, page: PageNumber) -> Result<Option<RectD>, EngineError> {
        // Content detection needs painting.
        self.page(page)?;
        Ok(None)
    }

    fn render_page_to_pixels(&self, request: &RenderRequest) -> Result<RawPixels, EngineError> {
        self.page(request.page)?;
        let canvas = RgbaImage::from_pixel(request.size.width, request.size.height, PAPER_WHITE);
        debug!(page = %request.page, size = %request.size, "blank page rasterized");

        Ok(RawPixels {
            width: canvas.width(),
            height: canvas.height(),
            channels: 4,
            data: canvas.into_raw(),
        })
    }

    fn serialized_render(&self) -> bool {
        false
    }
}

/// Look up a rectangle on the page dictionary, walking /Parent links for
/// inheritable attributes.
fn inherited_rect(document: &Document, page_id: ObjectId, key: &[u8]) -> Option<RectD> {
    let mut current = Some(page_id);
    for _ in 0..MAX_INHERITANCE_DEPTH {
        let id = current?;
        let dict = document.get_object(id).ok()?.as_dict().ok()?;
        if let Ok(value) = dict.get(key) {
            return parse_rect(document, value);
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    warn!("page tree deeper than {MAX_INHERITANCE_DEPTH} levels");
    None
}

/// `[llx lly urx ury]`, any entry possibly indirect.
fn parse_rect(document: &Document, value: &Object) -> Option<RectD> {
    let values = resolve(document, value)?.as_array().ok()?;
    if values.len() != 4 {
        return None;
    }
    let mut coords = [0.0f64; 4];
    for (slot, item) in coords.iter_mut().zip(values) {
        *slot = number(resolve(document, item)?)?;
    }
    let [llx, lly, urx, ury] = coords;
    Some(RectD::from_corners(llx, lly, urx, ury))
}

fn resolve<'a>(document: &'a Document, value: &'a Object) -> Option<&'a Object> {
    match value {
        Object::Reference(id) => document.get_object(*id).ok(),
        other => Some(other),
    }
}

fn number(value: &Object) -> Option<f64> {
    match value {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}
