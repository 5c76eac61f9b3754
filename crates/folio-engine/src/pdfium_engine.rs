// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDFium backend — full rasterization through `pdfium-render`.
//
// `Pdfium` is neither Send nor Sync, so the library is bound and the document
// reloaded from the retained bytes for each operation. Geometry is captured
// once at open time.

use std::path::Path;

use folio_core::geometry::RectD;
use folio_core::types::Rotation;
use image::{Rgba, RgbaImage, imageops};
use pdfium_render::prelude::*;
use tracing::{debug, info, instrument};

use crate::error::EngineError;
use crate::sniff;
use crate::traits::{Engine, EngineDocument, PageNumber, RawPixels, RenderRequest};

const PDF_DPI: f32 = 72.0;

const PAPER_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumEngine;

fn bind_pdfium() -> Result<Pdfium, EngineError> {
    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|err| EngineError::Unavailable(err.to_string()))
}

fn classify_load_error(err: PdfiumError) -> EngineError {
    match err {
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
            EngineError::Encrypted
        }
        other => EngineError::Malformed(other.to_string()),
    }
}

impl Engine for PdfiumEngine {
    fn name(&self) -> &str {
        "pdfium"
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
        if !sniff::has_pdf_header(&bytes) {
            return Err(EngineError::Unrecognized(path.display().to_string()));
        }

        let page_sizes = {
            let pdfium = bind_pdfium()?;
            let document = pdfium
                .load_pdf_from_byte_slice(&bytes, None)
                .map_err(classify_load_error)?;
            document
                .pages()
                .iter()
                .map(|page| (page.width().value, page.height().value))
                .collect::<Vec<_>>()
        };

        info!(pages = page_sizes.len(), "PDF opened with PDFium");
        Ok(Box::new(PdfiumDocument { bytes, page_sizes }))
    }
}

pub struct PdfiumDocument {
    bytes: Vec<u8>,
    /// Width and height in points, indexed from zero.
    page_sizes: Vec<(f32, f32)>,
}

impl PdfiumDocument {
    /// PDFium counts pages from zero.
    fn slot(&self, page: PageNumber) -> Result<usize, EngineError> {
        let slot = (page.get() - 1) as usize;
        if slot < self.page_sizes.len() {
            Ok(slot)
        } else {
            Err(EngineError::NoSuchPage(page.get()))
        }
    }
}

/// PDFium addresses pages with a `u16`; a slot beyond that range is no page.
fn pdfium_index(slot: usize, page: PageNumber) -> Result<u16, EngineError> {
    u16::try_from(slot).map_err(|_| EngineError::NoSuchPage(page.get()))
}

impl EngineDocument for PdfiumDocument {
    fn page_count(&self) -> u32 {
        self.page_sizes.len() as u32
    }

    fn file_dpi(&self) -> f32 {
        PDF_DPI
    }

    fn page_media_box(&self, page: PageNumber) -> Result<RectD, EngineError> {
        let (width, height) = self.page_sizes[self.slot(page)?];
        Ok(RectD::new(0.0, 0.0, f64::from(width), f64::from(height)))
    }

    fn page_content_box(&self, page: PageNumber) -> Result<Option<RectD>, EngineError> {
        self.slot(page)?;
        Ok(None)
    }

    fn render_page_to_pixels(&self, request: &RenderRequest) -> Result<RawPixels, EngineError> {
        let slot = self.slot(request.page)?;
        let (page_w, page_h) = self.page_sizes[slot];
        let zoom = f64::from(request.zoom);

        let pdfium = bind_pdfium()?;
        let document = pdfium
            .load_pdf_from_byte_slice(&self.bytes, None)
            .map_err(|err| EngineError::Render(err.to_string()))?;
        let page = document
            .pages()
            .get(pdfium_index(slot, request.page)?)
            .map_err(|_| EngineError::NoSuchPage(request.page.get()))?;

        let full_w = (f64::from(page_w) * zoom).round().max(1.0) as i32;
        let full_h = (f64::from(page_h) * zoom).round().max(1.0) as i32;
        let config = PdfRenderConfig::new()
            .set_target_width(full_w)
            .set_target_height(full_h)
            .render_form_data(true)
            .render_annotations(true);
        let full = page
            .render_with_config(&config)
            .map_err(|err| EngineError::Render(err.to_string()))?
            .as_image()
            .to_rgba8();

        // Place the requested region onto a canvas of the exact output size.
        let unrotated = request.unrotated_size();
        let mut canvas = RgbaImage::from_pixel(unrotated.width, unrotated.height, PAPER_WHITE);
        let origin = request.region.scale_uniform(zoom).round_nearest();
        imageops::overlay(&mut canvas, &full, -i64::from(origin.x), -i64::from(origin.y));

        let canvas = match request.rotation {
            Rotation::None => canvas,
            Rotation::Cw90 => imageops::rotate90(&canvas),
            Rotation::Cw180 => imageops::rotate180(&canvas),
            Rotation::Cw270 => imageops::rotate270(&canvas),
        };
        debug!(page = %request.page, size = %request.size, "page rasterized with PDFium");

        Ok(RawPixels {
            width: canvas.width(),
            height: canvas.height(),
            channels: 4,
            data: canvas.into_raw(),
        })
    }
}
