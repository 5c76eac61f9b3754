// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine-agnostic trait definitions.
//
// A backend opens a file into an `EngineDocument`, answers geometry queries
// for 1-based page numbers and rasterizes a page region into a buffer whose
// ownership moves to the caller.

use std::fmt;
use std::num::NonZeroU32;
use std::path::Path;

use folio_core::geometry::RectD;
use folio_core::types::{PixelSize, Rotation};

use crate::error::EngineError;

/// A 1-based page number as engines count pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    /// `None` for zero.
    pub fn new(number: u32) -> Option<Self> {
        NonZeroU32::new(number).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything a backend needs to rasterize one page region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    pub page: PageNumber,
    /// Pixels per dot.
    pub zoom: f32,
    pub rotation: Rotation,
    /// Page region in dots, origin at the top-left of the media box.
    pub region: RectD,
    /// Exact output size, already rotated. Backends must produce this size.
    pub size: PixelSize,
}

impl RenderRequest {
    /// Output size before rotation is applied.
    pub fn unrotated_size(&self) -> PixelSize {
        if self.rotation.is_sideways() {
            self.size.transposed()
        } else {
            self.size
        }
    }
}

/// Pixels produced by a backend. The buffer is moved out of the engine; the
/// receiver is its only owner.
#[derive(Debug)]
pub struct RawPixels {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    /// Row-major, channel-interleaved.
    pub data: Vec<u8>,
}

/// Opens documents of the format(s) a backend understands.
pub trait Engine: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Whether `path` looks like a file this engine can open.
    fn is_supported(&self, path: &Path) -> bool;

    fn open(&self, path: &Path) -> Result<Box<dyn EngineDocument>, EngineError>;
}

/// An opened document. Dropping it releases every engine resource it holds.
pub trait EngineDocument: Send + Sync {
    fn page_count(&self) -> u32;

    /// Nominal resolution used to convert dots to physical units.
    fn file_dpi(&self) -> f32;

    fn page_media_box(&self, page: PageNumber) -> Result<RectD, EngineError>;

    /// Tight box around the visible content, or `None` when the backend
    /// cannot detect content.
    fn page_content_box(&self, page: PageNumber) -> Result<Option<RectD>, EngineError>;

    fn render_page_to_pixels(&self, request: &RenderRequest) -> Result<RawPixels, EngineError>;

    /// Whether concurrent renders on this document must be serialized by the
    /// caller.
    fn serialized_render(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_number_rejects_zero() {
        assert!(PageNumber::new(0).is_none());
        assert_eq!(PageNumber::new(3).map(PageNumber::get), Some(3));
    }

    #[test]
    fn sideways_request_renders_transposed() {
        let request = RenderRequest {
            page: PageNumber::new(1).unwrap(),
            zoom: 1.0,
            rotation: Rotation::Cw90,
            region: RectD::new(0.0, 0.0, 10.0, 20.0),
            size: PixelSize::new(20, 10),
        };
        assert_eq!(request.unrotated_size(), PixelSize::new(10, 20));
    }
}
