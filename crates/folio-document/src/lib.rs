// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-document — Document facade for the Folio rasterizer.
//
// Opens documents through an engine backend, answers page geometry queries
// with 0-based page indices, rasterizes pages into owned RGBA bitmaps and
// writes bitmaps out for inspection.

pub mod bitmap;
pub mod document;
pub mod encode;
pub mod render;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the primary structs so callers can use `folio_document::Document` etc.
pub use bitmap::Bitmap;
pub use document::Document;
pub use encode::bmp::{BmpEncoder, write_bmp};
pub use encode::{OutputFormat, save};
pub use render::{output_size, render_page};
