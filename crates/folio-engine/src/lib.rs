// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — Rendering engine boundary.
//
// Defines the narrow interface the document facade talks to and the backends
// behind it. Backends number pages from 1 and report failures with
// `EngineError`; the facade owns the translation to 0-based indices and to
// `FolioError`.

pub mod error;
pub mod lopdf_engine;
pub mod sniff;
pub mod traits;

#[cfg(feature = "pdfium")]
pub mod pdfium_engine;

pub use error::EngineError;
pub use lopdf_engine::LopdfEngine;
pub use traits::{Engine, EngineDocument, PageNumber, RawPixels, RenderRequest};

#[cfg(feature = "pdfium")]
pub use pdfium_engine::PdfiumEngine;

/// Returns the best engine compiled into this build.
pub fn default_engine() -> Box<dyn Engine> {
    #[cfg(feature = "pdfium")]
    {
        // Full rasterization through the system PDFium library.
        Box::new(pdfium_engine::PdfiumEngine)
    }
    #[cfg(not(feature = "pdfium"))]
    {
        // Geometry from lopdf; pixels are the blank page.
        Box::new(lopdf_engine::LopdfEngine)
    }
}
