// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document handle — owns one opened engine document and answers page
// geometry queries with 0-based page indices.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use folio_core::config::RenderLimits;
use folio_core::error::{FolioError, Result};
use folio_core::geometry::RectD;
use folio_core::types::RenderPageArgs;
use folio_engine::{Engine, EngineDocument, EngineError, PageNumber, default_engine};
use tracing::{debug, info, instrument, warn};

use crate::bitmap::Bitmap;

/// Where an engine error surfaced, for choosing the public error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Open,
    Query,
    Render,
}

/// An opened document.
///
/// Page count and DPI are fixed at open time. Page boxes are fetched from the
/// engine on every call. Dropping the handle (or calling [`Document::close`])
/// releases the engine document exactly once; the type system rules out any
/// use afterwards.
///
/// `Document` is `Send + Sync`: share it behind an `Arc` to render from
/// several threads. Renders are serialized per document when the engine
/// requires it; metadata queries never take the lock.
pub struct Document {
    engine_doc: Box<dyn EngineDocument>,
    engine_name: String,
    path: PathBuf,
    page_count: u32,
    file_dpi: f32,
    limits: RenderLimits,
    render_lock: Mutex<()>,
}

impl Document {
    // -- Construction ---------------------------------------------------------

    /// Whether the default engine recognizes the file's format.
    pub fn is_supported(path: impl AsRef<Path>) -> bool {
        default_engine().is_supported(path.as_ref())
    }

    /// Open a document with the default engine.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(default_engine().as_ref(), path)
    }

    /// Open a document with a specific engine.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), engine = engine.name()))]
    pub fn open_with(engine: &dyn Engine, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let engine_doc = engine
            .open(path)
            .map_err(|err| translate_engine_error(err, Stage::Open, path, 0))?;

        let page_count = engine_doc.page_count();
        let file_dpi = engine_doc.file_dpi();
        info!(page_count, file_dpi, "Document opened");

        Ok(Self {
            engine_doc,
            engine_name: engine.name().to_owned(),
            path: path.to_path_buf(),
            page_count,
            file_dpi,
            limits: RenderLimits::default(),
            render_lock: Mutex::new(()),
        })
    }

    /// Replace the render limits applied to this document.
    pub fn with_limits(mut self, limits: RenderLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Release the engine document. Equivalent to dropping the handle.
    pub fn close(self) {
        debug!(path = %self.path.display(), "Document closed");
    }

    // -- Inspection -----------------------------------------------------------

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the engine backend that opened this document.
    pub fn engine_name(&self) -> &str {
        &self.engine_name
    }

    /// Number of pages. Zero is valid.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Dots per inch of the file, for converting page boxes to physical units.
    pub fn file_dpi(&self) -> f32 {
        self.file_dpi
    }

    pub fn limits(&self) -> RenderLimits {
        self.limits
    }

    /// Media box of page `page_index` (0-based) in dots.
    pub fn page_media_box(&self, page_index: u32) -> Result<RectD> {
        let page = self.engine_page(page_index)?;
        self.media_box(page)
    }

    /// Box around the visible content of page `page_index` (0-based) in dots.
    ///
    /// Always within the media box. Falls back to the media box when the
    /// engine cannot detect content.
    pub fn page_content_box(&self, page_index: u32) -> Result<RectD> {
        let page = self.engine_page(page_index)?;
        let media = self.media_box(page)?;
        let content = self
            .engine_doc
            .page_content_box(page)
            .map_err(|err| self.translate(err, Stage::Query))?;

        let Some(content) = content else {
            return Ok(media);
        };
        let clipped = content.intersect(&media);
        if clipped.is_empty() {
            warn!(page_index, %content, %media, "content box outside media box, using media box");
            return Ok(media);
        }
        Ok(clipped)
    }

    /// Rasterize a page. See [`crate::render::render_page`].
    pub fn render(&self, args: &RenderPageArgs) -> Result<Bitmap> {
        crate::render::render_page(self, args)
    }

    // -- Engine boundary ------------------------------------------------------

    /// The one place a public 0-based index becomes an engine page number.
    pub(crate) fn engine_page(&self, page_index: u32) -> Result<PageNumber> {
        if page_index >= self.page_count {
            return Err(FolioError::OutOfRange {
                index: page_index,
                page_count: self.page_count,
            });
        }
        PageNumber::new(page_index + 1).ok_or(FolioError::OutOfRange {
            index: page_index,
            page_count: self.page_count,
        })
    }

    pub(crate) fn media_box(&self, page: PageNumber) -> Result<RectD> {
        self.engine_doc
            .page_media_box(page)
            .map_err(|err| self.translate(err, Stage::Query))
    }

    pub(crate) fn engine_doc(&self) -> &dyn EngineDocument {
        self.engine_doc.as_ref()
    }

    /// Held for the duration of an engine render when the engine is not
    /// re-entrant.
    pub(crate) fn render_guard(&self) -> Option<MutexGuard<'_, ()>> {
        if !self.engine_doc.serialized_render() {
            return None;
        }
        // Guards no data, so a poisoned lock is still usable.
        Some(
            self.render_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    pub(crate) fn translate(&self, err: EngineError, stage: Stage) -> FolioError {
        translate_engine_error(err, stage, &self.path, self.page_count)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.path)
            .field("engine", &self.engine_name)
            .field("page_count", &self.page_count)
            .field("file_dpi", &self.file_dpi)
            .finish_non_exhaustive()
    }
}

/// Map an engine failure onto the public taxonomy. Engine error values never
/// leave this crate.
fn translate_engine_error(err: EngineError, stage: Stage, path: &Path, page_count: u32) -> FolioError {
    match err {
        EngineError::Io { source, .. } if source.kind() == ErrorKind::NotFound => {
            FolioError::NotFound(path.to_path_buf())
        }
        EngineError::Io { source, .. } => FolioError::Io(source),
        EngineError::Unrecognized(detail) => FolioError::NotSupported(detail),
        EngineError::Encrypted => FolioError::PasswordRequired(path.to_path_buf()),
        EngineError::Malformed(detail) => FolioError::Corrupt(detail),
        EngineError::NoSuchPage(number) => FolioError::OutOfRange {
            index: number.saturating_sub(1),
            page_count,
        },
        EngineError::Render(detail) => FolioError::RenderFailed(detail),
        EngineError::Unavailable(detail) if stage == Stage::Open => {
            FolioError::NotSupported(format!("no engine available: {detail}"))
        }
        EngineError::Unavailable(detail) => FolioError::RenderFailed(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeEngine, FakePage};

    #[test]
    fn missing_file_is_not_found_and_leaks_nothing() {
        let engine = FakeEngine::new(vec![FakePage::letter()]);
        let err = Document::open_with(&engine, "missing.pdf").unwrap_err();
        assert!(matches!(err, FolioError::NotFound(ref p) if p == Path::new("missing.pdf")));
        assert_eq!(engine.counters.live_documents(), 0);
    }

    #[test]
    fn non_document_is_not_supported_and_leaks_nothing() {
        let engine = FakeEngine::new(vec![FakePage::letter()]);
        let err = Document::open_with(&engine, "notes.txt").unwrap_err();
        assert!(matches!(err, FolioError::NotSupported(_)));
        assert_eq!(engine.counters.live_documents(), 0);
    }

    #[test]
    fn encrypted_and_corrupt_are_distinguished() {
        let engine = FakeEngine::new(vec![FakePage::letter()]);
        assert!(matches!(
            Document::open_with(&engine, "locked.pdf"),
            Err(FolioError::PasswordRequired(_))
        ));
        assert!(matches!(
            Document::open_with(&engine, "broken.pdf"),
            Err(FolioError::Corrupt(_))
        ));
        assert!(matches!(
            Document::open_with(&engine, "unreadable.pdf"),
            Err(FolioError::Io(_))
        ));
        assert_eq!(engine.counters.live_documents(), 0);
    }

    #[test]
    fn handle_releases_engine_document_once() {
        let engine = FakeEngine::new(vec![FakePage::letter()]);
        let doc = Document::open_with(&engine, "letter.pdf").unwrap();
        assert_eq!(engine.counters.live_documents(), 1);
        doc.close();
        assert_eq!(engine.counters.live_documents(), 0);
        assert_eq!(engine.counters.released_documents(), 1);

        let doc = Document::open_with(&engine, "letter.pdf").unwrap();
        drop(doc);
        assert_eq!(engine.counters.live_documents(), 0);
        assert_eq!(engine.counters.released_documents(), 2);
    }

    #[test]
    fn metadata_is_fixed_at_open() {
        let engine = FakeEngine::new(vec![FakePage::letter(), FakePage::letter()]);
        let doc = Document::open_with(&engine, "two.pdf").unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.file_dpi(), 72.0);
        assert_eq!(doc.engine_name(), "fake");
        assert_eq!(doc.path(), Path::new("two.pdf"));
    }

    #[test]
    fn empty_document_has_zero_pages() {
        let engine = FakeEngine::new(Vec::new());
        let doc = Document::open_with(&engine, "empty.pdf").unwrap();
        assert_eq!(doc.page_count(), 0);
        assert!(matches!(
            doc.page_media_box(0),
            Err(FolioError::OutOfRange { index: 0, page_count: 0 })
        ));
    }

    #[test]
    fn page_queries_shift_to_one_based_once() {
        let engine = FakeEngine::new(vec![
            FakePage::letter(),
            FakePage::with_media(RectD::new(0.0, 0.0, 595.0, 842.0)),
        ]);
        let doc = Document::open_with(&engine, "mixed.pdf").unwrap();

        assert_eq!(doc.page_media_box(1).unwrap(), RectD::new(0.0, 0.0, 595.0, 842.0));
        assert_eq!(engine.counters.last_page_number(), 2);

        assert_eq!(doc.page_media_box(0).unwrap(), RectD::new(0.0, 0.0, 612.0, 792.0));
        assert_eq!(engine.counters.last_page_number(), 1);
    }

    #[test]
    fn page_queries_reject_out_of_range() {
        let engine = FakeEngine::new(vec![FakePage::letter()]);
        let doc = Document::open_with(&engine, "one.pdf").unwrap();
        assert!(matches!(
            doc.page_media_box(1),
            Err(FolioError::OutOfRange { index: 1, page_count: 1 })
        ));
        assert!(matches!(
            doc.page_content_box(u32::MAX),
            Err(FolioError::OutOfRange { .. })
        ));
    }

    #[test]
    fn content_box_falls_back_and_clips() {
        let media = RectD::new(0.0, 0.0, 612.0, 792.0);
        let engine = FakeEngine::new(vec![
            FakePage::letter(),
            FakePage::letter().with_content(RectD::new(72.0, 72.0, 468.0, 648.0)),
            FakePage::letter().with_content(RectD::new(500.0, 700.0, 200.0, 200.0)),
            FakePage::letter().with_content(RectD::new(1000.0, 1000.0, 10.0, 10.0)),
        ]);
        let doc = Document::open_with(&engine, "boxes.pdf").unwrap();

        assert_eq!(doc.page_content_box(0).unwrap(), media);
        assert_eq!(doc.page_content_box(1).unwrap(), RectD::new(72.0, 72.0, 468.0, 648.0));
        assert_eq!(doc.page_content_box(2).unwrap(), RectD::new(500.0, 700.0, 112.0, 92.0));
        assert_eq!(doc.page_content_box(3).unwrap(), media);

        for index in 0..4 {
            let content = doc.page_content_box(index).unwrap();
            assert_eq!(content.intersect(&media), content);
        }
    }

    #[test]
    fn document_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Document>();
    }
}
