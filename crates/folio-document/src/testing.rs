// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test double engine. Counts live documents, live intermediate page
// resources and render calls so tests can prove every engine resource is
// released exactly once on every path.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use folio_core::geometry::RectD;
use folio_engine::{Engine, EngineDocument, EngineError, PageNumber, RawPixels, RenderRequest};

#[derive(Debug, Default)]
pub(crate) struct Counters {
    opened: AtomicUsize,
    released: AtomicUsize,
    live_page_resources: AtomicUsize,
    render_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    last_page_number: AtomicU32,
}

impl Counters {
    pub(crate) fn live_documents(&self) -> usize {
        self.opened.load(Ordering::SeqCst) - self.released.load(Ordering::SeqCst)
    }

    pub(crate) fn released_documents(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub(crate) fn live_page_resources(&self) -> usize {
        self.live_page_resources.load(Ordering::SeqCst)
    }

    pub(crate) fn render_calls(&self) -> usize {
        self.render_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn last_page_number(&self) -> u32 {
        self.last_page_number.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FakePage {
    media: RectD,
    content: Option<RectD>,
}

impl FakePage {
    pub(crate) fn letter() -> Self {
        Self::with_media(RectD::new(0.0, 0.0, 612.0, 792.0))
    }

    pub(crate) fn with_media(media: RectD) -> Self {
        Self {
            media,
            content: None,
        }
    }

    pub(crate) fn with_content(mut self, content: RectD) -> Self {
        self.content = Some(content);
        self
    }
}

/// Opens any path except a few reserved names that trigger each failure.
pub(crate) struct FakeEngine {
    pub(crate) counters: Arc<Counters>,
    pages: Vec<FakePage>,
    channels: u32,
    fail_render: bool,
    size_skew: u32,
    serialized: bool,
}

impl FakeEngine {
    pub(crate) fn new(pages: Vec<FakePage>) -> Self {
        Self {
            counters: Arc::default(),
            pages,
            channels: 4,
            fail_render: false,
            size_skew: 0,
            serialized: true,
        }
    }

    pub(crate) fn with_channels(mut self, channels: u32) -> Self {
        self.channels = channels;
        self
    }

    pub(crate) fn failing_render(mut self) -> Self {
        self.fail_render = true;
        self
    }

    /// Return bitmaps this many pixels wider than requested.
    pub(crate) fn with_size_skew(mut self, skew: u32) -> Self {
        self.size_skew = skew;
        self
    }

    pub(crate) fn reentrant(mut self) -> Self {
        self.serialized = false;
        self
    }
}

impl Engine for FakeEngine {
    fn name(&self) -> &str {
        "fake"
    }

    fn is_supported(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "pdf")
    }

    fn open(&self, path: &Path) -> Result<Box<dyn EngineDocument>, EngineError> {
        let io = |kind: std::io::ErrorKind| EngineError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::from(kind),
        };
        match path.file_name().and_then(|n| n.to_str()) {
            Some("missing.pdf") => return Err(io(std::io::ErrorKind::NotFound)),
            Some("unreadable.pdf") => return Err(io(std::io::ErrorKind::PermissionDenied)),
            Some("locked.pdf") => return Err(EngineError::Encrypted),
            Some("broken.pdf") => return Err(EngineError::Malformed("no trailer".into())),
            _ if !self.is_supported(path) => {
                return Err(EngineError::Unrecognized(path.display().to_string()));
            }
            _ => {}
        }

        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeDocument {
            counters: Arc::clone(&self.counters),
            pages: self.pages.clone(),
            channels: self.channels,
            fail_render: self.fail_render,
            size_skew: self.size_skew,
            serialized: self.serialized,
        }))
    }
}

struct FakeDocument {
    counters: Arc<Counters>,
    pages: Vec<FakePage>,
    channels: u32,
    fail_render: bool,
    size_skew: u32,
    serialized: bool,
}

impl FakeDocument {
    fn page(&self, page: PageNumber) -> Result<&FakePage, EngineError> {
        self.counters
            .last_page_number
            .store(page.get(), Ordering::SeqCst);
        self.pages
            .get(page.get() as usize - 1)
            .ok_or(EngineError::NoSuchPage(page.get()))
    }
}

impl Drop for FakeDocument {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Stands in for an engine-side page object acquired during a render.
struct PageResource<'a>(&'a Counters);

impl<'a> PageResource<'a> {
    fn acquire(counters: &'a Counters) -> Self {
        counters.live_page_resources.fetch_add(1, Ordering::SeqCst);
        let now = counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        counters.max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(counters)
    }
}

impl Drop for PageResource<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.0.live_page_resources.fetch_sub(1, Ordering::SeqCst);
    }
}

impl EngineDocument for FakeDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn file_dpi(&self) -> f32 {
        72.0
    }

    fn page_media_box(&self, page: PageNumber) -> Result<RectD, EngineError> {
        Ok(self.page(page)?.media)
    }

    fn page_content_box(&self, page: PageNumber) -> Result<Option<RectD>, EngineError> {
        Ok(self.page(page)?.content)
    }

    fn render_page_to_pixels(&self, request: &RenderRequest) -> Result<RawPixels, EngineError> {
        self.counters.render_calls.fetch_add(1, Ordering::SeqCst);
        self.page(request.page)?;
        let _resource = PageResource::acquire(&self.counters);
        // Widen the window in which overlapping renders would be observed.
        thread::sleep(Duration::from_millis(2));

        if self.fail_render {
            return Err(EngineError::Render("fake failure".into()));
        }

        let width = request.size.width + self.size_skew;
        let height = request.size.height;
        let mut data = Vec::with_capacity((width * height * self.channels) as usize);
        for y in 0..height {
            for x in 0..width {
                let px = [x as u8, y as u8, request.page.get() as u8, 255];
                data.extend(px.iter().cycle().take(self.channels as usize));
            }
        }

        Ok(RawPixels {
            width,
            height,
            channels: self.channels,
            data,
        })
    }

    fn serialized_render(&self) -> bool {
        self.serialized
    }
}
