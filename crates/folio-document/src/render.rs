// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rasterization — turns render arguments into an engine request, runs
// it under the document's render lock and adopts the engine's buffer as a
// `Bitmap`.
//
// Size pipeline: region (crop or media box) -> rotation swaps the extents ->
// scaled by zoom -> rounded outward to whole pixels.

use std::time::Instant;

use folio_core::error::{FolioError, Result};
use folio_core::geometry::RectD;
use folio_core::types::{PixelSize, RenderPageArgs, Rotation};
use folio_engine::{RawPixels, RenderRequest};
use tracing::{debug, info, instrument};

use crate::bitmap::{Bitmap, CHANNELS};
use crate::document::{Document, Stage};

/// Pixel size of `region` rendered at `zoom` with `rotation` applied.
pub fn output_size(region: &RectD, zoom: f32, rotation: Rotation) -> Result<PixelSize> {
    let (width, height) = if rotation.is_sideways() {
        (region.dy, region.dx)
    } else {
        (region.dx, region.dy)
    };
    let pixels = RectD::new(0.0, 0.0, width, height)
        .scale_uniform(f64::from(zoom))
        .round_out();

    if pixels.is_empty() {
        return Err(FolioError::InvalidArgument(format!(
            "region {region} at zoom {zoom} has no pixels"
        )));
    }
    Ok(PixelSize::new(pixels.dx as u32, pixels.dy as u32))
}

/// Rasterize one page of `document` into an owned RGBA bitmap.
///
/// The page index is checked before anything is allocated. The returned
/// bitmap owns its pixels outright: it outlives the document and shares
/// nothing with any other render.
#[instrument(skip_all, fields(page = args.page_index, zoom = args.zoom, rotation = %args.rotation))]
pub fn render_page(document: &Document, args: &RenderPageArgs) -> Result<Bitmap> {
    let page = document.engine_page(args.page_index)?;

    if !args.zoom.is_finite() || args.zoom <= 0.0 {
        return Err(FolioError::InvalidArgument(format!(
            "zoom must be a positive number, got {}",
            args.zoom
        )));
    }

    let region = match args.crop {
        Some(crop) => crop,
        None => document.media_box(page)?,
    };
    if region.is_empty() {
        return Err(FolioError::InvalidArgument(format!(
            "render region {region} is empty"
        )));
    }

    let size = output_size(&region, args.zoom, args.rotation)?;
    let max_pixels = document.limits().max_pixels;
    if size.pixel_count() > max_pixels {
        return Err(FolioError::InvalidArgument(format!(
            "{size} exceeds the limit of {max_pixels} pixels"
        )));
    }

    let request = RenderRequest {
        page,
        zoom: args.zoom,
        rotation: args.rotation,
        region,
        size,
    };
    debug!(%region, %size, "requesting engine render");

    let started = Instant::now();
    let pixels = {
        let _guard = document.render_guard();
        document
            .engine_doc()
            .render_page_to_pixels(&request)
            .map_err(|err| document.translate(err, Stage::Render))?
    };

    let bitmap = adopt(pixels, size)?;
    info!(
        %size,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Page rendered"
    );
    Ok(bitmap)
}

/// Take ownership of an engine buffer after checking it is what was asked for.
fn adopt(pixels: RawPixels, expected: PixelSize) -> Result<Bitmap> {
    if pixels.channels != CHANNELS {
        return Err(FolioError::UnsupportedChannelLayout {
            channels: pixels.channels,
        });
    }
    let actual = PixelSize::new(pixels.width, pixels.height);
    if actual != expected {
        return Err(FolioError::RenderFailed(format!(
            "engine produced {actual}, expected {expected}"
        )));
    }
    Bitmap::from_rgba(pixels.width, pixels.height, pixels.data)
        .map_err(|err| FolioError::RenderFailed(err.to_string()))
}
