// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for page rendering requests.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::geometry::RectD;

/// Clockwise page rotation, restricted to quarter turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Normalise a signed multiple of 90 degrees (`-90` becomes `Cw270`).
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(FolioError::InvalidArgument(format!(
                "rotation must be a multiple of 90, got {degrees}"
            )));
        }
        Ok(match degrees.rem_euclid(360) {
            0 => Self::None,
            90 => Self::Cw90,
            180 => Self::Cw180,
            _ => Self::Cw270,
        })
    }

    pub fn degrees(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Cw90 => 90,
            Self::Cw180 => 180,
            Self::Cw270 => 270,
        }
    }

    /// Whether the output swaps width and height.
    pub fn is_sideways(self) -> bool {
        matches!(self, Self::Cw90 | Self::Cw270)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Width and height of a raster in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Same area with the axes exchanged.
    pub fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }
}

impl fmt::Display for PixelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which page to render and how.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderPageArgs {
    /// Page index from 0 to `page_count() - 1`.
    pub page_index: u32,
    /// Output size in pixels = page size in dots * zoom.
    pub zoom: f32,
    pub rotation: Rotation,
    /// Region of the page to render, in dots. Defaults to the media box.
    pub crop: Option<RectD>,
}

impl RenderPageArgs {
    /// Whole page, unrotated, at the given zoom.
    pub fn new(page_index: u32, zoom: f32) -> Self {
        Self {
            page_index,
            zoom,
            rotation: Rotation::None,
            crop: None,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_crop(mut self, crop: RectD) -> Self {
        self.crop = Some(crop);
        self
    }
}
