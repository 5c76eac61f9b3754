// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bitmap — an owned, rendered page as 32-bit RGBA.

use folio_core::error::{FolioError, Result};
use folio_core::types::PixelSize;
use image::RgbaImage;
use sha2::{Digest, Sha256};

/// Channels per pixel: red, green, blue, alpha.
pub const CHANNELS: u32 = 4;

/// A rendered page as row-major, channel-interleaved RGBA.
///
/// Dimensions are fixed at construction. Not `Clone`; a bitmap is only ever
/// moved. The pixel memory is released when the bitmap is dropped.
#[derive(Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Box<[u8]>,
}

impl Bitmap {
    /// Take ownership of an RGBA buffer of exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height);
        if data.len() as u64 != expected {
            return Err(FolioError::InvalidArgument(format!(
                "RGBA buffer for {width}x{height} must be {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data: data.into_boxed_slice(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u32 {
        CHANNELS
    }

    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    /// Position of channel `c` of pixel `(x, y)` in the buffer:
    /// `c + channels * (x + width * y)`. `None` if any coordinate is out of
    /// bounds.
    pub fn offset(&self, x: u32, y: u32, c: u32) -> Option<usize> {
        if x >= self.width || y >= self.height || c >= CHANNELS {
            return None;
        }
        let (x, y, c) = (x as usize, y as usize, c as usize);
        Some(c + CHANNELS as usize * (x + self.width as usize * y))
    }

    pub fn get(&self, x: u32, y: u32, c: u32) -> Option<u8> {
        self.offset(x, y, c).map(|i| self.data[i])
    }

    /// Channel value at `(x, y, c)`.
    ///
    /// # Panics
    ///
    /// If the coordinates are outside the bitmap. Use [`Bitmap::get`] for a
    /// checked lookup.
    pub fn at(&self, x: u32, y: u32, c: u32) -> u8 {
        match self.get(x, y, c) {
            Some(value) => value,
            None => panic!(
                "bitmap access ({x}, {y}, {c}) outside {}x{}x{CHANNELS}",
                self.width, self.height
            ),
        }
    }

    /// All four channels of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let start = self.offset(x, y, 0)?;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[start..start + CHANNELS as usize]);
        Some(px)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable pixel access. The dimensions stay fixed.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Give up the bitmap and return its buffer without copying.
    pub fn into_raw(self) -> Vec<u8> {
        self.data.into_vec()
    }

    /// Packed RGB copy with the alpha channel dropped.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.data.chunks_exact(CHANNELS as usize) {
            rgb.extend_from_slice(&px[..3]);
        }
        rgb
    }

    /// Convert into an `image` buffer without copying, for use with any of
    /// the `image` crate's encoders.
    pub fn into_rgba_image(self) -> Result<RgbaImage> {
        let (width, height) = (self.width, self.height);
        RgbaImage::from_raw(width, height, self.into_raw()).ok_or_else(|| {
            FolioError::InvalidArgument(format!("buffer does not match {width}x{height}"))
        })
    }

    /// SHA-256 of the pixel buffer as lowercase hex. Equal fingerprints mean
    /// pixel-identical renders.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(&self.data);
        hex::encode(hasher.finalize())
    }
}

fn byte_len(width: u32, height: u32) -> u64 {
    u64::from(width) * u64::from(height) * u64::from(CHANNELS)
}
