// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// BMP writer — uncompressed 24- or 32-bit bitmaps with a BITMAPINFOHEADER.
//
// Layout: 14-byte file header, 40-byte info header, then rows bottom-up,
// each padded with zeros to a multiple of 4 bytes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use folio_core::config::{ChannelOrder, EncoderSettings};
use folio_core::error::{FolioError, Result};
use tracing::debug;

use crate::bitmap::{Bitmap, CHANNELS};

pub const FILE_HEADER_SIZE: usize = 14;
pub const INFO_HEADER_SIZE: usize = 40;
const PIXEL_DATA_OFFSET: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

/// Zero bytes appended to each row so its length is a multiple of 4.
pub fn row_padding(width: u32, channels: u32) -> usize {
    let row = width as usize * channels as usize;
    (4 - row % 4) % 4
}

/// Encodes bitmaps as BMP. Every call builds its own headers, so one
/// encoder can be shared across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpEncoder {
    channels_to_keep: u32,
    order: ChannelOrder,
}

impl Default for BmpEncoder {
    fn default() -> Self {
        Self::new(EncoderSettings::default())
    }
}

impl BmpEncoder {
    pub fn new(settings: EncoderSettings) -> Self {
        Self {
            channels_to_keep: settings.channels_to_keep(),
            order: settings.channel_order,
        }
    }

    /// `channels_to_keep` must be 3 (drop alpha) or 4.
    pub fn with_channels(channels_to_keep: u32, order: ChannelOrder) -> Result<Self> {
        if !(3..=CHANNELS).contains(&channels_to_keep) {
            return Err(FolioError::InvalidArgument(format!(
                "BMP output keeps 3 or 4 channels, not {channels_to_keep}"
            )));
        }
        Ok(Self {
            channels_to_keep,
            order,
        })
    }

    pub fn channels_to_keep(&self) -> u32 {
        self.channels_to_keep
    }

    /// Encode into a fresh buffer.
    pub fn encode(&self, bitmap: &Bitmap) -> Result<Vec<u8>> {
        let layout = Layout::new(bitmap, self.channels_to_keep)?;
        let mut out = Vec::with_capacity(layout.file_size as usize);
        self.write_layout(bitmap, &layout, &mut out)?;
        Ok(out)
    }

    /// Encode into any writer.
    pub fn encode_to(&self, bitmap: &Bitmap, out: &mut impl Write) -> Result<()> {
        let layout = Layout::new(bitmap, self.channels_to_keep)?;
        self.write_layout(bitmap, &layout, out)
    }

    /// Encode straight to a file at `path`, replacing it if present.
    pub fn write(&self, bitmap: &Bitmap, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let layout = Layout::new(bitmap, self.channels_to_keep)?;
        let mut out = BufWriter::new(File::create(path)?);
        self.write_layout(bitmap, &layout, &mut out)?;
        out.flush()?;
        debug!(path = %path.display(), bytes = layout.file_size, "BMP written");
        Ok(())
    }

    fn write_layout(&self, bitmap: &Bitmap, layout: &Layout, out: &mut impl Write) -> Result<()> {
        out.write_all(&layout.file_header())?;
        out.write_all(&layout.info_header())?;

        let keep = self.channels_to_keep as usize;
        let padding = [0u8; 3];
        let mut row = Vec::with_capacity(layout.stride);
        let src_stride = bitmap.width() as usize * CHANNELS as usize;

        // Bottom-up: the last bitmap row is the first one in the file.
        for src in bitmap.as_bytes().chunks_exact(src_stride).rev() {
            row.clear();
            for px in src.chunks_exact(CHANNELS as usize) {
                match self.order {
                    ChannelOrder::Bgr => row.extend_from_slice(&[px[2], px[1], px[0]]),
                    ChannelOrder::Rgb => row.extend_from_slice(&px[..3]),
                }
                if keep == 4 {
                    row.push(px[3]);
                }
            }
            row.extend_from_slice(&padding[..layout.padding]);
            out.write_all(&row)?;
        }
        Ok(())
    }
}

/// Write `bitmap` to `path` as BMP in blue-green-red order.
pub fn write_bmp(bitmap: &Bitmap, path: impl AsRef<Path>, channels_to_keep: u32) -> Result<()> {
    BmpEncoder::with_channels(channels_to_keep, ChannelOrder::Bgr)?.write(bitmap, path)
}

/// Sizes derived from the bitmap, checked against the format's field widths.
struct Layout {
    width: i32,
    height: i32,
    bits_per_pixel: u16,
    stride: usize,
    padding: usize,
    file_size: u32,
}

impl Layout {
    fn new(bitmap: &Bitmap, channels: u32) -> Result<Self> {
        if bitmap.size().pixel_count() == 0 {
            return Err(FolioError::InvalidArgument(format!(
                "cannot encode an empty {} bitmap",
                bitmap.size()
            )));
        }
        let too_large = || {
            FolioError::InvalidArgument(format!("{} is too large for a BMP file", bitmap.size()))
        };
        let width = i32::try_from(bitmap.width()).map_err(|_| too_large())?;
        let height = i32::try_from(bitmap.height()).map_err(|_| too_large())?;

        let padding = row_padding(bitmap.width(), channels);
        let stride = bitmap.width() as usize * channels as usize + padding;
        let file_size = (stride as u64)
            .checked_mul(u64::from(bitmap.height()))
            .and_then(|pixels| pixels.checked_add(PIXEL_DATA_OFFSET as u64))
            .and_then(|total| u32::try_from(total).ok())
            .ok_or_else(too_large)?;

        Ok(Self {
            width,
            height,
            bits_per_pixel: (channels * 8) as u16,
            stride,
            padding,
            file_size,
        })
    }

    fn file_header(&self) -> [u8; FILE_HEADER_SIZE] {
        let mut header = [0u8; FILE_HEADER_SIZE];
        header[0..2].copy_from_slice(b"BM");
        header[2..6].copy_from_slice(&self.file_size.to_le_bytes());
        // 6..10 reserved.
        header[10..14].copy_from_slice(&(PIXEL_DATA_OFFSET as u32).to_le_bytes());
        header
    }

    fn info_header(&self) -> [u8; INFO_HEADER_SIZE] {
        let mut header = [0u8; INFO_HEADER_SIZE];
        header[0..4].copy_from_slice(&(INFO_HEADER_SIZE as u32).to_le_bytes());
        header[4..8].copy_from_slice(&self.width.to_le_bytes());
        header[8..12].copy_from_slice(&self.height.to_le_bytes());
        header[12..14].copy_from_slice(&1u16.to_le_bytes());
        header[14..16].copy_from_slice(&self.bits_per_pixel.to_le_bytes());
        // Compression, image size, resolution and palette fields stay zero.
        header
    }
}
