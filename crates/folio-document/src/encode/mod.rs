// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Writing bitmaps to disk for inspection.

pub mod bmp;

use std::path::Path;

use folio_core::config::EncoderSettings;
use folio_core::error::{FolioError, Result};
use image::{ColorType, ImageError, ImageFormat};
use tracing::{info, instrument};

use crate::bitmap::Bitmap;
use bmp::BmpEncoder;

/// Output formats the harness can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Bmp,
    Png,
}

impl OutputFormat {
    /// `.png` selects PNG; anything else is written as BMP.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("png") => Self::Png,
            _ => Self::Bmp,
        }
    }
}

/// Save `bitmap` to `path`, picking the format from the extension.
///
/// BMP output honours `settings`; PNG output always keeps all four channels.
#[instrument(skip_all, fields(path = %path.as_ref().display(), size = %bitmap.size()))]
pub fn save(bitmap: &Bitmap, path: impl AsRef<Path>, settings: &EncoderSettings) -> Result<OutputFormat> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path);
    match format {
        OutputFormat::Bmp => BmpEncoder::new(*settings).write(bitmap, path)?,
        OutputFormat::Png => image::save_buffer_with_format(
            path,
            bitmap.as_bytes(),
            bitmap.width(),
            bitmap.height(),
            ColorType::Rgba8,
            ImageFormat::Png,
        )
        .map_err(image_error)?,
    }
    info!(?format, "Bitmap saved");
    Ok(format)
}

fn image_error(err: ImageError) -> FolioError {
    match err {
        ImageError::IoError(io) => FolioError::Io(io),
        other => FolioError::InvalidArgument(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Bitmap {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8 * 10, y as u8 * 10, 128, 255]);
            }
        }
        Bitmap::from_rgba(width, height, data).unwrap()
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("page.PNG")), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("page.bmp")), OutputFormat::Bmp);
        assert_eq!(OutputFormat::from_path(Path::new("page")), OutputFormat::Bmp);
    }

    #[test]
    fn png_round_trips_through_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        let bitmap = gradient(5, 3);

        let format = save(&bitmap, &path, &EncoderSettings::default()).unwrap();
        assert_eq!(format, OutputFormat::Png);

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (5, 3));
        assert_eq!(decoded.as_raw().as_slice(), bitmap.as_bytes());
    }

    #[test]
    fn bmp_is_written_for_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.bmp");
        save(&gradient(5, 3), &path, &EncoderSettings::default()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"BM");
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("page.png");
        assert!(matches!(
            save(&gradient(2, 2), &path, &EncoderSettings::default()),
            Err(FolioError::Io(_))
        ));
    }
}
