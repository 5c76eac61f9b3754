// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Render and encoder configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Persistent settings for the render harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Zoom used when the caller does not pass one.
    pub default_zoom: f32,
    /// Upper bounds applied before any engine call.
    pub limits: RenderLimits,
    /// Settings for the inspection bitmap writer.
    pub encoder: EncoderSettings,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            default_zoom: 2.0,
            limits: RenderLimits::default(),
            encoder: EncoderSettings::default(),
        }
    }
}

impl FolioConfig {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), raw)?;
        Ok(())
    }
}

/// Limits on a single render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderLimits {
    /// Largest output bitmap, in pixels, a render may request.
    pub max_pixels: u64,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            max_pixels: 100_000_000,
        }
    }
}

/// Byte order of colour channels in an encoded pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Blue, green, red: what bitmap viewers expect.
    #[default]
    Bgr,
    /// Red, green, blue: the bitmap's own interleaving, written unchanged.
    Rgb,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    pub channel_order: ChannelOrder,
    /// Write 32-bit pixels including alpha instead of 24-bit.
    pub keep_alpha: bool,
}

impl EncoderSettings {
    pub fn channels_to_keep(&self) -> u32 {
        if self.keep_alpha { 4 } else { 3 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: FolioConfig = serde_json::from_str(r#"{"default_zoom": 1.5}"#).unwrap();
        assert_eq!(cfg.default_zoom, 1.5);
        assert_eq!(cfg.limits, RenderLimits::default());
        assert_eq!(cfg.encoder.channel_order, ChannelOrder::Bgr);
        assert_eq!(cfg.encoder.channels_to_keep(), 3);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.json");

        let mut cfg = FolioConfig::default();
        cfg.encoder.keep_alpha = true;
        cfg.limits.max_pixels = 4096;
        cfg.save(&path).unwrap();

        assert_eq!(FolioConfig::load(&path).unwrap(), cfg);
    }
}
