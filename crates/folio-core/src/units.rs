// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion from page dots to physical units.

use crate::geometry::RectD;

pub const INCH_TO_CM: f64 = 2.54;

/// Express a rectangle given in dots in inches, using the file's DPI.
pub fn dots_to_inches(rect: &RectD, dpi: f32) -> RectD {
    rect.scale_uniform(1.0 / f64::from(dpi))
}

pub fn dots_to_centimeters(rect: &RectD, dpi: f32) -> RectD {
    rect.scale_uniform(INCH_TO_CM / f64::from(dpi))
}
