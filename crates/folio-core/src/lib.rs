// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — Core value types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod geometry;
pub mod human_errors;
pub mod types;
pub mod units;

pub use config::FolioConfig;
pub use error::FolioError;
pub use geometry::{Point, Rect, RectD, RectI};
pub use types::*;
