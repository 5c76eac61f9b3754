// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Folio operations.
///
/// Engine-specific failures are translated into one of these variants at the
/// document facade; no backend error type appears in a public signature.
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Opening --
    #[error("document not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a supported document: {0}")]
    NotSupported(String),

    #[error("document is password protected: {}", .0.display())]
    PasswordRequired(PathBuf),

    #[error("document is corrupt: {0}")]
    Corrupt(String),

    // -- Page access --
    #[error("page index {index} out of range (document has {page_count} pages)")]
    OutOfRange { index: u32, page_count: u32 },

    // -- Rendering --
    #[error("engine returned {channels} channels per pixel, expected 4")]
    UnsupportedChannelLayout { channels: u32 },

    #[error("rendering failed: {0}")]
    RenderFailed(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;
