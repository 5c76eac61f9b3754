// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Errors raised by engine backends. Never surfaced past the document facade.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognized file format: {0}")]
    Unrecognized(String),

    #[error("document is encrypted")]
    Encrypted,

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("no page number {0}")]
    NoSuchPage(u32),

    #[error("render error: {0}")]
    Render(String),

    #[error("engine unavailable: {0}")]
    Unavailable(String),
}
