// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Format detection by content rather than extension.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Readers tolerate leading junk before the header, up to this many bytes.
pub const HEADER_SEARCH_WINDOW: usize = 1024;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Whether `bytes` carries a PDF header within the search window.
pub fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

/// Read the start of a file and check it for a PDF header.
pub fn sniff_pdf_file(path: &Path) -> io::Result<bool> {
    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    File::open(path)?
        .take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut head)?;
    Ok(has_pdf_header(&head))
}
