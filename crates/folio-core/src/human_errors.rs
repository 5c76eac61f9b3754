// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the render harness.
//
// Every error is mapped to plain English with a clear suggestion. The
// severity drives whether the harness suggests fixing the input or the
// invocation.

use crate::error::FolioError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must change something (path, page number, arguments).
    ActionRequired,
    /// The input itself cannot be handled; retrying will not help.
    Permanent,
    /// The environment misbehaved (disk, rendering backend); retrying may help.
    Transient,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `FolioError` into a `HumanError`.
pub fn humanize_error(err: &FolioError) -> HumanError {
    match err {
        FolioError::NotFound(path) => HumanError {
            message: "The file couldn't be found.".into(),
            suggestion: format!("Check the path and try again. ({})", path.display()),
            severity: Severity::ActionRequired,
        },

        FolioError::NotSupported(detail) => HumanError {
            message: "This type of document isn't supported.".into(),
            suggestion: format!("Only PDF documents can be rendered. ({detail})"),
            severity: Severity::Permanent,
        },

        FolioError::PasswordRequired(_) => HumanError {
            message: "This document is password protected.".into(),
            suggestion: "Remove the password with the tool that created it, then try again.".into(),
            severity: Severity::Permanent,
        },

        FolioError::Corrupt(_) => HumanError {
            message: "There's a problem with this document.".into(),
            suggestion: "The file may be damaged. Try opening it in another viewer to check it works.".into(),
            severity: Severity::Permanent,
        },

        FolioError::OutOfRange { index, page_count } => HumanError {
            message: format!("There is no page {index}."),
            suggestion: if *page_count == 0 {
                "The document has no pages.".into()
            } else {
                format!(
                    "Pages are numbered from 0 to {}.",
                    page_count.saturating_sub(1)
                )
            },
            severity: Severity::ActionRequired,
        },

        FolioError::UnsupportedChannelLayout { channels } => HumanError {
            message: "The renderer produced an image in an unexpected format.".into(),
            suggestion: format!(
                "Expected 4 colour channels but got {channels}. Try a different rendering backend."
            ),
            severity: Severity::Permanent,
        },

        FolioError::RenderFailed(detail) => HumanError {
            message: "The page couldn't be drawn.".into(),
            suggestion: format!("Try again, or try a lower zoom. ({detail})"),
            severity: Severity::Transient,
        },

        FolioError::InvalidArgument(detail) => HumanError {
            message: "The render settings aren't valid.".into(),
            suggestion: format!("Check the zoom, rotation and crop values. ({detail})"),
            severity: Severity::ActionRequired,
        },

        FolioError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission was denied while reading or writing a file.".into(),
                    suggestion: "Check the file permissions, or choose a different output location.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: format!("Try again. If this keeps happening, the disk may be full. ({io_err})"),
                    severity: Severity::Transient,
                }
            }
        }

        FolioError::Serialization(_) => HumanError {
            message: "The configuration file couldn't be read.".into(),
            suggestion: "Check that it is valid JSON, or remove it to use the defaults.".into(),
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_action_required() {
        let human = humanize_error(&FolioError::NotFound("nope.pdf".into()));
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("nope.pdf"));
    }

    #[test]
    fn out_of_range_names_valid_pages() {
        let err = FolioError::OutOfRange {
            index: 5,
            page_count: 3,
        };
        let human = humanize_error(&err);
        assert_eq!(human.suggestion, "Pages are numbered from 0 to 2.");
    }

    #[test]
    fn empty_document_has_no_pages() {
        let err = FolioError::OutOfRange {
            index: 0,
            page_count: 0,
        };
        assert_eq!(humanize_error(&err).suggestion, "The document has no pages.");
    }

    #[test]
    fn unsupported_format_is_permanent() {
        let human = humanize_error(&FolioError::NotSupported("notes.txt".into()));
        assert_eq!(human.severity, Severity::Permanent);
    }
}
