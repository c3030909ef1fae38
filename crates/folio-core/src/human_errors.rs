// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people uploading documents.
//
// Every technical error is mapped to plain English with a suggestion. The
// severity decides whether the caller or the service is at fault, which the
// web front door turns into a 4xx or 5xx status.

use crate::error::FolioError;

/// Who has to act to resolve an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The request itself was wrong: fix the upload and try again.
    ClientError,
    /// The service failed; the upload was fine.
    ServerError,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (first line of the response body).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Drives the response status.
    pub severity: Severity,
}

impl HumanError {
    fn client(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            severity: Severity::ClientError,
        }
    }

    fn server(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            severity: Severity::ServerError,
        }
    }
}

/// Convert a `FolioError` into a `HumanError`.
pub fn humanize_error(err: &FolioError) -> HumanError {
    match err {
        // -- Input errors --
        FolioError::NoFiles => HumanError::client(
            "No files uploaded",
            "Attach one or more .md or .txt files in the markdown_files field.",
        ),

        FolioError::EmptyFileName => HumanError::client(
            "No files selected",
            "Choose at least one file before pressing Convert.",
        ),

        FolioError::UnsupportedExtension(name) => HumanError::client(
            "Only .md and .txt files are allowed",
            format!("Rename or convert {name} to a .md or .txt file first."),
        ),

        FolioError::InputDecode { name, .. } => HumanError::client(
            format!("{name} is not a UTF-8 text file"),
            "Save the file with UTF-8 encoding and upload it again.",
        ),

        FolioError::Upload(detail) => HumanError::client(
            "The upload could not be read",
            format!("Try uploading the files again. ({detail})"),
        ),

        // -- Rendering errors --
        FolioError::Layout(_) | FolioError::PdfError(_) => HumanError::server(
            "We couldn't typeset this document",
            "This is a problem on our side. Try again, or try a smaller file.",
        ),

        FolioError::Assembly(_) => HumanError::server(
            "We couldn't combine the converted files into one PDF",
            "This is a problem on our side. Try converting the files one at a time.",
        ),

        // -- Service errors --
        FolioError::Config(_)
        | FolioError::Server(_)
        | FolioError::Io(_)
        | FolioError::Serialization(_) => HumanError::server(
            "The converter had an internal problem",
            "Try again in a moment.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_mistakes_are_client_errors() {
        for err in [
            FolioError::NoFiles,
            FolioError::EmptyFileName,
            FolioError::UnsupportedExtension("a.pdf".into()),
            FolioError::Upload("eof".into()),
        ] {
            assert_eq!(humanize_error(&err).severity, Severity::ClientError, "{err}");
        }
    }

    #[test]
    fn merge_failure_is_server_error() {
        let human = humanize_error(&FolioError::Assembly("bad xref".into()));
        assert_eq!(human.severity, Severity::ServerError);
        assert!(!human.message.contains("xref"));
    }

    #[test]
    fn decode_error_names_the_file() {
        let source = std::str::from_utf8(&[0xff]).unwrap_err();
        let human = humanize_error(&FolioError::InputDecode {
            name: "notes.md".into(),
            source,
        });
        assert!(human.message.contains("notes.md"));
    }
}
