// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Folio.

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// Points per inch, the PDF user-space unit.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Points per millimetre.
pub const POINTS_PER_MM: f32 = POINTS_PER_INCH / 25.4;

/// Supported source document kinds.
///
/// Both kinds go through the same markdown pipeline; plain text simply rarely
/// triggers any of the markup rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    Markdown,
    PlainText,
}

impl SourceKind {
    /// Infer the source kind from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "md" => Some(Self::Markdown),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Infer the source kind from a file name, using its last extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(ext)
    }
}

/// One input document: a file name and its decoded text.
///
/// Immutable once constructed; batches keep these in upload order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    name: String,
    kind: SourceKind,
    text: String,
}

impl SourceDocument {
    /// Build a source document from already-decoded text.
    ///
    /// Fails with [`FolioError::UnsupportedExtension`] when the name does not
    /// end in `.md` or `.txt`.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let kind = SourceKind::from_file_name(&name)
            .ok_or_else(|| FolioError::UnsupportedExtension(name.clone()))?;
        Ok(Self {
            name,
            kind,
            text: text.into(),
        })
    }

    /// Decode raw upload bytes as UTF-8.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let name = name.into();
        let text = std::str::from_utf8(bytes).map_err(|source| FolioError::InputDecode {
            name: name.clone(),
            source,
        })?;
        Self::new(name, text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in PDF points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            Self::A4 => (595.28, 841.89),
            Self::A3 => (841.89, 1190.55),
            Self::A5 => (419.53, 595.28),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::Tabloid => (792.0, 1224.0),
            Self::Custom {
                width_mm,
                height_mm,
            } => (
                *width_mm as f32 * POINTS_PER_MM,
                *height_mm as f32 * POINTS_PER_MM,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_allow_list() {
        assert_eq!(SourceKind::from_file_name("notes.md"), Some(SourceKind::Markdown));
        assert_eq!(SourceKind::from_file_name("NOTES.MD"), Some(SourceKind::Markdown));
        assert_eq!(SourceKind::from_file_name("a.b.txt"), Some(SourceKind::PlainText));
        assert_eq!(SourceKind::from_file_name("report.pdf"), None);
        assert_eq!(SourceKind::from_file_name("README"), None);
    }

    #[test]
    fn invalid_utf8_is_input_decode_error() {
        let err = SourceDocument::from_bytes("bad.md", &[0x66, 0xff, 0xfe]).unwrap_err();
        match err {
            FolioError::InputDecode { name, .. } => assert_eq!(name, "bad.md"),
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn disallowed_extension_rejected() {
        let err = SourceDocument::new("image.png", "x").unwrap_err();
        assert!(matches!(err, FolioError::UnsupportedExtension(_)));
    }

    #[test]
    fn letter_is_eight_and_a_half_by_eleven_inches() {
        let (w, h) = PaperSize::Letter.dimensions_pt();
        assert_eq!(w, 8.5 * POINTS_PER_INCH);
        assert_eq!(h, 11.0 * POINTS_PER_INCH);
    }
}
