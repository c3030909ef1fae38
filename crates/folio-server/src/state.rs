// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared request state — configuration plus the document assembler built
// from it. Both are read-only after startup.

use std::sync::Arc;

use folio_core::AppConfig;
use folio_document::{Alignment, DocumentAssembler, PageGeometry, PdfWriter, StyleRegistry};

/// State handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub assembler: Arc<DocumentAssembler>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let mut styles = StyleRegistry::book();
        if config.centered_h2 {
            styles = styles.with_h2_alignment(Alignment::Center);
        }

        let mut writer = PdfWriter::new(PageGeometry::book(), styles);
        writer.set_footer(config.footer.clone());

        Self {
            config: Arc::new(config),
            assembler: Arc::new(DocumentAssembler::new(writer)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_document::markdown::BlockKind;

    #[test]
    fn centered_h2_is_applied() {
        let config = AppConfig {
            centered_h2: true,
            ..AppConfig::default()
        };
        let state = AppState::new(config);
        assert_eq!(
            state.assembler.writer().styles().get(BlockKind::Heading2).alignment,
            Alignment::Center
        );
    }

    #[test]
    fn default_h2_is_left_aligned() {
        let state = AppState::new(AppConfig::default());
        assert_eq!(
            state.assembler.writer().styles().get(BlockKind::Heading2).alignment,
            Alignment::Left
        );
    }
}
