// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — upload markdown or plain-text files, download one book-style PDF.

use folio_core::AppConfig;
use folio_core::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (logs go to stderr).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Folio starting");

    let config = AppConfig::load()?;
    folio_server::serve(config).await
}
