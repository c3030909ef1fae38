// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Server entry — bind the configured address and serve until Ctrl-C.

use folio_core::AppConfig;
use folio_core::error::{FolioError, Result};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::routes::router;
use crate::state::AppState;

/// Bind `config.host:config.port` and serve the router with graceful shutdown.
pub async fn serve(config: AppConfig) -> Result<()> {
    let addr = config.socket_addr();
    let app = router(AppState::new(config));

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|err| FolioError::Server(format!("cannot bind {addr}: {err}")))?;

    info!("Folio listening on http://{addr}");
    info!("Upload form: http://{addr}/  health: http://{addr}/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Folio stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "Cannot listen for Ctrl-C; shutting down");
        return;
    }
    info!("Shutdown requested");
}
