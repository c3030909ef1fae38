// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-server — HTTP front door: an upload form, the `/convert` endpoint, and
// a health check, served with axum.

pub mod routes;
pub mod server;
pub mod state;
pub mod upload;

pub use routes::router;
pub use server::serve;
pub use state::AppState;
