// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// Branding line drawn in the bottom margin of every page.
pub const DEFAULT_FOOTER: &str =
    "\u{a9}ilmugunung.lab | Digital Asset Education - Building Financial Freedom";

/// Environment variable naming an optional JSON configuration file.
pub const CONFIG_PATH_VAR: &str = "FOLIO_CONFIG";

/// Environment variable overriding [`AppConfig::host`].
pub const HOST_VAR: &str = "FOLIO_HOST";

/// Environment variable overriding [`AppConfig::port`].
pub const PORT_VAR: &str = "FOLIO_PORT";

/// Server and rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Interface the HTTP front door binds to.
    pub host: String,
    /// Port the HTTP front door listens on.
    pub port: u16,
    /// Upper bound on a whole multipart request body.
    pub max_upload_bytes: usize,
    /// Serve the merged PDF inline instead of as a download.
    pub inline_disposition: bool,
    /// File name offered to the browser for the merged PDF.
    pub download_name: String,
    /// Footer text drawn on every page.
    pub footer: String,
    /// Center level-2 headings (left-aligned otherwise).
    pub centered_h2: bool,
    /// Parent directory for per-request staging directories.
    /// `None` uses the system temporary directory.
    pub staging_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            max_upload_bytes: 16 * 1024 * 1024,
            inline_disposition: false,
            download_name: "merged.pdf".into(),
            footer: DEFAULT_FOOTER.into(),
            centered_h2: false,
            staging_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` to resolve environment variables.
    ///
    /// Order: defaults, then the JSON file named by `FOLIO_CONFIG`, then the
    /// `FOLIO_HOST` / `FOLIO_PORT` overrides.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(host) = lookup(HOST_VAR) {
            config.host = host;
        }
        if let Some(port) = lookup(PORT_VAR) {
            config.port = port
                .parse()
                .map_err(|_| FolioError::Config(format!("{PORT_VAR}={port} is not a port")))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Get the socket address string.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<()> {
        if self.max_upload_bytes == 0 {
            return Err(FolioError::Config("max_upload_bytes must be positive".into()));
        }
        if self.download_name.trim().is_empty() {
            return Err(FolioError::Config("download_name must not be empty".into()));
        }
        Ok(())
    }
}
