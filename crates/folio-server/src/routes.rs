// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP routes — upload form, conversion endpoint, and health check.
//
// Conversion is synchronous and CPU-bound, so it runs on the blocking pool.
// Each request gets its own temporary staging directory, created only after
// the upload has been validated and removed when the conversion finishes.

use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use folio_core::error::{FolioError, Result};
use folio_core::human_errors::{Severity, humanize_error};
use folio_core::types::SourceDocument;
use folio_document::MergedOutput;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

use crate::state::AppState;
use crate::upload::{collect_files, validate};

/// Page count of the merged PDF.
pub const PAGES_HEADER: HeaderName = HeaderName::from_static("x-folio-pages");

/// Hex SHA-256 of the merged PDF.
pub const SHA256_HEADER: HeaderName = HeaderName::from_static("x-folio-sha256");

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Folio: markdown to PDF</title>
</head>
<body>
<h1>Markdown to PDF</h1>
<p>Upload one or more .md or .txt files. They are typeset and merged into a single PDF in the order given.</p>
<form action="/convert" method="post" enctype="multipart/form-data">
  <input type="file" name="markdown_files" accept=".md,.txt" multiple>
  <button type="submit">Convert</button>
</form>
</body>
</html>
"#;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        .route("/convert", post(convert))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Default, Deserialize)]
struct ConvertParams {
    /// Ask for `Content-Disposition: inline` instead of an attachment.
    #[serde(default)]
    inline: bool,
}

#[instrument(skip_all)]
async fn convert(
    State(state): State<AppState>,
    Query(params): Query<ConvertParams>,
    mut multipart: Multipart,
) -> std::result::Result<Response, ApiError> {
    let files = collect_files(&mut multipart).await?;
    let sources = validate(&files)?;
    info!(files = sources.len(), "Converting upload");

    let merged = tokio::task::spawn_blocking({
        let state = state.clone();
        move || convert_staged(&state, &sources)
    })
    .await
    .map_err(|err| FolioError::Server(format!("conversion task failed: {err}")))??;

    let inline = params.inline || state.config.inline_disposition;
    Ok(pdf_response(&merged, &state.config.download_name, inline)?)
}

/// Assemble inside a fresh temporary directory that is removed afterwards.
fn convert_staged(state: &AppState, sources: &[SourceDocument]) -> Result<MergedOutput> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("folio-");
    let staging = match &state.config.staging_dir {
        Some(root) => builder.tempdir_in(root)?,
        None => builder.tempdir()?,
    };

    let result = state
        .assembler
        .as_ref()
        .clone()
        .with_staging(staging.path())
        .assemble(sources);

    if let Err(err) = staging.close() {
        warn!(%err, "Failed to remove staging directory");
    }
    result
}

fn pdf_response(merged: &MergedOutput, download_name: &str, inline: bool) -> Result<Response> {
    let disposition = if inline { "inline" } else { "attachment" };
    let header_value = |value: String| {
        HeaderValue::from_str(&value)
            .map_err(|err| FolioError::Server(format!("invalid header value {value:?}: {err}")))
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        header_value(format!("{disposition}; filename=\"{download_name}\""))?,
    );
    headers.insert(PAGES_HEADER, HeaderValue::from(merged.page_count));
    headers.insert(SHA256_HEADER, header_value(merged.sha256.clone())?);

    Ok((StatusCode::OK, headers, merged.bytes.clone()).into_response())
}

/// A `FolioError` rendered as a plain-text HTTP response.
#[derive(Debug)]
pub struct ApiError(pub FolioError);

impl From<FolioError> for ApiError {
    fn from(err: FolioError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let human = humanize_error(&self.0);
        let status = match human.severity {
            Severity::ClientError => {
                warn!(error = %self.0, "Rejected upload");
                StatusCode::BAD_REQUEST
            }
            Severity::ServerError => {
                error!(error = %self.0, "Conversion failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            human.message,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use folio_core::AppConfig;
    use folio_document::PdfReader;
    use tower::ServiceExt;

    const BOUNDARY: &str = "folio-test-boundary";

    struct Part<'a> {
        field: &'a str,
        file_name: &'a str,
        body: &'a [u8],
    }

    fn part<'a>(file_name: &'a str, body: &'a [u8]) -> Part<'a> {
        Part {
            field: "markdown_files",
            file_name,
            body,
        }
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.field, part.file_name
                )
                .as_bytes(),
            );
            body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            body.extend_from_slice(part.body);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn convert_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn app_with_staging(dir: &std::path::Path) -> Router {
        router(AppState::new(AppConfig {
            staging_dir: Some(dir.to_path_buf()),
            ..AppConfig::default()
        }))
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn staged_entries(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = router(AppState::new(AppConfig::default()));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn index_serves_upload_form() {
        let app = router(AppState::new(AppConfig::default()));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("name=\"markdown_files\""));
    }

    #[tokio::test]
    async fn converts_and_merges_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let long = format!("{}Finale", "Body text that fills the page up nicely.\n".repeat(150));
        let parts = [part("one.md", b"# One"), part("two.txt", long.as_bytes())];

        let response = app_with_staging(dir.path())
            .oneshot(convert_request("/convert", &parts))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers().clone();
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"merged.pdf\""
        );
        let pages: usize = headers[PAGES_HEADER].to_str().unwrap().parse().unwrap();
        assert!(pages >= 3);
        assert_eq!(headers[SHA256_HEADER].len(), 64);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(PdfReader::from_bytes(&bytes).unwrap().page_count(), pages);
        assert_eq!(staged_entries(dir.path()), 0);

        let merged = lopdf::Document::load_mem(&bytes).unwrap();
        let first = merged.extract_text(&[1]).unwrap();
        assert!(first.contains("One") && !first.contains("Body"), "{first:?}");
        let last = merged.extract_text(&[pages as u32]).unwrap();
        assert!(last.contains("Finale") && !last.contains("One"), "{last:?}");
    }

    #[tokio::test]
    async fn inline_query_switches_disposition() {
        let dir = tempfile::tempdir().unwrap();
        let response = app_with_staging(dir.path())
            .oneshot(convert_request("/convert?inline=true", &[part("a.md", b"hi")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .starts_with("inline")
        );
    }

    #[tokio::test]
    async fn missing_field_is_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let parts = [Part {
            field: "something_else",
            file_name: "a.md",
            body: b"x",
        }];
        let response = app_with_staging(dir.path())
            .oneshot(convert_request("/convert", &parts))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "No files uploaded");
    }

    #[tokio::test]
    async fn empty_file_name_is_no_selection() {
        let dir = tempfile::tempdir().unwrap();
        let response = app_with_staging(dir.path())
            .oneshot(convert_request("/convert", &[part("", b"")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "No files selected");
    }

    #[tokio::test]
    async fn bad_extension_rejects_before_staging() {
        let dir = tempfile::tempdir().unwrap();
        let parts = [part("a.md", b"fine"), part("b.pdf", b"%PDF")];
        let response = app_with_staging(dir.path())
            .oneshot(convert_request("/convert", &parts))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "Only .md and .txt files are allowed"
        );
        assert_eq!(staged_entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn non_utf8_upload_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let response = app_with_staging(dir.path())
            .oneshot(convert_request("/convert", &[part("latin.txt", &[0xe9, 0x74, 0xe9])]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("latin.txt"));
    }

    #[tokio::test]
    async fn unusable_staging_root_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let response = app_with_staging(&missing)
            .oneshot(convert_request("/convert", &[part("a.md", b"x")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
