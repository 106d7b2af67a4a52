//! Local static file server with security headers.
//!
//! Serves a directory tree over plain HTTP for local testing: every
//! response carries the fixed security header set, file extensions map to
//! MIME types through the shared table, and directory requests fall back
//! to `index.html`. Runs until Ctrl-C.

use anyhow::Result;
use axum::body::Body;
use axum::extract::State;
use axum::http::{self, StatusCode, Uri};
use axum::response::Response;
use axum::Router;
use sitemend::constants::{MIME_TYPES, SECURITY_HEADERS};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Settings for one server run.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Directory tree to serve.
    pub root: PathBuf,
    /// Port to bind on localhost.
    pub port: u16,
    /// Content-Security-Policy header value.
    pub csp: String,
}

/// MIME type for a file path, from the shared extension table.
fn mime_for(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| {
            MIME_TYPES
                .iter()
                .find(|(candidate, _)| candidate.eq_ignore_ascii_case(ext))
                .map(|(_, mime)| *mime)
        })
        .unwrap_or("application/octet-stream")
}

/// Turn a request path into a relative filesystem path.
///
/// Rejects anything that could escape the serve root: parent components,
/// backslashes, or empty traversal tricks.
fn sanitize_request_path(request_path: &str) -> Option<PathBuf> {
    if request_path.contains('\\') {
        return None;
    }

    let mut relative = PathBuf::new();
    for component in request_path.split('/') {
        match component {
            "" | "." => {}
            ".." => return None,
            name => relative.push(name),
        }
    }
    Some(relative)
}

#[allow(clippy::expect_used)] // header names and values are static and valid
fn respond(status: StatusCode, mime: &str, csp: &str, body: Vec<u8>) -> Response {
    let mut builder = http::Response::builder()
        .status(status)
        .header("Content-Type", mime);
    for (name, value) in SECURITY_HEADERS {
        builder = builder.header(*name, *value);
    }
    builder = builder.header("Content-Security-Policy", csp);
    builder
        .body(Body::from(body))
        .expect("static response headers are valid")
}

async fn serve_path(State(options): State<Arc<ServeOptions>>, uri: Uri) -> Response {
    let Some(relative) = sanitize_request_path(uri.path()) else {
        return respond(
            StatusCode::BAD_REQUEST,
            "text/plain",
            &options.csp,
            b"400 Bad Request".to_vec(),
        );
    };

    let mut full = options.root.join(relative);
    if uri.path().ends_with('/') || full.is_dir() {
        full.push("index.html");
    }

    match tokio::fs::read(&full).await {
        Ok(bytes) => respond(StatusCode::OK, mime_for(&full), &options.csp, bytes),
        Err(_) => respond(
            StatusCode::NOT_FOUND,
            "text/plain",
            &options.csp,
            b"404 Not Found".to_vec(),
        ),
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Run the server until interrupted.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn run(options: ServeOptions) -> Result<()> {
    let state = Arc::new(options);
    let app: Router = Router::new()
        .fallback(serve_path)
        .with_state(Arc::clone(&state));

    let addr = SocketAddr::from(([127, 0, 0, 1], state.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!(
        "Serving {} on http://localhost:{}/",
        state.root.display(),
        state.port
    );
    println!("Security headers active. Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("Server stopped.");
    Ok(())
}
