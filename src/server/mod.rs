//! HTTP surface for place pages
//!
//! ```text
//! GET /health
//! GET /{locale}/{country}/p/{province}/{city}/{category}/{place}
//! GET /{locale}/{country}/{city}/{category}/{place}
//! ```
//!
//! Resolved pages are served as JSON `PageView`s. Stale paths get a
//! `301 Moved Permanently`; everything else is a 404 marked `noindex`.

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::DirectoryError;
use crate::page::PageAssembler;

/// Build the router with all routes and middleware
pub fn build_router(assembler: Arc<PageAssembler>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/:locale/:country/p/:province/:city/:category/:place",
            get(handlers::place_in_province),
        )
        .route(
            "/:locale/:country/:city/:category/:place",
            get(handlers::place_in_country),
        )
        .fallback(handlers::fallback)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .layer(Extension(assembler))
}

/// Bind and serve until the process is stopped
pub async fn serve(bind_addr: SocketAddr, assembler: Arc<PageAssembler>) -> Result<(), DirectoryError> {
    let app = build_router(assembler);
    let listener = TcpListener::bind(bind_addr).await?;
    info!(addr = %bind_addr, "Place directory listening");
    axum::serve(listener, app).await?;
    Ok(())
}
