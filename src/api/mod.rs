//! HTTP surface.
//!
//! Thin axum layer over the catalog components: handlers parse the request,
//! run the component on the blocking pool, and map [`CatalogError`] onto a
//! status code. Routes live under `/api/v1`:
//!
//! - `GET /songs/search/filters`: filtered, paginated search
//! - `GET /songs/search/verse`: one page of a song's verses
//! - `POST /songs`: create
//! - `PUT /songs/:id`: whole-record replace
//! - `DELETE /songs/:id`: delete
//!
//! [`CatalogError`]: crate::error::CatalogError

mod error;
mod handlers;
mod logging;


use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::routing::{get, post, put};
use axum::{middleware, Extension, Router};

use crate::catalog::SongCatalog;
use crate::db::SharedStore;
use crate::query::FilterQueryEngine;
use crate::verses::VersePaginator;

pub use error::ErrorBody;

/// Components shared by every request. Cloning is cheap; each component only
/// holds the store handle.
#[derive(Clone)]
pub struct Services {
    pub search: FilterQueryEngine,
    pub verses: VersePaginator,
    pub catalog: SongCatalog,
}

impl Services {
    pub fn new(store: SharedStore, max_limit: u32) -> Self {
        Self {
            search: FilterQueryEngine::with_max_limit(store.clone(), max_limit),
            verses: VersePaginator::new(store.clone()),
            catalog: SongCatalog::new(store),
        }
    }
}

pub fn router(services: Services) -> Router {
    let songs = Router::new()
        .route("/songs/search/filters", get(handlers::search_songs))
        .route("/songs/search/verse", get(handlers::verse_page))
        .route("/songs", post(handlers::create_song))
        .route(
            "/songs/:id",
            put(handlers::replace_song).delete(handlers::delete_song),
        );

    Router::new()
        .nest("/api/v1", songs)
        .layer(middleware::from_fn(logging::log_requests))
        .layer(Extension(services))
}

/// Bind and serve until Ctrl+C.
pub async fn serve(addr: SocketAddr, services: Services) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("HTTP server listening on {}", addr);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, router(services))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
