use anyhow::anyhow;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::{Extension, Json};
use serde::Serialize;

use super::Services;
use crate::catalog::CreateSong;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Song, SongReplacement, VersePage};
use crate::paging::parse_id;
use crate::query::SearchParams;
use crate::verses::VerseParams;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Run a store-bound component call off the async executor.
async fn blocking<T, F>(job: F) -> CatalogResult<T>
where
    F: FnOnce() -> CatalogResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|err| CatalogError::Retrieval(anyhow!("store task aborted: {err}")))?
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> CatalogResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| CatalogError::validation(rejection.body_text()))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> CatalogResult<T> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| CatalogError::validation(rejection.body_text()))
}

pub async fn search_songs(
    Extension(services): Extension<Services>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> CatalogResult<Json<Vec<Song>>> {
    let params = query_params(query)?;
    let songs = blocking(move || services.search.search(&params)).await?;
    Ok(Json(songs))
}

pub async fn verse_page(
    Extension(services): Extension<Services>,
    query: Result<Query<VerseParams>, QueryRejection>,
) -> CatalogResult<Json<VersePage>> {
    let params = query_params(query)?;
    let page = blocking(move || services.verses.get(&params)).await?;
    Ok(Json(page))
}

pub async fn create_song(
    Extension(services): Extension<Services>,
    body: Result<Json<CreateSong>, JsonRejection>,
) -> CatalogResult<Json<Song>> {
    let request = json_body(body)?;
    let song = blocking(move || services.catalog.create(&request)).await?;
    Ok(Json(song))
}

pub async fn replace_song(
    Extension(services): Extension<Services>,
    Path(id): Path<String>,
    body: Result<Json<SongReplacement>, JsonRejection>,
) -> CatalogResult<Json<MessageResponse>> {
    let id = parse_id(Some(&id))?;
    let replacement = json_body(body)?;
    blocking(move || services.catalog.replace(id, &replacement)).await?;
    Ok(Json(MessageResponse {
        message: "Song updated successfully",
    }))
}

pub async fn delete_song(
    Extension(services): Extension<Services>,
    Path(id): Path<String>,
) -> CatalogResult<Json<MessageResponse>> {
    let id = parse_id(Some(&id))?;
    blocking(move || services.catalog.delete(id)).await?;
    Ok(Json(MessageResponse {
        message: "Song deleted successfully",
    }))
}
