//! Playlist generation endpoint
//!
//! `GET /api/playlist?message=...` and `POST /api/playlist` with a JSON
//! body both produce the same response shape:
//! `{ "success": true, "partial": bool, "playlist": [{name, uri, url}] }`.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use plp_engine::spotify_uri_to_url;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct PlaylistQuery {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistRequest {
    pub message: String,
}

/// One resolved track in the response
#[derive(Debug, Serialize)]
pub struct TrackEntry {
    pub name: String,
    pub uri: String,
    /// Web link for the track URI, when it is a track URI
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlaylistResponse {
    pub success: bool,
    /// True when the playlist covers only part of the message
    pub partial: bool,
    pub playlist: Vec<TrackEntry>,
}

/// GET /api/playlist?message=...
pub async fn generate_from_query(
    State(state): State<AppState>,
    Query(query): Query<PlaylistQuery>,
) -> ApiResult<Json<PlaylistResponse>> {
    generate(state, query.message.unwrap_or_default()).await
}

/// POST /api/playlist
pub async fn generate_from_body(
    State(state): State<AppState>,
    Json(request): Json<PlaylistRequest>,
) -> ApiResult<Json<PlaylistResponse>> {
    generate(state, request.message).await
}

async fn generate(state: AppState, message: String) -> ApiResult<Json<PlaylistResponse>> {
    if message.trim().is_empty() {
        return Err(ApiError::BadRequest("No message provided".to_string()));
    }
    info!(message = %message, "Generating playlist from message");

    let playlist = state.orchestrator.generate(&message).await?;
    if playlist.items.is_empty() {
        return Err(ApiError::NotFound(
            "Not able to generate playlist".to_string(),
        ));
    }

    let tracks = playlist
        .items
        .into_iter()
        .map(|item| TrackEntry {
            url: spotify_uri_to_url(&item.uri),
            name: item.name,
            uri: item.uri,
        })
        .collect();

    Ok(Json(PlaylistResponse {
        success: true,
        partial: !playlist.complete,
        playlist: tracks,
    }))
}

/// Build playlist routes
pub fn playlist_routes() -> Router<AppState> {
    Router::new().route(
        "/api/playlist",
        get(generate_from_query).post(generate_from_body),
    )
}
