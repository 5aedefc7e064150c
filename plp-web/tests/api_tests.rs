//! Router-level tests for the playlist API, driving the axum app with
//! tower's `oneshot` and a stubbed track search.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use http_body_util::BodyExt;
use plp_common::{Error, Result};
use plp_engine::{PlaylistItem, PlaylistOrchestrator, Resolver, SearchOutcome};
use plp_web::{build_router, AppState};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

/// Search stub answering from a fixed title set
#[derive(Default)]
struct StubResolver {
    tracks: HashMap<String, String>,
    error_status: Option<u16>,
}

impl StubResolver {
    fn with_track(mut self, title: &str, uri: &str) -> Self {
        self.tracks.insert(title.to_string(), uri.to_string());
        self
    }

    fn with_error(mut self, status: u16) -> Self {
        self.error_status = Some(status);
        self
    }
}

#[async_trait]
impl Resolver for StubResolver {
    async fn search(
        &self,
        title: &str,
        _modified_since: Option<DateTime<Utc>>,
    ) -> Result<SearchOutcome> {
        if let Some(status) = self.error_status {
            return Err(Error::Resolver { status });
        }
        Ok(match self.tracks.get(title) {
            Some(uri) => {
                let now = Utc::now();
                SearchOutcome::Found(PlaylistItem::new(
                    title,
                    uri,
                    now,
                    now + ChronoDuration::hours(1),
                ))
            }
            None => SearchOutcome::NoMatch,
        })
    }
}

fn app(resolver: StubResolver) -> axum::Router {
    let orchestrator = PlaylistOrchestrator::new(Arc::new(resolver), None);
    build_router(AppState::new(orchestrator))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok_and_version() {
    let response = app(StubResolver::default())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "plp-web");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn get_with_message_generates_a_playlist() {
    let resolver = StubResolver::default()
        .with_track("hello", "spotify:track:aaaaaaaaaaaaaaaaaaaaaa")
        .with_track("world", "spotify:track:bbbbbbbbbbbbbbbbbbbbbb");

    let response = app(resolver)
        .oneshot(
            Request::builder()
                .uri("/api/playlist?message=hello%20world")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["partial"], false);
    let playlist = body["playlist"].as_array().unwrap();
    assert_eq!(playlist.len(), 2);
    assert_eq!(playlist[0]["name"], "hello");
    assert_eq!(
        playlist[0]["url"],
        "http://open.spotify.com/track/aaaaaaaaaaaaaaaaaaaaaa"
    );
}

#[tokio::test]
async fn post_with_json_body_generates_a_playlist() {
    // A standalone sentence is biased toward at least two tracks, so the
    // full phrase is never offered as one group
    let resolver = StubResolver::default()
        .with_track("blue", "spotify:track:cccccccccccccccccccccc")
        .with_track("suede shoes", "spotify:track:dddddddddddddddddddddd");

    let response = app(resolver)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/playlist")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"message": "Blue Suede Shoes!"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["partial"], false);
    assert_eq!(body["playlist"][0]["name"], "blue");
    assert_eq!(body["playlist"][1]["name"], "suede shoes");
}

#[tokio::test]
async fn missing_message_is_a_bad_request() {
    let response = app(StubResolver::default())
        .oneshot(
            Request::builder()
                .uri("/api/playlist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unmatchable_message_is_not_found() {
    let response = app(StubResolver::default())
        .oneshot(
            Request::builder()
                .uri("/api/playlist?message=xyzzy%20plugh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_api_error_maps_to_bad_gateway() {
    let response = app(StubResolver::default().with_error(500))
        .oneshot(
            Request::builder()
                .uri("/api/playlist?message=hello")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "RESOLVER_ERROR");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("500"));
}
