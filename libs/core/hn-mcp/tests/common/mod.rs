//! In-process stand-in for the Hacker News Firebase API
//!
//! Serves `/v0/{feed}.json` and `/v0/item/{id}.json` from fixed data on an
//! ephemeral port and counts every request it receives.

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct FakeUpstream {
    feeds: HashMap<String, serde_json::Value>,
    items: HashMap<u64, serde_json::Value>,
    failing: HashSet<u64>,
    requests: AtomicUsize,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, resource: &str, ids: &[u64]) -> Self {
        self.feeds
            .insert(resource.to_string(), serde_json::json!(ids));
        self
    }

    pub fn with_raw_feed(mut self, resource: &str, body: serde_json::Value) -> Self {
        self.feeds.insert(resource.to_string(), body);
        self
    }

    pub fn with_item(mut self, item: serde_json::Value) -> Self {
        let id = item["id"].as_u64().expect("fixture item needs an id");
        self.items.insert(id, item);
        self
    }

    pub fn with_story(self, id: u64, title: &str, kids: &[u64]) -> Self {
        self.with_item(serde_json::json!({
            "id": id,
            "type": "story",
            "by": "pg",
            "time": 1_700_000_000 + id,
            "title": title,
            "score": id % 500,
            "url": format!("https://example.com/{id}"),
            "kids": kids,
            "descendants": kids.len()
        }))
    }

    pub fn with_comment(self, id: u64, text: &str, kids: &[u64]) -> Self {
        self.with_item(serde_json::json!({
            "id": id,
            "type": "comment",
            "by": "dang",
            "time": 1_700_000_500 + id,
            "text": text,
            "kids": kids
        }))
    }

    /// Answer 500 for this item ID
    pub fn failing(mut self, id: u64) -> Self {
        self.failing.insert(id);
        self
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Serve on 127.0.0.1 and return the API base URL
    pub async fn serve(self: &Arc<Self>) -> String {
        let app = Router::new()
            .route("/v0/item/{file}", get(item))
            .route("/v0/{file}", get(feed))
            .with_state(Arc::clone(self));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake upstream");
        let addr = listener.local_addr().expect("fake upstream address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake upstream crashed");
        });

        format!("http://{addr}/v0")
    }
}

async fn feed(State(upstream): State<Arc<FakeUpstream>>, Path(file): Path<String>) -> Response {
    upstream.requests.fetch_add(1, Ordering::SeqCst);
    match upstream.feeds.get(&file) {
        Some(body) => axum::Json(body.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn item(State(upstream): State<Arc<FakeUpstream>>, Path(file): Path<String>) -> Response {
    upstream.requests.fetch_add(1, Ordering::SeqCst);
    let Some(id) = file
        .strip_suffix(".json")
        .and_then(|raw| raw.parse::<u64>().ok())
    else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    if upstream.failing.contains(&id) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    // Firebase answers unknown IDs with a literal `null`
    let body = upstream
        .items
        .get(&id)
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    axum::Json(body).into_response()
}
