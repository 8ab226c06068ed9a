//! Hacker News HTTP client using the Typestate pattern
//!
//! The client must be initialized before making requests.
//! Invalid states (like fetching without initialization) are compile-time errors.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{Error, ErrorContext, Result};
use crate::store::ItemStore;
use crate::types::{Feed, Item, ItemId, WireItem};

/// Public Firebase endpoint of the Hacker News API
pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Marker type: Client is not yet initialized
pub struct Uninitialized;

/// Marker type: Client is ready to make requests
pub struct Ready {
    http: reqwest::Client,
}

/// Hacker News HTTP client with typestate pattern
///
/// The client transitions from `Uninitialized` to `Ready` after calling `init()`.
/// You cannot fetch anything with an uninitialized client - it won't compile.
pub struct HackerNewsClient<State> {
    base_url: String,
    user_agent: String,
    timeout: Duration,
    state: State,
}

impl HackerNewsClient<Uninitialized> {
    /// Create a new uninitialized client pointing at the public API
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("hn-mcp/{}", env!("CARGO_PKG_VERSION")),
            timeout: DEFAULT_TIMEOUT,
            state: Uninitialized,
        }
    }

    /// Point the client at another API root (trailing slashes are ignored)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set a custom user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Initialize the client, transitioning to Ready state
    ///
    /// This consumes the Uninitialized client and returns a Ready client.
    /// After this, you can make HTTP requests.
    pub fn init(self) -> Result<HackerNewsClient<Ready>> {
        let http = reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()
            .with_context("client initialization")?;

        Ok(HackerNewsClient {
            base_url: self.base_url,
            user_agent: self.user_agent,
            timeout: self.timeout,
            state: Ready { http },
        })
    }
}

impl Default for HackerNewsClient<Uninitialized> {
    fn default() -> Self {
        Self::new()
    }
}

impl<State> HackerNewsClient<State> {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn feed_url(&self, feed: Feed) -> String {
        format!("{}/{}", self.base_url, feed.resource())
    }

    fn item_url(&self, id: ItemId) -> String {
        format!("{}/item/{}.json", self.base_url, id)
    }
}

impl HackerNewsClient<Ready> {
    /// Fetch the ordered ID list of a feed
    ///
    /// A `null` body is treated as an empty feed.
    #[instrument(skip(self))]
    pub async fn try_fetch_feed_ids(&self, feed: Feed) -> Result<Vec<ItemId>> {
        let url = self.feed_url(feed);
        let body = self.get_text(&url).await?;

        let ids: Option<Vec<u64>> = serde_json::from_str(&body).map_err(|e| Error::Decode {
            url: url.clone(),
            details: e.to_string(),
        })?;
        let ids: Vec<ItemId> = ids.unwrap_or_default().into_iter().map(ItemId::new).collect();

        debug!(count = ids.len(), "Fetched feed IDs");
        Ok(ids)
    }

    /// Fetch a single item
    ///
    /// Returns `Ok(None)` when the store does not know the ID (`null` body or
    /// 404) or when the item is of a kind this server does not present.
    #[instrument(skip(self))]
    pub async fn try_fetch_item(&self, id: ItemId) -> Result<Option<Item>> {
        let url = self.item_url(id);

        let response = self.state.http.get(&url).send().await.with_context(&url)?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response
            .error_for_status()
            .with_context(&url)?
            .text()
            .await
            .with_context(&url)?;

        let wire: Option<WireItem> = serde_json::from_str(&body).map_err(|e| Error::Decode {
            url: url.clone(),
            details: e.to_string(),
        })?;

        Ok(wire.and_then(Item::from_wire))
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        self.state
            .http
            .get(url)
            .send()
            .await
            .with_context(url)?
            .error_for_status()
            .with_context(url)?
            .text()
            .await
            .with_context(url)
    }
}

// Only a ready client can be cloned; clones share the connection pool
impl Clone for HackerNewsClient<Ready> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: self.timeout,
            state: Ready {
                http: self.state.http.clone(),
            },
        }
    }
}

#[async_trait]
impl ItemStore for HackerNewsClient<Ready> {
    async fn fetch_feed_ids(&self, feed: Feed) -> Vec<ItemId> {
        match self.try_fetch_feed_ids(feed).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(feed = %feed, error = %e, "Feed unavailable, treating as empty");
                Vec::new()
            }
        }
    }

    async fn fetch_item(&self, id: ItemId) -> Option<Item> {
        match self.try_fetch_item(id).await {
            Ok(item) => item,
            Err(e) => {
                warn!(item_id = %id, error = %e, "Item unavailable, skipping");
                None
            }
        }
    }
}
