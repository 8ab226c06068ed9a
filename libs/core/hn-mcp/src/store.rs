use async_trait::async_trait;

use crate::types::{Feed, Item, ItemId};

/// Read-only access to the remote item store
///
/// Both operations fail soft: implementations log transport or decoding
/// problems and answer with "no data" instead of an error. A single attempt
/// is made per call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Ordered story IDs of a feed; empty when the feed is unavailable
    async fn fetch_feed_ids(&self, feed: Feed) -> Vec<ItemId>;

    /// A single item; `None` when unknown, unsupported, or unreachable
    async fn fetch_item(&self, id: ItemId) -> Option<Item>;
}
