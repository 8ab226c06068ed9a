//! Concurrent fetch of a bounded batch of items
//!
//! Every fetch in a batch is issued at once and the batch completes when all
//! of them have settled. There is no concurrency limit: callers bound the
//! batch (listings take at most `MAX_LISTING_COUNT` IDs, comment batches are
//! one story's direct children). A caller that cannot bound its input must
//! gate this with a semaphore first.

use futures::future::join_all;
use tracing::debug;

use crate::store::ItemStore;
use crate::types::{Item, ItemId};

/// Fetch `ids` concurrently, dropping any that fail or are unknown.
///
/// Surviving items keep the relative order of their IDs in `ids`. An empty
/// input returns immediately without touching the store.
pub async fn fetch_many<S>(store: &S, ids: &[ItemId]) -> Vec<Item>
where
    S: ItemStore + ?Sized,
{
    if ids.is_empty() {
        return Vec::new();
    }

    let settled = join_all(ids.iter().map(|&id| store.fetch_item(id))).await;
    let items: Vec<Item> = settled.into_iter().flatten().collect();

    debug!(
        requested = ids.len(),
        fetched = items.len(),
        "Fan-out fetch settled"
    );
    items
}
