//! The "last listing" slot shared by all commands of one process
//!
//! Listing commands replace the snapshot wholesale; `comments` resolves
//! 1-based positions against whichever snapshot is current. Each operation
//! runs under one mutex so a concurrent replace and resolve never observe a
//! half-written listing.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::types::{ItemId, ListingEntry};

/// Ordered snapshot of the most recent listing, 1-indexed externally
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionListing {
    entries: Vec<ListingEntry>,
}

impl SessionListing {
    pub fn new(entries: Vec<ListingEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ListingEntry] {
        &self.entries
    }

    /// ID at 1-based `position`, if the position is inside the listing
    pub fn resolve(&self, position: u64) -> Option<ItemId> {
        let index = usize::try_from(position).ok()?.checked_sub(1)?;
        self.entries.get(index).map(|entry| entry.id)
    }
}

/// Process-wide holder of the current [`SessionListing`]
///
/// Construct one per server (or per test) and hand it to the dispatcher.
#[derive(Debug, Default)]
pub struct SessionState {
    listing: Mutex<SessionListing>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically swap in a new listing, invalidating all previous positions
    pub fn replace(&self, entries: Vec<ListingEntry>) {
        *self.lock() = SessionListing::new(entries);
    }

    /// ID at 1-based `position` of the current listing
    pub fn resolve(&self, position: u64) -> Option<ItemId> {
        self.lock().resolve(position)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the current listing
    pub fn snapshot(&self) -> SessionListing {
        self.lock().clone()
    }

    // A panic while holding the lock cannot leave a torn listing: the only
    // write is a single assignment.
    fn lock(&self) -> MutexGuard<'_, SessionListing> {
        self.listing.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn entry(id: u64) -> ListingEntry {
        ListingEntry {
            id: ItemId::new(id),
            title: format!("Story {id}"),
            author: "pg".to_string(),
            created_at: 1_160_418_111,
            url: None,
            score: 1,
            child_count: 0,
        }
    }

    #[test]
    fn test_starts_empty() {
        let session = SessionState::new();
        assert!(session.is_empty());
        assert_eq!(session.resolve(1), None);
    }

    #[test]
    fn test_resolve_is_one_based_and_bounded() {
        let session = SessionState::new();
        session.replace(vec![entry(100), entry(200), entry(300)]);

        assert_eq!(session.resolve(0), None);
        assert_eq!(session.resolve(1), Some(ItemId::new(100)));
        assert_eq!(session.resolve(3), Some(ItemId::new(300)));
        assert_eq!(session.resolve(4), None);
        assert_eq!(session.resolve(u64::MAX), None);
    }

    #[test]
    fn test_replace_invalidates_previous_positions() {
        let session = SessionState::new();
        session.replace(vec![entry(1), entry(2), entry(3)]);
        session.replace(vec![entry(9)]);

        assert_eq!(session.len(), 1);
        assert_eq!(session.resolve(1), Some(ItemId::new(9)));
        assert_eq!(session.resolve(2), None);
    }

    #[test]
    fn test_concurrent_replace_never_tears() {
        let session = Arc::new(SessionState::new());
        let listings: Vec<Vec<ListingEntry>> = (1..=8u64)
            .map(|n| (1..=n).map(|i| entry(n * 100 + i)).collect())
            .collect();

        let handles: Vec<_> = listings
            .into_iter()
            .map(|listing| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        session.replace(listing.clone());
                        let snapshot = session.snapshot();
                        let n = snapshot.len() as u64;
                        // every entry of a snapshot belongs to the same listing
                        assert!(snapshot.entries().iter().all(|e| e.id.get() / 100 == n));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
