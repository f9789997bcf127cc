use crate::models::feed::{is_provisional_id, CirclePost, Comment, Mission, Reflection};

/// Anything that can live in an optimistic feed: a stable string identity,
/// which is either a server id or a `tmp-` provisional id.
pub trait FeedItem {
    fn id(&self) -> &str;

    fn is_provisional(&self) -> bool {
        is_provisional_id(self.id())
    }
}

impl FeedItem for Comment {
    fn id(&self) -> &str {
        &self.id
    }
}

impl FeedItem for CirclePost {
    fn id(&self) -> &str {
        &self.id
    }
}

impl FeedItem for Mission {
    fn id(&self) -> &str {
        &self.id
    }
}

impl FeedItem for Reflection {
    fn id(&self) -> &str {
        &self.id
    }
}

/// An owned, newest-first list of displayed items with the three
/// reconciliation moves of the optimistic-update pattern: insert a
/// provisional entry, confirm it in place with the server entity, or roll it
/// back. The full-reload fallback always swaps the whole collection, never
/// merges.
#[derive(Debug, Default)]
pub struct OptimisticFeed<T: FeedItem> {
    items: Vec<T>,
}

impl<T: FeedItem> OptimisticFeed<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Prepend a provisional entry and hand back its temporary id.
    pub fn insert_provisional(&mut self, item: T) -> String {
        debug_assert!(item.is_provisional());
        let temp_id = item.id().to_string();
        self.items.insert(0, item);
        temp_id
    }

    /// Replace the provisional entry with the server entity, preserving its
    /// position. Returns false when no entry carries `temp_id` (already
    /// reloaded, or the owning view reloaded underneath us); the caller
    /// treats that as a no-op.
    pub fn confirm(&mut self, temp_id: &str, server_item: T) -> bool {
        match self.items.iter().position(|item| item.id() == temp_id) {
            Some(idx) => {
                self.items[idx] = server_item;
                true
            }
            None => false,
        }
    }

    /// Remove the provisional entry after a failed create. Safe no-op when
    /// the entry is already gone.
    pub fn rollback(&mut self, temp_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != temp_id);
        self.items.len() != before
    }

    /// Full-reload fallback: the server's order is authoritative and the
    /// collection is replaced wholesale.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }
}
