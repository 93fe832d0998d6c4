use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use serde::{Deserialize, Serialize};

/// Where a collection stands with respect to its most recent fetch.
/// Pages branch on this to show a spinner, the data, or an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    #[serde(default)]
    pub total_records: u64,
}

/// Anything cached under a server-assigned identifier.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// One entity collection plus its synchronization state. Transitions are
/// pure and synchronous; all I/O happens in the owning store before the
/// result is applied here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionState<T> {
    pub items: Vec<T>,
    pub status: Status,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip)]
    newest_fetch: u64,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: Status::Idle,
            error: None,
            pagination: None,
            newest_fetch: 0,
        }
    }
}

impl<T: Keyed> CollectionState<T> {
    pub fn fetch_started(&mut self, seq: u64) {
        self.newest_fetch = seq;
        self.status = Status::Loading;
        self.error = None;
    }

    /// Applies a fetch result only if `seq` still names the newest fetch
    /// started on this collection. A response that lost the race to a
    /// later request is dropped, so an older page can never overwrite a
    /// newer one.
    pub fn fetch_succeeded(
        &mut self,
        seq: u64,
        items: Vec<T>,
        pagination: Option<Pagination>,
    ) -> bool {
        if seq != self.newest_fetch {
            debug!("dropping stale fetch result (seq {seq} < {})", self.newest_fetch);
            return false;
        }
        self.status = Status::Succeeded;
        self.items = items;
        self.pagination = pagination;
        true
    }

    pub fn fetch_failed(&mut self, seq: u64, message: String) -> bool {
        if seq != self.newest_fetch {
            debug!("dropping stale fetch error (seq {seq} < {})", self.newest_fetch);
            return false;
        }
        self.status = Status::Failed;
        self.error = Some(message);
        true
    }

    /// Appends a freshly created record. No re-fetch happens; the next
    /// fetch re-establishes server order.
    pub fn created(&mut self, item: T) {
        self.items.push(item);
    }

    /// Replaces the record with a matching identifier. An identifier the
    /// cache has never seen is dropped silently.
    pub fn updated(&mut self, item: T) {
        if let Some(slot) = self.items.iter_mut().find(|e| e.key() == item.key()) {
            *slot = item;
        }
    }

    /// Removes by identifier. Removing an id that is already absent is a
    /// no-op, so deletes are idempotent from the cache's point of view.
    pub fn removed(&mut self, id: &str) {
        self.items.retain(|e| e.key() != id);
    }
}

/// Hands out fetch sequence numbers, one counter per store.
#[derive(Debug, Default)]
pub struct Sequencer(AtomicU64);

impl Sequencer {
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Row {
        id: String,
        label: String,
    }

    impl Keyed for Row {
        fn key(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str, label: &str) -> Row {
        Row {
            id: id.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn fetch_lifecycle_clears_error_and_applies_items() {
        let mut state = CollectionState::<Row>::default();
        state.fetch_started(1);
        assert_eq!(state.status, Status::Loading);
        state.fetch_failed(1, "boom".to_string());
        assert_eq!(state.status, Status::Failed);
        assert_eq!(state.error.as_deref(), Some("boom"));

        state.fetch_started(2);
        assert_eq!(state.error, None);
        assert!(state.fetch_succeeded(2, vec![row("a", "A")], None));
        assert_eq!(state.status, Status::Succeeded);
        assert_eq!(state.items.len(), 1);
    }

    #[test]
    fn stale_fetch_results_are_discarded() {
        let mut state = CollectionState::<Row>::default();
        state.fetch_started(1);
        state.fetch_started(2);
        // The older request resolves last and must not win.
        assert!(state.fetch_succeeded(2, vec![row("new", "B")], None));
        assert!(!state.fetch_succeeded(1, vec![row("old", "A")], None));
        assert_eq!(state.items[0].id, "new");
        assert!(!state.fetch_failed(1, "late error".to_string()));
        assert_eq!(state.status, Status::Succeeded);
        assert_eq!(state.error, None);
    }

    #[test]
    fn update_unknown_id_is_dropped() {
        let mut state = CollectionState::<Row>::default();
        state.fetch_started(1);
        state.fetch_succeeded(1, vec![row("a", "A"), row("b", "B")], None);
        state.updated(row("c", "C"));
        assert_eq!(state.items.len(), 2);
        state.updated(row("b", "B2"));
        assert_eq!(state.items[1].label, "B2");
        assert_eq!(state.items[0].label, "A");
    }

    #[test]
    fn removal_is_idempotent() {
        let mut state = CollectionState::<Row>::default();
        state.fetch_started(1);
        state.fetch_succeeded(1, vec![row("a", "A"), row("b", "B")], None);
        state.removed("a");
        assert_eq!(state.items.len(), 1);
        state.removed("a");
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].id, "b");
    }
}
