//! In-memory implementation of `NotificationStore`.
//!
//! The claim/release cycle is backed by an in-flight id set held inside the
//! same mutex as the items, so a claim is atomic with respect to concurrent
//! `claim_batch` calls: an item is visible to at most one unfinished batch
//! at a time.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use verdigris_contracts::{
    error::{VerdigrisError, VerdigrisResult},
    notification::{NotificationQueueItem, NotificationStatus},
};
use verdigris_core::NotificationStore;

/// The mutable interior of an [`InMemoryNotificationStore`].
struct QueueState {
    /// All items ever enqueued, in insertion order.  Never removed.
    items: Vec<NotificationQueueItem>,

    /// The next id to assign (ids start at 1).
    next_id: i64,

    /// Ids claimed by a batch and not yet released.
    in_flight: HashSet<i64>,
}

/// An in-memory notification queue store.
pub struct InMemoryNotificationStore {
    state: Mutex<QueueState>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: Vec::new(),
                next_id: 1,
                in_flight: HashSet::new(),
            }),
        }
    }

    fn lock(&self) -> VerdigrisResult<MutexGuard<'_, QueueState>> {
        self.state.lock().map_err(|e| VerdigrisError::Storage {
            reason: format!("notification state lock poisoned: {}", e),
        })
    }

    /// Snapshot one item by id.  Test/inspection helper.
    pub fn item(&self, id: i64) -> VerdigrisResult<Option<NotificationQueueItem>> {
        let state = self.lock()?;
        Ok(state.items.iter().find(|item| item.id == id).cloned())
    }
}

impl Default for InMemoryNotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationStore for InMemoryNotificationStore {
    fn insert(&self, mut item: NotificationQueueItem) -> VerdigrisResult<i64> {
        let mut state = self.lock()?;
        let id = state.next_id;
        item.id = id;
        state.items.push(item);
        state.next_id += 1;
        Ok(id)
    }

    fn claim_batch(
        &self,
        limit: usize,
        max_attempts: u32,
    ) -> VerdigrisResult<Vec<NotificationQueueItem>> {
        let mut state = self.lock()?;

        let mut eligible: Vec<NotificationQueueItem> = state
            .items
            .iter()
            .filter(|item| {
                item.status == NotificationStatus::Pending
                    && item.attempts < max_attempts
                    && !state.in_flight.contains(&item.id)
            })
            .cloned()
            .collect();

        // Oldest first; id ascending breaks created_at ties.
        eligible.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        eligible.truncate(limit);

        for item in &eligible {
            state.in_flight.insert(item.id);
        }

        Ok(eligible)
    }

    fn mark_sent(&self, id: i64, sent_at: DateTime<Utc>) -> VerdigrisResult<()> {
        let mut state = self.lock()?;
        state.in_flight.remove(&id);

        let item = state
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| VerdigrisError::NotFound {
                entity: "notification".to_string(),
                id: id.to_string(),
            })?;

        item.status = NotificationStatus::Sent;
        item.sent_at = Some(sent_at);
        Ok(())
    }

    fn record_failure(&self, id: i64, max_attempts: u32) -> VerdigrisResult<u32> {
        let mut state = self.lock()?;
        state.in_flight.remove(&id);

        let item = state
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| VerdigrisError::NotFound {
                entity: "notification".to_string(),
                id: id.to_string(),
            })?;

        item.attempts += 1;
        if item.attempts >= max_attempts {
            item.status = NotificationStatus::Failed;
        }
        Ok(item.attempts)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
