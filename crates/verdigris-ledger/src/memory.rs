//! In-memory implementation of `LedgerStore`.
//!
//! The reference store: a `Vec` behind a `Mutex`, safe to share across
//! threads via `Arc`.  Every trait method holds the lock for its whole
//! body, so `tail()`-then-`insert()` under the service's append lock is
//! observably atomic within one process.

use std::sync::{Mutex, MutexGuard};

use verdigris_contracts::{
    entry::AuditEntry,
    error::{VerdigrisError, VerdigrisResult},
    query::AuditQuery,
};
use verdigris_core::{ChainTail, LedgerStore};

/// The mutable interior of an [`InMemoryLedgerStore`].
pub(crate) struct LedgerState {
    /// All entries in insertion order.  Index `i` holds id `i + 1`.
    pub(crate) entries: Vec<AuditEntry>,

    /// The next id to assign (ids start at 1).
    pub(crate) next_id: i64,
}

/// An in-memory, append-only ledger store.
///
/// Intended for tests and single-process hosts; a production deployment
/// backs `LedgerStore` with a database.
pub struct InMemoryLedgerStore {
    pub(crate) state: Mutex<LedgerState>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState {
                entries: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> VerdigrisResult<MutexGuard<'_, LedgerState>> {
        self.state.lock().map_err(|e| VerdigrisError::Storage {
            reason: format!("ledger state lock poisoned: {}", e),
        })
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn tail(&self) -> VerdigrisResult<Option<ChainTail>> {
        let state = self.lock()?;
        Ok(state.entries.last().map(|entry| ChainTail {
            id: entry.id,
            hash: entry.current_hash.clone(),
        }))
    }

    fn insert(&self, mut entry: AuditEntry) -> VerdigrisResult<i64> {
        let mut state = self.lock()?;
        let id = state.next_id;
        entry.id = id;
        state.entries.push(entry);
        state.next_id += 1;
        Ok(id)
    }

    fn range(&self, start_id: i64, end_id: Option<i64>) -> VerdigrisResult<Vec<AuditEntry>> {
        let state = self.lock()?;
        Ok(state
            .entries
            .iter()
            .filter(|entry| {
                entry.id >= start_id && end_id.map_or(true, |end| entry.id <= end)
            })
            .cloned()
            .collect())
    }

    fn query(&self, query: &AuditQuery) -> VerdigrisResult<Vec<AuditEntry>> {
        let state = self.lock()?;

        let mut matched: Vec<AuditEntry> = state
            .entries
            .iter()
            .filter(|entry| {
                query
                    .record_id
                    .as_ref()
                    .map_or(true, |v| &entry.record_id == v)
                    && query
                        .table_name
                        .as_ref()
                        .map_or(true, |v| &entry.table_name == v)
                    && query.user_id.as_ref().map_or(true, |v| &entry.user_id == v)
                    && query.start_date.map_or(true, |v| entry.timestamp >= v)
                    && query.end_date.map_or(true, |v| entry.timestamp <= v)
            })
            .cloned()
            .collect();

        // Timestamp descending; id descending breaks ties deterministically.
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        matched.truncate(query.effective_limit());

        Ok(matched)
    }
}
