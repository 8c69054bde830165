//! The audit service: append, verify, query.
//!
//! `AuditService` owns the only write path into the ledger.  Appends are
//! linearized behind a single-writer mutex held across the whole
//! read-tail → hash → insert sequence; the tail is re-read from the store
//! on every append and never cached across calls, so a restarted or
//! re-wired service can never fork the chain against its own stale memory.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, warn};

use verdigris_contracts::{
    entry::{AppendReceipt, AppendRequest, AuditEntry},
    error::{VerdigrisError, VerdigrisResult},
    query::AuditQuery,
};
use verdigris_core::{AuditSink, LedgerStore};

use crate::chain::{entry_hash, verify_entries, IntegrityReport};

/// The tamper-evident audit ledger service.
///
/// # Concurrency
///
/// Within one process, the append mutex guarantees no two appends observe
/// the same tail.  A deployment running several service instances against
/// one shared store must additionally serialize at the storage level (the
/// `LedgerStore` contract spells this out) — the mutex here cannot see
/// writers in other processes.
pub struct AuditService {
    store: Arc<dyn LedgerStore>,
    append_lock: Mutex<()>,
}

impl AuditService {
    /// Build the service over a ledger store.
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            store,
            append_lock: Mutex::new(()),
        }
    }

    /// Append one entry to the chain and return its id and hash.
    ///
    /// The timestamp is assigned here — callers cannot backdate entries.
    /// The previous hash is read fresh from the store under the append
    /// lock; an empty ledger links to the `"0"` genesis sentinel.
    ///
    /// # Errors
    ///
    /// `Storage` when the store read or insert fails.  Tampering is never
    /// reported here — it is only observable via [`AuditService::verify`].
    pub fn append(&self, request: AppendRequest) -> VerdigrisResult<AppendReceipt> {
        let _guard = self
            .append_lock
            .lock()
            .map_err(|e| VerdigrisError::Storage {
                reason: format!("append lock poisoned: {}", e),
            })?;

        let previous_hash = self
            .store
            .tail()?
            .map(|tail| tail.hash)
            .unwrap_or_else(|| AuditEntry::GENESIS_HASH.to_string());

        let mut entry = AuditEntry {
            id: 0, // assigned by the store on insert
            previous_hash,
            current_hash: String::new(),
            action: request.action,
            table_name: request.table_name,
            record_id: request.record_id,
            user_id: request.user_id,
            user_role: request.user_role,
            old_values: request.old_values,
            new_values: request.new_values,
            timestamp: Utc::now(),
            metadata: request.metadata,
        };
        entry.current_hash = entry_hash(&entry);

        let hash = entry.current_hash.clone();
        let id = self.store.insert(entry)?;

        debug!(
            id,
            hash = %hash,
            "audit entry appended"
        );

        Ok(AppendReceipt { id, hash })
    }

    /// Verify chain integrity over `[start_id, end_id]`, or `[start_id, ∞)`
    /// when `end_id` is `None`.
    ///
    /// Read-only and idempotent: safe to abandon and re-run at any time.
    /// An empty range yields a valid report with zero entries.
    pub fn verify(
        &self,
        start_id: i64,
        end_id: Option<i64>,
    ) -> VerdigrisResult<IntegrityReport> {
        let entries = self.store.range(start_id, end_id)?;
        let report = verify_entries(&entries);

        if !report.is_valid {
            warn!(
                start_id,
                end_id = ?end_id,
                invalid = ?report.invalid_entries,
                "audit chain verification found invalid entries"
            );
        }

        Ok(report)
    }

    /// Filtered read over the ledger: AND-combined optional filters,
    /// timestamp descending, capped at the query's effective limit.
    pub fn query(&self, query: &AuditQuery) -> VerdigrisResult<Vec<AuditEntry>> {
        self.store.query(query)
    }
}

impl AuditSink for AuditService {
    fn append(&self, request: AppendRequest) -> VerdigrisResult<AppendReceipt> {
        AuditService::append(self, request)
    }
}
