//! Audit ledger entry types.
//!
//! `AuditEntry` is one immutable row in the hash-chained ledger.  Each entry
//! commits to its predecessor via `previous_hash`, so retroactively editing,
//! deleting, or reordering any entry is detectable by recomputation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single entry in the append-only audit ledger.
///
/// Entries are created exclusively by the audit service and never updated
/// or deleted.  Modifying any hashed field — including the embedded
/// `old_values`/`new_values` snapshots — invalidates `current_hash` and is
/// detected by chain verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Monotonically increasing id assigned by the store on insert.
    /// Defines the total order of the chain.
    pub id: i64,

    /// `current_hash` of the entry immediately preceding this one, or
    /// [`AuditEntry::GENESIS_HASH`] for the first entry ever written.
    pub previous_hash: String,

    /// Lowercase hex SHA-256 over the canonical serialization of this
    /// entry's hashed fields (see `verdigris-ledger`'s chain module for
    /// the exact input layout).
    pub current_hash: String,

    /// Free-form label naming the operation (e.g. "workflow_created",
    /// "evidence_upload").
    pub action: String,

    /// Logical table the action applies to.
    pub table_name: String,

    /// Primary key of the affected row within `table_name`.
    pub record_id: String,

    /// Identity of the actor, supplied by the caller and recorded as-is.
    pub user_id: String,

    /// Role of the actor at the time of the action.  Informational —
    /// not part of the hash input.
    pub user_role: String,

    /// Snapshot of the record before the action, if any.  Stored verbatim
    /// and included in the hash input (`None` hashes as JSON `null`).
    pub old_values: Option<Value>,

    /// Snapshot of the record after the action, if any.  Stored verbatim
    /// and included in the hash input.
    pub new_values: Option<Value>,

    /// Entry creation time, assigned by the service at append time — never
    /// supplied by the caller, so entries cannot be backdated.
    pub timestamp: DateTime<Utc>,

    /// Request-context metadata.  Informational only — not hashed.
    pub metadata: Option<EntryMetadata>,
}

impl AuditEntry {
    /// Sentinel `previous_hash` for the first entry in the ledger.
    pub const GENESIS_HASH: &'static str = "0";
}

/// Request-context details attached to an entry for investigation purposes.
///
/// Excluded from the hash input: these fields may be absent or normalized
/// by intermediaries without affecting chain integrity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<String>,
}

/// Caller-supplied fields for one append.
///
/// The service assigns `id`, `timestamp`, and both hashes; everything the
/// caller controls travels in this struct.
#[derive(Debug, Clone)]
pub struct AppendRequest {
    pub action: String,
    pub table_name: String,
    pub record_id: String,
    pub user_id: String,
    pub user_role: String,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub metadata: Option<EntryMetadata>,
}

/// What the caller gets back from a successful append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendReceipt {
    /// Store-assigned id of the new entry.
    pub id: i64,
    /// The entry's `current_hash`.
    pub hash: String,
}
