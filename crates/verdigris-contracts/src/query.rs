//! Read-side filter types for the audit ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parameterized filter for `audit.query`.
///
/// All fields are optional and AND-combined.  Results are ordered by entry
/// timestamp descending and capped at [`AuditQuery::DEFAULT_LIMIT`] unless
/// `limit` says otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditQuery {
    /// Match entries for one specific record.
    pub record_id: Option<String>,
    /// Match entries touching one logical table.
    pub table_name: Option<String>,
    /// Match entries produced by one actor.
    pub user_id: Option<String>,
    /// Inclusive lower bound on entry timestamp.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on entry timestamp.
    pub end_date: Option<DateTime<Utc>>,
    /// Maximum number of entries to return.
    pub limit: Option<usize>,
}

impl AuditQuery {
    /// Result cap applied when the caller does not set `limit`.
    pub const DEFAULT_LIMIT: usize = 1000;

    /// The limit this query actually applies.
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }
}
