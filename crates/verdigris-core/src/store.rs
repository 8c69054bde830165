//! Persistence-boundary traits.
//!
//! One trait per table group: the append-only ledger, the workflow pair
//! (workflow + steps), and the notification queue.  Each service is
//! constructed over exactly one of these, so a host can back them with a
//! database while tests use the in-memory reference implementations.
//!
//! All implementations must be `Send + Sync`; the services share them via
//! `Arc` across whatever concurrency model the host runs.

use chrono::{DateTime, Utc};

use verdigris_contracts::{
    entry::AuditEntry,
    error::VerdigrisResult,
    notification::NotificationQueueItem,
    query::AuditQuery,
    workflow::{ApprovalLevel, ApprovalStep, Workflow},
};

/// The current end of the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTail {
    /// Id of the highest entry.
    pub id: i64,
    /// That entry's `current_hash` — the next entry's `previous_hash`.
    pub hash: String,
}

/// Append-only persistence for the audit ledger.
///
/// Rows are inserted once and never updated or deleted.  The audit service
/// serializes `tail()` + `insert()` behind a single-writer lock; stores
/// backing multiple service instances must additionally serialize at the
/// storage level (e.g. a serializable transaction around read-tail/insert).
pub trait LedgerStore: Send + Sync {
    /// The highest-id entry's (id, hash), or `None` for an empty ledger.
    fn tail(&self) -> VerdigrisResult<Option<ChainTail>>;

    /// Insert one entry and return its assigned id.
    ///
    /// The store owns id assignment: `entry.id` is ignored and replaced
    /// with the next value in the total order.
    fn insert(&self, entry: AuditEntry) -> VerdigrisResult<i64>;

    /// All entries with `start_id <= id <= end_id` (unbounded above when
    /// `end_id` is `None`), ordered by id ascending.
    fn range(&self, start_id: i64, end_id: Option<i64>) -> VerdigrisResult<Vec<AuditEntry>>;

    /// Entries matching `query`'s AND-combined filters, ordered by
    /// timestamp descending, capped at the query's effective limit.
    ///
    /// Implementations over SQL must bind every filter value as a
    /// parameter, never by string interpolation.
    fn query(&self, query: &AuditQuery) -> VerdigrisResult<Vec<AuditEntry>>;
}

/// Persistence for workflows and their approval steps.
pub trait WorkflowStore: Send + Sync {
    /// Insert a workflow together with all of its steps as one atomic unit.
    ///
    /// Either everything lands or nothing does — a workflow must never be
    /// observable without its full step set.
    fn insert_workflow(&self, workflow: &Workflow, steps: &[ApprovalStep])
        -> VerdigrisResult<()>;

    /// Look up one workflow by id.
    fn workflow(&self, workflow_id: &str) -> VerdigrisResult<Option<Workflow>>;

    /// The workflow's steps in fixed level order.
    fn steps(&self, workflow_id: &str) -> VerdigrisResult<Vec<ApprovalStep>>;

    /// Persist a mutated workflow row (status/level/completion transitions).
    fn update_workflow(&self, workflow: &Workflow) -> VerdigrisResult<()>;

    /// Persist a decided step, keyed by (workflow_id, level).
    fn update_step(&self, step: &ApprovalStep) -> VerdigrisResult<()>;

    /// All pending workflows, optionally narrowed to those currently
    /// awaiting `level`, ordered by `submitted_at` descending.
    fn pending(&self, level: Option<ApprovalLevel>) -> VerdigrisResult<Vec<Workflow>>;
}

/// Persistence for the notification queue.
pub trait NotificationStore: Send + Sync {
    /// Insert one pending item and return its assigned id.
    ///
    /// As with the ledger, the store owns id assignment.
    fn insert(&self, item: NotificationQueueItem) -> VerdigrisResult<i64>;

    /// Atomically claim up to `limit` deliverable items — `Pending` with
    /// `attempts < max_attempts` — ordered by `created_at` ascending.
    ///
    /// A claimed item is invisible to concurrent `claim_batch` calls until
    /// `mark_sent` or `record_failure` releases it, so two overlapping
    /// batches never double-deliver the same item.
    fn claim_batch(
        &self,
        limit: usize,
        max_attempts: u32,
    ) -> VerdigrisResult<Vec<NotificationQueueItem>>;

    /// Mark a claimed item `Sent` at `sent_at` and release the claim.
    fn mark_sent(&self, id: i64, sent_at: DateTime<Utc>) -> VerdigrisResult<()>;

    /// Record a failed attempt on a claimed item and release the claim.
    ///
    /// Increments `attempts`; once `attempts >= max_attempts` the item
    /// transitions to `Failed`, otherwise it stays `Pending` for a later
    /// batch.  Returns the post-increment attempt count.
    fn record_failure(&self, id: i64, max_attempts: u32) -> VerdigrisResult<u32>;
}
