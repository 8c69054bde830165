//! Service-boundary traits.
//!
//! These traits define the seams between the three services:
//!
//! - `AuditSink`      — trusted sink (every state-changing action lands here)
//! - `Notifier`       — outbound intent (enqueue only; delivery is elsewhere)
//! - `TransportSender` — opaque delivery collaborator, possibly absent
//!
//! The workflow engine depends on `AuditSink` and `Notifier` rather than on
//! the concrete services, so tests can substitute recording mocks and hosts
//! can swap implementations without touching the engine.

use verdigris_contracts::{
    entry::{AppendReceipt, AppendRequest},
    error::VerdigrisResult,
    notification::EnqueueRequest,
};

/// The append side of the audit ledger.
///
/// Every workflow transition produces exactly one entry through this trait.
/// Implementations must linearize appends: two concurrent calls must never
/// observe the same chain tail, or the chain forks and the integrity
/// guarantee is silently destroyed.
pub trait AuditSink: Send + Sync {
    /// Append one entry to the hash chain.
    ///
    /// The implementation assigns the timestamp and both hashes; the caller
    /// controls only the fields in `request`.  Storage failures propagate —
    /// a swallowed failure here would leave an undetectable gap.
    fn append(&self, request: AppendRequest) -> VerdigrisResult<AppendReceipt>;
}

/// The enqueue side of the notification queue.
///
/// Enqueueing records the *intent* to communicate; delivery happens later in
/// `process_queue` batches.  Callers must treat delivery as best-effort.
pub trait Notifier: Send + Sync {
    /// Insert one pending notification and return its store-assigned id.
    fn enqueue(&self, request: EnqueueRequest) -> VerdigrisResult<i64>;
}

/// The outbound delivery collaborator (e.g. an SMTP relay client).
///
/// The queue treats this as opaque and possibly absent: when no transport
/// is configured, delivery is a logged no-op success, so a deliberately
/// disabled transport is never retried to exhaustion.
pub trait TransportSender: Send + Sync {
    /// Attempt delivery of one message.
    ///
    /// Returns `Err(Transport)` on failure; the queue's retry bookkeeping
    /// absorbs the error.
    fn send(&self, recipient: &str, subject: &str, body: &str) -> VerdigrisResult<()>;
}
