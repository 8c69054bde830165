//! # verdigris-notify
//!
//! Durable notification queue with bounded retries for the VERDIGRIS core.
//!
//! Components enqueue outbound messages; a poll-style `process_queue` pass
//! attempts delivery through an opaque, possibly-absent transport and keeps
//! per-item retry bookkeeping.  Items are never deleted — the queue doubles
//! as a delivery audit trail.

pub mod memory;
pub mod queue;

pub use memory::InMemoryNotificationStore;
pub use queue::{NotificationQueue, BATCH_SIZE, MAX_ATTEMPTS};
