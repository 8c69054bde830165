//! Notification queue types.
//!
//! The queue decouples "a notification should be sent" from "a notification
//! was delivered."  Items are inserted `Pending` and carry their own retry
//! bookkeeping; they are never deleted, so the table doubles as a delivery
//! audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery state of a queued notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    /// Awaiting delivery (or awaiting another attempt after a failure).
    Pending,
    /// Delivered successfully, or the transport is deliberately absent.
    Sent,
    /// All delivery attempts exhausted.
    Failed,
}

impl NotificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Sent => "sent",
            NotificationStatus::Failed => "failed",
        }
    }
}

/// One durable row in the notification queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationQueueItem {
    /// Store-assigned id.
    pub id: i64,

    pub recipient: String,
    pub subject: String,
    pub body: String,

    /// Free-form label classifying the message (e.g. "approval_request",
    /// "approval_status").
    pub notification_type: String,

    /// Id of the entity this notification concerns, if any.
    pub related_id: Option<String>,

    pub status: NotificationStatus,

    /// Delivery attempts made so far.  Starts at 0.
    pub attempts: u32,

    pub created_at: DateTime<Utc>,

    /// Set when the item transitions to `Sent`.
    pub sent_at: Option<DateTime<Utc>>,
}

/// Caller-supplied fields for one enqueue.
#[derive(Debug, Clone)]
pub struct EnqueueRequest {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub notification_type: String,
    pub related_id: Option<String>,
}

/// The result of one delivery attempt within a `process_queue` batch.
///
/// `Failed` describes the *attempt*; the item itself may remain `Pending`
/// in the store if it still has retries left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub id: i64,
    pub status: DeliveryStatus,
    /// Transport error message for failed attempts.
    pub error: Option<String>,
}

/// Outcome discriminant for [`DeliveryOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sent,
    Failed,
}
