//! The notification queue service.
//!
//! Decouples "a notification should be sent" from "a notification was
//! delivered."  `enqueue` is a pure insert; `process_queue` drains one
//! bounded batch and returns, so hosts invoke it poll/cron-style rather
//! than running a delivery daemon.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use verdigris_contracts::{
    error::VerdigrisResult,
    notification::{
        DeliveryOutcome, DeliveryStatus, EnqueueRequest, NotificationQueueItem,
        NotificationStatus,
    },
};
use verdigris_core::{NotificationStore, Notifier, TransportSender};

/// Maximum items claimed per `process_queue` pass.
pub const BATCH_SIZE: usize = 10;

/// Delivery attempts before an item is marked `Failed` for good.
pub const MAX_ATTEMPTS: u32 = 3;

/// The durable outbound-notification queue.
///
/// The transport collaborator is optional by design: a host that has
/// deliberately disabled outbound mail still runs the same queue, and
/// items are marked sent with a log line instead of retrying forever
/// against nothing.
pub struct NotificationQueue {
    store: Arc<dyn NotificationStore>,
    transport: Option<Arc<dyn TransportSender>>,
}

impl NotificationQueue {
    /// Build the queue over a store and an optional delivery transport.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        transport: Option<Arc<dyn TransportSender>>,
    ) -> Self {
        Self { store, transport }
    }

    /// Insert one pending notification and return its id.
    pub fn enqueue(&self, request: EnqueueRequest) -> VerdigrisResult<i64> {
        let item = NotificationQueueItem {
            id: 0, // assigned by the store on insert
            recipient: request.recipient,
            subject: request.subject,
            body: request.body,
            notification_type: request.notification_type,
            related_id: request.related_id,
            status: NotificationStatus::Pending,
            attempts: 0,
            created_at: Utc::now(),
            sent_at: None,
        };

        let id = self.store.insert(item)?;
        debug!(id, "notification enqueued");
        Ok(id)
    }

    /// Process one batch of deliverable items and return per-item outcomes.
    ///
    /// Claims up to [`BATCH_SIZE`] items that are `Pending` with fewer than
    /// [`MAX_ATTEMPTS`] attempts, oldest first.  A delivery failure is
    /// absorbed into that item's retry bookkeeping and never aborts the
    /// rest of the batch; only store failures propagate.
    pub fn process_queue(&self) -> VerdigrisResult<Vec<DeliveryOutcome>> {
        let batch = self.store.claim_batch(BATCH_SIZE, MAX_ATTEMPTS)?;
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        debug!(batch_size = batch.len(), "processing notification batch");

        let mut outcomes = Vec::with_capacity(batch.len());
        for item in batch {
            outcomes.push(self.deliver(item)?);
        }
        Ok(outcomes)
    }

    /// Attempt delivery of one claimed item and settle its queue state.
    fn deliver(&self, item: NotificationQueueItem) -> VerdigrisResult<DeliveryOutcome> {
        let Some(transport) = &self.transport else {
            // No transport configured: success-with-log, not failure.
            info!(
                id = item.id,
                recipient = %item.recipient,
                notification_type = %item.notification_type,
                "no transport configured, marking notification sent"
            );
            self.store.mark_sent(item.id, Utc::now())?;
            return Ok(DeliveryOutcome {
                id: item.id,
                status: DeliveryStatus::Sent,
                error: None,
            });
        };

        match transport.send(&item.recipient, &item.subject, &item.body) {
            Ok(()) => {
                self.store.mark_sent(item.id, Utc::now())?;
                info!(
                    id = item.id,
                    recipient = %item.recipient,
                    "notification delivered"
                );
                Ok(DeliveryOutcome {
                    id: item.id,
                    status: DeliveryStatus::Sent,
                    error: None,
                })
            }
            Err(e) => {
                let attempts = self.store.record_failure(item.id, MAX_ATTEMPTS)?;
                warn!(
                    id = item.id,
                    recipient = %item.recipient,
                    attempts,
                    error = %e,
                    "notification delivery failed"
                );
                Ok(DeliveryOutcome {
                    id: item.id,
                    status: DeliveryStatus::Failed,
                    error: Some(e.to_string()),
                })
            }
        }
    }
}

impl Notifier for NotificationQueue {
    fn enqueue(&self, request: EnqueueRequest) -> VerdigrisResult<i64> {
        NotificationQueue::enqueue(self, request)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
