//! # verdigris-contracts
//!
//! Shared types, canonical serialization, and error contracts for the
//! VERDIGRIS core.
//!
//! All crates in the workspace import from here.  No business logic lives
//! in this crate — only data definitions, the canonical JSON encoder used
//! for hashing, and the error types.

pub mod canonical;
pub mod entry;
pub mod error;
pub mod notification;
pub mod query;
pub mod workflow;

#[cfg(test)]
mod tests {
    use super::*;
    use entry::AuditEntry;
    use error::VerdigrisError;
    use notification::NotificationStatus;
    use query::AuditQuery;
    use workflow::{ApprovalLevel, StepStatus, WorkflowStatus};

    // ── ApprovalLevel ────────────────────────────────────────────────────────

    #[test]
    fn level_order_is_fixed() {
        assert_eq!(
            ApprovalLevel::ALL,
            [
                ApprovalLevel::Site,
                ApprovalLevel::BusinessUnit,
                ApprovalLevel::GroupEsg,
                ApprovalLevel::Executive,
            ]
        );
        assert_eq!(ApprovalLevel::first(), ApprovalLevel::Site);
    }

    #[test]
    fn level_next_walks_the_chain_without_skipping() {
        let mut level = ApprovalLevel::first();
        let mut visited = vec![level];
        while let Some(next) = level.next() {
            visited.push(next);
            level = next;
        }
        assert_eq!(visited, ApprovalLevel::ALL.to_vec());
        assert_eq!(ApprovalLevel::Executive.next(), None);
    }

    #[test]
    fn level_wire_labels() {
        assert_eq!(ApprovalLevel::Site.as_str(), "site");
        assert_eq!(ApprovalLevel::BusinessUnit.as_str(), "business_unit");
        assert_eq!(ApprovalLevel::GroupEsg.as_str(), "group_esg");
        assert_eq!(ApprovalLevel::Executive.as_str(), "executive");
    }

    #[test]
    fn level_serde_round_trips_as_snake_case() {
        for level in ApprovalLevel::ALL {
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, format!("\"{}\"", level.as_str()));
            let decoded: ApprovalLevel = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, level);
        }
    }

    // ── Statuses ─────────────────────────────────────────────────────────────

    #[test]
    fn workflow_status_terminality() {
        assert!(!WorkflowStatus::Pending.is_terminal());
        assert!(WorkflowStatus::Approved.is_terminal());
        assert!(WorkflowStatus::Rejected.is_terminal());
    }

    #[test]
    fn status_labels_match_storage_form() {
        assert_eq!(WorkflowStatus::Pending.as_str(), "pending");
        assert_eq!(StepStatus::Rejected.as_str(), "rejected");
        assert_eq!(NotificationStatus::Sent.as_str(), "sent");
    }

    // ── AuditEntry ───────────────────────────────────────────────────────────

    #[test]
    fn genesis_sentinel_is_zero() {
        // "0" can never be a real SHA-256 hex digest, so genesis detection
        // is unambiguous.
        assert_eq!(AuditEntry::GENESIS_HASH, "0");
    }

    // ── AuditQuery ───────────────────────────────────────────────────────────

    #[test]
    fn query_limit_defaults_to_1000() {
        let query = AuditQuery::default();
        assert_eq!(query.effective_limit(), 1000);

        let capped = AuditQuery {
            limit: Some(25),
            ..AuditQuery::default()
        };
        assert_eq!(capped.effective_limit(), 25);
    }

    // ── VerdigrisError display messages ──────────────────────────────────────

    #[test]
    fn error_storage_display() {
        let err = VerdigrisError::Storage {
            reason: "connection refused".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("storage error"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn error_not_found_display() {
        let err = VerdigrisError::NotFound {
            entity: "workflow".to_string(),
            id: "WF-123".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("workflow"));
        assert!(msg.contains("WF-123"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn error_workflow_terminal_display() {
        let err = VerdigrisError::WorkflowTerminal {
            workflow_id: "WF-42".to_string(),
            status: "rejected".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("WF-42"));
        assert!(msg.contains("already terminal"));
        assert!(msg.contains("rejected"));
    }

    #[test]
    fn error_transport_display() {
        let err = VerdigrisError::Transport {
            reason: "smtp timeout".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("transport error"));
        assert!(msg.contains("smtp timeout"));
    }

    #[test]
    fn error_config_display() {
        let err = VerdigrisError::Config {
            reason: "missing approver for level 'site'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("configuration error"));
        assert!(msg.contains("site"));
    }
}
