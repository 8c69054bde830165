//! The approval workflow engine: the fixed-level transition driver.
//!
//! The engine enforces the approval model:
//!
//!   create → site → business_unit → group_esg → executive → approved
//!                 ╲ (reject at any level) → rejected
//!
//! One decision at a time, no skipping, no level re-entry, and rejection at
//! any level terminates the whole workflow immediately.  Every transition
//! appends exactly one audit entry and enqueues at most one notification.
//!
//! The audit entry is load-bearing: a transition that cannot be audited
//! fails.  The notification is not: during approve/reject an enqueue
//! failure is logged and absorbed, because the recorded decision — not the
//! message about it — is the durable fact.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use verdigris_contracts::{
    entry::AppendRequest,
    error::{VerdigrisError, VerdigrisResult},
    notification::EnqueueRequest,
    workflow::{
        ApprovalLevel, ApprovalStep, CreateWorkflow, StepStatus, Workflow, WorkflowDetail,
        WorkflowReceipt, WorkflowStatus,
    },
};
use verdigris_core::{AuditSink, Notifier, WorkflowStore};

use crate::config::ApproverDirectory;

/// Logical table name recorded on every workflow audit entry.
const WORKFLOW_TABLE: &str = "approval_workflows";

/// Notification type for "a level awaits your decision".
pub const NOTIFY_APPROVAL_REQUEST: &str = "approval_request";

/// Notification type for "your submission reached a terminal status".
pub const NOTIFY_APPROVAL_STATUS: &str = "approval_status";

/// The multi-level approval workflow engine.
///
/// Construct one engine per process over the injected store, audit sink,
/// notifier, and approver directory; share it via `Arc`.
///
/// # Concurrency
///
/// Transitions on the same workflow are serialized through a per-id lock,
/// so the same level can never be decided twice by racing callers.
/// Transitions on different workflows proceed in parallel.
pub struct WorkflowEngine {
    store: Arc<dyn WorkflowStore>,
    audit: Arc<dyn AuditSink>,
    notifier: Arc<dyn Notifier>,
    approvers: ApproverDirectory,
    transition_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl WorkflowEngine {
    /// Build the engine over its collaborators.
    pub fn new(
        store: Arc<dyn WorkflowStore>,
        audit: Arc<dyn AuditSink>,
        notifier: Arc<dyn Notifier>,
        approvers: ApproverDirectory,
    ) -> Self {
        Self {
            store,
            audit,
            notifier,
            approvers,
            transition_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create a workflow for one submission.
    ///
    /// # Pipeline
    ///
    /// 1. Generate the workflow id (UTC timestamp + random suffix)
    /// 2. Persist the workflow and all four `Pending` steps as one atomic
    ///    store operation — a workflow is never observable without its
    ///    full step set
    /// 3. Enqueue the approval request for the first level (a level with
    ///    no configured approver is skipped with a log line, not an error)
    /// 4. Append the `workflow_created` audit entry
    ///
    /// Unlike approve/reject, an enqueue failure here propagates: the
    /// caller is creating the workflow and must know its kickoff did not
    /// fully happen.
    pub fn create(&self, request: CreateWorkflow) -> VerdigrisResult<WorkflowReceipt> {
        let workflow_id = new_workflow_id();
        let now = Utc::now();

        let workflow = Workflow {
            workflow_id: workflow_id.clone(),
            data_id: request.data_id.clone(),
            data_type: request.data_type.clone(),
            submitted_by: request.submitted_by.clone(),
            submitter_contact: request.submitter_contact,
            current_level: Some(ApprovalLevel::first()),
            status: WorkflowStatus::Pending,
            submitted_at: now,
            completed_at: None,
        };

        let steps: Vec<ApprovalStep> = ApprovalLevel::ALL
            .iter()
            .map(|&level| ApprovalStep {
                workflow_id: workflow_id.clone(),
                level,
                status: StepStatus::Pending,
                approver: None,
                approver_contact: None,
                approved_at: None,
                comments: None,
            })
            .collect();

        self.store.insert_workflow(&workflow, &steps)?;

        self.request_approval(&workflow, ApprovalLevel::first())?;

        self.audit.append(AppendRequest {
            action: "workflow_created".to_string(),
            table_name: WORKFLOW_TABLE.to_string(),
            record_id: workflow_id.clone(),
            user_id: request.submitted_by,
            user_role: "submitter".to_string(),
            old_values: None,
            new_values: Some(json!({
                "data_id": request.data_id,
                "data_type": request.data_type,
                "current_level": ApprovalLevel::first().as_str(),
                "status": WorkflowStatus::Pending.as_str(),
            })),
            metadata: None,
        })?;

        info!(
            workflow_id = %workflow_id,
            data_id = %workflow.data_id,
            "approval workflow created"
        );

        Ok(WorkflowReceipt {
            workflow_id,
            status: WorkflowStatus::Pending,
        })
    }

    /// Record an approval for the workflow's current level.
    ///
    /// # Pipeline
    ///
    /// 1. Serialize against other transitions on the same workflow
    /// 2. Load the workflow; missing ⇒ `NotFound`, terminal ⇒
    ///    `WorkflowTerminal` (terminal records are never re-mutated)
    /// 3. Mark the current level's step approved (actor, contact,
    ///    timestamp, comments)
    /// 4. Non-final level: advance `current_level`, enqueue the next
    ///    level's approval request.  Final level: set `Approved`,
    ///    stamp `completed_at`, enqueue the submitter's status message
    /// 5. Append the `workflow_approved` audit entry
    ///
    /// Enqueue failures in step 4 are absorbed with a warning — the
    /// decision is already durable.  Audit failures in step 5 propagate.
    pub fn approve(
        &self,
        workflow_id: &str,
        approver_id: &str,
        approver_contact: &str,
        comments: Option<String>,
    ) -> VerdigrisResult<WorkflowReceipt> {
        let lock = self.transition_lock(workflow_id)?;
        let _guard = lock.lock().map_err(|e| VerdigrisError::Storage {
            reason: format!("transition lock poisoned: {}", e),
        })?;

        let mut workflow = self.load_open_workflow(workflow_id)?;
        let level = current_level_of(&workflow)?;
        let now = Utc::now();

        self.store.update_step(&ApprovalStep {
            workflow_id: workflow_id.to_string(),
            level,
            status: StepStatus::Approved,
            approver: Some(approver_id.to_string()),
            approver_contact: Some(approver_contact.to_string()),
            approved_at: Some(now),
            comments: comments.clone(),
        })?;

        match level.next() {
            Some(next) => {
                workflow.current_level = Some(next);
                self.store.update_workflow(&workflow)?;

                if let Err(e) = self.request_approval(&workflow, next) {
                    warn!(
                        workflow_id = %workflow_id,
                        level = %next,
                        error = %e,
                        "failed to enqueue approval request; decision stands"
                    );
                }

                debug!(
                    workflow_id = %workflow_id,
                    from = %level,
                    to = %next,
                    "workflow advanced to next level"
                );
            }
            None => {
                workflow.status = WorkflowStatus::Approved;
                workflow.current_level = None;
                workflow.completed_at = Some(now);
                self.store.update_workflow(&workflow)?;

                if let Err(e) = self.notify_submitter(&workflow) {
                    warn!(
                        workflow_id = %workflow_id,
                        error = %e,
                        "failed to enqueue status notification; decision stands"
                    );
                }

                info!(
                    workflow_id = %workflow_id,
                    "workflow fully approved"
                );
            }
        }

        self.audit.append(AppendRequest {
            action: "workflow_approved".to_string(),
            table_name: WORKFLOW_TABLE.to_string(),
            record_id: workflow_id.to_string(),
            user_id: approver_id.to_string(),
            user_role: "approver".to_string(),
            old_values: Some(json!({ "level": level.as_str() })),
            new_values: Some(json!({
                "status": StepStatus::Approved.as_str(),
                "comments": comments,
            })),
            metadata: None,
        })?;

        Ok(WorkflowReceipt {
            workflow_id: workflow_id.to_string(),
            status: workflow.status,
        })
    }

    /// Record a rejection for the workflow's current level.
    ///
    /// Rejection at ANY level terminates the whole workflow immediately:
    /// the current step is marked rejected, the workflow goes `Rejected`
    /// with `completed_at` stamped, and every later step stays `Pending`
    /// forever.  There is no appeal or return path.
    pub fn reject(
        &self,
        workflow_id: &str,
        approver_id: &str,
        approver_contact: &str,
        comments: Option<String>,
    ) -> VerdigrisResult<WorkflowReceipt> {
        let lock = self.transition_lock(workflow_id)?;
        let _guard = lock.lock().map_err(|e| VerdigrisError::Storage {
            reason: format!("transition lock poisoned: {}", e),
        })?;

        let mut workflow = self.load_open_workflow(workflow_id)?;
        let level = current_level_of(&workflow)?;
        let now = Utc::now();

        self.store.update_step(&ApprovalStep {
            workflow_id: workflow_id.to_string(),
            level,
            status: StepStatus::Rejected,
            approver: Some(approver_id.to_string()),
            approver_contact: Some(approver_contact.to_string()),
            approved_at: Some(now),
            comments: comments.clone(),
        })?;

        workflow.status = WorkflowStatus::Rejected;
        workflow.current_level = None;
        workflow.completed_at = Some(now);
        self.store.update_workflow(&workflow)?;

        if let Err(e) = self.notify_submitter(&workflow) {
            warn!(
                workflow_id = %workflow_id,
                error = %e,
                "failed to enqueue status notification; decision stands"
            );
        }

        self.audit.append(AppendRequest {
            action: "workflow_rejected".to_string(),
            table_name: WORKFLOW_TABLE.to_string(),
            record_id: workflow_id.to_string(),
            user_id: approver_id.to_string(),
            user_role: "approver".to_string(),
            old_values: Some(json!({ "level": level.as_str() })),
            new_values: Some(json!({
                "status": StepStatus::Rejected.as_str(),
                "comments": comments,
            })),
            metadata: None,
        })?;

        info!(
            workflow_id = %workflow_id,
            level = %level,
            "workflow rejected"
        );

        Ok(WorkflowReceipt {
            workflow_id: workflow_id.to_string(),
            status: WorkflowStatus::Rejected,
        })
    }

    /// One workflow with its steps in fixed level order.
    pub fn get_with_steps(&self, workflow_id: &str) -> VerdigrisResult<WorkflowDetail> {
        let workflow = self
            .store
            .workflow(workflow_id)?
            .ok_or_else(|| not_found(workflow_id))?;
        let steps = self.store.steps(workflow_id)?;
        Ok(WorkflowDetail { workflow, steps })
    }

    /// All pending workflows, optionally narrowed to one level, newest first.
    pub fn pending(&self, level: Option<ApprovalLevel>) -> VerdigrisResult<Vec<Workflow>> {
        self.store.pending(level)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    /// Load a workflow that is still open for decisions.
    fn load_open_workflow(&self, workflow_id: &str) -> VerdigrisResult<Workflow> {
        let workflow = self
            .store
            .workflow(workflow_id)?
            .ok_or_else(|| not_found(workflow_id))?;

        if workflow.status.is_terminal() {
            return Err(VerdigrisError::WorkflowTerminal {
                workflow_id: workflow_id.to_string(),
                status: workflow.status.as_str().to_string(),
            });
        }

        Ok(workflow)
    }

    /// Enqueue the approval request for `level`, or skip silently when no
    /// approver is configured for it.
    fn request_approval(
        &self,
        workflow: &Workflow,
        level: ApprovalLevel,
    ) -> VerdigrisResult<()> {
        let Some(contact) = self.approvers.contact(level) else {
            debug!(
                workflow_id = %workflow.workflow_id,
                level = %level,
                "no approver configured for level, skipping approval request"
            );
            return Ok(());
        };

        self.notifier.enqueue(EnqueueRequest {
            recipient: contact.to_string(),
            subject: format!(
                "Approval required: {} ({})",
                workflow.data_id, workflow.data_type
            ),
            body: format!(
                "Submission '{}' from {} awaits your decision at the '{}' level.",
                workflow.data_id, workflow.submitted_by, level
            ),
            notification_type: NOTIFY_APPROVAL_REQUEST.to_string(),
            related_id: Some(workflow.workflow_id.clone()),
        })?;

        Ok(())
    }

    /// Enqueue the terminal status message to the original submitter.
    fn notify_submitter(&self, workflow: &Workflow) -> VerdigrisResult<()> {
        self.notifier.enqueue(EnqueueRequest {
            recipient: workflow.submitter_contact.clone(),
            subject: format!(
                "Submission {}: {}",
                workflow.data_id, workflow.status
            ),
            body: format!(
                "Your submission '{}' has been {}.",
                workflow.data_id, workflow.status
            ),
            notification_type: NOTIFY_APPROVAL_STATUS.to_string(),
            related_id: Some(workflow.workflow_id.clone()),
        })?;

        Ok(())
    }

    /// The per-workflow transition lock, created on first use.
    fn transition_lock(&self, workflow_id: &str) -> VerdigrisResult<Arc<Mutex<()>>> {
        let mut locks = self
            .transition_locks
            .lock()
            .map_err(|e| VerdigrisError::Storage {
                reason: format!("transition lock table poisoned: {}", e),
            })?;

        Ok(locks
            .entry(workflow_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }
}

/// Generate a human-meaningful workflow id: UTC second stamp + random suffix.
fn new_workflow_id() -> String {
    let stamp = Utc::now().format("%Y%m%d%H%M%S");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("WF-{}-{}", stamp, &suffix[..8])
}

fn not_found(workflow_id: &str) -> VerdigrisError {
    VerdigrisError::NotFound {
        entity: "workflow".to_string(),
        id: workflow_id.to_string(),
    }
}

/// A pending workflow must carry a current level; a missing one means the
/// store returned an inconsistent row.
fn current_level_of(workflow: &Workflow) -> VerdigrisResult<ApprovalLevel> {
    workflow
        .current_level
        .ok_or_else(|| VerdigrisError::Storage {
            reason: format!(
                "pending workflow '{}' has no current level",
                workflow.workflow_id
            ),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use verdigris_contracts::{
        entry::{AppendReceipt, AppendRequest},
        error::{VerdigrisError, VerdigrisResult},
        notification::EnqueueRequest,
        workflow::{ApprovalLevel, CreateWorkflow, StepStatus, WorkflowStatus},
    };
    use verdigris_core::{AuditSink, Notifier};

    use crate::config::ApproverDirectory;
    use crate::memory::InMemoryWorkflowStore;

    use super::WorkflowEngine;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    /// An audit sink that records every append for later inspection.
    struct MockAudit {
        appended: Arc<Mutex<Vec<AppendRequest>>>,
    }

    impl MockAudit {
        fn new() -> Self {
            Self {
                appended: Arc::new(Mutex::new(vec![])),
            }
        }
    }

    impl AuditSink for MockAudit {
        fn append(&self, request: AppendRequest) -> VerdigrisResult<AppendReceipt> {
            let mut appended = self.appended.lock().unwrap();
            appended.push(request);
            Ok(AppendReceipt {
                id: appended.len() as i64,
                hash: format!("hash-{}", appended.len()),
            })
        }
    }

    /// A notifier that records every enqueue and can be told to fail.
    struct MockNotifier {
        enqueued: Arc<Mutex<Vec<EnqueueRequest>>>,
        fail: bool,
    }

    impl MockNotifier {
        fn new() -> Self {
            Self {
                enqueued: Arc::new(Mutex::new(vec![])),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                enqueued: Arc::new(Mutex::new(vec![])),
                fail: true,
            }
        }
    }

    impl Notifier for MockNotifier {
        fn enqueue(&self, request: EnqueueRequest) -> VerdigrisResult<i64> {
            if self.fail {
                return Err(VerdigrisError::Storage {
                    reason: "queue table unavailable".to_string(),
                });
            }
            let mut enqueued = self.enqueued.lock().unwrap();
            enqueued.push(request);
            Ok(enqueued.len() as i64)
        }
    }

    fn full_directory() -> ApproverDirectory {
        ApproverDirectory::from_toml_str(
            r#"
            [[approvers]]
            level = "site"
            contact = "site-lead@example.com"

            [[approvers]]
            level = "business_unit"
            contact = "bu-head@example.com"

            [[approvers]]
            level = "group_esg"
            contact = "esg-office@example.com"

            [[approvers]]
            level = "executive"
            contact = "cso@example.com"
            "#,
        )
        .unwrap()
    }

    struct Harness {
        engine: WorkflowEngine,
        appended: Arc<Mutex<Vec<AppendRequest>>>,
        enqueued: Arc<Mutex<Vec<EnqueueRequest>>>,
    }

    fn make_engine(directory: ApproverDirectory) -> Harness {
        let audit = MockAudit::new();
        let notifier = MockNotifier::new();
        let appended = audit.appended.clone();
        let enqueued = notifier.enqueued.clone();

        let engine = WorkflowEngine::new(
            Arc::new(InMemoryWorkflowStore::new()),
            Arc::new(audit),
            Arc::new(notifier),
            directory,
        );

        Harness {
            engine,
            appended,
            enqueued,
        }
    }

    fn make_submission() -> CreateWorkflow {
        CreateWorkflow {
            data_id: "DATA_1".to_string(),
            data_type: "emissions_report".to_string(),
            submitted_by: "alice".to_string(),
            submitter_contact: "alice@x.com".to_string(),
        }
    }

    // ── Creation ─────────────────────────────────────────────────────────────

    /// A fresh workflow starts at the site level with all four steps pending.
    #[test]
    fn create_initializes_level_and_steps() {
        let h = make_engine(full_directory());
        let receipt = h.engine.create(make_submission()).unwrap();
        assert_eq!(receipt.status, WorkflowStatus::Pending);

        let detail = h.engine.get_with_steps(&receipt.workflow_id).unwrap();
        assert_eq!(detail.workflow.current_level, Some(ApprovalLevel::Site));
        assert_eq!(detail.workflow.status, WorkflowStatus::Pending);
        assert!(detail.workflow.completed_at.is_none());

        assert_eq!(detail.steps.len(), 4);
        for (step, level) in detail.steps.iter().zip(ApprovalLevel::ALL) {
            assert_eq!(step.level, level);
            assert_eq!(step.status, StepStatus::Pending);
            assert!(step.approver.is_none());
        }

        // The kickoff produced one audit entry and one approval request.
        let appended = h.appended.lock().unwrap();
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].action, "workflow_created");
        assert_eq!(appended[0].record_id, receipt.workflow_id);

        let enqueued = h.enqueued.lock().unwrap();
        assert_eq!(enqueued.len(), 1);
        assert_eq!(enqueued[0].recipient, "site-lead@example.com");
        assert_eq!(enqueued[0].notification_type, "approval_request");
    }

    /// Workflow ids are unique and human-meaningful.
    #[test]
    fn workflow_ids_are_unique() {
        let h = make_engine(ApproverDirectory::empty());
        let a = h.engine.create(make_submission()).unwrap();
        let b = h.engine.create(make_submission()).unwrap();

        assert_ne!(a.workflow_id, b.workflow_id);
        assert!(a.workflow_id.starts_with("WF-"));
    }

    /// A level with no configured approver skips the request silently.
    #[test]
    fn create_without_approver_skips_notification() {
        let h = make_engine(ApproverDirectory::empty());
        h.engine.create(make_submission()).unwrap();

        assert!(h.enqueued.lock().unwrap().is_empty());
        // The audit entry is still written.
        assert_eq!(h.appended.lock().unwrap().len(), 1);
    }

    // ── Approval path ────────────────────────────────────────────────────────

    /// Four approvals traverse every level in order, never skipping, and
    /// produce exactly four workflow_approved audit entries.
    #[test]
    fn approvals_walk_all_levels_in_order() {
        let h = make_engine(full_directory());
        let id = h.engine.create(make_submission()).unwrap().workflow_id;

        let expected_after = [
            Some(ApprovalLevel::BusinessUnit),
            Some(ApprovalLevel::GroupEsg),
            Some(ApprovalLevel::Executive),
            None,
        ];

        for (i, expected) in expected_after.iter().enumerate() {
            let receipt = h
                .engine
                .approve(&id, &format!("approver{}", i), "approver@example.com", None)
                .unwrap();

            let workflow = h.engine.get_with_steps(&id).unwrap().workflow;
            assert_eq!(workflow.current_level, *expected);

            if expected.is_none() {
                assert_eq!(receipt.status, WorkflowStatus::Approved);
                assert!(workflow.completed_at.is_some());
            } else {
                assert_eq!(receipt.status, WorkflowStatus::Pending);
            }
        }

        let appended = h.appended.lock().unwrap();
        let approvals: Vec<_> = appended
            .iter()
            .filter(|r| r.action == "workflow_approved")
            .collect();
        assert_eq!(approvals.len(), 4);

        // Every step carries its decision.
        let steps = h.engine.get_with_steps(&id).unwrap().steps;
        assert!(steps.iter().all(|s| s.status == StepStatus::Approved));
        assert!(steps.iter().all(|s| s.approved_at.is_some()));
    }

    /// The audit entry for an approval records the level that decided.
    #[test]
    fn approval_audit_records_previous_level() {
        let h = make_engine(full_directory());
        let id = h.engine.create(make_submission()).unwrap().workflow_id;

        h.engine
            .approve(&id, "bob", "bob@x.com", Some("looks good".to_string()))
            .unwrap();

        let appended = h.appended.lock().unwrap();
        let entry = appended
            .iter()
            .find(|r| r.action == "workflow_approved")
            .unwrap();

        assert_eq!(entry.user_id, "bob");
        assert_eq!(entry.old_values, Some(json!({ "level": "site" })));
        assert_eq!(
            entry.new_values,
            Some(json!({ "status": "approved", "comments": "looks good" }))
        );
    }

    /// Each advancement notifies the next level; the final approval
    /// notifies the submitter instead.
    #[test]
    fn notifications_follow_the_chain() {
        let h = make_engine(full_directory());
        let id = h.engine.create(make_submission()).unwrap().workflow_id;

        for i in 0..4 {
            h.engine
                .approve(&id, &format!("approver{}", i), "a@example.com", None)
                .unwrap();
        }

        let recipients: Vec<String> = h
            .enqueued
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.recipient.clone())
            .collect();

        assert_eq!(
            recipients,
            vec![
                "site-lead@example.com",
                "bu-head@example.com",
                "esg-office@example.com",
                "cso@example.com",
                "alice@x.com",
            ]
        );

        let last = h.enqueued.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.notification_type, "approval_status");
    }

    // ── Rejection path ───────────────────────────────────────────────────────

    /// Rejection at the second level terminates immediately and leaves the
    /// later steps untouched.
    #[test]
    fn rejection_short_circuits() {
        let h = make_engine(full_directory());
        let id = h.engine.create(make_submission()).unwrap().workflow_id;

        h.engine.approve(&id, "bob", "bob@x.com", None).unwrap();
        let receipt = h
            .engine
            .reject(&id, "carol", "carol@x.com", Some("insufficient detail".to_string()))
            .unwrap();
        assert_eq!(receipt.status, WorkflowStatus::Rejected);

        let detail = h.engine.get_with_steps(&id).unwrap();
        assert_eq!(detail.workflow.status, WorkflowStatus::Rejected);
        assert_eq!(detail.workflow.current_level, None);
        assert!(detail.workflow.completed_at.is_some());

        let statuses: Vec<StepStatus> = detail.steps.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![
                StepStatus::Approved,
                StepStatus::Rejected,
                StepStatus::Pending,
                StepStatus::Pending,
            ]
        );

        let appended = h.appended.lock().unwrap();
        let entry = appended
            .iter()
            .find(|r| r.action == "workflow_rejected")
            .unwrap();
        assert_eq!(entry.old_values, Some(json!({ "level": "business_unit" })));
    }

    // ── Failure semantics ────────────────────────────────────────────────────

    #[test]
    fn missing_workflow_is_not_found() {
        let h = make_engine(full_directory());
        let result = h.engine.approve("WF-nope", "bob", "bob@x.com", None);
        assert!(matches!(result, Err(VerdigrisError::NotFound { .. })));

        let result = h.engine.reject("WF-nope", "bob", "bob@x.com", None);
        assert!(matches!(result, Err(VerdigrisError::NotFound { .. })));

        let result = h.engine.get_with_steps("WF-nope");
        assert!(matches!(result, Err(VerdigrisError::NotFound { .. })));
    }

    /// A terminal workflow refuses further decisions instead of silently
    /// re-mutating.
    #[test]
    fn terminal_workflow_fails_fast() {
        let h = make_engine(full_directory());
        let id = h.engine.create(make_submission()).unwrap().workflow_id;
        h.engine.reject(&id, "bob", "bob@x.com", None).unwrap();

        let again = h.engine.approve(&id, "carol", "carol@x.com", None);
        match again {
            Err(VerdigrisError::WorkflowTerminal { status, .. }) => {
                assert_eq!(status, "rejected");
            }
            other => panic!("expected WorkflowTerminal, got {:?}", other),
        }

        let again = h.engine.reject(&id, "carol", "carol@x.com", None);
        assert!(matches!(again, Err(VerdigrisError::WorkflowTerminal { .. })));
    }

    /// A failing notification queue never blocks an approval: the decision
    /// is durable, the message is best-effort.
    #[test]
    fn notification_failure_does_not_block_decisions() {
        let audit = MockAudit::new();
        let appended = audit.appended.clone();
        let engine = WorkflowEngine::new(
            Arc::new(InMemoryWorkflowStore::new()),
            Arc::new(audit),
            Arc::new(MockNotifier::failing()),
            ApproverDirectory::empty(),
        );

        // Creation with an empty directory performs no enqueue at all.
        let id = engine.create(make_submission()).unwrap().workflow_id;

        // All four approvals succeed even though the final one fails to
        // enqueue the submitter's status message (empty directory skips the
        // intermediate requests; the terminal notify hits the failing queue).
        for i in 0..4 {
            engine
                .approve(&id, &format!("approver{}", i), "a@example.com", None)
                .unwrap();
        }

        let workflow = engine.get_with_steps(&id).unwrap().workflow;
        assert_eq!(workflow.status, WorkflowStatus::Approved);
        assert_eq!(
            appended
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.action == "workflow_approved")
                .count(),
            4
        );
    }

    // ── Pending queries ──────────────────────────────────────────────────────

    #[test]
    fn pending_filters_by_level() {
        let h = make_engine(full_directory());

        let first = h.engine.create(make_submission()).unwrap().workflow_id;
        let second = h.engine.create(make_submission()).unwrap().workflow_id;
        h.engine.approve(&second, "bob", "bob@x.com", None).unwrap();

        let all = h.engine.pending(None).unwrap();
        assert_eq!(all.len(), 2);

        let at_site = h.engine.pending(Some(ApprovalLevel::Site)).unwrap();
        assert_eq!(at_site.len(), 1);
        assert_eq!(at_site[0].workflow_id, first);

        let at_bu = h.engine.pending(Some(ApprovalLevel::BusinessUnit)).unwrap();
        assert_eq!(at_bu.len(), 1);
        assert_eq!(at_bu[0].workflow_id, second);

        // Terminal workflows drop out of the pending view.
        h.engine.reject(&first, "bob", "bob@x.com", None).unwrap();
        assert_eq!(h.engine.pending(None).unwrap().len(), 1);
    }
}
