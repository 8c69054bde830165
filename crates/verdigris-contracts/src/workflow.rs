//! Approval workflow types.
//!
//! A `Workflow` tracks one submission's progress through the fixed sequence
//! of approval levels.  `ApprovalStep` rows — one per level — are all
//! created up front when the workflow is created, then each is mutated
//! exactly once when that level's decision is recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One named stage in the fixed, ordered sequence of required sign-offs.
///
/// The order is baked into the engine: `Site → BusinessUnit → GroupEsg →
/// Executive`.  Every workflow traverses the same chain; there is no
/// per-data-type variation and no skipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalLevel {
    Site,
    BusinessUnit,
    GroupEsg,
    Executive,
}

impl ApprovalLevel {
    /// All levels in approval order.
    pub const ALL: [ApprovalLevel; 4] = [
        ApprovalLevel::Site,
        ApprovalLevel::BusinessUnit,
        ApprovalLevel::GroupEsg,
        ApprovalLevel::Executive,
    ];

    /// The level every freshly created workflow starts at.
    pub fn first() -> Self {
        ApprovalLevel::Site
    }

    /// The level after this one, or `None` for the final level.
    pub fn next(self) -> Option<Self> {
        match self {
            ApprovalLevel::Site => Some(ApprovalLevel::BusinessUnit),
            ApprovalLevel::BusinessUnit => Some(ApprovalLevel::GroupEsg),
            ApprovalLevel::GroupEsg => Some(ApprovalLevel::Executive),
            ApprovalLevel::Executive => None,
        }
    }

    /// The wire/storage label for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalLevel::Site => "site",
            ApprovalLevel::BusinessUnit => "business_unit",
            ApprovalLevel::GroupEsg => "group_esg",
            ApprovalLevel::Executive => "executive",
        }
    }
}

impl std::fmt::Display for ApprovalLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a whole workflow.
///
/// `Pending` is the only non-terminal status.  Once `Approved` or
/// `Rejected`, a workflow is never mutated again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Pending,
    Approved,
    Rejected,
}

impl WorkflowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowStatus::Pending => "pending",
            WorkflowStatus::Approved => "approved",
            WorkflowStatus::Rejected => "rejected",
        }
    }

    /// True for `Approved` and `Rejected`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, WorkflowStatus::Pending)
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision status of a single approval step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Approved,
    Rejected,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Approved => "approved",
            StepStatus::Rejected => "rejected",
        }
    }
}

/// One submission's approval lifecycle.
///
/// Owned exclusively by the workflow engine: created once, mutated only via
/// approve/reject transitions, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// Human-meaningful unique token (`WF-<timestamp>-<suffix>`).
    pub workflow_id: String,

    /// Reference to the external entity under approval.
    pub data_id: String,

    /// Kind of the external entity (e.g. "emissions_report").
    pub data_type: String,

    /// Identity of the submitter.
    pub submitted_by: String,

    /// Where the terminal status notification is delivered.
    pub submitter_contact: String,

    /// The level currently awaiting a decision; `None` once terminal.
    pub current_level: Option<ApprovalLevel>,

    pub status: WorkflowStatus,

    pub submitted_at: DateTime<Utc>,

    /// Set when the workflow reaches `Approved` or `Rejected`.
    pub completed_at: Option<DateTime<Utc>>,
}

/// One level's decision record within a workflow.
///
/// All steps are created `Pending` at workflow creation and each is
/// mutated exactly once, when its level's decision is recorded.  Steps
/// after a rejection stay `Pending` forever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalStep {
    pub workflow_id: String,
    pub level: ApprovalLevel,
    pub status: StepStatus,

    /// Identity of the decision maker; `None` until acted on.
    pub approver: Option<String>,

    /// Contact address of the decision maker, retained alongside the
    /// decision for the delivery audit trail.
    pub approver_contact: Option<String>,

    pub approved_at: Option<DateTime<Utc>>,
    pub comments: Option<String>,
}

/// A workflow together with its steps in fixed level order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDetail {
    pub workflow: Workflow,
    pub steps: Vec<ApprovalStep>,
}

/// Caller-supplied fields for workflow creation.
#[derive(Debug, Clone)]
pub struct CreateWorkflow {
    pub data_id: String,
    pub data_type: String,
    pub submitted_by: String,
    pub submitter_contact: String,
}

/// What the caller gets back from a successful `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReceipt {
    pub workflow_id: String,
    pub status: WorkflowStatus,
}
