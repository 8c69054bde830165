//! In-memory implementation of `WorkflowStore`.
//!
//! Workflows and steps live in plain `Vec`s behind one `Mutex`, so
//! `insert_workflow` is trivially atomic: the workflow and its steps land
//! under a single lock acquisition or not at all.

use std::sync::{Mutex, MutexGuard};

use verdigris_contracts::{
    error::{VerdigrisError, VerdigrisResult},
    workflow::{ApprovalLevel, ApprovalStep, Workflow, WorkflowStatus},
};
use verdigris_core::WorkflowStore;

/// The mutable interior of an [`InMemoryWorkflowStore`].
struct WorkflowState {
    /// All workflows in creation order.
    workflows: Vec<Workflow>,

    /// All steps across all workflows; per workflow, in fixed level order.
    steps: Vec<ApprovalStep>,
}

/// An in-memory workflow store for tests and single-process hosts.
pub struct InMemoryWorkflowStore {
    state: Mutex<WorkflowState>,
}

impl InMemoryWorkflowStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(WorkflowState {
                workflows: Vec::new(),
                steps: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> VerdigrisResult<MutexGuard<'_, WorkflowState>> {
        self.state.lock().map_err(|e| VerdigrisError::Storage {
            reason: format!("workflow state lock poisoned: {}", e),
        })
    }
}

impl Default for InMemoryWorkflowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowStore for InMemoryWorkflowStore {
    fn insert_workflow(
        &self,
        workflow: &Workflow,
        steps: &[ApprovalStep],
    ) -> VerdigrisResult<()> {
        let mut state = self.lock()?;

        if state
            .workflows
            .iter()
            .any(|w| w.workflow_id == workflow.workflow_id)
        {
            return Err(VerdigrisError::Storage {
                reason: format!("workflow '{}' already exists", workflow.workflow_id),
            });
        }

        state.workflows.push(workflow.clone());
        state.steps.extend_from_slice(steps);
        Ok(())
    }

    fn workflow(&self, workflow_id: &str) -> VerdigrisResult<Option<Workflow>> {
        let state = self.lock()?;
        Ok(state
            .workflows
            .iter()
            .find(|w| w.workflow_id == workflow_id)
            .cloned())
    }

    fn steps(&self, workflow_id: &str) -> VerdigrisResult<Vec<ApprovalStep>> {
        let state = self.lock()?;
        Ok(state
            .steps
            .iter()
            .filter(|s| s.workflow_id == workflow_id)
            .cloned()
            .collect())
    }

    fn update_workflow(&self, workflow: &Workflow) -> VerdigrisResult<()> {
        let mut state = self.lock()?;
        let row = state
            .workflows
            .iter_mut()
            .find(|w| w.workflow_id == workflow.workflow_id)
            .ok_or_else(|| VerdigrisError::NotFound {
                entity: "workflow".to_string(),
                id: workflow.workflow_id.clone(),
            })?;
        *row = workflow.clone();
        Ok(())
    }

    fn update_step(&self, step: &ApprovalStep) -> VerdigrisResult<()> {
        let mut state = self.lock()?;
        let row = state
            .steps
            .iter_mut()
            .find(|s| s.workflow_id == step.workflow_id && s.level == step.level)
            .ok_or_else(|| VerdigrisError::NotFound {
                entity: "approval step".to_string(),
                id: format!("{}/{}", step.workflow_id, step.level),
            })?;
        *row = step.clone();
        Ok(())
    }

    fn pending(&self, level: Option<ApprovalLevel>) -> VerdigrisResult<Vec<Workflow>> {
        let state = self.lock()?;

        let mut matched: Vec<(usize, Workflow)> = state
            .workflows
            .iter()
            .enumerate()
            .filter(|(_, w)| {
                w.status == WorkflowStatus::Pending
                    && level.map_or(true, |l| w.current_level == Some(l))
            })
            .map(|(i, w)| (i, w.clone()))
            .collect();

        // Newest submissions first; creation order breaks timestamp ties.
        matched.sort_by(|(ai, a), (bi, b)| {
            b.submitted_at.cmp(&a.submitted_at).then(bi.cmp(ai))
        });

        Ok(matched.into_iter().map(|(_, w)| w).collect())
    }
}
