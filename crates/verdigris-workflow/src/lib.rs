//! # verdigris-workflow
//!
//! Fixed-level approval workflow engine for the VERDIGRIS core.
//!
//! Every submission traverses the same ordered chain of approval levels —
//! site, business unit, group ESG, executive — one decision at a time.
//! Each transition appends a hash-chained audit entry and enqueues the
//! relevant notification; rejection at any level terminates the workflow
//! immediately.

pub mod config;
pub mod engine;
pub mod memory;

pub use config::{ApproverConfig, ApproverDirectory, ApproverEntry};
pub use engine::{WorkflowEngine, NOTIFY_APPROVAL_REQUEST, NOTIFY_APPROVAL_STATUS};
pub use memory::InMemoryWorkflowStore;

// ── Tests ─────────────────────────────────────────────────────────────────────
