//! # verdigris-core
//!
//! Boundary traits for the VERDIGRIS core.
//!
//! This crate provides:
//! - The service seams (`AuditSink`, `Notifier`, `TransportSender`) that the
//!   workflow engine and notification queue consume
//! - The persistence seams (`LedgerStore`, `WorkflowStore`,
//!   `NotificationStore`) that each service is constructed over
//!
//! Services are explicit, dependency-injected components: the host builds
//! each one once at startup over concrete store implementations and passes
//! them around by `Arc<dyn …>`.  Nothing in the workspace reaches for
//! hidden global state.

pub mod store;
pub mod traits;

pub use store::{ChainTail, LedgerStore, NotificationStore, WorkflowStore};
pub use traits::{AuditSink, Notifier, TransportSender};
