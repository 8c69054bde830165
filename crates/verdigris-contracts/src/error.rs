//! Error types for the VERDIGRIS core.
//!
//! All fallible operations in the workspace return `VerdigrisResult<T>`.
//! Chain-integrity violations are deliberately NOT represented here:
//! detecting tampering is the intended *output* of `verify`, reported as
//! data in an `IntegrityReport`, never raised as an error.

use thiserror::Error;

/// The unified error type for the VERDIGRIS core.
#[derive(Debug, Error)]
pub enum VerdigrisError {
    /// The underlying persistence store failed or is unavailable.
    ///
    /// Must never be swallowed on the audit append path — a silently
    /// dropped append would leave an undetectable gap in the chain.
    #[error("storage error: {reason}")]
    Storage { reason: String },

    /// A referenced record does not exist.
    ///
    /// Recoverable; the hosting layer maps this to a 404-equivalent.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    /// Outbound delivery failed.
    ///
    /// Fully contained within the notification queue's retry bookkeeping;
    /// never escapes to the workflow operation that triggered the enqueue.
    #[error("transport error: {reason}")]
    Transport { reason: String },

    /// An approve/reject was attempted on a workflow that has already
    /// reached a terminal status.
    #[error("workflow '{workflow_id}' is already terminal with status '{status}'")]
    WorkflowTerminal { workflow_id: String, status: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Convenience alias used throughout the VERDIGRIS crates.
pub type VerdigrisResult<T> = Result<T, VerdigrisError>;
