//! TOML-driven approver directory.
//!
//! Maps each approval level to the contact address that receives that
//! level's approval-request notifications.  Loaded once at startup and
//! passed to the engine by value.
//!
//! A level without a directory entry is legal: workflow creation and
//! advancement still proceed, and the approval request for that level is
//! skipped with a log line.  Missing approver contact is not fatal.

use std::path::Path;

use serde::{Deserialize, Serialize};

use verdigris_contracts::{
    error::{VerdigrisError, VerdigrisResult},
    workflow::ApprovalLevel,
};

/// One directory entry loaded from TOML.
///
/// Example:
/// ```toml
/// [[approvers]]
/// level = "site"
/// contact = "site-lead@example.com"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproverEntry {
    /// The level this entry serves (snake_case label in TOML).
    pub level: ApprovalLevel,

    /// Where approval requests for this level are delivered.
    pub contact: String,
}

/// The top-level structure deserialized from a TOML approver file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApproverConfig {
    /// Directory entries.  The first entry for a level wins.
    #[serde(default)]
    pub approvers: Vec<ApproverEntry>,
}

/// The approver directory consulted by the workflow engine.
#[derive(Debug, Clone, Default)]
pub struct ApproverDirectory {
    config: ApproverConfig,
}

impl ApproverDirectory {
    /// A directory with no entries — every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `s` as TOML and build a directory.
    ///
    /// Returns `VerdigrisError::Config` if the TOML is malformed or does
    /// not match the expected [`ApproverConfig`] schema.
    pub fn from_toml_str(s: &str) -> VerdigrisResult<Self> {
        let config: ApproverConfig =
            toml::from_str(s).map_err(|e| VerdigrisError::Config {
                reason: format!("failed to parse approver TOML: {}", e),
            })?;
        Ok(Self { config })
    }

    /// Read the file at `path` and parse it as TOML approver configuration.
    pub fn from_file(path: &Path) -> VerdigrisResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| VerdigrisError::Config {
            reason: format!("failed to read approver file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The configured contact for `level`, if any.  First entry wins.
    pub fn contact(&self, level: ApprovalLevel) -> Option<&str> {
        self.config
            .approvers
            .iter()
            .find(|entry| entry.level == level)
            .map(|entry| entry.contact.as_str())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
