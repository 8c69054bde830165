//! # verdigris-ledger
//!
//! Immutable, append-only, SHA-256 hash-chained audit ledger for the
//! VERDIGRIS core.
//!
//! ## Overview
//!
//! Every state-changing action system-wide lands here as an `AuditEntry`
//! that links to its predecessor via its SHA-256 hash.  Tampering with any
//! stored entry — even a single byte of a snapshot — breaks the chain and
//! is detected by [`AuditService::verify`], which reports the precise ids
//! of the offending entries.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use verdigris_ledger::{AuditService, InMemoryLedgerStore};
//!
//! let service = AuditService::new(Arc::new(InMemoryLedgerStore::new()));
//! let receipt = service.append(request)?;
//! let report = service.verify(1, None)?;
//! assert!(report.is_valid);
//! ```

pub mod chain;
pub mod memory;
pub mod service;

pub use chain::{entry_hash, verify_entries, IntegrityReport};
pub use memory::InMemoryLedgerStore;
pub use service::AuditService;

// ── Tests ─────────────────────────────────────────────────────────────────────
