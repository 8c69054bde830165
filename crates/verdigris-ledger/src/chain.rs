//! Hash-chain primitives: entry hashing and range verification.
//!
//! Every field that contributes to an entry's hash is listed explicitly so
//! nothing is accidentally omitted.  The hash input is the canonical JSON
//! (recursively sorted keys, no whitespace) of an object with exactly these
//! keys:
//!
//!   - `previous_hash` — hex digest of the predecessor, or the `"0"` sentinel
//!   - `action`
//!   - `table_name`
//!   - `record_id`
//!   - `user_id`
//!   - `timestamp` — RFC 3339 UTC with fixed microsecond precision
//!   - `old_values` — the snapshot verbatim, `null` when absent
//!   - `new_values` — the snapshot verbatim, `null` when absent
//!
//! `id`, `user_role`, `current_hash`, and `metadata` do NOT contribute.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use verdigris_contracts::{canonical::to_canonical_json, entry::AuditEntry};

/// Compute the SHA-256 hash for a single ledger entry.
///
/// Reads only the hashed fields of `entry` (see the module docs for the
/// exact list), so recomputing over a stored entry reproduces the digest
/// that was assigned at append time.
///
/// Returns a lowercase 64-character hex string.
pub fn entry_hash(entry: &AuditEntry) -> String {
    let input = json!({
        "previous_hash": entry.previous_hash,
        "action": entry.action,
        "table_name": entry.table_name,
        "record_id": entry.record_id,
        "user_id": entry.user_id,
        "timestamp": entry.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
        "old_values": entry.old_values.clone().unwrap_or(Value::Null),
        "new_values": entry.new_values.clone().unwrap_or(Value::Null),
    });

    let mut hasher = Sha256::new();
    hasher.update(to_canonical_json(&input).as_bytes());
    hex::encode(hasher.finalize())
}

/// The outcome of verifying a loaded range of the chain.
///
/// Tampering is reported as data, never as an error: callers get the
/// precise list of offending entry ids so investigation can target them
/// directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// True iff `invalid_entries` is empty.
    pub is_valid: bool,

    /// How many entries the verified range contained.
    pub total_entries: usize,

    /// Ids that failed at least one check, ascending, each reported once.
    pub invalid_entries: Vec<i64>,
}

/// Verify a contiguous, id-ascending slice of the chain.
///
/// Two checks per entry:
///
/// 1. **Hash correctness** — `current_hash` must match the value recomputed
///    from the entry's own stored fields.  A mismatch means the entry's
///    content was altered after it was written.
/// 2. **Prev-hash linkage** — for every entry after the first in the slice,
///    `previous_hash` must equal the preceding entry's `current_hash`.  A
///    mismatch means an entry was deleted, reordered, or re-chained.
///
/// The first entry's linkage to its out-of-range predecessor is not
/// checked; callers verifying a sub-range accept that boundary.
///
/// An entry failing both checks is reported once — the two pushes for the
/// same id land adjacent (ids arrive ascending), so a single `dedup` pass
/// collapses them.
pub fn verify_entries(entries: &[AuditEntry]) -> IntegrityReport {
    let mut invalid: Vec<i64> = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        if entry_hash(entry) != entry.current_hash {
            invalid.push(entry.id);
        }

        if i > 0 && entry.previous_hash != entries[i - 1].current_hash {
            invalid.push(entry.id);
        }
    }

    invalid.dedup();

    IntegrityReport {
        is_valid: invalid.is_empty(),
        total_entries: entries.len(),
        invalid_entries: invalid,
    }
}
