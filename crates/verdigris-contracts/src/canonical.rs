//! Canonical JSON serialization for hashing.
//!
//! Every hash in the ledger is computed over a byte-for-byte reproducible
//! encoding of structured data.  `serde_json` alone is not enough: object
//! key order depends on how a value was constructed, and two logically
//! identical snapshots must always hash identically.
//!
//! Canonical form rules:
//!
//! 1. Object keys are emitted in ascending UTF-8 byte order, recursively.
//! 2. No whitespace anywhere.
//! 3. Strings and numbers use `serde_json`'s standard scalar encoding.
//! 4. `null`, `true`, `false` are emitted as their JSON literals.
//!
//! The same rules apply everywhere a hash is computed or recomputed, so
//! verification is reproducible across processes and store backends.

use serde_json::Value;

/// Encode `value` in canonical form.
///
/// The output is stable across calls, processes, and machines for any two
/// structurally equal values, regardless of the key insertion order they
/// were built with.
pub fn to_canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

/// Recursive worker for [`to_canonical_json`].
///
/// # Panics
///
/// Panics if a scalar `Value` cannot be re-serialized — which cannot
/// happen for values that already exist as `serde_json::Value`.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(
                    &serde_json::to_string(key)
                        .expect("JSON string key must always be serializable"),
                );
                out.push(':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push('}');
        }

        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }

        // Null, Bool, Number, String all have a single standard encoding.
        scalar => {
            out.push_str(
                &serde_json::to_string(scalar)
                    .expect("JSON scalar must always be serializable"),
            );
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
