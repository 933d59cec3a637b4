//! Content fingerprints for form specifications.
//!
//! The fingerprint is the SHA-256 hex digest of a canonical JSON rendering:
//!
//! - object keys sorted at every level,
//! - array order preserved,
//! - `", "` / `": "` separators,
//! - every non-ASCII character escaped as `\uXXXX` (surrogate pairs above the BMP).
//!
//! The input is the *modelled* form: keys the config types do not know are
//! dropped, and an absent `questions` list renders as `[]`. For documents
//! that spell out exactly the modelled fields the rendering matches
//! `json.dumps(value, sort_keys=True)` byte for byte, so state files written
//! by older tooling keep matching unchanged forms. Documents with extra keys
//! or no `questions` key get one update after switching tools.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use formsync_core::FormSpec;

/// SHA-256 fingerprint of `spec`, as lowercase hex.
pub fn fingerprint(spec: &FormSpec) -> String {
    digest_of(spec)
}

/// SHA-256 fingerprint of any serializable value.
pub fn digest_of<T: Serialize + ?Sized>(value: &T) -> String {
    let canonical = canonical_json(value);
    let mut h = Sha256::new();
    h.update(canonical.as_bytes());
    hex::encode(h.finalize())
}

/// Canonical JSON rendering of `value` (see module docs).
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> String {
    // Types that fail to serialize to a Value (non-string map keys) never
    // reach here: FormSpec is plain strings, bools and sequences.
    let value = serde_json::to_value(value).unwrap_or(Value::Null);
    let mut out = String::new();
    write_value(&value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_string(key, out);
                out.push_str(": ");
                write_value(item, out);
            }
            out.push('}');
        }
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 || (c as u32) > 0x7e => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{unit:04x}");
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
