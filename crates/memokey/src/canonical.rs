//! Canonical key derivation
//!
//! Key format:
//! ```text
//! (arg,arg,...)          argument list, `()` when empty
//! null true false        primitives
//! 42 -7 1.99 NaN         numbers
//! "text"                 JSON-quoted strings
//! [v,v]                  arrays, element order kept
//! {"k":v,"z":v}          objects, keys sorted by byte order
//! ```
//!
//! Two argument lists get the same key iff they have the same length and each
//! position holds equal primitives, element-wise equal arrays, or objects with
//! the same key/value pairs in any order.

use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;

use crate::args::to_arguments;
use crate::error::{Error, Result};
use crate::parser::parse_key;
use crate::value::Value;

/// Default maximum nesting depth of a single argument
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Canonical cache key for one argument list
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Key text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap the key text
    pub fn into_string(self) -> String {
        self.0
    }

    /// Decode the normalized argument list this key was derived from
    pub fn arguments(&self) -> Result<Vec<Value>> {
        parse_key(&self.0)
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CanonicalKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Derive the canonical key for a memoized function's argument
///
/// See [`to_arguments`] for how `args` maps onto positional arguments.
pub fn derive_key<A: Serialize + ?Sized>(args: &A) -> Result<CanonicalKey> {
    derive_key_with_limit(args, DEFAULT_MAX_DEPTH)
}

/// Derive a key with an explicit nesting limit
pub fn derive_key_with_limit<A: Serialize + ?Sized>(args: &A, limit: usize) -> Result<CanonicalKey> {
    let values = to_arguments(args, limit)?;
    key_from_values(&values, limit)
}

/// Derive the key for an argument list that is already in [`Value`] form
pub fn key_from_values(args: &[Value], limit: usize) -> Result<CanonicalKey> {
    let mut out = String::with_capacity(16 * args.len() + 2);
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_value(&mut out, arg, 0, limit)?;
    }
    out.push(')');
    Ok(CanonicalKey(out))
}

fn write_value(out: &mut String, value: &Value, depth: usize, limit: usize) -> Result<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::String(s) => write_str(out, s)?,
        Value::Array(items) => {
            let depth = enter(depth, limit)?;
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item, depth, limit)?;
            }
            out.push(']');
        }
        Value::Object(obj) => {
            let depth = enter(depth, limit)?;
            out.push('{');
            for (i, (key, item)) in obj.sorted().into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_str(out, key)?;
                out.push(':');
                write_value(out, item, depth, limit)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn write_str(out: &mut String, s: &str) -> Result<()> {
    out.push_str(&serde_json::to_string(s)?);
    Ok(())
}

fn enter(depth: usize, limit: usize) -> Result<usize> {
    let depth = depth + 1;
    if depth > limit {
        return Err(Error::CyclicArgument { limit });
    }
    Ok(depth)
}

/// Textual form of a float
///
/// Integral values print like the equal integer, `-0` prints as `0`, and the
/// non-finite values print as `NaN`, `Infinity` and `-Infinity`. Everything
/// else uses the shortest digits that round-trip.
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if f == 0.0 {
        "0".to_string()
    } else {
        f.to_string()
    }
}
