//! # memokey
//!
//! Canonical cache keys for memoized function arguments.
//!
//! ## Architecture
//! - **Value model**: arguments are lowered through serde into primitives,
//!   arrays and objects
//! - **Canonical form**: objects are written with sorted keys, so key
//!   definition order never changes the key
//! - **Parser**: nom decoder from a key back to its argument list
//!
//! ```
//! use memokey::{derive_key, Object};
//!
//! let a = Object::from([("x", 1), ("y", 2)]);
//! let b = Object::from([("y", 2), ("x", 1)]);
//! assert_eq!(derive_key(&a).unwrap(), derive_key(&b).unwrap());
//! assert_ne!(derive_key(&(1, 23)).unwrap(), derive_key(&(12, 3)).unwrap());
//! ```

#![warn(missing_docs)]

mod args;
mod canonical;
mod error;
mod parser;
mod ser;
mod value;

pub use args::{to_arguments, Spread};
pub use canonical::{derive_key, derive_key_with_limit, key_from_values, CanonicalKey, DEFAULT_MAX_DEPTH};
pub use error::{Error, Result};
pub use parser::parse_key;
pub use ser::to_value;
pub use value::{Object, Value};
