//! # memocache
//!
//! Argument-keyed memoization for pure functions.
//!
//! ## Architecture
//! - **Keys**: `memokey` canonical keys, so objects with the same key/value
//!   pairs hit the same entry whatever their key order
//! - **Store**: AHash map behind a parking_lot `RwLock`, one per wrapper;
//!   per-entry hit counters are atomics
//! - **Entry points**: [`memoize`] returns a bare callable, [`cache`] adds hit
//!   counting and clearing
//!
//! ```
//! use memocache::{cache, memoize, Spread};
//!
//! let sum = memoize(|nums: Spread<i64>| nums.iter().sum::<i64>());
//! assert_eq!(sum.call(Spread(vec![1, 2, 3])).unwrap(), 6);
//!
//! let power = cache(|(base, exp): (u64, u32)| base.pow(exp));
//! assert_eq!(power.call((3, 3)).unwrap(), 27);
//! assert_eq!(power.call((3, 3)).unwrap(), 27);
//! assert_eq!(power.hit_count(&(3, 3)).unwrap(), 1);
//! ```

#![warn(missing_docs)]

mod config;
mod memo;
mod stats;
mod store;

#[cfg(test)]
mod fixtures;

pub use config::{MemoConfig, DEFAULT_LABEL};
pub use memo::{
    cache, cache_fallible, cache_fallible_with, cache_with, memoize, memoize_fallible,
    memoize_fallible_with, memoize_with, CacheControl, Cached, Memoized,
};
pub use memokey::{derive_key, CanonicalKey, Error, Object, Result, Spread, Value};
pub use stats::CacheStats;
pub use store::MemoStore;
