//! Memoizing wrappers: `memoize` and `cache`
//!
//! Every constructor call allocates a fresh [`MemoStore`], so two wrappers
//! over the same function never share entries. Clones of one wrapper do share
//! its store.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use memokey::{Error, Result, Value};
use serde::Serialize;

use crate::config::MemoConfig;
use crate::stats::CacheStats;
use crate::store::MemoStore;

/// Memoized function
///
/// Callable through [`call`](Self::call) (or [`try_call`](Self::try_call) for
/// fallible functions) and nothing else: the backing store is not reachable
/// from this type.
pub struct Memoized<A, V, F> {
    func: Arc<F>,
    store: Arc<MemoStore<V>>,
    _args: PhantomData<fn(A)>,
}

impl<A, V: Clone, F> Memoized<A, V, F> {
    fn new(func: F, config: MemoConfig) -> Self {
        Self {
            func: Arc::new(func),
            store: Arc::new(MemoStore::new(config)),
            _args: PhantomData,
        }
    }
}

impl<A, V, F> Memoized<A, V, F>
where
    A: Serialize,
    V: Clone,
    F: Fn(A) -> V,
{
    /// Call the function, or return the cached result for equivalent arguments
    ///
    /// Fails only when no key can be derived for `args`.
    pub fn call(&self, args: A) -> Result<V> {
        let key = self.store.key(&args)?;
        Ok(self.store.get_or_compute_by_key(key, || (*self.func)(args)))
    }
}

impl<A, V, F> Memoized<A, V, F>
where
    A: Serialize,
    V: Clone,
{
    /// Call a fallible function; an `Err` is returned unchanged and not cached
    pub fn try_call<E>(&self, args: A) -> std::result::Result<V, E>
    where
        F: Fn(A) -> std::result::Result<V, E>,
        E: From<Error>,
    {
        let key = self.store.key(&args)?;
        self.store.try_get_or_compute_by_key(key, || (*self.func)(args))
    }
}

impl<A, V, F> Clone for Memoized<A, V, F> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            store: Arc::clone(&self.store),
            _args: PhantomData,
        }
    }
}

impl<A, V, F> fmt::Debug for Memoized<A, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized").finish_non_exhaustive()
    }
}

/// Introspection and reset handle for a [`Cached`] function's store
pub struct CacheControl<A, V> {
    store: Arc<MemoStore<V>>,
    _args: PhantomData<fn(A)>,
}

impl<A: Serialize, V: Clone> CacheControl<A, V> {
    /// How many times the cached result for `args` has been reused
    ///
    /// 0 before the first call and right after it; +1 for each later call
    /// with equivalent arguments. Reading it changes nothing.
    pub fn hit_count(&self, args: &A) -> Result<u64> {
        self.store.hit_count(args)
    }

    /// Forget every cached result
    pub fn clear(&self) {
        self.store.clear()
    }

    /// Number of cached results
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Store-wide statistics
    pub fn stats(&self) -> &CacheStats {
        self.store.stats()
    }

    /// Decoded argument lists of all cached results, sorted by key
    pub fn cached_arguments(&self) -> Result<Vec<Vec<Value>>> {
        self.store.cached_arguments()
    }
}

impl<A, V> Clone for CacheControl<A, V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _args: PhantomData,
        }
    }
}

impl<A, V> fmt::Debug for CacheControl<A, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheControl").finish_non_exhaustive()
    }
}

/// Memoized function together with its cache controls
///
/// Destructure it to hand the function and the controls to different owners:
/// `let Cached { func, control } = cache(f);`
pub struct Cached<A, V, F> {
    /// The memoized function
    pub func: Memoized<A, V, F>,
    /// Hit counts and reset for `func`'s store
    pub control: CacheControl<A, V>,
}

impl<A, V, F> Cached<A, V, F>
where
    A: Serialize,
    V: Clone,
{
    fn new(func: F, config: MemoConfig) -> Self {
        let func = Memoized::new(func, config);
        let control = CacheControl {
            store: Arc::clone(&func.store),
            _args: PhantomData,
        };
        Self { func, control }
    }

    /// See [`Memoized::call`]
    pub fn call(&self, args: A) -> Result<V>
    where
        F: Fn(A) -> V,
    {
        self.func.call(args)
    }

    /// See [`Memoized::try_call`]
    pub fn try_call<E>(&self, args: A) -> std::result::Result<V, E>
    where
        F: Fn(A) -> std::result::Result<V, E>,
        E: From<Error>,
    {
        self.func.try_call(args)
    }

    /// See [`CacheControl::hit_count`]
    pub fn hit_count(&self, args: &A) -> Result<u64> {
        self.control.hit_count(args)
    }

    /// See [`CacheControl::clear`]
    pub fn clear(&self) {
        self.control.clear()
    }

    /// See [`CacheControl::stats`]
    pub fn stats(&self) -> &CacheStats {
        self.control.stats()
    }
}

impl<A, V, F> Clone for Cached<A, V, F> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            control: self.control.clone(),
        }
    }
}

/// Wrap `func` so results are cached by argument value
///
/// # Example
/// ```
/// let to_binary = memocache::memoize(|n: u64| format!("{:b}", n));
/// assert_eq!(to_binary.call(123).unwrap(), "1111011");
/// ```
pub fn memoize<A, V, F>(func: F) -> Memoized<A, V, F>
where
    A: Serialize,
    V: Clone,
    F: Fn(A) -> V,
{
    memoize_with(MemoConfig::default(), func)
}

/// [`memoize`] with explicit settings
pub fn memoize_with<A, V, F>(config: MemoConfig, func: F) -> Memoized<A, V, F>
where
    A: Serialize,
    V: Clone,
    F: Fn(A) -> V,
{
    Memoized::new(func, config)
}

/// Wrap a fallible `func`; only `Ok` results are cached
pub fn memoize_fallible<A, V, E, F>(func: F) -> Memoized<A, V, F>
where
    A: Serialize,
    V: Clone,
    E: From<Error>,
    F: Fn(A) -> std::result::Result<V, E>,
{
    memoize_fallible_with(MemoConfig::default(), func)
}

/// [`memoize_fallible`] with explicit settings
pub fn memoize_fallible_with<A, V, E, F>(config: MemoConfig, func: F) -> Memoized<A, V, F>
where
    A: Serialize,
    V: Clone,
    E: From<Error>,
    F: Fn(A) -> std::result::Result<V, E>,
{
    Memoized::new(func, config)
}

/// Wrap `func` and keep hit-count and clear access to its cache
///
/// # Example
/// ```
/// let cached = memocache::cache(|n: u64| format!("{:b}", n));
/// cached.call(123).unwrap();
/// cached.call(123).unwrap();
/// assert_eq!(cached.hit_count(&123).unwrap(), 1);
/// cached.clear();
/// assert_eq!(cached.hit_count(&123).unwrap(), 0);
/// ```
pub fn cache<A, V, F>(func: F) -> Cached<A, V, F>
where
    A: Serialize,
    V: Clone,
    F: Fn(A) -> V,
{
    cache_with(MemoConfig::default(), func)
}

/// [`cache`] with explicit settings
pub fn cache_with<A, V, F>(config: MemoConfig, func: F) -> Cached<A, V, F>
where
    A: Serialize,
    V: Clone,
    F: Fn(A) -> V,
{
    Cached::new(func, config)
}

/// [`cache`] for a fallible `func`; only `Ok` results are cached
pub fn cache_fallible<A, V, E, F>(func: F) -> Cached<A, V, F>
where
    A: Serialize,
    V: Clone,
    E: From<Error>,
    F: Fn(A) -> std::result::Result<V, E>,
{
    cache_fallible_with(MemoConfig::default(), func)
}

/// [`cache_fallible`] with explicit settings
pub fn cache_fallible_with<A, V, E, F>(config: MemoConfig, func: F) -> Cached<A, V, F>
where
    A: Serialize,
    V: Clone,
    E: From<Error>,
    F: Fn(A) -> std::result::Result<V, E>,
{
    Cached::new(func, config)
}
