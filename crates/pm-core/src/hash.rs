//! Fast hash set alias for relationship deduplication.
//!
//! Edge lines are short strings, the case the Fx hash algorithm from
//! `rustc-hash` is tuned for. The set never sees untrusted input.

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new empty [`FxHashSet`].
///
/// # Examples
///
/// ```
/// use pm_core::fx_hash_set;
///
/// let mut seen: pm_core::FxHashSet<&str> = fx_hash_set();
/// assert!(seen.insert("Order *-- LineItem : contains many"));
/// assert!(!seen.insert("Order *-- LineItem : contains many"));
/// ```
#[inline]
#[must_use]
pub fn fx_hash_set<V>() -> FxHashSet<V> {
    FxHashSet::default()
}
