//! Monotonic version stamps for change tracking.
//!
//! An [`Age`] records when a value was last updated, relative to every other
//! update in the process. Higher values are newer. Downstream caches keep the
//! `Age` a derived artifact (preview image, layout) was computed at and
//! compare it against the source value's current `Age` to decide staleness.
//!
//! # Examples
//!
//! ```
//! use cardforge::Age;
//!
//! let before = Age::now();
//! let after = Age::now();
//! assert!(before < after);
//! assert!(Age::BEGINNING < before);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonic version stamp. Higher values are newer.
///
/// Two raw values are reserved:
///
/// - `0`: "not yet computed", usable as a dummy marker
/// - `1`: conceptually just before program start, older than any real stamp
///
/// Real stamps start at `2` and are issued by a process-wide atomic counter,
/// so any two stamps taken via [`Age::now`] order by creation time, even when
/// taken from different threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age(u64);

impl Age {
    /// Dummy stamp: no update has been recorded yet.
    pub const UNCOMPUTED: Self = Self(0);

    /// The stamp conceptually just before program start.
    pub const BEGINNING: Self = Self(1);

    /// Snapshot the global counter, producing a stamp newer than every stamp
    /// taken before this call on any thread.
    ///
    /// Each call advances the counter exactly once. Take at most one stamp
    /// per logical update; extra stamps make downstream staleness comparisons
    /// see phantom changes.
    #[must_use]
    pub fn now() -> Self {
        global_source().next()
    }

    /// Construct a stamp from a raw value, for sentinels and comparisons.
    #[must_use]
    pub const fn from_raw(age: u64) -> Self {
        Self(age)
    }

    /// The raw value, for storage or comparison outside the crate.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// An isolated stamp counter.
///
/// The process-wide counter behind [`Age::now`] is an `AgeSource`; tests that
/// need deterministic stamps can run their own instead of sharing the global
/// one.
#[derive(Debug)]
pub struct AgeSource {
    last: AtomicU64,
}

impl AgeSource {
    /// Create a source whose first stamp is `2`, the first real age.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(1),
        }
    }

    /// Issue the next stamp. Lock-free and safe from any thread.
    pub fn next(&self) -> Age {
        Age(self.last.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The most recently issued stamp.
    #[must_use]
    pub fn last(&self) -> Age {
        Age(self.last.load(Ordering::SeqCst))
    }
}

impl Default for AgeSource {
    fn default() -> Self {
        Self::new()
    }
}

fn global_source() -> &'static AgeSource {
    static SOURCE: AgeSource = AgeSource::new();
    &SOURCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_strictly_increasing() {
        let a = Age::now();
        let b = Age::now();
        let c = Age::now();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_sentinels_order_below_real_stamps() {
        assert!(Age::UNCOMPUTED < Age::BEGINNING);
        assert!(Age::from_raw(1) < Age::from_raw(2));
        assert!(Age::from_raw(2) <= Age::now());
        assert!(Age::BEGINNING < Age::now());
    }

    #[test]
    fn test_from_raw_round_trips() {
        assert_eq!(Age::from_raw(42).get(), 42);
        assert_eq!(Age::UNCOMPUTED.get(), 0);
        assert_eq!(Age::BEGINNING.get(), 1);
    }

    #[test]
    fn test_isolated_source_starts_at_two() {
        let source = AgeSource::new();
        assert_eq!(source.next().get(), 2);
        assert_eq!(source.next().get(), 3);
        assert_eq!(source.last().get(), 3);
    }

    #[test]
    fn test_concurrent_stamps_are_unique() {
        use std::sync::Arc;
        use std::thread;

        let source = Arc::new(AgeSource::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let source = Arc::clone(&source);
            handles.push(thread::spawn(move || {
                (0..1000).map(|_| source.next().get()).collect::<Vec<_>>()
            }));
        }

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("stamp thread"))
            .collect();
        all.sort_unstable();
        let len = all.len();
        all.dedup();
        assert_eq!(all.len(), len, "no two stamps may share a raw value");
    }
}
