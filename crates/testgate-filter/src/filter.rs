// crates/testgate-filter/src/filter.rs
// ============================================================================
// Module: Filter Traits
// Description: Test filter interfaces and the memoizing wrapper.
// Purpose: Decide each distinct cache key once per run.
// Dependencies: testgate-core, crate::error
// ============================================================================

//! ## Overview
//! [`TestFilter`] is the interface the chain consumes. Filters whose answer
//! depends only on part of a description implement [`CachingTestFilter`]
//! instead and are wrapped in [`CachingFilter`], which memoizes
//! [`CachingTestFilter::compute_value`] per [`CachingTestFilter::cache_key`].
//!
//! Faults are returned to the caller and never memoized. Every decision,
//! memoized or freshly computed, is passed to
//! [`CachingTestFilter::observe`] so a filter can keep per-test records while
//! computing per key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use testgate_core::TestDescription;

use crate::error::FilterFault;

// ============================================================================
// SECTION: Interfaces
// ============================================================================

/// Accepts or rejects test descriptions.
pub trait TestFilter: Send + Sync {
    /// Short stable name.
    fn name(&self) -> &'static str;

    /// One-line description of what the filter checks.
    fn description(&self) -> &'static str;

    /// Reason reported for rejected tests.
    fn reason(&self) -> &'static str;

    /// Returns true when the test is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`FilterFault`] when the filter cannot decide.
    fn accepts(&self, test: &TestDescription) -> Result<bool, FilterFault>;
}

impl<T: TestFilter + ?Sized> TestFilter for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn description(&self) -> &'static str {
        (**self).description()
    }

    fn reason(&self) -> &'static str {
        (**self).reason()
    }

    fn accepts(&self, test: &TestDescription) -> Result<bool, FilterFault> {
        (**self).accepts(test)
    }
}

/// A filter whose answer is a pure function of a cache key.
pub trait CachingTestFilter: Send + Sync {
    /// Memo key type.
    type Key: Eq + Hash + Send;

    /// Short stable name.
    fn name(&self) -> &'static str;

    /// One-line description of what the filter checks.
    fn description(&self) -> &'static str;

    /// Reason reported for rejected tests.
    fn reason(&self) -> &'static str;

    /// Returns the memo key for a test.
    fn cache_key(&self, test: &TestDescription) -> Self::Key;

    /// Computes the answer for a key not yet memoized.
    ///
    /// # Errors
    ///
    /// Returns [`FilterFault`] when the filter cannot decide.
    fn compute_value(&self, test: &TestDescription) -> Result<bool, FilterFault>;

    /// Sees every decision for a test, whether memoized or computed.
    ///
    /// # Errors
    ///
    /// Returns [`FilterFault`] when the filter cannot record the decision.
    fn observe(&self, _test: &TestDescription, _value: bool) -> Result<(), FilterFault> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Caching Wrapper
// ============================================================================

/// Memoizes a [`CachingTestFilter`] per cache key.
///
/// # Invariants
/// - `compute_value` runs at most once per key that produced a value.
/// - The memo table is guarded by one lock held across the computation.
pub struct CachingFilter<F: CachingTestFilter> {
    /// Wrapped filter.
    inner: F,
    /// Memoized answers.
    memo: Mutex<HashMap<F::Key, bool>>,
}

impl<F: CachingTestFilter> CachingFilter<F> {
    /// Wraps a filter with an empty memo table.
    #[must_use]
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            memo: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the wrapped filter.
    #[must_use]
    pub const fn inner(&self) -> &F {
        &self.inner
    }

    /// Returns the number of memoized keys.
    ///
    /// # Errors
    ///
    /// Returns [`FilterFault::CachePoisoned`] when the lock is poisoned.
    pub fn cached(&self) -> Result<usize, FilterFault> {
        Ok(self.lock()?.len())
    }

    /// Locks the memo table.
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<F::Key, bool>>, FilterFault> {
        self.memo.lock().map_err(|_| FilterFault::CachePoisoned {
            filter: self.inner.name(),
        })
    }
}

impl<F: CachingTestFilter> fmt::Debug for CachingFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingFilter").field("name", &self.inner.name()).finish_non_exhaustive()
    }
}

impl<F: CachingTestFilter> TestFilter for CachingFilter<F> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn description(&self) -> &'static str {
        self.inner.description()
    }

    fn reason(&self) -> &'static str {
        self.inner.reason()
    }

    fn accepts(&self, test: &TestDescription) -> Result<bool, FilterFault> {
        let key = self.inner.cache_key(test);
        let value = {
            let mut memo = self.lock()?;
            match memo.get(&key) {
                Some(value) => *value,
                None => {
                    let value = self.inner.compute_value(test)?;
                    memo.insert(key, value);
                    value
                }
            }
        };
        self.inner.observe(test, value)?;
        Ok(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Test-only assertions may unwrap.")]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use testgate_core::TestDescription;

    use super::CachingFilter;
    use super::CachingTestFilter;
    use super::TestFilter;
    use crate::error::FilterFault;

    struct Flaky {
        calls: AtomicUsize,
    }

    impl CachingTestFilter for Flaky {
        type Key = String;

        fn name(&self) -> &'static str {
            "flaky"
        }

        fn description(&self) -> &'static str {
            "fails on first call"
        }

        fn reason(&self) -> &'static str {
            "never rejects"
        }

        fn cache_key(&self, test: &TestDescription) -> String {
            test.url.clone()
        }

        fn compute_value(&self, test: &TestDescription) -> Result<bool, FilterFault> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(FilterFault::Evaluation {
                    filter: "flaky",
                    url: test.url.clone(),
                    reason: "first call".to_string(),
                });
            }
            Ok(true)
        }
    }

    #[test]
    fn faults_are_not_memoized() {
        let filter = CachingFilter::new(Flaky {
            calls: AtomicUsize::new(0),
        });
        let test = TestDescription::new("/s/A.java", "A.java", 1, None);
        assert!(filter.accepts(&test).is_err());
        assert_eq!(filter.cached().unwrap(), 0);
        assert!(filter.accepts(&test).unwrap());
        assert!(filter.accepts(&test).unwrap());
        assert_eq!(filter.inner().calls.load(Ordering::SeqCst), 2);
    }
}
