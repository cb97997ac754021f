// crates/testgate-filter/src/time_limit.rs
// ============================================================================
// Module: Time Limit Filter
// Description: Rejects tests whose declared timeout exceeds the run limit.
// Dependencies: testgate-core, crate::{error, filter}
// ============================================================================

use testgate_core::TestDescription;

use crate::error::FilterFault;
use crate::filter::CachingTestFilter;

/// Rejects tests whose nonzero max timeout exceeds a limit.
#[derive(Debug, Clone, Copy)]
pub struct TimeLimitFilter {
    /// Limit in seconds.
    limit_secs: u64,
}

impl TimeLimitFilter {
    /// Creates the filter.
    #[must_use]
    pub const fn new(limit_secs: u64) -> Self {
        Self {
            limit_secs,
        }
    }
}

impl CachingTestFilter for TimeLimitFilter {
    type Key = u64;

    fn name(&self) -> &'static str {
        "time_limit"
    }

    fn description(&self) -> &'static str {
        "Select tests that fit within the run time limit"
    }

    fn reason(&self) -> &'static str {
        "Declared timeout exceeds the time limit"
    }

    fn cache_key(&self, test: &TestDescription) -> u64 {
        test.max_timeout
    }

    fn compute_value(&self, test: &TestDescription) -> Result<bool, FilterFault> {
        Ok(test.max_timeout == 0 || test.max_timeout <= self.limit_secs)
    }
}
