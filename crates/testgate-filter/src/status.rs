// crates/testgate-filter/src/status.rs
// ============================================================================
// Module: Prior Status Filter
// Description: Selects tests by the outcome of a previous run.
// Dependencies: testgate-core, crate::{error, filter}
// ============================================================================

//! ## Overview
//! Tests missing from the prior results count as [`TestStatus::NotRun`].

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use testgate_core::TestDescription;
use testgate_core::TestStatus;

use crate::error::FilterFault;
use crate::filter::CachingTestFilter;

/// Accepts tests whose prior status is in the wanted set.
#[derive(Debug, Clone)]
pub struct PriorStatusFilter {
    /// Statuses to select.
    wanted: BTreeSet<TestStatus>,
    /// Prior outcomes keyed by test URL.
    prior: BTreeMap<String, TestStatus>,
}

impl PriorStatusFilter {
    /// Creates the filter.
    #[must_use]
    pub const fn new(wanted: BTreeSet<TestStatus>, prior: BTreeMap<String, TestStatus>) -> Self {
        Self {
            wanted,
            prior,
        }
    }

    /// Returns the prior status of a test.
    #[must_use]
    pub fn prior_status(&self, url: &str) -> TestStatus {
        self.prior.get(url).copied().unwrap_or(TestStatus::NotRun)
    }
}

impl CachingTestFilter for PriorStatusFilter {
    type Key = String;

    fn name(&self) -> &'static str {
        "prior_status"
    }

    fn description(&self) -> &'static str {
        "Select tests by their status in a previous run"
    }

    fn reason(&self) -> &'static str {
        "Prior status not selected"
    }

    fn cache_key(&self, test: &TestDescription) -> String {
        test.url.clone()
    }

    fn compute_value(&self, test: &TestDescription) -> Result<bool, FilterFault> {
        Ok(self.wanted.contains(&self.prior_status(&test.url)))
    }
}
