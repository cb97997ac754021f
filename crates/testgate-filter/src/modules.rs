// crates/testgate-filter/src/modules.rs
// ============================================================================
// Module: Module Availability Filter
// Description: Rejects tests needing modules the target JDK lacks.
// Purpose: Keep tests off runtimes that cannot load their modules.
// Dependencies: testgate-core, crate::{error, filter}
// ============================================================================

//! ## Overview
//! The installed module set is supplied by whoever introspected the target
//! JDK. `None` means the JDK predates modules, in which case the check is
//! skipped and every test is accepted.

use std::collections::BTreeSet;

use testgate_core::TestDescription;

use crate::error::FilterFault;
use crate::filter::CachingTestFilter;

/// Rejects tests that name a module missing from the target JDK.
#[derive(Debug, Clone, Default)]
pub struct ModulesFilter {
    /// Installed modules; `None` when the JDK has no module system.
    installed: Option<BTreeSet<String>>,
}

impl ModulesFilter {
    /// Creates the filter for a target JDK.
    #[must_use]
    pub const fn new(installed: Option<BTreeSet<String>>) -> Self {
        Self {
            installed,
        }
    }
}

impl CachingTestFilter for ModulesFilter {
    type Key = BTreeSet<String>;

    fn name(&self) -> &'static str {
        "modules"
    }

    fn description(&self) -> &'static str {
        "Select tests whose modules are available"
    }

    fn reason(&self) -> &'static str {
        "Module not available"
    }

    fn cache_key(&self, test: &TestDescription) -> BTreeSet<String> {
        test.modules.iter().map(|spec| spec.module.clone()).collect()
    }

    fn compute_value(&self, test: &TestDescription) -> Result<bool, FilterFault> {
        let Some(installed) = &self.installed else {
            return Ok(true);
        };
        Ok(test.modules.iter().all(|spec| installed.contains(&spec.module)))
    }
}
