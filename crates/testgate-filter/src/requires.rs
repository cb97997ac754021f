// crates/testgate-filter/src/requires.rs
// ============================================================================
// Module: Requirements Filter
// Description: Evaluates `@requires` against the run context.
// Purpose: Select tests whose requirements hold on the target platform.
// Dependencies: requires-logic, testgate-core, crate::{error, filter}
// ============================================================================

//! ## Overview
//! Expressions are parsed through a shared [`ExprCache`] and evaluated
//! against one [`Context`] per run. Decisions are memoized per requirement
//! text, so tests sharing an expression evaluate it once.
//!
//! An expression that faults does not reject its test: the fault is kept per
//! text, copied to every test URL carrying that text, and the test is
//! accepted. The problem then surfaces as an error when the test runs
//! instead of as a silent exclusion.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use requires_logic::Context;
use requires_logic::ExprCache;
use testgate_core::TestDescription;

use crate::error::FilterFault;
use crate::filter::CachingTestFilter;

// ============================================================================
// SECTION: Filter
// ============================================================================

/// Accepts tests whose requirement expression holds.
#[derive(Debug)]
pub struct RequiresFilter {
    /// Shared parsed-expression cache.
    exprs: Arc<ExprCache>,
    /// Run context.
    context: Context,
    /// Evaluation faults keyed by requirement text.
    text_faults: Mutex<BTreeMap<String, String>>,
    /// Evaluation faults keyed by test URL.
    faults: Mutex<BTreeMap<String, String>>,
}

impl RequiresFilter {
    /// Creates the filter for a run context.
    #[must_use]
    pub fn new(exprs: Arc<ExprCache>, context: Context) -> Self {
        Self {
            exprs,
            context,
            text_faults: Mutex::new(BTreeMap::new()),
            faults: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the run context.
    #[must_use]
    pub const fn context(&self) -> &Context {
        &self.context
    }

    /// Returns the recorded faults keyed by test URL.
    ///
    /// # Errors
    ///
    /// Returns [`FilterFault::CachePoisoned`] when the fault table is poisoned.
    pub fn faults(&self) -> Result<BTreeMap<String, String>, FilterFault> {
        Ok(self.lock_faults()?.clone())
    }

    /// Returns the recorded fault for one test.
    ///
    /// # Errors
    ///
    /// Returns [`FilterFault::CachePoisoned`] when the fault table is poisoned.
    pub fn fault_for(&self, url: &str) -> Result<Option<String>, FilterFault> {
        Ok(self.lock_faults()?.get(url).cloned())
    }

    /// Locks the per-URL fault table.
    fn lock_faults(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, FilterFault> {
        lock_table(&self.faults)
    }

    /// Locks the per-text fault table.
    fn lock_text_faults(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, FilterFault> {
        lock_table(&self.text_faults)
    }
}

impl CachingTestFilter for RequiresFilter {
    type Key = Option<String>;

    fn name(&self) -> &'static str {
        "requires"
    }

    fn description(&self) -> &'static str {
        "Select tests whose @requires expression holds"
    }

    fn reason(&self) -> &'static str {
        "Requirements not met"
    }

    fn cache_key(&self, test: &TestDescription) -> Option<String> {
        test.requires.clone()
    }

    fn compute_value(&self, test: &TestDescription) -> Result<bool, FilterFault> {
        let Some(text) = &test.requires else {
            return Ok(true);
        };
        let outcome = self
            .exprs
            .get_or_parse(text)
            .map_err(|err| err.to_string())
            .and_then(|expr| expr.evaluate(&self.context).map_err(|fault| fault.to_string()));
        match outcome {
            Ok(value) => Ok(value),
            Err(reason) => {
                self.lock_text_faults()?.insert(text.clone(), reason);
                Ok(true)
            }
        }
    }

    fn observe(&self, test: &TestDescription, _value: bool) -> Result<(), FilterFault> {
        let Some(text) = &test.requires else {
            return Ok(());
        };
        let Some(reason) = self.lock_text_faults()?.get(text).cloned() else {
            return Ok(());
        };
        self.lock_faults()?.insert(test.url.clone(), reason);
        Ok(())
    }
}

/// Locks a fault table.
fn lock_table(table: &Mutex<BTreeMap<String, String>>) -> Result<MutexGuard<'_, BTreeMap<String, String>>, FilterFault> {
    table.lock().map_err(|_| FilterFault::CachePoisoned {
        filter: "requires",
    })
}
