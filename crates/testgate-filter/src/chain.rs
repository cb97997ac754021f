// crates/testgate-filter/src/chain.rs
// ============================================================================
// Module: Filter Chain
// Description: Ordered conjunction of test filters for one run.
// Purpose: Build the standard chain from run configuration and select tests.
// Dependencies: requires-logic, testgate-config, testgate-core, crate::*
// ============================================================================

//! ## Overview
//! A [`FilterChain`] accepts a test when every filter accepts it, asking the
//! filters in order and stopping at the first rejection. The standard chain
//! built by [`FilterChain::for_run`] is:
//! modules, requires, time limit, exclude list, match list, keyword, prior
//! status. Filters with nothing configured are left out.
//!
//! [`FilterChain::select`] partitions a slice of tests and reports faults
//! (including requirement faults the requires filter converted to accepts)
//! to a [`DiagnosticSink`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use requires_logic::Context;
use requires_logic::ContextBuilder;
use requires_logic::ContextValue;
use requires_logic::ExprCache;
use requires_logic::apply_vm_options;
use requires_logic::context::NULL_VALUE;
use testgate_config::RunConfig;
use testgate_core::Diagnostic;
use testgate_core::DiagnosticKind;
use testgate_core::DiagnosticSink;
use testgate_core::TestDescription;
use testgate_core::TestStatus;

use crate::error::ChainError;
use crate::error::FilterFault;
use crate::filter::CachingFilter;
use crate::filter::TestFilter;
use crate::keyword::KeywordFilter;
use crate::lists::ExcludeList;
use crate::lists::ExcludeListFilter;
use crate::lists::MatchList;
use crate::lists::MatchListFilter;
use crate::modules::ModulesFilter;
use crate::requires::RequiresFilter;
use crate::status::PriorStatusFilter;
use crate::time_limit::TimeLimitFilter;

// ============================================================================
// SECTION: Run Inputs
// ============================================================================

/// Facts about the target runtime supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct RunInputs {
    /// Evaluation context for `@requires`.
    pub context: Context,
    /// Installed modules; `None` when the JDK has no module system.
    pub installed_modules: Option<BTreeSet<String>>,
    /// Prior outcomes keyed by test URL.
    pub prior_results: BTreeMap<String, TestStatus>,
    /// Shared parsed-expression cache.
    pub exprs: Arc<ExprCache>,
}

impl RunInputs {
    /// Builds inputs whose context adds the run's thread factory and VM
    /// options to the facts already in `builder`.
    #[must_use]
    pub fn for_run(run: &RunConfig, builder: ContextBuilder) -> Self {
        let mut builder = builder.vm_options(run.vm_options.iter().cloned());
        if let Some(factory) = &run.test_thread_factory {
            builder = builder.test_thread_factory(factory.clone());
        }
        Self {
            context: builder.build(),
            ..Self::default()
        }
    }
}

// ============================================================================
// SECTION: Selection
// ============================================================================

/// A test rejected by a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Test URL.
    pub url: String,
    /// Name of the rejecting filter.
    pub filter: &'static str,
    /// Rejection reason.
    pub reason: &'static str,
}

/// Outcome of running a chain over a set of tests.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Accepted tests in input order.
    pub accepted: Vec<TestDescription>,
    /// Rejected tests in input order.
    pub rejected: Vec<Rejection>,
    /// Tests a filter could not decide.
    pub faulted: Vec<(String, FilterFault)>,
}

// ============================================================================
// SECTION: Chain
// ============================================================================

/// Ordered list of filters combined by logical AND.
#[derive(Default)]
pub struct FilterChain {
    /// Filters in evaluation order.
    filters: Vec<Box<dyn TestFilter>>,
    /// Requires filter, kept for its fault table.
    requires: Option<Arc<CachingFilter<RequiresFilter>>>,
    /// Keyword filter, kept for its ignored-test record.
    keyword: Option<Arc<KeywordFilter>>,
}

impl FilterChain {
    /// Creates an empty chain that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard chain for a run.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] when a list file cannot be loaded or the keyword
    /// expression does not parse.
    pub fn for_run(run: &RunConfig, inputs: RunInputs) -> Result<Self, ChainError> {
        let mut chain = Self::new();
        chain.push(CachingFilter::new(ModulesFilter::new(inputs.installed_modules)));
        chain.push_requires(RequiresFilter::new(inputs.exprs, run_context(run, inputs.context)));
        if let Some(limit) = run.timeout_limit_secs {
            chain.push(CachingFilter::new(TimeLimitFilter::new(limit)));
        }
        if !run.exclude_lists.is_empty() {
            let mut list = ExcludeList::default();
            for path in &run.exclude_lists {
                list.merge(ExcludeList::load(path)?);
            }
            chain.push(CachingFilter::new(ExcludeListFilter::new(list, run.platform.clone())));
        }
        if !run.match_lists.is_empty() {
            let mut list = MatchList::default();
            for path in &run.match_lists {
                list.merge(MatchList::load(path)?);
            }
            chain.push(CachingFilter::new(MatchListFilter::new(list)));
        }
        if let Some(keywords) = &run.keywords {
            let filter = KeywordFilter::new(keywords).map_err(|err| ChainError::Keywords {
                reason: err.to_string(),
            })?;
            chain.push_keyword(filter);
        }
        if !run.prior_status.is_empty() {
            chain.push(CachingFilter::new(PriorStatusFilter::new(run.prior_status.clone(), inputs.prior_results)));
        }
        Ok(chain)
    }

    /// Appends a filter.
    pub fn push(&mut self, filter: impl TestFilter + 'static) {
        self.filters.push(Box::new(filter));
    }

    /// Appends a requires filter and keeps access to its faults.
    pub fn push_requires(&mut self, filter: RequiresFilter) {
        let filter = Arc::new(CachingFilter::new(filter));
        self.requires = Some(Arc::clone(&filter));
        self.filters.push(Box::new(filter));
    }

    /// Appends a keyword filter and keeps access to its ignored tests.
    pub fn push_keyword(&mut self, filter: KeywordFilter) {
        let filter = Arc::new(filter);
        self.keyword = Some(Arc::clone(&filter));
        self.filters.push(Box::new(filter));
    }

    /// Returns the filter names in evaluation order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }

    /// Returns the first filter that rejects the test.
    ///
    /// # Errors
    ///
    /// Returns the first [`FilterFault`] raised before a rejection is found.
    pub fn first_rejection(&self, test: &TestDescription) -> Result<Option<&dyn TestFilter>, FilterFault> {
        for filter in &self.filters {
            if !filter.accepts(test)? {
                return Ok(Some(filter.as_ref()));
            }
        }
        Ok(None)
    }

    /// Returns true when every filter accepts the test.
    ///
    /// # Errors
    ///
    /// Returns the first [`FilterFault`] raised.
    pub fn accepts(&self, test: &TestDescription) -> Result<bool, FilterFault> {
        Ok(self.first_rejection(test)?.is_none())
    }

    /// Partitions tests and reports faults to the sink.
    pub fn select(&self, tests: &[TestDescription], sink: &dyn DiagnosticSink) -> Selection {
        let mut selection = Selection::default();
        for test in tests {
            match self.first_rejection(test) {
                Ok(None) => selection.accepted.push(test.clone()),
                Ok(Some(filter)) => selection.rejected.push(Rejection {
                    url: test.url.clone(),
                    filter: filter.name(),
                    reason: filter.reason(),
                }),
                Err(fault) => {
                    sink.report(
                        &Diagnostic::new(DiagnosticKind::Filter, fault.to_string())
                            .with_path(&test.file)
                            .with_url(&test.url),
                    );
                    selection.faulted.push((test.url.clone(), fault));
                }
            }
        }
        match self.requirement_faults() {
            Ok(faults) => {
                for test in tests {
                    if let Some(reason) = faults.get(&test.url) {
                        sink.report(
                            &Diagnostic::new(DiagnosticKind::Filter, reason.clone())
                                .with_path(&test.file)
                                .with_url(&test.url),
                        );
                    }
                }
            }
            Err(fault) => sink.report(&Diagnostic::new(DiagnosticKind::Filter, fault.to_string())),
        }
        selection
    }

    /// Returns requirement evaluation faults keyed by test URL.
    ///
    /// # Errors
    ///
    /// Returns [`FilterFault::CachePoisoned`] when the fault table is poisoned.
    pub fn requirement_faults(&self) -> Result<BTreeMap<String, String>, FilterFault> {
        match &self.requires {
            Some(filter) => filter.inner().faults(),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Returns URLs of keyword-rejected tests that carry the `ignore` keyword.
    ///
    /// # Errors
    ///
    /// Returns [`FilterFault::CachePoisoned`] when the record is poisoned.
    pub fn ignored_tests(&self) -> Result<BTreeSet<String>, FilterFault> {
        match &self.keyword {
            Some(filter) => filter.ignored_tests(),
            None => Ok(BTreeSet::new()),
        }
    }
}

/// Layers the run's thread factory and VM-option facts over a context.
///
/// Facts the context already holds are kept; an unset or `null` thread
/// factory takes the configured name.
fn run_context(run: &RunConfig, mut context: Context) -> Context {
    if let Some(factory) = &run.test_thread_factory
        && match context.get("test.thread.factory") {
            None => true,
            Some(ContextValue::Value(current)) => current == NULL_VALUE,
            Some(ContextValue::Error(_)) => false,
        }
    {
        context.set("test.thread.factory", factory.clone());
    }
    apply_vm_options(&mut context, &run.vm_options);
    context
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain").field("filters", &self.names()).finish_non_exhaustive()
    }
}
