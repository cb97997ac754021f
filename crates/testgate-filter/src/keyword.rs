// crates/testgate-filter/src/keyword.rs
// ============================================================================
// Module: Keyword Filter
// Description: Selects tests by a boolean expression over their keywords.
// Purpose: Apply the run's keyword expression, tracking ignored tests.
// Dependencies: requires-logic, testgate-core, crate::{error, filter}
// ============================================================================

//! ## Overview
//! The keyword expression uses the requirement grammar. Each keyword a test
//! carries evaluates as `"true"`; any other name is undefined and therefore
//! false. The answer depends on the whole keyword set, so this filter is not
//! memoized. Rejected tests that carry the `ignore` keyword are recorded so
//! reports can list them separately from plain keyword mismatches.

use std::collections::BTreeSet;
use std::sync::Mutex;

use requires_logic::Context;
use requires_logic::Expr;
use requires_logic::ExprError;
use requires_logic::parse_expr;
use testgate_core::TestDescription;

use crate::error::FilterFault;
use crate::filter::TestFilter;

/// Keyword that marks a test as ignored.
const IGNORE_KEYWORD: &str = "ignore";

/// Accepts tests whose keywords satisfy an expression.
#[derive(Debug)]
pub struct KeywordFilter {
    /// Source text of the expression.
    text: String,
    /// Parsed expression.
    expr: Expr,
    /// URLs of rejected tests carrying the `ignore` keyword.
    ignored: Mutex<BTreeSet<String>>,
}

impl KeywordFilter {
    /// Parses the keyword expression.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError`] when the expression does not parse.
    pub fn new(text: &str) -> Result<Self, ExprError> {
        Ok(Self {
            text: text.to_string(),
            expr: parse_expr(text)?,
            ignored: Mutex::new(BTreeSet::new()),
        })
    }

    /// Returns the expression text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the URLs of rejected tests that carry the `ignore` keyword.
    ///
    /// # Errors
    ///
    /// Returns [`FilterFault::CachePoisoned`] when the record is poisoned.
    pub fn ignored_tests(&self) -> Result<BTreeSet<String>, FilterFault> {
        self.ignored.lock().map(|ignored| ignored.clone()).map_err(|_| FilterFault::CachePoisoned {
            filter: "keyword",
        })
    }
}

impl TestFilter for KeywordFilter {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn description(&self) -> &'static str {
        "Select tests whose keywords match the keyword expression"
    }

    fn reason(&self) -> &'static str {
        "Keywords do not match"
    }

    fn accepts(&self, test: &TestDescription) -> Result<bool, FilterFault> {
        let context: Context = test.keywords.iter().map(|keyword| (keyword.as_str(), "true")).collect();
        let accepted = self.expr.evaluate(&context).map_err(|fault| FilterFault::Evaluation {
            filter: "keyword",
            url: test.url.clone(),
            reason: fault.to_string(),
        })?;
        if !accepted && test.has_keyword(IGNORE_KEYWORD) {
            self.ignored
                .lock()
                .map_err(|_| FilterFault::CachePoisoned {
                    filter: "keyword",
                })?
                .insert(test.url.clone());
        }
        Ok(accepted)
    }
}
