// crates/requires-logic/src/cache.rs
// ============================================================================
// Module: Expression Cache
// Description: Parsed expressions keyed by their source text.
// Purpose: Parse each distinct `@requires` string once per run.
// Dependencies: std, crate::{error, expr, parser}
// ============================================================================

//! ## Overview
//! Many tests share identical requirement text. [`ExprCache`] parses each
//! distinct string once and hands out shared trees. The cache is an explicit
//! object owned by one run configuration; parse failures are not cached.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::error::ExprError;
use crate::expr::Expr;
use crate::parser::parse_expr;

/// Thread-safe cache of parsed expressions.
#[derive(Debug, Default)]
pub struct ExprCache {
    /// Parsed trees keyed by source text.
    entries: Mutex<HashMap<String, Arc<Expr>>>,
}

impl ExprCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the parsed tree for `text`, parsing it on first use.
    ///
    /// # Errors
    /// Returns [`ExprError`] when the text does not parse.
    pub fn get_or_parse(&self, text: &str) -> Result<Arc<Expr>, ExprError> {
        if let Some(expr) = self.lock().get(text) {
            return Ok(Arc::clone(expr));
        }
        let expr = Arc::new(parse_expr(text)?);
        let mut entries = self.lock();
        let cached = entries.entry(text.to_string()).or_insert(expr);
        Ok(Arc::clone(cached))
    }

    /// Returns the number of cached expressions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true when nothing has been cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Locks the map; a poisoned lock still holds consistent entries.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<Expr>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
