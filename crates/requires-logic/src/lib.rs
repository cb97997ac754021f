// crates/requires-logic/src/lib.rs
// ============================================================================
// Module: Requires Logic Root
// Description: Public API surface for requirement expressions.
// Purpose: Wire together the parser, expression tree, context, and caches.
// Dependencies: crate::{cache, context, error, expr, names, number, parser, platform}
// ============================================================================

//! ## Overview
//! Requirement expressions gate test eligibility on platform and JDK facts.
//! An expression is parsed once, checked against the names a suite declares
//! ([`Expr::validate_names`]), and later evaluated against a full [`Context`]
//! ([`Expr::evaluate`]). Name checks need no target runtime, so they run
//! while the suite is scanned.
//!
//! ```
//! use requires_logic::Context;
//! use requires_logic::parse_expr;
//!
//! let expr = parse_expr(r#"os.family == "linux" & vm.gc == "G1""#).unwrap();
//! let mut ctx = Context::new();
//! ctx.set("os.family", "linux");
//! ctx.set("vm.gc", "G1");
//! assert!(expr.evaluate(&ctx).unwrap());
//! ```

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod cache;
pub mod context;
pub mod error;
pub mod expr;
pub mod names;
pub mod number;
pub mod parser;
pub mod platform;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cache::ExprCache;
pub use context::Context;
pub use context::ContextValue;
pub use error::EvalFault;
pub use error::ExprError;
pub use expr::BinaryOp;
pub use expr::Expr;
pub use names::KnownNames;
pub use names::PropertyNames;
pub use parser::parse_expr;
pub use platform::ContextBuilder;
pub use platform::OsFacts;
pub use platform::apply_vm_options;
