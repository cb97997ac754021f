// crates/requires-logic/tests/proptest_expr.rs
// ============================================================================
// Module: Expression Property-Based Tests
// Description: Algebraic properties of the evaluator.
// Purpose: Detect panics and law violations across wide input ranges.
// ============================================================================

//! Property-based tests for expression evaluation.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use requires_logic::Context;
use requires_logic::parse_expr;

fn eval(text: &str, ctx: &Context) -> bool {
    parse_expr(text).unwrap().evaluate(ctx).unwrap()
}

proptest! {
    #[test]
    fn integer_ordering_matches_native(a in any::<i32>(), b in any::<i32>()) {
        let mut ctx = Context::new();
        ctx.set("x", a.to_string());
        ctx.set("y", b.to_string());
        prop_assert_eq!(eval("x < y", &ctx), a < b);
        prop_assert_eq!(eval("x >= y", &ctx), a >= b);
        prop_assert_eq!(eval("x == y", &ctx), a == b);
    }

    #[test]
    fn de_morgan_holds(a in any::<bool>(), b in any::<bool>()) {
        let mut ctx = Context::new();
        ctx.set("a", a.to_string());
        ctx.set("b", b.to_string());
        prop_assert_eq!(eval("!(a & b)", &ctx), eval("!a | !b", &ctx));
        prop_assert_eq!(eval("!(a | b)", &ctx), eval("!a & !b", &ctx));
    }

    #[test]
    fn arbitrary_text_never_panics(text in ".{0,64}") {
        if let Ok(expr) = parse_expr(&text) {
            let _ = expr.evaluate(&Context::new());
        }
    }
}
