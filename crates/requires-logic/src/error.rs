// crates/requires-logic/src/error.rs
// ============================================================================
// Module: Requirement Expression Errors
// Description: Structured diagnostics for expression parsing and evaluation.
// Purpose: Separate syntax failures from faults raised while evaluating.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`ExprError`] covers everything detectable from the expression text alone,
//! including names the suite does not declare. [`EvalFault`] covers failures
//! that only surface once a concrete [`crate::Context`] is supplied.

use thiserror::Error;

// ============================================================================
// SECTION: Parse Errors
// ============================================================================

/// Errors raised while parsing or validating an expression.
///
/// # Invariants
/// - `position` values are byte offsets into the original input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// Input was empty or contained only whitespace.
    #[error("expression is empty")]
    EmptyInput,
    /// Input exceeded the configured size limit.
    #[error("expression exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    InputTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual input length in bytes.
        actual_bytes: usize,
    },
    /// Input exceeded the configured nesting depth.
    #[error("expression nesting exceeds limit: depth {actual_depth} (max {max_depth}) at {position}")]
    NestingTooDeep {
        /// Maximum allowed nesting depth.
        max_depth: usize,
        /// Actual nesting depth when the error occurred.
        actual_depth: usize,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Unexpected token encountered during parsing.
    #[error("unexpected token `{found}` at {position}, expected {expected}")]
    UnexpectedToken {
        /// Human-friendly expectation summary.
        expected: &'static str,
        /// The token that was actually seen.
        found: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// String literal was not terminated.
    #[error("unterminated string literal at {position}")]
    UnterminatedString {
        /// Byte offset of the opening quote.
        position: usize,
    },
    /// Numeric literal failed to parse.
    #[error("invalid number `{raw}` at {position}")]
    InvalidNumber {
        /// The raw numeric text.
        raw: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Unexpected trailing input after a complete expression.
    #[error("unexpected trailing input at {position}")]
    TrailingInput {
        /// Byte offset where unexpected input begins.
        position: usize,
    },
    /// Expression referenced a property the suite does not declare.
    #[error("invalid name: {name}")]
    UnknownName {
        /// The unrecognized property name.
        name: String,
    },
}

// ============================================================================
// SECTION: Evaluation Faults
// ============================================================================

/// Faults raised while evaluating an expression against a context.
///
/// # Invariants
/// - Faults are deterministic functions of the expression and the context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalFault {
    /// A referenced property was recorded as failing when the context was built.
    #[error("error evaluating property {name}: {reason}")]
    Property {
        /// Property name.
        name: String,
        /// Recorded failure reason.
        reason: String,
    },
    /// An ordering or arithmetic operator received a non-numeric operand.
    #[error("invalid numeric value for `{operator}`: {value}")]
    NotNumeric {
        /// Operator symbol.
        operator: &'static str,
        /// Offending operand rendered as text.
        value: String,
    },
    /// Division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// Expression text failed to parse at selection time.
    #[error("syntax error: {0}")]
    Syntax(#[from] ExprError),
}
