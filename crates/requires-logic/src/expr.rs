// crates/requires-logic/src/expr.rs
// ============================================================================
// Module: Expression Tree
// Description: Parsed requirement expressions and their evaluation.
// Purpose: Validate referenced names and evaluate against a context.
// Dependencies: bigdecimal, crate::{context, error, names, number}
// ============================================================================

//! ## Overview
//! [`Expr`] is the parsed form of a requirement expression. It supports two
//! independent operations:
//! - [`Expr::validate_names`] checks every referenced property against a
//!   names-only set. No values are consulted.
//! - [`Expr::evaluate`] resolves names against a [`Context`] and reduces the
//!   tree to a boolean.
//!
//! Values are untyped text until an operator needs otherwise. Equality
//! compares numerically when both sides are numeric and textually otherwise.
//! Ordering and arithmetic require numeric operands.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use bigdecimal::BigDecimal;

use crate::context::Context;
use crate::context::ContextValue;
use crate::context::NULL_VALUE;
use crate::error::EvalFault;
use crate::error::ExprError;
use crate::names::PropertyNames;
use crate::number::parse_number;

// ============================================================================
// SECTION: Tree
// ============================================================================

/// Binary operators in the expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Logical AND (`&`).
    And,
    /// Logical OR (`|`).
    Or,
    /// Equality (`==`).
    Eq,
    /// Inequality (`!=`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Integer division (`/`).
    Div,
    /// Remainder (`%`).
    Rem,
}

impl BinaryOp {
    /// Returns the operator's source symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::And => "&",
            Self::Or => "|",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
        }
    }
}

/// Parsed requirement expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Property reference such as `os.family`.
    Name(String),
    /// Quoted string literal.
    Text(String),
    /// Numeric literal, suffix already applied.
    Number(BigDecimal),
    /// `true` or `false` keyword.
    Bool(bool),
    /// Logical negation.
    Not(Box<Self>),
    /// Arithmetic negation.
    Neg(Box<Self>),
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Self>,
        /// Right operand.
        rhs: Box<Self>,
    },
}

impl Expr {
    /// Builds a binary node.
    #[must_use]
    pub fn binary(op: BinaryOp, lhs: Self, rhs: Self) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Collects every property name the expression references.
    #[must_use]
    pub fn referenced_names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_names(&mut names);
        names
    }

    /// Recursively gathers referenced names.
    fn collect_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Self::Name(name) => {
                names.insert(name.as_str());
            }
            Self::Text(_) | Self::Number(_) | Self::Bool(_) => {}
            Self::Not(inner) | Self::Neg(inner) => inner.collect_names(names),
            Self::Binary {
                lhs,
                rhs,
                ..
            } => {
                lhs.collect_names(names);
                rhs.collect_names(names);
            }
        }
    }

    /// Checks that every referenced name is known, without resolving values.
    ///
    /// # Errors
    /// Returns [`ExprError::UnknownName`] for the first unknown name in
    /// name order.
    pub fn validate_names<N>(&self, known: &N) -> Result<(), ExprError>
    where
        N: PropertyNames + ?Sized,
    {
        match self.referenced_names().into_iter().find(|name| !known.is_known(name)) {
            Some(name) => Err(ExprError::UnknownName {
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Evaluates the expression to a boolean.
    ///
    /// # Errors
    /// Returns [`EvalFault`] when a referenced property is marked erroring or
    /// an operator receives operands it cannot handle.
    pub fn evaluate(&self, ctx: &Context) -> Result<bool, EvalFault> {
        Ok(self.eval(ctx)?.truthy())
    }

    /// Reduces the expression to a value.
    fn eval(&self, ctx: &Context) -> Result<Value, EvalFault> {
        match self {
            Self::Name(name) => match ctx.get(name) {
                Some(ContextValue::Value(value)) => Ok(Value::Text(value.clone())),
                Some(ContextValue::Error(reason)) => Err(EvalFault::Property {
                    name: name.clone(),
                    reason: reason.clone(),
                }),
                None => Ok(Value::Text(NULL_VALUE.to_string())),
            },
            Self::Text(text) => Ok(Value::Text(text.clone())),
            Self::Number(number) => Ok(Value::Number(number.clone())),
            Self::Bool(flag) => Ok(Value::Bool(*flag)),
            Self::Not(inner) => Ok(Value::Bool(!inner.eval(ctx)?.truthy())),
            Self::Neg(inner) => {
                let value = inner.eval(ctx)?.numeric("-")?;
                Ok(Value::Number(-value))
            }
            Self::Binary {
                op,
                lhs,
                rhs,
            } => eval_binary(*op, lhs, rhs, ctx),
        }
    }
}

/// Evaluates a binary node, short-circuiting the logical operators.
fn eval_binary(op: BinaryOp, lhs: &Expr, rhs: &Expr, ctx: &Context) -> Result<Value, EvalFault> {
    match op {
        BinaryOp::And => {
            if !lhs.eval(ctx)?.truthy() {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(rhs.eval(ctx)?.truthy()))
        }
        BinaryOp::Or => {
            if lhs.eval(ctx)?.truthy() {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(rhs.eval(ctx)?.truthy()))
        }
        BinaryOp::Eq => Ok(Value::Bool(lhs.eval(ctx)?.loosely_equals(&rhs.eval(ctx)?))),
        BinaryOp::Ne => Ok(Value::Bool(!lhs.eval(ctx)?.loosely_equals(&rhs.eval(ctx)?))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let left = lhs.eval(ctx)?.numeric(op.symbol())?;
            let right = rhs.eval(ctx)?.numeric(op.symbol())?;
            let ordering = left.cmp(&right);
            let result = match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Le => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Ok(Value::Bool(result))
        }
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            let left = lhs.eval(ctx)?.numeric(op.symbol())?;
            let right = rhs.eval(ctx)?.numeric(op.symbol())?;
            arithmetic(op, &left, &right).map(Value::Number)
        }
    }
}

/// Applies an arithmetic operator; division truncates toward zero.
fn arithmetic(op: BinaryOp, left: &BigDecimal, right: &BigDecimal) -> Result<BigDecimal, EvalFault> {
    let zero = BigDecimal::from(0);
    match op {
        BinaryOp::Add => Ok(left + right),
        BinaryOp::Sub => Ok(left - right),
        BinaryOp::Mul => Ok(left * right),
        BinaryOp::Div | BinaryOp::Rem if *right == zero => Err(EvalFault::DivisionByZero),
        BinaryOp::Div => Ok((left / right).with_scale(0)),
        _ => Ok(left % right),
    }
}

// ============================================================================
// SECTION: Values
// ============================================================================

/// Intermediate evaluation result.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    /// Result of a logical or comparison operator.
    Bool(bool),
    /// Property value or string literal.
    Text(String),
    /// Numeric literal or arithmetic result.
    Number(BigDecimal),
}

impl Value {
    /// Truthiness: `true` is true; `false`, `null`, and empty text are false;
    /// any other text is true; numbers are true when non-zero.
    fn truthy(&self) -> bool {
        match self {
            Self::Bool(flag) => *flag,
            Self::Text(text) => match text.trim() {
                "true" => true,
                "" | "false" | NULL_VALUE => false,
                _ => true,
            },
            Self::Number(number) => *number != BigDecimal::from(0),
        }
    }

    /// Returns the numeric interpretation, if any.
    fn as_number(&self) -> Option<BigDecimal> {
        match self {
            Self::Bool(_) => None,
            Self::Text(text) => parse_number(text),
            Self::Number(number) => Some(number.clone()),
        }
    }

    /// Requires a numeric interpretation for the given operator.
    fn numeric(&self, operator: &'static str) -> Result<BigDecimal, EvalFault> {
        self.as_number().ok_or_else(|| EvalFault::NotNumeric {
            operator,
            value: self.to_string(),
        })
    }

    /// Equality: numeric when both sides are numeric, textual otherwise.
    fn loosely_equals(&self, other: &Self) -> bool {
        if let (Some(left), Some(right)) = (self.as_number(), other.as_number()) {
            return left == right;
        }
        self.to_string() == other.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}
