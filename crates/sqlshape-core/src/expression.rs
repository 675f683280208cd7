// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Predicate expression trees.
//!
//! [`Expr`] is the input of the [parser](crate::parser). Typed column
//! handles ([`Column`](crate::Column)) build well-formed trees; the
//! constructors here build arbitrary ones, including shapes the parser
//! rejects.
//!
//! # Example
//!
//! ```rust
//! use sqlshape_core::Expr;
//!
//! let adult = Expr::member("age").ge(18);
//! let named = Expr::member("name").eq("Bob");
//! let predicate = adult & !named;
//! assert_eq!(predicate.to_string(), "((age >= 18) && !((name == \"Bob\")))");
//! ```

use std::{fmt, ops, sync::Arc};

use crate::value::Value;

/// Binary operator of an [`Expr::Binary`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div
}

impl BinaryOp {
    /// Check if this is a comparison.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(self, Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }

    /// Check if this is `&&` or `||`.
    #[must_use]
    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Check if this is arithmetic.
    #[must_use]
    pub const fn is_arithmetic(&self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div)
    }

    /// Source symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/"
        }
    }
}

/// A value evaluated when the predicate is parsed rather than when it is
/// built.
#[derive(Clone)]
pub struct Capture {
    label: String,
    eval:  Arc<dyn Fn() -> Value + Send + Sync>
}

impl Capture {
    /// Wrap a closure under a label used in error messages.
    pub fn new<F>(label: impl Into<String>, eval: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static
    {
        Self {
            label: label.into(),
            eval:  Arc::new(eval)
        }
    }

    /// Evaluate the captured value.
    #[must_use]
    pub fn evaluate(&self) -> Value {
        (self.eval)()
    }

    /// Label given at construction.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capture").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Predicate expression tree.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Entity property, by property name.
    Member(String),

    /// Literal value.
    Constant(Value),

    /// Value evaluated at parse time.
    Capture(Capture),

    /// Binary operation.
    Binary {
        /// Operator.
        op:    BinaryOp,
        /// Left operand.
        left:  Box<Expr>,
        /// Right operand.
        right: Box<Expr>
    },

    /// Logical negation.
    Not(Box<Expr>),

    /// Method call on a target.
    Call {
        /// Receiver.
        target: Box<Expr>,
        /// Method name.
        method: String,
        /// Arguments.
        args:   Vec<Expr>
    }
}

impl Expr {
    /// Reference an entity property.
    pub fn member(name: impl Into<String>) -> Self {
        Self::Member(name.into())
    }

    /// Literal value.
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    /// Value read from `eval` when the predicate is parsed.
    pub fn capture<F, T>(label: impl Into<String>, eval: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Into<Value>
    {
        Self::Capture(Capture::new(label, move || eval().into()))
    }

    /// Binary node.
    #[must_use]
    pub fn binary(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right)
        }
    }

    /// Method call node.
    #[must_use]
    pub fn call(target: Self, method: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Call {
            target: Box::new(target),
            method: method.into(),
            args
        }
    }

    /// `self == value`
    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> Self {
        Self::binary(BinaryOp::Eq, self, Self::constant(value))
    }

    /// `self != value`
    #[must_use]
    pub fn ne(self, value: impl Into<Value>) -> Self {
        Self::binary(BinaryOp::Ne, self, Self::constant(value))
    }

    /// `self < value`
    #[must_use]
    pub fn lt(self, value: impl Into<Value>) -> Self {
        Self::binary(BinaryOp::Lt, self, Self::constant(value))
    }

    /// `self <= value`
    #[must_use]
    pub fn le(self, value: impl Into<Value>) -> Self {
        Self::binary(BinaryOp::Le, self, Self::constant(value))
    }

    /// `self > value`
    #[must_use]
    pub fn gt(self, value: impl Into<Value>) -> Self {
        Self::binary(BinaryOp::Gt, self, Self::constant(value))
    }

    /// `self >= value`
    #[must_use]
    pub fn ge(self, value: impl Into<Value>) -> Self {
        Self::binary(BinaryOp::Ge, self, Self::constant(value))
    }

    /// `self && other`
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::binary(BinaryOp::And, self, other)
    }

    /// `self || other`
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::binary(BinaryOp::Or, self, other)
    }

    /// `!self`
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }
}

impl ops::BitAnd for Expr {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.and(rhs)
    }
}

impl ops::BitOr for Expr {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.or(rhs)
    }
}

impl ops::Not for Expr {
    type Output = Self;

    fn not(self) -> Self {
        Self::Not(Box::new(self))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member(name) => f.write_str(name),
            Self::Constant(value) => write!(f, "{value}"),
            Self::Capture(capture) => write!(f, "{{{}}}", capture.label),
            Self::Binary {
                op,
                left,
                right
            } => write!(f, "({left} {} {right})", op.symbol()),
            Self::Not(inner) => write!(f, "!({inner})"),
            Self::Call {
                target,
                method,
                args
            } => {
                write!(f, "{target}.{method}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}
