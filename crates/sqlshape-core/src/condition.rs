// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Condition trees.
//!
//! A [`ConditionNode`] is either a single [`Comparison`] or a group of
//! children joined by one [`Combinator`]. Trees come out of the
//! [parser](crate::parser) or are assembled by hand; either way they are
//! built fresh for every call and never cached. Only their
//! [shape](ConditionNode::shape) takes part in statement cache keys.
//!
//! # Example
//!
//! ```rust
//! use sqlshape_core::{Comparison, ConditionNode, Operator};
//!
//! let tree = ConditionNode::and(vec![
//!     ConditionNode::or(vec![
//!         Comparison::new("A", Operator::Equal, 1).into(),
//!         Comparison::new("B", Operator::Equal, 2).into(),
//!     ]),
//!     Comparison::new("C", Operator::Equal, 3).into(),
//! ]);
//! assert_eq!(tree.values().len(), 3);
//! ```

use crate::{
    error::{Error, Result},
    value::{DbType, Value}
};

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    /// `=`
    Equal,
    /// `<>`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `BETWEEN`
    Between,
    /// `NOT BETWEEN`
    NotBetween,
    /// `IN`
    In,
    /// `NOT IN`
    NotIn,
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    IsNotNull
}

impl Operator {
    /// SQL keyword.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL"
        }
    }

    /// Logical negation.
    #[must_use]
    pub const fn negate(&self) -> Self {
        match self {
            Self::Equal => Self::NotEqual,
            Self::NotEqual => Self::Equal,
            Self::LessThan => Self::GreaterThanOrEqual,
            Self::LessThanOrEqual => Self::GreaterThan,
            Self::GreaterThan => Self::LessThanOrEqual,
            Self::GreaterThanOrEqual => Self::LessThan,
            Self::Like => Self::NotLike,
            Self::NotLike => Self::Like,
            Self::Between => Self::NotBetween,
            Self::NotBetween => Self::Between,
            Self::In => Self::NotIn,
            Self::NotIn => Self::In,
            Self::IsNull => Self::IsNotNull,
            Self::IsNotNull => Self::IsNull
        }
    }

    /// Operator with its operands swapped, `a < b` becoming `b > a`.
    #[must_use]
    pub const fn mirror(&self) -> Self {
        match self {
            Self::LessThan => Self::GreaterThan,
            Self::LessThanOrEqual => Self::GreaterThanOrEqual,
            Self::GreaterThan => Self::LessThan,
            Self::GreaterThanOrEqual => Self::LessThanOrEqual,
            other => *other
        }
    }

    /// Check if the operator takes a two-element list.
    #[must_use]
    pub const fn is_range(&self) -> bool {
        matches!(self, Self::Between | Self::NotBetween)
    }

    /// Check if the operator takes a list of any length.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// Check if the operator takes no value.
    #[must_use]
    pub const fn is_null_check(&self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }

    /// Check if the operator orders its operands.
    #[must_use]
    pub const fn is_relational(&self) -> bool {
        matches!(
            self,
            Self::LessThan | Self::LessThanOrEqual | Self::GreaterThan | Self::GreaterThanOrEqual
        )
    }
}

/// Logical connective of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Combinator {
    /// `AND`
    And,
    /// `OR`
    Or
}

impl Combinator {
    /// SQL keyword.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR"
        }
    }

    /// The other connective.
    #[must_use]
    pub const fn flip(&self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And
        }
    }
}

/// A single field comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Property or column name.
    pub field: String,

    /// Operator.
    pub operator: Operator,

    /// Compared value. A [`Value::List`] for range and list operators.
    pub value: Value,

    /// Explicit database type of the parameter.
    pub db_type: Option<DbType>,

    /// SQL function template applied to the column, with `{0}` standing
    /// for the quoted column, e.g. `LEN({0})`.
    pub function: Option<String>
}

impl Comparison {
    /// Compare a field against a value.
    ///
    /// `= NULL` and `<> NULL` are rewritten to `IS NULL` and `IS NOT NULL`.
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        let value = value.into();
        let operator = match (operator, value.is_null()) {
            (Operator::Equal, true) => Operator::IsNull,
            (Operator::NotEqual, true) => Operator::IsNotNull,
            (operator, _) => operator
        };
        Self {
            field: field.into(),
            operator,
            value,
            db_type: None,
            function: None
        }
    }

    /// Compare the result of a SQL function over the column instead of the
    /// column itself.
    ///
    /// ```rust
    /// use sqlshape_core::{Comparison, Operator};
    ///
    /// let c = Comparison::new("name", Operator::GreaterThan, 3).with_function("LEN({0})");
    /// assert!(c.validate().is_ok());
    /// ```
    #[must_use]
    pub fn with_function(mut self, template: impl Into<String>) -> Self {
        self.function = Some(template.into());
        self
    }

    /// Attach an explicit database type.
    #[must_use]
    pub fn with_db_type(mut self, db_type: DbType) -> Self {
        self.db_type = Some(db_type);
        self
    }

    /// Number of placeholders the comparison renders.
    #[must_use]
    pub fn arity(&self) -> usize {
        if self.operator.is_null_check() {
            0
        } else if self.operator.is_list() || self.operator.is_range() {
            self.value.as_list().map_or(1, <[Value]>::len)
        } else {
            1
        }
    }

    /// Check the comparison's structural invariants.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConditionShape`] when a range does not have exactly
    /// two bounds, a list operator lacks a list, a relational operator
    /// compares against null or a function template has no `{0}`.
    pub fn validate(&self) -> Result<()> {
        if let Some(template) = self.function.as_deref().filter(|t| !t.contains("{0}")) {
            return Err(Error::invalid_shape(
                &self.field,
                format!("function template `{template}` has no `{{0}}` column slot")
            ));
        }
        let op = self.operator;
        if op.is_range() {
            match self.value.as_list() {
                Some(bounds) if bounds.len() == 2 => {}
                Some(bounds) => {
                    return Err(Error::invalid_shape(
                        &self.field,
                        format!("{} needs exactly 2 bounds, got {}", op.as_sql(), bounds.len())
                    ));
                }
                None => {
                    return Err(Error::invalid_shape(
                        &self.field,
                        format!("{} needs a list of 2 bounds", op.as_sql())
                    ));
                }
            }
        }
        if op.is_list() && self.value.as_list().is_none() {
            return Err(Error::invalid_shape(
                &self.field,
                format!("{} needs a list of values", op.as_sql())
            ));
        }
        if !op.is_null_check() && !op.is_list() && !op.is_range() && self.value.is_null() {
            return Err(Error::invalid_shape(
                &self.field,
                format!("{} cannot compare against null", op.as_sql())
            ));
        }
        Ok(())
    }

    fn push_values(&self, out: &mut Vec<Value>) {
        if self.operator.is_null_check() {
            return;
        }
        match (&self.value, self.operator.is_list() || self.operator.is_range()) {
            (Value::List(items), true) => out.extend(items.iter().cloned()),
            (value, _) => out.push(value.clone())
        }
    }
}

/// Condition tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode {
    /// Leaf comparison.
    Comparison(Comparison),

    /// Children joined by one connective, in source order.
    Group {
        /// Connective.
        combinator: Combinator,
        /// Children.
        children:   Vec<ConditionNode>
    }
}

impl ConditionNode {
    /// Children joined by `AND`.
    #[must_use]
    pub const fn and(children: Vec<Self>) -> Self {
        Self::Group {
            combinator: Combinator::And,
            children
        }
    }

    /// Children joined by `OR`.
    #[must_use]
    pub const fn or(children: Vec<Self>) -> Self {
        Self::Group {
            combinator: Combinator::Or,
            children
        }
    }

    /// `AND` group from a flat list of comparisons.
    pub fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = Comparison>
    {
        Self::and(fields.into_iter().map(Self::Comparison).collect())
    }

    /// Check if the node renders nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Comparison(_) => false,
            Self::Group {
                children, ..
            } => children.iter().all(Self::is_empty)
        }
    }

    /// Validate every comparison in the tree.
    ///
    /// # Errors
    ///
    /// The first [`Comparison::validate`] failure in traversal order.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Comparison(c) => c.validate(),
            Self::Group {
                children, ..
            } => children.iter().try_for_each(Self::validate)
        }
    }

    /// Comparisons in traversal order.
    #[must_use]
    pub fn comparisons(&self) -> Vec<&Comparison> {
        let mut out = Vec::new();
        self.collect_comparisons(&mut out);
        out
    }

    fn collect_comparisons<'a>(&'a self, out: &mut Vec<&'a Comparison>) {
        match self {
            Self::Comparison(c) => out.push(c),
            Self::Group {
                children, ..
            } => children.iter().for_each(|c| c.collect_comparisons(out))
        }
    }

    /// Parameter values in placeholder order.
    ///
    /// List and range operators contribute one value per element; null
    /// checks contribute none.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        let mut out = Vec::new();
        for comparison in self.comparisons() {
            comparison.push_values(&mut out);
        }
        out
    }

    /// Value-free structure of the tree, used in statement cache keys.
    #[must_use]
    pub fn shape(&self) -> ConditionShape {
        match self {
            Self::Comparison(c) => ConditionShape::Comparison {
                field:    c.field.clone(),
                operator: c.operator,
                arity:    c.arity(),
                db_type:  c.db_type,
                function: c.function.clone()
            },
            Self::Group {
                combinator,
                children
            } => ConditionShape::Group {
                combinator: *combinator,
                children:   children.iter().map(Self::shape).collect()
            }
        }
    }
}

impl From<Comparison> for ConditionNode {
    fn from(comparison: Comparison) -> Self {
        Self::Comparison(comparison)
    }
}

/// Hashable structure of a [`ConditionNode`] without its values.
///
/// Two trees with the same shape render identical SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConditionShape {
    /// Leaf.
    Comparison {
        /// Field name.
        field:    String,
        /// Operator.
        operator: Operator,
        /// Number of placeholders.
        arity:    usize,
        /// Explicit database type.
        db_type:  Option<DbType>,
        /// Function template around the column.
        function: Option<String>
    },
    /// Group.
    Group {
        /// Connective.
        combinator: Combinator,
        /// Children shapes.
        children:   Vec<ConditionShape>
    }
}
