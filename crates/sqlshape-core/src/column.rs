// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Typed column handles.
//!
//! `#[derive(Entity)]` emits one [`Column`] per mapped field inside a
//! generated `{Entity}Columns` struct. The handle carries the entity and the
//! field type, so `Person::COLUMNS.age.eq("x")` does not compile when `age`
//! is an `Option<i32>`.
//!
//! # Example
//!
//! ```rust
//! use sqlshape_core::{Column, Expr};
//!
//! struct Person;
//!
//! const NAME: Column<Person, String> = Column::new("name");
//! const AGE: Column<Person, Option<i32>> = Column::new("age");
//!
//! let predicate: Expr = AGE.is_null() | NAME.eq("Bob");
//! assert_eq!(predicate.to_string(), "((age == null) || (name == \"Bob\"))");
//! ```

use std::{fmt, marker::PhantomData};

use crate::{
    SortDirection,
    expression::{BinaryOp, Expr},
    statement::OrderField,
    value::Value
};

/// Handle to field `T` of entity `E`.
pub struct Column<E, T> {
    property: &'static str,
    _marker:  PhantomData<fn() -> (E, T)>
}

impl<E, T> Column<E, T> {
    /// Handle for the property with the given name.
    #[must_use]
    pub const fn new(property: &'static str) -> Self {
        Self {
            property,
            _marker: PhantomData
        }
    }

    /// Property name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.property
    }

    /// Member expression for this field.
    #[must_use]
    pub fn expr(&self) -> Expr {
        Expr::member(self.property)
    }

    /// `IS NULL`
    #[must_use]
    pub fn is_null(self) -> Expr {
        self.compare(BinaryOp::Eq, Value::Null)
    }

    /// `IS NOT NULL`
    #[must_use]
    pub fn is_not_null(self) -> Expr {
        self.compare(BinaryOp::Ne, Value::Null)
    }

    /// `LIKE '%text%'`
    #[must_use]
    pub fn contains(self, text: impl Into<String>) -> Expr {
        self.text_call("contains", text.into())
    }

    /// `LIKE 'text%'`
    #[must_use]
    pub fn starts_with(self, text: impl Into<String>) -> Expr {
        self.text_call("starts_with", text.into())
    }

    /// `LIKE '%text'`
    #[must_use]
    pub fn ends_with(self, text: impl Into<String>) -> Expr {
        self.text_call("ends_with", text.into())
    }

    /// Ascending sort on this field.
    #[must_use]
    pub fn asc(self) -> OrderField {
        OrderField::new(self.property, SortDirection::Asc)
    }

    /// Descending sort on this field.
    #[must_use]
    pub fn desc(self) -> OrderField {
        OrderField::new(self.property, SortDirection::Desc)
    }

    fn compare(self, op: BinaryOp, value: Value) -> Expr {
        Expr::binary(op, self.expr(), Expr::Constant(value))
    }

    fn text_call(self, method: &str, text: String) -> Expr {
        Expr::call(self.expr(), method, vec![Expr::constant(text)])
    }
}

impl<E, T: Into<Value>> Column<E, T> {
    /// `= value`
    #[must_use]
    pub fn eq(self, value: impl Into<T>) -> Expr {
        self.compare(BinaryOp::Eq, value.into().into())
    }

    /// `<> value`
    #[must_use]
    pub fn ne(self, value: impl Into<T>) -> Expr {
        self.compare(BinaryOp::Ne, value.into().into())
    }

    /// `< value`
    #[must_use]
    pub fn lt(self, value: impl Into<T>) -> Expr {
        self.compare(BinaryOp::Lt, value.into().into())
    }

    /// `<= value`
    #[must_use]
    pub fn le(self, value: impl Into<T>) -> Expr {
        self.compare(BinaryOp::Le, value.into().into())
    }

    /// `> value`
    #[must_use]
    pub fn gt(self, value: impl Into<T>) -> Expr {
        self.compare(BinaryOp::Gt, value.into().into())
    }

    /// `>= value`
    #[must_use]
    pub fn ge(self, value: impl Into<T>) -> Expr {
        self.compare(BinaryOp::Ge, value.into().into())
    }

    /// `= value`, with the value read when the predicate is parsed.
    #[must_use]
    pub fn eq_with<F>(self, value: F) -> Expr
    where
        F: Fn() -> T + Send + Sync + 'static
    {
        Expr::binary(BinaryOp::Eq, self.expr(), Expr::capture(self.property, value))
    }

    /// `IN (...)`. An empty list matches nothing.
    #[must_use]
    pub fn in_<I, V>(self, values: I) -> Expr
    where
        I: IntoIterator<Item = V>,
        V: Into<T>
    {
        let list = Value::List(values.into_iter().map(|v| v.into().into()).collect());
        Expr::call(Expr::Constant(list), "contains", vec![self.expr()])
    }

    /// `NOT IN (...)`. An empty list matches everything.
    #[must_use]
    pub fn not_in<I, V>(self, values: I) -> Expr
    where
        I: IntoIterator<Item = V>,
        V: Into<T>
    {
        self.in_(values).not()
    }

    /// `BETWEEN low AND high`
    #[must_use]
    pub fn between(self, low: impl Into<T>, high: impl Into<T>) -> Expr {
        let bounds = vec![
            Expr::Constant(low.into().into()),
            Expr::Constant(high.into().into()),
        ];
        Expr::call(self.expr(), "between", bounds)
    }
}

impl<E> Column<E, bool> {
    /// `= true`
    #[must_use]
    pub fn is_true(self) -> Expr {
        self.expr()
    }

    /// `<> true`
    #[must_use]
    pub fn is_false(self) -> Expr {
        self.expr().not()
    }
}

impl<E, T> From<Column<E, T>> for Expr {
    fn from(column: Column<E, T>) -> Self {
        column.expr()
    }
}

impl<E, T> Clone for Column<E, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, T> Copy for Column<E, T> {}

impl<E, T> fmt::Debug for Column<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Column").field(&self.property).finish()
    }
}
