// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Translation of predicate expressions into condition trees.
//!
//! The parser walks an [`Expr`] against an [`EntityShape`] and produces a
//! [`ConditionNode`]. Captured values are evaluated during the walk, so the
//! resulting tree holds concrete values only.
//!
//! # Translation Rules
//!
//! | Expression | Condition |
//! |------------|-----------|
//! | `m == v`, `m.equals(v)` | `m = v` (`IS NULL` when `v` is null) |
//! | `v < m` | `m > v` |
//! | `a && b && c` | one `AND` group of three |
//! | `a && (b && c)` | `AND` group holding a nested `AND` group |
//! | `!(a \|\| b)` | `!a AND !b` |
//! | `m` (boolean) | `m = true` |
//! | `m.contains(s)` | `m LIKE '%s%'` |
//! | `m.starts_with(s)` / `m.ends_with(s)` | `m LIKE 's%'` / `m LIKE '%s'` |
//! | `list.contains(m)` | `m IN (...)` |
//! | `m.between(lo, hi)` | `m BETWEEN lo AND hi` |
//!
//! Anything else fails with [`Error::UnsupportedExpression`] naming the
//! rejected sub-expression.

use tracing::trace;

use crate::{
    condition::{Combinator, Comparison, ConditionNode, Operator},
    entity::{EntityShape, FieldDescriptor},
    error::{Error, Result},
    expression::{BinaryOp, Expr},
    value::Value
};

/// Translate `expr` into a condition tree over `shape`.
///
/// # Errors
///
/// - [`Error::UnsupportedExpression`] for constructs without a SQL
///   translation: unknown members or methods, arithmetic on the member side,
///   member-to-member comparisons and relational comparisons against null.
/// - [`Error::InvalidConditionShape`] for a `between` without exactly two
///   bounds.
pub fn parse(expr: &Expr, shape: &EntityShape) -> Result<ConditionNode> {
    let node = Parser {
        shape
    }
    .node(expr, false)?;
    trace!(entity = shape.type_name(), predicate = %expr, "parsed predicate");
    Ok(node)
}

struct Parser<'s> {
    shape: &'s EntityShape
}

impl Parser<'_> {
    fn node(&self, expr: &Expr, negated: bool) -> Result<ConditionNode> {
        match expr {
            Expr::Binary {
                op,
                left,
                right
            } if op.is_logical() => self.group(*op, left, right, negated),
            Expr::Binary {
                op,
                left,
                right
            } if op.is_comparison() => self.comparison(expr, *op, left, right, negated),
            Expr::Binary {
                ..
            } => Err(Error::unsupported(expr, "arithmetic is not a predicate")),
            Expr::Not(inner) => self.node(inner, !negated),
            Expr::Member(name) => self.boolean_member(expr, name, negated),
            Expr::Call {
                target,
                method,
                args
            } => self.call(expr, target, method, args, negated),
            Expr::Constant(_) | Expr::Capture(_) => {
                Err(Error::unsupported(expr, "a value on its own is not a predicate"))
            }
        }
    }

    fn group(&self, op: BinaryOp, left: &Expr, right: &Expr, negated: bool) -> Result<ConditionNode> {
        let combinator = match (op, negated) {
            (BinaryOp::And, false) | (BinaryOp::Or, true) => Combinator::And,
            _ => Combinator::Or
        };

        let mut children = Vec::new();
        match self.node(left, negated)? {
            ConditionNode::Group {
                combinator: inner,
                children: nested
            } if inner == combinator => children.extend(nested),
            other => children.push(other)
        }
        children.push(self.node(right, negated)?);

        Ok(ConditionNode::Group {
            combinator,
            children
        })
    }

    fn comparison(
        &self,
        expr: &Expr,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        negated: bool
    ) -> Result<ConditionNode> {
        let operator = binary_operator(op);
        let (name, value_side, operator) = match (left, right) {
            (Expr::Member(_), Expr::Member(_)) => {
                return Err(Error::unsupported(expr, "member-to-member comparison"));
            }
            (Expr::Member(name), value) => (name, value, operator),
            (value, Expr::Member(name)) => (name, value, operator.mirror()),
            _ if has_member(left) || has_member(right) => {
                return Err(Error::unsupported(expr, "arithmetic on a member"));
            }
            _ => return Err(Error::unsupported(expr, "comparison does not reference a member"))
        };

        let field = self.field(expr, name)?;
        let value = evaluate(value_side)?;
        let operator = match (operator, value.is_null()) {
            (Operator::Equal, true) => Operator::IsNull,
            (Operator::NotEqual, true) => Operator::IsNotNull,
            (_, true) => {
                return Err(Error::unsupported(expr, "relational comparison against null"));
            }
            (operator, false) => operator
        };
        Ok(leaf(field, apply(operator, negated), value))
    }

    fn boolean_member(&self, expr: &Expr, name: &str, negated: bool) -> Result<ConditionNode> {
        let field = self.field(expr, name)?;
        if !matches!(field.type_name, "bool" | "Option<bool>") {
            return Err(Error::unsupported(expr, "non-boolean member used as a predicate"));
        }
        Ok(leaf(field, apply(Operator::Equal, negated), Value::Bool(true)))
    }

    fn call(
        &self,
        expr: &Expr,
        target: &Expr,
        method: &str,
        args: &[Expr],
        negated: bool
    ) -> Result<ConditionNode> {
        match (method, target) {
            ("contains" | "starts_with" | "ends_with", Expr::Member(name)) => {
                let field = self.field(expr, name)?;
                let text = match single(expr, args).and_then(evaluate)? {
                    Value::Text(text) => text,
                    _ => return Err(Error::unsupported(expr, "pattern argument must be text"))
                };
                let pattern = match method {
                    "contains" => format!("%{text}%"),
                    "starts_with" => format!("{text}%"),
                    _ => format!("%{text}")
                };
                Ok(leaf(field, apply(Operator::Like, negated), Value::Text(pattern)))
            }
            ("contains", list) => {
                let Expr::Member(name) = single(expr, args)? else {
                    return Err(Error::unsupported(expr, "list membership needs a member argument"));
                };
                let field = self.field(expr, name)?;
                match evaluate(list)? {
                    items @ Value::List(_) => Ok(leaf(field, apply(Operator::In, negated), items)),
                    _ => Err(Error::unsupported(expr, "contains target is not a list"))
                }
            }
            ("equals", _) => {
                let arg = single(expr, args)?;
                self.comparison(expr, BinaryOp::Eq, target, arg, negated)
            }
            ("between", Expr::Member(name)) => {
                let field = self.field(expr, name)?;
                if args.len() != 2 {
                    return Err(Error::invalid_shape(
                        field.property,
                        format!("between needs exactly 2 bounds, got {}", args.len())
                    ));
                }
                let bounds = args.iter().map(evaluate).collect::<Result<Vec<_>>>()?;
                if bounds.iter().any(Value::is_null) {
                    return Err(Error::invalid_shape(field.property, "between bound is null"));
                }
                Ok(leaf(field, apply(Operator::Between, negated), Value::List(bounds)))
            }
            _ => Err(Error::unsupported(expr, format!("unknown method `{method}`")))
        }
    }

    fn field(&self, expr: &Expr, name: &str) -> Result<&FieldDescriptor> {
        self.shape.find(name).ok_or_else(|| {
            Error::unsupported(
                expr,
                format!("unknown member `{name}` on `{}`", self.shape.type_name())
            )
        })
    }
}

fn leaf(field: &FieldDescriptor, operator: Operator, value: Value) -> ConditionNode {
    ConditionNode::Comparison(Comparison {
        field: field.property.to_string(),
        operator,
        value,
        db_type: field.db_type,
        function: None
    })
}

const fn apply(operator: Operator, negated: bool) -> Operator {
    if negated { operator.negate() } else { operator }
}

const fn binary_operator(op: BinaryOp) -> Operator {
    match op {
        BinaryOp::Ne => Operator::NotEqual,
        BinaryOp::Lt => Operator::LessThan,
        BinaryOp::Le => Operator::LessThanOrEqual,
        BinaryOp::Gt => Operator::GreaterThan,
        BinaryOp::Ge => Operator::GreaterThanOrEqual,
        _ => Operator::Equal
    }
}

fn single<'a>(expr: &Expr, args: &'a [Expr]) -> Result<&'a Expr> {
    match args {
        [arg] => Ok(arg),
        _ => Err(Error::unsupported(
            expr,
            format!("expected 1 argument, got {}", args.len())
        ))
    }
}

fn has_member(expr: &Expr) -> bool {
    match expr {
        Expr::Member(_) => true,
        Expr::Binary {
            left,
            right,
            ..
        } => has_member(left) || has_member(right),
        Expr::Not(inner) => has_member(inner),
        Expr::Call {
            target,
            args,
            ..
        } => has_member(target) || args.iter().any(has_member),
        Expr::Constant(_) | Expr::Capture(_) => false
    }
}

/// Reduce a value-side expression to a concrete value.
fn evaluate(expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Constant(value) => Ok(value.clone()),
        Expr::Capture(capture) => Ok(capture.evaluate()),
        Expr::Binary {
            op,
            left,
            right
        } if op.is_arithmetic() => {
            let (l, r) = (evaluate(left)?, evaluate(right)?);
            arithmetic(*op, &l, &r).ok_or_else(|| {
                Error::unsupported(expr, "arithmetic needs numeric operands of one kind")
            })
        }
        Expr::Member(_) => Err(Error::unsupported(expr, "member-to-member comparison")),
        _ => Err(Error::unsupported(expr, "cannot be reduced to a value"))
    }
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Option<Value> {
    match (left, right) {
        (Value::I32(a), Value::I32(b)) => int(op, i64::from(*a), i64::from(*b))
            .and_then(|v| i32::try_from(v).ok())
            .map(Value::I32),
        (Value::I64(a), Value::I64(b)) => int(op, *a, *b).map(Value::I64),
        (Value::I32(a), Value::I64(b)) => int(op, i64::from(*a), *b).map(Value::I64),
        (Value::I64(a), Value::I32(b)) => int(op, *a, i64::from(*b)).map(Value::I64),
        (Value::F64(a), Value::F64(b)) => Some(Value::F64(match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            _ => a / b
        })),
        _ => None
    }
}

fn int(op: BinaryOp, a: i64, b: i64) -> Option<i64> {
    match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        _ => a.checked_div(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entity::FieldDescriptor, error::Stage};

    struct Person;

    fn shape() -> EntityShape {
        EntityShape::new::<Person>("Person")
            .field(FieldDescriptor::new("id", "i64").column("Id").primary())
            .field(FieldDescriptor::new("name", "String").column("Name"))
            .field(FieldDescriptor::new("age", "Option<i32>").column("Age").nullable())
            .field(FieldDescriptor::new("active", "bool").column("Active"))
    }

    fn m(name: &str) -> Expr {
        Expr::member(name)
    }

    fn comparison(node: &ConditionNode) -> &Comparison {
        match node {
            ConditionNode::Comparison(c) => c,
            other => panic!("expected comparison, got {other:?}")
        }
    }

    fn group(node: &ConditionNode) -> (Combinator, &[ConditionNode]) {
        match node {
            ConditionNode::Group {
                combinator,
                children
            } => (*combinator, children),
            other => panic!("expected group, got {other:?}")
        }
    }

    #[test]
    fn null_equality_or_name() {
        let expr = m("age").eq(None::<i32>).or(m("name").eq("Bob"));
        let node = parse(&expr, &shape()).unwrap();
        let (combinator, children) = group(&node);
        assert_eq!(combinator, Combinator::Or);
        assert_eq!(comparison(&children[0]).operator, Operator::IsNull);
        let name = comparison(&children[1]);
        assert_eq!(name.field, "name");
        assert_eq!(name.value, Value::from("Bob"));
        assert_eq!(node.values(), vec![Value::from("Bob")]);
    }

    #[test]
    fn reversed_operands_are_mirrored() {
        let expr = Expr::binary(BinaryOp::Lt, Expr::constant(18), m("age"));
        let node = parse(&expr, &shape()).unwrap();
        assert_eq!(comparison(&node).operator, Operator::GreaterThan);
        assert_eq!(comparison(&node).value, Value::I32(18));
    }

    #[test]
    fn left_chains_flatten_and_right_nesting_is_kept() {
        let flat = m("id").eq(1).and(m("name").eq("a")).and(m("active"));
        let node = parse(&flat, &shape()).unwrap();
        assert_eq!(group(&node).1.len(), 3);

        let nested = m("id").eq(1).and(m("name").eq("a").and(m("active")));
        let node = parse(&nested, &shape()).unwrap();
        let (_, children) = group(&node);
        assert_eq!(children.len(), 2);
        assert_eq!(group(&children[1]).1.len(), 2);
    }

    #[test]
    fn mixed_connectives_keep_their_grouping() {
        let expr = m("id").eq(1).or(m("name").eq("a")).and(m("age").eq(3));
        let node = parse(&expr, &shape()).unwrap();
        let (outer, children) = group(&node);
        assert_eq!(outer, Combinator::And);
        assert_eq!(group(&children[0]).0, Combinator::Or);
    }

    #[test]
    fn negation_applies_de_morgan() {
        let expr = !(m("id").eq(1) | m("age").lt(5));
        let node = parse(&expr, &shape()).unwrap();
        let (combinator, children) = group(&node);
        assert_eq!(combinator, Combinator::And);
        assert_eq!(comparison(&children[0]).operator, Operator::NotEqual);
        assert_eq!(comparison(&children[1]).operator, Operator::GreaterThanOrEqual);

        let not_null = !m("age").eq(None::<i32>);
        let node = parse(&not_null, &shape()).unwrap();
        assert_eq!(comparison(&node).operator, Operator::IsNotNull);
    }

    #[test]
    fn bare_boolean_member() {
        let node = parse(&m("active"), &shape()).unwrap();
        assert_eq!(comparison(&node).operator, Operator::Equal);
        assert_eq!(comparison(&node).value, Value::Bool(true));

        let err = parse(&m("name"), &shape()).unwrap_err();
        assert_eq!(err.stage(), Stage::Parse);
    }

    #[test]
    fn string_methods_become_like() {
        let cases = [("contains", "%ob%"), ("starts_with", "ob%"), ("ends_with", "%ob")];
        for (method, pattern) in cases {
            let expr = Expr::call(m("name"), method, vec![Expr::constant("ob")]);
            let node = parse(&expr, &shape()).unwrap();
            assert_eq!(comparison(&node).operator, Operator::Like);
            assert_eq!(comparison(&node).value, Value::from(pattern));
        }
        let negated = !Expr::call(m("name"), "contains", vec![Expr::constant("x")]);
        let node = parse(&negated, &shape()).unwrap();
        assert_eq!(comparison(&node).operator, Operator::NotLike);
    }

    #[test]
    fn list_contains_member_is_in() {
        let expr = Expr::call(Expr::constant(Value::list([1, 2, 3])), "contains", vec![m("id")]);
        let node = parse(&expr, &shape()).unwrap();
        assert_eq!(comparison(&node).operator, Operator::In);
        assert_eq!(comparison(&node).arity(), 3);

        let empty = Expr::call(Expr::constant(Value::List(Vec::new())), "contains", vec![m("id")]);
        let node = parse(&empty, &shape()).unwrap();
        assert_eq!(comparison(&node).arity(), 0);
    }

    #[test]
    fn equals_behaves_like_eq() {
        let expr = Expr::call(m("name"), "equals", vec![Expr::constant("Bob")]);
        let node = parse(&expr, &shape()).unwrap();
        assert_eq!(comparison(&node).operator, Operator::Equal);
    }

    #[test]
    fn between_needs_two_bounds() {
        let ok = Expr::call(m("age"), "between", vec![Expr::constant(1), Expr::constant(9)]);
        let node = parse(&ok, &shape()).unwrap();
        assert_eq!(comparison(&node).operator, Operator::Between);
        assert_eq!(node.values(), vec![Value::I32(1), Value::I32(9)]);

        let bad = Expr::call(m("age"), "between", vec![Expr::constant(1)]);
        let err = parse(&bad, &shape()).unwrap_err();
        assert!(matches!(err, Error::InvalidConditionShape { .. }));
    }

    #[test]
    fn captures_are_evaluated_at_parse_time() {
        let limit = 21;
        let expr = m("age").ge(0).and(Expr::binary(
            BinaryOp::Lt,
            m("age"),
            Expr::capture("limit", move || limit)
        ));
        let node = parse(&expr, &shape()).unwrap();
        assert_eq!(node.values(), vec![Value::I32(0), Value::I32(21)]);
    }

    #[test]
    fn value_side_arithmetic_is_folded() {
        let sum = Expr::binary(BinaryOp::Add, Expr::constant(10), Expr::constant(5));
        let expr = Expr::binary(BinaryOp::Gt, m("age"), sum);
        let node = parse(&expr, &shape()).unwrap();
        assert_eq!(comparison(&node).value, Value::I32(15));
    }

    #[test]
    fn rejected_shapes_name_the_sub_expression() {
        let cases = [
            (m("nickname").eq("x"), "nickname"),
            (
                Expr::binary(
                    BinaryOp::Gt,
                    Expr::binary(BinaryOp::Add, m("age"), Expr::constant(1)),
                    Expr::constant(5)
                ),
                "(age + 1)"
            ),
            (Expr::binary(BinaryOp::Eq, m("id"), m("age")), "(id == age)"),
            (m("age").gt(None::<i32>), "(age > null)"),
            (Expr::call(m("name"), "to_upper", Vec::new()), "name.to_upper()")
        ];
        for (expr, needle) in cases {
            let err = parse(&expr, &shape()).unwrap_err();
            match &err {
                Error::UnsupportedExpression {
                    expression, ..
                } => assert!(expression.contains(needle), "{expression} lacks {needle}"),
                other => panic!("unexpected {other:?}")
            }
        }
    }
}
