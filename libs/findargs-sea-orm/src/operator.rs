//! Field operator → `sea_orm::Condition`.
//!
//! One operator keyword plus its operand becomes one column predicate. The
//! enclosing [`LogicalCtx`] is threaded explicitly: in a `Not` context every
//! operator produces its negated form (`equals` → `<>`, `in` → `NOT IN`,
//! `contains` → `NOT LIKE`, comparisons → `NOT (..)`).

use findargs::{Error, FieldOp, Operand, OperatorMap, QueryMode, Result};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait,
    sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr, extension::postgres::PgBinOper},
};
use serde_json::Value as Json;

use crate::value::{
    LIKE_ESCAPE, coerce, coerce_many, like_contains, like_ends, like_starts, pattern_operand,
};
use crate::{Field, FieldKind};

/// Enclosing logical context of a filter subtree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogicalCtx {
    #[default]
    And,
    Or,
    Not,
}

/// Combine predicates for a context: one predicate is returned as is,
/// several are joined with OR under `Or` and AND otherwise.
pub(crate) fn combine(mut conds: Vec<Condition>, ctx: LogicalCtx) -> Option<Condition> {
    match conds.len() {
        0 => None,
        1 => conds.pop(),
        _ => {
            let base = if ctx == LogicalCtx::Or {
                Condition::any()
            } else {
                Condition::all()
            };
            Some(conds.into_iter().fold(base, |acc, c| acc.add(c)))
        }
    }
}

fn cond(expr: SimpleExpr) -> Condition {
    Condition::all().add(expr)
}

fn cond_maybe_not(expr: SimpleExpr, negated: bool) -> Condition {
    if negated {
        cond(expr).not()
    } else {
        cond(expr)
    }
}

fn always_true() -> SimpleExpr {
    Expr::cust("1=1")
}

fn always_false() -> SimpleExpr {
    Expr::cust("1=0")
}

/// `value = ANY(col)` for list columns.
fn any_eq<C: ColumnTrait>(value: sea_orm::Value, col: C) -> SimpleExpr {
    Expr::val(value).eq(Func::cust(Alias::new("ANY")).arg(Expr::col(col)))
}

fn ensure_string_field<E: EntityTrait>(op: FieldOp, f: &Field<E>) -> Result<()> {
    if f.kind != FieldKind::String || f.array {
        return Err(Error::invalid_operand(
            op.keyword(),
            format!("requires a String column, field is {}", f.kind),
        ));
    }
    Ok(())
}

fn ensure_array_field<E: EntityTrait>(op: FieldOp, name: &str, f: &Field<E>) -> Result<()> {
    if !f.array {
        return Err(Error::invalid_operand(
            op.keyword(),
            format!("field '{name}' is not a list column"),
        ));
    }
    Ok(())
}

fn scalar_operand(op: FieldOp, v: &Json) -> Result<&Json> {
    match v {
        Json::Array(_) | Json::Object(_) => Err(Error::invalid_operand(
            op.keyword(),
            "expected a scalar value",
        )),
        scalar => Ok(scalar),
    }
}

/// Resolve every operator of an operator object and combine the results
/// for `ctx` (see [`LogicalCtx`]).
///
/// In a `Not` context the negated operators are OR-joined, so the whole map
/// reads as `NOT (op1 AND op2 ..)`.
///
/// # Errors
/// Propagates the first error from [`resolve_operator`].
pub fn resolve_operator_map<E>(
    name: &str,
    field: &Field<E>,
    map: &OperatorMap,
    ctx: LogicalCtx,
) -> Result<Option<Condition>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let conds = map
        .ops
        .iter()
        .map(|(op, operand)| resolve_operator(name, field, *op, operand, map.mode, ctx))
        .collect::<Result<Vec<_>>>()?;
    let join = match ctx {
        LogicalCtx::Or | LogicalCtx::Not => LogicalCtx::Or,
        LogicalCtx::And => LogicalCtx::And,
    };
    Ok(combine(conds, join))
}

/// Resolve one operator against a column.
///
/// # Errors
/// Returns `Error::InvalidOperand` when the operand shape or type does not
/// fit the operator or the column.
#[allow(clippy::too_many_lines)]
pub fn resolve_operator<E>(
    name: &str,
    field: &Field<E>,
    op: FieldOp,
    operand: &Operand,
    mode: QueryMode,
    ctx: LogicalCtx,
) -> Result<Condition>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let negated = ctx == LogicalCtx::Not;
    let col = field.col;
    let kw = op.keyword();
    tracing::trace!(field = name, op = kw, negated, "resolving operator");

    let v = match (op, operand) {
        // not: { .. } flips the context for the inner operators
        (FieldOp::Not, Operand::Nested(inner)) => {
            let inner_ctx = if negated {
                LogicalCtx::And
            } else {
                LogicalCtx::Not
            };
            return Ok(resolve_operator_map(name, field, inner, inner_ctx)?
                .unwrap_or_else(|| cond(always_true())));
        }
        (_, Operand::Nested(_)) => {
            return Err(Error::invalid_operand(
                kw,
                "operator objects are only accepted under 'not'",
            ))
        }
        (_, Operand::Value(v)) => v,
    };

    Ok(match op {
        FieldOp::Not => match v {
            Json::Null if negated => cond(Expr::col(col).is_null()),
            Json::Null => cond(Expr::col(col).is_not_null()),
            other => {
                let value = coerce(kw, field.kind, scalar_operand(op, other)?)?;
                if negated {
                    cond(Expr::col(col).eq(value))
                } else {
                    cond(Expr::col(col).ne(value))
                }
            }
        },

        FieldOp::Equals => match v {
            Json::Null if negated => cond(Expr::col(col).is_not_null()),
            Json::Null => cond(Expr::col(col).is_null()),
            other => {
                let value = coerce(kw, field.kind, scalar_operand(op, other)?)?;
                if negated {
                    cond(Expr::col(col).ne(value))
                } else {
                    cond(Expr::col(col).eq(value))
                }
            }
        },

        FieldOp::In | FieldOp::NotIn => {
            let vals = coerce_many(kw, field.kind, v)?;
            let membership = (op == FieldOp::In) != negated;
            match (membership, vals.is_empty()) {
                // IN () → always false, NOT IN () → always true
                (true, true) => cond(always_false()),
                (false, true) => cond(always_true()),
                (true, false) => cond(Expr::col(col).is_in(vals)),
                (false, false) => cond(Expr::col(col).is_not_in(vals)),
            }
        }

        FieldOp::Lt | FieldOp::Lte | FieldOp::Gt | FieldOp::Gte => {
            let value = coerce(kw, field.kind, v)?;
            let expr = match op {
                FieldOp::Lt => Expr::col(col).lt(value),
                FieldOp::Lte => Expr::col(col).lte(value),
                FieldOp::Gt => Expr::col(col).gt(value),
                _ => Expr::col(col).gte(value),
            };
            cond_maybe_not(expr, negated)
        }

        FieldOp::Contains | FieldOp::StartsWith | FieldOp::EndsWith => {
            let s = pattern_operand(kw, v)?;
            ensure_string_field(op, field)?;
            let pattern = match op {
                FieldOp::Contains => like_contains(s),
                FieldOp::StartsWith => like_starts(s),
                _ => like_ends(s),
            };
            // ILIKE goes through a binary operator: Postgres escapes with `\` by default
            let expr = match (mode, negated) {
                (QueryMode::Default, false) => {
                    Expr::col(col).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
                }
                (QueryMode::Default, true) => {
                    Expr::col(col).not_like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
                }
                (QueryMode::Insensitive, false) => {
                    Expr::col(col).binary(PgBinOper::ILike, Expr::val(pattern))
                }
                (QueryMode::Insensitive, true) => {
                    Expr::col(col).binary(PgBinOper::NotILike, Expr::val(pattern))
                }
            };
            cond(expr)
        }

        FieldOp::Has => {
            ensure_array_field(op, name, field)?;
            let value = match v {
                Json::Null => {
                    return Err(Error::invalid_operand(kw, "expected a value, got null"));
                }
                other => coerce(kw, field.kind, scalar_operand(op, other)?)?,
            };
            cond_maybe_not(any_eq(value, col), negated)
        }

        FieldOp::HasEvery | FieldOp::HasSome => {
            ensure_array_field(op, name, field)?;
            let vals = coerce_many(kw, field.kind, v)?;
            let every = op == FieldOp::HasEvery;
            let inner = if vals.is_empty() {
                cond(if every { always_true() } else { always_false() })
            } else {
                let base = if every {
                    Condition::all()
                } else {
                    Condition::any()
                };
                vals.into_iter()
                    .fold(base, |acc, value| acc.add(any_eq(value, col)))
            };
            if negated {
                inner.not()
            } else {
                inner
            }
        }
    })
}
