//! `WhereTree` → `sea_orm::Condition`.

use findargs::{
    Error, FieldOp, FilterValue, LogicalOp, Operand, QueryMode, Result, WhereKey, WhereTree,
};
use sea_orm::{ColumnTrait, Condition, EntityTrait, sea_query::Expr};

use crate::operator::{LogicalCtx, combine, resolve_operator, resolve_operator_map};
use crate::ColumnMap;

/// Compile a parsed `where` tree into one condition.
///
/// Entries are joined with AND (OR when `ctx` is [`LogicalCtx::Or`]). Even a
/// single entry comes back wrapped in a combined condition. An empty tree
/// yields `None`.
///
/// # Errors
/// - `Error::InvalidField` when a field is not in `fmap`
/// - `Error::InvalidOperand` / `Error::UnsupportedShape` for malformed operands
pub fn parse_where<E>(
    tree: &WhereTree,
    fmap: &ColumnMap<E>,
    ctx: LogicalCtx,
) -> Result<Option<Condition>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let mut conds = Vec::with_capacity(tree.entries.len());
    for (key, value) in &tree.entries {
        let cond = match key {
            WhereKey::Field(name) => field_entry(name, value, fmap, ctx)?,
            WhereKey::Logical(op) => logical_entry(*op, value, fmap, ctx)?,
        };
        conds.extend(cond);
    }

    if conds.is_empty() {
        return Ok(None);
    }
    let base = if ctx == LogicalCtx::Or {
        Condition::any()
    } else {
        Condition::all()
    };
    Ok(Some(conds.into_iter().fold(base, |acc, c| acc.add(c))))
}

fn field_entry<E>(
    name: &str,
    value: &FilterValue,
    fmap: &ColumnMap<E>,
    ctx: LogicalCtx,
) -> Result<Option<Condition>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let field = fmap.resolve(name)?;
    match value {
        FilterValue::Null => Ok(Some(Condition::all().add(Expr::col(field.col).is_null()))),
        FilterValue::Literal(v) => resolve_operator(
            name,
            field,
            FieldOp::Equals,
            &Operand::Value(v.clone()),
            QueryMode::Default,
            LogicalCtx::And,
        )
        .map(Some),
        FilterValue::Operators(map) => {
            let ops_ctx = if ctx == LogicalCtx::Or {
                LogicalCtx::Or
            } else {
                LogicalCtx::And
            };
            resolve_operator_map(name, field, map, ops_ctx)
        }
        FilterValue::SubtreeArray(_) | FilterValue::Subtree(_) => Err(Error::UnsupportedShape(
            format!("field '{name}' cannot hold a nested filter tree"),
        )),
    }
}

fn logical_entry<E>(
    op: LogicalOp,
    value: &FilterValue,
    fmap: &ColumnMap<E>,
    ctx: LogicalCtx,
) -> Result<Option<Condition>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let items: &[WhereTree] = match value {
        // OR: { a, b } joins the object's own entries with OR
        FilterValue::Subtree(tree) if op == LogicalOp::Or => {
            return parse_where(tree, fmap, LogicalCtx::Or);
        }
        FilterValue::Subtree(tree) => std::slice::from_ref(tree),
        FilterValue::SubtreeArray(items) => items,
        _ => {
            return Err(Error::UnsupportedShape(format!(
                "{op} expects an object or an array of objects"
            )))
        }
    };

    let mut parsed = Vec::with_capacity(items.len());
    for item in items {
        parsed.extend(parse_where(item, fmap, LogicalCtx::And)?);
    }

    Ok(match op {
        LogicalOp::And => combine(parsed, LogicalCtx::And),
        LogicalOp::Or => combine(parsed, LogicalCtx::Or),
        LogicalOp::Not => {
            let negated = parsed.into_iter().map(Condition::not).collect();
            let join = if ctx == LogicalCtx::Or {
                LogicalCtx::Or
            } else {
                LogicalCtx::And
            };
            combine(negated, join)
        }
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::test_support::{post, post_map, render};
    use findargs::Limits;
    use serde_json::{Value, json};

    fn compile(raw: &Value) -> Result<Option<Condition>> {
        let tree = WhereTree::from_value(raw, &Limits::default())?;
        parse_where(&tree, &post_map(), LogicalCtx::And)
    }

    fn sql(raw: &Value) -> String {
        render(compile(raw).unwrap())
    }

    #[test]
    fn null_becomes_is_null() {
        let s = sql(&json!({ "deletedAt": null }));
        assert!(s.contains(r#""deleted_at" IS NULL"#), "{s}");
        assert!(!s.contains("= NULL"), "{s}");
    }

    #[test]
    fn literal_is_equality() {
        let s = sql(&json!({ "title": "hello" }));
        assert!(s.contains(r#""title" = 'hello'"#), "{s}");
    }

    #[test]
    fn shorthand_and_equals_are_equivalent() {
        assert_eq!(
            sql(&json!({ "views": 10 })),
            sql(&json!({ "views": { "equals": 10 } }))
        );
        assert_eq!(
            sql(&json!({ "title": "a" })),
            sql(&json!({ "title": { "equals": "a" } }))
        );
    }

    #[test]
    fn explicit_and_matches_implicit_and() {
        assert_eq!(
            sql(&json!({ "AND": [{ "views": 1 }, { "title": "b" }] })),
            sql(&json!({ "views": 1, "title": "b" }))
        );
    }

    #[test]
    fn or_differs_from_and() {
        let or = sql(&json!({ "OR": [{ "views": 1 }, { "title": "b" }] }));
        let and = sql(&json!({ "views": 1, "title": "b" }));

        assert_ne!(or, and);
        assert!(or.contains(" OR "), "{or}");
        assert!(!and.contains(" OR "), "{and}");
    }

    #[test]
    fn or_object_joins_its_entries_with_or() {
        let s = sql(&json!({ "OR": { "views": 1, "title": "b" } }));
        assert!(s.contains(r#""views" = 1 OR "title" = 'b'"#), "{s}");
    }

    #[test]
    fn not_negates_each_element() {
        let s = sql(&json!({ "NOT": [{ "views": 1 }, { "title": "b" }] }));
        assert_eq!(s.matches("NOT").count(), 2, "{s}");
        assert!(!s.contains(" OR "), "{s}");
    }

    #[test]
    fn not_object_is_single_negation() {
        let s = sql(&json!({ "NOT": { "views": 1 } }));
        assert_eq!(s.matches("NOT").count(), 1, "{s}");
        assert!(s.contains(r#""views" = 1"#), "{s}");
    }

    #[test]
    fn operator_object_entries_join_with_and() {
        let s = sql(&json!({ "views": { "gt": 1, "lt": 10 } }));
        assert!(s.contains(r#""views" > 1 AND "views" < 10"#), "{s}");
    }

    #[test]
    fn not_under_or_object_joins_negations_with_or() {
        let s = sql(&json!({ "OR": { "NOT": [{ "views": 1 }, { "title": "b" }] } }));

        assert_eq!(s.matches("NOT").count(), 2, "{s}");
        assert!(s.contains(" OR "), "{s}");
        assert!(!s.contains(" AND "), "{s}");
    }

    #[test]
    fn operator_object_under_or_object_joins_with_or() {
        let s = sql(&json!({ "OR": { "views": { "gt": 1, "lt": 10 } } }));
        assert!(s.contains(r#""views" > 1 OR "views" < 10"#), "{s}");
    }

    #[test]
    fn field_not_with_several_operators_excludes_the_range() {
        let s = sql(&json!({ "views": { "not": { "gt": 1, "lt": 100 } } }));

        assert!(s.contains(" OR "), "{s}");
        assert!(!s.contains(" AND "), "{s}");
        assert_eq!(s.matches("NOT").count(), 2, "{s}");
    }

    #[test]
    fn empty_tree_yields_nothing() {
        assert!(compile(&json!({})).unwrap().is_none());
        assert!(compile(&json!({ "AND": [] })).unwrap().is_none());
    }

    #[test]
    fn unknown_field_fails() {
        assert_eq!(
            compile(&json!({ "nope": 1 })).unwrap_err(),
            Error::InvalidField("nope".to_owned())
        );
        assert_eq!(
            compile(&json!({ "nope": null })).unwrap_err(),
            Error::InvalidField("nope".to_owned())
        );
        assert_eq!(
            compile(&json!({ "OR": [{ "nope": { "gt": 1 } }] })).unwrap_err(),
            Error::InvalidField("nope".to_owned())
        );
    }

    #[test]
    fn logical_keys_never_resolve_columns() {
        // A table without AND/OR/NOT columns still accepts logical keys.
        let fmap = ColumnMap::<post::Entity>::new().insert(
            "views",
            post::Column::Views,
            crate::FieldKind::I64,
        );
        let tree = WhereTree::from_value(
            &json!({ "AND": [{ "views": 1 }], "NOT": { "views": 2 } }),
            &Limits::default(),
        )
        .unwrap();

        assert!(parse_where(&tree, &fmap, LogicalCtx::And).unwrap().is_some());
    }

    #[test]
    fn single_entry_tree_is_still_a_combined_condition() {
        let cond = compile(&json!({ "views": 1 })).unwrap().unwrap();
        let direct =
            Condition::all().add(Condition::all().add(Expr::col(post::Column::Views).eq(1)));

        assert_eq!(render(Some(cond)), render(Some(direct)));
    }
}
