//! Keyset pagination: boundary predicate and ordering for a cursor.
//!
//! For a primary key `p` and a tie-breaking secondary key `s` the boundary
//! is the usual lexicographic condition
//!
//! ```text
//! p > v1 OR (p = v1 AND s > v2)        -- ascending
//! p < v1 OR (p = v1 AND s < v2)        -- descending
//! ```
//!
//! Each key uses the strict comparator of its own direction, so mixed
//! directions page correctly too.

use findargs::SortDir;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, Value,
    sea_query::{Expr, SimpleExpr},
};

use crate::OrderTerm;

/// One `(column, direction, boundary value)` triple.
#[derive(Clone, Debug)]
pub struct CursorKey<E: EntityTrait> {
    pub field: String,
    pub col: E::Column,
    pub dir: SortDir,
    /// `None` means "first page": no boundary for this key.
    pub value: Option<Value>,
}

impl<E> CursorKey<E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    fn past(&self, v: Value) -> SimpleExpr {
        match self.dir {
            SortDir::Asc => Expr::col(self.col).gt(v),
            SortDir::Desc => Expr::col(self.col).lt(v),
        }
    }

    fn term(&self) -> OrderTerm<E> {
        OrderTerm {
            field: self.field.clone(),
            col: self.col,
            dir: self.dir,
        }
    }
}

/// Rewritten pagination fields.
#[derive(Clone, Debug)]
pub struct Paginated<E: EntityTrait> {
    pub where_: Option<Condition>,
    pub order_by: Vec<OrderTerm<E>>,
    pub limit: Option<u64>,
}

/// Build the boundary predicate and ordering for a cursor and merge the
/// boundary into `existing` with AND.
///
/// A missing primary value yields no boundary at all. A missing secondary
/// value degrades to the single-key boundary on the primary. Both keys still
/// contribute their sort term.
#[must_use]
pub fn paginate<E>(
    existing: Option<Condition>,
    limit: Option<u64>,
    primary: &CursorKey<E>,
    secondary: Option<&CursorKey<E>>,
) -> Paginated<E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let tie = secondary.and_then(|s| s.value.clone().map(|v| (s, v)));
    let boundary = match (primary.value.clone(), tie) {
        (None, _) => None,
        (Some(v1), None) => Some(Condition::all().add(primary.past(v1))),
        (Some(v1), Some((s, v2))) => Some(
            Condition::any().add(primary.past(v1.clone())).add(
                Condition::all()
                    .add(Expr::col(primary.col).eq(v1))
                    .add(s.past(v2)),
            ),
        ),
    };

    let where_ = match (existing, boundary) {
        (Some(e), Some(b)) => Some(Condition::all().add(e).add(b)),
        (e, b) => e.or(b),
    };

    let mut order_by = vec![primary.term()];
    order_by.extend(secondary.map(CursorKey::term));

    Paginated {
        where_,
        order_by,
        limit,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::test_support::{post, render};

    fn key(
        field: &str,
        col: post::Column,
        dir: SortDir,
        value: Option<i64>,
    ) -> CursorKey<post::Entity> {
        CursorKey {
            field: field.to_owned(),
            col,
            dir,
            value: value.map(Value::from),
        }
    }

    #[test]
    fn single_key_asc() {
        // Arrange
        let id = key("id", post::Column::Id, SortDir::Asc, Some(123));

        // Act
        let out = paginate(None, Some(10), &id, None);

        // Assert
        assert_eq!(out.limit, Some(10));
        assert_eq!(out.order_by.len(), 1);
        assert_eq!(out.order_by[0].field, "id");
        assert_eq!(out.order_by[0].dir, SortDir::Asc);
        let sql = render(out.where_);
        assert!(sql.contains(r#""id" > 123"#), "{sql}");
    }

    #[test]
    fn single_key_desc_uses_less_than() {
        let id = key("id", post::Column::Id, SortDir::Desc, Some(7));
        let sql = render(paginate(None, None, &id, None).where_);
        assert!(sql.contains(r#""id" < 7"#), "{sql}");
    }

    #[test]
    fn two_keys_build_composite_boundary() {
        let views = key("views", post::Column::Views, SortDir::Asc, Some(5));
        let id = key("id", post::Column::Id, SortDir::Asc, Some(3));

        let out = paginate(None, Some(2), &views, Some(&id));

        let fields: Vec<_> = out.order_by.iter().map(|t| t.field.as_str()).collect();
        assert_eq!(fields, vec!["views", "id"]);
        let sql = render(out.where_);
        assert!(sql.contains(r#""views" > 5 OR"#), "{sql}");
        assert!(sql.contains(r#""views" = 5 AND "id" > 3"#), "{sql}");
    }

    #[test]
    fn mixed_directions_use_each_comparator() {
        let views = key("views", post::Column::Views, SortDir::Desc, Some(5));
        let id = key("id", post::Column::Id, SortDir::Asc, Some(3));

        let sql = render(paginate(None, None, &views, Some(&id)).where_);

        assert!(sql.contains(r#""views" < 5"#), "{sql}");
        assert!(sql.contains(r#""id" > 3"#), "{sql}");
    }

    #[test]
    fn existing_filter_is_and_combined() {
        let existing = Condition::all().add(Expr::col(post::Column::Title).eq("a"));
        let id = key("id", post::Column::Id, SortDir::Asc, Some(1));

        let sql = render(paginate(Some(existing), None, &id, None).where_);

        assert!(sql.contains(r#""title" = 'a' AND "id" > 1"#), "{sql}");
    }

    #[test]
    fn missing_primary_value_is_first_page() {
        let existing = Condition::all().add(Expr::col(post::Column::Title).eq("a"));
        let id = key("id", post::Column::Id, SortDir::Asc, None);
        let created = key("createdAt", post::Column::Views, SortDir::Asc, Some(9));

        let out = paginate(Some(existing), Some(5), &id, Some(&created));

        assert_eq!(out.order_by.len(), 2);
        let sql = render(out.where_);
        assert!(!sql.contains('>'), "{sql}");
        assert!(sql.contains(r#""title" = 'a'"#), "{sql}");

        let bare = paginate::<post::Entity>(None, None, &id, None);
        assert!(bare.where_.is_none());
    }

    #[test]
    fn missing_secondary_value_keeps_primary_boundary() {
        let id = key("id", post::Column::Id, SortDir::Asc, Some(4));
        let created = key("createdAt", post::Column::Views, SortDir::Asc, None);

        let out = paginate(None, None, &id, Some(&created));

        let sql = render(out.where_);
        assert!(sql.contains(r#""id" > 4"#), "{sql}");
        assert!(!sql.contains(" OR "), "{sql}");
        assert_eq!(out.order_by.len(), 2);
    }
}
