//! Translated query arguments, ready to apply to a `sea_orm::Select`.

use std::collections::BTreeMap;

use findargs::SortDir;
use sea_orm::{Condition, EntityTrait};
use serde_json::Value as Json;

/// One sort term: the caller-visible field, its column and direction.
#[derive(Clone, Debug)]
pub struct OrderTerm<E: EntityTrait> {
    pub field: String,
    pub col: E::Column,
    pub dir: SortDir,
}

/// A translated `include` entry.
#[derive(Clone, Debug)]
pub enum Relation<E: EntityTrait> {
    /// Non-object value (`true`, `false`, ...) passed through unchanged.
    Flag(Json),
    /// Object value translated as a nested query.
    Nested(Box<QueryArgs<E>>),
}

impl<E: EntityTrait> Relation<E> {
    #[must_use]
    pub fn as_nested(&self) -> Option<&QueryArgs<E>> {
        match self {
            Relation::Nested(args) => Some(args),
            Relation::Flag(_) => None,
        }
    }
}

/// Output of a translation: `where` / `with` / `columns` / `limit` /
/// `offset` / `orderBy`.
#[derive(Clone, Debug)]
pub struct QueryArgs<E: EntityTrait> {
    pub where_: Option<Condition>,
    pub with: Option<BTreeMap<String, Relation<E>>>,
    pub columns: Option<BTreeMap<String, bool>>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub order_by: Vec<OrderTerm<E>>,
}

impl<E: EntityTrait> Default for QueryArgs<E> {
    fn default() -> Self {
        Self {
            where_: None,
            with: None,
            columns: None,
            limit: None,
            offset: None,
            order_by: Vec::new(),
        }
    }
}

impl<E: EntityTrait> QueryArgs<E> {
    /// Sort terms as `field dir` pairs, mostly for logs and assertions.
    #[must_use]
    pub fn order_fields(&self) -> Vec<(&str, SortDir)> {
        self.order_by
            .iter()
            .map(|t| (t.field.as_str(), t.dir))
            .collect()
    }
}
