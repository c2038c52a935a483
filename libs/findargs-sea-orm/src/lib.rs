#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `SeaORM` backend for find arguments.
//!
//! Translates a [`findargs::FindArgs`] description into [`QueryArgs`]: one
//! combined `sea_orm::Condition`, sort terms, limit/offset, a relation
//! tree and a column projection. Columns are described once per entity with
//! a [`ColumnMap`].
//!
//! ```ignore
//! use findargs_sea_orm::{ColumnMap, FieldKind, QueryArgsSelectExt, QueryTranslator};
//!
//! let fmap = ColumnMap::<post::Entity>::new()
//!     .insert("id", post::Column::Id, FieldKind::I64)
//!     .insert("title", post::Column::Title, FieldKind::String)
//!     .insert("createdAt", post::Column::CreatedAt, FieldKind::DateTimeUtc);
//!
//! let args = QueryTranslator::new(&fmap).translate_json(&serde_json::json!({
//!     "where": { "title": { "contains": "rust", "mode": "insensitive" } },
//!     "cursor": { "id": 10 },
//!     "take": 20,
//! }))?;
//!
//! let page = post::Entity::find()
//!     .apply_query_args(&args, &fmap)?
//!     .all(&db)
//!     .await?;
//! ```

pub mod column_map;
pub mod config;
pub mod cursor;
pub mod kind;
pub mod operator;
pub mod projection;
pub mod query_args;
pub mod select_ext;
pub mod translator;
pub mod value;
pub mod where_parser;

pub use column_map::{ColumnMap, Field};
pub use config::TranslatorConfig;
pub use cursor::{CursorKey, Paginated, paginate};
pub use kind::FieldKind;
pub use operator::{LogicalCtx, resolve_operator, resolve_operator_map};
pub use query_args::{OrderTerm, QueryArgs, Relation};
pub use select_ext::QueryArgsSelectExt;
pub use translator::QueryTranslator;
pub use where_parser::parse_where;

pub use findargs::{Error, FindArgs, Result, SortDir};

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod test_support {
    use sea_orm::{Condition, DbBackend, EntityTrait, QueryFilter, QueryTrait};

    use crate::{ColumnMap, FieldKind};

    pub mod post {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
        #[sea_orm(table_name = "posts")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i64,
            pub title: String,
            pub views: i64,
            pub score: f64,
            pub published: bool,
            /// Rendered only; the column map declares it as a text list.
            pub tags: String,
            pub created_at: DateTimeUtc,
            pub deleted_at: Option<DateTimeUtc>,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    pub fn post_map() -> ColumnMap<post::Entity> {
        ColumnMap::new()
            .insert("id", post::Column::Id, FieldKind::I64)
            .insert("title", post::Column::Title, FieldKind::String)
            .insert("views", post::Column::Views, FieldKind::I64)
            .insert("score", post::Column::Score, FieldKind::F64)
            .insert("published", post::Column::Published, FieldKind::Bool)
            .insert_array("tags", post::Column::Tags, FieldKind::String)
            .insert("createdAt", post::Column::CreatedAt, FieldKind::DateTimeUtc)
            .insert("deletedAt", post::Column::DeletedAt, FieldKind::DateTimeUtc)
    }

    /// Postgres SQL for `SELECT .. FROM posts [WHERE cond]`.
    pub fn render(cond: Option<Condition>) -> String {
        let mut select = post::Entity::find();
        if let Some(cond) = cond {
            select = select.filter(cond);
        }
        select.build(DbBackend::Postgres).to_string()
    }
}
