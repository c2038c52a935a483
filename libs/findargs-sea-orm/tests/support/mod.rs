#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use anyhow::Result;
use findargs_sea_orm::{ColumnMap, FieldKind};
use sea_orm::{
    Condition, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend,
    EntityTrait, QueryFilter, QueryTrait, Set,
};

pub mod article {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "articles")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i64,
        pub title: String,
        pub views: i64,
        pub author: Option<String>,
        /// Unix seconds, so ordering is numeric on every backend.
        pub created_at: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub fn article_map() -> ColumnMap<article::Entity> {
    ColumnMap::new()
        .insert("id", article::Column::Id, FieldKind::I64)
        .insert("title", article::Column::Title, FieldKind::String)
        .insert("views", article::Column::Views, FieldKind::I64)
        .insert("author", article::Column::Author, FieldKind::String)
        .insert("createdAt", article::Column::CreatedAt, FieldKind::I64)
}

pub fn render(cond: Option<Condition>) -> String {
    let mut select = article::Entity::find();
    if let Some(cond) = cond {
        select = select.filter(cond);
    }
    select.build(DbBackend::Postgres).to_string()
}

pub async fn setup_sqlite_db() -> Result<DatabaseConnection> {
    // One connection: every pooled in-memory connection would get its own database.
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let conn = Database::connect(opts).await?;
    conn.execute_unprepared(
        "CREATE TABLE articles (
id INTEGER PRIMARY KEY NOT NULL,
title TEXT NOT NULL,
views INTEGER NOT NULL,
author TEXT NULL,
created_at INTEGER NOT NULL
)",
    )
    .await?;
    Ok(conn)
}

/// `(id, title, views, author, created_at)`
pub type Row<'a> = (i64, &'a str, i64, Option<&'a str>, i64);

pub async fn seed(conn: &DatabaseConnection, rows: &[Row<'_>]) -> Result<()> {
    for (id, title, views, author, created_at) in rows {
        article::Entity::insert(article::ActiveModel {
            id: Set(*id),
            title: Set((*title).to_owned()),
            views: Set(*views),
            author: Set(author.map(str::to_owned)),
            created_at: Set(*created_at),
        })
        .exec(conn)
        .await?;
    }
    Ok(())
}

pub fn ids(models: &[article::Model]) -> Vec<i64> {
    models.iter().map(|m| m.id).collect()
}
