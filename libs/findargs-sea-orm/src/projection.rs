//! `include` / `select` → `with` / `columns`.

use std::collections::BTreeMap;

use findargs::{Error, Result};
use sea_orm::EntityTrait;
use serde_json::{Map, Value as Json};

use crate::{QueryArgs, Relation};

/// Map every `include` entry: objects are translated as nested queries by
/// `translate`, anything else is kept as a [`Relation::Flag`].
///
/// # Errors
/// Propagates the first error returned by `translate`.
pub fn map_include<E, F>(
    include: &Map<String, Json>,
    mut translate: F,
) -> Result<BTreeMap<String, Relation<E>>>
where
    E: EntityTrait,
    F: FnMut(&str, &Map<String, Json>) -> Result<QueryArgs<E>>,
{
    let mut with = BTreeMap::new();
    for (name, value) in include {
        let relation = match value {
            Json::Object(nested) => Relation::Nested(Box::new(translate(name, nested)?)),
            other => Relation::Flag(other.clone()),
        };
        with.insert(name.clone(), relation);
    }
    Ok(with)
}

/// Pass a flat `select` map through as `columns`.
///
/// Field names are not resolved here.
///
/// # Errors
/// Returns `Error::UnsupportedShape` for nested selections and other
/// non-boolean values.
pub fn map_select(select: &Map<String, Json>) -> Result<BTreeMap<String, bool>> {
    select
        .iter()
        .map(|(name, value)| match value {
            Json::Bool(b) => Ok((name.clone(), *b)),
            Json::Object(_) => Err(Error::UnsupportedShape(format!(
                "nested select not supported ('{name}')"
            ))),
            other => Err(Error::UnsupportedShape(format!(
                "select '{name}' must be a boolean, got {other}"
            ))),
        })
        .collect()
}
