//! Table descriptor: caller-visible field names mapped onto entity columns.

use std::collections::HashMap;

use findargs::{Error, Result};
use sea_orm::EntityTrait;

use crate::FieldKind;

#[derive(Clone, Debug)]
pub struct Field<E: EntityTrait> {
    pub col: E::Column,
    pub kind: FieldKind,
    /// Scalar-list column; `kind` is the element type.
    pub array: bool,
}

/// Named, typed columns of one entity.
///
/// Field names are matched exactly (`createdAt` and `created_at` are
/// different fields).
///
/// ```ignore
/// let fmap = ColumnMap::<post::Entity>::new()
///     .insert("id", post::Column::Id, FieldKind::I64)
///     .insert("title", post::Column::Title, FieldKind::String)
///     .insert("createdAt", post::Column::CreatedAt, FieldKind::DateTimeUtc)
///     .insert_array("tags", post::Column::Tags, FieldKind::String);
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct ColumnMap<E: EntityTrait> {
    map: HashMap<String, Field<E>>,
}

impl<E: EntityTrait> Default for ColumnMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> ColumnMap<E> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn insert(mut self, api_name: impl Into<String>, col: E::Column, kind: FieldKind) -> Self {
        self.map.insert(
            api_name.into(),
            Field {
                col,
                kind,
                array: false,
            },
        );
        self
    }

    pub fn insert_array(
        mut self,
        api_name: impl Into<String>,
        col: E::Column,
        element_kind: FieldKind,
    ) -> Self {
        self.map.insert(
            api_name.into(),
            Field {
                col,
                kind: element_kind,
                array: true,
            },
        );
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field<E>> {
        self.map.get(name)
    }

    /// Look up a field, failing with `Error::InvalidField` when absent.
    ///
    /// # Errors
    /// Returns `Error::InvalidField` if `name` is not a column of this table.
    pub fn resolve(&self, name: &str) -> Result<&Field<E>> {
        self.get(name)
            .ok_or_else(|| Error::InvalidField(name.to_owned()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
