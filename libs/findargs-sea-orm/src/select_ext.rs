//! Apply [`QueryArgs`] to a `sea_orm::Select`.

use findargs::{Result, SortDir};
use sea_orm::{ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect};

use crate::{ColumnMap, QueryArgs};

/// Apply translated arguments to a plain `SeaORM` `Select<E>`.
///
/// `with` is not applied: relations are typed per entity and stay with the
/// caller.
pub trait QueryArgsSelectExt<E: EntityTrait>: Sized {
    /// Apply `where`, sort terms, `limit`, `offset` and the `columns`
    /// projection.
    ///
    /// # Errors
    /// Returns `Error::InvalidField` if `columns` names a field missing from `fmap`.
    fn apply_query_args(self, args: &QueryArgs<E>, fmap: &ColumnMap<E>) -> Result<Self>;
}

impl<E> QueryArgsSelectExt<E> for sea_orm::Select<E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    fn apply_query_args(self, args: &QueryArgs<E>, fmap: &ColumnMap<E>) -> Result<Self> {
        let mut select = self;

        if let Some(cond) = &args.where_ {
            select = select.filter(cond.clone());
        }

        for term in &args.order_by {
            let order = match term.dir {
                SortDir::Asc => Order::Asc,
                SortDir::Desc => Order::Desc,
            };
            select = select.order_by(term.col, order);
        }

        if let Some(limit) = args.limit {
            select = select.limit(limit);
        }
        if let Some(offset) = args.offset {
            select = select.offset(offset);
        }

        if let Some(columns) = &args.columns {
            let picked = columns
                .iter()
                .filter(|(_, on)| **on)
                .map(|(name, _)| fmap.resolve(name).map(|f| f.col))
                .collect::<Result<Vec<_>>>()?;
            if !picked.is_empty() {
                select = select.select_only().columns(picked);
            }
        }

        Ok(select)
    }
}
