//! Find arguments → [`QueryArgs`].

use findargs::{Error, FindArgs, Limits, OrderBy, Result, SortDir, WhereTree};
use sea_orm::{ColumnTrait, EntityTrait};
use serde_json::{Map, Value as Json};

use crate::config::TranslatorConfig;
use crate::cursor::{CursorKey, paginate};
use crate::operator::LogicalCtx;
use crate::projection::{map_include, map_select};
use crate::value::coerce;
use crate::where_parser::parse_where;
use crate::{ColumnMap, OrderTerm, QueryArgs};

/// Translates find arguments against one table.
///
/// Holds a shared reference to the [`ColumnMap`]; translating never mutates
/// it, so one translator can serve concurrent callers.
///
/// ```ignore
/// let fmap = post_columns();
/// let args = QueryTranslator::new(&fmap).translate_json(&json!({
///     "where": { "OR": [{ "views": { "gt": 100 } }, { "published": true }] },
///     "orderBy": { "views": "desc" },
///     "cursor": { "id": 42 },
///     "take": 20,
/// }))?;
/// let rows = post::Entity::find()
///     .apply_query_args(&args, &fmap)?
///     .all(&db)
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct QueryTranslator<'a, E: EntityTrait> {
    fmap: &'a ColumnMap<E>,
    config: TranslatorConfig,
    limits: Limits,
}

impl<'a, E> QueryTranslator<'a, E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    #[must_use]
    pub fn new(fmap: &'a ColumnMap<E>) -> Self {
        Self::with_config(fmap, TranslatorConfig::default())
    }

    #[must_use]
    pub fn with_config(fmap: &'a ColumnMap<E>, config: TranslatorConfig) -> Self {
        let limits = config.limits();
        Self {
            fmap,
            config,
            limits,
        }
    }

    #[must_use]
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translate one query description.
    ///
    /// # Errors
    /// - `Error::InvalidField` for fields missing from the column map
    /// - `Error::InvalidOperand` for operands that do not fit their operator
    /// - `Error::UnsupportedOperator` for unknown operator keywords
    /// - `Error::UnsupportedShape` for malformed `select`/`include`/`orderBy`/`cursor`
    /// - `Error::NestingTooDeep` past `max_depth`
    pub fn translate(&self, args: &FindArgs) -> Result<QueryArgs<E>> {
        tracing::debug!(
            has_where = args.where_.is_some(),
            has_include = args.include.is_some(),
            has_cursor = args.cursor.is_some(),
            take = args.take,
            skip = args.skip,
            "translating find arguments"
        );
        self.translate_at(args, 1)
            .inspect_err(|e| tracing::debug!(error = %e, "find arguments rejected"))
    }

    /// Deserialize a raw JSON description, then [`translate`](Self::translate) it.
    ///
    /// # Errors
    /// `Error::UnsupportedShape` when `raw` is not a valid description, plus
    /// everything [`translate`](Self::translate) returns.
    pub fn translate_json(&self, raw: &Json) -> Result<QueryArgs<E>> {
        let args = FindArgs::from_value(raw.clone())
            .inspect_err(|e| tracing::debug!(error = %e, "malformed find arguments"))?;
        self.translate(&args)
    }

    fn translate_at(&self, args: &FindArgs, depth: usize) -> Result<QueryArgs<E>> {
        self.limits.check_depth(depth)?;
        let mut out = QueryArgs::default();

        if let Some(raw) = &args.where_ {
            let tree = WhereTree::parse(raw, &self.limits)?;
            out.where_ = parse_where(&tree, self.fmap, LogicalCtx::And)?;
        }

        if let Some(include) = &args.include {
            out.with = Some(map_include(include, |name, nested| {
                self.translate_include(name, nested, depth + 1)
            })?);
        }

        if let Some(select) = &args.select {
            out.columns = Some(map_select(select)?);
        }

        out.limit = args.take;
        out.offset = args.skip;

        let order = args.order()?;
        out.order_by = order
            .0
            .iter()
            .map(|key| {
                Ok(OrderTerm {
                    field: key.field.clone(),
                    col: self.fmap.resolve(&key.field)?.col,
                    dir: key.dir,
                })
            })
            .collect::<Result<_>>()?;

        if let Some(cursor) = &args.cursor {
            let (primary, secondary) = self.cursor_keys(cursor, &order)?;
            tracing::debug!(
                primary = %primary.field,
                secondary = secondary.as_ref().map(|k| k.field.as_str()),
                "applying cursor pagination"
            );
            let page = paginate(out.where_.take(), out.limit, &primary, secondary.as_ref());
            out.where_ = page.where_;
            out.order_by = page.order_by;
            out.limit = page.limit;
        }

        Ok(out)
    }

    fn translate_include(
        &self,
        name: &str,
        nested: &Map<String, Json>,
        depth: usize,
    ) -> Result<QueryArgs<E>> {
        let args = FindArgs::from_value(Json::Object(nested.clone()))?;
        if args.where_.is_some() {
            return Err(Error::UnsupportedShape(format!(
                "include '{name}': nested where is not supported"
            )));
        }
        self.translate_at(&args, depth)
    }

    /// Primary key: the single entry other than the tiebreaker (or the
    /// tiebreaker itself when it is the only entry). Secondary key: the
    /// tiebreaker, unless it already is the primary.
    fn cursor_keys(
        &self,
        cursor: &Map<String, Json>,
        order: &OrderBy,
    ) -> Result<(CursorKey<E>, Option<CursorKey<E>>)> {
        let tiebreaker = self.config.cursor_tiebreaker.as_str();
        let tie_entry = cursor.iter().find(|(k, _)| k.as_str() == tiebreaker);
        let mut others = cursor.iter().filter(|(k, _)| k.as_str() != tiebreaker);

        let (name, value) = match (others.next(), others.next()) {
            (Some(entry), None) => entry,
            (None, _) => tie_entry.ok_or_else(|| {
                Error::UnsupportedShape("cursor must name a field".to_owned())
            })?,
            (Some(_), Some(_)) => {
                return Err(Error::UnsupportedShape(format!(
                    "cursor accepts one field besides '{tiebreaker}'"
                )));
            }
        };

        let primary = self.cursor_key(name, value, order)?;
        if name == tiebreaker {
            return Ok((primary, None));
        }
        let secondary = self.cursor_key(
            tiebreaker,
            tie_entry.map_or(&Json::Null, |(_, v)| v),
            order,
        )?;
        Ok((primary, Some(secondary)))
    }

    fn cursor_key(&self, name: &str, value: &Json, order: &OrderBy) -> Result<CursorKey<E>> {
        let field = self.fmap.resolve(name)?;
        let value = match value {
            Json::Null => None,
            v => Some(coerce("cursor", field.kind, v)?),
        };
        Ok(CursorKey {
            field: name.to_owned(),
            col: field.col,
            dir: order.direction_of(name).unwrap_or(SortDir::Asc),
            value,
        })
    }
}
