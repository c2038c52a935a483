//! Wire-level find arguments.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, OrderBy, OrderKey, Result, SortDir};

/// A query description in `where` / `include` / `select` / `take` / `skip` /
/// `orderBy` / `cursor` form.
///
/// Nested pieces stay as raw JSON maps; backends parse them against their
/// table description.
///
/// ```
/// use findargs::FindArgs;
/// use serde_json::json;
///
/// let args = FindArgs::from_value(json!({
///     "where": { "published": true },
///     "orderBy": [{ "createdAt": "desc" }],
///     "take": 10,
/// }))
/// .unwrap();
///
/// assert_eq!(args.take, Some(10));
/// assert_eq!(args.order().unwrap().0.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FindArgs {
    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub where_: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderByInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Map<String, Value>>,
}

/// `orderBy` accepts a single map or a sequence of maps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderByInput {
    Many(Vec<Map<String, Value>>),
    One(Map<String, Value>),
}

impl OrderByInput {
    /// Flatten into ordered keys. Each map contributes its entries in order.
    ///
    /// # Errors
    /// Returns `Error::UnsupportedShape` for a direction other than `asc` / `desc`.
    pub fn normalize(&self) -> Result<OrderBy> {
        let maps: &[Map<String, Value>] = match self {
            OrderByInput::Many(maps) => maps,
            OrderByInput::One(map) => std::slice::from_ref(map),
        };

        let mut keys = Vec::new();
        for map in maps {
            for (field, dir) in map {
                keys.push(OrderKey {
                    field: field.clone(),
                    dir: SortDir::from_keyword(field, dir)?,
                });
            }
        }
        Ok(OrderBy(keys))
    }
}

impl FindArgs {
    /// Deserialize from an arbitrary JSON value.
    ///
    /// # Errors
    /// Returns `Error::UnsupportedShape` when the value does not describe find arguments.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::UnsupportedShape(e.to_string()))
    }

    /// Normalised `orderBy` (empty when absent).
    ///
    /// # Errors
    /// See [`OrderByInput::normalize`].
    pub fn order(&self) -> Result<OrderBy> {
        self.order_by
            .as_ref()
            .map_or_else(|| Ok(OrderBy::empty()), OrderByInput::normalize)
    }
}
