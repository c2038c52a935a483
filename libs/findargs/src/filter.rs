//! Typed filter tree for `where` descriptions.
//!
//! A raw `where` object mixes field names with the logical keywords `AND`,
//! `OR` and `NOT`, and its values may be literals, `null`, operator objects
//! or (arrays of) nested trees. [`WhereTree::parse`] decides the shape of
//! every value once, so backends only ever `match` on [`FilterValue`].
//!
//! # Example
//!
//! ```
//! use findargs::{FieldOp, FilterValue, Limits, WhereKey, WhereTree};
//! use serde_json::json;
//!
//! let raw = json!({ "name": { "contains": "ali" }, "deletedAt": null });
//! let tree = WhereTree::from_value(&raw, &Limits::default()).unwrap();
//!
//! assert_eq!(tree.entries.len(), 2);
//! assert_eq!(tree.entries[0].0, WhereKey::Field("name".to_owned()));
//! let FilterValue::Operators(ops) = &tree.entries[0].1 else { panic!() };
//! assert_eq!(ops.ops[0].0, FieldOp::Contains);
//! assert!(matches!(tree.entries[1].1, FilterValue::Null));
//! ```

use std::fmt;

use serde_json::{Map, Value};

use crate::{Error, Limits, Result};

/// Logical keywords allowed as `where` keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
    Not,
}

impl LogicalOp {
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "AND" => Some(LogicalOp::And),
            "OR" => Some(LogicalOp::Or),
            "NOT" => Some(LogicalOp::Not),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
            LogicalOp::Not => "NOT",
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of a `where` entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WhereKey {
    Field(String),
    Logical(LogicalOp),
}

/// Field-level operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldOp {
    Not,
    Equals,
    In,
    NotIn,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    StartsWith,
    EndsWith,
    Has,
    HasEvery,
    HasSome,
}

impl FieldOp {
    pub const ALL: &'static [FieldOp] = &[
        FieldOp::Not,
        FieldOp::Equals,
        FieldOp::In,
        FieldOp::NotIn,
        FieldOp::Lt,
        FieldOp::Lte,
        FieldOp::Gt,
        FieldOp::Gte,
        FieldOp::Contains,
        FieldOp::StartsWith,
        FieldOp::EndsWith,
        FieldOp::Has,
        FieldOp::HasEvery,
        FieldOp::HasSome,
    ];

    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            FieldOp::Not => "not",
            FieldOp::Equals => "equals",
            FieldOp::In => "in",
            FieldOp::NotIn => "notIn",
            FieldOp::Lt => "lt",
            FieldOp::Lte => "lte",
            FieldOp::Gt => "gt",
            FieldOp::Gte => "gte",
            FieldOp::Contains => "contains",
            FieldOp::StartsWith => "startsWith",
            FieldOp::EndsWith => "endsWith",
            FieldOp::Has => "has",
            FieldOp::HasEvery => "hasEvery",
            FieldOp::HasSome => "hasSome",
        }
    }

    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.keyword() == keyword)
    }
}

impl fmt::Display for FieldOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// String matching mode carried by an operator object's `mode` key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueryMode {
    #[default]
    Default,
    Insensitive,
}

impl QueryMode {
    fn parse(value: &Value) -> Result<Self> {
        match value.as_str() {
            Some("default") => Ok(QueryMode::Default),
            Some("insensitive") => Ok(QueryMode::Insensitive),
            _ => Err(Error::invalid_operand(
                "mode",
                format!("expected \"default\" or \"insensitive\", got {value}"),
            )),
        }
    }
}

/// Operand of a field operator.
///
/// Only `not` accepts a nested operator object; everything else keeps the raw
/// JSON value, validated by the backend once the column is known.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Value(Value),
    Nested(OperatorMap),
}

/// Operator object such as `{ "gt": 1, "lt": 10 }` or
/// `{ "contains": "x", "mode": "insensitive" }`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperatorMap {
    pub ops: Vec<(FieldOp, Operand)>,
    pub mode: QueryMode,
}

impl OperatorMap {
    /// Parse an operator object. A nested `not: {..}` without its own `mode`
    /// inherits the enclosing one.
    ///
    /// # Errors
    /// Returns `Error::UnsupportedOperator` for unknown keywords and
    /// `Error::InvalidOperand` for a malformed `mode`.
    pub fn parse(obj: &Map<String, Value>, limits: &Limits) -> Result<Self> {
        Self::parse_at(obj, QueryMode::Default, limits, 1)
    }

    fn parse_at(
        obj: &Map<String, Value>,
        inherited: QueryMode,
        limits: &Limits,
        depth: usize,
    ) -> Result<Self> {
        limits.check_depth(depth)?;

        let mode = match obj.get("mode") {
            Some(m) => QueryMode::parse(m)?,
            None => inherited,
        };

        let mut ops = Vec::with_capacity(obj.len());
        for (key, value) in obj {
            if key == "mode" {
                continue;
            }
            let op = FieldOp::from_keyword(key)
                .ok_or_else(|| Error::UnsupportedOperator(key.clone()))?;
            let operand = match (op, value) {
                (FieldOp::Not, Value::Object(inner)) => {
                    Operand::Nested(Self::parse_at(inner, mode, limits, depth + 1)?)
                }
                _ => Operand::Value(value.clone()),
            };
            ops.push((op, operand));
        }

        Ok(Self { ops, mode })
    }
}

/// Shape of a `where` value, decided once at parse time.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    /// `field: null`
    Null,
    /// `field: 42` (equality shorthand)
    Literal(Value),
    /// `field: { op: operand, ... }`
    Operators(OperatorMap),
    /// `AND | OR | NOT: [ {..}, {..} ]`
    SubtreeArray(Vec<WhereTree>),
    /// `AND | OR | NOT: { .. }`
    Subtree(WhereTree),
}

/// Parsed `where` description: entries in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WhereTree {
    pub entries: Vec<(WhereKey, FilterValue)>,
}

impl WhereTree {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON value that must be an object.
    ///
    /// # Errors
    /// Returns `Error::UnsupportedShape` for non-object input, plus anything
    /// [`WhereTree::parse`] returns.
    pub fn from_value(value: &Value, limits: &Limits) -> Result<Self> {
        match value {
            Value::Object(obj) => Self::parse(obj, limits),
            other => Err(Error::UnsupportedShape(format!(
                "where must be an object, got {other}"
            ))),
        }
    }

    /// Parse a `where` object.
    ///
    /// # Errors
    /// - `Error::UnsupportedOperator` for unknown operator keywords, or an
    ///   array given directly to a field
    /// - `Error::UnsupportedShape` for literals under `AND` / `OR` / `NOT`
    /// - `Error::NestingTooDeep` past `limits.max_depth`
    pub fn parse(obj: &Map<String, Value>, limits: &Limits) -> Result<Self> {
        Self::parse_at(obj, limits, 1)
    }

    fn parse_at(obj: &Map<String, Value>, limits: &Limits, depth: usize) -> Result<Self> {
        limits.check_depth(depth)?;

        let mut entries = Vec::with_capacity(obj.len());
        for (key, value) in obj {
            let entry = match LogicalOp::from_key(key) {
                Some(op) => (
                    WhereKey::Logical(op),
                    Self::parse_logical(op, value, limits, depth)?,
                ),
                None => (
                    WhereKey::Field(key.clone()),
                    Self::parse_field(key, value, limits, depth)?,
                ),
            };
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    fn parse_field(
        key: &str,
        value: &Value,
        limits: &Limits,
        depth: usize,
    ) -> Result<FilterValue> {
        Ok(match value {
            Value::Null => FilterValue::Null,
            Value::Object(obj) => FilterValue::Operators(OperatorMap::parse_at(
                obj,
                QueryMode::Default,
                limits,
                depth + 1,
            )?),
            // An array under a field is read as an operator named after the field.
            Value::Array(_) => return Err(Error::UnsupportedOperator(key.to_owned())),
            literal => FilterValue::Literal(literal.clone()),
        })
    }

    fn parse_logical(
        op: LogicalOp,
        value: &Value,
        limits: &Limits,
        depth: usize,
    ) -> Result<FilterValue> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Object(obj) => Self::parse_at(obj, limits, depth + 1),
                    other => Err(Error::UnsupportedShape(format!(
                        "{op} elements must be objects, got {other}"
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(FilterValue::SubtreeArray),
            Value::Object(obj) => Self::parse_at(obj, limits, depth + 1).map(FilterValue::Subtree),
            other => Err(Error::UnsupportedShape(format!(
                "{op} expects an object or an array of objects, got {other}"
            ))),
        }
    }
}
