#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Find-arguments vocabulary.
//!
//! This crate models a query description written in the familiar
//! `where` / `include` / `select` / `take` / `skip` / `orderBy` / `cursor`
//! vocabulary and turns its loosely-typed JSON pieces into typed values:
//!
//! - [`FindArgs`]: the wire-level description (serde, camelCase)
//! - [`WhereTree`]: a filter tree whose value shapes are decided once at parse time
//! - [`OrderKey`] / [`SortDir`]: normalised ordering
//! - [`Error`]: the single error type shared with backends
//!
//! Backends (see `findargs-sea-orm`) consume these types and produce
//! executable query-builder arguments.

pub mod args;
pub mod filter;
pub mod limits;

pub use args::{FindArgs, OrderByInput};
pub use filter::{
    FieldOp, FilterValue, LogicalOp, Operand, OperatorMap, QueryMode, WhereKey, WhereTree,
};
pub use limits::Limits;

// Ordering primitives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SortDir {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

impl SortDir {
    /// Reverse the sort direction (Asc <-> Desc)
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    /// Parse the direction keyword used by `orderBy` entries.
    ///
    /// # Errors
    /// Returns `Error::UnsupportedShape` for anything other than `"asc"` / `"desc"`.
    pub fn from_keyword(field: &str, value: &serde_json::Value) -> Result<Self> {
        match value.as_str() {
            Some("asc") => Ok(SortDir::Asc),
            Some("desc") => Ok(SortDir::Desc),
            _ => Err(Error::UnsupportedShape(format!(
                "orderBy direction for '{field}' must be \"asc\" or \"desc\", got {value}"
            ))),
        }
    }
}

impl std::fmt::Display for SortDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDir::Asc => write!(f, "asc"),
            SortDir::Desc => write!(f, "desc"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderKey {
    pub field: String,
    pub dir: SortDir,
}

/// Normalised `orderBy`: one key per declared field, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct OrderBy(pub Vec<OrderKey>);

impl OrderBy {
    pub fn empty() -> Self {
        Self(vec![])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Direction declared for `field`, if any. The first declaration wins.
    #[must_use]
    pub fn direction_of(&self, field: &str) -> Option<SortDir> {
        self.0.iter().find(|k| k.field == field).map(|k| k.dir)
    }
}

impl std::fmt::Display for OrderBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(none)");
        }

        let formatted: Vec<String> = self
            .0
            .iter()
            .map(|key| format!("{} {}", key.field, key.dir))
            .collect();

        write!(f, "{}", formatted.join(", "))
    }
}

/// Unified error type for translating find arguments.
///
/// All errors are raised synchronously at the point of origin; translation
/// never returns partial results.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A `where` / `orderBy` / `cursor` entry names a field the table does not have.
    #[error("invalid field: {0}")]
    InvalidField(String),

    /// An operator received an operand of the wrong shape or type.
    #[error("invalid operand for '{op}': {reason}")]
    InvalidOperand { op: String, reason: String },

    /// An operator keyword outside the supported set.
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// A structurally unsupported description (nested select, malformed cursor, ...).
    #[error("unsupported shape: {0}")]
    UnsupportedShape(String),

    /// The description nests deeper than the configured limit.
    #[error("nesting exceeds the maximum depth of {max}")]
    NestingTooDeep { max: usize },
}

impl Error {
    pub fn invalid_operand(op: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidOperand {
            op: op.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
