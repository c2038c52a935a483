//! JSON operand → `sea_orm::Value` coercion and LIKE pattern helpers.

use chrono::{NaiveDate, NaiveTime, Utc};
use findargs::{Error, Result};
use rust_decimal::Decimal;
use serde_json::Value as Json;

use crate::FieldKind;

fn json_type(v: &Json) -> &'static str {
    match v {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn mismatch(op: &str, expected: FieldKind, got: &Json) -> Error {
    Error::invalid_operand(op, format!("expected {expected}, got {}", json_type(got)))
}

fn unparsable(op: &str, expected: FieldKind, s: &str) -> Error {
    Error::invalid_operand(op, format!("'{s}' is not a valid {expected}"))
}

/// Coerce one JSON operand into a typed `sea_orm::Value` for a column of `kind`.
///
/// Temporal and uuid kinds accept their canonical string forms (RFC 3339 for
/// `DateTimeUtc`). `Decimal` accepts numbers and numeric strings.
///
/// # Errors
/// Returns `Error::InvalidOperand` naming `op` when the operand does not fit `kind`.
pub fn coerce(op: &str, kind: FieldKind, v: &Json) -> Result<sea_orm::Value> {
    use sea_orm::Value as V;

    Ok(match (kind, v) {
        (FieldKind::String, Json::String(s)) => V::String(Some(Box::new(s.clone()))),

        (FieldKind::I64, Json::Number(n)) => {
            V::BigInt(Some(n.as_i64().ok_or_else(|| mismatch(op, kind, v))?))
        }

        (FieldKind::F64, Json::Number(n)) => {
            V::Double(Some(n.as_f64().ok_or_else(|| mismatch(op, kind, v))?))
        }

        (FieldKind::Decimal, Json::Number(n)) => {
            V::Decimal(Some(Box::new(parse_decimal(op, &n.to_string())?)))
        }
        (FieldKind::Decimal, Json::String(s)) => V::Decimal(Some(Box::new(parse_decimal(op, s)?))),

        (FieldKind::Bool, Json::Bool(b)) => V::Bool(Some(*b)),

        (FieldKind::Uuid, Json::String(s)) => {
            let u = s
                .parse::<uuid::Uuid>()
                .map_err(|_| unparsable(op, kind, s))?;
            V::Uuid(Some(Box::new(u)))
        }

        (FieldKind::DateTimeUtc, Json::String(s)) => {
            let dt = chrono::DateTime::parse_from_rfc3339(s)
                .map_err(|_| unparsable(op, kind, s))?
                .with_timezone(&Utc);
            V::ChronoDateTimeUtc(Some(Box::new(dt)))
        }
        (FieldKind::Date, Json::String(s)) => {
            let d = s
                .parse::<NaiveDate>()
                .map_err(|_| unparsable(op, kind, s))?;
            V::ChronoDate(Some(Box::new(d)))
        }
        (FieldKind::Time, Json::String(s)) => {
            let t = s
                .parse::<NaiveTime>()
                .map_err(|_| unparsable(op, kind, s))?;
            V::ChronoTime(Some(Box::new(t)))
        }

        (expected, got) => return Err(mismatch(op, expected, got)),
    })
}

fn parse_decimal(op: &str, s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| unparsable(op, FieldKind::Decimal, s))
}

/// Coerce every element of an array operand.
///
/// # Errors
/// Returns `Error::InvalidOperand` if `v` is not an array or an element does not fit `kind`.
pub fn coerce_many(op: &str, kind: FieldKind, v: &Json) -> Result<Vec<sea_orm::Value>> {
    let Json::Array(items) = v else {
        return Err(Error::invalid_operand(
            op,
            format!("expected an array, got {}", json_type(v)),
        ));
    };
    items.iter().map(|item| coerce(op, kind, item)).collect()
}

/// The string operand of `contains` / `startsWith` / `endsWith`.
///
/// # Errors
/// Returns `Error::InvalidOperand` for arrays, `null` and other non-strings.
pub fn pattern_operand<'a>(op: &str, v: &'a Json) -> Result<&'a str> {
    match v {
        Json::String(s) => Ok(s),
        other => Err(Error::invalid_operand(
            op,
            format!("expected a string, got {}", json_type(other)),
        )),
    }
}

/* ---------- LIKE helpers ---------- */

/// Escape character of every pattern built here; sent as `ESCAPE` with `LIKE`.
pub const LIKE_ESCAPE: char = '\\';

#[must_use]
pub fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '%' | '_' | LIKE_ESCAPE => {
                out.push(LIKE_ESCAPE);
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

#[must_use]
pub fn like_contains(s: &str) -> String {
    format!("%{}%", like_escape(s))
}

#[must_use]
pub fn like_starts(s: &str) -> String {
    format!("{}%", like_escape(s))
}

#[must_use]
pub fn like_ends(s: &str) -> String {
    format!("%{}", like_escape(s))
}
