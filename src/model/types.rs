//! Declared field types
//!
//! A field's type decides how raw row items are converted before display
//! and how edited input is converted before it is stored.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;

use super::value::CellValue;

const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y"];
const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%d";

/// Largest number of decimals a format string can ask for
const MAX_PRECISION: usize = 16;

/// The fixed set of primitive types a field can be retyped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldType {
    #[default]
    Untyped,
    String,
    Integer,
    Float,
    /// Length of the value's text
    Length,
    Date,
    Currency,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        FieldType::Untyped,
        FieldType::String,
        FieldType::Integer,
        FieldType::Float,
        FieldType::Length,
        FieldType::Date,
        FieldType::Currency,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Untyped => "anytype",
            FieldType::String => "str",
            FieldType::Integer => "int",
            FieldType::Float => "float",
            FieldType::Length => "vlen",
            FieldType::Date => "date",
            FieldType::Currency => "currency",
        }
    }

    /// Convert a value to this type.
    ///
    /// Returns `None` when the value cannot be represented; the caller
    /// decides whether that is an error (edits) or a display fallback.
    /// Null and empty text stay null for every type except `String`.
    pub fn coerce(&self, value: &CellValue) -> Option<CellValue> {
        if value.is_null() {
            return Some(CellValue::Null);
        }
        if let CellValue::Str(s) = value {
            if s.trim().is_empty() && !matches!(self, FieldType::String | FieldType::Untyped) {
                return Some(CellValue::Null);
            }
        }

        match self {
            FieldType::Untyped => Some(value.clone()),
            FieldType::String => Some(CellValue::Str(value.to_string())),
            FieldType::Integer => match value {
                CellValue::Int(i) => Some(CellValue::Int(*i)),
                CellValue::Float(x) if x.is_finite() => Some(CellValue::Int(x.trunc() as i64)),
                CellValue::Bool(b) => Some(CellValue::Int(i64::from(*b))),
                CellValue::Str(s) => s.trim().parse::<i64>().ok().map(CellValue::Int),
                _ => None,
            },
            FieldType::Float => match value {
                CellValue::Int(i) => Some(CellValue::Float(*i as f64)),
                CellValue::Float(x) => Some(CellValue::Float(*x)),
                CellValue::Bool(b) => Some(CellValue::Float(if *b { 1.0 } else { 0.0 })),
                CellValue::Str(s) => s.trim().parse::<f64>().ok().map(CellValue::Float),
                _ => None,
            },
            FieldType::Length => Some(CellValue::from(value.to_string().chars().count())),
            FieldType::Date => match value {
                CellValue::Date(d) => Some(CellValue::Date(*d)),
                CellValue::Str(s) => parse_date(s.trim()).map(CellValue::Date),
                _ => None,
            },
            FieldType::Currency => match value {
                CellValue::Int(i) => Some(CellValue::Float(*i as f64)),
                CellValue::Float(x) => Some(CellValue::Float(*x)),
                CellValue::Str(s) => parse_currency(s),
                _ => None,
            },
        }
    }

    /// Render an already-coerced value, honouring an optional format string.
    ///
    /// Numbers accept `{:.N}` or `%.Nf` precision; dates accept strftime.
    pub fn format(&self, value: &CellValue, fmtstr: &str) -> String {
        match value {
            CellValue::Null => String::new(),
            CellValue::Float(x) => {
                let precision = parse_precision(fmtstr).unwrap_or(2);
                format!("{:.*}", precision, x)
            }
            CellValue::Int(i) => match parse_precision(fmtstr) {
                Some(precision) => format!("{:.*}", precision, *i as f64),
                None => i.to_string(),
            },
            CellValue::Date(d) => format_date(d, fmtstr),
            other => other.to_string(),
        }
    }
}

/// Dates render with strftime; a pattern that is malformed or names fields
/// a date does not have falls back to ISO form.
fn format_date(date: &NaiveDate, fmtstr: &str) -> String {
    if fmtstr.is_empty() {
        return date.format(DATE_DISPLAY_FORMAT).to_string();
    }
    let items: Vec<Item<'_>> = StrftimeItems::new(fmtstr).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return date.format(DATE_DISPLAY_FORMAT).to_string();
    }
    let mut out = String::new();
    match write!(out, "{}", date.format_with_items(items.into_iter())) {
        Ok(()) => out,
        Err(_) => date.format(DATE_DISPLAY_FORMAT).to_string(),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_currency(s: &str) -> Option<CellValue> {
    let digits: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok().map(CellValue::Float)
}

fn parse_precision(fmtstr: &str) -> Option<usize> {
    let inner = fmtstr
        .strip_prefix("{:.")
        .and_then(|rest| rest.strip_suffix('}'))
        .or_else(|| {
            fmtstr
                .strip_prefix("%.")
                .and_then(|rest| rest.strip_suffix('f'))
        })?;
    inner
        .parse::<usize>()
        .ok()
        .map(|precision| precision.min(MAX_PRECISION))
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "any" | "anytype" => Ok(FieldType::Untyped),
            "str" | "string" => Ok(FieldType::String),
            "int" | "integer" => Ok(FieldType::Integer),
            "float" => Ok(FieldType::Float),
            "vlen" | "len" | "length" => Ok(FieldType::Length),
            "date" => Ok(FieldType::Date),
            "currency" => Ok(FieldType::Currency),
            other => Err(other.to_string()),
        }
    }
}
