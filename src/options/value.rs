//! Option values and their declared types

use std::fmt;

use crate::error::{MetaError, Result};
use crate::model::CellValue;

/// Type of an option, inferred from its declared default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    Bool,
    Int,
    Float,
    Str,
}

impl OptionType {
    pub fn name(&self) -> &'static str {
        match self {
            OptionType::Bool => "bool",
            OptionType::Int => "int",
            OptionType::Float => "float",
            OptionType::Str => "str",
        }
    }
}

/// Value of a configuration option
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl OptionValue {
    pub fn value_type(&self) -> OptionType {
        match self {
            OptionValue::Bool(_) => OptionType::Bool,
            OptionValue::Int(_) => OptionType::Int,
            OptionValue::Float(_) => OptionType::Float,
            OptionValue::Str(_) => OptionType::Str,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Parse text typed by the user into a value of type `ty`
    pub fn parse_as(input: &str, ty: OptionType, name: &str) -> Result<Self> {
        let trimmed = input.trim();
        let parsed = match ty {
            OptionType::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(OptionValue::Bool(true)),
                "false" | "no" | "off" | "0" | "" => Some(OptionValue::Bool(false)),
                _ => None,
            },
            OptionType::Int => trimmed.parse().ok().map(OptionValue::Int),
            OptionType::Float => trimmed.parse().ok().map(OptionValue::Float),
            OptionType::Str => Some(OptionValue::Str(input.to_string())),
        };
        parsed.ok_or_else(|| MetaError::coercion(name, input, ty.name()))
    }

    /// Convert to type `ty`, widening ints to floats and parsing text
    pub fn coerce_to(self, ty: OptionType, name: &str) -> Result<Self> {
        match (self, ty) {
            (value, ty) if value.value_type() == ty => Ok(value),
            (OptionValue::Int(i), OptionType::Float) => Ok(OptionValue::Float(i as f64)),
            (OptionValue::Str(s), ty) => Self::parse_as(&s, ty, name),
            (value, OptionType::Str) => Ok(OptionValue::Str(value.to_string())),
            (value, ty) => Err(MetaError::coercion(name, value.to_string(), ty.name())),
        }
    }

    /// Convert a TOML scalar from the config file
    pub fn from_toml(value: &toml::Value) -> Option<Self> {
        match value {
            toml::Value::Boolean(b) => Some(OptionValue::Bool(*b)),
            toml::Value::Integer(i) => Some(OptionValue::Int(*i)),
            toml::Value::Float(x) => Some(OptionValue::Float(*x)),
            toml::Value::String(s) => Some(OptionValue::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(i) => write!(f, "{}", i),
            OptionValue::Float(x) => write!(f, "{}", x),
            OptionValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<OptionValue> for CellValue {
    fn from(value: OptionValue) -> Self {
        match value {
            OptionValue::Bool(b) => CellValue::Bool(b),
            OptionValue::Int(i) => CellValue::Int(i),
            OptionValue::Float(x) => CellValue::Float(x),
            OptionValue::Str(s) => CellValue::Str(s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        OptionValue::Int(i)
    }
}

impl From<f64> for OptionValue {
    fn from(x: f64) -> Self {
        OptionValue::Float(x)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Str(s)
    }
}
