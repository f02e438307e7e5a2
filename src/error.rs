//! Crate error type
//!
//! Errors are always local to the command that raised them: the dispatch
//! layer turns them into status entries instead of letting them escape.

use thiserror::Error;

use crate::config::KeyParseError;

#[derive(Error, Debug)]
pub enum MetaError {
    #[error("nothing to operate on")]
    NothingSelected,
    #[error("cannot convert {input:?} to {expected} for {attr}")]
    Coercion {
        attr: String,
        input: String,
        expected: String,
    },
    #[error("{0} is read-only")]
    ReadOnly(String),
    #[error("no such option: {0}")]
    UnknownOption(String),
    #[error("no such attribute: {0}")]
    UnknownAttribute(String),
    #[error("no such command: {0}")]
    UnknownCommand(String),
    #[error("source table is gone: {0}")]
    StaleSource(String),
    #[error("command reference unavailable: {0}")]
    ReferenceLoad(String),
    #[error("bad key notation: {0}")]
    KeyParse(#[from] KeyParseError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MetaError {
    pub fn coercion(
        attr: impl Into<String>,
        input: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        MetaError::Coercion {
            attr: attr.into(),
            input: input.into(),
            expected: expected.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MetaError>;
