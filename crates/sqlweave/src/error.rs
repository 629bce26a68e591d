//! Error types for sqlweave

use thiserror::Error;

/// Boxed error returned by [`Valuer`](crate::Valuer) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for fragment rendering
pub type SqlResult<T> = Result<T, SqlError>;

/// Error types for building SQL
#[derive(Debug, Error)]
pub enum SqlError {
    /// A statement is missing a clause it cannot be rendered without
    #[error("{0}")]
    MissingClause(&'static str),

    /// A predicate operator received a value it has no SQL form for
    #[error("cannot use {kind} with {operator} operators")]
    UnsupportedValue {
        kind: &'static str,
        operator: &'static str,
    },

    /// A self-describing value failed to produce its underlying value
    #[error("failed to resolve value: {0}")]
    Valuer(#[source] BoxError),

    /// An expression was given a nested fragment with no placeholder left to expand into
    #[error("nested fragment has no placeholder to expand into")]
    UnboundFragment,

    /// A fragment in a value position (SET value, VALUES cell, CASE branch,
    /// aliased expression) rendered no SQL
    #[error("{0} rendered empty")]
    EmptyValue(&'static str),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl SqlError {
    /// Create a missing clause error
    pub fn missing(message: &'static str) -> Self {
        Self::MissingClause(message)
    }

    /// Create an unsupported value error
    pub fn unsupported(kind: &'static str, operator: &'static str) -> Self {
        Self::UnsupportedValue { kind, operator }
    }

    /// Create an empty value error
    pub fn empty_value(position: &'static str) -> Self {
        Self::EmptyValue(position)
    }

    /// Check if this is a missing clause error
    pub fn is_missing_clause(&self) -> bool {
        matches!(self, Self::MissingClause(_))
    }

    /// Check if this is an unsupported value error
    pub fn is_unsupported_value(&self) -> bool {
        matches!(self, Self::UnsupportedValue { .. })
    }

    /// Check if this is an empty value error
    pub fn is_empty_value(&self) -> bool {
        matches!(self, Self::EmptyValue(_))
    }
}

impl From<toml::de::Error> for SqlError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
