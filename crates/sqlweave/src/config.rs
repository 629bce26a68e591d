//! Statement-level configuration.
//!
//! ```toml
//! placeholder_format = "dollar"
//! ```

use crate::error::SqlResult;
use crate::placeholder::PlaceholderFormat;
use crate::stmt::StatementBuilder;
use serde::Deserialize;

/// Settings shared by every statement a [`StatementBuilder`] creates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatementConfig {
    /// Marker syntax of the final SQL. Defaults to `?`.
    pub placeholder_format: PlaceholderFormat,
}

impl StatementConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> SqlResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Create a statement builder with these settings.
    pub fn builder(&self) -> StatementBuilder {
        StatementBuilder::from_config(self)
    }
}
