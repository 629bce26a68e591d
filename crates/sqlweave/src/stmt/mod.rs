//! Statement builders.
//!
//! Statements are immutable values: every setter consumes the builder and
//! returns the updated copy, so a partially built statement can be cloned and
//! extended in different directions. Each setter has an `*_if` variant that
//! leaves the builder untouched when its flag is false.
//!
//! Statements are fragments themselves. [`Fragment::to_sql`] applies the
//! configured placeholder format; when a statement is nested inside another
//! fragment it is rendered raw and only the outermost statement rewrites the
//! markers.
//!
//! ```ignore
//! use sqlweave::{select, Eq, PlaceholderFormat};
//!
//! let (sql, params) = select(["id", "name"])
//!     .from("users")
//!     .and_where(Eq::new().with("status", "active"))
//!     .order_by(["id"])
//!     .limit(20)
//!     .placeholder_format(PlaceholderFormat::DOLLAR)
//!     .to_sql()?;
//! // SELECT id, name FROM users WHERE status = $1 ORDER BY id LIMIT 20
//! ```

mod case;
mod delete;
mod insert;
mod select;
mod update;

pub use case::CaseBuilder;
pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use select::SelectBuilder;
pub use update::UpdateBuilder;

use crate::config::StatementConfig;
use crate::error::SqlResult;
use crate::fragment::{Fragment, FragmentRef, append_clause, append_to_sql};
use crate::param::ParamList;
use crate::placeholder::PlaceholderFormat;
use crate::safe::SafeStr;
use std::fmt::Write as _;
use std::sync::Arc;

/// A value paired with an inclusion flag, for list setters such as
/// [`SelectBuilder::columns_if`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValIf<T> {
    pub value: T,
    pub include: bool,
}

/// Pair `value` with an inclusion flag.
pub fn val_if<T>(value: T, include: bool) -> ValIf<T> {
    ValIf { value, include }
}

fn included<T>(items: impl IntoIterator<Item = ValIf<T>>) -> impl Iterator<Item = T> {
    items
        .into_iter()
        .filter(|item| item.include)
        .map(|item| item.value)
}

fn literal(sql: impl Into<SafeStr>) -> FragmentRef {
    let sql: SafeStr = sql.into();
    Arc::new(sql)
}

/// Parent of every statement: carries the placeholder format and WHERE parts
/// that each child statement starts with.
#[derive(Clone, Debug, Default)]
pub struct StatementBuilder {
    format: PlaceholderFormat,
    where_parts: Vec<FragmentRef>,
}

impl StatementBuilder {
    /// `?` placeholders and no default WHERE parts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from configuration.
    pub fn from_config(config: &StatementConfig) -> Self {
        Self::new().placeholder_format(config.placeholder_format.clone())
    }

    /// Set the placeholder format for child statements.
    pub fn placeholder_format(mut self, format: PlaceholderFormat) -> Self {
        self.format = format;
        self
    }

    /// Add a WHERE part that child SELECT, UPDATE and DELETE statements start with.
    pub fn and_where(mut self, pred: impl Fragment + 'static) -> Self {
        self.where_parts.push(Arc::new(pred));
        self
    }

    /// Start a SELECT with the given result columns.
    pub fn select<I, S>(&self, columns: I) -> SelectBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<SafeStr>,
    {
        SelectBuilder::with_defaults(self.format.clone(), self.where_parts.clone()).columns(columns)
    }

    /// Start a SELECT with the included columns, or `*` if none is included.
    pub fn select_if<I, S>(&self, columns: I) -> SelectBuilder
    where
        I: IntoIterator<Item = ValIf<S>>,
        S: Into<SafeStr>,
    {
        let columns: Vec<SafeStr> = included(columns).map(Into::into).collect();
        if columns.is_empty() {
            return self.select(["*"]);
        }
        self.select(columns)
    }

    /// Start an INSERT into `into`.
    pub fn insert(&self, into: impl Into<SafeStr>) -> InsertBuilder {
        InsertBuilder::with_keyword(self.format.clone(), SafeStr::new("INSERT")).into(into)
    }

    /// Start a REPLACE into `into`.
    pub fn replace(&self, into: impl Into<SafeStr>) -> InsertBuilder {
        InsertBuilder::with_keyword(self.format.clone(), SafeStr::new("REPLACE")).into(into)
    }

    /// Start an UPDATE of `table`.
    pub fn update(&self, table: impl Into<SafeStr>) -> UpdateBuilder {
        UpdateBuilder::with_defaults(self.format.clone(), self.where_parts.clone()).table(table)
    }

    /// Start a DELETE from `from`.
    pub fn delete(&self, from: impl Into<SafeStr>) -> DeleteBuilder {
        DeleteBuilder::with_defaults(self.format.clone(), self.where_parts.clone()).from(from)
    }
}

// ==================== Shared assembly ====================

/// `prefix1 prefix2 ` before the statement keyword.
fn append_prefixes(
    sql: &mut String,
    params: &mut ParamList,
    prefixes: &[FragmentRef],
) -> SqlResult<()> {
    let mut clause = String::new();
    append_to_sql(prefixes, &mut clause, " ", params)?;
    if !clause.is_empty() {
        sql.push_str(&clause);
        sql.push(' ');
    }
    Ok(())
}

fn append_suffixes(
    sql: &mut String,
    params: &mut ParamList,
    suffixes: &[FragmentRef],
) -> SqlResult<()> {
    append_clause(sql, params, " ", suffixes, " ")
}

fn append_limit_offset(sql: &mut String, limit: Option<u64>, offset: Option<u64>) {
    if let Some(limit) = limit {
        let _ = write!(sql, " LIMIT {limit}");
    }
    if let Some(offset) = offset {
        let _ = write!(sql, " OFFSET {offset}");
    }
}

/// Apply the placeholder format to a raw rendering and log the outcome.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn finish(
    statement: &'static str,
    format: &PlaceholderFormat,
    raw: SqlResult<(String, ParamList)>,
) -> SqlResult<(String, ParamList)> {
    match raw {
        Ok((sql, params)) => {
            let sql = format.replace_placeholders(&sql);
            #[cfg(feature = "tracing")]
            tracing::debug!(
                target: "sqlweave.sql",
                statement,
                param_count = params.len(),
                sql = %sql,
                "statement built"
            );
            Ok((sql, params))
        }
        Err(err) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                target: "sqlweave.sql",
                statement,
                error = %err,
                "statement failed to build"
            );
            Err(err)
        }
    }
}
