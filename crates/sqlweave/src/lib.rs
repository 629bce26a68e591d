//! # sqlweave
//!
//! Composable, parameterized SQL built from a tree of typed fragments.
//!
//! ## Features
//!
//! - **One contract**: everything that produces SQL implements [`Fragment`]
//!   and renders to `(sql, params)`
//! - **Nesting keeps order**: subqueries and expressions spliced into a
//!   template contribute their arguments exactly where their markers were
//! - **Deterministic predicates**: [`Eq`], [`Lt`], [`Like`] and friends render
//!   columns in sorted order
//! - **Conditional pieces**: any fragment can be switched off with
//!   [`FragmentExt::only_if`] without leaving a dangling `AND` or keyword
//! - **Placeholder formats**: `?` while composing, rewritten once to `$1`,
//!   `:1` or `@p1` when the outermost statement is rendered
//!
//! ## Usage
//!
//! ```ignore
//! use sqlweave::prelude::*;
//!
//! let active = select(["id"])
//!     .from("sessions")
//!     .and_where(Gt::new().with("expires_at", now));
//!
//! let (sql, params) = select(["id", "name"])
//!     .from("users")
//!     .and_where(Expr::new("id IN (?)").nest(active))
//!     .and_where(Like::new().with("name", pattern).only_if(!pattern.is_empty()))
//!     .placeholder_format(PlaceholderFormat::DOLLAR)
//!     .to_sql()?;
//!
//! client.query(&sql, &params.as_refs()).await?;
//! ```

pub mod conditional;
pub mod config;
pub mod error;
pub mod expr;
pub mod fragment;
pub mod param;
pub mod placeholder;
pub mod pred;
pub mod prelude;
pub mod safe;
pub mod stmt;
pub mod value;

pub use conditional::Conditional;
pub use config::StatementConfig;
pub use error::{BoxError, SqlError, SqlResult};
pub use expr::{Arg, Expr, expr_if};
pub use fragment::{
    Aliased, And, Fragment, FragmentExt, FragmentRef, Joined, Or, append_to_sql, nested_to_sql,
};
pub use param::{Param, ParamList};
pub use placeholder::{PlaceholderFormat, placeholders};
pub use pred::{Eq, Gt, GtOrEq, ILike, Like, Lt, LtOrEq, NotEq, NotILike, NotLike};
pub use safe::{SafeStr, SetMap, join_safe_strs};
pub use stmt::{
    CaseBuilder, DeleteBuilder, InsertBuilder, SelectBuilder, StatementBuilder, UpdateBuilder,
    ValIf, val_if,
};
pub use value::{IntoValue, Resolved, Value, Valuer};

/// Start a SELECT with the given result columns.
///
/// # Example
/// ```ignore
/// let q = sqlweave::select(["id", "email"]).from("users");
/// ```
pub fn select<I, S>(columns: I) -> SelectBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<SafeStr>,
{
    StatementBuilder::new().select(columns)
}

/// Start a SELECT with the included columns, or `*` if none is included.
pub fn select_if<I, S>(columns: I) -> SelectBuilder
where
    I: IntoIterator<Item = ValIf<S>>,
    S: Into<SafeStr>,
{
    StatementBuilder::new().select_if(columns)
}

/// Start an INSERT into `into`.
pub fn insert(into: impl Into<SafeStr>) -> InsertBuilder {
    StatementBuilder::new().insert(into)
}

/// Start a REPLACE into `into`.
pub fn replace(into: impl Into<SafeStr>) -> InsertBuilder {
    StatementBuilder::new().replace(into)
}

/// Start an UPDATE of `table`.
pub fn update(table: impl Into<SafeStr>) -> UpdateBuilder {
    StatementBuilder::new().update(table)
}

/// Start a DELETE from `from`.
pub fn delete(from: impl Into<SafeStr>) -> DeleteBuilder {
    StatementBuilder::new().delete(from)
}

/// Start a searched CASE expression.
pub fn case() -> CaseBuilder {
    CaseBuilder::new()
}

/// Start a simple CASE expression comparing against `what`.
pub fn case_of(what: impl Fragment + 'static) -> CaseBuilder {
    CaseBuilder::of(what)
}
