//! INSERT / REPLACE statement builder.

use super::{ValIf, append_prefixes, append_suffixes, finish, included};
use crate::error::{SqlError, SqlResult};
use crate::expr::{Arg, Expr};
use crate::fragment::{Fragment, FragmentRef, nested_to_sql, required_to_sql};
use crate::param::ParamList;
use crate::placeholder::PlaceholderFormat;
use crate::safe::{SafeStr, SetMap, join_safe_strs};
use crate::stmt::SelectBuilder;
use std::sync::Arc;

/// INSERT (or REPLACE) statement builder.
///
/// Rows are lists of [`Arg`]: a bound value renders as `?`, a fragment is
/// rendered in place, e.g. `NOW()` or a subquery.
#[derive(Clone, Debug)]
pub struct InsertBuilder {
    format: PlaceholderFormat,
    prefixes: Vec<FragmentRef>,
    keyword: SafeStr,
    options: Vec<SafeStr>,
    into: SafeStr,
    columns: Vec<SafeStr>,
    values: Vec<Vec<Arg>>,
    select: Option<SelectBuilder>,
    suffixes: Vec<FragmentRef>,
}

impl Default for InsertBuilder {
    fn default() -> Self {
        Self::with_keyword(PlaceholderFormat::default(), SafeStr::new("INSERT"))
    }
}

impl InsertBuilder {
    /// Create an empty INSERT with `?` placeholders.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_keyword(format: PlaceholderFormat, keyword: SafeStr) -> Self {
        Self {
            format,
            prefixes: Vec::new(),
            keyword,
            options: Vec::new(),
            into: SafeStr::default(),
            columns: Vec::new(),
            values: Vec::new(),
            select: None,
            suffixes: Vec::new(),
        }
    }

    /// Set the placeholder format of the final SQL.
    pub fn placeholder_format(mut self, format: PlaceholderFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the placeholder format if `include` is true.
    pub fn placeholder_format_if(self, format: PlaceholderFormat, include: bool) -> Self {
        if include { self.placeholder_format(format) } else { self }
    }

    /// Add constant SQL before the statement keyword.
    pub fn prefix(self, sql: impl Into<SafeStr>) -> Self {
        self.prefix_expr(Expr::new(sql))
    }

    /// Add a prefix if `include` is true.
    pub fn prefix_if(self, sql: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.prefix(sql) } else { self }
    }

    /// Add a fragment before the statement keyword.
    pub fn prefix_expr(mut self, expr: impl Fragment + 'static) -> Self {
        self.prefixes.push(Arc::new(expr));
        self
    }

    /// Add a prefix fragment if `include` is true.
    pub fn prefix_expr_if(self, expr: impl Fragment + 'static, include: bool) -> Self {
        if include { self.prefix_expr(expr) } else { self }
    }

    /// Add keywords between `INSERT` and `INTO`, e.g. `IGNORE`.
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SafeStr>,
    {
        self.options.extend(options.into_iter().map(Into::into));
        self
    }

    /// Add the included keywords between `INSERT` and `INTO`.
    pub fn options_if<I, S>(self, options: I) -> Self
    where
        I: IntoIterator<Item = ValIf<S>>,
        S: Into<SafeStr>,
    {
        self.options(included(options))
    }

    /// Set the target table.
    pub fn into(mut self, into: impl Into<SafeStr>) -> Self {
        self.into = into.into();
        self
    }

    /// Set the target table if `include` is true.
    pub fn into_if(self, into: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.into(into) } else { self }
    }

    /// Add column names.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SafeStr>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add the included column names.
    pub fn columns_if<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = ValIf<S>>,
        S: Into<SafeStr>,
    {
        self.columns(included(columns))
    }

    /// Add a row of values.
    ///
    /// Every fragment in the row must render something; a suppressed cell
    /// makes the statement fail with [`SqlError::EmptyValue`] instead of
    /// leaving a hole in the tuple.
    pub fn values(mut self, row: impl IntoIterator<Item = Arg>) -> Self {
        self.values.push(row.into_iter().collect());
        self
    }

    /// Add a row of values if `include` is true.
    pub fn values_if(self, row: impl IntoIterator<Item = Arg>, include: bool) -> Self {
        if include { self.values(row) } else { self }
    }

    /// Replace columns and values with a single row taken from `clauses`, in
    /// column order.
    pub fn set_map(mut self, clauses: SetMap<Arg>) -> Self {
        let (columns, row): (Vec<SafeStr>, Vec<Arg>) = clauses.into_iter().unzip();
        self.columns = columns;
        self.values = vec![row];
        self
    }

    /// Replace columns and values from `clauses` if `include` is true.
    pub fn set_map_if(self, clauses: SetMap<Arg>, include: bool) -> Self {
        if include { self.set_map(clauses) } else { self }
    }

    /// Insert the rows of a SELECT instead of `VALUES`.
    pub fn select(mut self, select: SelectBuilder) -> Self {
        self.select = Some(select);
        self
    }

    /// Insert the rows of a SELECT if `include` is true.
    pub fn select_if(self, select: SelectBuilder, include: bool) -> Self {
        if include { self.select(select) } else { self }
    }

    /// Add constant SQL after the statement, e.g. `RETURNING id`.
    pub fn suffix(self, sql: impl Into<SafeStr>) -> Self {
        self.suffix_expr(Expr::new(sql))
    }

    /// Add a suffix if `include` is true.
    pub fn suffix_if(self, sql: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.suffix(sql) } else { self }
    }

    /// Add a fragment after the statement.
    pub fn suffix_expr(mut self, expr: impl Fragment + 'static) -> Self {
        self.suffixes.push(Arc::new(expr));
        self
    }

    /// Add a suffix fragment if `include` is true.
    pub fn suffix_expr_if(self, expr: impl Fragment + 'static, include: bool) -> Self {
        if include { self.suffix_expr(expr) } else { self }
    }

    fn append_values(&self, sql: &mut String, params: &mut ParamList) -> SqlResult<()> {
        sql.push_str("VALUES ");
        for (r, row) in self.values.iter().enumerate() {
            if r > 0 {
                sql.push(',');
            }
            sql.push('(');
            for (v, value) in row.iter().enumerate() {
                if v > 0 {
                    sql.push(',');
                }
                match value {
                    Arg::Param(p) => {
                        sql.push('?');
                        params.push_param(p.clone());
                    }
                    Arg::Fragment(f) => {
                        let (value_sql, value_params) =
                            required_to_sql(f.as_ref(), "insert value")?;
                        sql.push_str(&value_sql);
                        params.append(value_params);
                    }
                }
            }
            sql.push(')');
        }
        Ok(())
    }
}

impl Fragment for InsertBuilder {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        finish("insert", &self.format, self.to_sql_raw())
    }

    fn to_sql_raw(&self) -> SqlResult<(String, ParamList)> {
        if self.into.is_empty() {
            return Err(SqlError::missing("insert statements must specify a table"));
        }
        if self.values.is_empty() && self.select.is_none() {
            return Err(SqlError::missing(
                "insert statements must have at least one set of values or select clause",
            ));
        }

        let mut sql = String::new();
        let mut params = ParamList::new();

        append_prefixes(&mut sql, &mut params, &self.prefixes)?;

        sql.push_str(self.keyword.as_str());
        sql.push(' ');
        for option in &self.options {
            sql.push_str(option.as_str());
            sql.push(' ');
        }

        sql.push_str("INTO ");
        sql.push_str(self.into.as_str());
        sql.push(' ');

        if !self.columns.is_empty() {
            sql.push('(');
            sql.push_str(join_safe_strs(",", self.columns.iter().cloned()).as_str());
            sql.push_str(") ");
        }

        match &self.select {
            Some(select) => {
                let (select_sql, select_params) = nested_to_sql(select)?;
                sql.push_str(&select_sql);
                params.append(select_params);
            }
            None => self.append_values(&mut sql, &mut params)?,
        }

        append_suffixes(&mut sql, &mut params, &self.suffixes)?;

        Ok((sql, params))
    }
}
