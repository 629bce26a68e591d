//! SELECT statement builder.

use super::{
    ValIf, append_limit_offset, append_prefixes, append_suffixes, finish, included, literal,
};
use crate::error::{SqlError, SqlResult};
use crate::expr::Expr;
use crate::fragment::{Aliased, Fragment, FragmentRef, append_clause, append_to_sql};
use crate::param::ParamList;
use crate::placeholder::PlaceholderFormat;
use crate::safe::{SafeStr, join_safe_strs};
use std::sync::Arc;

/// SELECT statement builder.
#[derive(Clone, Debug, Default)]
pub struct SelectBuilder {
    format: PlaceholderFormat,
    prefixes: Vec<FragmentRef>,
    options: Vec<SafeStr>,
    columns: Vec<FragmentRef>,
    from: Option<FragmentRef>,
    joins: Vec<FragmentRef>,
    where_parts: Vec<FragmentRef>,
    group_bys: Vec<SafeStr>,
    having_parts: Vec<FragmentRef>,
    order_by_parts: Vec<FragmentRef>,
    limit: Option<u64>,
    offset: Option<u64>,
    suffixes: Vec<FragmentRef>,
}

impl SelectBuilder {
    /// Create an empty SELECT with `?` placeholders.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_defaults(format: PlaceholderFormat, where_parts: Vec<FragmentRef>) -> Self {
        Self {
            format,
            where_parts,
            ..Self::default()
        }
    }

    // ==================== Format ====================

    /// Set the placeholder format of the final SQL.
    pub fn placeholder_format(mut self, format: PlaceholderFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the placeholder format if `include` is true.
    pub fn placeholder_format_if(self, format: PlaceholderFormat, include: bool) -> Self {
        if include { self.placeholder_format(format) } else { self }
    }

    // ==================== Prefix / options ====================

    /// Add constant SQL before `SELECT`, e.g. a `WITH` clause.
    pub fn prefix(self, sql: impl Into<SafeStr>) -> Self {
        self.prefix_expr(Expr::new(sql))
    }

    /// Add a prefix if `include` is true.
    pub fn prefix_if(self, sql: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.prefix(sql) } else { self }
    }

    /// Add a fragment before `SELECT`.
    pub fn prefix_expr(mut self, expr: impl Fragment + 'static) -> Self {
        self.prefixes.push(Arc::new(expr));
        self
    }

    /// Add a prefix fragment if `include` is true.
    pub fn prefix_expr_if(self, expr: impl Fragment + 'static, include: bool) -> Self {
        if include { self.prefix_expr(expr) } else { self }
    }

    /// `SELECT DISTINCT`
    pub fn distinct(self) -> Self {
        self.options(["DISTINCT"])
    }

    /// `SELECT DISTINCT` if `include` is true.
    pub fn distinct_if(self, include: bool) -> Self {
        if include { self.distinct() } else { self }
    }

    /// Add keywords between `SELECT` and the columns.
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SafeStr>,
    {
        self.options.extend(options.into_iter().map(Into::into));
        self
    }

    /// Add the included keywords between `SELECT` and the columns.
    pub fn options_if<I, S>(self, options: I) -> Self
    where
        I: IntoIterator<Item = ValIf<S>>,
        S: Into<SafeStr>,
    {
        self.options(included(options))
    }

    // ==================== Columns ====================

    /// Add result columns.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SafeStr>,
    {
        self.columns.extend(columns.into_iter().map(literal));
        self
    }

    /// Add the included result columns.
    pub fn columns_if<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = ValIf<S>>,
        S: Into<SafeStr>,
    {
        self.columns(included(columns))
    }

    /// Add a result column built from a fragment, e.g. a CASE or an aliased
    /// subquery.
    pub fn column(mut self, expr: impl Fragment + 'static) -> Self {
        self.columns.push(Arc::new(expr));
        self
    }

    /// Add a fragment result column if `include` is true.
    pub fn column_if(self, expr: impl Fragment + 'static, include: bool) -> Self {
        if include { self.column(expr) } else { self }
    }

    /// Drop every result column. A column must be added again before rendering.
    pub fn remove_columns(mut self) -> Self {
        self.columns.clear();
        self
    }

    /// Drop every result column if `include` is true.
    pub fn remove_columns_if(self, include: bool) -> Self {
        if include { self.remove_columns() } else { self }
    }

    // ==================== FROM / JOIN ====================

    /// Set the FROM clause.
    pub fn from(mut self, from: impl Into<SafeStr>) -> Self {
        self.from = Some(literal(from));
        self
    }

    /// Set the FROM clause if `include` is true.
    pub fn from_if(self, from: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.from(from) } else { self }
    }

    /// Set the FROM clause to `(subquery) AS alias`.
    pub fn from_select(mut self, from: SelectBuilder, alias: impl Into<SafeStr>) -> Self {
        self.from = Some(Arc::new(Aliased::new(from, alias)));
        self
    }

    /// Set the FROM clause to `(subquery) AS alias` if `include` is true.
    pub fn from_select_if(self, from: SelectBuilder, alias: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.from_select(from, alias) } else { self }
    }

    /// Add a complete join clause.
    pub fn join_clause(mut self, expr: impl Fragment + 'static) -> Self {
        self.joins.push(Arc::new(expr));
        self
    }

    /// Add a join clause if `include` is true.
    pub fn join_clause_if(self, expr: impl Fragment + 'static, include: bool) -> Self {
        if include { self.join_clause(expr) } else { self }
    }

    fn keyword_join(self, keyword: &'static str, join: impl Into<SafeStr>) -> Self {
        let sql = join_safe_strs(" ", [SafeStr::new(keyword), join.into()]);
        self.join_clause(sql)
    }

    /// `JOIN <join>`
    pub fn join(self, join: impl Into<SafeStr>) -> Self {
        self.keyword_join("JOIN", join)
    }

    /// `JOIN <join>` if `include` is true.
    pub fn join_if(self, join: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.join(join) } else { self }
    }

    /// `LEFT JOIN <join>`
    pub fn left_join(self, join: impl Into<SafeStr>) -> Self {
        self.keyword_join("LEFT JOIN", join)
    }

    /// `LEFT JOIN <join>` if `include` is true.
    pub fn left_join_if(self, join: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.left_join(join) } else { self }
    }

    /// `RIGHT JOIN <join>`
    pub fn right_join(self, join: impl Into<SafeStr>) -> Self {
        self.keyword_join("RIGHT JOIN", join)
    }

    /// `RIGHT JOIN <join>` if `include` is true.
    pub fn right_join_if(self, join: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.right_join(join) } else { self }
    }

    /// `INNER JOIN <join>`
    pub fn inner_join(self, join: impl Into<SafeStr>) -> Self {
        self.keyword_join("INNER JOIN", join)
    }

    /// `INNER JOIN <join>` if `include` is true.
    pub fn inner_join_if(self, join: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.inner_join(join) } else { self }
    }

    /// `CROSS JOIN <join>`
    pub fn cross_join(self, join: impl Into<SafeStr>) -> Self {
        self.keyword_join("CROSS JOIN", join)
    }

    /// `CROSS JOIN <join>` if `include` is true.
    pub fn cross_join_if(self, join: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.cross_join(join) } else { self }
    }

    // ==================== WHERE / GROUP BY / HAVING ====================

    /// Add a WHERE predicate. Predicates are ANDed together.
    pub fn and_where(mut self, pred: impl Fragment + 'static) -> Self {
        self.where_parts.push(Arc::new(pred));
        self
    }

    /// Add a WHERE predicate if `include` is true.
    pub fn and_where_if(self, pred: impl Fragment + 'static, include: bool) -> Self {
        if include { self.and_where(pred) } else { self }
    }

    /// Add GROUP BY expressions.
    pub fn group_by<I, S>(mut self, group_bys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SafeStr>,
    {
        self.group_bys.extend(group_bys.into_iter().map(Into::into));
        self
    }

    /// Add the included GROUP BY expressions.
    pub fn group_by_if<I, S>(self, group_bys: I) -> Self
    where
        I: IntoIterator<Item = ValIf<S>>,
        S: Into<SafeStr>,
    {
        self.group_by(included(group_bys))
    }

    /// Add a HAVING predicate. Predicates are ANDed together.
    pub fn having(mut self, pred: impl Fragment + 'static) -> Self {
        self.having_parts.push(Arc::new(pred));
        self
    }

    /// Add a HAVING predicate if `include` is true.
    pub fn having_if(self, pred: impl Fragment + 'static, include: bool) -> Self {
        if include { self.having(pred) } else { self }
    }

    // ==================== ORDER BY / LIMIT / OFFSET ====================

    /// Add an ORDER BY fragment, e.g. one with bound arguments.
    pub fn order_by_clause(mut self, expr: impl Fragment + 'static) -> Self {
        self.order_by_parts.push(Arc::new(expr));
        self
    }

    /// Add an ORDER BY fragment if `include` is true.
    pub fn order_by_clause_if(self, expr: impl Fragment + 'static, include: bool) -> Self {
        if include { self.order_by_clause(expr) } else { self }
    }

    /// Add ORDER BY expressions.
    pub fn order_by<I, S>(mut self, order_bys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SafeStr>,
    {
        self.order_by_parts.extend(order_bys.into_iter().map(literal));
        self
    }

    /// Add the included ORDER BY expressions.
    pub fn order_by_if<I, S>(self, order_bys: I) -> Self
    where
        I: IntoIterator<Item = ValIf<S>>,
        S: Into<SafeStr>,
    {
        self.order_by(included(order_bys))
    }

    /// Set `LIMIT n`.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set `LIMIT n` if `include` is true.
    pub fn limit_if(self, limit: u64, include: bool) -> Self {
        if include { self.limit(limit) } else { self }
    }

    /// Drop the LIMIT.
    pub fn remove_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    /// Drop the LIMIT if `include` is true.
    pub fn remove_limit_if(self, include: bool) -> Self {
        if include { self.remove_limit() } else { self }
    }

    /// Set `OFFSET n`.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set `OFFSET n` if `include` is true.
    pub fn offset_if(self, offset: u64, include: bool) -> Self {
        if include { self.offset(offset) } else { self }
    }

    /// Drop the OFFSET.
    pub fn remove_offset(mut self) -> Self {
        self.offset = None;
        self
    }

    /// Drop the OFFSET if `include` is true.
    pub fn remove_offset_if(self, include: bool) -> Self {
        if include { self.remove_offset() } else { self }
    }

    // ==================== Suffix ====================

    /// Add constant SQL after the statement, e.g. `FOR UPDATE`.
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
}

impl Fragment for SelectBuilder {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        finish("select", &self.format, self.to_sql_raw())
    }

    fn to_sql_raw(&self) -> SqlResult<(String, ParamList)> {
        if self.columns.is_empty() {
            return Err(SqlError::missing(
                "select statements must have at least one result column",
            ));
        }

        let mut sql = String::new();
        let mut params = ParamList::new();

        append_prefixes(&mut sql, &mut params, &self.prefixes)?;

        sql.push_str("SELECT ");
        for option in &self.options {
            sql.push_str(option.as_str());
            sql.push(' ');
        }

        append_to_sql(&self.columns, &mut sql, ", ", &mut params)?;

        if let Some(from) = &self.from {
            append_clause(&mut sql, &mut params, " FROM ", std::slice::from_ref(from), "")?;
        }

        append_clause(&mut sql, &mut params, " ", &self.joins, " ")?;
        append_clause(&mut sql, &mut params, " WHERE ", &self.where_parts, " AND ")?;

        if !self.group_bys.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(join_safe_strs(", ", self.group_bys.iter().cloned()).as_str());
        }

        append_clause(&mut sql, &mut params, " HAVING ", &self.having_parts, " AND ")?;
        append_clause(&mut sql, &mut params, " ORDER BY ", &self.order_by_parts, ", ")?;
        append_limit_offset(&mut sql, self.limit, self.offset);
        append_suffixes(&mut sql, &mut params, &self.suffixes)?;

        Ok((sql, params))
    }
}
