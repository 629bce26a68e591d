//! DELETE statement builder.

use super::{
    ValIf, append_limit_offset, append_prefixes, append_suffixes, finish, included, literal,
};
use crate::error::{SqlError, SqlResult};
use crate::expr::Expr;
use crate::fragment::{Fragment, FragmentRef, append_clause};
use crate::param::ParamList;
use crate::placeholder::PlaceholderFormat;
use crate::safe::SafeStr;
use std::sync::Arc;

/// DELETE statement builder.
#[derive(Clone, Debug, Default)]
pub struct DeleteBuilder {
    format: PlaceholderFormat,
    prefixes: Vec<FragmentRef>,
    from: SafeStr,
    where_parts: Vec<FragmentRef>,
    order_bys: Vec<FragmentRef>,
    limit: Option<u64>,
    offset: Option<u64>,
    suffixes: Vec<FragmentRef>,
}

impl DeleteBuilder {
    /// Create an empty DELETE with `?` placeholders.
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

    /// Set the placeholder format of the final SQL.
    pub fn placeholder_format(mut self, format: PlaceholderFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the placeholder format if `include` is true.
    pub fn placeholder_format_if(self, format: PlaceholderFormat, include: bool) -> Self {
        if include { self.placeholder_format(format) } else { self }
    }

    /// Add constant SQL before `DELETE`, e.g. a `WITH` clause.
    pub fn prefix(self, sql: impl Into<SafeStr>) -> Self {
        self.prefix_expr(Expr::new(sql))
    }

    /// Add a prefix if `include` is true.
    pub fn prefix_if(self, sql: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.prefix(sql) } else { self }
    }

    /// Add a fragment before `DELETE`.
    pub fn prefix_expr(mut self, expr: impl Fragment + 'static) -> Self {
        self.prefixes.push(Arc::new(expr));
        self
    }

    /// Add a prefix fragment if `include` is true.
    pub fn prefix_expr_if(self, expr: impl Fragment + 'static, include: bool) -> Self {
        if include { self.prefix_expr(expr) } else { self }
    }

    /// Set the table to delete from.
    pub fn from(mut self, from: impl Into<SafeStr>) -> Self {
        self.from = from.into();
        self
    }

    /// Set the table if `include` is true.
    pub fn from_if(self, from: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.from(from) } else { self }
    }

    /// Add a WHERE predicate. Predicates are ANDed together.
    pub fn and_where(mut self, pred: impl Fragment + 'static) -> Self {
        self.where_parts.push(Arc::new(pred));
        self
    }

    /// Add a WHERE predicate if `include` is true.
    pub fn and_where_if(self, pred: impl Fragment + 'static, include: bool) -> Self {
        if include { self.and_where(pred) } else { self }
    }

    /// Add ORDER BY expressions.
    pub fn order_by<I, S>(mut self, order_bys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SafeStr>,
    {
        self.order_bys.extend(order_bys.into_iter().map(literal));
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
}

impl Fragment for DeleteBuilder {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        finish("delete", &self.format, self.to_sql_raw())
    }

    fn to_sql_raw(&self) -> SqlResult<(String, ParamList)> {
        if self.from.is_empty() {
            return Err(SqlError::missing("delete statements must specify a From table"));
        }

        let mut sql = String::new();
        let mut params = ParamList::new();

        append_prefixes(&mut sql, &mut params, &self.prefixes)?;

        sql.push_str("DELETE FROM ");
        sql.push_str(self.from.as_str());

        append_clause(&mut sql, &mut params, " WHERE ", &self.where_parts, " AND ")?;
        append_clause(&mut sql, &mut params, " ORDER BY ", &self.order_bys, ", ")?;
        append_limit_offset(&mut sql, self.limit, self.offset);
        append_suffixes(&mut sql, &mut params, &self.suffixes)?;

        Ok((sql, params))
    }
}
