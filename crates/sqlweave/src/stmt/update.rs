//! UPDATE statement builder.

use super::{
    ValIf, append_limit_offset, append_prefixes, append_suffixes, finish, included, literal,
};
use crate::error::{SqlError, SqlResult};
use crate::expr::{Arg, Expr};
use crate::fragment::{Aliased, Fragment, FragmentRef, append_clause, required_to_sql};
use crate::param::ParamList;
use crate::placeholder::PlaceholderFormat;
use crate::safe::{SafeStr, SetMap};
use crate::stmt::SelectBuilder;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// UPDATE statement builder.
#[derive(Clone, Debug, Default)]
pub struct UpdateBuilder {
    format: PlaceholderFormat,
    prefixes: Vec<FragmentRef>,
    table: SafeStr,
    set_clauses: Vec<(SafeStr, Arg)>,
    from: Option<FragmentRef>,
    where_parts: Vec<FragmentRef>,
    order_bys: Vec<FragmentRef>,
    limit: Option<u64>,
    offset: Option<u64>,
    suffixes: Vec<FragmentRef>,
}

impl UpdateBuilder {
    /// Create an empty UPDATE with `?` placeholders.
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

    /// Add constant SQL before `UPDATE`, e.g. a `WITH` clause.
    pub fn prefix(self, sql: impl Into<SafeStr>) -> Self {
        self.prefix_expr(Expr::new(sql))
    }

    /// Add a prefix if `include` is true.
    pub fn prefix_if(self, sql: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.prefix(sql) } else { self }
    }

    /// Add a fragment before `UPDATE`.
    pub fn prefix_expr(mut self, expr: impl Fragment + 'static) -> Self {
        self.prefixes.push(Arc::new(expr));
        self
    }

    /// Add a prefix fragment if `include` is true.
    pub fn prefix_expr_if(self, expr: impl Fragment + 'static, include: bool) -> Self {
        if include { self.prefix_expr(expr) } else { self }
    }

    /// Set the table to update.
    pub fn table(mut self, table: impl Into<SafeStr>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the table if `include` is true.
    pub fn table_if(self, table: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.table(table) } else { self }
    }

    // ==================== SET ====================

    /// `column = ?`
    pub fn set<T: ToSql + Send + Sync + 'static>(self, column: impl Into<SafeStr>, value: T) -> Self {
        self.set_arg(column, Arg::bind(value))
    }

    /// `column = ?` if `include` is true.
    pub fn set_if<T: ToSql + Send + Sync + 'static>(
        self,
        column: impl Into<SafeStr>,
        value: T,
        include: bool,
    ) -> Self {
        if include { self.set(column, value) } else { self }
    }

    /// `column = <expr>`, e.g. `count = count + ?`.
    ///
    /// The expression must render something: wrapping it in
    /// [`only_if(false)`](crate::FragmentExt::only_if) makes the statement fail
    /// with [`SqlError::EmptyValue`]. Use [`set_expr_if`](Self::set_expr_if) to
    /// leave the column out instead.
    pub fn set_expr(self, column: impl Into<SafeStr>, expr: impl Fragment + 'static) -> Self {
        self.set_arg(column, Arg::fragment(expr))
    }

    /// `column = <expr>` if `include` is true.
    pub fn set_expr_if(
        self,
        column: impl Into<SafeStr>,
        expr: impl Fragment + 'static,
        include: bool,
    ) -> Self {
        if include { self.set_expr(column, expr) } else { self }
    }

    /// `column = (<select>)`
    pub fn set_select(self, column: impl Into<SafeStr>, select: SelectBuilder) -> Self {
        self.set_expr(column, Expr::new("(?)").nest(select))
    }

    /// `column = (<select>)` if `include` is true.
    pub fn set_select_if(
        self,
        column: impl Into<SafeStr>,
        select: SelectBuilder,
        include: bool,
    ) -> Self {
        if include { self.set_select(column, select) } else { self }
    }

    /// `column = <arg>`
    pub fn set_arg(mut self, column: impl Into<SafeStr>, arg: Arg) -> Self {
        self.set_clauses.push((column.into(), arg));
        self
    }

    /// `column = <arg>` if `include` is true.
    pub fn set_arg_if(self, column: impl Into<SafeStr>, arg: Arg, include: bool) -> Self {
        if include { self.set_arg(column, arg) } else { self }
    }

    /// Add one SET clause per entry of `clauses`, in column order.
    pub fn set_map(mut self, clauses: SetMap<Arg>) -> Self {
        self.set_clauses.extend(clauses);
        self
    }

    /// Add the SET clauses of `clauses` if `include` is true.
    pub fn set_map_if(self, clauses: SetMap<Arg>, include: bool) -> Self {
        if include { self.set_map(clauses) } else { self }
    }

    // ==================== FROM / WHERE ====================

    /// Set the FROM clause.
    pub fn from(mut self, from: impl Into<SafeStr>) -> Self {
        self.from = Some(literal(from));
        self
    }

    /// Set the FROM clause if `include` is true.
    pub fn from_if(self, from: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.from(from) } else { self }
    }

    /// `FROM (subquery) AS alias`
    pub fn from_select(mut self, from: SelectBuilder, alias: impl Into<SafeStr>) -> Self {
        self.from = Some(Arc::new(Aliased::new(from, alias)));
        self
    }

    /// `FROM (subquery) AS alias` if `include` is true.
    pub fn from_select_if(self, from: SelectBuilder, alias: impl Into<SafeStr>, include: bool) -> Self {
        if include { self.from_select(from, alias) } else { self }
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

    // ==================== ORDER BY / LIMIT / OFFSET ====================

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

    // ==================== Suffix ====================

    /// Add constant SQL after the statement, e.g. `RETURNING *`.
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

impl Fragment for UpdateBuilder {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        finish("update", &self.format, self.to_sql_raw())
    }

    fn to_sql_raw(&self) -> SqlResult<(String, ParamList)> {
        if self.table.is_empty() {
            return Err(SqlError::missing("update statements must specify a table"));
        }
        if self.set_clauses.is_empty() {
            return Err(SqlError::missing(
                "update statements must have at least one Set clause",
            ));
        }

        let mut sql = String::new();
        let mut params = ParamList::new();

        append_prefixes(&mut sql, &mut params, &self.prefixes)?;

        sql.push_str("UPDATE ");
        sql.push_str(self.table.as_str());
        sql.push_str(" SET ");

        for (i, (column, value)) in self.set_clauses.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(column.as_str());
            sql.push_str(" = ");
            match value {
                Arg::Param(p) => {
                    sql.push('?');
                    params.push_param(p.clone());
                }
                Arg::Fragment(f) => {
                    let (value_sql, value_params) =
                        required_to_sql(f.as_ref(), "update SET value")?;
                    sql.push_str(&value_sql);
                    params.append(value_params);
                }
            }
        }

        if let Some(from) = &self.from {
            append_clause(&mut sql, &mut params, " FROM ", std::slice::from_ref(from), "")?;
        }

        append_clause(&mut sql, &mut params, " WHERE ", &self.where_parts, " AND ")?;
        append_clause(&mut sql, &mut params, " ORDER BY ", &self.order_bys, ", ")?;
        append_limit_offset(&mut sql, self.limit, self.offset);
        append_suffixes(&mut sql, &mut params, &self.suffixes)?;

        Ok((sql, params))
    }
}
