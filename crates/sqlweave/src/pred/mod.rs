//! Predicates built from column → value mappings.
//!
//! Each predicate type holds a sorted mapping, so the rendered text and the
//! argument order are the same no matter which order the columns were added
//! in. Multiple columns are joined with ` AND `.
//!
//! | type       | scalar      | NULL          | list            | empty list |
//! |------------|-------------|---------------|-----------------|------------|
//! | `Eq`       | `c = ?`     | `c IS NULL`   | `c IN (?,?)`    | `(1=0)`    |
//! | `NotEq`    | `c <> ?`    | `c IS NOT NULL` | `c NOT IN (?,?)` | `(1=1)` |
//! | `Like` ... | `c LIKE ?`  | error         | error           | error      |
//! | `Lt` ...   | `c < ?`     | error         | error           | error      |
//!
//! An empty `Eq`/`NotEq` renders `(1=1)` so it can always be ANDed into a
//! larger clause. An empty pattern or ordering predicate renders nothing.

use crate::error::{SqlError, SqlResult};
use crate::fragment::{Fragment, SQL_FALSE, SQL_TRUE};
use crate::param::ParamList;
use crate::placeholder::placeholders;
use crate::safe::SafeStr;
use crate::value::{IntoValue, Resolved, Value};
use std::collections::BTreeMap;

const LIKE_OPERATORS: &str = "like";
const ORDERING_OPERATORS: &str = "less than or greater than";

type Mapping = BTreeMap<SafeStr, Value>;

fn equality(map: &Mapping, negate: bool) -> SqlResult<(String, ParamList)> {
    if map.is_empty() {
        return Ok((SQL_TRUE.to_string(), ParamList::new()));
    }

    let (op, in_op, null_op, empty_list) = if negate {
        ("<>", "NOT IN", "IS NOT NULL", SQL_TRUE)
    } else {
        ("=", "IN", "IS NULL", SQL_FALSE)
    };

    let mut exprs = Vec::with_capacity(map.len());
    let mut params = ParamList::new();
    for (column, value) in map {
        let expr = match value.resolve()? {
            Resolved::Null => format!("{column} {null_op}"),
            Resolved::List(items) if items.is_empty() => empty_list.to_string(),
            Resolved::List(items) => {
                let marks = placeholders(items.len());
                params.extend_params(items);
                format!("{column} {in_op} ({marks})")
            }
            Resolved::Scalar(p) => {
                params.push_param(p);
                format!("{column} {op} ?")
            }
        };
        exprs.push(expr);
    }
    Ok((exprs.join(" AND "), params))
}

/// Shared body of the pattern and ordering families: scalars only.
fn comparison(map: &Mapping, op: &str, family: &'static str) -> SqlResult<(String, ParamList)> {
    let mut exprs = Vec::with_capacity(map.len());
    let mut params = ParamList::new();
    for (column, value) in map {
        match value.resolve()? {
            Resolved::Null => return Err(SqlError::unsupported("null", family)),
            Resolved::List(_) => return Err(SqlError::unsupported("array or slice", family)),
            Resolved::Scalar(p) => {
                params.push_param(p);
                exprs.push(format!("{column} {op} ?"));
            }
        }
    }
    Ok((exprs.join(" AND "), params))
}

fn pattern(map: &Mapping, op: &str) -> SqlResult<(String, ParamList)> {
    comparison(map, op, LIKE_OPERATORS)
}

fn ordering(map: &Mapping, opposite: bool, or_eq: bool) -> SqlResult<(String, ParamList)> {
    let op = match (opposite, or_eq) {
        (false, false) => "<",
        (false, true) => "<=",
        (true, false) => ">",
        (true, true) => ">=",
    };
    comparison(map, op, ORDERING_OPERATORS)
}

macro_rules! predicate {
    ($(#[$meta:meta])* $name:ident => $render:ident($($arg:expr),*)) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default)]
        pub struct $name(Mapping);

        impl $name {
            /// Create an empty predicate.
            pub fn new() -> Self {
                Self::default()
            }

            /// Return a copy with `column` mapped to `value`, replacing any
            /// previous value for that column.
            pub fn with(mut self, column: impl Into<SafeStr>, value: impl IntoValue) -> Self {
                self.0.insert(column.into(), value.into_value());
                self
            }

            /// Number of columns.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Check if no column has been added.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl<K: Into<SafeStr>, V: IntoValue> FromIterator<(K, V)> for $name {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                Self(
                    iter.into_iter()
                        .map(|(k, v)| (k.into(), v.into_value()))
                        .collect(),
                )
            }
        }

        impl Fragment for $name {
            fn to_sql(&self) -> SqlResult<(String, ParamList)> {
                $render(&self.0, $($arg),*)
            }
        }
    };
}

predicate! {
    /// `column = ?`, `column IN (...)` or `column IS NULL` per column.
    ///
    /// ```ignore
    /// let p = Eq::new().with("status", "active").with("id", vec![1i64, 2]);
    /// // "id IN (?,?) AND status = ?", [1, 2, "active"]
    /// ```
    Eq => equality(false)
}

predicate! {
    /// `column <> ?`, `column NOT IN (...)` or `column IS NOT NULL` per column.
    NotEq => equality(true)
}

predicate! {
    /// `column LIKE ?`
    Like => pattern("LIKE")
}

predicate! {
    /// `column NOT LIKE ?`
    NotLike => pattern("NOT LIKE")
}

predicate! {
    /// `column ILIKE ?` (case-insensitive)
    ILike => pattern("ILIKE")
}

predicate! {
    /// `column NOT ILIKE ?`
    NotILike => pattern("NOT ILIKE")
}

predicate! {
    /// `column < ?`
    Lt => ordering(false, false)
}

predicate! {
    /// `column <= ?`
    LtOrEq => ordering(false, true)
}

predicate! {
    /// `column > ?`
    Gt => ordering(true, false)
}

predicate! {
    /// `column >= ?`
    GtOrEq => ordering(true, true)
}

#[cfg(test)]
mod tests;
