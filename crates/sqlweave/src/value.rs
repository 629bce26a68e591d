//! Predicate values and their classification.
//!
//! Predicate builders need to know whether a value is NULL, a single bindable
//! scalar, or a list to expand into `IN (...)`. That decision is made from the
//! static type of the value through [`IntoValue`], never by inspecting it at
//! runtime.
//!
//! Byte sequences (`Vec<u8>`, `&'static [u8]`) are always scalars: they bind as
//! one `bytea` value and are never expanded into a list.

use crate::error::{BoxError, SqlError, SqlResult};
use crate::param::Param;
use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A value that knows how to unwrap itself into a bindable [`Value`].
///
/// This is the hook for nullable wrappers and driver-specific scalar types.
/// The unwrapped value is classified again, so a wrapper may resolve to NULL
/// or to a list.
pub trait Valuer: fmt::Debug + Send + Sync {
    /// Produce the underlying value.
    fn value(&self) -> Result<Value, BoxError>;
}

/// A classified predicate value.
#[derive(Clone, Debug)]
pub enum Value {
    /// SQL NULL
    Null,
    /// A single bindable value
    Scalar(Param),
    /// A sequence of bindable values
    List(Vec<Param>),
    /// A self-describing value, unwrapped at render time
    Valuer(Arc<dyn Valuer>),
}

impl Value {
    /// Create a scalar value.
    pub fn scalar<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Value::Scalar(Param::new(value))
    }

    /// Create a list value from any iterator of bindable values.
    pub fn list<T, I>(values: I) -> Self
    where
        T: ToSql + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
    {
        Value::List(values.into_iter().map(Param::new).collect())
    }

    /// Create a self-describing value.
    pub fn valuer<V: Valuer + 'static>(valuer: V) -> Self {
        Value::Valuer(Arc::new(valuer))
    }

    /// Unwrap self-describing values until a concrete classification remains.
    ///
    /// Any unwrap error is returned as [`SqlError::Valuer`].
    pub fn resolve(&self) -> SqlResult<Resolved> {
        let mut current = self.clone();
        loop {
            match current {
                Value::Null => return Ok(Resolved::Null),
                Value::Scalar(p) => return Ok(Resolved::Scalar(p)),
                Value::List(items) => return Ok(Resolved::List(items)),
                Value::Valuer(v) => current = v.value().map_err(SqlError::Valuer)?,
            }
        }
    }

    /// Check if this is `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// A [`Value`] with every self-describing layer unwrapped.
#[derive(Clone, Debug)]
pub enum Resolved {
    Null,
    Scalar(Param),
    List(Vec<Param>),
}

/// Conversion into a classified predicate [`Value`].
pub trait IntoValue {
    /// Classify `self`.
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for Param {
    fn into_value(self) -> Value {
        Value::Scalar(self)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}

impl IntoValue for Vec<u8> {
    fn into_value(self) -> Value {
        Value::scalar(self)
    }
}

impl IntoValue for &'static [u8] {
    fn into_value(self) -> Value {
        Value::scalar(self)
    }
}

macro_rules! impl_into_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::scalar(self)
                }
            }

            impl IntoValue for Vec<$ty> {
                fn into_value(self) -> Value {
                    Value::list(self)
                }
            }

            impl<const N: usize> IntoValue for [$ty; N] {
                fn into_value(self) -> Value {
                    Value::list(self)
                }
            }
        )*
    };
}

impl_into_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u32,
    f32,
    f64,
    String,
    &'static str,
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::Utc>,
    uuid::Uuid,
    serde_json::Value,
);
