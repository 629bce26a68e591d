//! Convenient imports for typical `sqlweave` usage.
//!
//! ```ignore
//! use sqlweave::prelude::*;
//! ```

pub use crate::{
    And, Arg, Eq, Expr, Fragment, FragmentExt, Gt, GtOrEq, ILike, Like, Lt, LtOrEq, NotEq,
    NotILike, NotLike, Or, PlaceholderFormat, SqlError, SqlResult, StatementBuilder, case,
    case_of, delete, expr_if, insert, replace, select, select_if, update, val_if,
};
