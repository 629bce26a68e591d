//! Toggle any fragment on or off.

use crate::error::SqlResult;
use crate::fragment::Fragment;
use crate::param::ParamList;

/// A fragment that renders only when `include` is true.
///
/// When excluded it renders `("", [])` without touching the inner fragment,
/// so an inner fragment that would fail is never evaluated.
#[derive(Clone, Debug)]
pub struct Conditional<F> {
    inner: F,
    include: bool,
}

impl<F: Fragment> Conditional<F> {
    /// Wrap `inner`.
    pub fn new(inner: F, include: bool) -> Self {
        Self { inner, include }
    }

    /// Whether the inner fragment will be rendered.
    pub fn is_included(&self) -> bool {
        self.include
    }

    /// Unwrap the inner fragment.
    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F: Fragment> Fragment for Conditional<F> {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        if !self.include {
            return Ok((String::new(), ParamList::new()));
        }
        self.inner.to_sql()
    }

    fn to_sql_raw(&self) -> SqlResult<(String, ParamList)> {
        if !self.include {
            return Ok((String::new(), ParamList::new()));
        }
        self.inner.to_sql_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SqlError;
    use crate::expr::Expr;
    use crate::fragment::FragmentExt;

    #[derive(Debug)]
    struct Explodes;

    impl Fragment for Explodes {
        fn to_sql(&self) -> SqlResult<(String, ParamList)> {
            Err(SqlError::missing("should not render"))
        }
    }

    #[test]
    fn test_excluded_renders_nothing() {
        let (sql, params) = Expr::new("a = ?").bind(1i32).only_if(false).to_sql().unwrap();
        assert_eq!(sql, "");
        assert!(params.is_empty());
    }

    #[test]
    fn test_excluded_never_evaluates_inner() {
        assert!(Explodes.only_if(false).to_sql().is_ok());
        assert!(Explodes.only_if(true).to_sql().is_err());
    }

    #[test]
    fn test_included_is_transparent() {
        let expr = Expr::new("a = ? AND b = ?").bind(1i32).bind("x");
        let direct = expr.to_sql().unwrap();
        let wrapped = expr.clone().only_if(true).to_sql().unwrap();
        assert_eq!(direct.0, wrapped.0);
        assert_eq!(format!("{:?}", direct.1), format!("{:?}", wrapped.1));
    }
}
