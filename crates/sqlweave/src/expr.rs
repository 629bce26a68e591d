//! Raw SQL templates with positional arguments.
//!
//! An [`Expr`] is a constant template containing `?` markers plus the ordered
//! arguments that fill them. An argument is either a bound value or another
//! fragment; a fragment is rendered in place of its marker so that subqueries
//! and computed expressions can be spliced into a larger template while the
//! argument order stays aligned with the markers.
//!
//! ```ignore
//! let sub = select(["id"]).from("archived");
//! let e = Expr::new("owner = ? AND id IN (?)").bind(7i64).nest(sub);
//! // "owner = ? AND id IN (SELECT id FROM archived)", [7]
//! ```

use crate::conditional::Conditional;
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Fragment, FragmentRef, nested_to_sql};
use crate::param::{Param, ParamList};
use crate::safe::SafeStr;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// One positional argument of an [`Expr`].
#[derive(Clone, Debug)]
pub enum Arg {
    /// A value bound to its marker.
    Param(Param),
    /// A fragment rendered in place of its marker.
    Fragment(FragmentRef),
}

impl Arg {
    /// Wrap a bindable value.
    pub fn bind<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Arg::Param(Param::new(value))
    }

    /// Wrap a nested fragment.
    pub fn fragment(fragment: impl Fragment + 'static) -> Self {
        Arg::Fragment(Arc::new(fragment))
    }

    fn is_fragment(&self) -> bool {
        matches!(self, Arg::Fragment(_))
    }
}

impl From<Param> for Arg {
    fn from(param: Param) -> Self {
        Arg::Param(param)
    }
}

impl From<FragmentRef> for Arg {
    fn from(fragment: FragmentRef) -> Self {
        Arg::Fragment(fragment)
    }
}

/// A SQL template with `?` markers and the arguments that fill them.
///
/// `??` in the template is an escaped literal `?` and consumes no argument.
///
/// An `Expr` never rewrites markers. Nested statements are rendered raw, so
/// their placeholder format is ignored here: render the expression through a
/// statement (e.g. `select(..).and_where(expr)`) to get `$n` markers.
#[derive(Clone, Debug)]
pub struct Expr {
    sql: SafeStr,
    args: Vec<Arg>,
}

impl Expr {
    /// Create an expression with no arguments.
    pub fn new(sql: impl Into<SafeStr>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    /// Create an expression with a prepared argument list.
    pub fn with_args(sql: impl Into<SafeStr>, args: Vec<Arg>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    /// Append a bound value.
    pub fn bind<T: ToSql + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.args.push(Arg::bind(value));
        self
    }

    /// Append a nested fragment.
    pub fn nest(mut self, fragment: impl Fragment + 'static) -> Self {
        self.args.push(Arg::fragment(fragment));
        self
    }

    /// Append a prepared argument.
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// The template text.
    pub fn sql(&self) -> &str {
        self.sql.as_str()
    }

    /// The arguments in marker order.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    fn expand(&self) -> SqlResult<(String, ParamList)> {
        let mut out = String::with_capacity(self.sql.as_str().len());
        let mut params = ParamList::new();
        let mut rest = self.sql.as_str();
        let mut args = self.args.iter();
        let mut next = args.next();

        while let Some(arg) = next {
            let Some(i) = rest.find('?') else {
                break;
            };

            // `??` is copied through as-is and left for the placeholder pass.
            if rest[i + 1..].starts_with('?') {
                out.push_str(&rest[..i + 2]);
                rest = &rest[i + 2..];
                continue;
            }

            match arg {
                Arg::Fragment(fragment) => {
                    let (sql, nested) = nested_to_sql(fragment.as_ref())?;
                    out.push_str(&rest[..i]);
                    out.push_str(&sql);
                    params.append(nested);
                }
                Arg::Param(param) => {
                    out.push_str(&rest[..=i]);
                    params.push_param(param.clone());
                }
            }
            rest = &rest[i + 1..];
            next = args.next();
        }

        out.push_str(rest);

        for arg in next.into_iter().chain(args) {
            match arg {
                Arg::Param(param) => {
                    params.push_param(param.clone());
                }
                Arg::Fragment(_) => return Err(SqlError::UnboundFragment),
            }
        }

        Ok((out, params))
    }
}

impl Fragment for Expr {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        if !self.args.iter().any(Arg::is_fragment) {
            let params = self
                .args
                .iter()
                .filter_map(|arg| match arg {
                    Arg::Param(p) => Some(p.clone()),
                    Arg::Fragment(_) => None,
                })
                .collect();
            return Ok((self.sql.as_str().to_string(), params));
        }
        self.expand()
    }
}

/// An expression that renders only when `include` is true.
pub fn expr_if(expr: Expr, include: bool) -> Conditional<Expr> {
    Conditional::new(expr, include)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::FragmentExt;

    fn render(f: &dyn Fragment) -> (String, String) {
        let (sql, params) = f.to_sql().unwrap();
        (sql, format!("{params:?}"))
    }

    #[test]
    fn test_simple_passthrough() {
        let e = Expr::new("a = ? AND b ?? c").bind(1i32);
        assert_eq!(render(&e), ("a = ? AND b ?? c".into(), "[1]".into()));
    }

    #[test]
    fn test_simple_mismatch_is_not_checked() {
        let e = Expr::new("a = ?").bind(1i32).bind(2i32);
        assert_eq!(render(&e), ("a = ?".into(), "[1, 2]".into()));
    }

    #[test]
    fn test_nested_expansion() {
        let inner = Expr::new("SELECT id FROM t WHERE k = ?").bind("x");
        let e = Expr::new("a = ? AND id IN (?) AND b = ?")
            .bind(1i32)
            .nest(inner)
            .bind(2i32);
        assert_eq!(
            render(&e),
            (
                "a = ? AND id IN (SELECT id FROM t WHERE k = ?) AND b = ?".into(),
                r#"[1, "x", 2]"#.into()
            )
        );
    }

    #[test]
    fn test_escape_consumes_nothing() {
        let e = Expr::new("j ?? 'k' AND x = (?)").nest(Expr::new("y = ?").bind(3i32));
        assert_eq!(render(&e), ("j ?? 'k' AND x = (y = ?)".into(), "[3]".into()));
    }

    #[test]
    fn test_leftover_params_are_appended() {
        let e = Expr::new("x = ?").nest("NOW()").bind(5i32);
        assert_eq!(render(&e), ("x = NOW()".into(), "[5]".into()));
    }

    #[test]
    fn test_leftover_fragment_is_an_error() {
        let e = Expr::new("x = ?").bind(1i32).nest("NOW()");
        assert!(matches!(e.to_sql(), Err(SqlError::UnboundFragment)));
    }

    #[test]
    fn test_leftover_template_is_kept() {
        let e = Expr::new("f(?, ?, ?)").nest("1");
        assert_eq!(render(&e).0, "f(1, ?, ?)");
    }

    #[test]
    fn test_nested_error_propagates() {
        let failing = Expr::new("x = ?").bind(1i32).nest("extra");
        let e = Expr::new("a IN (?)").nest(failing);
        assert!(matches!(e.to_sql(), Err(SqlError::UnboundFragment)));
    }

    #[test]
    fn test_suppressed_nested_fragment() {
        let e = Expr::new("a = 1?").nest(Expr::new(" AND b = ?").bind(2i32).only_if(false));
        assert_eq!(render(&e), ("a = 1".into(), "[]".into()));
    }

    #[test]
    fn test_with_args() {
        let e = Expr::with_args(
            "COALESCE(?, ?)",
            vec![Arg::fragment("fallback"), Arg::bind(0i32)],
        );
        assert_eq!(render(&e), ("COALESCE(fallback, ?)".into(), "[0]".into()));
        assert_eq!(e.args().len(), 2);
        assert_eq!(e.sql(), "COALESCE(?, ?)");
    }

    #[test]
    fn test_idempotent() {
        let e = Expr::new("a = ? OR b IN (?)")
            .bind(1i32)
            .nest(Expr::new("?,?").bind(2i32).bind(3i32));
        assert_eq!(render(&e), render(&e));
    }

    #[test]
    fn test_expr_if() {
        assert_eq!(render(&expr_if(Expr::new("a = ?").bind(1i32), false)).0, "");
        assert_eq!(render(&expr_if(Expr::new("a = ?").bind(1i32), true)).0, "a = ?");
    }
}
