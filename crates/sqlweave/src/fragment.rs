//! The fragment contract and the clause join primitive.
//!
//! Every composable piece of SQL implements [`Fragment`]: render to SQL text
//! with `?` markers plus the ordered values bound to them. Composite fragments
//! only ever talk to their children through this trait.

use crate::conditional::Conditional;
use crate::error::{SqlError, SqlResult};
use crate::param::ParamList;
use crate::safe::SafeStr;
use std::fmt;
use std::sync::Arc;

/// Always-true SQL literal.
pub(crate) const SQL_TRUE: &str = "(1=1)";
/// Always-false SQL literal.
pub(crate) const SQL_FALSE: &str = "(1=0)";

/// Something that renders to SQL text plus its bound values.
///
/// Rendering takes `&self` and must return the same result every time.
/// An empty SQL string with `Ok` means "contributes nothing"; composites skip
/// such fragments.
pub trait Fragment: fmt::Debug + Send + Sync {
    /// Render the fragment in its final form.
    fn to_sql(&self) -> SqlResult<(String, ParamList)>;

    /// Render without applying a statement's placeholder format.
    ///
    /// Composites render children through this method so that a nested
    /// statement keeps `?` markers until the outermost statement numbers them.
    /// A statement's own format therefore only applies when it is the root:
    /// an [`Expr`](crate::Expr) wrapping a `$n` statement still renders `?`.
    /// Wrap the whole tree in a statement, or call
    /// [`PlaceholderFormat::replace_placeholders`](crate::PlaceholderFormat::replace_placeholders)
    /// on the result, to get numbered markers.
    fn to_sql_raw(&self) -> SqlResult<(String, ParamList)> {
        self.to_sql()
    }
}

/// A shared, type-erased fragment.
pub type FragmentRef = Arc<dyn Fragment>;

impl<F: Fragment + ?Sized> Fragment for Arc<F> {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        (**self).to_sql()
    }

    fn to_sql_raw(&self) -> SqlResult<(String, ParamList)> {
        (**self).to_sql_raw()
    }
}

impl<F: Fragment + ?Sized> Fragment for Box<F> {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        (**self).to_sql()
    }

    fn to_sql_raw(&self) -> SqlResult<(String, ParamList)> {
        (**self).to_sql_raw()
    }
}

impl<F: Fragment + ?Sized> Fragment for &F {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        (**self).to_sql()
    }

    fn to_sql_raw(&self) -> SqlResult<(String, ParamList)> {
        (**self).to_sql_raw()
    }
}

/// String literals are passed through verbatim with no values.
impl Fragment for str {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        Ok((self.to_string(), ParamList::new()))
    }
}

/// Combinators available on every sized fragment.
pub trait FragmentExt: Fragment + Sized + 'static {
    /// Render this fragment only when `include` is true.
    fn only_if(self, include: bool) -> Conditional<Self> {
        Conditional::new(self, include)
    }

    /// Render as `(sql) AS alias`.
    fn alias(self, alias: impl Into<SafeStr>) -> Aliased {
        Aliased::new(self, alias)
    }

    /// Erase the type for storage in heterogeneous lists.
    fn boxed(self) -> FragmentRef {
        Arc::new(self)
    }
}

impl<F: Fragment + Sized + 'static> FragmentExt for F {}

/// Render a child fragment as part of a larger one.
pub fn nested_to_sql(fragment: &dyn Fragment) -> SqlResult<(String, ParamList)> {
    fragment.to_sql_raw()
}

/// Render a child that sits in a value position and must produce SQL.
///
/// `position` names the slot in the error, e.g. `"update SET value"`.
pub(crate) fn required_to_sql(
    fragment: &dyn Fragment,
    position: &'static str,
) -> SqlResult<(String, ParamList)> {
    let (sql, params) = nested_to_sql(fragment)?;
    if sql.is_empty() {
        return Err(SqlError::empty_value(position));
    }
    Ok((sql, params))
}

/// Render `parts` in order into `sql`, separated by `sep`, collecting values
/// into `params`.
///
/// Parts that render empty are skipped without a separator, so a suppressed
/// fragment leaves no trace. The first error aborts the whole join; the
/// caller must discard whatever was written so far.
pub fn append_to_sql(
    parts: &[FragmentRef],
    sql: &mut String,
    sep: &str,
    params: &mut ParamList,
) -> SqlResult<()> {
    let mut written = false;
    for part in parts {
        let (part_sql, part_params) = nested_to_sql(part.as_ref())?;
        if part_sql.is_empty() {
            continue;
        }
        if written {
            sql.push_str(sep);
        }
        sql.push_str(&part_sql);
        params.append(part_params);
        written = true;
    }
    Ok(())
}

/// Append `keyword` followed by the joined parts, or nothing at all when every
/// part renders empty.
pub(crate) fn append_clause(
    sql: &mut String,
    params: &mut ParamList,
    keyword: &str,
    parts: &[FragmentRef],
    sep: &str,
) -> SqlResult<()> {
    if parts.is_empty() {
        return Ok(());
    }
    let mut clause = String::new();
    append_to_sql(parts, &mut clause, sep, params)?;
    if !clause.is_empty() {
        sql.push_str(keyword);
        sql.push_str(&clause);
    }
    Ok(())
}

/// A list of fragments joined by a separator.
#[derive(Clone, Debug)]
pub struct Joined {
    parts: Vec<FragmentRef>,
    sep: SafeStr,
}

impl Joined {
    /// Create an empty list with the given separator.
    pub fn new(sep: impl Into<SafeStr>) -> Self {
        Self {
            parts: Vec::new(),
            sep: sep.into(),
        }
    }

    /// Return a copy with `part` appended.
    pub fn with(mut self, part: impl Fragment + 'static) -> Self {
        self.parts.push(Arc::new(part));
        self
    }

    /// Number of parts (including ones that may render empty).
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if there are no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl Fragment for Joined {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        let mut sql = String::new();
        let mut params = ParamList::new();
        append_to_sql(&self.parts, &mut sql, self.sep.as_str(), &mut params)?;
        Ok((sql, params))
    }
}

fn conjunction(
    parts: &[FragmentRef],
    sep: &str,
    empty: &str,
) -> SqlResult<(String, ParamList)> {
    if parts.is_empty() {
        return Ok((empty.to_string(), ParamList::new()));
    }
    let mut sql = String::new();
    let mut params = ParamList::new();
    append_to_sql(parts, &mut sql, sep, &mut params)?;
    if sql.is_empty() {
        return Ok((sql, params));
    }
    Ok((format!("({sql})"), params))
}

/// AND group: `(a AND b ...)`. An empty group is always true.
#[derive(Clone, Debug, Default)]
pub struct And {
    parts: Vec<FragmentRef>,
}

impl And {
    /// Create an empty AND group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `part` appended.
    pub fn with(mut self, part: impl Fragment + 'static) -> Self {
        self.parts.push(Arc::new(part));
        self
    }
}

impl FromIterator<FragmentRef> for And {
    fn from_iter<I: IntoIterator<Item = FragmentRef>>(iter: I) -> Self {
        Self {
            parts: iter.into_iter().collect(),
        }
    }
}

impl Fragment for And {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        conjunction(&self.parts, " AND ", SQL_TRUE)
    }
}

/// OR group: `(a OR b ...)`. An empty group is always false.
#[derive(Clone, Debug, Default)]
pub struct Or {
    parts: Vec<FragmentRef>,
}

impl Or {
    /// Create an empty OR group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `part` appended.
    pub fn with(mut self, part: impl Fragment + 'static) -> Self {
        self.parts.push(Arc::new(part));
        self
    }
}

impl FromIterator<FragmentRef> for Or {
    fn from_iter<I: IntoIterator<Item = FragmentRef>>(iter: I) -> Self {
        Self {
            parts: iter.into_iter().collect(),
        }
    }
}

impl Fragment for Or {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        conjunction(&self.parts, " OR ", SQL_FALSE)
    }
}

/// `(sql) AS alias`, e.g. for subqueries in FROM or CASE columns.
///
/// The inner fragment must render something; a suppressed inner fragment is
/// an [`SqlError::EmptyValue`].
#[derive(Clone, Debug)]
pub struct Aliased {
    inner: FragmentRef,
    alias: SafeStr,
}

impl Aliased {
    /// Wrap `inner` with an alias.
    pub fn new(inner: impl Fragment + 'static, alias: impl Into<SafeStr>) -> Self {
        Self {
            inner: Arc::new(inner),
            alias: alias.into(),
        }
    }
}

impl Fragment for Aliased {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        let (sql, params) = required_to_sql(self.inner.as_ref(), "aliased expression")?;
        Ok((format!("({sql}) AS {}", self.alias), params))
    }
}
