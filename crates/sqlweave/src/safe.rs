//! SQL text that is trusted to be constant.
//!
//! Table names, column lists and templates are spliced into the SQL verbatim,
//! so every API that accepts them takes a [`SafeStr`]. The only safe way to get
//! one is from a `&'static str`. Building one from runtime data needs the
//! deliberately awkward [`SafeStr::dangerously_from_dynamic`].

use crate::error::SqlResult;
use crate::fragment::Fragment;
use crate::param::ParamList;
use std::borrow::{Borrow, Cow};
use std::collections::BTreeMap;
use std::fmt;

/// A constant SQL string.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SafeStr(Cow<'static, str>);

impl SafeStr {
    /// Wrap a string literal.
    pub const fn new(sql: &'static str) -> Self {
        SafeStr(Cow::Borrowed(sql))
    }

    /// Treat a runtime string as trusted SQL.
    ///
    /// Anything passed here ends up in the statement unescaped. Only use it for
    /// text that has already been validated or comes from a fixed allow-list.
    pub fn dangerously_from_dynamic(sql: String) -> Self {
        SafeStr(Cow::Owned(sql))
    }

    /// Borrow the SQL text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&'static str> for SafeStr {
    fn from(sql: &'static str) -> Self {
        SafeStr::new(sql)
    }
}

impl AsRef<str> for SafeStr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SafeStr {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SafeStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Fragment for SafeStr {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        Ok((self.0.to_string(), ParamList::new()))
    }
}

/// Join several constant strings with a constant separator.
pub fn join_safe_strs<I, S>(sep: impl Into<SafeStr>, vals: I) -> SafeStr
where
    I: IntoIterator<Item = S>,
    S: Into<SafeStr>,
{
    let sep = sep.into();
    let mut out = String::new();
    for (idx, val) in vals.into_iter().enumerate() {
        if idx > 0 {
            out.push_str(sep.as_str());
        }
        out.push_str(val.into().as_str());
    }
    SafeStr(Cow::Owned(out))
}

/// Column → value pairs for `SET` / `VALUES` clauses, kept in column order.
pub type SetMap<V> = BTreeMap<SafeStr, V>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_passthrough() {
        let (sql, params) = SafeStr::new("COUNT(*)").to_sql().unwrap();
        assert_eq!(sql, "COUNT(*)");
        assert!(params.is_empty());
    }

    #[test]
    fn test_join() {
        let joined = join_safe_strs(", ", ["id", "name", "email"]);
        assert_eq!(joined.as_str(), "id, name, email");
        assert!(join_safe_strs(", ", Vec::<SafeStr>::new()).is_empty());
    }

    #[test]
    fn test_ordering_matches_str() {
        let mut keys = vec![SafeStr::new("b"), SafeStr::new("a"), SafeStr::dangerously_from_dynamic("c".into())];
        keys.sort();
        let keys: Vec<&str> = keys.iter().map(SafeStr::as_str).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }
}
