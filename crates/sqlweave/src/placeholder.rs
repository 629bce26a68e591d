//! Placeholder formats and the final rewrite pass.
//!
//! Fragments always render with the sequential `?` marker. A statement rewrites
//! its finished SQL once, right before returning it, into the marker syntax
//! the target database expects.

use crate::error::SqlError;
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt::Write as _;
use std::str::FromStr;

/// How placeholders appear in the final SQL.
///
/// Deserializes from a preset name (`"question"`, `"dollar"`, `"colon"`,
/// `"at_p"`) or from `{ numbered = "<prefix>" }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "FormatRepr")]
pub enum PlaceholderFormat {
    /// Leave every `?` as it is (MySQL, SQLite).
    #[default]
    Question,
    /// Replace the n-th `?` with `prefix` followed by n, starting at 1.
    Numbered(Cow<'static, str>),
}

impl PlaceholderFormat {
    /// `$1, $2, ...` (PostgreSQL)
    pub const DOLLAR: PlaceholderFormat = PlaceholderFormat::Numbered(Cow::Borrowed("$"));
    /// `:1, :2, ...` (Oracle)
    pub const COLON: PlaceholderFormat = PlaceholderFormat::Numbered(Cow::Borrowed(":"));
    /// `@p1, @p2, ...` (SQL Server)
    pub const AT_P: PlaceholderFormat = PlaceholderFormat::Numbered(Cow::Borrowed("@p"));

    /// Create a numbered format with a custom prefix.
    pub fn numbered(prefix: impl Into<Cow<'static, str>>) -> Self {
        PlaceholderFormat::Numbered(prefix.into())
    }

    /// Rewrite the `?` markers of a finished statement.
    ///
    /// In numbered formats `??` is an escaped literal `?`: it is emitted as a
    /// single `?` and does not take a number.
    pub fn replace_placeholders(&self, sql: &str) -> String {
        match self {
            PlaceholderFormat::Question => sql.to_string(),
            PlaceholderFormat::Numbered(prefix) => replace_positional(sql, prefix),
        }
    }
}

impl FromStr for PlaceholderFormat {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "question" => Ok(PlaceholderFormat::Question),
            "dollar" => Ok(PlaceholderFormat::DOLLAR),
            "colon" => Ok(PlaceholderFormat::COLON),
            "at_p" => Ok(PlaceholderFormat::AT_P),
            other => Err(SqlError::Config(format!(
                "unknown placeholder format '{other}'"
            ))),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FormatRepr {
    Name(String),
    Numbered { numbered: String },
}

impl TryFrom<FormatRepr> for PlaceholderFormat {
    type Error = SqlError;

    fn try_from(repr: FormatRepr) -> Result<Self, Self::Error> {
        match repr {
            FormatRepr::Name(name) => name.parse(),
            FormatRepr::Numbered { numbered } => Ok(PlaceholderFormat::numbered(numbered)),
        }
    }
}

fn replace_positional(sql: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut rest = sql;
    let mut n = 0usize;

    while let Some(p) = rest.find('?') {
        out.push_str(&rest[..p]);
        if rest[p + 1..].starts_with('?') {
            out.push('?');
            rest = &rest[p + 2..];
        } else {
            n += 1;
            out.push_str(prefix);
            let _ = write!(out, "{n}");
            rest = &rest[p + 1..];
        }
    }

    out.push_str(rest);
    out
}

/// Return `count` comma-separated `?` markers, e.g. `?,?,?`.
pub fn placeholders(count: usize) -> String {
    if count == 0 {
        return String::new();
    }
    let mut s = "?,".repeat(count);
    s.pop();
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_is_identity() {
        let sql = "a = ? AND b = ?? AND c = ?";
        assert_eq!(PlaceholderFormat::Question.replace_placeholders(sql), sql);
    }

    #[test]
    fn test_dollar_numbering() {
        let sql = PlaceholderFormat::DOLLAR.replace_placeholders("x = ? AND y IN (?,?)");
        assert_eq!(sql, "x = $1 AND y IN ($2,$3)");
    }

    #[test]
    fn test_escaped_marker_is_not_counted() {
        let sql = PlaceholderFormat::DOLLAR.replace_placeholders("a = ? AND b = ??");
        assert_eq!(sql, "a = $1 AND b = ?");

        let sql = PlaceholderFormat::DOLLAR.replace_placeholders("j ?? 'k' AND a = ?");
        assert_eq!(sql, "j ? 'k' AND a = $1");
    }

    #[test]
    fn test_other_prefixes() {
        assert_eq!(PlaceholderFormat::COLON.replace_placeholders("a = ?, b = ?"), "a = :1, b = :2");
        assert_eq!(PlaceholderFormat::AT_P.replace_placeholders("a = ?"), "a = @p1");
        assert_eq!(
            PlaceholderFormat::numbered("#").replace_placeholders("? ?"),
            "#1 #2"
        );
    }

    #[test]
    fn test_no_markers() {
        assert_eq!(PlaceholderFormat::DOLLAR.replace_placeholders("SELECT 1"), "SELECT 1");
        assert_eq!(PlaceholderFormat::DOLLAR.replace_placeholders(""), "");
    }

    #[test]
    fn test_trailing_marker() {
        assert_eq!(PlaceholderFormat::DOLLAR.replace_placeholders("?"), "$1");
        assert_eq!(PlaceholderFormat::DOLLAR.replace_placeholders("??"), "?");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("dollar".parse::<PlaceholderFormat>().unwrap(), PlaceholderFormat::DOLLAR);
        assert_eq!("question".parse::<PlaceholderFormat>().unwrap(), PlaceholderFormat::Question);
        assert!("percent".parse::<PlaceholderFormat>().is_err());
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(0), "");
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?,?,?");
    }
}
