//! CASE expression builder.

use crate::error::{SqlError, SqlResult};
use crate::fragment::{Fragment, FragmentRef, required_to_sql};
use crate::param::ParamList;
use std::sync::Arc;

/// `CASE [what] WHEN .. THEN .. [ELSE ..] END`
///
/// Every piece must render something. Leave a branch out with
/// [`when_if`](Self::when_if) rather than suppressing its fragment, which
/// fails with [`SqlError::EmptyValue`].
///
/// Usable anywhere a fragment is accepted, e.g. as a result column:
///
/// ```ignore
/// let level = case()
///     .when(Lt::new().with("score", 50i32), "'low'")
///     .otherwise("'high'")
///     .alias("level");
/// select(["id"]).column(level).from("scores");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CaseBuilder {
    what: Option<FragmentRef>,
    when_parts: Vec<(FragmentRef, FragmentRef)>,
    otherwise: Option<FragmentRef>,
}

impl CaseBuilder {
    /// Searched CASE: each WHEN is a condition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simple CASE: each WHEN is compared against `what`.
    pub fn of(what: impl Fragment + 'static) -> Self {
        Self {
            what: Some(Arc::new(what)),
            ..Self::default()
        }
    }

    /// Add a `WHEN when THEN then` branch.
    pub fn when(mut self, when: impl Fragment + 'static, then: impl Fragment + 'static) -> Self {
        self.when_parts.push((Arc::new(when), Arc::new(then)));
        self
    }

    /// Add a `WHEN when THEN then` branch if `include` is true.
    pub fn when_if(
        self,
        when: impl Fragment + 'static,
        then: impl Fragment + 'static,
        include: bool,
    ) -> Self {
        if include { self.when(when, then) } else { self }
    }

    /// Set the `ELSE` branch.
    pub fn otherwise(mut self, expr: impl Fragment + 'static) -> Self {
        self.otherwise = Some(Arc::new(expr));
        self
    }

    /// Set the `ELSE` branch if `include` is true.
    pub fn otherwise_if(self, expr: impl Fragment + 'static, include: bool) -> Self {
        if include { self.otherwise(expr) } else { self }
    }
}

/// Renders each piece followed by a single space.
#[derive(Default)]
struct PieceWriter {
    sql: String,
    params: ParamList,
}

impl PieceWriter {
    fn keyword(&mut self, keyword: &str) {
        self.sql.push_str(keyword);
    }

    fn piece(&mut self, fragment: &FragmentRef) -> SqlResult<()> {
        let (sql, params) = required_to_sql(fragment.as_ref(), "case expression branch")?;
        self.sql.push_str(&sql);
        self.sql.push(' ');
        self.params.append(params);
        Ok(())
    }
}

impl Fragment for CaseBuilder {
    fn to_sql(&self) -> SqlResult<(String, ParamList)> {
        if self.when_parts.is_empty() {
            return Err(SqlError::missing(
                "case expression must contain at least one WHEN clause",
            ));
        }

        let mut w = PieceWriter::default();
        w.keyword("CASE ");
        if let Some(what) = &self.what {
            w.piece(what)?;
        }
        for (when, then) in &self.when_parts {
            w.keyword("WHEN ");
            w.piece(when)?;
            w.keyword("THEN ");
            w.piece(then)?;
        }
        if let Some(otherwise) = &self.otherwise {
            w.keyword("ELSE ");
            w.piece(otherwise)?;
        }
        w.keyword("END");

        Ok((w.sql, w.params))
    }
}
