//! Composition guarantees: argument order, suppression and marker escapes.

use sqlweave::prelude::*;
use sqlweave::{Joined, ParamList, append_to_sql, placeholders};
use std::sync::Arc;

fn render(f: &dyn Fragment) -> (String, String) {
    let (sql, params) = f.to_sql().unwrap();
    (sql, format!("{params:?}"))
}

fn count_markers(sql: &str) -> usize {
    let mut count = 0;
    let mut rest = sql;
    while let Some(i) = rest.find('?') {
        if rest[i + 1..].starts_with('?') {
            rest = &rest[i + 2..];
        } else {
            count += 1;
            rest = &rest[i + 1..];
        }
    }
    count
}

#[test]
fn eq_scalar() {
    assert_eq!(render(&Eq::new().with("a", 1i32)), ("a = ?".into(), "[1]".into()));
}

#[test]
fn eq_empty_is_true_literal() {
    assert_eq!(render(&Eq::new()), ("(1=1)".into(), "[]".into()));
}

#[test]
fn eq_list_expands_to_in() {
    assert_eq!(
        render(&Eq::new().with("a", vec![1i32, 2, 3])),
        ("a IN (?,?,?)".into(), "[1, 2, 3]".into())
    );
}

#[test]
fn eq_null_is_is_null() {
    assert_eq!(
        render(&Eq::new().with("a", Option::<i32>::None)),
        ("a IS NULL".into(), "[]".into())
    );
}

#[test]
fn template_expands_nested_predicate() {
    let e = Expr::new("x = ? AND y IN (?)")
        .bind(5i32)
        .nest(Eq::new().with("z", 9i32));
    assert_eq!(render(&e), ("x = ? AND y IN (z = ?)".into(), "[5, 9]".into()));
}

#[test]
fn numbered_rewrite_skips_escape() {
    assert_eq!(
        PlaceholderFormat::DOLLAR.replace_placeholders("a = ? AND b = ??"),
        "a = $1 AND b = ?"
    );
}

#[test]
fn predicate_key_order_is_deterministic() {
    let forward = Eq::new().with("a", 1i32).with("b", "x").with("c", Option::<i32>::None);
    let backward = Eq::new().with("c", Option::<i32>::None).with("b", "x").with("a", 1i32);
    assert_eq!(render(&forward), render(&backward));

    let forward = LtOrEq::new().with("x", 1i64).with("y", 2i64);
    let backward = LtOrEq::new().with("y", 2i64).with("x", 1i64);
    assert_eq!(render(&forward), render(&backward));
}

#[test]
fn rendering_is_idempotent() {
    let q = select(["id"])
        .from("t")
        .and_where(Expr::new("a IN (?)").nest(select(["x"]).from("u").and_where(Gt::new().with("y", 1i32))))
        .and_where(NotEq::new().with("z", vec!["p", "q"]))
        .placeholder_format(PlaceholderFormat::COLON);
    assert_eq!(render(&q), render(&q));
}

#[test]
fn escape_renders_one_literal_and_consumes_nothing() {
    let q = select(["a"])
        .from("t")
        .and_where(Expr::new("tags ?? 'x'"))
        .placeholder_format(PlaceholderFormat::DOLLAR);
    let (sql, params) = q.to_sql().unwrap();
    assert_eq!(sql, "SELECT a FROM t WHERE tags ? 'x'");
    assert_eq!(sql.matches('?').count(), 1);
    assert!(params.is_empty());
}

#[test]
fn suppression_is_neutral() {
    let p = Eq::new().with("p", 1i32).boxed();
    let r = Expr::new("r > ?").bind(2i32).boxed();
    let candidates: Vec<Arc<dyn Fragment>> = vec![
        Eq::new().with("q", 3i32).boxed(),
        Expr::new("q IN (?)").nest("SELECT 1").boxed(),
        Lt::new().with("q", Option::<i32>::None).boxed(),
    ];

    let mut direct_sql = String::new();
    let mut direct_params = ParamList::new();
    append_to_sql(&[p.clone(), r.clone()], &mut direct_sql, " AND ", &mut direct_params).unwrap();

    for q in candidates {
        let suppressed = q.only_if(false).boxed();
        let mut sql = String::new();
        let mut params = ParamList::new();
        append_to_sql(&[p.clone(), suppressed, r.clone()], &mut sql, " AND ", &mut params).unwrap();
        assert_eq!(sql, direct_sql);
        assert_eq!(format!("{params:?}"), format!("{direct_params:?}"));
    }
}

#[test]
fn markers_and_arguments_stay_aligned() {
    let q = select(["a"])
        .column(case().when(Eq::new().with("b", 1i32), Expr::new("?").bind("one")).otherwise("'n/a'").alias("label"))
        .from("t")
        .join_clause(Expr::new("JOIN u ON u.id = t.uid AND u.kind = ?").bind("admin"))
        .and_where(Eq::new().with("c", vec![1i64, 2, 3]))
        .and_where(Like::new().with("d", "%x%").only_if(false))
        .and_where(Expr::new("e = ? OR f IN (?)").bind(4i32).nest(select(["g"]).from("h").and_where(GtOrEq::new().with("i", 5i32))))
        .having(Expr::new("count(*) > ?").bind(6i64))
        .order_by_clause(Expr::new("? ASC").bind("a"));

    let (sql, params) = q.to_sql().unwrap();
    assert_eq!(count_markers(&sql), params.len());
    assert_eq!(
        format!("{params:?}"),
        r#"[1, "one", "admin", 1, 2, 3, 4, 5, 6, "a"]"#
    );

    let (numbered, numbered_params) = q
        .clone()
        .placeholder_format(PlaceholderFormat::DOLLAR)
        .to_sql()
        .unwrap();
    assert!(numbered.contains("$10"));
    assert!(!numbered.contains("$11"));
    assert_eq!(numbered_params.len(), params.len());
}

#[test]
fn joined_and_placeholders_helpers() {
    let list = Joined::new(", ").with("a").with("b".only_if(false)).with(Expr::new("?").bind(1i32));
    assert_eq!(render(&list), ("a, ?".into(), "[1]".into()));
    assert_eq!(placeholders(4), "?,?,?,?");
}

#[test]
fn error_stops_composition() {
    let q = select(["a"])
        .from("t")
        .and_where(Eq::new().with("ok", 1i32))
        .and_where(GtOrEq::new().with("bad", vec![1i32, 2]));
    let err = q.to_sql().unwrap_err();
    assert!(matches!(err, SqlError::UnsupportedValue { .. }));
}

#[test]
fn excluded_fragment_is_never_rendered() {
    let broken = Like::new().with("name", Option::<String>::None);
    let q = select(["a"]).from("t").and_where(expr_if(Expr::new("x IN (?)").nest(broken.clone()), false));
    assert_eq!(render(&q).0, "SELECT a FROM t");
    assert!(select(["a"]).and_where(broken).to_sql().is_err());
}
