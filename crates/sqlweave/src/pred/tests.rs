use super::*;
use crate::error::BoxError;
use crate::value::Valuer;

fn render(f: &dyn Fragment) -> (String, String) {
    let (sql, params) = f.to_sql().unwrap();
    (sql, format!("{params:?}"))
}

#[derive(Debug)]
struct Nullable(Option<i64>);

impl Valuer for Nullable {
    fn value(&self) -> Result<Value, BoxError> {
        Ok(self.0.into_value())
    }
}

#[derive(Debug)]
struct Unreadable;

impl Valuer for Unreadable {
    fn value(&self) -> Result<Value, BoxError> {
        Err("column type mismatch".into())
    }
}

// ==================== Equality ====================

#[test]
fn test_eq_scalar() {
    assert_eq!(render(&Eq::new().with("a", 1i32)), ("a = ?".into(), "[1]".into()));
}

#[test]
fn test_eq_empty_is_true() {
    assert_eq!(render(&Eq::new()), ("(1=1)".into(), "[]".into()));
    assert_eq!(render(&NotEq::new()), ("(1=1)".into(), "[]".into()));
}

#[test]
fn test_eq_list() {
    assert_eq!(
        render(&Eq::new().with("a", vec![1i32, 2, 3])),
        ("a IN (?,?,?)".into(), "[1, 2, 3]".into())
    );
    assert_eq!(
        render(&NotEq::new().with("a", ["x", "y"])),
        ("a NOT IN (?,?)".into(), r#"["x", "y"]"#.into())
    );
}

#[test]
fn test_eq_empty_list() {
    assert_eq!(render(&Eq::new().with("a", Vec::<i32>::new())).0, "(1=0)");
    assert_eq!(render(&NotEq::new().with("a", Vec::<i32>::new())).0, "(1=1)");
}

#[test]
fn test_eq_null() {
    assert_eq!(
        render(&Eq::new().with("a", Value::Null)),
        ("a IS NULL".into(), "[]".into())
    );
    assert_eq!(
        render(&NotEq::new().with("a", Option::<String>::None)),
        ("a IS NOT NULL".into(), "[]".into())
    );
}

#[test]
fn test_eq_bytes_are_scalar() {
    assert_eq!(render(&Eq::new().with("blob", vec![1u8, 2, 3])).0, "blob = ?");
}

#[test]
fn test_neq_scalar() {
    assert_eq!(render(&NotEq::new().with("a", 1i32)).0, "a <> ?");
}

#[test]
fn test_multiple_keys_sorted() {
    let a = Eq::new().with("b", 2i32).with("a", 1i32).with("c", Value::Null);
    let b = Eq::new().with("c", Value::Null).with("a", 1i32).with("b", 2i32);
    assert_eq!(render(&a), ("a = ? AND b = ? AND c IS NULL".into(), "[1, 2]".into()));
    assert_eq!(render(&a), render(&b));
}

#[test]
fn test_from_iter() {
    let p: Eq = [("y", 2i32), ("x", 1i32)].into_iter().collect();
    assert_eq!(p.len(), 2);
    assert_eq!(render(&p), ("x = ? AND y = ?".into(), "[1, 2]".into()));
}

#[test]
fn test_with_replaces_value() {
    let p = Eq::new().with("a", 1i32).with("a", 2i32);
    assert_eq!(render(&p), ("a = ?".into(), "[2]".into()));
}

#[test]
fn test_valuer_unwrapped_first() {
    let p = Eq::new()
        .with("a", Value::valuer(Nullable(None)))
        .with("b", Value::valuer(Nullable(Some(4))));
    assert_eq!(render(&p), ("a IS NULL AND b = ?".into(), "[4]".into()));
}

#[test]
fn test_valuer_error_propagates() {
    let err = Eq::new().with("a", Value::valuer(Unreadable)).to_sql().unwrap_err();
    assert!(matches!(err, SqlError::Valuer(_)));
}

// ==================== Pattern ====================

#[test]
fn test_like_family() {
    assert_eq!(render(&Like::new().with("name", "%a%")), ("name LIKE ?".into(), r#"["%a%"]"#.into()));
    assert_eq!(render(&NotLike::new().with("name", "%a%")).0, "name NOT LIKE ?");
    assert_eq!(render(&ILike::new().with("name", "%a%")).0, "name ILIKE ?");
    assert_eq!(render(&NotILike::new().with("name", "%a%")).0, "name NOT ILIKE ?");
}

#[test]
fn test_like_rejects_null_and_list() {
    let err = Like::new().with("name", Value::Null).to_sql().unwrap_err();
    assert!(err.is_unsupported_value());
    assert_eq!(err.to_string(), "cannot use null with like operators");

    let err = ILike::new().with("name", vec!["a", "b"]).to_sql().unwrap_err();
    assert_eq!(err.to_string(), "cannot use array or slice with like operators");
}

#[test]
fn test_pattern_empty_renders_nothing() {
    assert_eq!(render(&Like::new()), ("".into(), "[]".into()));
}

// ==================== Ordering ====================

#[test]
fn test_ordering_family() {
    assert_eq!(render(&Lt::new().with("id", 1i64)), ("id < ?".into(), "[1]".into()));
    assert_eq!(render(&LtOrEq::new().with("id", 1i64)).0, "id <= ?");
    assert_eq!(render(&Gt::new().with("id", 1i64)).0, "id > ?");
    assert_eq!(render(&GtOrEq::new().with("id", 1i64)).0, "id >= ?");
}

#[test]
fn test_ordering_multiple_keys() {
    let p = Gt::new().with("b", 2i32).with("a", 1i32);
    assert_eq!(render(&p), ("a > ? AND b > ?".into(), "[1, 2]".into()));
}

#[test]
fn test_ordering_rejects_null_and_list() {
    let err = Lt::new().with("id", Option::<i64>::None).to_sql().unwrap_err();
    assert_eq!(err.to_string(), "cannot use null with less than or greater than operators");

    let err = GtOrEq::new().with("id", [1i64, 2]).to_sql().unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot use array or slice with less than or greater than operators"
    );
}

#[test]
fn test_ordering_valuer_to_null_is_rejected() {
    let err = Gt::new().with("id", Value::valuer(Nullable(None))).to_sql().unwrap_err();
    assert!(err.is_unsupported_value());
}

#[test]
fn test_ordering_empty_renders_nothing() {
    assert_eq!(render(&GtOrEq::new()).0, "");
    assert!(Lt::new().is_empty());
}
