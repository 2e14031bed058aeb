use super::*;

fn filtered(filter: &str) -> Clauses {
    Clauses {
        filter: Some(filter.to_string()),
        ..Clauses::default()
    }
}

#[test]
fn test_select_star() {
    let sql = select("cube_user", &Terms::new(), &Clauses::default(), Dialect::MySql);
    assert_eq!(sql, "SELECT * FROM cube_user;");
}

#[test]
fn test_select_clause_order() {
    let clauses = Clauses {
        filter: Some("age>18".into()),
        order: Some("id DESC".into()),
        group: Some("team".into()),
        limit: Some((0, 10)),
    };
    let sql = select("cube_user", &Terms::from(["team", "COUNT(*)"]), &clauses, Dialect::MySql);
    assert_eq!(
        sql,
        "SELECT team,COUNT(*) FROM cube_user WHERE age>18 GROUP BY team ORDER BY id DESC LIMIT 0,10;"
    );
}

#[test]
fn test_select_limit_postgres() {
    let clauses = Clauses {
        limit: Some((20, 10)),
        ..Clauses::default()
    };
    let sql = select("users", &Terms::from("id"), &clauses, Dialect::Postgres);
    assert_eq!(sql, "SELECT id FROM users LIMIT 10 OFFSET 20;");
}

#[test]
fn test_empty_terms_render_star() {
    let sql = select("t", &Terms::from(""), &Clauses::default(), Dialect::MySql);
    assert_eq!(sql, "SELECT * FROM t;");
}

#[test]
fn test_count() {
    assert_eq!(count("t", &Clauses::default()), "SELECT COUNT(*) FROM t;");
    assert_eq!(count("t", &filtered("a=1")), "SELECT COUNT(*) FROM t WHERE a=1;");
}

#[test]
fn test_sum() {
    assert_eq!(
        sum("t", "score", &filtered("a=1")).unwrap(),
        "SELECT SUM(score) FROM t WHERE a=1;"
    );
    assert!(sum("t", "", &Clauses::default()).unwrap_err().is_invalid_argument());
}

#[test]
fn test_update_pairs_and_raw() {
    let pairs = Assignments::from([("c", "2"), ("d", "\"hello\"")]);
    assert_eq!(
        update("list", &pairs, &filtered("a=1 and b=\"world\"")).unwrap(),
        "UPDATE list SET c=2,d=\"hello\" WHERE a=1 and b=\"world\";"
    );

    let raw = Assignments::from("hits=hits+1");
    assert_eq!(update("list", &raw, &Clauses::default()).unwrap(), "UPDATE list SET hits=hits+1;");
}

#[test]
fn test_update_requires_assignments() {
    let err = update("list", &Assignments::from(Fields::new()), &Clauses::default()).unwrap_err();
    assert!(err.is_invalid_argument());
    let err = update("list", &Assignments::from(""), &Clauses::default()).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_delete() {
    assert_eq!(delete("list", &Clauses::default()), "DELETE FROM list;");
    assert_eq!(delete("list", &filtered("a=1")), "DELETE FROM list WHERE a=1;");
}

#[test]
fn test_insert_values() {
    let fields = Fields::new().set("username", "\"lin\"").set("phone", 123);
    assert_eq!(
        insert("cube_user", &fields, &Clauses::default(), Dialect::MySql).unwrap(),
        "INSERT INTO cube_user (username,phone) VALUES (\"lin\",123);"
    );
}

#[test]
fn test_insert_if_absent() {
    let fields = Fields::new().set("username", "\"lin\"").set("phone", 123);
    assert_eq!(
        insert("cube_user", &fields, &filtered("username=\"lin\""), Dialect::MySql).unwrap(),
        "INSERT INTO cube_user (username,phone) SELECT \"lin\",123 FROM DUAL WHERE NOT EXISTS(SELECT username FROM cube_user WHERE username=\"lin\");"
    );
}

#[test]
fn test_insert_if_absent_postgres_has_no_dual() {
    let fields = Fields::from([("name", "'a'")]);
    assert_eq!(
        insert("t", &fields, &filtered("name='a'"), Dialect::Postgres).unwrap(),
        "INSERT INTO t (name) SELECT 'a' WHERE NOT EXISTS(SELECT name FROM t WHERE name='a');"
    );
}

#[test]
fn test_insert_requires_fields() {
    let err = insert("t", &Fields::new(), &Clauses::default(), Dialect::MySql).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_first_key() {
    assert_eq!(first_key("username=\"lin\""), "username");
    assert_eq!(first_key(" id = 3"), "id");
    // compound predicates only contribute their first column
    assert_eq!(first_key("a=1 and b=2"), "a");
    assert_eq!(first_key("active"), "active");
}

#[test]
fn test_insert_bound_placeholders() {
    let fields = BoundFields::new().set("name", "lin").set("phone", 123);

    let (sql, params) = insert_bound("t", fields.clone(), &Clauses::default(), Dialect::Postgres).unwrap();
    assert_eq!(sql, "INSERT INTO t (name,phone) VALUES ($1,$2);");
    assert_eq!(params, vec![Param::Text("lin".into()), Param::Int(123)]);

    let (sql, _) = insert_bound("t", fields, &filtered("name='lin'"), Dialect::MySql).unwrap();
    assert_eq!(
        sql,
        "INSERT INTO t (name,phone) SELECT ?,? FROM DUAL WHERE NOT EXISTS(SELECT name FROM t WHERE name='lin');"
    );
}

#[test]
fn test_update_bound_placeholders() {
    let fields = BoundFields::new().set("phone", 5).set("nick", None::<String>);
    let (sql, params) = update_bound("t", fields, &filtered("id=1"), Dialect::Postgres).unwrap();
    assert_eq!(sql, "UPDATE t SET phone=$1,nick=$2 WHERE id=1;");
    assert_eq!(params, vec![Param::Int(5), Param::Null]);
}

#[test]
fn test_terms_preserve_order() {
    let terms = Terms::from(vec!["b DESC", "a ASC", "c"]);
    assert_eq!(terms.join(), "b DESC,a ASC,c");
    let owned = vec!["x".to_string(), "y".to_string()];
    assert_eq!(Terms::from(owned.as_slice()).join(), "x,y");
}

#[test]
fn test_blank_terms_are_skipped() {
    let sql = select("t", &Terms::from(["", "id", ""]), &Clauses::default(), Dialect::MySql);
    assert_eq!(sql, "SELECT id FROM t;");
    assert_eq!(Terms::from(vec!["a", "", "b"]).join(), "a,b");
}

#[test]
fn test_fields_overwrite_keeps_position() {
    let fields = Fields::new().set("a", 1).set("b", 2).set("a", 3);
    assert_eq!(fields.columns(), vec!["a", "b"]);
    assert_eq!(fields.values(), vec!["3", "2"]);
}

#[test]
fn test_statement_display_is_sql() {
    let stmt = Statement::new("SELECT 1;").with_task(true);
    assert_eq!(stmt.to_string(), "SELECT 1;");
    assert!(stmt.is_task());
    assert!(stmt.params().is_empty());
}
