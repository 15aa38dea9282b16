#![cfg(all(feature = "sqlite", feature = "derive"))]

use flamel::{
    Database, DatabaseConfig, Direction, Executor, Filters, JoinKind, Model, OrmError,
    SqliteExecutor, UpsertOutcome, UpsertStrategy, Value,
};

#[derive(Debug, Clone, Model)]
struct Team {
    #[orm(id, autoincrement)]
    id: Option<i64>,
    #[orm(unique)]
    name: String,
}

#[derive(Debug, Clone, Model)]
struct Member {
    #[orm(id, autoincrement)]
    id: Option<i64>,
    #[orm(unique)]
    name: String,
    #[orm(check = "age >= 0")]
    age: Option<i64>,
    #[orm(foreign_key(table = "Team", column = "id"))]
    team_id: Option<i64>,
    #[orm(default = true)]
    active: Option<bool>,
}

fn setup(config: DatabaseConfig) -> Database {
    let mut db = Database::with_config(config);
    db.register_model::<Team>().unwrap();
    db.register_model::<Member>().unwrap();
    db.set_engine(SqliteExecutor::open_in_memory().unwrap());
    db.create_tables().unwrap();
    db
}

fn member(name: &str, age: i64, team_id: Option<i64>) -> Member {
    Member {
        id: None,
        name: name.to_string(),
        age: Some(age),
        team_id,
        active: None,
    }
}

fn count(db: &Database, table: &str) -> i64 {
    let mut q = db.query(table);
    q.select(&["COUNT(*)"]);
    let rows = q.execute().unwrap();
    rows[0][0].as_i64().unwrap()
}

#[test]
fn test_create_tables_is_idempotent() {
    let db = setup(DatabaseConfig::default());
    db.create_tables().unwrap();
    assert_eq!(count(&db, "Member"), 0);
}

#[test]
fn test_save_and_query() {
    let db = setup(DatabaseConfig::default());
    assert_eq!(
        db.save(&Team { id: None, name: "core".into() }).unwrap(),
        UpsertOutcome::Inserted
    );
    db.save(&member("ann", 31, Some(1))).unwrap();
    db.save(&member("bob", 25, Some(1))).unwrap();

    let mut q = db.query_for::<Member>();
    q.select(&["name", "age", "active"])
        .filter(&Filters::new().and_eq("team_id", 1))
        .unwrap()
        .order_by(&["age"], Direction::Asc)
        .unwrap();
    let rows = q.execute().unwrap();
    assert_eq!(
        rows,
        vec![
            vec![Value::from("bob"), Value::Integer(25), Value::Integer(1)],
            vec![Value::from("ann"), Value::Integer(31), Value::Integer(1)],
        ]
    );
}

#[test]
fn test_join_group_by_having() {
    let db = setup(DatabaseConfig::default());
    db.save(&Team { id: None, name: "core".into() }).unwrap();
    db.save(&Team { id: None, name: "docs".into() }).unwrap();
    db.save(&member("ann", 31, Some(1))).unwrap();
    db.save(&member("bob", 25, Some(1))).unwrap();
    db.save(&member("cy", 40, Some(2))).unwrap();

    let mut q = db.query("Member");
    q.select(&["Team.name", "COUNT(*)"])
        .join(JoinKind::Inner, "Team", "Member.team_id = Team.id")
        .unwrap()
        .group_by(&["Team.name"])
        .unwrap()
        .having("COUNT(*) > 1")
        .unwrap();
    let rows = q.execute().unwrap();
    assert_eq!(rows, vec![vec![Value::from("core"), Value::Integer(2)]]);
}

fn age_of(db: &Database, name: &str) -> Vec<Vec<Value>> {
    let mut q = db.query("Member");
    q.select(&["age"])
        .filter(&Filters::new().and_eq("name", name))
        .unwrap();
    q.execute().unwrap()
}

#[test]
fn test_second_column_match_with_unset_key_changes_nothing() {
    let db = setup(DatabaseConfig::default());
    db.save(&member("ann", 31, None)).unwrap();

    // The lookup matches by name, but the UPDATE is keyed on `id = NULL`.
    let outcome = db.save(&member("ann", 32, None)).unwrap();
    assert_eq!(outcome, UpsertOutcome::Updated);
    assert_eq!(count(&db, "Member"), 1);
    assert_eq!(age_of(&db, "ann"), vec![vec![Value::Integer(31)]]);
}

#[test]
fn test_second_column_match_with_key_updates_row() {
    let db = setup(DatabaseConfig::default());
    db.save(&member("ann", 31, None)).unwrap();

    let mut older = member("ann", 32, None);
    older.id = Some(1);
    assert_eq!(db.save(&older).unwrap(), UpsertOutcome::Updated);
    assert_eq!(age_of(&db, "ann"), vec![vec![Value::Integer(32)]]);
}

#[test]
fn test_primary_key_strategy_updates_by_key() {
    let config = DatabaseConfig::new().upsert_strategy(UpsertStrategy::PrimaryKey);
    let db = setup(config);
    db.save(&member("ann", 31, None)).unwrap();

    let mut renamed = member("anne", 31, None);
    renamed.id = Some(1);
    assert_eq!(db.save(&renamed).unwrap(), UpsertOutcome::Updated);

    let mut q = db.query("Member");
    q.select(&["id", "name"]);
    assert_eq!(
        q.execute().unwrap(),
        vec![vec![Value::Integer(1), Value::from("anne")]]
    );

    let mut older = member("anne", 32, None);
    older.id = Some(1);
    assert_eq!(db.save(&older).unwrap(), UpsertOutcome::Updated);
    assert_eq!(age_of(&db, "anne"), vec![vec![Value::Integer(32)]]);
}

#[test]
fn test_constraint_violation_is_a_driver_error() {
    let db = setup(DatabaseConfig::default());
    let err = db.save(&member("neg", -1, None)).unwrap_err();
    assert!(err.is_driver_error(), "{err}");
    assert_eq!(count(&db, "Member"), 0);
}

#[test]
fn test_script_failure_rolls_back() {
    let exec = SqliteExecutor::open_in_memory().unwrap();
    exec.execute_script("CREATE TABLE t (v INTEGER NOT NULL);").unwrap();

    let err = exec
        .execute_script("INSERT INTO t (v) VALUES (1); INSERT INTO t (v) VALUES (NULL);")
        .unwrap_err();
    assert!(err.is_driver_error());

    let rows = exec.execute("SELECT COUNT(*) FROM t", &[]).unwrap();
    assert_eq!(rows, vec![vec![Value::Integer(0)]]);
}

#[test]
fn test_execute_many() {
    let exec = SqliteExecutor::open_in_memory().unwrap();
    exec.execute_script("CREATE TABLE t (v INTEGER, label TEXT);").unwrap();
    exec.execute_many(
        "INSERT INTO t (v, label) VALUES (?, ?)",
        &[
            vec![Value::from(1), Value::from("a")],
            vec![Value::from(2), Value::Null],
        ],
    )
    .unwrap();

    let rows = exec.execute("SELECT v, label FROM t ORDER BY v", &[]).unwrap();
    assert_eq!(
        rows,
        vec![
            vec![Value::Integer(1), Value::from("a")],
            vec![Value::Integer(2), Value::Null],
        ]
    );
}

#[test]
fn test_value_binding_round_trip() {
    let exec = SqliteExecutor::open_in_memory().unwrap();
    exec.execute_script("CREATE TABLE v (r REAL, b BLOB, flag BOOLEAN, at DATETIME);")
        .unwrap();

    let at = chrono::NaiveDate::from_ymd_opt(2024, 5, 6)
        .unwrap()
        .and_hms_opt(7, 8, 9)
        .unwrap();
    exec.execute(
        "INSERT INTO v (r, b, flag, at) VALUES (?, ?, ?, ?)",
        &[
            Value::from(1.5),
            Value::from(vec![0xde_u8, 0xad]),
            Value::from(false),
            Value::from(at),
        ],
    )
    .unwrap();

    let rows = exec.execute("SELECT r, b, flag, at FROM v", &[]).unwrap();
    assert_eq!(
        rows,
        vec![vec![
            Value::Real(1.5),
            Value::Blob(vec![0xde, 0xad]),
            Value::Integer(0),
            Value::from("2024-05-06 07:08:09"),
        ]]
    );
}

#[test]
fn test_closed_executor_fails() {
    let mut db = setup(DatabaseConfig::default());
    let exec = SqliteExecutor::open_in_memory().unwrap();
    exec.close().unwrap();
    assert!(exec.is_closed());
    let err = exec.execute("SELECT 1", &[]).unwrap_err();
    assert!(matches!(err, OrmError::Connection(_)));

    db.close_engine().unwrap();
    assert!(matches!(db.create_tables().unwrap_err(), OrmError::EngineNotSet(_)));
}

#[test]
fn test_strict_mode_rejects_unrecognized_statements() {
    let db = setup(DatabaseConfig::new().strict());
    let mut q = db.query("Member");
    q.with_cte("adults", "SELECT * FROM Member WHERE age >= 18")
        .select(&["name"]);
    assert!(matches!(q.execute().unwrap_err(), OrmError::InvalidSql(_)));
}

#[test]
fn test_file_database() {
    let path = std::env::temp_dir().join(format!("flamel-test-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);
    {
        let mut db = Database::new();
        db.register_model::<Team>().unwrap();
        db.connect(&path).unwrap();
        db.create_tables().unwrap();
        db.save(&Team { id: None, name: "core".into() }).unwrap();
        db.close_engine().unwrap();
    }
    let exec = SqliteExecutor::open(&path).unwrap();
    let rows = exec.execute("SELECT name FROM Team", &[]).unwrap();
    assert_eq!(rows, vec![vec![Value::from("core")]]);
    exec.close().unwrap();
    let _ = std::fs::remove_file(&path);
}
