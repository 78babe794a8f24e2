use super::*;

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
}

#[tokio::test]
async fn test_from_config_memory() {
    let config = DatabaseConfig::default();
    let db = DuckDbBackend::from_config(&config).unwrap();
    db.execute("CREATE TABLE t (id INTEGER)").await.unwrap();
    assert!(db.relation_exists("t").await.unwrap());
}

#[tokio::test]
async fn test_file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.execute("CREATE TABLE kept (id INTEGER)").await.unwrap();
    }
    let db = DuckDbBackend::from_path(&path).unwrap();
    assert!(db.relation_exists("kept").await.unwrap());
}

#[tokio::test]
async fn test_query_count() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE nums AS SELECT * FROM range(10) t(n)")
        .await
        .unwrap();

    let count = db.query_count("SELECT * FROM nums").await.unwrap();
    assert_eq!(count, 10);
}

#[tokio::test]
async fn test_execute_batch() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE t1 (id INT); CREATE TABLE t2 (id INT); INSERT INTO t1 VALUES (1);",
    )
    .await
    .unwrap();

    assert!(db.relation_exists("t1").await.unwrap());
    assert!(db.relation_exists("t2").await.unwrap());
}

#[tokio::test]
async fn test_relation_not_exists() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert!(!db.relation_exists("nonexistent").await.unwrap());
}

#[tokio::test]
async fn test_relation_exists_in_schema() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_schema_if_not_exists("audit").await.unwrap();
    db.execute("CREATE TABLE audit.events (id INTEGER)")
        .await
        .unwrap();
    assert!(db.relation_exists("audit.events").await.unwrap());
    assert!(!db.relation_exists("events").await.unwrap());
}

#[tokio::test]
async fn test_query_rows_renders_values() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE r (n INTEGER, s VARCHAR, b BOOLEAN); \
         INSERT INTO r VALUES (1, 'a', true), (2, NULL, false);",
    )
    .await
    .unwrap();

    let rows = db.query_rows("SELECT n, s, b FROM r ORDER BY n").await.unwrap();
    assert_eq!(
        rows,
        vec![
            vec!["1".to_string(), "a".to_string(), "true".to_string()],
            vec!["2".to_string(), "null".to_string(), "false".to_string()],
        ]
    );
}

#[tokio::test]
async fn test_transaction_spans_calls() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute("CREATE TABLE t (id INTEGER)").await.unwrap();
    db.execute("BEGIN TRANSACTION").await.unwrap();
    db.execute("INSERT INTO t VALUES (1)").await.unwrap();
    db.execute("ROLLBACK").await.unwrap();
    assert_eq!(db.query_count("SELECT * FROM t").await.unwrap(), 0);
}

#[tokio::test]
async fn test_missing_table_error() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.query_rows("SELECT * FROM missing").await.unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)));
}

#[tokio::test]
async fn test_execute_error_includes_sql() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.execute("CREATE TABLE").await.unwrap_err();
    assert!(err.to_string().contains("CREATE TABLE"));
}
