use super::*;
use tw_db::DuckDbBackend;

fn name(s: &str) -> MigrationName {
    MigrationName::new(s)
}

#[tokio::test]
async fn test_ensure_is_idempotent() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "tw_migrations");
    assert!(!ledger.exists().await.unwrap());
    ledger.ensure().await.unwrap();
    ledger.ensure().await.unwrap();
    assert!(ledger.exists().await.unwrap());
    assert!(ledger.list_applied().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ensure_creates_schema_for_qualified_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "ops.tw_migrations");
    ledger.ensure().await.unwrap();
    assert!(db.relation_exists("ops.tw_migrations").await.unwrap());
}

#[tokio::test]
async fn test_ensure_rejects_bad_table_name() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "tw migrations; DROP");
    assert!(matches!(
        ledger.ensure().await,
        Err(MigrateError::LedgerInit(_))
    ));
}

#[tokio::test]
async fn test_next_batch_number() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "tw_migrations");
    ledger.ensure().await.unwrap();
    assert_eq!(ledger.next_batch_number().await.unwrap(), 1);

    ledger.record(&name("A_001"), 1).await.unwrap();
    ledger.record(&name("A_002"), 3).await.unwrap();
    assert_eq!(ledger.next_batch_number().await.unwrap(), 4);
}

#[tokio::test]
async fn test_list_applied_in_insertion_order() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "tw_migrations");
    ledger.ensure().await.unwrap();
    ledger.record(&name("B_002"), 1).await.unwrap();
    ledger.record(&name("A_001"), 1).await.unwrap();

    let records = ledger.list_applied().await.unwrap();
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["B_002", "A_001"]);
    assert!(records[0].id < records[1].id);
    assert!(records.iter().all(|r| r.batch == 1));
}

#[tokio::test]
async fn test_record_duplicate_name() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "tw_migrations");
    ledger.ensure().await.unwrap();
    ledger.record(&name("A_001"), 1).await.unwrap();

    let err = ledger.record(&name("A_001"), 2).await.unwrap_err();
    assert!(matches!(err, MigrateError::DuplicateMigration { ref name } if name == "A_001"));
    assert_eq!(ledger.list_applied().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_name_with_quote() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "tw_migrations");
    ledger.ensure().await.unwrap();
    ledger.record(&name("o'brien"), 1).await.unwrap();
    assert_eq!(ledger.list_applied().await.unwrap()[0].name, "o'brien");
}

#[tokio::test]
async fn test_remove() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::new(&db, "tw_migrations");
    ledger.ensure().await.unwrap();
    ledger.record(&name("A_001"), 1).await.unwrap();
    ledger.remove(&name("A_001")).await.unwrap();
    assert!(ledger.list_applied().await.unwrap().is_empty());
    assert!(ledger.remove(&name("A_001")).await.is_err());
}
