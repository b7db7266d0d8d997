//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    accredit_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    for table in [
        "organization",
        "organization_profile",
        "adviser",
        "user",
        "accreditation",
        "document",
        "proposal",
        "proposal_conduct",
        "roster",
        "roster_member",
        "_migration",
    ] {
        assert!(info_str.contains(table), "missing {table} table");
    }
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    accredit_db::run_migrations(&db).await.unwrap();
    accredit_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1, "expected exactly one migration record");
}

#[tokio::test]
async fn unique_index_prevents_second_accreditation_per_profile() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    accredit_db::run_migrations(&db).await.unwrap();

    db.query("CREATE accreditation SET organization_profile_id = 'p-1'")
        .await
        .unwrap()
        .check()
        .unwrap();

    let result = db
        .query("CREATE accreditation SET organization_profile_id = 'p-1'")
        .await
        .unwrap()
        .check();

    assert!(
        result.is_err(),
        "second accreditation for one profile should be rejected"
    );
}

#[tokio::test]
async fn unique_index_prevents_duplicate_adviser_email() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    accredit_db::run_migrations(&db).await.unwrap();

    db.query("CREATE adviser SET name = 'A', email = 'a@school.edu'")
        .await
        .unwrap()
        .check()
        .unwrap();

    let result = db
        .query("CREATE adviser SET name = 'B', email = 'a@school.edu'")
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "duplicate adviser email should be rejected");
}
