//! Schema convention checks.
//!
//! Guards the migration set against drift: status CHECK constraints must
//! match the constants in `pawhaven_core::status`, the case-insensitive
//! email index must exist, and every table keeps the shared timestamp
//! conventions.

use pawhaven_core::status::{VALID_LISTING_STATUSES, VALID_REQUEST_STATUSES};
use sqlx::PgPool;

const ENTITY_TABLES: [&str; 4] = ["users", "gallery_items", "pet_listings", "adoption_requests"];

/// Fetch the CHECK clause guarding `table.column`, if any.
///
/// Postgres stores `IN (...)` checks normalized as `= ANY (ARRAY[...])`.
async fn check_clause(pool: &PgPool, table: &str, column: &str) -> Option<String> {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT cc.check_clause
         FROM information_schema.check_constraints cc
         JOIN information_schema.constraint_column_usage ccu
             ON cc.constraint_name = ccu.constraint_name
             AND cc.constraint_schema = ccu.constraint_schema
         WHERE ccu.table_schema = 'public'
           AND ccu.table_name = $1
           AND ccu.column_name = $2
           AND cc.check_clause LIKE '%ANY%'",
    )
    .bind(table)
    .bind(column)
    .fetch_optional(pool)
    .await
    .unwrap();
    row.map(|(clause,)| clause)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_status_checks_match_core_constants(pool: PgPool) {
    let clause = check_clause(&pool, "pet_listings", "status")
        .await
        .expect("pet_listings.status should carry a CHECK constraint");
    for status in VALID_LISTING_STATUSES {
        assert!(
            clause.contains(status),
            "pet_listings.status CHECK is missing '{status}': {clause}"
        );
    }

    let clause = check_clause(&pool, "adoption_requests", "status")
        .await
        .expect("adoption_requests.status should carry a CHECK constraint");
    for status in VALID_REQUEST_STATUSES {
        assert!(
            clause.contains(status),
            "adoption_requests.status CHECK is missing '{status}': {clause}"
        );
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_role_check_matches_core_constants(pool: PgPool) {
    let clause = check_clause(&pool, "users", "role")
        .await
        .expect("users.role should carry a CHECK constraint");
    for role in pawhaven_core::roles::VALID_ROLES {
        assert!(
            clause.contains(role),
            "users.role CHECK is missing '{role}': {clause}"
        );
    }
}

/// Duplicate-email rejection relies on this exact index; the API layer maps
/// its `uq_` constraint name to a conflict response.
#[sqlx::test(migrations = "./migrations")]
async fn test_email_unique_index_is_case_insensitive(pool: PgPool) {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT indexdef FROM pg_indexes
         WHERE schemaname = 'public' AND indexname = 'uq_users_email'",
    )
    .fetch_optional(&pool)
    .await
    .unwrap();

    let (indexdef,) = row.expect("uq_users_email index should exist");
    assert!(indexdef.contains("UNIQUE"), "uq_users_email must be unique: {indexdef}");
    assert!(
        indexdef.to_lowercase().contains("lower"),
        "uq_users_email must index LOWER(email): {indexdef}"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_all_tables_have_timestamps(pool: PgPool) {
    for table in ENTITY_TABLES {
        for col in ["created_at", "updated_at"] {
            let row: Option<(String,)> = sqlx::query_as(
                "SELECT data_type
                 FROM information_schema.columns
                 WHERE table_schema = 'public'
                   AND table_name = $1
                   AND column_name = $2",
            )
            .bind(table)
            .bind(col)
            .fetch_optional(&pool)
            .await
            .unwrap();

            let (data_type,) = row.unwrap_or_else(|| panic!("{table} is missing {col}"));
            assert_eq!(
                data_type, "timestamp with time zone",
                "{table}.{col} should be timestamptz, got {data_type}"
            );
        }
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_all_tables_have_updated_at_trigger(pool: PgPool) {
    for table in ENTITY_TABLES {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.triggers
                WHERE event_object_schema = 'public'
                  AND event_object_table = $1
                  AND action_statement LIKE '%set_updated_at%'
            )",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(row.0, "{table} is missing the set_updated_at trigger");
    }
}

/// The trigger actually advances `updated_at` on UPDATE.
#[sqlx::test(migrations = "./migrations")]
async fn test_updated_at_advances_on_update(pool: PgPool) {
    let before: (i64, chrono::DateTime<chrono::Utc>) = sqlx::query_as(
        "INSERT INTO gallery_items (category, caption, image_path)
         VALUES ('events', 'before', 'images/x.jpg')
         RETURNING id, updated_at",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    // NOW() is transaction-stable; put a measurable gap between the two.
    sqlx::query("SELECT pg_sleep(0.05)").execute(&pool).await.unwrap();
    sqlx::query("UPDATE gallery_items SET caption = 'after' WHERE id = $1")
        .bind(before.0)
        .execute(&pool)
        .await
        .unwrap();

    let after: (chrono::DateTime<chrono::Utc>,) =
        sqlx::query_as("SELECT updated_at FROM gallery_items WHERE id = $1")
            .bind(before.0)
            .fetch_one(&pool)
            .await
            .unwrap();

    assert!(
        after.0 > before.1,
        "updated_at should advance, got {} -> {}",
        before.1,
        after.0
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_all_fk_columns_are_indexed(pool: PgPool) {
    let fk_columns: Vec<(String, String)> = sqlx::query_as(
        "SELECT DISTINCT tc.table_name, kcu.column_name
         FROM information_schema.table_constraints tc
         JOIN information_schema.key_column_usage kcu
             ON tc.constraint_name = kcu.constraint_name
             AND tc.table_schema = kcu.table_schema
         WHERE tc.constraint_type = 'FOREIGN KEY'
           AND tc.table_schema = 'public'
         ORDER BY tc.table_name, kcu.column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert!(!fk_columns.is_empty(), "expected foreign keys in the schema");

    for (table, column) in &fk_columns {
        let has_index: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM pg_indexes
                WHERE schemaname = 'public'
                  AND tablename = $1
                  AND indexdef LIKE '%(' || $2 || ')%'
            )",
        )
        .bind(table)
        .bind(column)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(has_index.0, "FK column {table}.{column} has no index");
    }
}
