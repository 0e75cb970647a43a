use chrono::Utc;
use sqlx::{Sqlite, Transaction};

use crate::db::DbPool;
use crate::db::tables::{
    ChecklistItemTable, ChecklistResponseTable, DefectRecordTable, InspectionTable,
    InspectorTable, PhotoTable, ProductTypeTable, SettingsTable,
};
use crate::error::{AppError, Result};

/// Current schema version, stored in the database file via
/// `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 2;

/// Default product types available before any user configuration.
const PRODUCT_TYPE_SEED: &[(&str, &str, &str)] = &[
    ("sheet", "Steel Sheet", "Flat steel products"),
    ("pipe", "Steel Pipe", "Tubular steel products"),
    ("bar", "Steel Bar", "Long steel products"),
    ("profile", "Steel Profile", "Structural steel sections"),
    ("coil", "Steel Coil", "Coiled steel products"),
    ("plate", "Steel Plate", "Thick steel plates"),
];

/// Bring the schema up to the current version.
pub async fn run(pool: &DbPool) -> Result<()> {
    run_to(pool, SCHEMA_VERSION).await
}

/// Apply migrations one (from, to) step at a time, each inside its own
/// transaction, up to the requested target version.
pub(crate) async fn run_to(pool: &DbPool, target: i64) -> Result<()> {
    let mut version = current_version(pool).await?;

    while version < target {
        let next = version + 1;
        let mut tx = pool.begin().await?;

        match (version, next) {
            (0, 1) => migrate_v1(&mut tx).await?,
            (1, 2) => migrate_v2(&mut tx).await?,
            (from, to) => {
                return Err(AppError::Database(sqlx::Error::Protocol(format!(
                    "no migration from schema version {from} to {to}"
                ))));
            }
        }

        sqlx::query(&format!("PRAGMA user_version = {next}"))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(from_version = version, to_version = next, "applied database migration");
        version = next;
    }

    Ok(())
}

pub async fn current_version(pool: &DbPool) -> Result<i64> {
    let (version,): (i64,) = sqlx::query_as("PRAGMA user_version").fetch_one(pool).await?;
    Ok(version)
}

/// Initial schema: all tables, their indexes, the settings row and the
/// default product types.
async fn migrate_v1(tx: &mut Transaction<'_, Sqlite>) -> Result<()> {
    let statements = [
        InspectorTable::create_table(),
        ProductTypeTable::create_table(),
        InspectionTable::create_table(),
        DefectRecordTable::create_table(),
        PhotoTable::create_table(),
        ChecklistItemTable::create_table(),
        ChecklistResponseTable::create_table(),
        SettingsTable::create_table(),
        SettingsTable::seed_row(),
    ];
    for statement in statements {
        sqlx::query(statement).execute(&mut **tx).await?;
    }

    let indexes = [
        InspectorTable::create_indexes(),
        ProductTypeTable::create_indexes(),
        InspectionTable::create_indexes(),
        DefectRecordTable::create_indexes(),
        PhotoTable::create_indexes(),
        ChecklistItemTable::create_indexes(),
        ChecklistResponseTable::create_indexes(),
    ];
    for statement in indexes.into_iter().flatten() {
        sqlx::query(statement).execute(&mut **tx).await?;
    }

    let now = Utc::now();
    for (id, name, description) in PRODUCT_TYPE_SEED {
        sqlx::query(
            "INSERT INTO product_types (id, name, description, is_active, created_at)
             VALUES (?, ?, ?, 1, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(now)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Add GPS coordinates to inspections. Existing rows are back-filled with
/// 0.0; everything else is left untouched.
async fn migrate_v2(tx: &mut Transaction<'_, Sqlite>) -> Result<()> {
    sqlx::query("ALTER TABLE inspections ADD COLUMN latitude REAL DEFAULT 0.0")
        .execute(&mut **tx)
        .await?;
    sqlx::query("ALTER TABLE inspections ADD COLUMN longitude REAL DEFAULT 0.0")
        .execute(&mut **tx)
        .await?;
    Ok(())
}
