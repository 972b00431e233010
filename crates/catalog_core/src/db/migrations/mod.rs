//! Upgrades of the `products` table layout.
//!
//! Each step is a SQL file embedded at build time. After a step runs, its
//! number is written to `PRAGMA user_version` inside the same transaction,
//! so a catalog file is always at exactly one known products schema.
//! Step numbers start at 1 and grow by one.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    sql: &'static str,
}

// 1: `products` table with insertion-order `seq` and category index.
const PRODUCT_SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Products schema version this build creates and expects.
pub fn latest_version() -> u32 {
    PRODUCT_SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings the catalog's products schema up to [`latest_version`].
///
/// A fresh file gets the `products` table; an up-to-date file is left
/// untouched. All pending steps commit together or not at all.
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the catalog file is ahead of
///   this build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in PRODUCT_SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > current_version)
    {
        tx.execute_batch(step.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", step.version))?;
    }
    tx.commit()?;

    Ok(())
}

/// Reads the products schema version stored in the catalog file (`0` when new).
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
