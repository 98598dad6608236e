//! Database Module
//!
//! Embedded SurrealDB store. Opens the engine, selects the namespace and
//! applies the schema (tables plus the unique indexes that close
//! find-then-create races) before handing out the connection.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "pos";
const DATABASE: &str = "pos";

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk store at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::prepare(db).await
    }

    /// Open an in-memory store (tests)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;

        tracing::info!("Database ready (embedded SurrealDB)");
        Ok(Self { db })
    }
}

/// Idempotent schema setup.
///
/// Uniqueness (admin/user email, dish name, table name) lives in the
/// store so a duplicate insert is rejected atomically at write time
/// instead of by a separate lookup.
async fn define_schema(db: &Surreal<Db>) -> Result<(), surrealdb::Error> {
    db.query(
        "
        DEFINE TABLE IF NOT EXISTS admin SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS admin_email ON TABLE admin COLUMNS email UNIQUE;

        DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS user_email ON TABLE user COLUMNS email UNIQUE;

        DEFINE TABLE IF NOT EXISTS dining_table SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS dining_table_name ON TABLE dining_table COLUMNS name UNIQUE;

        DEFINE TABLE IF NOT EXISTS dish SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS dish_name ON TABLE dish COLUMNS name UNIQUE;

        DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
        ",
    )
    .await?
    .check()?;
    Ok(())
}
