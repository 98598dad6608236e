//! Repository Module
//!
//! CRUD access to the SurrealDB tables, one repository per entity.

// Accounts
pub mod admin;
pub mod user;

// Floor
pub mod dining_table;

// Menu
pub mod dish;

// Orders
pub mod order;

// Re-exports
pub use admin::AdminRepository;
pub use dining_table::DiningTableRepository;
pub use dish::DishRepository;
pub use order::OrderRepository;
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl RepoError {
    /// Translate a write error, detecting uniqueness violations.
    ///
    /// SurrealDB reports unique-index hits as "index ... already
    /// contains ..." and fixed-id collisions as "... already exists";
    /// either one is the signal from an atomic conditional insert.
    pub fn from_write(err: surrealdb::Error, what: &str) -> Self {
        let msg = err.to_string();
        if msg.contains("already contains") || msg.contains("already exists") {
            RepoError::Duplicate(format!("{what} already exists"))
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse an API-supplied id into a RecordId expected to live in `table`.
///
/// Bare keys are accepted and qualified ("abc" -> "user:abc"); ids that
/// name a different table are rejected.
pub fn parse_id(id: &str, table: &str) -> RepoResult<surrealdb::RecordId> {
    let qualified = if id.contains(':') {
        id.to_string()
    } else {
        format!("{table}:{id}")
    };

    let record: surrealdb::RecordId = qualified
        .parse()
        .map_err(|_| RepoError::Validation(format!("Invalid id: {id}")))?;

    if record.table() != table {
        return Err(RepoError::Validation(format!(
            "Invalid {table} id: {id}"
        )));
    }

    Ok(record)
}
