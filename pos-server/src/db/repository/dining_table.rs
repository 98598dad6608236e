//! Dining Table Repository
//!
//! Occupancy writes go through [`try_occupy`] / [`release`], which are
//! single conditional statements so concurrent check-ins cannot both
//! claim the same table.
//!
//! [`try_occupy`]: DiningTableRepository::try_occupy
//! [`release`]: DiningTableRepository::release

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{DiningTable, DiningTableCreate};
use crate::utils::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

pub const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all dining tables
    pub async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table ORDER BY name")
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let record = parse_id(id, TABLE)?;
        let table: Option<DiningTable> = self.base.db().select(record).await?;
        Ok(table)
    }

    /// Create a new dining table
    ///
    /// Name uniqueness is enforced by the store index, so a duplicate
    /// surfaces as `Duplicate` from the insert itself.
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE dining_table SET
                    name = $name,
                    capacity = $capacity,
                    is_occupied = false,
                    current_customer = NONE,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name.clone()))
            .bind(("capacity", data.capacity))
            .bind(("now", now))
            .await
            .map_err(|e| RepoError::from_write(e, &format!("Table '{}'", data.name)))?;

        let created: Option<DiningTable> = result
            .take(0)
            .map_err(|e| RepoError::from_write(e, &format!("Table '{}'", data.name)))?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Claim a free table for a customer.
    ///
    /// Compare-and-set: the occupancy check and the write are one
    /// statement, so of two concurrent claims at most one sees
    /// `is_occupied = false`. Returns `None` when the table was already
    /// taken at write time.
    pub async fn try_occupy(
        &self,
        table: &RecordId,
        customer: &RecordId,
    ) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $table SET
                    is_occupied = true,
                    current_customer = $customer,
                    updated_at = $now
                WHERE is_occupied = false
                RETURN AFTER"#,
            )
            .bind(("table", table.clone()))
            .bind(("customer", customer.clone()))
            .bind(("now", now_millis()))
            .await?;

        let updated: Vec<DiningTable> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Free a table, clearing the customer link.
    pub async fn release(&self, table: &RecordId) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $table SET
                    is_occupied = false,
                    current_customer = NONE,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("table", table.clone()))
            .bind(("now", now_millis()))
            .await?;

        let updated: Vec<DiningTable> = result.take(0)?;
        Ok(updated.into_iter().next())
    }
}
