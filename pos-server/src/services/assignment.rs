//! Table Assignment Service
//!
//! Binds a walk-in customer to a dining table. The occupancy check and
//! the claim are one conditional store statement, so concurrent
//! check-ins for the same table resolve to exactly one winner.

use surrealdb::RecordId;
use thiserror::Error;

use crate::db::models::DiningTable;
use crate::db::repository::{DiningTableRepository, RepoError, dining_table};
use crate::utils::AppError;

/// Assignment failures
#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("Invalid table id: {0}")]
    InvalidId(String),

    #[error("Table not found: {0}")]
    NotFound(String),

    #[error("Table is already occupied")]
    AlreadyOccupied,

    #[error("Store error: {0}")]
    Store(String),
}

impl From<AssignmentError> for AppError {
    fn from(e: AssignmentError) -> Self {
        match e {
            AssignmentError::InvalidId(msg) => AppError::validation(msg),
            AssignmentError::NotFound(msg) => AppError::not_found(msg),
            AssignmentError::AlreadyOccupied => {
                AppError::conflict("Table is already occupied")
            }
            AssignmentError::Store(msg) => AppError::database(msg),
        }
    }
}

#[derive(Clone)]
pub struct TableAssignment {
    tables: DiningTableRepository,
}

impl TableAssignment {
    pub fn new(tables: DiningTableRepository) -> Self {
        Self { tables }
    }

    /// Claim `table_id` for `customer`.
    ///
    /// 1. Validate the id format.
    /// 2. Load the table; absent ids fail before any write.
    /// 3. Fast-path reject when already occupied.
    /// 4. Conditional claim; losing a race after the fast path still
    ///    reports `AlreadyOccupied`.
    ///
    /// The caller owns the second half of the relationship
    /// (`user.current_table`) and must `release` on its own failure.
    pub async fn assign(
        &self,
        customer: &RecordId,
        table_id: &str,
    ) -> Result<DiningTable, AssignmentError> {
        let record = match crate::db::repository::parse_id(table_id, dining_table::TABLE) {
            Ok(r) => r,
            Err(_) => return Err(AssignmentError::InvalidId(table_id.to_string())),
        };

        let table = self
            .tables
            .find_by_id(table_id)
            .await
            .map_err(store_err)?
            .ok_or_else(|| AssignmentError::NotFound(format!("Table {} not found", table_id)))?;

        if table.is_occupied {
            return Err(AssignmentError::AlreadyOccupied);
        }

        match self
            .tables
            .try_occupy(&record, customer)
            .await
            .map_err(store_err)?
        {
            Some(updated) => {
                tracing::info!(
                    table = %record,
                    customer = %customer,
                    "Table assigned"
                );
                Ok(updated)
            }
            // A concurrent check-in won between the read and the claim
            None => Err(AssignmentError::AlreadyOccupied),
        }
    }

    /// Free a table (compensating action and order-delete policy).
    pub async fn release(&self, table: &RecordId) -> Result<Option<DiningTable>, AssignmentError> {
        let released = self.tables.release(table).await.map_err(store_err)?;
        if released.is_some() {
            tracing::info!(table = %table, "Table released");
        }
        Ok(released)
    }
}

fn store_err(e: RepoError) -> AssignmentError {
    AssignmentError::Store(e.to_string())
}
