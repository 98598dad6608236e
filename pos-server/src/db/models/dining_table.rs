//! Dining Table Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Dining table entity
///
/// Occupancy invariant: `is_occupied` is true exactly when
/// `current_customer` is set. Only the table assignment service mutates
/// these two fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub capacity: i32,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_occupied: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub current_customer: Option<RecordId>,
}

impl DiningTable {
    /// True when occupancy and the customer link agree.
    pub fn occupancy_consistent(&self) -> bool {
        self.is_occupied == self.current_customer.is_some()
    }
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub name: String,
    pub capacity: i32,
}
