//! Domain services
//!
//! - [`assignment`] - table occupancy claims (compare-and-set)
//! - [`provisioning`] - online/offline customer creation
//! - [`dashboard`] - table overview with active orders
//! - [`media`] - local image storage

pub mod assignment;
pub mod dashboard;
pub mod media;
pub mod provisioning;

pub use assignment::{AssignmentError, TableAssignment};
pub use dashboard::{TableDashboard, TableView};
pub use media::{MediaService, StoredImage};
pub use provisioning::{CreateUserRequest, ProvisionedUser, Provisioning, ProvisioningError};
