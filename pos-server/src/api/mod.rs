//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`admin`] - admin bootstrap and staff login
//! - [`images`] - stored image downloads
//! - [`users`] - customer provisioning and lookup
//! - [`tables`] - table creation and the floor dashboard
//! - [`dishes`] - menu management
//! - [`orders`] - order lifecycle

pub mod admin;
pub mod dishes;
pub mod health;
pub mod images;
pub mod orders;
pub mod tables;
pub mod users;

use serde::Deserialize;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// Credential login request (admin and customer logins)
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}
