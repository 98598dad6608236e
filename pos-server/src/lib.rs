//! POS Server - restaurant point-of-sale backend
//!
//! # Overview
//!
//! REST API for customers, dining tables, dishes and orders with
//! cookie/JWT authentication, backed by an embedded SurrealDB store.
//!
//! # Module structure
//!
//! ```text
//! pos-server/src/
//! ├── core/          # config, state, server startup
//! ├── auth/          # JWT tokens and request guards
//! ├── api/           # HTTP routes and handlers
//! ├── services/      # assignment, provisioning, dashboard, media
//! ├── db/            # models and repositories
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured events on the `security` target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
