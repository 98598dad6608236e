//! Server configuration
//!
//! All settings come from environment variables with defaults:
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | WORK_DIR | ./data | Working directory (database, uploads, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development / staging / production |
//! | CORS_ORIGIN | (unset) | Allowed browser origin; permissive when unset |
//! | RELEASE_TABLE_ON_ORDER_DELETE | false | Free the table when a dine-in order is deleted |
//! | JWT_SECRET / JWT_* | see auth::jwt | Token signing settings |

use std::path::PathBuf;

use crate::auth::JwtConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database, uploads and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Allowed CORS origin; `None` means permissive (development)
    pub cors_origin: Option<String>,
    /// JWT settings
    pub jwt: JwtConfig,
    /// Whether deleting a dine-in order also frees its table.
    ///
    /// Off by default: tables normally outlive individual orders and
    /// are freed by a later checkout flow.
    pub release_table_on_order_delete: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|o| !o.is_empty()),
            jwt: JwtConfig::default(),
            release_table_on_order_delete: std::env::var("RELEASE_TABLE_ON_ORDER_DELETE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    /// Database directory under the working dir
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Log directory under the working dir
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the working directory layout if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        std::fs::create_dir_all(PathBuf::from(&self.work_dir).join("uploads/images"))?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
