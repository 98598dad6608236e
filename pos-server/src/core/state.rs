//! Server state
//!
//! Shared handles for every request handler: configuration, the
//! embedded database and the JWT/media services. Cloning is shallow.

use std::path::PathBuf;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{
    AdminRepository, DiningTableRepository, DishRepository, OrderRepository, UserRepository,
};
use crate::services::{MediaService, Provisioning, TableAssignment, TableDashboard};

#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT service (shared)
    pub jwt_service: Arc<JwtService>,
    /// Local image storage
    pub media: MediaService,
}

impl ServerState {
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        media: MediaService,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            media,
        }
    }

    /// Initialize state: working directory, database, services.
    ///
    /// # Panics
    ///
    /// A failed store open at startup is unrecoverable and terminates
    /// the process.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("pos.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let media = MediaService::new(&PathBuf::from(&config.work_dir));

        Self::new(config.clone(), db_service.db, jwt_service, media)
    }

    // ── Repositories ────────────────────────────────────────────────

    pub fn admins(&self) -> AdminRepository {
        AdminRepository::new(self.db.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    pub fn tables(&self) -> DiningTableRepository {
        DiningTableRepository::new(self.db.clone())
    }

    pub fn dishes(&self) -> DishRepository {
        DishRepository::new(self.db.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.db.clone())
    }

    // ── Services ────────────────────────────────────────────────────

    pub fn assignment(&self) -> TableAssignment {
        TableAssignment::new(self.tables())
    }

    pub fn provisioning(&self) -> Provisioning {
        Provisioning::new(self.users(), self.assignment(), self.media.clone())
    }

    pub fn dashboard(&self) -> TableDashboard {
        TableDashboard::new(self.tables(), self.users(), self.orders(), self.dishes())
    }
}
