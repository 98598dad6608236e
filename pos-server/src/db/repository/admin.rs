//! Admin Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Admin, AdminCreate};
use crate::utils::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

pub const TABLE: &str = "admin";

#[derive(Clone)]
pub struct AdminRepository {
    base: BaseRepository,
}

impl AdminRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find admin by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Admin>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM admin WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let admins: Vec<Admin> = result.take(0)?;
        Ok(admins.into_iter().next())
    }

    /// Create the admin account.
    ///
    /// The record id is fixed, so a second bootstrap attempt fails
    /// atomically at the insert instead of racing an existence check.
    pub async fn create(&self, data: AdminCreate) -> RepoResult<Admin> {
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE admin:root SET
                    name = $name,
                    email = $email,
                    hash_pass = $hash_pass,
                    profile_image = $profile_image,
                    profile_image_public_id = $profile_image_public_id,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("email", data.email))
            .bind(("hash_pass", data.hash_pass))
            .bind(("profile_image", data.profile_image))
            .bind(("profile_image_public_id", data.profile_image_public_id))
            .bind(("now", now))
            .await
            .map_err(|e| RepoError::from_write(e, "Admin"))?;

        let created: Option<Admin> = result
            .take(0)
            .map_err(|e| RepoError::from_write(e, "Admin"))?;
        created.ok_or_else(|| RepoError::Database("Failed to create admin".to_string()))
    }

    /// Persist the refresh token issued at login
    pub async fn save_refresh_token(&self, admin: &RecordId, token: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $admin SET refresh_token = $token, updated_at = $now")
            .bind(("admin", admin.clone()))
            .bind(("token", token.to_string()))
            .bind(("now", now_millis()))
            .await?
            .check()
            .map_err(RepoError::from)?;
        Ok(())
    }
}
