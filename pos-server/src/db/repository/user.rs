//! Customer Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{User, UserCreate};
use crate::utils::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

pub const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all customers
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY name")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find customer by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let record = parse_id(id, TABLE)?;
        let user: Option<User> = self.base.db().select(record).await?;
        Ok(user)
    }

    /// Find customer by record id
    pub async fn find_by_record(&self, id: &RecordId) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.db().select(id.clone()).await?;
        Ok(user)
    }

    /// Find customer by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new customer.
    ///
    /// The email unique index rejects duplicates at insert time; no
    /// prior existence lookup is involved.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    name = $name,
                    email = $email,
                    contact_info = $contact_info,
                    hash_pass = $hash_pass,
                    profile_image = $profile_image,
                    profile_image_public_id = $profile_image_public_id,
                    total_person = $total_person,
                    is_online = $is_online,
                    current_table = NONE,
                    order_history = [],
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("email", data.email.clone()))
            .bind(("contact_info", data.contact_info))
            .bind(("hash_pass", data.hash_pass))
            .bind(("profile_image", data.profile_image))
            .bind(("profile_image_public_id", data.profile_image_public_id))
            .bind(("total_person", data.total_person))
            .bind(("is_online", data.is_online))
            .bind(("now", now))
            .await
            .map_err(|e| RepoError::from_write(e, "User"))?;

        let created: Option<User> = result
            .take(0)
            .map_err(|e| RepoError::from_write(e, "User"))?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Hard delete a customer
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<User> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }

    /// Point the customer at a table (or clear the binding)
    pub async fn set_current_table(
        &self,
        user: &RecordId,
        table: Option<RecordId>,
    ) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $user SET current_table = $table, updated_at = $now RETURN AFTER")
            .bind(("user", user.clone()))
            .bind(("table", table))
            .bind(("now", now_millis()))
            .await?;
        let updated: Vec<User> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Append an order to the customer's history
    pub async fn push_order(&self, user: &RecordId, order: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $user SET order_history += $order, updated_at = $now")
            .bind(("user", user.clone()))
            .bind(("order", order.clone()))
            .bind(("now", now_millis()))
            .await?
            .check()
            .map_err(RepoError::from)?;
        Ok(())
    }

    /// Remove an order from the customer's history
    pub async fn pull_order(&self, user: &RecordId, order: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $user SET order_history -= $order, updated_at = $now")
            .bind(("user", user.clone()))
            .bind(("order", order.clone()))
            .bind(("now", now_millis()))
            .await?
            .check()
            .map_err(RepoError::from)?;
        Ok(())
    }

    /// Persist the refresh token issued at login
    pub async fn save_refresh_token(&self, user: &RecordId, token: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $user SET refresh_token = $token, updated_at = $now")
            .bind(("user", user.clone()))
            .bind(("token", token.to_string()))
            .bind(("now", now_millis()))
            .await?
            .check()
            .map_err(RepoError::from)?;
        Ok(())
    }
}
