//! Customer Model
//!
//! Covers both online customers (self-registered, hold credentials) and
//! offline walk-ins (staff-registered, bound to a table instead of a
//! login).

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Customer ID type
pub type UserId = RecordId;

/// Customer entity
///
/// `hash_pass` and `refresh_token` deserialize from the store but are
/// never serialized into responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub contact_info: String,
    #[serde(default, skip_serializing)]
    pub hash_pass: Option<String>,
    #[serde(default)]
    pub profile_image: String,
    #[serde(default)]
    pub profile_image_public_id: String,
    /// Party size for walk-ins
    #[serde(default = "default_total_person")]
    pub total_person: i32,
    #[serde(default, skip_serializing)]
    pub refresh_token: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_online: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub current_table: Option<RecordId>,
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub order_history: Vec<RecordId>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_total_person() -> i32 {
    1
}

impl User {
    /// Verify a password against the stored argon2 hash.
    ///
    /// Offline customers have no credentials; verification always fails
    /// for them.
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let Some(hash) = &self.hash_pass else {
            return Ok(false);
        };

        let parsed_hash = PasswordHash::new(hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password with argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

/// Create customer payload (password already hashed by the caller)
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub contact_info: String,
    pub hash_pass: Option<String>,
    pub profile_image: String,
    pub profile_image_public_id: String,
    pub total_person: i32,
    pub is_online: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = User::hash_password("s3cret").expect("hashing failed");
        let user = User {
            id: None,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            contact_info: String::new(),
            hash_pass: Some(hash),
            profile_image: String::new(),
            profile_image_public_id: String::new(),
            total_person: 1,
            refresh_token: None,
            is_online: true,
            current_table: None,
            order_history: vec![],
            created_at: 0,
            updated_at: 0,
        };

        assert!(user.verify_password("s3cret").expect("verify failed"));
        assert!(!user.verify_password("wrong").expect("verify failed"));
    }

    #[test]
    fn secrets_never_serialize() {
        let user = User {
            id: None,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            contact_info: String::new(),
            hash_pass: Some("hash".to_string()),
            profile_image: String::new(),
            profile_image_public_id: String::new(),
            total_person: 1,
            refresh_token: Some("refresh".to_string()),
            is_online: true,
            current_table: None,
            order_history: vec![],
            created_at: 0,
            updated_at: 0,
        };

        let json = serde_json::to_value(&user).expect("serialize failed");
        assert!(json.get("hash_pass").is_none());
        assert!(json.get("refresh_token").is_none());
    }

    #[test]
    fn offline_customer_has_no_credentials() {
        let user = User {
            id: None,
            name: "Walk In".to_string(),
            email: "walkin@example.com".to_string(),
            contact_info: String::new(),
            hash_pass: None,
            profile_image: String::new(),
            profile_image_public_id: String::new(),
            total_person: 3,
            refresh_token: None,
            is_online: false,
            current_table: None,
            order_history: vec![],
            created_at: 0,
            updated_at: 0,
        };

        assert!(!user.verify_password("anything").expect("verify failed"));
    }
}
