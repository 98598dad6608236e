//! User Provisioning Service
//!
//! Creates online customers (self-registered, with credentials) and
//! offline walk-ins (staff-registered, bound to a table). The offline
//! path composes with the table assignment service and compensates on
//! partial failure so no half-provisioned customer is left behind.

use thiserror::Error;

use crate::db::models::{DiningTable, User, UserCreate};
use crate::db::repository::{RepoError, UserRepository};
use crate::services::assignment::{AssignmentError, TableAssignment};
use crate::services::media::MediaService;
use crate::utils::{AppError, MissingFields};

/// Provisioning request, assembled from the multipart form by the handler
#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub is_online: bool,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub contact_info: Option<String>,
    pub current_table_id: Option<String>,
    pub total_person: Option<i32>,
    pub profile_image: Option<Vec<u8>>,
}

/// Provisioning result: the customer plus, for walk-ins, the bound table
#[derive(Debug, Clone)]
pub struct ProvisionedUser {
    pub user: User,
    pub table: Option<DiningTable>,
}

/// Provisioning failures
#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("{0}")]
    Validation(String),

    #[error("User already exists")]
    DuplicateEmail,

    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<ProvisioningError> for AppError {
    fn from(e: ProvisioningError) -> Self {
        match e {
            ProvisioningError::Validation(msg) => AppError::validation(msg),
            ProvisioningError::DuplicateEmail => AppError::conflict("User already exists"),
            ProvisioningError::Assignment(inner) => inner.into(),
            ProvisioningError::Store(msg) => AppError::database(msg),
        }
    }
}

#[derive(Clone)]
pub struct Provisioning {
    users: UserRepository,
    assignment: TableAssignment,
    media: MediaService,
}

impl Provisioning {
    pub fn new(users: UserRepository, assignment: TableAssignment, media: MediaService) -> Self {
        Self {
            users,
            assignment,
            media,
        }
    }

    /// Create a customer, branching on the `is_online` flag.
    pub async fn create(
        &self,
        request: CreateUserRequest,
    ) -> Result<ProvisionedUser, ProvisioningError> {
        if request.is_online {
            self.create_online(request).await
        } else {
            self.create_offline(request).await
        }
    }

    /// Online path: full registration with credentials. No table
    /// interaction.
    async fn create_online(
        &self,
        request: CreateUserRequest,
    ) -> Result<ProvisionedUser, ProvisioningError> {
        let mut missing = MissingFields::new();
        missing.check("name", &request.name);
        missing.check("email", &request.email);
        missing.check("password", &request.password);
        missing.check("role", &request.role);
        missing.check("contact_info", &request.contact_info);
        missing
            .into_result()
            .map_err(|e| ProvisioningError::Validation(e.to_string()))?;

        let password = request.password.unwrap_or_default();
        let hash_pass = User::hash_password(&password)
            .map_err(|e| ProvisioningError::Store(format!("Failed to hash password: {}", e)))?;

        // Media is best-effort; registration proceeds without a picture
        let image = self.media.store_or_empty(request.profile_image.as_deref());

        let user = self
            .users
            .create(UserCreate {
                name: request.name.unwrap_or_default(),
                email: request.email.unwrap_or_default(),
                contact_info: request.contact_info.unwrap_or_default(),
                hash_pass: Some(hash_pass),
                profile_image: image.url,
                profile_image_public_id: image.public_id,
                total_person: request.total_person.unwrap_or(1),
                is_online: true,
            })
            .await
            .map_err(map_create_err)?;

        Ok(ProvisionedUser { user, table: None })
    }

    /// Offline path: walk-in check-in.
    ///
    /// Repeat visitors (matched by email) are re-assigned to the
    /// requested table; new visitors are created first and removed again
    /// if the table cannot be claimed.
    async fn create_offline(
        &self,
        request: CreateUserRequest,
    ) -> Result<ProvisionedUser, ProvisioningError> {
        let table_id = match &request.current_table_id {
            Some(id) if !id.trim().is_empty() => id.clone(),
            _ => {
                return Err(ProvisioningError::Validation(
                    "Current table id is required".to_string(),
                ));
            }
        };

        let mut missing = MissingFields::new();
        missing.check("name", &request.name);
        missing.check("email", &request.email);
        missing
            .into_result()
            .map_err(|e| ProvisioningError::Validation(e.to_string()))?;

        let email = request.email.clone().unwrap_or_default();

        if let Some(existing) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(|e| ProvisioningError::Store(e.to_string()))?
        {
            return self.check_in_existing(existing, &table_id).await;
        }

        let user = self
            .users
            .create(UserCreate {
                name: request.name.unwrap_or_default(),
                email,
                contact_info: request.contact_info.unwrap_or_default(),
                hash_pass: None,
                profile_image: String::new(),
                profile_image_public_id: String::new(),
                total_person: request.total_person.unwrap_or(1),
                is_online: false,
            })
            .await
            .map_err(map_create_err)?;

        let user_id = user
            .id
            .clone()
            .ok_or_else(|| ProvisioningError::Store("Created user has no id".to_string()))?;

        let table = match self.assignment.assign(&user_id, &table_id).await {
            Ok(table) => table,
            Err(e) => {
                // Compensate: the walk-in only exists for this check-in,
                // so a failed assignment must not leave the record behind
                if let Err(del) = self.users.delete(&user_id).await {
                    tracing::error!(user = %user_id, error = %del, "Failed to clean up user after assignment failure");
                }
                return Err(e.into());
            }
        };

        let user = match self.bind_table(&user_id, &table).await {
            Ok(user) => user,
            Err(e) => {
                // Roll the claim back before surfacing the error
                let table_record = table.id.clone();
                if let Some(record) = table_record
                    && let Err(rel) = self.assignment.release(&record).await
                {
                    tracing::error!(table = %record, error = %rel, "Failed to release table after bind failure");
                }
                if let Err(del) = self.users.delete(&user_id).await {
                    tracing::error!(user = %user_id, error = %del, "Failed to clean up user after bind failure");
                }
                return Err(e);
            }
        };

        Ok(ProvisionedUser {
            user,
            table: Some(table),
        })
    }

    /// Re-check-in a returning walk-in at a new table.
    async fn check_in_existing(
        &self,
        existing: User,
        table_id: &str,
    ) -> Result<ProvisionedUser, ProvisioningError> {
        let user_id = existing
            .id
            .clone()
            .ok_or_else(|| ProvisioningError::Store("Stored user has no id".to_string()))?;

        let table = self.assignment.assign(&user_id, table_id).await?;

        let user = match self.bind_table(&user_id, &table).await {
            Ok(user) => user,
            Err(e) => {
                if let Some(record) = table.id.clone()
                    && let Err(rel) = self.assignment.release(&record).await
                {
                    tracing::error!(table = %record, error = %rel, "Failed to release table after bind failure");
                }
                return Err(e);
            }
        };

        Ok(ProvisionedUser {
            user,
            table: Some(table),
        })
    }

    /// Second half of the bidirectional link: user → table.
    async fn bind_table(
        &self,
        user_id: &surrealdb::RecordId,
        table: &DiningTable,
    ) -> Result<User, ProvisioningError> {
        let table_record = table
            .id
            .clone()
            .ok_or_else(|| ProvisioningError::Store("Assigned table has no id".to_string()))?;

        self.users
            .set_current_table(user_id, Some(table_record))
            .await
            .map_err(|e| ProvisioningError::Store(e.to_string()))?
            .ok_or_else(|| ProvisioningError::Store("User vanished during check-in".to_string()))
    }
}

fn map_create_err(e: RepoError) -> ProvisioningError {
    match e {
        RepoError::Duplicate(_) => ProvisioningError::DuplicateEmail,
        other => ProvisioningError::Store(other.to_string()),
    }
}
