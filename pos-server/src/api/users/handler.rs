//! Customer API Handlers
//!
//! Customer provisioning (online registration and walk-in check-in),
//! login, and lookups.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use serde::Serialize;
use tower_cookies::Cookies;

use crate::api::LoginRequest;
use crate::api::admin::handler::set_token_cookies;
use crate::core::ServerState;
use crate::db::models::{DiningTable, User};
use crate::services::CreateUserRequest;
use crate::utils::{ApiResponse, AppError, AppResult, MissingFields, ok, ok_message};

#[derive(Serialize)]
pub struct UserBody {
    pub user: User,
}

#[derive(Serialize)]
pub struct UsersBody {
    pub users: Vec<User>,
}

#[derive(Serialize)]
pub struct ProvisionedBody {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<DiningTable>,
}

/// POST /api/v1/user/create-user - online/offline provisioning
///
/// Multipart form; the `isOnline` flag picks the branch. Online
/// registrations carry credentials, walk-ins carry a table id.
pub async fn create_user(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<ProvisionedBody>>> {
    let mut request = CreateUserRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "isOnline" => request.is_online = field.text().await? == "true",
            "name" => request.name = Some(field.text().await?),
            "email" => request.email = Some(field.text().await?),
            "password" => request.password = Some(field.text().await?),
            "role" => request.role = Some(field.text().await?),
            "contactInfo" => request.contact_info = Some(field.text().await?),
            "currentTableId" => request.current_table_id = Some(field.text().await?),
            "totalPerson" => {
                let raw = field.text().await?;
                request.total_person = Some(raw.trim().parse().map_err(|_| {
                    AppError::validation(format!("Invalid totalPerson: {}", raw))
                })?);
            }
            "profileImage" => request.profile_image = Some(field.bytes().await?.to_vec()),
            _ => {}
        }
    }

    let provisioned = state.provisioning().create(request).await?;

    Ok(ok(
        "User created successfully",
        ProvisionedBody {
            user: provisioned.user,
            table: provisioned.table,
        },
    ))
}

/// POST /api/v1/user/login-user - customer login
pub async fn login_user(
    State(state): State<ServerState>,
    cookies: Cookies,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let mut missing = MissingFields::new();
    missing.check("email", &req.email);
    missing.check("password", &req.password);
    missing.into_result()?;

    let email = req.email.unwrap_or_default();
    let user = state
        .users()
        .find_by_email(&email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let password_valid = user
        .verify_password(&req.password.unwrap_or_default())
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

    if !password_valid {
        tracing::warn!(email = %email, "User login failed");
        return Err(AppError::invalid_credentials());
    }

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    let access_token = state
        .jwt_service
        .generate_access_token(&user_id, &user.name, &user.email, &user.contact_info)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;
    let refresh_token = state
        .jwt_service
        .generate_refresh_token(&user_id)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    if let Some(id) = &user.id {
        state.users().save_refresh_token(id, &refresh_token).await?;
    }

    set_token_cookies(&cookies, &access_token, &refresh_token);

    tracing::info!(user_id = %user_id, "User logged in");

    Ok(ok_message("Login successful"))
}

/// DELETE /api/v1/user/{id} - remove a customer
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let user = state
        .users()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let record = user
        .id
        .ok_or_else(|| AppError::internal("Stored user has no id"))?;

    if !state.users().delete(&record).await? {
        return Err(AppError::not_found("User not found"));
    }

    Ok(ok_message("User deleted successfully"))
}

/// GET /api/v1/user/ - list customers
///
/// Password hashes and refresh tokens never serialize, so the model is
/// safe to return as-is.
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<UsersBody>>> {
    let users = state.users().find_all().await?;
    Ok(ok("User found", UsersBody { users }))
}

/// GET /api/v1/user/{id} - fetch one customer
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<UserBody>>> {
    let user = state
        .users()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(ok("User found", UserBody { user }))
}
