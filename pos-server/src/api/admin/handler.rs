//! Admin API Handlers
//!
//! Bootstrap of the single admin account, staff login with the
//! access/refresh cookie pair, and standalone token validation.

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};

use crate::api::LoginRequest;
use crate::auth::{ACCESS_TOKEN_COOKIE, JwtService, REFRESH_TOKEN_COOKIE};
use crate::core::ServerState;
use crate::db::models::{Admin, AdminCreate};
use crate::utils::{ApiResponse, AppError, AppResult, MissingFields, ok, ok_message};

#[derive(Serialize)]
pub struct AdminBody {
    pub admin: Admin,
}

#[derive(Serialize)]
pub struct AdminLoginBody {
    pub admin: Admin,
    pub access_token: String,
}

#[derive(Deserialize)]
pub struct ValidateTokenRequest {
    pub token: Option<String>,
}

/// POST /api/v1/admin/create-admin - bootstrap the admin account
pub async fn create_admin(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<AdminBody>>> {
    let mut name = None;
    let mut email = None;
    let mut password = None;
    let mut profile_image: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => name = Some(field.text().await?),
            "email" => email = Some(field.text().await?),
            "password" => password = Some(field.text().await?),
            "profileImage" => profile_image = Some(field.bytes().await?.to_vec()),
            _ => {}
        }
    }

    let mut missing = MissingFields::new();
    missing.check("name", &name);
    missing.check("email", &email);
    missing.check("password", &password);
    missing.into_result()?;

    let image_bytes = profile_image
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::validation("Profile image is required"))?;

    // Storage failure is non-fatal; the account still gets created
    let image = state.media.store_or_empty(Some(&image_bytes));

    let hash_pass = Admin::hash_password(&password.unwrap_or_default())
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let admin = state
        .admins()
        .create(AdminCreate {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            hash_pass,
            profile_image: image.url,
            profile_image_public_id: image.public_id,
        })
        .await?;

    tracing::info!(email = %admin.email, "Admin account created");

    Ok(ok("Admin created successfully", AdminBody { admin }))
}

/// POST /api/v1/admin/login-admin - staff login
pub async fn login_admin(
    State(state): State<ServerState>,
    cookies: Cookies,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AdminLoginBody>>> {
    let mut missing = MissingFields::new();
    missing.check("email", &req.email);
    missing.check("password", &req.password);
    missing.into_result()?;

    let email = req.email.unwrap_or_default();
    let admin = state
        .admins()
        .find_by_email(&email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let password_valid = admin
        .verify_password(&req.password.unwrap_or_default())
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

    if !password_valid {
        tracing::warn!(email = %email, "Admin login failed");
        return Err(AppError::invalid_credentials());
    }

    let admin_id = admin.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    let access_token = state
        .jwt_service
        .generate_access_token(&admin_id, &admin.name, &admin.email, "")
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;
    let refresh_token = state
        .jwt_service
        .generate_refresh_token(&admin_id)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    if let Some(id) = &admin.id {
        state.admins().save_refresh_token(id, &refresh_token).await?;
    }

    set_token_cookies(&cookies, &access_token, &refresh_token);

    tracing::info!(admin_id = %admin_id, "Admin logged in");

    Ok(ok(
        "Admin logged in successfully",
        AdminLoginBody {
            admin,
            access_token,
        },
    ))
}

/// POST /api/v1/admin/validate-token - standalone token check
///
/// Token comes from the request body or the Authorization header.
pub async fn validate_token(
    State(state): State<ServerState>,
    headers: http::HeaderMap,
    body: Option<Json<ValidateTokenRequest>>,
) -> AppResult<Json<ApiResponse<()>>> {
    let body_token = body.and_then(|Json(req)| req.token);
    let header_token = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
        .map(|t| t.to_string());

    let token = body_token
        .or(header_token)
        .ok_or(AppError::Unauthorized)?;

    state
        .jwt_service
        .validate_access_token(&token)
        .map_err(|_| AppError::InvalidToken)?;

    Ok(ok_message("Valid Access Token"))
}

/// Set the httpOnly/secure token cookie pair on a login response.
pub fn set_token_cookies(cookies: &Cookies, access_token: &str, refresh_token: &str) {
    for (name, value) in [
        (ACCESS_TOKEN_COOKIE, access_token),
        (REFRESH_TOKEN_COOKIE, refresh_token),
    ] {
        let mut cookie = Cookie::new(name.to_string(), value.to_string());
        cookie.set_http_only(true);
        cookie.set_secure(true);
        cookie.set_path("/");
        cookies.add(cookie);
    }
}
