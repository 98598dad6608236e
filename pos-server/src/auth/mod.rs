//! Authentication - JWT tokens and request guards

pub mod jwt;
pub mod middleware;

pub use jwt::{AccessClaims, CurrentUser, JwtConfig, JwtError, JwtService, RefreshClaims};
pub use middleware::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, require_auth};
