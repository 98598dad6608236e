//! JWT token service
//!
//! Access/refresh token generation and validation. Token payloads are
//! built from explicit arguments; nothing here reads entity state
//! implicitly.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Access token lifetime (minutes)
    pub access_expiry_minutes: i64,
    /// Refresh token lifetime (days)
    pub refresh_expiry_days: i64,
    /// Token issuer
    pub issuer: String,
    /// Token audience
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: load_jwt_secret(),
            access_expiry_minutes: std::env::var("JWT_ACCESS_EXPIRY_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            refresh_expiry_days: std::env::var("JWT_REFRESH_EXPIRY_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "pos-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "pos-clients".to_string()),
        }
    }
}

/// Load the signing secret from the environment.
///
/// In debug builds a missing or short `JWT_SECRET` falls back to a
/// generated throwaway key; in release builds it is fatal.
fn load_jwt_secret() -> String {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= 32 => secret,
        _ => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!(
                    "JWT_SECRET not set or too short, generating a temporary development key"
                );
                generate_secret()
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("JWT_SECRET must be set to at least 32 characters in production");
            }
        }
    }
}

/// Generate a printable random secret (64 chars)
fn generate_secret() -> String {
    const ALPHABET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    if rng.fill(&mut bytes).is_err() {
        // SystemRandom should never fail; keep the server bootable anyway
        return "pos-server-development-fallback-secret-key".to_string();
    }
    bytes
        .iter()
        .map(|b| ALPHABET[(*b as usize) % ALPHABET.len()] as char)
        .collect()
}

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user or admin record id)
    pub sub: String,
    pub name: String,
    pub email: String,
    pub contact_info: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

/// Claims carried by a refresh token (subject only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT token service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generate an access token for the given subject.
    ///
    /// Every claim is an explicit parameter; callers pass entity fields
    /// rather than the entity generating tokens about itself.
    pub fn generate_access_token(
        &self,
        subject: &str,
        name: &str,
        email: &str,
        contact_info: &str,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.access_expiry_minutes);

        let claims = AccessClaims {
            sub: subject.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            contact_info: contact_info.to_string(),
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Generate a refresh token carrying only the subject id.
    pub fn generate_refresh_token(&self, subject: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::days(self.config.refresh_expiry_days);

        let claims = RefreshClaims {
            sub: subject.to_string(),
            token_type: "refresh".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode an access token
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        let claims: AccessClaims = self.decode_claims(token)?;
        if claims.token_type != "access" {
            return Err(JwtError::InvalidToken("Not an access token".to_string()));
        }
        Ok(claims)
    }

    /// Validate and decode a refresh token
    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        let claims: RefreshClaims = self.decode_claims(token)?;
        if claims.token_type != "refresh" {
            return Err(JwtError::InvalidToken("Not a refresh token".to_string()));
        }
        Ok(claims)
    }

    fn decode_claims<C: serde::de::DeserializeOwned>(&self, token: &str) -> Result<C, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<C>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract a bearer token from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Authenticated principal, decoded from the access token by the auth
/// middleware and injected into request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<AccessClaims> for CurrentUser {
    fn from(claims: AccessClaims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "a-test-secret-that-is-long-enough-to-sign".to_string(),
            access_expiry_minutes: 60,
            refresh_expiry_days: 7,
            issuer: "pos-server".to_string(),
            audience: "pos-clients".to_string(),
        })
    }

    #[test]
    fn access_token_round_trip() {
        let service = test_service();

        let token = service
            .generate_access_token("user:abc", "Ana", "ana@example.com", "+34 600 000 000")
            .expect("Failed to generate access token");

        let claims = service
            .validate_access_token(&token)
            .expect("Failed to validate access token");

        assert_eq!(claims.sub, "user:abc");
        assert_eq!(claims.name, "Ana");
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let service = test_service();

        let refresh = service
            .generate_refresh_token("user:abc")
            .expect("Failed to generate refresh token");

        assert!(service.validate_access_token(&refresh).is_err());
        let claims = service
            .validate_refresh_token(&refresh)
            .expect("Failed to validate refresh token");
        assert_eq!(claims.sub, "user:abc");
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = test_service();
        let other = JwtService::with_config(JwtConfig {
            secret: "a-different-secret-also-long-enough-here".to_string(),
            ..service.config.clone()
        });

        let token = other
            .generate_access_token("user:abc", "Ana", "ana@example.com", "")
            .expect("Failed to generate token");

        assert!(service.validate_access_token(&token).is_err());
    }
}
