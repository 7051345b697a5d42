//! Token verification middleware
//!
//! Validates signed tokens and extracts the identity claim for protected
//! requests. Tokens arrive in the `authentication` header as the raw token
//! string; that header name and shape is the wire contract of this service.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ErrorResponse;
use crate::state::AppState;

/// Header carrying the raw token.
pub const AUTH_HEADER: &str = "authentication";

/// Token verification configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HS256 secret
    pub secret: String,
    /// Whether to validate expiration
    pub validate_exp: bool,
}

/// Error type for token configuration
#[derive(Debug, Clone, Error)]
#[error("JWT config error: {message}")]
pub struct JwtConfigError {
    pub message: String,
}

impl JwtConfig {
    /// Minimum secret length
    const MIN_SECRET_LENGTH: usize = 32;

    /// Create a new config with the given secret.
    ///
    /// Fails when the secret is shorter than 32 bytes.
    pub fn try_new(secret: impl Into<String>) -> Result<Self, JwtConfigError> {
        let secret = secret.into();
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(JwtConfigError {
                message: format!(
                    "secret must be at least {} bytes, got {}",
                    Self::MIN_SECRET_LENGTH,
                    secret.len()
                ),
            });
        }
        Ok(Self {
            secret,
            validate_exp: true,
        })
    }

    /// Create a new config from an environment variable.
    pub fn try_from_env(env_var: &str) -> Result<Self, JwtConfigError> {
        let secret = std::env::var(env_var).map_err(|_| JwtConfigError {
            message: format!("environment variable '{}' is not set", env_var),
        })?;
        Self::try_new(secret)
    }
}

/// Identity claim embedded in a token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Role name, parsed by the authorization gate
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at (Unix timestamp)
    pub iat: u64,
}

impl Claims {
    /// Build a claim for `sub` with the given role, valid for `ttl_secs`.
    pub fn new(sub: impl Into<String>, role: impl Into<String>, ttl_secs: u64) -> Self {
        let iat = Utc::now().timestamp() as u64;
        Self {
            sub: sub.into(),
            role: role.into(),
            exp: iat + ttl_secs,
            iat,
        }
    }
}

/// Authentication error
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing `authentication` header
    #[error("missing token")]
    MissingToken,
    /// Token validation failed
    #[error("token validation failed: {0}")]
    ValidationFailed(String),
    /// Token expired
    #[error("token expired")]
    TokenExpired,
    /// Token could not be signed
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "MISSING_TOKEN",
                "unauthenticated user".to_string(),
            ),
            AuthError::ValidationFailed(msg) => {
                (StatusCode::UNAUTHORIZED, "TOKEN_VALIDATION_FAILED", msg)
            }
            AuthError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_EXPIRED",
                "token has expired".to_string(),
            ),
            AuthError::Signing(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "SIGNING_FAILED", msg),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Validate a token and extract its claims
pub fn decode_token(token: &str, config: &JwtConfig) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = config.validate_exp;

    let key = DecodingKey::from_secret(config.secret.as_bytes());

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        if e.kind() == &jsonwebtoken::errors::ErrorKind::ExpiredSignature {
            AuthError::TokenExpired
        } else {
            AuthError::ValidationFailed(e.to_string())
        }
    })?;

    Ok(token_data.claims)
}

/// Sign a claim into a token string
pub fn encode_token(claims: &Claims, config: &JwtConfig) -> Result<String, AuthError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Require authentication middleware
///
/// Validates the token and stores [`Claims`] in request extensions for
/// downstream handlers and the role gate.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = request
        .headers()
        .get(AUTH_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let claims = decode_token(token, &state.jwt)?;

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-string-of-sufficient-length";

    fn test_config() -> JwtConfig {
        JwtConfig::try_new(SECRET).unwrap()
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(JwtConfig::try_new("too-short").is_err());
        assert!(JwtConfig::try_new(SECRET).is_ok());
    }

    #[test]
    fn encode_then_decode_round_trip() {
        let config = test_config();
        let claims = Claims::new("user:123", "CREATOR", 3600);

        let token = encode_token(&claims, &config).unwrap();
        let decoded = decode_token(&token, &config).unwrap();

        assert_eq!(decoded.sub, "user:123");
        assert_eq!(decoded.role, "CREATOR");
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        let iat = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: "user:123".to_string(),
            role: "CREATOR".to_string(),
            exp: iat - 3600,
            iat: iat - 7200,
        };

        let token = encode_token(&claims, &config).unwrap();
        let result = decode_token(&token, &config);

        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn wrong_signature_is_rejected() {
        let config = test_config();
        let other = JwtConfig::try_new("another-secret-string-of-sufficient-length").unwrap();
        let claims = Claims::new("user:123", "CREATOR", 3600);

        let token = encode_token(&claims, &other).unwrap();
        let result = decode_token(&token, &config);

        assert!(matches!(result, Err(AuthError::ValidationFailed(_))));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let config = test_config();
        assert!(matches!(
            decode_token("not-a-token", &config),
            Err(AuthError::ValidationFailed(_))
        ));
    }
}
