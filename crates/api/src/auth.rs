use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use course_core::model::UserId;

use crate::error::ApiError;
use crate::state::ApiState;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("could not sign token: {0}")]
    Sign(String),
}

/// What the caller may do beyond their own enrollments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Admin,
}

/// Caller identity resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
    pub name: Option<String>,
    pub role: Role,
}

impl AuthUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// An `AuthUser` whose token carries the admin role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser(pub AuthUser);

/// Opaque auth provider: turns a bearer token into a caller.
pub trait TokenVerifier: Send + Sync {
    /// # Errors
    ///
    /// Returns `AuthError::Invalid` for tokens that fail verification.
    fn verify(&self, token: &str) -> Result<AuthUser, AuthError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    role: Role,
    exp: i64,
}

/// HS256 JSON Web Tokens with a shared secret.
#[derive(Clone)]
pub struct JwtVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::default(),
        }
    }

    /// Mint a token for `user_id` valid for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Sign` if encoding fails.
    pub fn issue(
        &self,
        user_id: UserId,
        name: Option<&str>,
        role: Role,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id.value(),
            name: name.map(str::to_owned),
            role,
            exp: (Utc::now() + ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|e| AuthError::Sign(e.to_string()))
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| AuthError::Invalid(e.to_string()))?
            .claims;
        Ok(AuthUser {
            user_id: UserId::new(claims.sub),
            name: claims.name,
            role: claims.role,
        })
    }
}

/// Token part of an `Authorization` header (`<scheme> <token>`).
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.split_once(' ').map_or("", |(_, token)| token).trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<ApiState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::Unauthorized)?;
        state.verifier.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            ApiError::Forbidden("Invalid or expired token.".into())
        })
    }
}

impl FromRequestParts<ApiState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::debug!(user_id = %user.user_id, "admin route refused");
            return Err(ApiError::Forbidden("Admin access required.".into()));
        }
        Ok(Self(user))
    }
}
