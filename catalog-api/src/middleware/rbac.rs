//! Role gate middleware
//!
//! Checks the identity claim's role against the capability required by an
//! operation. Roles form a closed set; an unrecognized role string carries
//! no capabilities.

use std::collections::HashSet;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::auth::Claims;
use crate::error::ErrorResponse;

/// Capabilities over book records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    BookCreate,
    BookUpdate,
    BookDelete,
    BookList,
}

/// Role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// May create, update and delete own records
    Creator,
    /// May only list
    Reader,
}

impl Role {
    /// Capability set for this role
    pub fn permissions(&self) -> HashSet<Permission> {
        let mut perms = HashSet::new();
        match self {
            Role::Creator => {
                perms.insert(Permission::BookCreate);
                perms.insert(Permission::BookUpdate);
                perms.insert(Permission::BookDelete);
                perms.insert(Permission::BookList);
            }
            Role::Reader => {
                perms.insert(Permission::BookList);
            }
        }
        perms
    }

    /// Parse role from the claim's role string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "CREATOR" => Some(Role::Creator),
            "READER" => Some(Role::Reader),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Creator => "CREATOR",
            Role::Reader => "READER",
        }
    }
}

/// Role gate error
#[derive(Debug)]
pub enum RbacError {
    /// No claim in the request (authentication did not run)
    Unauthenticated,
    /// The claim's role is not in the closed set
    UnknownRole(String),
    /// The role lacks the required capability
    Denied(Permission),
}

impl IntoResponse for RbacError {
    fn into_response(self) -> Response {
        // The wire contract answers 401 for every authorization miss.
        let (code, message) = match self {
            RbacError::Unauthenticated => {
                ("UNAUTHENTICATED", "authentication required".to_string())
            }
            RbacError::UnknownRole(role) => ("UNKNOWN_ROLE", format!("unknown role: {}", role)),
            RbacError::Denied(perm) => ("ROLE_DENIED", format!("missing capability: {:?}", perm)),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Require-capability middleware factory
pub fn require_permission(
    permission: Permission,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, RbacError>> + Send>>
       + Clone
       + Send {
    move |request: Request, next: Next| {
        Box::pin(async move {
            let claims = request
                .extensions()
                .get::<Claims>()
                .ok_or(RbacError::Unauthenticated)?;

            let role = Role::from_str(&claims.role)
                .ok_or_else(|| RbacError::UnknownRole(claims.role.clone()))?;

            if !role.permissions().contains(&permission) {
                return Err(RbacError::Denied(permission));
            }

            Ok(next.run(request).await)
        })
    }
}
