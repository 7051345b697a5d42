//! Request middleware: token verification and role gating.

mod auth;
mod rbac;

pub use auth::{
    decode_token, encode_token, require_auth, AuthError, Claims, JwtConfig, JwtConfigError,
    AUTH_HEADER,
};
pub use rbac::{require_permission, Permission, RbacError, Role};
