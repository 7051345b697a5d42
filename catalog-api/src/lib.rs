//! Book Catalog REST API
//!
//! HTTP layer for the book catalog. All book routes require a valid token
//! in the `authentication` header; creation, update and deletion are
//! additionally gated on the creator role.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check (no auth)
//! - `POST /` - Create a book (multipart form with an `image` file)
//! - `GET /` - List books with filtering, sorting and pagination
//! - `PUT /:id` - Update an owned book
//! - `DELETE /:id` - Delete an owned book
//!
//! # Usage
//!
//! ```ignore
//! use catalog_api::{run_server, JwtConfig, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = ServerConfig::from_env();
//!     let jwt = JwtConfig::try_from_env("CATALOG_JWT_SECRET")?;
//!     run_server(config, jwt).await
//! }
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use middleware::{Claims, JwtConfig, Permission, Role};
pub use router::create_router;
pub use server::run_server;
pub use state::AppState;

/// API version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default listen port
pub const DEFAULT_PORT: u16 = 5000;

/// Largest accepted raw image upload, before base64 growth.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Configuration for the catalog API server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub bind_addr: String,
    /// Port
    pub port: u16,
    /// Data directory for the document store
    pub data_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            data_path: "./data".to_string(),
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("CATALOG_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("CATALOG_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            data_path: std::env::var("CATALOG_DATA_PATH").unwrap_or_else(|_| "./data".to_string()),
        }
    }

    /// Get the full bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
