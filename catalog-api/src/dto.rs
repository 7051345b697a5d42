//! Data Transfer Objects for API requests and responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{Book, BookPatch};

// ============ Book DTOs ============

/// Book record response
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub language: String,
    pub rating: f64,
    pub owner_id: String,
    /// Cover image, base64-encoded
    pub image: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            created_at: book.created_at,
            language: book.language,
            rating: book.rating,
            owner_id: book.owner_id,
            image: book.image,
        }
    }
}

/// Response wrapping a single book with a status message
#[derive(Debug, Serialize)]
pub struct BookEnvelope {
    pub message: String,
    pub book: BookResponse,
}

/// Listing response
#[derive(Debug, Serialize)]
pub struct ListBooksResponse {
    pub books: Vec<BookResponse>,
}

/// Query parameters for the listing endpoint.
///
/// Field names follow the wire contract; `page` and `limit` arrive as
/// strings so the handler can reject non-numeric and non-positive values
/// with a consistent error body.
#[derive(Debug, Default, Deserialize)]
pub struct ListBooksParams {
    /// Exact language filter
    pub language: Option<String>,
    /// Case-insensitive substring over title or author
    pub search: Option<String>,
    /// `"asc"` sorts creation time ascending; anything else descending
    pub sort: Option<String>,
    /// Rating sort direction, same convention as `sort`
    #[serde(rename = "sortD")]
    pub sort_d: Option<String>,
    /// Restrict to records created within the recent window
    #[serde(rename = "New")]
    pub new: Option<String>,
    /// Restrict to records created before the recent window
    pub old: Option<String>,
    /// 1-based page number
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
    /// Owner filter; only honored for the caller's own ID
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Update request; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub rating: Option<f64>,
}

impl From<UpdateBookRequest> for BookPatch {
    fn from(req: UpdateBookRequest) -> Self {
        Self {
            title: req.title,
            author: req.author,
            language: req.language,
            rating: req.rating,
        }
    }
}

// ============ Health DTOs ============

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
