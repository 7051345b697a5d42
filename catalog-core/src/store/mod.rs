//! Persistence seam for book records.

mod file;

pub use file::FileBookStore;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::query::BookQuery;
use crate::types::{Book, BookPatch};

/// Document store for book records.
///
/// Owner-scoped mutation returns `Ok(None)` when no record matches
/// `(id, owner_id)`; the HTTP layer decides what that means for the caller.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Persist a new record.
    async fn create(&self, book: Book) -> StoreResult<Book>;

    /// Fetch a record by ID.
    async fn get(&self, id: &str) -> StoreResult<Option<Book>>;

    /// Evaluate a query against all records.
    async fn list(&self, query: &BookQuery) -> StoreResult<Vec<Book>>;

    /// Patch the record matching `(id, owner_id)`, returning the updated
    /// record, or `None` when no owned record matches.
    async fn update_owned(
        &self,
        id: &str,
        owner_id: &str,
        patch: BookPatch,
    ) -> StoreResult<Option<Book>>;

    /// Delete the record matching `(id, owner_id)`, returning the deleted
    /// record, or `None` when no owned record matches.
    async fn delete_owned(&self, id: &str, owner_id: &str) -> StoreResult<Option<Book>>;
}
