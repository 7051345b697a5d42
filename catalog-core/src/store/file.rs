//! File-backed document store.
//!
//! One JSON document per record under `<data>/books/`, with a full-record
//! in-memory cache loaded at open time. Writes hit disk before the cache so
//! a crash never leaves the cache ahead of the files.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::query::BookQuery;
use crate::store::BookStore;
use crate::types::{Book, BookPatch};

/// Single-node file-backed book store.
pub struct FileBookStore {
    books_path: PathBuf,
    cache: RwLock<HashMap<String, Book>>,
}

impl FileBookStore {
    /// Open the store at `base_path`, creating directories as needed and
    /// loading every existing record into the cache.
    pub async fn open(base_path: impl Into<PathBuf>) -> StoreResult<Self> {
        let base_path = base_path.into();
        let books_path = base_path.join("books");
        fs::create_dir_all(&books_path).await?;

        let mut cache = HashMap::new();
        let mut entries = fs::read_dir(&books_path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = fs::read(&path).await?;
            let book: Book = serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            cache.insert(book.id.clone(), book);
        }

        tracing::info!(
            records = cache.len(),
            path = %books_path.display(),
            "book store opened"
        );

        Ok(Self {
            books_path,
            cache: RwLock::new(cache),
        })
    }

    fn book_file_path(&self, id: &str) -> PathBuf {
        // Record IDs contain ':', which is not filename-safe everywhere.
        self.books_path.join(format!("{}.json", id.replace(':', "_")))
    }

    async fn write_book(&self, book: &Book) -> StoreResult<()> {
        let path = self.book_file_path(&book.id);
        let bytes = serde_json::to_vec_pretty(book).map_err(|e| StoreError::Corrupt {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        fs::write(&path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl BookStore for FileBookStore {
    async fn create(&self, book: Book) -> StoreResult<Book> {
        self.write_book(&book).await?;
        self.cache.write().await.insert(book.id.clone(), book.clone());
        tracing::debug!(book_id = %book.id, "book persisted");
        Ok(book)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Book>> {
        Ok(self.cache.read().await.get(id).cloned())
    }

    async fn list(&self, query: &BookQuery) -> StoreResult<Vec<Book>> {
        let books: Vec<Book> = self.cache.read().await.values().cloned().collect();
        Ok(query.apply(books, Utc::now()))
    }

    async fn update_owned(
        &self,
        id: &str,
        owner_id: &str,
        patch: BookPatch,
    ) -> StoreResult<Option<Book>> {
        // Hold the write lock across the disk write so concurrent updates
        // to the same record serialize instead of losing one of them.
        let mut cache = self.cache.write().await;
        let Some(current) = cache.get(id) else {
            return Ok(None);
        };
        if current.owner_id != owner_id {
            return Ok(None);
        }

        let mut book = current.clone();
        patch.apply(&mut book);
        self.write_book(&book).await?;
        cache.insert(book.id.clone(), book.clone());
        Ok(Some(book))
    }

    async fn delete_owned(&self, id: &str, owner_id: &str) -> StoreResult<Option<Book>> {
        let mut cache = self.cache.write().await;
        let Some(current) = cache.get(id) else {
            return Ok(None);
        };
        if current.owner_id != owner_id {
            return Ok(None);
        }

        let book = current.clone();
        fs::remove_file(self.book_file_path(id)).await?;
        cache.remove(id);
        tracing::debug!(book_id = %id, "book deleted");
        Ok(Some(book))
    }
}
