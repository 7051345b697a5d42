//! Book record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book record as stored in the document store.
///
/// `owner_id` is set at creation from the caller's identity and never
/// changes afterwards. The cover image is carried inline as base64 text;
/// the HTTP layer bounds its size before encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Record ID (`book:<uuid>`)
    pub id: String,
    pub title: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub language: String,
    pub rating: f64,
    /// Subject ID of the creator
    pub owner_id: String,
    /// Cover image, base64-encoded
    pub image: String,
}

impl Book {
    /// Generate a fresh record ID
    pub fn new_id() -> String {
        format!("book:{}", uuid::Uuid::new_v4())
    }
}

/// The owner-mutable fields of a book record.
///
/// Absent fields leave the stored value untouched; `owner_id` and
/// `created_at` are not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub rating: Option<f64>,
}

impl BookPatch {
    /// Apply the patch to a record in place.
    pub fn apply(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(author) = &self.author {
            book.author = author.clone();
        }
        if let Some(language) = &self.language {
            book.language = language.clone();
        }
        if let Some(rating) = self.rating {
            book.rating = rating;
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.language.is_none()
            && self.rating.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Book {
        Book {
            id: Book::new_id(),
            title: "The Hobbit".to_string(),
            author: "J.R.R. Tolkien".to_string(),
            created_at: Utc::now(),
            language: "en".to_string(),
            rating: 4.5,
            owner_id: "user:1".to_string(),
            image: String::new(),
        }
    }

    #[test]
    fn patch_applies_only_set_fields() {
        let mut book = sample_book();
        let owner = book.owner_id.clone();
        let created = book.created_at;

        let patch = BookPatch {
            title: Some("The Silmarillion".to_string()),
            rating: Some(4.9),
            ..Default::default()
        };
        patch.apply(&mut book);

        assert_eq!(book.title, "The Silmarillion");
        assert_eq!(book.rating, 4.9);
        assert_eq!(book.author, "J.R.R. Tolkien");
        assert_eq!(book.owner_id, owner);
        assert_eq!(book.created_at, created);
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(BookPatch::default().is_empty());
        assert!(!BookPatch {
            rating: Some(1.0),
            ..Default::default()
        }
        .is_empty());
    }
}
