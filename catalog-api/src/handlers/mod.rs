//! HTTP request handlers

pub mod books;
pub mod health;

pub use books::{create_book, delete_book, list_books, update_book};
pub use health::health_check;
