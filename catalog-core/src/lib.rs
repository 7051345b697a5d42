//! Book Catalog Core
//!
//! Domain types and persistence for the book catalog:
//!
//! - [`Book`] / [`BookPatch`] - the stored document and its owner-mutable
//!   field set
//! - [`BookQuery`] - the filter/sort/pagination specification evaluated by
//!   the store
//! - [`BookStore`] - the persistence seam, with [`FileBookStore`] as the
//!   single-node file-backed implementation

pub mod error;
pub mod query;
pub mod store;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use query::{BookQuery, SortDirection, TimeWindow, RECENT_WINDOW_MINUTES};
pub use store::{BookStore, FileBookStore};
pub use types::{Book, BookPatch};
