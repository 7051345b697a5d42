//! Book resource handlers
//!
//! Create, list, update and delete orchestration: verified claims come in
//! through request extensions, the listing parameters are translated into a
//! [`BookQuery`], and the store does the rest.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use base64::Engine as _;
use chrono::{DateTime, Utc};

use catalog_core::{Book, BookQuery, SortDirection, TimeWindow};

use crate::dto::{
    BookEnvelope, BookResponse, ListBooksParams, ListBooksResponse, UpdateBookRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::middleware::Claims;
use crate::state::AppState;
use crate::MAX_IMAGE_BYTES;

/// Collected multipart fields for a create request
#[derive(Default)]
struct CreateBookForm {
    title: Option<String>,
    author: Option<String>,
    created_at: Option<String>,
    language: Option<String>,
    rating: Option<String>,
    image: Option<Vec<u8>>,
}

impl CreateBookForm {
    async fn from_multipart(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::Validation(format!("malformed multipart body: {}", e)))?
        {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("title") => form.title = Some(read_text(field).await?),
                Some("author") => form.author = Some(read_text(field).await?),
                Some("createdAt") => form.created_at = Some(read_text(field).await?),
                Some("language") => form.language = Some(read_text(field).await?),
                Some("rating") => form.rating = Some(read_text(field).await?),
                Some("image") => {
                    let data = field.bytes().await.map_err(|e| {
                        ApiError::Validation(format!("failed to read image upload: {}", e))
                    })?;
                    if data.len() > MAX_IMAGE_BYTES {
                        return Err(ApiError::Validation(format!(
                            "image exceeds the {} byte limit",
                            MAX_IMAGE_BYTES
                        )));
                    }
                    if !data.is_empty() {
                        form.image = Some(data.to_vec());
                    }
                }
                // Unknown parts are ignored.
                _ => {}
            }
        }

        Ok(form)
    }

    fn required(value: Option<String>, name: &str) -> ApiResult<String> {
        match value {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(ApiError::Validation(format!("{} is required", name))),
        }
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::Validation(format!("malformed multipart field: {}", e)))
}

/// Create a book
///
/// Multipart form with text fields `title, author, createdAt (optional),
/// language, rating` and a required file field `image`.
pub async fn create_book(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<BookEnvelope>)> {
    let form = CreateBookForm::from_multipart(multipart).await?;

    let title = CreateBookForm::required(form.title, "title")?;
    let author = CreateBookForm::required(form.author, "author")?;
    let language = CreateBookForm::required(form.language, "language")?;
    let rating_raw = CreateBookForm::required(form.rating, "rating")?;

    let rating: f64 = rating_raw
        .parse()
        .map_err(|_| ApiError::Validation("rating must be a number".to_string()))?;
    if !rating.is_finite() {
        return Err(ApiError::Validation("rating must be a number".to_string()));
    }

    let created_at = match form.created_at.filter(|s| !s.is_empty()) {
        Some(raw) => DateTime::parse_from_rfc3339(&raw)
            .map_err(|_| ApiError::Validation("createdAt must be an RFC3339 timestamp".to_string()))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    // Nothing is persisted without an image.
    let image = form
        .image
        .ok_or_else(|| ApiError::Validation("image file is required".to_string()))?;
    let image = base64::engine::general_purpose::STANDARD.encode(image);

    let book = Book {
        id: Book::new_id(),
        title,
        author,
        created_at,
        language,
        rating,
        owner_id: claims.sub.clone(),
        image,
    };

    let book = state.store.create(book).await?;

    tracing::info!(book_id = %book.id, owner = %book.owner_id, "book created");

    Ok((
        StatusCode::CREATED,
        Json(BookEnvelope {
            message: "book created successfully".to_string(),
            book: book.into(),
        }),
    ))
}

/// List books
///
/// Filtering, sorting and pagination per the query parameters; an empty
/// match is a success with an empty array.
pub async fn list_books(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<ListBooksParams>,
) -> ApiResult<Json<ListBooksResponse>> {
    let query = build_query(&params, &claims.sub)?;

    let books = state.store.list(&query).await?;

    Ok(Json(ListBooksResponse {
        books: books.into_iter().map(BookResponse::from).collect(),
    }))
}

/// Update an owned book
pub async fn update_book(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(req): Json<UpdateBookRequest>,
) -> ApiResult<Json<BookEnvelope>> {
    let book = state
        .store
        .update_owned(&id, &claims.sub, req.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("book not found".to_string()))?;

    tracing::info!(book_id = %book.id, owner = %claims.sub, "book updated");

    Ok(Json(BookEnvelope {
        message: "book updated successfully".to_string(),
        book: book.into(),
    }))
}

/// Delete an owned book
pub async fn delete_book(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<Json<BookEnvelope>> {
    let book = state
        .store
        .delete_owned(&id, &claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("book not found".to_string()))?;

    tracing::info!(book_id = %book.id, owner = %claims.sub, "book deleted");

    Ok(Json(BookEnvelope {
        message: "book deleted successfully".to_string(),
        book: book.into(),
    }))
}

/// Translate listing parameters into a query specification.
///
/// An empty string is treated as an absent parameter throughout. The owner
/// filter is only honored when `userId` equals the caller's own subject ID;
/// any other value is silently ignored.
pub fn build_query(params: &ListBooksParams, caller_id: &str) -> ApiResult<BookQuery> {
    let mut query = BookQuery::new();

    if let Some(language) = present(&params.language) {
        query = query.with_language(language);
    }

    if let Some(search) = present(&params.search) {
        query = query.with_search(search);
    }

    // A recency flag wins over an age flag when both are supplied.
    if present(&params.new).is_some() {
        query = query.with_window(TimeWindow::Recent);
    } else if present(&params.old).is_some() {
        query = query.with_window(TimeWindow::Older);
    }

    query = query.sort_created(direction(&params.sort));
    query = query.sort_rating(direction(&params.sort_d));

    if let Some(user_id) = present(&params.user_id) {
        if user_id == caller_id {
            query = query.with_owner(user_id);
        }
    }

    let page = parse_positive(&params.page, "page", 1)?;
    let limit = parse_positive(&params.limit, "limit", catalog_core::query::DEFAULT_LIMIT)?;
    query = query.with_page(page).with_limit(limit);

    Ok(query)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn direction(value: &Option<String>) -> SortDirection {
    match value.as_deref() {
        Some("asc") => SortDirection::Ascending,
        _ => SortDirection::Descending,
    }
}

fn parse_positive(value: &Option<String>, name: &str, default: u64) -> ApiResult<u64> {
    let Some(raw) = present(value) else {
        return Ok(default);
    };
    let parsed: u64 = raw
        .parse()
        .map_err(|_| ApiError::Validation(format!("{} must be a positive integer", name)))?;
    if parsed == 0 {
        return Err(ApiError::Validation(format!(
            "{} must be a positive integer",
            name
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALLER: &str = "user:caller";

    #[test]
    fn empty_params_build_default_query() {
        let query = build_query(&ListBooksParams::default(), CALLER).unwrap();
        assert_eq!(query, BookQuery::new());
    }

    #[test]
    fn empty_strings_are_absent() {
        let params = ListBooksParams {
            language: Some(String::new()),
            search: Some(String::new()),
            new: Some(String::new()),
            old: Some(String::new()),
            page: Some(String::new()),
            ..Default::default()
        };
        let query = build_query(&params, CALLER).unwrap();
        assert_eq!(query, BookQuery::new());
    }

    #[test]
    fn filters_are_applied() {
        let params = ListBooksParams {
            language: Some("en".to_string()),
            search: Some("tolkien".to_string()),
            ..Default::default()
        };
        let query = build_query(&params, CALLER).unwrap();
        let expected = BookQuery::new()
            .with_language("en")
            .with_search("tolkien");
        assert_eq!(query, expected);
    }

    #[test]
    fn recency_flag_wins_over_age_flag() {
        let params = ListBooksParams {
            new: Some("true".to_string()),
            old: Some("true".to_string()),
            ..Default::default()
        };
        let query = build_query(&params, CALLER).unwrap();
        assert_eq!(query, BookQuery::new().with_window(TimeWindow::Recent));

        let params = ListBooksParams {
            old: Some("1".to_string()),
            ..Default::default()
        };
        let query = build_query(&params, CALLER).unwrap();
        assert_eq!(query, BookQuery::new().with_window(TimeWindow::Older));
    }

    #[test]
    fn sort_directions_follow_asc_convention() {
        let params = ListBooksParams {
            sort: Some("asc".to_string()),
            sort_d: Some("asc".to_string()),
            ..Default::default()
        };
        let query = build_query(&params, CALLER).unwrap();
        let expected = BookQuery::new()
            .sort_created(SortDirection::Ascending)
            .sort_rating(SortDirection::Ascending);
        assert_eq!(query, expected);

        // Anything that is not "asc" sorts descending.
        let params = ListBooksParams {
            sort: Some("desc".to_string()),
            sort_d: Some("ASC".to_string()),
            ..Default::default()
        };
        let query = build_query(&params, CALLER).unwrap();
        assert_eq!(query, BookQuery::new());
    }

    #[test]
    fn own_user_id_filters_by_owner() {
        let params = ListBooksParams {
            user_id: Some(CALLER.to_string()),
            ..Default::default()
        };
        let query = build_query(&params, CALLER).unwrap();
        assert_eq!(query, BookQuery::new().with_owner(CALLER));
    }

    #[test]
    fn foreign_user_id_is_silently_ignored() {
        let params = ListBooksParams {
            user_id: Some("user:someone-else".to_string()),
            ..Default::default()
        };
        let query = build_query(&params, CALLER).unwrap();
        assert_eq!(query, BookQuery::new());
    }

    #[test]
    fn pagination_is_parsed() {
        let params = ListBooksParams {
            page: Some("2".to_string()),
            limit: Some("5".to_string()),
            ..Default::default()
        };
        let query = build_query(&params, CALLER).unwrap();
        assert_eq!(query.skip(), 5);
        assert_eq!(query.limit(), 5);
    }

    #[test]
    fn non_positive_pagination_is_rejected() {
        for (page, limit) in [(Some("0"), None), (None, Some("0")), (Some("-1"), None)] {
            let params = ListBooksParams {
                page: page.map(str::to_string),
                limit: limit.map(str::to_string),
                ..Default::default()
            };
            let result = build_query(&params, CALLER);
            assert!(matches!(result, Err(ApiError::Validation(_))));
        }
    }

    #[test]
    fn non_numeric_pagination_is_rejected() {
        let params = ListBooksParams {
            page: Some("two".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            build_query(&params, CALLER),
            Err(ApiError::Validation(_))
        ));
    }
}
