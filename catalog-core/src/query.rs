//! Filter/sort/pagination specification for book listings.
//!
//! A [`BookQuery`] is an immutable value built once per request and handed
//! to the store, which evaluates it against its records. Keeping the
//! evaluation here means the listing semantics can be unit-tested without
//! any store at all.

use chrono::{DateTime, Duration, Utc};

use crate::types::Book;

/// Minutes separating "new" records from "old" ones.
pub const RECENT_WINDOW_MINUTES: i64 = 10;

/// Default page size when the caller does not supply one.
pub const DEFAULT_LIMIT: u64 = 20;

/// Upper bound on a single page, applied after parsing.
pub const MAX_LIMIT: u64 = 100;

/// Sort direction for a single key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Time-window filter over `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    /// Only records created within the recent window
    Recent,
    /// Only records created before the recent window
    Older,
}

/// Filter, sort and pagination specification for a listing.
///
/// Filters combine with logical AND. Sorting is a stable two-key sort:
/// `created_at` is the primary key, `rating` the secondary. Pagination
/// skips `(page - 1) * limit` records of the sorted result.
#[derive(Debug, Clone, PartialEq)]
pub struct BookQuery {
    language: Option<String>,
    search: Option<String>,
    owner_id: Option<String>,
    window: Option<TimeWindow>,
    created_sort: SortDirection,
    rating_sort: SortDirection,
    page: u64,
    limit: u64,
}

impl Default for BookQuery {
    fn default() -> Self {
        Self {
            language: None,
            search: None,
            owner_id: None,
            window: None,
            created_sort: SortDirection::Descending,
            rating_sort: SortDirection::Descending,
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl BookQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-match filter on `language`.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Case-insensitive substring filter over `title` OR `author`.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Exact-match filter on `owner_id`.
    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Restrict to one side of the recent window.
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Direction of the primary `created_at` sort key.
    pub fn sort_created(mut self, direction: SortDirection) -> Self {
        self.created_sort = direction;
        self
    }

    /// Direction of the secondary `rating` sort key.
    pub fn sort_rating(mut self, direction: SortDirection) -> Self {
        self.rating_sort = direction;
        self
    }

    /// 1-based page number. Must be positive; validated by the caller.
    pub fn with_page(mut self, page: u64) -> Self {
        self.page = page.max(1);
        self
    }

    /// Page size, capped at [`MAX_LIMIT`].
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit.clamp(1, MAX_LIMIT);
        self
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Offset into the sorted, filtered result set.
    pub fn skip(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    /// Whether a record passes every present filter, evaluated at `now`.
    pub fn matches(&self, book: &Book, now: DateTime<Utc>) -> bool {
        if let Some(language) = &self.language {
            if &book.language != language {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_title = book.title.to_lowercase().contains(&needle);
            let in_author = book.author.to_lowercase().contains(&needle);
            if !in_title && !in_author {
                return false;
            }
        }

        if let Some(window) = self.window {
            let cutoff = now - Duration::minutes(RECENT_WINDOW_MINUTES);
            let in_window = match window {
                TimeWindow::Recent => book.created_at >= cutoff,
                TimeWindow::Older => book.created_at < cutoff,
            };
            if !in_window {
                return false;
            }
        }

        if let Some(owner_id) = &self.owner_id {
            if &book.owner_id != owner_id {
                return false;
            }
        }

        true
    }

    /// Stable two-key sort: `created_at` primary, `rating` secondary.
    pub fn sort(&self, books: &mut [Book]) {
        books.sort_by(|a, b| {
            let created = match self.created_sort {
                SortDirection::Ascending => a.created_at.cmp(&b.created_at),
                SortDirection::Descending => b.created_at.cmp(&a.created_at),
            };
            created.then_with(|| match self.rating_sort {
                SortDirection::Ascending => a.rating.total_cmp(&b.rating),
                SortDirection::Descending => b.rating.total_cmp(&a.rating),
            })
        });
    }

    /// Apply skip and limit to an already sorted result set.
    pub fn paginate(&self, books: Vec<Book>) -> Vec<Book> {
        books
            .into_iter()
            .skip(self.skip() as usize)
            .take(self.limit as usize)
            .collect()
    }

    /// Full evaluation pipeline: filter, sort, paginate.
    pub fn apply(&self, books: Vec<Book>, now: DateTime<Utc>) -> Vec<Book> {
        let mut matched: Vec<Book> = books
            .into_iter()
            .filter(|b| self.matches(b, now))
            .collect();
        self.sort(&mut matched);
        self.paginate(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, author: &str, minutes_ago: i64) -> Book {
        Book {
            id: Book::new_id(),
            title: title.to_string(),
            author: author.to_string(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
            language: "en".to_string(),
            rating: 3.0,
            owner_id: "user:a".to_string(),
            image: String::new(),
        }
    }

    #[test]
    fn defaults_are_descending_first_page() {
        let query = BookQuery::new();
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), DEFAULT_LIMIT);
        assert_eq!(query.skip(), 0);
    }

    #[test]
    fn language_filter_is_exact() {
        let query = BookQuery::new().with_language("en");
        let now = Utc::now();

        let mut matching = book("A", "B", 0);
        matching.language = "en".to_string();
        let mut other = book("A", "B", 0);
        other.language = "eng".to_string();

        assert!(query.matches(&matching, now));
        assert!(!query.matches(&other, now));
    }

    #[test]
    fn search_matches_title_or_author_case_insensitively() {
        let query = BookQuery::new().with_search("tolkien");
        let now = Utc::now();

        let by_author = book("The Hobbit", "J.R.R. Tolkien", 0);
        let by_title = book("The Tolkien Companion", "J.E.A. Tyler", 0);
        let unrelated = book("Dune", "Frank Herbert", 0);

        assert!(query.matches(&by_author, now));
        assert!(query.matches(&by_title, now));
        assert!(!query.matches(&unrelated, now));
    }

    #[test]
    fn recent_window_splits_at_ten_minutes() {
        let now = Utc::now();
        let fresh = book("Fresh", "X", 1);
        let stale = book("Stale", "X", 30);

        let recent = BookQuery::new().with_window(TimeWindow::Recent);
        assert!(recent.matches(&fresh, now));
        assert!(!recent.matches(&stale, now));

        let older = BookQuery::new().with_window(TimeWindow::Older);
        assert!(!older.matches(&fresh, now));
        assert!(older.matches(&stale, now));
    }

    #[test]
    fn owner_filter_is_exact() {
        let query = BookQuery::new().with_owner("user:a");
        let now = Utc::now();

        let mine = book("Mine", "X", 0);
        let mut theirs = book("Theirs", "X", 0);
        theirs.owner_id = "user:b".to_string();

        assert!(query.matches(&mine, now));
        assert!(!query.matches(&theirs, now));
    }

    #[test]
    fn filters_combine_with_and() {
        let query = BookQuery::new()
            .with_language("en")
            .with_search("hobbit")
            .with_owner("user:a");
        let now = Utc::now();

        let hit = book("The Hobbit", "J.R.R. Tolkien", 0);
        assert!(query.matches(&hit, now));

        let mut wrong_language = hit.clone();
        wrong_language.language = "de".to_string();
        assert!(!query.matches(&wrong_language, now));
    }

    #[test]
    fn sort_is_two_keyed_and_stable() {
        let mut a = book("A", "X", 10);
        a.rating = 2.0;
        let mut b = book("B", "X", 10);
        b.created_at = a.created_at;
        b.rating = 5.0;
        let c = book("C", "X", 20);

        // Descending creation time, descending rating on ties.
        let query = BookQuery::new();
        let mut books = vec![a.clone(), b.clone(), c.clone()];
        query.sort(&mut books);
        let titles: Vec<&str> = books.iter().map(|x| x.title.as_str()).collect();
        assert_eq!(titles, ["B", "A", "C"]);

        // Ascending rating flips only the tie.
        let query = BookQuery::new().sort_rating(SortDirection::Ascending);
        let mut books = vec![a, b, c];
        query.sort(&mut books);
        let titles: Vec<&str> = books.iter().map(|x| x.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "C"]);
    }

    #[test]
    fn ascending_creation_sort() {
        let query = BookQuery::new().sort_created(SortDirection::Ascending);
        let mut books = vec![book("New", "X", 1), book("Old", "X", 60)];
        query.sort(&mut books);
        assert_eq!(books[0].title, "Old");
    }

    #[test]
    fn pagination_returns_middle_page() {
        // 12 records, newest first; page 2 of 5 is ranks 6-10.
        let books: Vec<Book> = (0..12).map(|i| book(&format!("b{i}"), "X", i)).collect();
        let query = BookQuery::new().with_page(2).with_limit(5);

        let result = query.apply(books, Utc::now());
        let titles: Vec<&str> = result.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["b5", "b6", "b7", "b8", "b9"]);
    }

    #[test]
    fn pagination_past_the_end_is_empty() {
        let books: Vec<Book> = (0..3).map(|i| book(&format!("b{i}"), "X", i)).collect();
        let query = BookQuery::new().with_page(5).with_limit(10);
        assert!(query.apply(books, Utc::now()).is_empty());
    }

    #[test]
    fn limit_is_capped() {
        let query = BookQuery::new().with_limit(10_000);
        assert_eq!(query.limit(), MAX_LIMIT);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let query = BookQuery::new().with_search("anything");
        assert!(query.apply(Vec::new(), Utc::now()).is_empty());
    }
}
