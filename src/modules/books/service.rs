use parking_lot::RwLock;
use time::{Duration, OffsetDateTime, UtcOffset};
use uuid::Uuid;

use libris_kernel::settings::CatalogSettings;

use super::error::{CatalogError, CatalogResult, LoanConflict};
use super::models::{Book, BookPatch, NewBook};
use super::store::{CatalogStore, InMemoryCatalog};

/// How many books `recommendations` returns.
pub const RECOMMENDATION_COUNT: usize = 3;

/// Default lending period.
pub const DEFAULT_LOAN_PERIOD: Duration = Duration::days(14);

/// CRUD and borrow/return operations over an injected [`CatalogStore`].
///
/// Every operation takes the store lock exactly once, so each call is atomic
/// with respect to the others. Nothing spans more than one call.
pub struct CatalogService {
    store: RwLock<Box<dyn CatalogStore>>,
    loan_period: Duration,
}

impl CatalogService {
    pub fn new(store: impl CatalogStore + 'static) -> Self {
        Self {
            store: RwLock::new(Box::new(store)),
            loan_period: DEFAULT_LOAN_PERIOD,
        }
    }

    pub fn with_loan_period(mut self, loan_period: Duration) -> Self {
        self.loan_period = loan_period;
        self
    }

    /// In-memory service configured from the `catalog` settings section.
    pub fn from_settings(settings: &CatalogSettings) -> Self {
        let store = if settings.seed_sample_books {
            InMemoryCatalog::seeded()
        } else {
            InMemoryCatalog::new()
        };
        Self::new(store).with_loan_period(Duration::days(i64::from(settings.loan_period_days)))
    }

    pub fn loan_period(&self) -> Duration {
        self.loan_period
    }

    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    pub fn list_all(&self) -> Vec<Book> {
        self.store.read().list()
    }

    /// Add a book under a fresh id. Caller-supplied loan state is never
    /// accepted; new books always start available.
    pub fn add(&self, new_book: NewBook) -> CatalogResult<Book> {
        let NewBook {
            title,
            author,
            genre,
            published_date,
        } = new_book;

        let missing: Vec<&'static str> = [("title", &title), ("author", &author), ("genre", &genre)]
            .into_iter()
            .filter(|(_, value)| is_blank(value.as_deref()))
            .map(|(field, _)| field)
            .collect();
        if !missing.is_empty() {
            return Err(CatalogError::Validation { fields: missing });
        }

        let book = Book::new(
            Uuid::now_v7().to_string(),
            title.unwrap_or_default(),
            author.unwrap_or_default(),
            genre.unwrap_or_default(),
            published_date,
        );

        if !self.store.write().insert(book.clone()) {
            return Err(CatalogError::DuplicateId {
                id: book.id().to_string(),
            });
        }

        tracing::info!(book_id = %book.id(), "book added");
        Ok(book)
    }

    /// Apply the descriptive fields of `patch`. A required field that is
    /// present but blank rejects the whole patch.
    pub fn update(&self, id: &str, patch: BookPatch) -> CatalogResult<Book> {
        let mut store = self.store.write();
        let book = store.get_mut(id).ok_or_else(|| CatalogError::not_found(id))?;

        let blank: Vec<&'static str> = [
            ("title", &patch.title),
            ("author", &patch.author),
            ("genre", &patch.genre),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|value| value.trim().is_empty()))
        .map(|(field, _)| field)
        .collect();
        if !blank.is_empty() {
            return Err(CatalogError::Validation { fields: blank });
        }

        book.apply(patch);
        book.refresh_availability();

        tracing::info!(book_id = %id, "book updated");
        Ok(book.clone())
    }

    /// Look up a book, refreshing its availability status on the way out.
    pub fn get_by_id(&self, id: &str) -> Option<Book> {
        let mut store = self.store.write();
        let book = store.get_mut(id)?;
        book.refresh_availability();
        Some(book.clone())
    }

    /// Returns whether a book was removed.
    pub fn delete(&self, id: &str) -> bool {
        let removed = self.store.write().remove(id).is_some();
        if removed {
            tracing::info!(book_id = %id, "book deleted");
        }
        removed
    }

    /// Lend a book for the configured loan period starting now.
    pub fn borrow_book(&self, id: &str, borrower_id: &str) -> CatalogResult<Book> {
        self.borrow_book_at(id, borrower_id, OffsetDateTime::now_utc())
    }

    pub(crate) fn borrow_book_at(
        &self,
        id: &str,
        borrower_id: &str,
        now: OffsetDateTime,
    ) -> CatalogResult<Book> {
        let mut store = self.store.write();
        let book = store.get_mut(id).ok_or_else(|| CatalogError::not_found(id))?;
        if is_blank(Some(borrower_id)) {
            return Err(CatalogError::Validation {
                fields: vec!["borrowerId"],
            });
        }
        if book.is_borrowed() {
            return Err(CatalogError::conflict(id, LoanConflict::AlreadyBorrowed));
        }

        let due_date = truncate_to_millis(now.to_offset(UtcOffset::UTC)) + self.loan_period;
        book.lend(borrower_id.to_string(), due_date);

        tracing::info!(book_id = %id, borrower_id, due_date = %due_date, "book borrowed");
        Ok(book.clone())
    }

    pub fn return_book(&self, id: &str) -> CatalogResult<Book> {
        let mut store = self.store.write();
        let book = store.get_mut(id).ok_or_else(|| CatalogError::not_found(id))?;
        if !book.is_borrowed() {
            return Err(CatalogError::conflict(id, LoanConflict::NotBorrowed));
        }

        book.take_back();

        tracing::info!(book_id = %id, "book returned");
        Ok(book.clone())
    }

    /// The first few books in store order; no ranking is applied.
    pub fn recommendations(&self) -> Vec<Book> {
        self.store.read().first(RECOMMENDATION_COUNT)
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |value| value.trim().is_empty())
}

/// Due dates are reported with millisecond precision.
fn truncate_to_millis(instant: OffsetDateTime) -> OffsetDateTime {
    instant
        .replace_millisecond(instant.millisecond())
        .unwrap_or(instant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::AvailabilityStatus;
    use time::macros::datetime;

    fn seeded() -> CatalogService {
        CatalogService::new(InMemoryCatalog::seeded())
    }

    fn new_book(title: &str, author: &str, genre: &str) -> NewBook {
        NewBook {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            genre: Some(genre.to_string()),
            published_date: None,
        }
    }

    fn ids(books: &[Book]) -> Vec<String> {
        books.iter().map(|book| book.id().to_string()).collect()
    }

    #[test]
    fn add_assigns_unique_ids_and_starts_available() {
        let service = seeded();

        let first = service.add(new_book("Emma", "Jane Austen", "Romance")).unwrap();
        let second = service.add(new_book("Emma", "Jane Austen", "Romance")).unwrap();

        assert_ne!(first.id(), second.id());
        assert!(!first.is_borrowed());
        assert_eq!(first.availability_status(), AvailabilityStatus::Available);
        assert_eq!(first.borrower_id(), None);
        assert_eq!(first.due_date(), None);
        assert_eq!(service.len(), 5);
    }

    #[test]
    fn add_keeps_published_date() {
        let service = seeded();
        let mut input = new_book("Emma", "Jane Austen", "Romance");
        input.published_date = Some("1815".to_string());

        let book = service.add(input).unwrap();
        assert_eq!(book.published_date(), Some("1815"));
    }

    #[test]
    fn add_with_empty_title_is_a_validation_error() {
        let service = seeded();

        let err = service.add(new_book("", "Jane Austen", "Romance")).unwrap_err();
        assert_eq!(err, CatalogError::Validation { fields: vec!["title"] });
        assert_eq!(service.len(), 3);
    }

    #[test]
    fn add_reports_every_missing_field() {
        let service = seeded();
        let input = NewBook {
            title: Some("   ".to_string()),
            ..NewBook::default()
        };

        let err = service.add(input).unwrap_err();
        assert_eq!(
            err,
            CatalogError::Validation {
                fields: vec!["title", "author", "genre"]
            }
        );
    }

    #[test]
    fn update_changes_only_descriptive_fields() {
        let service = seeded();
        let before = service.borrow_book("1", "reader-a").unwrap();

        let patch = BookPatch {
            title: Some("Gatsby".to_string()),
            published_date: Some("1925".to_string()),
            ..BookPatch::default()
        };
        let after = service.update("1", patch).unwrap();

        assert_eq!(after.id(), "1");
        assert_eq!(after.title(), "Gatsby");
        assert_eq!(after.author(), "F. Scott Fitzgerald");
        assert_eq!(after.published_date(), Some("1925"));
        assert!(after.is_borrowed());
        assert_eq!(after.borrower_id(), Some("reader-a"));
        assert_eq!(after.due_date(), before.due_date());
        assert_eq!(after.availability_status(), AvailabilityStatus::Unavailable);
    }

    #[test]
    fn update_missing_book_is_not_found() {
        let service = seeded();

        let err = service.update("999", BookPatch::default()).unwrap_err();
        assert_eq!(err, CatalogError::not_found("999"));
    }

    #[test]
    fn update_rejects_blank_required_field() {
        let service = seeded();
        let patch = BookPatch {
            author: Some(String::new()),
            genre: Some("Satire".to_string()),
            ..BookPatch::default()
        };

        let err = service.update("2", patch).unwrap_err();
        assert_eq!(err, CatalogError::Validation { fields: vec!["author"] });

        let book = service.get_by_id("2").unwrap();
        assert_eq!(book.author(), "George Orwell");
        assert_eq!(book.genre(), "Dystopian");
    }

    #[test]
    fn borrow_sets_due_date_exactly_one_loan_period_later() {
        let service = seeded();
        let now = datetime!(2026-10-16 08:30:00.123 UTC);

        let book = service.borrow_book_at("1", "user-a", now).unwrap();

        assert!(book.is_borrowed());
        assert_eq!(book.borrower_id(), Some("user-a"));
        assert_eq!(book.due_date(), Some(datetime!(2026-10-30 08:30:00.123 UTC)));
        assert_eq!(
            book.due_date().map(|due| (due - now).whole_milliseconds()),
            Some(14 * 24 * 60 * 60 * 1000)
        );
        assert_eq!(book.availability_status(), AvailabilityStatus::Unavailable);
    }

    #[test]
    fn borrow_drops_sub_millisecond_precision() {
        let service = seeded();
        let now = datetime!(2026-10-16 08:30:00.123456789 UTC);

        let book = service.borrow_book_at("1", "user-a", now).unwrap();
        assert_eq!(book.due_date(), Some(datetime!(2026-10-30 08:30:00.123 UTC)));
    }

    #[test]
    fn borrow_uses_wall_clock() {
        let service = seeded();
        let before = OffsetDateTime::now_utc();
        let book = service.borrow_book("2", "user-a").unwrap();
        let after = OffsetDateTime::now_utc();

        let due = book.due_date().unwrap();
        assert!(due >= truncate_to_millis(before) + DEFAULT_LOAN_PERIOD);
        assert!(due <= after + DEFAULT_LOAN_PERIOD);
    }

    #[test]
    fn second_borrow_conflicts_and_leaves_state_unchanged() {
        let service = seeded();
        let first = service.borrow_book("1", "userA").unwrap();

        let err = service.borrow_book("1", "userB").unwrap_err();
        assert_eq!(err, CatalogError::conflict("1", LoanConflict::AlreadyBorrowed));

        let current = service.get_by_id("1").unwrap();
        assert_eq!(current, first);
        assert_eq!(current.borrower_id(), Some("userA"));
    }

    #[test]
    fn borrow_missing_book_is_not_found() {
        let service = seeded();
        let err = service.borrow_book("999", "userA").unwrap_err();
        assert_eq!(err, CatalogError::not_found("999"));
    }

    #[test]
    fn borrow_requires_borrower() {
        let service = seeded();
        let err = service.borrow_book("1", " ").unwrap_err();
        assert_eq!(
            err,
            CatalogError::Validation {
                fields: vec!["borrowerId"]
            }
        );
        assert!(!service.get_by_id("1").unwrap().is_borrowed());
    }

    #[test]
    fn borrow_of_unknown_id_without_borrower_is_not_found() {
        let service = seeded();
        let err = service.borrow_book("999", "").unwrap_err();
        assert_eq!(err, CatalogError::not_found("999"));
    }

    #[test]
    fn due_date_is_reported_in_utc() {
        let service = seeded();
        let now = datetime!(2026-10-16 10:30:00.250 +02:00);

        let book = service.borrow_book_at("2", "user-a", now).unwrap();
        assert_eq!(book.due_date(), Some(datetime!(2026-10-30 08:30:00.250 UTC)));
        assert_eq!(book.due_date().map(|due| due.offset()), Some(UtcOffset::UTC));
    }

    #[test]
    fn return_clears_loan_and_restores_availability() {
        let service = seeded();
        service.borrow_book("3", "userA").unwrap();

        let book = service.return_book("3").unwrap();
        assert!(!book.is_borrowed());
        assert_eq!(book.borrower_id(), None);
        assert_eq!(book.due_date(), None);
        assert_eq!(book.availability_status(), AvailabilityStatus::Available);

        // The cycle can start again.
        assert!(service.borrow_book("3", "userB").is_ok());
    }

    #[test]
    fn return_of_available_book_conflicts() {
        let service = seeded();
        let err = service.return_book("2").unwrap_err();
        assert_eq!(err, CatalogError::conflict("2", LoanConflict::NotBorrowed));

        let err = service.return_book("999").unwrap_err();
        assert_eq!(err, CatalogError::not_found("999"));
    }

    #[test]
    fn delete_then_get_finds_nothing() {
        let service = seeded();

        assert!(service.delete("2"));
        assert!(service.get_by_id("2").is_none());
        assert!(!service.delete("2"));
        assert_eq!(ids(&service.list_all()), vec!["1", "3"]);
    }

    #[test]
    fn recommendations_are_the_first_three_in_store_order() {
        let service = seeded();
        service.add(new_book("Emma", "Jane Austen", "Romance")).unwrap();
        service.add(new_book("Ulysses", "James Joyce", "Modernist")).unwrap();

        assert_eq!(ids(&service.recommendations()), vec!["1", "2", "3"]);
        assert_eq!(service.list_all().len(), 5);
    }

    #[test]
    fn from_settings_honours_seed_flag_and_loan_period() {
        let settings = CatalogSettings {
            seed_sample_books: false,
            loan_period_days: 7,
            ..CatalogSettings::default()
        };

        let service = CatalogService::from_settings(&settings);
        assert!(service.is_empty());
        assert!(service.recommendations().is_empty());
        assert_eq!(service.loan_period(), Duration::days(7));
    }
}
