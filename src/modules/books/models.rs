use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// Due dates are always UTC with exactly three fractional digits.
time::serde::format_description!(
    due_date_format,
    OffsetDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

/// Display status derived from the loan state of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    #[default]
    Available,
    Unavailable,
}

impl AvailabilityStatus {
    pub fn for_loan_state(is_borrowed: bool) -> Self {
        if is_borrowed {
            Self::Unavailable
        } else {
            Self::Available
        }
    }
}

/// Catalog entry.
///
/// Loan fields are private so that `is_borrowed`, `borrower_id`, `due_date`
/// and `availability_status` can only move together through
/// [`Book::lend`] and [`Book::take_back`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    id: String,
    title: String,
    author: String,
    genre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    published_date: Option<String>,
    is_borrowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    borrower_id: Option<String>,
    #[serde(
        with = "due_date_format::option",
        skip_serializing_if = "Option::is_none"
    )]
    due_date: Option<OffsetDateTime>,
    availability_status: AvailabilityStatus,
}

impl Book {
    /// Build an available book. Callers are expected to have validated the
    /// required fields already.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        published_date: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            published_date,
            is_borrowed: false,
            borrower_id: None,
            due_date: None,
            availability_status: AvailabilityStatus::Available,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn published_date(&self) -> Option<&str> {
        self.published_date.as_deref()
    }

    pub fn is_borrowed(&self) -> bool {
        self.is_borrowed
    }

    pub fn borrower_id(&self) -> Option<&str> {
        self.borrower_id.as_deref()
    }

    pub fn due_date(&self) -> Option<OffsetDateTime> {
        self.due_date
    }

    pub fn availability_status(&self) -> AvailabilityStatus {
        self.availability_status
    }

    /// Recompute the display status from the loan flag.
    pub fn refresh_availability(&mut self) {
        self.availability_status = AvailabilityStatus::for_loan_state(self.is_borrowed);
    }

    /// Available → Borrowed.
    pub(crate) fn lend(&mut self, borrower_id: String, due_date: OffsetDateTime) {
        self.is_borrowed = true;
        self.borrower_id = Some(borrower_id);
        self.due_date = Some(due_date);
        self.refresh_availability();
    }

    /// Borrowed → Available.
    pub(crate) fn take_back(&mut self) {
        self.is_borrowed = false;
        self.borrower_id = None;
        self.due_date = None;
        self.refresh_availability();
    }

    /// Overwrite the descriptive fields present in `patch`.
    pub(crate) fn apply(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
        if let Some(published_date) = patch.published_date {
            self.published_date = Some(published_date);
        }
    }
}

/// Request body for adding a book. Unknown fields such as `id` or
/// `isBorrowed` are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
}

/// The only fields a caller may change on an existing book.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    #[serde(default)]
    pub borrower_id: Option<String>,
}

/// Books loaded into a fresh catalog when sample seeding is enabled.
pub fn sample_books() -> Vec<Book> {
    vec![
        Book::new(
            "1",
            "The Great Gatsby",
            "F. Scott Fitzgerald",
            "Fiction",
            Some("March".to_string()),
        ),
        Book::new(
            "2",
            "1984",
            "George Orwell",
            "Dystopian",
            Some("March".to_string()),
        ),
        Book::new(
            "3",
            "To Kill a Mockingbird",
            "Harper Lee",
            "Classic",
            Some("March".to_string()),
        ),
    ]
}
