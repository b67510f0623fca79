use indexmap::IndexMap;

use super::models::{sample_books, Book};

/// Storage seam for the catalog. Implementations keep books in insertion
/// order and never hold two books with the same id.
pub trait CatalogStore: Send + Sync {
    /// Every book, in store order.
    fn list(&self) -> Vec<Book>;

    /// Up to `limit` books from the front of the store.
    fn first(&self, limit: usize) -> Vec<Book>;

    fn get_mut(&mut self, id: &str) -> Option<&mut Book>;

    /// Append `book`. Returns `false` and stores nothing if the id is taken.
    fn insert(&mut self, book: Book) -> bool;

    /// Remove a book, keeping the relative order of the rest.
    fn remove(&mut self, id: &str) -> Option<Book>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime catalog backed by an insertion-ordered map.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    books: IndexMap<String, Book>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the sample books.
    pub fn seeded() -> Self {
        Self::with_books(sample_books())
    }

    /// Later duplicates of an id are dropped.
    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        let mut catalog = Self::new();
        for book in books {
            if !catalog.insert(book) {
                tracing::warn!("duplicate book id in initial catalog, skipping");
            }
        }
        catalog
    }
}

impl CatalogStore for InMemoryCatalog {
    fn list(&self) -> Vec<Book> {
        self.books.values().cloned().collect()
    }

    fn first(&self, limit: usize) -> Vec<Book> {
        self.books.values().take(limit).cloned().collect()
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Book> {
        self.books.get_mut(id)
    }

    fn insert(&mut self, book: Book) -> bool {
        if self.books.contains_key(book.id()) {
            return false;
        }
        self.books.insert(book.id().to_string(), book);
        true
    }

    fn remove(&mut self, id: &str) -> Option<Book> {
        self.books.shift_remove(id)
    }

    fn len(&self) -> usize {
        self.books.len()
    }
}
