//! # Persistence
//!
//! Collaborator traits for storing processed books and the translations made
//! against them, plus in-memory implementations. The filesystem book store
//! lives in [`crate::io`].
//!
//! Books and translations are stored independently: a translation is tied to
//! a book id and a sentence id only, so re-uploading a book keeps every
//! translation whose sentence id still exists.

pub mod memory;
pub mod translations;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::{
    io::IoError,
    models::{BookId, DocumentKey},
    pipeline::ProcessedDocument,
    segment::SentenceId,
};

pub use memory::MemoryBookStore;
pub use translations::{
    MemoryTranslationStore, SaveTranslation, TranslationRecord, TranslationStore,
    TranslationVersion,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("book {0} not found")]
    BookNotFound(BookId),
    #[error("book {0} has no stored pages")]
    MissingPages(BookId),
    #[error("no translation of {sentence} in book {book}")]
    TranslationNotFound { book: BookId, sentence: SentenceId },
    #[error(transparent)]
    Io(#[from] IoError),
}

/// A stored book, without its pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: BookId,
    pub key: DocumentKey,
    pub title: String,
    pub total_pages: usize,
    pub total_sentences: usize,
    /// Milliseconds since the Unix epoch of the latest upload.
    pub uploaded_at_ms: u64,
}

/// One stored page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPage {
    pub number: u32,
    pub html: String,
}

/// Storage for processed books.
pub trait BookStore {
    /// Stores `document` under `key`.
    ///
    /// A book already stored under `key` keeps its id; its pages are replaced
    /// as a whole. Either all new pages are stored or the previous ones stay.
    fn save_book(
        &mut self,
        key: &DocumentKey,
        title: &str,
        document: &ProcessedDocument,
    ) -> Result<BookId, StoreError>;

    fn book(&self, id: BookId) -> Result<BookRecord, StoreError>;

    fn book_by_key(&self, key: &DocumentKey) -> Result<Option<BookRecord>, StoreError>;

    /// Pages in page order. A book without pages is an error.
    fn pages(&self, id: BookId) -> Result<Vec<StoredPage>, StoreError>;

    /// All books, most recently uploaded first.
    fn list_books(&self) -> Result<Vec<BookRecord>, StoreError>;

    /// Removes the book and its pages.
    fn delete_book(&mut self, id: BookId) -> Result<(), StoreError>;
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

pub(crate) fn stored_pages(document: &ProcessedDocument) -> Vec<StoredPage> {
    document
        .pages
        .iter()
        .map(|page| StoredPage {
            number: page.number,
            html: page.html.clone(),
        })
        .collect()
}
