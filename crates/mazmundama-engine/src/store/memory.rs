use std::collections::HashMap;

use super::{BookRecord, BookStore, StoreError, StoredPage, now_ms, stored_pages};
use crate::{
    models::{BookId, DocumentKey},
    pipeline::ProcessedDocument,
};

#[derive(Debug)]
struct StoredBook {
    record: BookRecord,
    pages: Vec<StoredPage>,
    /// Upload sequence; orders books uploaded within the same millisecond.
    seq: u64,
}

/// Book store held in memory.
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    books: HashMap<BookId, StoredBook>,
    next_seq: u64,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_by_key(&self, key: &DocumentKey) -> Option<&StoredBook> {
        self.books.values().find(|book| &book.record.key == key)
    }
}

impl BookStore for MemoryBookStore {
    fn save_book(
        &mut self,
        key: &DocumentKey,
        title: &str,
        document: &ProcessedDocument,
    ) -> Result<BookId, StoreError> {
        let id = self
            .find_by_key(key)
            .map(|book| book.record.id)
            .unwrap_or_default();
        self.next_seq += 1;

        let record = BookRecord {
            id,
            key: key.clone(),
            title: title.to_string(),
            total_pages: document.total_pages(),
            total_sentences: document.total_sentences(),
            uploaded_at_ms: now_ms(),
        };
        self.books.insert(
            id,
            StoredBook {
                record,
                pages: stored_pages(document),
                seq: self.next_seq,
            },
        );
        log::info!(
            "stored book {key} ({} pages, {} sentences)",
            document.total_pages(),
            document.total_sentences()
        );
        Ok(id)
    }

    fn book(&self, id: BookId) -> Result<BookRecord, StoreError> {
        self.books
            .get(&id)
            .map(|book| book.record.clone())
            .ok_or(StoreError::BookNotFound(id))
    }

    fn book_by_key(&self, key: &DocumentKey) -> Result<Option<BookRecord>, StoreError> {
        Ok(self.find_by_key(key).map(|book| book.record.clone()))
    }

    fn pages(&self, id: BookId) -> Result<Vec<StoredPage>, StoreError> {
        let book = self.books.get(&id).ok_or(StoreError::BookNotFound(id))?;
        if book.pages.is_empty() {
            return Err(StoreError::MissingPages(id));
        }
        Ok(book.pages.clone())
    }

    fn list_books(&self) -> Result<Vec<BookRecord>, StoreError> {
        let mut books: Vec<&StoredBook> = self.books.values().collect();
        books.sort_by(|a, b| {
            (b.record.uploaded_at_ms, b.seq).cmp(&(a.record.uploaded_at_ms, a.seq))
        });
        Ok(books.into_iter().map(|book| book.record.clone()).collect())
    }

    fn delete_book(&mut self, id: BookId) -> Result<(), StoreError> {
        self.books
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::BookNotFound(id))
    }
}
