use std::collections::BTreeMap;

use serde::Serialize;

use super::{StoreError, now_ms};
use crate::{
    models::{BookId, TranslationId},
    segment::SentenceId,
};

/// A translation to store for one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTranslation {
    pub book: BookId,
    pub sentence: SentenceId,
    pub page: u32,
    pub original_text: String,
    pub translated_text: String,
    /// Name of the model (or person) that produced the text.
    pub model: String,
}

/// Current translation state of one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationRecord {
    pub id: TranslationId,
    pub book: BookId,
    pub sentence: SentenceId,
    pub page: u32,
    pub original_text: String,
    pub translated_text: String,
    pub approved: bool,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}

/// One saved text of a translation. Versions are never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationVersion {
    pub translation: TranslationId,
    pub text: String,
    pub model: String,
    pub created_at_ms: u64,
}

/// Storage for per-sentence translations and their history.
pub trait TranslationStore {
    /// Creates the record for `(book, sentence)` or updates its current text,
    /// and appends a version either way.
    ///
    /// Updating changes only the translated text; the original text and page
    /// recorded on first save are kept.
    fn save_translation(&mut self, request: SaveTranslation) -> Result<TranslationId, StoreError>;

    /// Marks the translation approved. Returns `false` when there is none.
    fn approve(&mut self, book: BookId, sentence: SentenceId) -> Result<bool, StoreError>;

    /// Current translations of a book, ordered by sentence.
    fn translations(&self, book: BookId) -> Result<Vec<TranslationRecord>, StoreError>;

    /// Versions of one translation, oldest first.
    fn history(
        &self,
        book: BookId,
        sentence: SentenceId,
    ) -> Result<Vec<TranslationVersion>, StoreError>;

    /// Every version of every translation of a book, grouped by sentence.
    fn versions_by_sentence(
        &self,
        book: BookId,
    ) -> Result<BTreeMap<SentenceId, Vec<TranslationVersion>>, StoreError>;

    /// Number of sentences of `book` with a stored translation, blank or not.
    fn translated_count(&self, book: BookId) -> Result<usize, StoreError>;

    /// Removes every translation of `book` with its versions. Returns how
    /// many records were removed.
    fn delete_book(&mut self, book: BookId) -> Result<usize, StoreError>;

    /// Translations of `book` whose sentence is not in `current`.
    fn orphaned(
        &self,
        book: BookId,
        current: &[SentenceId],
    ) -> Result<Vec<TranslationRecord>, StoreError> {
        Ok(self
            .translations(book)?
            .into_iter()
            .filter(|record| !current.contains(&record.sentence))
            .collect())
    }
}

#[derive(Debug)]
struct Entry {
    record: TranslationRecord,
    versions: Vec<TranslationVersion>,
}

/// Translation store held in memory.
#[derive(Debug, Default)]
pub struct MemoryTranslationStore {
    entries: BTreeMap<(BookId, SentenceId), Entry>,
}

impl MemoryTranslationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn book_entries(&self, book: BookId) -> impl Iterator<Item = &Entry> {
        self.entries
            .iter()
            .filter(move |((entry_book, _), _)| *entry_book == book)
            .map(|(_, entry)| entry)
    }
}

impl TranslationStore for MemoryTranslationStore {
    fn save_translation(&mut self, request: SaveTranslation) -> Result<TranslationId, StoreError> {
        let now = now_ms();
        let entry = self
            .entries
            .entry((request.book, request.sentence))
            .or_insert_with(|| Entry {
                record: TranslationRecord {
                    id: TranslationId::new(),
                    book: request.book,
                    sentence: request.sentence,
                    page: request.page,
                    original_text: request.original_text,
                    translated_text: String::new(),
                    approved: false,
                    created_at_ms: now,
                    updated_at_ms: now,
                },
                versions: vec![],
            });

        entry.record.translated_text = request.translated_text.clone();
        entry.record.updated_at_ms = now;
        entry.versions.push(TranslationVersion {
            translation: entry.record.id,
            text: request.translated_text,
            model: request.model,
            created_at_ms: now,
        });
        log::debug!(
            "saved translation of {} in book {} (version {})",
            request.sentence,
            request.book,
            entry.versions.len()
        );
        Ok(entry.record.id)
    }

    fn approve(&mut self, book: BookId, sentence: SentenceId) -> Result<bool, StoreError> {
        Ok(match self.entries.get_mut(&(book, sentence)) {
            Some(entry) => {
                entry.record.approved = true;
                entry.record.updated_at_ms = now_ms();
                true
            }
            None => false,
        })
    }

    fn translations(&self, book: BookId) -> Result<Vec<TranslationRecord>, StoreError> {
        Ok(self
            .book_entries(book)
            .map(|entry| entry.record.clone())
            .collect())
    }

    fn history(
        &self,
        book: BookId,
        sentence: SentenceId,
    ) -> Result<Vec<TranslationVersion>, StoreError> {
        Ok(self
            .entries
            .get(&(book, sentence))
            .map(|entry| entry.versions.clone())
            .unwrap_or_default())
    }

    fn versions_by_sentence(
        &self,
        book: BookId,
    ) -> Result<BTreeMap<SentenceId, Vec<TranslationVersion>>, StoreError> {
        Ok(self
            .book_entries(book)
            .map(|entry| (entry.record.sentence, entry.versions.clone()))
            .collect())
    }

    fn translated_count(&self, book: BookId) -> Result<usize, StoreError> {
        Ok(self.book_entries(book).count())
    }

    fn delete_book(&mut self, book: BookId) -> Result<usize, StoreError> {
        let before = self.entries.len();
        self.entries.retain(|(entry_book, _), _| *entry_book != book);
        Ok(before - self.entries.len())
    }
}
