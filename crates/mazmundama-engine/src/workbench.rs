//! Upload, browse and translate books through one facade over the pipeline
//! and the two stores.

use std::collections::BTreeMap;

use crate::{
    convert::MarkupConverter,
    html::parse_html,
    models::{BookId, DocumentKey, InvalidDocumentKey, TranslationId},
    pipeline::{PipelineError, PipelineOptions, ProcessedDocument, process_upload},
    segment::SentenceId,
    store::{
        BookRecord, BookStore, SaveTranslation, StoreError, StoredPage, TranslationRecord,
        TranslationStore, TranslationVersion,
    },
    wrap::sentence_spans,
};

#[derive(Debug, thiserror::Error)]
pub enum WorkbenchError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Key(#[from] InvalidDocumentKey),
    #[error("{sentence} is not a sentence of book {book}")]
    UnknownSentence { book: BookId, sentence: SentenceId },
}

/// Result of an upload.
#[derive(Debug)]
pub struct UploadOutcome {
    pub book: BookId,
    pub document: ProcessedDocument,
    /// Translations whose sentence no longer exists after a re-upload.
    pub orphaned: Vec<TranslationRecord>,
}

/// A book in the library listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSummary {
    pub record: BookRecord,
    pub translated: usize,
}

/// Everything needed to show a book for translation.
#[derive(Debug, Clone)]
pub struct BookView {
    pub record: BookRecord,
    pub pages: Vec<StoredPage>,
    pub translations: Vec<TranslationRecord>,
    pub versions: BTreeMap<SentenceId, Vec<TranslationVersion>>,
}

pub struct Workbench<B, T, C> {
    books: B,
    translations: T,
    converter: C,
    options: PipelineOptions,
}

impl<B, T, C> Workbench<B, T, C>
where
    B: BookStore,
    T: TranslationStore,
    C: MarkupConverter,
{
    pub fn new(books: B, translations: T, converter: C, options: PipelineOptions) -> Self {
        Self {
            books,
            translations,
            converter,
            options,
        }
    }

    pub fn books(&self) -> &B {
        &self.books
    }

    pub fn translations(&self) -> &T {
        &self.translations
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Processes an uploaded file and stores it under `key`, replacing any
    /// earlier upload with the same key.
    ///
    /// Nothing is stored when processing fails.
    pub fn upload(
        &mut self,
        key: &DocumentKey,
        title: Option<&str>,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<UploadOutcome, WorkbenchError> {
        let document = process_upload(file_name, bytes, &self.converter, &self.options)?;
        let title = title.unwrap_or_else(|| key.display_name());
        let book = self.books.save_book(key, title, &document)?;

        let current: Vec<SentenceId> = document.units.iter().map(|unit| unit.id).collect();
        let orphaned = self.translations.orphaned(book, &current)?;
        if !orphaned.is_empty() {
            let ids: Vec<String> = orphaned.iter().map(|r| r.sentence.to_string()).collect();
            log::warn!(
                "{} translations of {key} no longer match a sentence: {}",
                orphaned.len(),
                ids.join(", ")
            );
        }

        Ok(UploadOutcome {
            book,
            document,
            orphaned,
        })
    }

    /// Books with their translation progress, most recent upload first.
    pub fn list_books(&self) -> Result<Vec<BookSummary>, WorkbenchError> {
        self.books
            .list_books()?
            .into_iter()
            .map(|record| {
                let translated = self.translations.translated_count(record.id)?;
                Ok(BookSummary { record, translated })
            })
            .collect()
    }

    pub fn open_book(&self, id: BookId) -> Result<BookView, WorkbenchError> {
        Ok(BookView {
            record: self.books.book(id)?,
            pages: self.books.pages(id)?,
            translations: self.translations.translations(id)?,
            versions: self.translations.versions_by_sentence(id)?,
        })
    }

    /// Saves a translation of one sentence of a stored book.
    ///
    /// The original text and page are taken from the stored pages.
    pub fn save_translation(
        &mut self,
        book: BookId,
        sentence: SentenceId,
        translated_text: &str,
        model: &str,
    ) -> Result<TranslationId, WorkbenchError> {
        let (page, original_text) = self.find_sentence(book, sentence)?;
        let id = self.translations.save_translation(SaveTranslation {
            book,
            sentence,
            page,
            original_text,
            translated_text: translated_text.to_string(),
            model: model.to_string(),
        })?;
        Ok(id)
    }

    pub fn approve(&mut self, book: BookId, sentence: SentenceId) -> Result<bool, WorkbenchError> {
        Ok(self.translations.approve(book, sentence)?)
    }

    pub fn history(
        &self,
        book: BookId,
        sentence: SentenceId,
    ) -> Result<Vec<TranslationVersion>, WorkbenchError> {
        Ok(self.translations.history(book, sentence)?)
    }

    /// Deletes a book with its pages and translations.
    pub fn delete_book(&mut self, id: BookId) -> Result<(), WorkbenchError> {
        self.books.delete_book(id)?;
        let removed = self.translations.delete_book(id)?;
        log::info!("deleted book {id} and {removed} translations");
        Ok(())
    }

    fn find_sentence(
        &self,
        book: BookId,
        sentence: SentenceId,
    ) -> Result<(u32, String), WorkbenchError> {
        for page in self.books.pages(book)? {
            let parsed = parse_html(&page.html);
            if let Some(span) = sentence_spans(&parsed.nodes)
                .into_iter()
                .find(|span| span.id == sentence)
            {
                return Ok((page.number, span.text));
            }
        }
        Err(WorkbenchError::UnknownSentence { book, sentence })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        convert::HtmlPassthrough,
        store::{MemoryBookStore, MemoryTranslationStore},
        tests::key,
    };
    use pretty_assertions::assert_eq;

    type MemoryWorkbench = Workbench<MemoryBookStore, MemoryTranslationStore, HtmlPassthrough>;

    fn workbench() -> MemoryWorkbench {
        Workbench::new(
            MemoryBookStore::new(),
            MemoryTranslationStore::new(),
            HtmlPassthrough,
            PipelineOptions::default(),
        )
    }

    fn sent(n: u32) -> SentenceId {
        SentenceId::new(n).unwrap()
    }

    #[test]
    fn test_upload_and_translate() {
        let mut bench = workbench();
        let k = key("users/ana/books/story.html");
        let outcome = bench
            .upload(&k, None, "story.html", b"<h1>Story</h1><p>Once upon a time.</p>")
            .unwrap();
        assert_eq!(outcome.document.total_sentences(), 2);

        bench
            .save_translation(outcome.book, sent(2), "Bir varmis bir yokmus.", "manual")
            .unwrap();

        let view = bench.open_book(outcome.book).unwrap();
        assert_eq!(view.record.title, "story");
        assert_eq!(view.translations.len(), 1);
        assert_eq!(view.translations[0].original_text, "Once upon a time.");
        assert_eq!(view.translations[0].page, 1);
        assert_eq!(view.versions[&sent(2)].len(), 1);
    }

    #[test]
    fn test_unknown_sentence_is_rejected() {
        let mut bench = workbench();
        let outcome = bench
            .upload(&key("k"), Some("K"), "k.html", b"<p>Only one.</p>")
            .unwrap();

        let err = bench
            .save_translation(outcome.book, sent(5), "x", "manual")
            .unwrap_err();
        assert!(matches!(err, WorkbenchError::UnknownSentence { .. }));
    }

    #[test]
    fn test_reupload_reports_orphans_and_keeps_matching_translations() {
        let mut bench = workbench();
        let k = key("k");
        let first = bench
            .upload(&k, None, "k.html", b"<p>One.</p><p>Two.</p><p>Three.</p>")
            .unwrap();
        for n in 1..=3 {
            bench
                .save_translation(first.book, sent(n), "t", "manual")
                .unwrap();
        }

        let second = bench.upload(&k, None, "k.html", b"<p>One.</p>").unwrap();

        assert_eq!(second.book, first.book);
        let orphans: Vec<u32> = second.orphaned.iter().map(|r| r.sentence.number()).collect();
        assert_eq!(orphans, vec![2, 3]);
        assert_eq!(bench.translations().translations(first.book).unwrap().len(), 3);
    }

    #[test]
    fn test_failed_upload_stores_nothing() {
        let mut bench = workbench();
        let err = bench
            .upload(&key("k"), None, "k.docx", b"binary")
            .unwrap_err();
        assert!(matches!(
            err,
            WorkbenchError::Pipeline(PipelineError::UnsupportedFormat { .. })
        ));
        assert!(bench.list_books().unwrap().is_empty());
    }

    #[test]
    fn test_list_books_counts_translations() {
        let mut bench = workbench();
        let outcome = bench
            .upload(&key("k"), None, "k.html", b"<p>A.</p><p>B.</p>")
            .unwrap();
        bench.save_translation(outcome.book, sent(1), "a", "m").unwrap();

        let books = bench.list_books().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].translated, 1);
    }

    #[test]
    fn test_delete_cascades_to_translations() {
        let mut bench = workbench();
        let outcome = bench
            .upload(&key("k"), None, "k.html", b"<p>A.</p>")
            .unwrap();
        bench.save_translation(outcome.book, sent(1), "a", "m").unwrap();
        assert!(bench.approve(outcome.book, sent(1)).unwrap());

        bench.delete_book(outcome.book).unwrap();

        assert!(bench.open_book(outcome.book).is_err());
        assert!(bench.history(outcome.book, sent(1)).unwrap().is_empty());
    }
}
