//! Document segmentation and pagination for the mazmundama translation
//! workbench.
//!
//! Uploaded documents are converted to markup, parsed, split into numbered
//! sentence units wrapped in addressable spans, and packed into pages. The
//! stores keep the pages and the per-sentence translations made against them.

pub mod convert;
pub mod html;
pub mod io;
pub mod models;
pub mod paginate;
pub mod pipeline;
pub mod prepare;
pub mod segment;
pub mod store;
pub mod workbench;
pub mod wrap;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use convert::{ConvertError, HtmlPassthrough, MarkupConverter};
pub use io::{FsBookStore, IoError};
pub use models::{BookId, DocumentKey, InvalidDocumentKey, TranslationId};
pub use paginate::{DEFAULT_CHARS_PER_PAGE, Page};
pub use pipeline::{
    PipelineError, PipelineOptions, ProcessedDocument, SentenceUnit, process_html, process_upload,
};
pub use segment::{Granularity, SentenceId};
pub use store::{
    BookRecord, BookStore, MemoryBookStore, MemoryTranslationStore, SaveTranslation, StoreError,
    StoredPage, TranslationRecord, TranslationStore, TranslationVersion,
};
pub use workbench::{BookSummary, BookView, UploadOutcome, Workbench, WorkbenchError};
pub use wrap::{SentenceSpan, UnitKind, sentence_spans};
