pub mod document_key;
pub mod ids;

pub use document_key::{DocumentKey, InvalidDocumentKey};
pub use ids::{BookId, TranslationId};
