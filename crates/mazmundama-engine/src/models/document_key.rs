use std::fmt;

use relative_path::{Component, RelativePath, RelativePathBuf};
use serde::{Deserialize, Serialize};

/// Segment names a book directory uses for its own files.
const RESERVED_SEGMENTS: &[&str] = &["pages", "book.toml"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDocumentKey {
    #[error("invalid document key {0:?}: needs at least one path segment")]
    Empty(String),
    #[error("invalid document key {key:?}: segment {segment:?} is reserved")]
    ReservedSegment { key: String, segment: String },
}

/// Logical key of an uploaded document, such as `users/ana/books/novel.docx`.
///
/// Uploading again under the same key replaces the stored pages. Keys are
/// relative paths made of plain segments only; `.` and `..` are dropped, so a
/// key can always be used as a directory below a store root. Segments named
/// `pages` or `book.toml`, or starting with a dot, are rejected: a book
/// directory keeps its own files under those names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentKey {
    path: RelativePathBuf,
}

impl DocumentKey {
    pub fn new(key: &str) -> Result<Self, InvalidDocumentKey> {
        let mut path = RelativePathBuf::new();
        for component in RelativePath::new(key).components() {
            if let Component::Normal(segment) = component {
                if segment.starts_with('.') || RESERVED_SEGMENTS.contains(&segment) {
                    return Err(InvalidDocumentKey::ReservedSegment {
                        key: key.to_string(),
                        segment: segment.to_string(),
                    });
                }
                path.push(segment);
            }
        }
        if path.as_str().is_empty() {
            return Err(InvalidDocumentKey::Empty(key.to_string()));
        }
        Ok(Self { path })
    }

    /// Key for a file uploaded by `owner`: `users/<owner>/books/<file name>`.
    ///
    /// Only the last segment of `file_name` is used.
    pub fn for_upload(owner: &str, file_name: &str) -> Result<Self, InvalidDocumentKey> {
        let file = RelativePath::new(file_name)
            .file_name()
            .ok_or_else(|| InvalidDocumentKey::Empty(file_name.to_string()))?;
        Self::new(&format!("users/{owner}/books/{file}"))
    }

    pub fn as_str(&self) -> &str {
        self.path.as_str()
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.path
    }

    /// Last segment without its extension; the default book title.
    pub fn display_name(&self) -> &str {
        self.path
            .file_stem()
            .or_else(|| self.path.file_name())
            .unwrap_or(self.path.as_str())
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for DocumentKey {
    type Error = InvalidDocumentKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<DocumentKey> for String {
    fn from(key: DocumentKey) -> Self {
        key.path.into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("users/ana/books/novel.docx", "users/ana/books/novel.docx")]
    #[case("./a/b", "a/b")]
    #[case("../../etc/passwd", "etc/passwd")]
    fn keys_keep_plain_segments(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(DocumentKey::new(input).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("..")]
    #[case("./")]
    fn keys_without_segments_are_invalid(#[case] input: &str) {
        assert!(DocumentKey::new(input).is_err());
    }

    #[rstest]
    #[case("users/pages/books/a.html", "pages")]
    #[case("a/pages", "pages")]
    #[case("a/book.toml", "book.toml")]
    #[case("users/ana/.drafts/a.html", ".drafts")]
    #[case(".pages.staging", ".pages.staging")]
    fn reserved_segments_are_rejected(#[case] input: &str, #[case] segment: &str) {
        assert_eq!(
            DocumentKey::new(input),
            Err(InvalidDocumentKey::ReservedSegment {
                key: input.to_string(),
                segment: segment.to_string(),
            })
        );
    }

    #[rstest]
    #[case("users/ana/books/pages.html")]
    #[case("users/ana/books/my.pages")]
    #[case("users/ana/books/a.b")]
    fn names_that_only_resemble_reserved_ones_are_fine(#[case] input: &str) {
        assert_eq!(DocumentKey::new(input).unwrap().as_str(), input);
    }

    #[test]
    fn hidden_upload_name_is_rejected() {
        assert!(matches!(
            DocumentKey::for_upload("ana", ".notes.html"),
            Err(InvalidDocumentKey::ReservedSegment { .. })
        ));
    }

    #[test]
    fn upload_key_uses_file_name_only() {
        let key = DocumentKey::for_upload("ana", "../drafts/Chapter 1.html").unwrap();
        assert_eq!(key.as_str(), "users/ana/books/Chapter 1.html");
        assert_eq!(key.display_name(), "Chapter 1");
    }

    #[test]
    fn serde_uses_string_form() {
        #[derive(Serialize, Deserialize)]
        struct Manifest {
            key: DocumentKey,
        }
        let manifest: Manifest = toml::from_str("key = \"books/../x.html\"").unwrap();
        assert_eq!(manifest.key.as_str(), "books/x.html");
        assert_eq!(
            toml::to_string(&manifest).unwrap().trim(),
            "key = \"books/x.html\""
        );
    }
}
