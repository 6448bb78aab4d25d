//! Conversion of uploaded files into markup.
//!
//! Word-processor conversion lives outside this crate; anything able to turn
//! bytes into HTML plugs in through [`MarkupConverter`].

use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("conversion failed: {0}")]
    Failed(String),
}

/// Turns the bytes of an uploaded file into markup.
pub trait MarkupConverter {
    /// Whether files named `file_name` can be converted.
    fn accepts(&self, file_name: &str) -> bool;

    fn convert(&self, bytes: &[u8]) -> Result<String, ConvertError>;
}

/// Accepts files that already are HTML and passes them through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPassthrough;

impl MarkupConverter for HtmlPassthrough {
    fn accepts(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
    }

    fn convert(&self, bytes: &[u8]) -> Result<String, ConvertError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
    }
}
