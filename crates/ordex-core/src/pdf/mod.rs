//! PDF text extraction module.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A document that can hand out its text one page at a time.
///
/// This is the only capability the order parser needs from the outside
/// world; PDF decoding stays behind it.
pub trait TextSource {
    /// Text of every page, in page order.
    fn page_texts(&self) -> Result<Vec<String>>;

    /// All pages joined by a newline.
    fn full_text(&self) -> Result<String> {
        Ok(self.page_texts()?.join("\n"))
    }
}

/// A PDF backend: loading and validation. Text comes out through
/// [`TextSource`].
pub trait PdfProcessor: TextSource {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;
}

/// Already-extracted text, e.g. a saved `_debug.txt` dump.
#[derive(Debug, Clone, Default)]
pub struct PlainText {
    pages: Vec<String>,
}

impl PlainText {
    /// Single-page text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            pages: vec![text.into()],
        }
    }

    /// Text split into pages.
    pub fn from_pages(pages: Vec<String>) -> Self {
        Self { pages }
    }
}

impl TextSource for PlainText {
    fn page_texts(&self) -> Result<Vec<String>> {
        Ok(self.pages.clone())
    }
}
