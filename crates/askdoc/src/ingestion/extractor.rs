//! Multi-format text extraction

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::types::{Document, DocumentFormat};

/// Text extracted from a document
#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// Normalized text content; empty when the document has no extractable text
    pub content: String,
    /// Total pages (PDF only)
    pub total_pages: Option<u32>,
}

/// Converts uploaded bytes into a single normalized text string
pub struct TextExtractor;

impl TextExtractor {
    /// Extract text from a document according to its declared format
    ///
    /// A document with zero extractable text (e.g. a scanned PDF) yields an
    /// empty string, not an error; the chunker turns it into zero chunks.
    pub fn extract(document: &Document) -> Result<ExtractedText> {
        match document.format {
            DocumentFormat::Text => Self::extract_plain_text(document),
            DocumentFormat::Pdf => Self::extract_pdf(document),
            DocumentFormat::Word => Self::extract_docx(document),
        }
    }

    /// Hash extracted content for the ingest report
    pub fn content_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Decode plain text strictly as UTF-8
    fn extract_plain_text(document: &Document) -> Result<ExtractedText> {
        let content = std::str::from_utf8(&document.data).map_err(|e| {
            Error::corrupt_file(
                &document.filename,
                format!("invalid UTF-8 sequence at byte {}", e.valid_up_to()),
            )
        })?;

        Ok(ExtractedText {
            content: content.to_string(),
            total_pages: None,
        })
    }

    /// Extract PDF text in page order
    fn extract_pdf(document: &Document) -> Result<ExtractedText> {
        let pdf = lopdf::Document::load_mem(&document.data).map_err(|e| {
            Error::corrupt_file(&document.filename, format!("failed to load PDF: {e}"))
        })?;
        let total_pages = pdf.get_pages().len() as u32;

        let raw = pdf_extract::extract_text_from_mem(&document.data).map_err(|e| {
            Error::corrupt_file(&document.filename, format!("PDF text extraction failed: {e}"))
        })?;

        let content = Self::normalize_lines(&raw);
        if content.is_empty() {
            tracing::warn!(
                filename = %document.filename,
                "PDF has no extractable text (image-based or empty)"
            );
        }

        Ok(ExtractedText {
            content,
            total_pages: Some(total_pages),
        })
    }

    /// Extract paragraph text from a .docx archive in document order
    ///
    /// Tables and images are skipped.
    fn extract_docx(document: &Document) -> Result<ExtractedText> {
        let docx = docx_rs::read_docx(&document.data)
            .map_err(|e| Error::corrupt_file(&document.filename, e.to_string()))?;

        let mut paragraphs = Vec::new();
        for child in docx.document.children {
            if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
                let mut text = String::new();
                for child in paragraph.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
                if !text.trim().is_empty() {
                    paragraphs.push(text);
                }
            }
        }

        Ok(ExtractedText {
            content: paragraphs.join("\n"),
            total_pages: None,
        })
    }

    /// Strip NULs, trim each line, drop empty lines
    fn normalize_lines(raw: &str) -> String {
        raw.replace('\0', "")
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_roundtrip() {
        let doc = Document::new("a.txt", DocumentFormat::Text, b"hello world".to_vec());
        let extracted = TextExtractor::extract(&doc).unwrap();
        assert_eq!(extracted.content, "hello world");
        assert_eq!(extracted.total_pages, None);
    }

    #[test]
    fn test_invalid_utf8_is_corrupt() {
        let doc = Document::new("bad.txt", DocumentFormat::Text, vec![0x66, 0xff, 0xfe]);
        assert!(matches!(
            TextExtractor::extract(&doc),
            Err(Error::CorruptFile { .. })
        ));
    }

    #[test]
    fn test_garbage_pdf_is_corrupt() {
        let doc = Document::new("bad.pdf", DocumentFormat::Pdf, b"not a pdf".to_vec());
        assert!(matches!(
            TextExtractor::extract(&doc),
            Err(Error::CorruptFile { .. })
        ));
    }

    #[test]
    fn test_normalize_lines() {
        let raw = "  first line \n\n\0second\n   \n";
        assert_eq!(TextExtractor::normalize_lines(raw), "first line\nsecond");
    }

    #[test]
    fn test_content_hash_is_stable() {
        assert_eq!(
            TextExtractor::content_hash("abc"),
            TextExtractor::content_hash("abc")
        );
        assert_ne!(
            TextExtractor::content_hash("abc"),
            TextExtractor::content_hash("abd")
        );
    }
}
