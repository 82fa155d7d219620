//! Document loading: PDF/TXT text extraction, stats, preview and prefix truncation.

use crate::models::DocumentStats;

const PREVIEW_CHARS: usize = 500;
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Detect the format from the declared content type, falling back to the file extension.
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Option<Self> {
        match content_type.map(|ct| ct.split(';').next().unwrap_or(ct).trim()) {
            Some("application/pdf") => return Some(Self::Pdf),
            Some("text/plain") => return Some(Self::Text),
            _ => {}
        }

        let extension = file_name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase());
        match extension.as_deref() {
            Some("pdf") => Some(Self::Pdf),
            Some("txt") => Some(Self::Text),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Unsupported file format. Please upload PDF or TXT files only.")]
    Unsupported,
    #[error("Text file is not valid UTF-8")]
    InvalidUtf8,
    #[error("Could not read PDF: {0}")]
    Pdf(String),
    #[error("Could not extract text from the uploaded file")]
    Empty,
}

/// Extract the plain text of an uploaded file. Fails with [`ExtractError::Empty`]
/// when the file yields only whitespace.
pub fn extract_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractError> {
    let text = match kind {
        // pdf-extract panics on some malformed files instead of returning an error
        DocumentKind::Pdf => std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|_| ExtractError::Pdf("malformed PDF".to_string()))?
            .map_err(|e| ExtractError::Pdf(e.to_string()))?,
        DocumentKind::Text => decode_text(bytes)?,
    };

    if text.trim().is_empty() {
        return Err(ExtractError::Empty);
    }

    Ok(text)
}

fn decode_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let bytes = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
    String::from_utf8(bytes.to_vec()).map_err(|_| ExtractError::InvalidUtf8)
}

pub fn stats(text: &str) -> DocumentStats {
    DocumentStats {
        words: text.split_whitespace().count(),
        characters: text.chars().count(),
    }
}

/// The first 500 characters, with an ellipsis when the text is longer.
pub fn preview(text: &str) -> String {
    let head = prefix_chars(text, PREVIEW_CHARS);
    if head.len() < text.len() {
        format!("{head}...")
    } else {
        head.to_string()
    }
}

/// The first `max_chars` characters of `text`, never splitting a UTF-8 sequence.
pub fn prefix_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_content_type() {
        assert_eq!(
            DocumentKind::detect("upload", Some("application/pdf")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::detect("upload", Some("text/plain; charset=utf-8")),
            Some(DocumentKind::Text)
        );
    }

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(
            DocumentKind::detect("Paper.PDF", Some("application/octet-stream")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(DocumentKind::detect("notes.txt", None), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::detect("slides.pptx", None), None);
        assert_eq!(DocumentKind::detect("README", None), None);
    }

    #[test]
    fn test_extract_text_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("hello world".as_bytes());
        assert_eq!(extract_text(DocumentKind::Text, &bytes).unwrap(), "hello world");
    }

    #[test]
    fn test_extract_text_rejects_invalid_utf8() {
        let err = extract_text(DocumentKind::Text, &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidUtf8));
    }

    #[test]
    fn test_extract_text_rejects_blank() {
        let err = extract_text(DocumentKind::Text, b"  \n\t ").unwrap_err();
        assert!(matches!(err, ExtractError::Empty));
    }

    /// A one-page PDF showing `text` in Helvetica, with a correct xref table.
    fn one_page_pdf(text: &str) -> Vec<u8> {
        let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_offset = pdf.len();
        let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            tail.push_str(&format!("{offset:010} 00000 n \n"));
        }
        tail.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(tail.as_bytes());
        pdf
    }

    #[test]
    fn test_extract_text_from_pdf() {
        let pdf = one_page_pdf("Blue whales eat krill");
        let text = extract_text(DocumentKind::Pdf, &pdf).unwrap();
        assert_eq!(text.trim(), "Blue whales eat krill");
    }

    #[test]
    fn test_extract_pdf_garbage_is_an_error() {
        let err = extract_text(DocumentKind::Pdf, b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[test]
    fn test_stats() {
        let s = stats("one two  three\nfour");
        assert_eq!(s.words, 4);
        assert_eq!(s.characters, 19);
    }

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_preview_long_text_gets_ellipsis() {
        let text = "x".repeat(600);
        let p = preview(&text);
        assert_eq!(p.len(), 503);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn test_prefix_chars_is_unicode_safe() {
        let text = "héllo 🌍 world";
        assert_eq!(prefix_chars(text, 7), "héllo 🌍");
        assert_eq!(prefix_chars(text, 100), text);
        assert_eq!(prefix_chars(text, 0), "");
    }
}
