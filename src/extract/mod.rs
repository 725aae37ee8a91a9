//! Document-to-text extraction.
//!
//! Turns an uploaded contract file into the plain-text payload the
//! agents consume. PDF text comes from `pdf-extract`; DOCX text is
//! pulled from the `word/document.xml` entry inside the ZIP archive.
//! Format-specific parsing stays behind this boundary; the rest of the
//! application only ever sees a [`TextPayload`] or an
//! [`ExtractionError`].

use crate::models::TextPayload;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
}

impl FileKind {
    /// Infer the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "pdf" => Some(FileKind::Pdf),
            "docx" => Some(FileKind::Docx),
            _ => None,
        }
    }
}

/// Error extracting text from a document.
///
/// Surfaced to the user before orchestration begins; extraction
/// failures never reach the agents.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file type: {0} (expected .pdf or .docx)")]
    UnsupportedType(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract PDF text: {0}")]
    Pdf(String),

    #[error("invalid DOCX archive: {0}")]
    Docx(String),
}

/// Extract the text payload from a PDF or DOCX document.
pub fn extract_text(path: &Path) -> Result<TextPayload, ExtractionError> {
    let kind = FileKind::from_path(path).ok_or_else(|| {
        ExtractionError::UnsupportedType(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("<none>")
                .to_string(),
        )
    })?;

    let text = match kind {
        FileKind::Pdf => extract_pdf(path)?,
        FileKind::Docx => extract_docx(path)?,
    };

    info!(
        file = %path.display(),
        chars = text.chars().count(),
        "Extracted document text"
    );

    Ok(TextPayload::new(text))
}

fn extract_pdf(path: &Path) -> Result<String, ExtractionError> {
    debug!(file = %path.display(), "Extracting PDF text");
    pdf_extract::extract_text(path).map_err(|e| ExtractionError::Pdf(e.to_string()))
}

/// Extract text from a DOCX by reading `word/document.xml` and joining
/// the text runs of each paragraph with a blank line. Table cell text
/// lives in ordinary `<w:t>` runs, so it is picked up as well.
fn extract_docx(path: &Path) -> Result<String, ExtractionError> {
    debug!(file = %path.display(), "Extracting DOCX text");

    let file = std::fs::File::open(path).map_err(|e| ExtractionError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut doc_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|_| ExtractionError::Docx("missing word/document.xml".to_string()))?
        .read_to_string(&mut doc_xml)
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;

    extract_docx_xml(&doc_xml)
}

fn extract_docx_xml(doc_xml: &str) -> Result<String, ExtractionError> {
    let mut reader = quick_xml::Reader::from_str(doc_xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut paragraph_text = String::new();
    let mut in_paragraph = false;
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(quick_xml::events::Event::Start(ref e))
            | Ok(quick_xml::events::Event::Empty(ref e)) => {
                let local_name = e.local_name();
                let name = std::str::from_utf8(local_name.as_ref()).unwrap_or("");
                if name == "p" {
                    in_paragraph = true;
                    paragraph_text.clear();
                } else if name == "t" {
                    in_text_run = true;
                }
            }
            Ok(quick_xml::events::Event::End(ref e)) => {
                let local_name = e.local_name();
                let name = std::str::from_utf8(local_name.as_ref()).unwrap_or("");
                if name == "p" {
                    if in_paragraph && !paragraph_text.trim().is_empty() {
                        paragraphs.push(paragraph_text.trim().to_string());
                    }
                    in_paragraph = false;
                } else if name == "t" {
                    in_text_run = false;
                }
            }
            Ok(quick_xml::events::Event::Text(ref e)) => {
                if in_text_run {
                    if let Ok(text) = e.unescape() {
                        paragraph_text.push_str(&text);
                    }
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(ExtractionError::Docx(format!("XML parse error: {}", e))),
            _ => {}
        }
    }

    Ok(paragraphs.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_file_kind_from_path() {
        assert_eq!(
            FileKind::from_path(Path::new("lease.pdf")),
            Some(FileKind::Pdf)
        );
        assert_eq!(
            FileKind::from_path(Path::new("NDA.DOCX")),
            Some(FileKind::Docx)
        );
        assert_eq!(FileKind::from_path(Path::new("notes.txt")), None);
        assert_eq!(FileKind::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = extract_text(Path::new("contract.rtf")).unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedType(_)));
        assert!(err.to_string().contains("rtf"));
    }

    #[test]
    fn test_docx_xml_paragraphs_and_tables() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>SERVICE AGREEMENT</w:t></w:r></w:p>
    <w:p><w:r><w:t>This agreement is made between </w:t></w:r><w:r><w:t>the parties.</w:t></w:r></w:p>
    <w:p/>
    <w:tbl>
      <w:tr><w:tc><w:p><w:r><w:t>Fee</w:t></w:r></w:p></w:tc></w:tr>
    </w:tbl>
  </w:body>
</w:document>"#;

        let text = extract_docx_xml(xml).unwrap();
        assert_eq!(
            text,
            "SERVICE AGREEMENT\n\nThis agreement is made between the parties.\n\nFee"
        );
    }

    #[test]
    fn test_docx_xml_escaped_entities() {
        let xml = r#"<w:document xmlns:w="ns"><w:body>
            <w:p><w:r><w:t>Smith &amp; Sons</w:t></w:r></w:p>
        </w:body></w:document>"#;

        let text = extract_docx_xml(xml).unwrap();
        assert_eq!(text, "Smith & Sons");
    }

    fn write_docx(dir: &Path, name: &str, document_xml: &str) -> PathBuf {
        let path = dir.join(name);
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap();
        path
    }

    #[test]
    fn test_extract_docx_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(
            dir.path(),
            "lease.docx",
            r#"<w:document xmlns:w="ns"><w:body>
                <w:p><w:r><w:t>LEASE AGREEMENT</w:t></w:r></w:p>
                <w:p><w:r><w:t>Term: 12 months</w:t></w:r></w:p>
            </w:body></w:document>"#,
        );

        let payload = extract_text(&path).unwrap();
        assert_eq!(payload.as_str(), "LEASE AGREEMENT\n\nTerm: 12 months");
    }

    #[test]
    fn test_docx_missing_document_xml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("unrelated.txt", options).unwrap();
        writer.write_all(b"not a docx").unwrap();
        writer.finish().unwrap();

        let err = extract_text(&path).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = extract_text(Path::new("/nonexistent/contract.docx")).unwrap_err();
        assert!(matches!(err, ExtractionError::Io { .. }));
    }
}
