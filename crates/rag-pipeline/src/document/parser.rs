use anyhow::{anyhow, Context, Result};
use encoding_rs::UTF_8;
use lopdf::Document as PdfDocument;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub content: String,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    pub file_type: String,
    pub pages: Option<usize>,
    pub char_count: usize,
}

pub struct DocumentParser;

impl DocumentParser {
    /// Parse document from path
    pub fn parse(path: &Path) -> Result<ParsedDocument> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| anyhow!("No file extension: {:?}", path))?
            .to_lowercase();

        debug!("Parsing file: {:?} (type: {})", path, extension);

        let (content, metadata) = match extension.as_str() {
            "pdf" => Self::parse_pdf(path)?,
            "docx" => Self::parse_docx(path)?,
            // txt, md, and anything else text-like
            _ => Self::parse_text(path)?,
        };

        debug!("Parsed {} characters from {:?}", content.len(), path);

        Ok(ParsedDocument { content, metadata })
    }

    /// Parse PDF using lopdf
    fn parse_pdf(path: &Path) -> Result<(String, DocumentMetadata)> {
        let doc = PdfDocument::load(path).context("Failed to load PDF file")?;
        let pages = doc.get_pages();
        let page_count = pages.len();

        let mut content = String::new();

        for (page_num, _) in pages.iter() {
            match doc.extract_text(&[*page_num]) {
                Ok(text) => {
                    content.push_str(&text);
                    content.push('\n');
                }
                Err(e) => {
                    warn!("Failed to extract text from page {}: {}", page_num, e);
                }
            }
        }

        let metadata = DocumentMetadata {
            file_type: "application/pdf".to_string(),
            pages: Some(page_count),
            char_count: content.len(),
        };

        Ok((content, metadata))
    }

    /// Parse DOCX by unzipping and stripping word/document.xml.
    /// docx-rs is primarily for writing; for text extraction, reading
    /// document.xml directly is more reliable.
    fn parse_docx(path: &Path) -> Result<(String, DocumentMetadata)> {
        let text = Self::extract_text_from_office_xml(path, "word/document.xml")
            .context("Failed to extract DOCX text")?;

        let metadata = DocumentMetadata {
            file_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                .to_string(),
            pages: None,
            char_count: text.len(),
        };

        Ok((text, metadata))
    }

    /// Parse plain text (txt, md, and text-like fallback)
    fn parse_text(path: &Path) -> Result<(String, DocumentMetadata)> {
        let raw_content = fs::read(path)?;
        let content = Self::decode_text(&raw_content);

        let metadata = DocumentMetadata {
            file_type: "text/plain".to_string(),
            pages: None,
            char_count: content.len(),
        };

        Ok((content, metadata))
    }

    /// Decode text, lossy UTF-8 fallback for non-UTF8 input
    fn decode_text(bytes: &[u8]) -> String {
        if let Ok(text) = std::str::from_utf8(bytes) {
            return text.to_string();
        }

        let (decoded, _, _) = UTF_8.decode(bytes);
        decoded.into_owned()
    }

    /// Extract text from an Office XML part (docx) inside the zip container
    fn extract_text_from_office_xml(path: &Path, target_xml_file: &str) -> Result<String> {
        let file = fs::File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)?;

        let mut xml_file = archive.by_name(target_xml_file)?;
        let mut xml_content = String::new();
        xml_file.read_to_string(&mut xml_content)?;

        Ok(Self::strip_xml_tags(&xml_content))
    }

    /// Strip XML tags to get text. Good enough for retrieval text; a full
    /// XML parser would only matter for layout we discard anyway.
    fn strip_xml_tags(xml: &str) -> String {
        let mut text = String::new();
        let mut inside_tag = false;

        for c in xml.chars() {
            if c == '<' {
                inside_tag = true;
            } else if c == '>' {
                inside_tag = false;
                text.push(' '); // keep words from gluing together
            } else if !inside_tag {
                text.push(c);
            }
        }

        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
