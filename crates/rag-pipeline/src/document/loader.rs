use crate::utils::error::PipelineError;
use mime_guess::mime;
use std::fs;
use std::path::Path;

pub struct DocumentLoader;

impl DocumentLoader {
    /// Check if file is supported for text extraction
    pub fn is_supported(path: &Path) -> bool {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("txt") | Some("md") | Some("pdf") | Some("docx") => true,

            _ => {
                // Check MIME type as fallback
                let mime = mime_guess::from_path(path).first();
                matches!(mime, Some(m) if m.type_() == mime::TEXT)
            }
        }
    }

    /// Validate file before processing
    pub fn validate_file(path: &Path, max_size_mb: u64) -> Result<(), PipelineError> {
        if !path.exists() || !path.is_file() {
            return Err(PipelineError::FileNotFound(path.display().to_string()));
        }

        if !Self::is_supported(path) {
            return Err(PipelineError::UnsupportedFileType(
                path.display().to_string(),
            ));
        }

        let metadata = fs::metadata(path)?;
        let size_mb = metadata.len() / 1024 / 1024;

        if size_mb > max_size_mb {
            return Err(PipelineError::FileTooLarge(size_mb, max_size_mb));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn supported_extensions() {
        assert!(DocumentLoader::is_supported(Path::new("notes.txt")));
        assert!(DocumentLoader::is_supported(Path::new("report.PDF")));
        assert!(DocumentLoader::is_supported(Path::new("thesis.docx")));
        assert!(DocumentLoader::is_supported(Path::new("readme.md")));
        assert!(!DocumentLoader::is_supported(Path::new("archive.tar.gz")));
        assert!(!DocumentLoader::is_supported(Path::new("binary.exe")));
    }

    #[test]
    fn text_mime_fallback() {
        // No allow-listed extension, but a text/* MIME type
        assert!(DocumentLoader::is_supported(Path::new("data.csv")));
    }

    #[test]
    fn missing_file_is_typed_error() {
        let result = DocumentLoader::validate_file(Path::new("/nonexistent/file.txt"), 100);
        assert!(matches!(result, Err(PipelineError::FileNotFound(_))));
    }

    #[test]
    fn unsupported_type_is_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.exe");
        std::fs::write(&path, b"MZ").unwrap();

        let result = DocumentLoader::validate_file(&path, 100);
        assert!(matches!(result, Err(PipelineError::UnsupportedFileType(_))));
    }

    #[test]
    fn oversized_file_is_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, vec![b'x'; 2 * 1024 * 1024 + 1]).unwrap();

        let result = DocumentLoader::validate_file(&path, 1);
        assert!(matches!(result, Err(PipelineError::FileTooLarge(2, 1))));
    }

    #[test]
    fn valid_file_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "hello there").unwrap();

        DocumentLoader::validate_file(&path, 100).unwrap();
    }
}
