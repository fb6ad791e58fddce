//! Input manager for handling different file types

use crate::error::{AtsError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::{error, info};
use std::path::Path;
use tokio::fs;

#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Extract resume text. Anything other than PDF or DOCX is rejected
    /// before the file is opened.
    pub async fn extract_resume(&self, path: &Path) -> Result<String> {
        let file_type = FileType::from_path(path);
        if !file_type.is_resume_format() {
            return Err(AtsError::UnsupportedFormat(format!(
                "{} (resumes must be PDF or DOCX)",
                path.display()
            )));
        }

        self.extract_file(path, file_type).await
    }

    pub async fn read_job_description(&self, path: &Path) -> Result<String> {
        let file_type = FileType::from_path(path);
        if !file_type.is_job_description_format() {
            return Err(AtsError::UnsupportedFormat(format!(
                "{} (job descriptions must be TXT or MD)",
                path.display()
            )));
        }

        self.extract_file(path, file_type).await
    }

    /// Extract any supported file, used by the `extract` command.
    pub async fn extract_any(&self, path: &Path) -> Result<String> {
        match FileType::from_path(path) {
            FileType::Unknown => Err(AtsError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            ))),
            file_type => self.extract_file(path, file_type).await,
        }
    }

    async fn extract_file(&self, path: &Path, file_type: FileType) -> Result<String> {
        if !path.exists() {
            return Err(AtsError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        info!("Extracting text from {:?} file: {}", file_type, path.display());
        let bytes = fs::read(path).await?;

        match Self::extract_bytes(&bytes, file_type) {
            Ok(text) => {
                info!("Extracted {} characters from {}", text.len(), path.display());
                Ok(text)
            }
            Err(e) => {
                error!("Error reading {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    /// Route bytes of a declared format to its extractor. Blank output counts
    /// as a failed extraction.
    pub fn extract_bytes(bytes: &[u8], file_type: FileType) -> Result<String> {
        let text = match file_type {
            FileType::Pdf => PdfExtractor.extract(bytes)?,
            FileType::Docx => DocxExtractor.extract(bytes)?,
            FileType::Text => PlainTextExtractor.extract(bytes)?,
            FileType::Markdown => MarkdownExtractor.extract(bytes)?,
            FileType::Unknown => {
                return Err(AtsError::UnsupportedFormat("unknown file type".to_string()));
            }
        };

        if text.trim().is_empty() {
            return Err(AtsError::ExtractionFailure(format!(
                "no text could be extracted from the {:?} document",
                file_type
            )));
        }

        Ok(text)
    }
}
