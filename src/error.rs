//! Error handling for the ATS analyzer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Text extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("API key not found in environment variable {0}")]
    MissingCredential(String),

    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    #[error("Malformed model output: {message}")]
    MalformedModelOutput { message: String, raw: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, AtsError>;

/// User-facing failure categories. Every category is terminal for the
/// current analysis action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedFormat,
    ExtractionFailure,
    ModelInvocationFailure,
    MalformedModelOutput,
    Other,
}

impl AtsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AtsError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            AtsError::ExtractionFailure(_) => ErrorKind::ExtractionFailure,
            AtsError::MissingCredential(_) | AtsError::ModelInvocation(_) => {
                ErrorKind::ModelInvocationFailure
            }
            AtsError::MalformedModelOutput { .. } => ErrorKind::MalformedModelOutput,
            _ => ErrorKind::Other,
        }
    }
}

impl From<reqwest::Error> for AtsError {
    fn from(err: reqwest::Error) -> Self {
        AtsError::ModelInvocation(err.to_string())
    }
}
