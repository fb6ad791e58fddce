//! User-facing status notices shown around the analysis

use crate::error::{AtsError, ErrorKind};
use crate::session::BlockReason;
use colored::{Color, Colorize};

pub const RESUME_PARSED: &str = "Resume uploaded and parsed successfully!";
pub const RESUME_PARSE_FAILED: &str = "Could not parse resume. Please try a different file or format.";
pub const RESUME_UNSUPPORTED: &str = "Unsupported resume format. Please upload a PDF or DOCX file.";
pub const RESUME_REQUIRED: &str = "Please upload your resume to proceed.";
pub const INPUTS_REQUIRED: &str =
    "Please provide both a job description and upload your resume to start the analysis.";
pub const JOB_DESCRIPTION_UNSUPPORTED: &str =
    "Unsupported job description format. Please provide a TXT or MD file.";
pub const JOB_DESCRIPTION_UNREADABLE: &str =
    "Could not read the job description. Please check the file and try again.";
pub const ANALYZING: &str = "Analyzing your resume... This may take a moment.";
pub const ANALYSIS_COMPLETE: &str = "Analysis Complete!";
pub const ANALYSIS_FAILED: &str =
    "Failed to get analysis from the model. Please check your inputs and API key.";
pub const ANALYSIS_FAILED_HINT: &str =
    "If the issue persists, run with --verbose and check the log output for more specific error messages from the model API.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Notice for the outcome of loading the resume.
pub fn resume_notice(outcome: &Result<(), AtsError>) -> Notice {
    match outcome {
        Ok(()) => Notice::new(NoticeLevel::Success, RESUME_PARSED),
        Err(e) if e.kind() == ErrorKind::UnsupportedFormat => Notice::new(NoticeLevel::Error, RESUME_UNSUPPORTED),
        Err(_) => Notice::new(NoticeLevel::Error, RESUME_PARSE_FAILED),
    }
}

/// Notice for a job description that could not be read.
pub fn job_description_notice(error: &AtsError) -> Notice {
    match error.kind() {
        ErrorKind::UnsupportedFormat => Notice::new(NoticeLevel::Error, JOB_DESCRIPTION_UNSUPPORTED),
        _ => Notice::new(NoticeLevel::Error, JOB_DESCRIPTION_UNREADABLE),
    }
}

pub fn blocked_notices(reasons: &[BlockReason]) -> Vec<Notice> {
    let mut notices = Vec::new();
    if reasons.contains(&BlockReason::MissingResume) {
        notices.push(Notice::new(NoticeLevel::Info, RESUME_REQUIRED));
    }
    notices.push(Notice::new(NoticeLevel::Warning, INPUTS_REQUIRED));
    notices
}

/// Model invocation and malformed output share one generic message; the
/// specifics only go to the log.
pub fn analysis_failure_notices(error: &AtsError) -> Vec<Notice> {
    match error.kind() {
        ErrorKind::ModelInvocationFailure | ErrorKind::MalformedModelOutput => vec![
            Notice::new(NoticeLevel::Error, ANALYSIS_FAILED),
            Notice::new(NoticeLevel::Info, ANALYSIS_FAILED_HINT),
        ],
        ErrorKind::UnsupportedFormat => vec![Notice::new(NoticeLevel::Error, RESUME_UNSUPPORTED)],
        ErrorKind::ExtractionFailure => vec![Notice::new(NoticeLevel::Error, RESUME_PARSE_FAILED)],
        ErrorKind::Other => vec![Notice::new(NoticeLevel::Error, error.to_string())],
    }
}

/// Prints notices to stderr so stdout only carries the report.
pub struct StatusPrinter {
    use_colors: bool,
}

impl StatusPrinter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    pub fn format(&self, notice: &Notice) -> String {
        let (icon, color) = match notice.level {
            NoticeLevel::Success => ("✅", Color::Green),
            NoticeLevel::Info => ("ℹ️ ", Color::Blue),
            NoticeLevel::Warning => ("⚠️ ", Color::Yellow),
            NoticeLevel::Error => ("❌", Color::Red),
        };

        if self.use_colors {
            format!("{} {}", icon, notice.message.color(color))
        } else {
            format!("{} {}", icon, notice.message)
        }
    }

    pub fn print(&self, notice: &Notice) {
        eprintln!("{}", self.format(notice));
    }

    pub fn print_all(&self, notices: &[Notice]) {
        for notice in notices {
            self.print(notice);
        }
    }
}
