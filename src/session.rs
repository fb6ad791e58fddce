//! Per-session input state for one analysis action

use crate::error::Result;
use crate::input::InputManager;
use crate::processing::result::AnalysisRequest;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeState {
    NotProvided,
    Parsed { file: PathBuf, text: String },
    Failed { file: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    MissingJobDescription,
    MissingResume,
    ResumeNotParsed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready(AnalysisRequest),
    Blocked(Vec<BlockReason>),
}

/// Collects the job description and resume. The analysis action is only
/// available once both are present and the resume parsed to non-empty text.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    job_description: Option<String>,
    resume: ResumeState,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self {
            job_description: None,
            resume: ResumeState::NotProvided,
        }
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.job_description = (!text.trim().is_empty()).then_some(text);
    }

    pub fn job_description(&self) -> Option<&str> {
        self.job_description.as_deref()
    }

    pub fn resume(&self) -> &ResumeState {
        &self.resume
    }

    /// Extract the resume and record the outcome. The error is returned as
    /// well so the caller can show it; the session stays blocked either way.
    pub async fn load_resume(&mut self, manager: &InputManager, path: &Path) -> Result<()> {
        match manager.extract_resume(path).await {
            Ok(text) => {
                self.resume = ResumeState::Parsed {
                    file: path.to_path_buf(),
                    text,
                };
                Ok(())
            }
            Err(e) => {
                self.resume = ResumeState::Failed {
                    file: path.to_path_buf(),
                    reason: e.to_string(),
                };
                Err(e)
            }
        }
    }

    pub fn readiness(&self) -> Readiness {
        let mut reasons = Vec::new();

        if self.job_description.is_none() {
            reasons.push(BlockReason::MissingJobDescription);
        }

        let resume_text = match &self.resume {
            ResumeState::Parsed { text, .. } => Some(text.as_str()),
            ResumeState::NotProvided => {
                reasons.push(BlockReason::MissingResume);
                None
            }
            ResumeState::Failed { reason, .. } => {
                reasons.push(BlockReason::ResumeNotParsed(reason.clone()));
                None
            }
        };

        match (self.job_description.as_deref(), resume_text) {
            (Some(job), Some(resume)) if reasons.is_empty() => {
                match AnalysisRequest::new(job, resume) {
                    Ok(request) => Readiness::Ready(request),
                    Err(e) => Readiness::Blocked(vec![BlockReason::ResumeNotParsed(e.to_string())]),
                }
            }
            _ => Readiness::Blocked(reasons),
        }
    }

    pub fn can_analyze(&self) -> bool {
        matches!(self.readiness(), Readiness::Ready(_))
    }
}
