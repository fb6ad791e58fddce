//! Report structure handed to the formatters

use crate::llm::analyzer::AnalysisOutcome;
use crate::processing::consistency::ConsistencyIssue;
use crate::processing::result::{AnalysisResult, ScoreBand};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const NO_SUMMARY: &str = "No overall summary provided.";
pub const NO_FOUND_KEYWORDS: &str =
    "No specific keywords identified as found. This might indicate low relevance.";
pub const NO_MISSING_KEYWORDS: &str =
    "Great! All key keywords from the job description appear to be present or semantically covered.";
pub const NO_KEYWORD_SUGGESTIONS: &str = "No specific keyword suggestions provided.";
pub const NO_FORMATTING_SUGGESTIONS: &str =
    "Your resume formatting appears to be generally good for ATS compatibility.";
pub const NO_ADDITIONAL_TIPS: &str = "No additional tips provided.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,

    /// Band derived from the score at report time
    pub score_band: ScoreBand,

    /// Contract violations noticed in the model output. Informational only.
    pub consistency_notes: Vec<ConsistencyIssue>,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub analyzer_version: String,
    pub resume_file: String,
    pub job_source: String,
    pub model_used: String,
    pub processing_time_ms: u64,
}

impl AnalysisReport {
    pub fn new(outcome: AnalysisOutcome, resume_file: impl Into<String>, job_source: impl Into<String>) -> Self {
        let score_band = outcome.result.score_band();
        Self {
            result: outcome.result,
            score_band,
            consistency_notes: outcome.issues,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                analyzer_version: env!("CARGO_PKG_VERSION").to_string(),
                resume_file: resume_file.into(),
                job_source: job_source.into(),
                model_used: outcome.model_used,
                processing_time_ms: outcome.processing_time_ms,
            },
        }
    }

    pub fn score_display(&self) -> String {
        match self.result.match_score {
            Some(score) => format!("{}%", score),
            None => "N/A".to_string(),
        }
    }

    pub fn summary(&self) -> &str {
        self.result.feedback.overall_summary.as_deref().unwrap_or(NO_SUMMARY)
    }

    pub fn found_keywords(&self) -> &[String] {
        &self.result.feedback.keywords.found
    }

    pub fn missing_keywords(&self) -> &[String] {
        &self.result.feedback.keywords.missing
    }

    pub fn keyword_suggestions(&self) -> &str {
        self.result
            .feedback
            .keywords
            .suggestions
            .as_deref()
            .unwrap_or(NO_KEYWORD_SUGGESTIONS)
    }

    pub fn formatting_suggestions(&self) -> &[String] {
        &self.result.feedback.formatting_suggestions
    }

    pub fn additional_tips(&self) -> &str {
        self.result
            .feedback
            .additional_tips
            .as_deref()
            .unwrap_or(NO_ADDITIONAL_TIPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(result: AnalysisResult) -> AnalysisOutcome {
        AnalysisOutcome {
            result,
            issues: vec![],
            model_used: "gemini-1.5-flash".to_string(),
            processing_time_ms: 1200,
        }
    }

    #[test]
    fn test_placeholders_for_empty_result() {
        let report = AnalysisReport::new(outcome(AnalysisResult::default()), "cv.pdf", "job.txt");

        assert_eq!(report.score_display(), "N/A");
        assert_eq!(report.score_band, ScoreBand::Unknown);
        assert_eq!(report.summary(), NO_SUMMARY);
        assert_eq!(report.keyword_suggestions(), NO_KEYWORD_SUGGESTIONS);
        assert_eq!(report.additional_tips(), NO_ADDITIONAL_TIPS);
        assert!(report.found_keywords().is_empty());
    }

    #[test]
    fn test_band_follows_score() {
        let result = AnalysisResult {
            match_score: Some(65),
            ..AnalysisResult::default()
        };
        let report = AnalysisReport::new(outcome(result), "cv.docx", "inline");

        assert_eq!(report.score_band, ScoreBand::Good);
        assert_eq!(report.score_display(), "65%");
        assert_eq!(report.metadata.model_used, "gemini-1.5-flash");
    }
}
