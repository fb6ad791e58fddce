//! Request and result types exchanged with the model

use crate::error::{AtsError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Inputs for a single analysis. Built only through [`AnalysisRequest::new`],
/// so both texts are guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    job_description: String,
    resume_text: String,
}

impl AnalysisRequest {
    pub fn new(job_description: impl Into<String>, resume_text: impl Into<String>) -> Result<Self> {
        let job_description = job_description.into();
        let resume_text = resume_text.into();

        if job_description.trim().is_empty() {
            return Err(AtsError::InvalidInput("job description is empty".to_string()));
        }
        if resume_text.trim().is_empty() {
            return Err(AtsError::InvalidInput("resume text is empty".to_string()));
        }

        Ok(Self { job_description, resume_text })
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }
}

/// Structured analysis as returned by the model. Field names follow the
/// JSON the model is asked to produce; every field is optional on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient_score")]
    pub match_score: Option<i64>,
    #[serde(default)]
    pub feedback: Feedback,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default, deserialize_with = "lenient_text")]
    pub overall_summary: Option<String>,
    #[serde(default)]
    pub keywords: KeywordFeedback,
    #[serde(default, deserialize_with = "lenient_list")]
    pub formatting_suggestions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub additional_tips: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordFeedback {
    #[serde(default, deserialize_with = "lenient_list")]
    pub found: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub missing: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub suggestions: Option<String>,
}

impl AnalysisResult {
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.match_score)
    }

    pub fn keyword_total(&self) -> usize {
        self.feedback.keywords.found.len() + self.feedback.keywords.missing.len()
    }
}

/// Qualitative banding of the match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsImprovement,
    Unknown,
}

impl ScoreBand {
    pub fn from_score(score: Option<i64>) -> Self {
        match score {
            Some(s) if s >= 80 => ScoreBand::Excellent,
            Some(s) if s >= 60 => ScoreBand::Good,
            Some(_) => ScoreBand::NeedsImprovement,
            None => ScoreBand::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Good => "good",
            ScoreBand::NeedsImprovement => "needs improvement",
            ScoreBand::Unknown => "unknown",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => {
                "Excellent alignment! Your resume is highly compatible with this job description."
            }
            ScoreBand::Good => {
                "Good alignment, but there's room for improvement to boost your ATS score."
            }
            ScoreBand::NeedsImprovement => {
                "Your resume needs significant improvements for this job description's ATS compatibility."
            }
            ScoreBand::Unknown => "Match score could not be determined.",
        }
    }
}

/// Accepts integers, floats (rounded) and numeric strings. Anything else,
/// including "N/A", is treated as an unknown score.
fn lenient_score<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Some(Value::String(s)) => {
            let trimmed = s.trim().trim_end_matches('%').trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    })
}

/// Accepts a string or a list of strings (joined with newlines).
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Array(items)) => {
            let parts = items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(serde::de::Error::custom(format!(
                        "expected a string list item, found {}",
                        other
                    ))),
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(Some(parts.join("\n")))
        }
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected text or a list of text, found {}",
            other
        ))),
    }
}

/// Accepts a list of strings, a single string (one item) or null (empty).
fn lenient_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s]),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(serde::de::Error::custom(format!(
                    "expected a string list item, found {}",
                    other
                ))),
            })
            .collect(),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a list of text, found {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_requires_both_inputs() {
        assert!(AnalysisRequest::new("Rust developer", "Jane Doe, Rust").is_ok());
        assert!(AnalysisRequest::new("   ", "Jane Doe").is_err());
        assert!(AnalysisRequest::new("Rust developer", "\n").is_err());
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(Some(85)), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(Some(80)), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(Some(65)), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(Some(60)), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(Some(40)), ScoreBand::NeedsImprovement);
        assert_eq!(ScoreBand::from_score(None), ScoreBand::Unknown);
    }

    #[test]
    fn test_missing_fields_default() {
        let result: AnalysisResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result.match_score, None);
        assert_eq!(result.feedback.overall_summary, None);
        assert!(result.feedback.keywords.found.is_empty());
        assert_eq!(result.score_band(), ScoreBand::Unknown);
    }

    #[test]
    fn test_list_fields_accept_a_single_string_or_null() {
        let json = r#"{"match_score": 70, "feedback": {
            "formatting_suggestions": "Use one column.",
            "keywords": {"found": "Python", "missing": null}
        }}"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.feedback.formatting_suggestions, vec!["Use one column.".to_string()]);
        assert_eq!(result.feedback.keywords.found, vec!["Python".to_string()]);
        assert!(result.feedback.keywords.missing.is_empty());
    }

    #[test]
    fn test_list_fields_reject_objects() {
        let json = r#"{"feedback": {"formatting_suggestions": {"tip": "x"}}}"#;
        assert!(serde_json::from_str::<AnalysisResult>(json).is_err());
    }

    #[test]
    fn test_lenient_score_forms() {
        let parse = |json: &str| serde_json::from_str::<AnalysisResult>(json).unwrap().match_score;
        assert_eq!(parse(r#"{"match_score": 72}"#), Some(72));
        assert_eq!(parse(r#"{"match_score": 72.6}"#), Some(73));
        assert_eq!(parse(r#"{"match_score": "64%"}"#), Some(64));
        assert_eq!(parse(r#"{"match_score": "N/A"}"#), None);
        assert_eq!(parse(r#"{"match_score": null}"#), None);
        assert_eq!(parse(r#"{"match_score": 140}"#), Some(140));
    }

    #[test]
    fn test_text_fields_accept_lists() {
        let json = r#"{"feedback": {"additional_tips": ["Tailor the summary.", "Add a portfolio link."]}}"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(
            result.feedback.additional_tips.as_deref(),
            Some("Tailor the summary.\nAdd a portfolio link.")
        );
    }

    #[test]
    fn test_text_fields_reject_objects() {
        let json = r#"{"feedback": {"overall_summary": {"text": "nested"}}}"#;
        assert!(serde_json::from_str::<AnalysisResult>(json).is_err());
    }
}
