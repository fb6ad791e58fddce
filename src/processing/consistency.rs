//! Consistency checks on model output.
//!
//! The model is asked to respect a handful of counting and partitioning rules
//! that nothing on its side enforces. These checks report violations so the
//! user can see them; the result itself is always passed through untouched.

use crate::config::ValidationConfig;
use crate::error::{AtsError, Result};
use crate::processing::result::AnalysisResult;
use aho_corasick::AhoCorasick;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ConsistencyIssue {
    ScoreMissing,
    ScoreOutOfRange { score: i64 },
    TooManyKeywords { total: usize, limit: usize },
    KeywordInBothLists { keyword: String },
    DuplicateKeyword { keyword: String },
    MissingKeywordInResume { keyword: String },
    SummarySentenceCount { expected: usize, actual: usize },
    SummaryTooLong { limit: usize, actual: usize },
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyIssue::ScoreMissing => write!(f, "The model did not return a match score"),
            ConsistencyIssue::ScoreOutOfRange { score } => {
                write!(f, "Match score {} is outside the 0-100 range", score)
            }
            ConsistencyIssue::TooManyKeywords { total, limit } => write!(
                f,
                "{} keywords were classified but at most {} were requested",
                total, limit
            ),
            ConsistencyIssue::KeywordInBothLists { keyword } => {
                write!(f, "'{}' is listed as both found and missing", keyword)
            }
            ConsistencyIssue::DuplicateKeyword { keyword } => {
                write!(f, "'{}' is listed more than once", keyword)
            }
            ConsistencyIssue::MissingKeywordInResume { keyword } => {
                write!(f, "'{}' is listed as missing but appears in the resume", keyword)
            }
            ConsistencyIssue::SummarySentenceCount { expected, actual } => write!(
                f,
                "Overall summary has {} sentences, {} were requested",
                actual, expected
            ),
            ConsistencyIssue::SummaryTooLong { limit, actual } => write!(
                f,
                "Overall summary is {} characters long, the limit is {}",
                actual, limit
            ),
        }
    }
}

pub struct ConsistencyChecker {
    keyword_limit: usize,
    summary_sentences: usize,
    max_summary_chars: usize,
}

impl ConsistencyChecker {
    pub fn new(keyword_limit: usize, validation: &ValidationConfig) -> Self {
        Self {
            keyword_limit,
            summary_sentences: validation.summary_sentences,
            max_summary_chars: validation.max_summary_chars,
        }
    }

    pub fn check(&self, result: &AnalysisResult, resume_text: &str) -> Result<Vec<ConsistencyIssue>> {
        let mut issues = Vec::new();

        match result.match_score {
            None => issues.push(ConsistencyIssue::ScoreMissing),
            Some(score) if !(0..=100).contains(&score) => {
                issues.push(ConsistencyIssue::ScoreOutOfRange { score })
            }
            Some(_) => {}
        }

        let total = result.keyword_total();
        if total > self.keyword_limit {
            issues.push(ConsistencyIssue::TooManyKeywords {
                total,
                limit: self.keyword_limit,
            });
        }

        issues.extend(self.check_partition(result));

        for keyword in self.missing_keywords_present(&result.feedback.keywords.missing, resume_text)? {
            issues.push(ConsistencyIssue::MissingKeywordInResume { keyword });
        }

        if let Some(summary) = &result.feedback.overall_summary {
            let sentences = summary
                .unicode_sentences()
                .filter(|s| !s.trim().is_empty())
                .count();
            if sentences != self.summary_sentences {
                issues.push(ConsistencyIssue::SummarySentenceCount {
                    expected: self.summary_sentences,
                    actual: sentences,
                });
            }

            let chars = summary.chars().count();
            if chars > self.max_summary_chars {
                issues.push(ConsistencyIssue::SummaryTooLong {
                    limit: self.max_summary_chars,
                    actual: chars,
                });
            }
        }

        for issue in &issues {
            warn!("Model output consistency: {}", issue);
        }

        Ok(issues)
    }

    fn check_partition(&self, result: &AnalysisResult) -> Vec<ConsistencyIssue> {
        let mut issues = Vec::new();
        let keywords = &result.feedback.keywords;

        let mut found_seen = HashSet::new();
        for keyword in &keywords.found {
            if !found_seen.insert(normalize(keyword)) {
                issues.push(ConsistencyIssue::DuplicateKeyword { keyword: keyword.clone() });
            }
        }

        let mut missing_seen = HashSet::new();
        for keyword in &keywords.missing {
            let key = normalize(keyword);
            if found_seen.contains(&key) {
                issues.push(ConsistencyIssue::KeywordInBothLists { keyword: keyword.clone() });
            } else if !missing_seen.insert(key) {
                issues.push(ConsistencyIssue::DuplicateKeyword { keyword: keyword.clone() });
            }
        }

        issues
    }

    /// Missing keywords that occur in the resume as whole words, ignoring
    /// ASCII case. Returned in the order they were listed.
    fn missing_keywords_present(&self, missing: &[String], resume_text: &str) -> Result<Vec<String>> {
        let patterns: Vec<&str> = missing
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();
        if patterns.is_empty() {
            return Ok(Vec::new());
        }

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&patterns)
            .map_err(|e| AtsError::InvalidInput(format!("Failed to build keyword matcher: {}", e)))?;

        let mut present = vec![false; patterns.len()];
        for m in matcher.find_overlapping_iter(resume_text) {
            if is_word_boundary(resume_text, m.start(), m.end()) {
                present[m.pattern().as_usize()] = true;
            }
        }

        Ok(patterns
            .iter()
            .zip(present)
            .filter(|(_, hit)| *hit)
            .map(|(keyword, _)| keyword.to_string())
            .collect())
    }
}

fn normalize(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.map_or(false, char::is_alphanumeric) && !after.map_or(false, char::is_alphanumeric)
}
