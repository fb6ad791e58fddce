//! Analysis data model and post-parse checks

pub mod result;
pub mod consistency;

pub use result::{AnalysisRequest, AnalysisResult, Feedback, KeywordFeedback, ScoreBand};
