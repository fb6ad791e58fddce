//! LLM integration module

pub mod client;
pub mod prompts;
pub mod analyzer;

pub use analyzer::{AnalysisOutcome, ResumeAnalyzer};
pub use client::{ApiCredential, GeminiClient, GenerationSettings, TextGenerator};
