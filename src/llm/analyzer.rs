//! Prompt/response orchestration: one prompt, one model call, one parse

use crate::config::Config;
use crate::error::{AtsError, Result};
use crate::llm::client::TextGenerator;
use crate::llm::prompts::{PromptParams, PromptTemplates};
use crate::processing::consistency::{ConsistencyChecker, ConsistencyIssue};
use crate::processing::result::{AnalysisRequest, AnalysisResult};
use log::{error, info};
use std::time::Instant;

/// Everything produced by a successful analysis call.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub issues: Vec<ConsistencyIssue>,
    pub model_used: String,
    pub processing_time_ms: u64,
}

pub struct ResumeAnalyzer<G> {
    generator: G,
    prompt_templates: PromptTemplates,
    keyword_limit: usize,
    summary_sentences: usize,
    max_summary_chars: usize,
    checker: Option<ConsistencyChecker>,
}

impl<G: TextGenerator> ResumeAnalyzer<G> {
    pub fn new(generator: G, config: &Config) -> Self {
        let checker = config
            .validation
            .enabled
            .then(|| ConsistencyChecker::new(config.model.keyword_limit, &config.validation));

        Self {
            generator,
            prompt_templates: PromptTemplates::default(),
            keyword_limit: config.model.keyword_limit,
            summary_sentences: config.validation.summary_sentences,
            max_summary_chars: config.validation.max_summary_chars,
            checker,
        }
    }

    pub fn build_prompt(&self, request: &AnalysisRequest) -> String {
        let params = PromptParams {
            job_description: request.job_description().to_string(),
            resume_text: request.resume_text().to_string(),
            keyword_limit: self.keyword_limit,
            summary_sentences: self.summary_sentences,
            max_summary_chars: self.max_summary_chars,
        };
        self.prompt_templates.render_ats_analysis(&params)
    }

    /// Run the analysis. Failures are logged here and returned as-is; there
    /// is no retry and no partial result.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome> {
        let start_time = Instant::now();
        let prompt = self.build_prompt(request);
        info!(
            "Requesting analysis from {} ({} prompt characters)",
            self.generator.model_name(),
            prompt.len()
        );

        let raw = self.generator.generate(&prompt).await.map_err(|e| {
            error!("Error calling model API: {}", e);
            e
        })?;

        let result = parse_model_output(&raw).map_err(|e| {
            if let AtsError::MalformedModelOutput { message, raw } = &e {
                error!("Error decoding JSON response from model: {}", message);
                error!("Raw model response: {}", raw);
            }
            e
        })?;

        let issues = match &self.checker {
            Some(checker) => checker.check(&result, request.resume_text())?,
            None => Vec::new(),
        };

        let processing_time = start_time.elapsed();
        info!(
            "Analysis complete in {}ms, match score {:?}",
            processing_time.as_millis(),
            result.match_score
        );

        Ok(AnalysisOutcome {
            result,
            issues,
            model_used: self.generator.model_name().to_string(),
            processing_time_ms: processing_time.as_millis() as u64,
        })
    }
}

/// Parse model output into an [`AnalysisResult`]. Surrounding whitespace and
/// a Markdown code fence are tolerated; nothing else is repaired.
pub fn parse_model_output(raw: &str) -> Result<AnalysisResult> {
    let body = strip_code_fence(raw.trim());
    serde_json::from_str(body).map_err(|e| AtsError::MalformedModelOutput {
        message: e.to_string(),
        raw: raw.to_string(),
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening fence line
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::result::ScoreBand;
    use std::sync::Mutex;

    struct CannedGenerator {
        reply: Result<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedGenerator {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for CannedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(AtsError::ModelInvocation(e.to_string())),
            }
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::new("Python developer with AWS", "Jane Doe. Python at Acme.").unwrap()
    }

    #[tokio::test]
    async fn test_single_call_with_both_inputs() {
        let generator = CannedGenerator::replying(r#"{"match_score": 85, "feedback": {}}"#);
        let analyzer = ResumeAnalyzer::new(generator, &Config::default());

        let outcome = analyzer.analyze(&request()).await.unwrap();
        assert_eq!(outcome.result.score_band(), ScoreBand::Excellent);
        assert_eq!(outcome.model_used, "canned");

        let prompts = analyzer.generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Python developer with AWS"));
        assert!(prompts[0].contains("Jane Doe. Python at Acme."));
    }

    #[tokio::test]
    async fn test_truncated_json_is_malformed() {
        let generator = CannedGenerator::replying(r#"{"match_score": 85, "feedback": {"overall_summ"#);
        let analyzer = ResumeAnalyzer::new(generator, &Config::default());

        let err = analyzer.analyze(&request()).await.unwrap_err();
        match err {
            AtsError::MalformedModelOutput { raw, .. } => assert!(raw.contains("overall_summ")),
            other => panic!("expected malformed output, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let generator = CannedGenerator {
            reply: Err(AtsError::ModelInvocation("quota exceeded".to_string())),
            prompts: Mutex::new(Vec::new()),
        };
        let analyzer = ResumeAnalyzer::new(generator, &Config::default());

        let err = analyzer.analyze(&request()).await.unwrap_err();
        assert!(matches!(err, AtsError::ModelInvocation(ref m) if m.contains("quota exceeded")));
    }

    #[tokio::test]
    async fn test_contract_violations_pass_through() {
        let generator = CannedGenerator::replying(
            r#"{"match_score": 130, "feedback": {"keywords": {"found": [], "missing": ["Python"]}}}"#,
        );
        let analyzer = ResumeAnalyzer::new(generator, &Config::default());

        let outcome = analyzer.analyze(&request()).await.unwrap();
        assert_eq!(outcome.result.match_score, Some(130));
        assert_eq!(outcome.result.feedback.keywords.missing, vec!["Python".to_string()]);
        assert!(outcome.issues.contains(&ConsistencyIssue::ScoreOutOfRange { score: 130 }));
        assert!(outcome.issues.contains(&ConsistencyIssue::MissingKeywordInResume {
            keyword: "Python".to_string()
        }));
    }

    #[tokio::test]
    async fn test_checks_can_be_disabled() {
        let mut config = Config::default();
        config.validation.enabled = false;
        let analyzer = ResumeAnalyzer::new(CannedGenerator::replying(r#"{"match_score": 130}"#), &config);

        let outcome = analyzer.analyze(&request()).await.unwrap();
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_code_fence_is_tolerated() {
        let fenced = "```json\n{\"match_score\": 65}\n```\n";
        assert_eq!(parse_model_output(fenced).unwrap().match_score, Some(65));

        let bare_fence = "```{\"match_score\": 40}```";
        assert_eq!(parse_model_output(bare_fence).unwrap().match_score, Some(40));
    }

    #[test]
    fn test_single_string_suggestion_is_not_malformed() {
        let raw = r#"{"match_score": 70, "feedback": {"formatting_suggestions": "Use one column."}}"#;
        let result = parse_model_output(raw).unwrap();
        assert_eq!(result.feedback.formatting_suggestions, vec!["Use one column.".to_string()]);
    }

    #[test]
    fn test_non_json_is_malformed() {
        let err = parse_model_output("I'm sorry, I can't help with that.").unwrap_err();
        assert!(matches!(err, AtsError::MalformedModelOutput { .. }));
    }
}
