//! Integration tests for the ATS analyzer

use ats_analyzer::config::{Config, OutputFormat};
use ats_analyzer::error::{AtsError, Result};
use ats_analyzer::input::InputManager;
use ats_analyzer::llm::analyzer::parse_model_output;
use ats_analyzer::llm::{ResumeAnalyzer, TextGenerator};
use ats_analyzer::output::report::AnalysisReport;
use ats_analyzer::output::status;
use ats_analyzer::output::ReportGenerator;
use ats_analyzer::processing::{AnalysisResult, ScoreBand};
use ats_analyzer::session::{AnalysisSession, BlockReason, Readiness};
use docx_rs::{Docx, Paragraph, Run};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const FIXTURE: &str = include_str!("fixtures/analysis_response.json");

/// Stands in for the hosted model.
struct StubGenerator {
    reply: String,
}

impl StubGenerator {
    fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.reply.clone())
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

fn write_pdf(dir: &Path, pages: &[&str]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids = Vec::new();
    for text in pages {
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join("resume.pdf");
    doc.save(&path).unwrap();
    path
}

fn write_docx(dir: &Path, paragraphs: &[&str]) -> PathBuf {
    let path = dir.join("resume.docx");
    let file = std::fs::File::create(&path).unwrap();
    let mut docx = Docx::new();
    for text in paragraphs {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
    }
    docx.build().pack(file).unwrap();
    path
}

fn render(result_json: &str, format: OutputFormat) -> String {
    let result = parse_model_output(result_json).unwrap();
    let outcome = ats_analyzer::llm::AnalysisOutcome {
        result,
        issues: vec![],
        model_used: "stub".to_string(),
        processing_time_ms: 5,
    };
    let report = AnalysisReport::new(outcome, "resume.pdf", "job.md");
    ReportGenerator::with_options(false, false)
        .generate_report(&report, &format)
        .unwrap()
}

fn assert_in_order(haystack: &str, needles: &[String]) {
    let mut last = 0;
    for needle in needles {
        let position = haystack[last..]
            .find(needle.as_str())
            .unwrap_or_else(|| panic!("'{}' missing or out of order", needle));
        last += position + needle.len();
    }
}

#[tokio::test]
async fn test_pdf_pages_are_extracted_in_order() {
    let dir = tempdir().unwrap();
    let path = write_pdf(dir.path(), &["Jane Doe", "Rust engineer"]);

    let text = InputManager::new().extract_resume(&path).await.unwrap();

    assert_eq!(text, "Jane Doe\nRust engineer\n");
}

#[tokio::test]
async fn test_docx_paragraphs_joined_with_newlines() {
    let dir = tempdir().unwrap();
    let path = write_docx(dir.path(), &["A", "B", "C"]);

    let text = InputManager::new().extract_resume(&path).await.unwrap();
    assert_eq!(text, "A\nB\nC\n");
}

#[tokio::test]
async fn test_job_description_markdown_is_flattened() {
    let text = InputManager::new()
        .read_job_description(Path::new("tests/fixtures/job_description.md"))
        .await
        .unwrap();

    assert!(text.contains("Senior Data Engineer"));
    assert!(text.contains("Kafka"));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_unsupported_resume_blocks_session() {
    let mut session = AnalysisSession::new();
    session.set_job_description("Senior Data Engineer");

    let loaded = session
        .load_resume(&InputManager::new(), Path::new("tests/fixtures/job_description.md"))
        .await;
    assert!(matches!(loaded, Err(AtsError::UnsupportedFormat(_))));
    assert_eq!(status::resume_notice(&loaded).message, status::RESUME_UNSUPPORTED);

    match session.readiness() {
        Readiness::Blocked(reasons) => {
            assert!(matches!(reasons[0], BlockReason::ResumeNotParsed(_)));
            let notices = status::blocked_notices(&reasons);
            assert_eq!(notices.last().unwrap().message, status::INPUTS_REQUIRED);
        }
        Readiness::Ready(_) => panic!("session must stay blocked"),
    }
}

#[tokio::test]
async fn test_unreadable_job_description_blocks_session() {
    let manager = InputManager::new();
    let read = manager
        .read_job_description(Path::new("tests/fixtures/no_such_job.txt"))
        .await;
    let err = read.unwrap_err();
    assert_eq!(status::job_description_notice(&err).message, status::JOB_DESCRIPTION_UNREADABLE);

    let dir = tempdir().unwrap();
    let mut session = AnalysisSession::new();
    session
        .load_resume(&manager, &write_docx(dir.path(), &["Jane Doe"]))
        .await
        .unwrap();

    let Readiness::Blocked(reasons) = session.readiness() else {
        panic!("session must stay blocked without a job description");
    };
    assert_eq!(reasons, vec![BlockReason::MissingJobDescription]);
    let notices = status::blocked_notices(&reasons);
    assert_eq!(notices.last().unwrap().message, status::INPUTS_REQUIRED);
}

#[tokio::test]
async fn test_empty_resume_blocks_session() {
    let dir = tempdir().unwrap();
    let path = write_docx(dir.path(), &[]);

    let mut session = AnalysisSession::new();
    session.set_job_description("Senior Data Engineer");
    let loaded = session.load_resume(&InputManager::new(), &path).await;

    assert!(matches!(loaded, Err(AtsError::ExtractionFailure(_))));
    assert_eq!(status::resume_notice(&loaded).message, status::RESUME_PARSE_FAILED);
    assert!(!session.can_analyze());
}

#[tokio::test]
async fn test_score_bands_from_stubbed_model() {
    let dir = tempdir().unwrap();
    let path = write_docx(dir.path(), &["Jane Doe", "Python and SQL at Acme"]);

    let mut session = AnalysisSession::new();
    session.set_job_description("Senior Data Engineer with Python");
    session.load_resume(&InputManager::new(), &path).await.unwrap();
    let Readiness::Ready(request) = session.readiness() else {
        panic!("session should be ready");
    };

    for (score, band) in [
        (85, ScoreBand::Excellent),
        (65, ScoreBand::Good),
        (40, ScoreBand::NeedsImprovement),
    ] {
        let reply = format!(r#"{{"match_score": {}, "feedback": {{}}}}"#, score);
        let analyzer = ResumeAnalyzer::new(StubGenerator::new(reply), &Config::default());
        let outcome = analyzer.analyze(&request).await.unwrap();

        let report = AnalysisReport::new(outcome, path.display().to_string(), "inline text");
        assert_eq!(report.score_band, band);

        let console = ReportGenerator::with_options(false, false)
            .generate_report(&report, &OutputFormat::Console)
            .unwrap();
        assert!(console.contains(band.message()));
    }
}

#[tokio::test]
async fn test_invalid_json_shows_generic_failure() {
    let analyzer = ResumeAnalyzer::new(
        StubGenerator::new(r#"{"match_score": 85, "feedback": {"keywo"#),
        &Config::default(),
    );
    let request = ats_analyzer::processing::AnalysisRequest::new("job", "resume").unwrap();

    let err = analyzer.analyze(&request).await.unwrap_err();
    let notices = status::analysis_failure_notices(&err);
    assert_eq!(notices[0].message, status::ANALYSIS_FAILED);
}

#[test]
fn test_fixture_renders_every_field_in_order() {
    let result: AnalysisResult = parse_model_output(FIXTURE).unwrap();
    let feedback = &result.feedback;
    let markdown = render(FIXTURE, OutputFormat::Markdown);

    let mut sections = vec![feedback.overall_summary.clone().unwrap()];
    sections.push(format!("**`{}`**", feedback.keywords.found[0]));
    sections.push(feedback.keywords.suggestions.clone().unwrap());
    sections.extend(feedback.formatting_suggestions.iter().map(|s| format!("- {}", s)));
    sections.push(feedback.additional_tips.clone().unwrap());
    assert_in_order(&markdown, &sections);

    let found: Vec<String> = feedback.keywords.found.iter().map(|k| format!("**`{}`**", k)).collect();
    let missing: Vec<String> = feedback.keywords.missing.iter().map(|k| format!("**`{}`**", k)).collect();
    assert_in_order(&markdown, &found);
    assert_in_order(&markdown, &missing);

    let console = render(FIXTURE, OutputFormat::Console);
    let found: Vec<String> = feedback.keywords.found.iter().map(|k| format!("• {}", k)).collect();
    let missing: Vec<String> = feedback.keywords.missing.iter().map(|k| format!("• {}", k)).collect();
    assert_in_order(&console, &found);
    assert_in_order(&console, &missing);
    assert!(console.contains("Overall Match: 72% [GOOD]"));
}

#[test]
fn test_fixture_survives_json_output() {
    let original = parse_model_output(FIXTURE).unwrap();
    let json = render(FIXTURE, OutputFormat::Json);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let reparsed: AnalysisResult = serde_json::from_value(value["result"].clone()).unwrap();
    assert_eq!(reparsed, original);
}
