//! Output formatters: console, JSON, Markdown and HTML

use crate::config::OutputFormat;
use crate::error::{AtsError, Result};
use crate::output::report::*;
use crate::processing::result::ScoreBand;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
}

/// Console formatter with colors and side-by-side keyword columns
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Coordinates the formatters for each output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>ATS Resume Analysis</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container { background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        .header { text-align: center; margin-bottom: 30px; border-bottom: 3px solid #007acc; padding-bottom: 20px; }
        .section h2 { color: #007acc; border-bottom: 2px solid #e9ecef; padding-bottom: 10px; }
        .score { font-size: 2em; font-weight: bold; }
        .band { padding: 12px 16px; border-radius: 6px; }
        .band-excellent { background: #d4edda; color: #155724; }
        .band-good { background: #fff3cd; color: #856404; }
        .band-needs_improvement { background: #f8d7da; color: #721c24; }
        .band-unknown { background: #d1ecf1; color: #0c5460; }
        .keywords { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; }
        .keywords div { background: #f8f9fa; padding: 15px; border-radius: 6px; }
        .found { border-left: 4px solid #28a745; }
        .missing { border-left: 4px solid #dc3545; }
        .note { background: #e9ecef; padding: 15px; border-radius: 6px; }
        .metadata { background: #e9ecef; padding: 15px; border-radius: 6px; margin-top: 30px; font-size: 0.9em; color: #6c757d; }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>🚀 ATS Resume Analysis</h1>
            <p>Generated: {{ generated_at }} | Processing time: {{ processing_time }}ms</p>
        </div>

        <div class="section">
            <h2>🌟 ATS Match Score</h2>
            <p class="score">Overall Match: {{ score }}</p>
            <p class="band band-{{ band_class }}">{{ band_message }}</p>
        </div>

        <div class="section">
            <h2>📝 Overall Summary</h2>
            <p>{{ summary }}</p>
        </div>

        <div class="section">
            <h2>🔑 ATS Keyword Analysis</h2>
            <div class="keywords">
                <div class="found">
                    <h4>Keywords Found in Your Resume ✅</h4>
                    {% if found.is_empty() %}
                    <p>{{ no_found }}</p>
                    {% else %}
                    <ul>
                    {% for keyword in found %}
                        <li><strong><code>{{ keyword }}</code></strong></li>
                    {% endfor %}
                    </ul>
                    {% endif %}
                </div>
                <div class="missing">
                    <h4>Key Keywords to Add/Integrate ❌</h4>
                    {% if missing.is_empty() %}
                    <p>{{ no_missing }}</p>
                    {% else %}
                    <ul>
                    {% for keyword in missing %}
                        <li><strong><code>{{ keyword }}</code></strong></li>
                    {% endfor %}
                    </ul>
                    {% endif %}
                </div>
            </div>
            <h4>Suggestions for Integrating Missing Keywords:</h4>
            <p class="note">{{ keyword_suggestions }}</p>
        </div>

        <div class="section">
            <h2>💡 Formatting &amp; General Improvement Suggestions</h2>
            {% if formatting.is_empty() %}
            <p>{{ no_formatting }}</p>
            {% else %}
            <ul>
            {% for suggestion in formatting %}
                <li>{{ suggestion }}</li>
            {% endfor %}
            </ul>
            {% endif %}
        </div>

        <div class="section">
            <h2>✨ Additional Tips</h2>
            <p>{{ tips }}</p>
        </div>

        {% if !notes.is_empty() %}
        <div class="section">
            <h2>⚠️ Consistency Notes</h2>
            <ul>
            {% for note in notes %}
                <li>{{ note }}</li>
            {% endfor %}
            </ul>
        </div>
        {% endif %}

        <div class="metadata">
            <p><strong>ℹ️ Generated by ATS Analyzer v{{ version }}</strong></p>
            <p><strong>Model:</strong> {{ model }}</p>
            <p><strong>Resume:</strong> {{ resume_file }} | <strong>Job:</strong> {{ job_source }}</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    generated_at: String,
    processing_time: u64,
    score: String,
    band_class: String,
    band_message: String,
    summary: String,
    found: Vec<String>,
    missing: Vec<String>,
    no_found: String,
    no_missing: String,
    keyword_suggestions: String,
    formatting: Vec<String>,
    no_formatting: String,
    tips: String,
    notes: Vec<String>,
    version: String,
    model: String,
    resume_file: String,
    job_source: String,
}

fn band_color(band: ScoreBand) -> Color {
    match band {
        ScoreBand::Excellent => Color::Green,
        ScoreBand::Good => Color::Yellow,
        ScoreBand::NeedsImprovement => Color::Red,
        ScoreBand::Unknown => Color::Blue,
    }
}

fn generated_at(report: &AnalysisReport) -> String {
    report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, band: ScoreBand) -> String {
        let badge = band.label().to_uppercase();
        if self.use_colors {
            format!("[{}]", badge.color(band_color(band)).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    /// Found and missing keywords as two aligned columns.
    fn format_keyword_columns(&self, report: &AnalysisReport) -> String {
        let left_title = "Keywords Found in Your Resume ✅";
        let right_title = "Key Keywords to Add/Integrate ❌";

        let left: Vec<String> = if report.found_keywords().is_empty() {
            vec![NO_FOUND_KEYWORDS.to_string()]
        } else {
            report.found_keywords().iter().map(|k| format!("• {}", k)).collect()
        };
        let right: Vec<String> = if report.missing_keywords().is_empty() {
            vec![NO_MISSING_KEYWORDS.to_string()]
        } else {
            report.missing_keywords().iter().map(|k| format!("• {}", k)).collect()
        };

        let width = left
            .iter()
            .map(|cell| cell.chars().count())
            .chain(std::iter::once(left_title.chars().count()))
            .max()
            .unwrap_or(0)
            + 4;

        let mut output = format!(
            "{}{}\n",
            self.colorize(&format!("{:<width$}", left_title, width = width), Color::Green),
            self.colorize(right_title, Color::Red)
        );

        for row in 0..left.len().max(right.len()) {
            let left_cell = left.get(row).map(String::as_str).unwrap_or("");
            let right_cell = right.get(row).map(String::as_str).unwrap_or("");
            output.push_str(&format!("{:<width$}{}\n", left_cell, right_cell, width = width));
        }

        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("🚀 ATS RESUME ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            generated_at(report),
            report.metadata.processing_time_ms
        ));

        // Score
        output.push_str(&self.format_header("🌟 ATS Match Score", 2));
        if report.result.match_score.is_some() {
            output.push_str(&format!(
                "Overall Match: {} {}\n",
                report.score_display(),
                self.format_score_badge(report.score_band)
            ));
        }
        output.push_str(&format!(
            "{}\n",
            self.colorize(report.score_band.message(), band_color(report.score_band))
        ));

        output.push_str(&self.format_header("📝 Overall Summary", 2));
        output.push_str(&format!("{}\n", report.summary()));

        // Keywords
        output.push_str(&self.format_header("🔑 ATS Keyword Analysis", 2));
        output.push_str(&self.format_keyword_columns(report));
        output.push('\n');
        output.push_str(&format!(
            "{}\n{}\n",
            self.colorize("Suggestions for Integrating Missing Keywords:", Color::Cyan),
            report.keyword_suggestions()
        ));

        output.push_str(&self.format_header("💡 Formatting & General Improvement Suggestions", 2));
        if report.formatting_suggestions().is_empty() {
            output.push_str(&format!("{}\n", NO_FORMATTING_SUGGESTIONS));
        } else {
            for suggestion in report.formatting_suggestions() {
                output.push_str(&format!("  • {}\n", suggestion));
            }
        }

        output.push_str(&self.format_header("✨ Additional Tips", 2));
        output.push_str(&format!("{}\n", report.additional_tips()));

        if !report.consistency_notes.is_empty() {
            output.push_str(&self.format_header("⚠️  Consistency Notes", 3));
            for note in &report.consistency_notes {
                output.push_str(&format!("  • {}\n", self.colorize(&note.to_string(), Color::Yellow)));
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("📊 Analysis Details", 3));
            output.push_str(&format!("Resume: {}\n", report.metadata.resume_file));
            output.push_str(&format!("Job description: {}\n", report.metadata.job_source));
            output.push_str(&format!(
                "Keywords classified: {} ({} found, {} missing)\n",
                report.result.keyword_total(),
                report.found_keywords().len(),
                report.missing_keywords().len()
            ));
        }

        output.push_str(&format!(
            "\n{} Generated by ATS Analyzer v{} | Model: {}\n",
            self.colorize("ℹ️", Color::Blue),
            report.metadata.analyzer_version,
            report.metadata.model_used
        ));

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    /// A keyword as a bold code span inside a table cell. Pipes are escaped,
    /// line breaks collapse to spaces, and a keyword containing backticks gets
    /// a double-backtick span so it cannot close early.
    fn keyword_cell(keyword: &str) -> String {
        let text = keyword
            .split(['\r', '\n'])
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .replace('|', "\\|");

        if text.contains('`') {
            format!("**`` {} ``**", text)
        } else {
            format!("**`{}`**", text)
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# 🚀 ATS Resume Analysis\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                generated_at(report),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Job:** `{}`\n\n",
                file_name(&report.metadata.resume_file),
                file_name(&report.metadata.job_source)
            ));
        }

        output.push_str("## 🌟 ATS Match Score\n\n");
        output.push_str(&format!("**Overall Match:** {}\n\n", report.score_display()));
        output.push_str(&format!("> {}\n\n", report.score_band.message()));

        output.push_str("## 📝 Overall Summary\n\n");
        output.push_str(&format!("{}\n\n", report.summary()));

        // Side-by-side keyword table
        output.push_str("## 🔑 ATS Keyword Analysis\n\n");
        output.push_str("| Keywords Found in Your Resume ✅ | Key Keywords to Add/Integrate ❌ |\n");
        output.push_str("|---|---|\n");
        let found = report.found_keywords();
        let missing = report.missing_keywords();
        let rows = found.len().max(missing.len()).max(1);
        for row in 0..rows {
            let left = match found.get(row) {
                Some(keyword) => Self::keyword_cell(keyword),
                None if row == 0 => NO_FOUND_KEYWORDS.to_string(),
                None => String::new(),
            };
            let right = match missing.get(row) {
                Some(keyword) => Self::keyword_cell(keyword),
                None if row == 0 => NO_MISSING_KEYWORDS.to_string(),
                None => String::new(),
            };
            output.push_str(&format!("| {} | {} |\n", left, right));
        }
        output.push('\n');
        output.push_str("#### Suggestions for Integrating Missing Keywords\n\n");
        output.push_str(&format!("{}\n\n", report.keyword_suggestions()));

        output.push_str("## 💡 Formatting & General Improvement Suggestions\n\n");
        if report.formatting_suggestions().is_empty() {
            output.push_str(&format!("{}\n\n", NO_FORMATTING_SUGGESTIONS));
        } else {
            for suggestion in report.formatting_suggestions() {
                output.push_str(&format!("- {}\n", suggestion));
            }
            output.push('\n');
        }

        output.push_str("## ✨ Additional Tips\n\n");
        output.push_str(&format!("{}\n\n", report.additional_tips()));

        if !report.consistency_notes.is_empty() {
            output.push_str("## ⚠️ Consistency Notes\n\n");
            for note in &report.consistency_notes {
                output.push_str(&format!("- {}\n", note));
            }
            output.push('\n');
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated by ATS Analyzer v{} using {}*\n",
                report.metadata.analyzer_version, report.metadata.model_used
            ));
        }

        Ok(output)
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &AnalysisReport) -> HtmlTemplate {
        HtmlTemplate {
            include_styles: self.include_styles,
            generated_at: generated_at(report),
            processing_time: report.metadata.processing_time_ms,
            score: report.score_display(),
            band_class: match report.score_band {
                ScoreBand::Excellent => "excellent",
                ScoreBand::Good => "good",
                ScoreBand::NeedsImprovement => "needs_improvement",
                ScoreBand::Unknown => "unknown",
            }
            .to_string(),
            band_message: report.score_band.message().to_string(),
            summary: report.summary().to_string(),
            found: report.found_keywords().to_vec(),
            missing: report.missing_keywords().to_vec(),
            no_found: NO_FOUND_KEYWORDS.to_string(),
            no_missing: NO_MISSING_KEYWORDS.to_string(),
            keyword_suggestions: report.keyword_suggestions().to_string(),
            formatting: report.formatting_suggestions().to_vec(),
            no_formatting: NO_FORMATTING_SUGGESTIONS.to_string(),
            tips: report.additional_tips().to_string(),
            notes: report.consistency_notes.iter().map(|n| n.to_string()).collect(),
            version: report.metadata.analyzer_version.clone(),
            model: report.metadata.model_used.clone(),
            resume_file: file_name(&report.metadata.resume_file),
            job_source: file_name(&report.metadata.job_source),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| AtsError::OutputFormatting(e.to_string()))
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_ats{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_ats{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_ats{}.md", base_name, timestamp_suffix),
        OutputFormat::Html => format!("{}_ats{}.html", base_name, timestamp_suffix),
    }
}
