//! CLI interface for the ATS analyzer

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ats-analyzer")]
#[command(about = "ATS resume analyzer powered by a hosted language model")]
#[command(long_about = "Score a PDF or DOCX resume against a job description, list found and missing ATS keywords, and suggest formatting improvements")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume against a job description
    Analyze(AnalyzeArgs),

    /// Print the text extracted from a document
    Extract {
        /// Path to a PDF, DOCX, TXT or MD file
        file: PathBuf,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to resume file (PDF, DOCX)
    #[arg(short, long)]
    pub resume: PathBuf,

    /// Path to job description file (TXT, MD), or "-" for stdin
    #[arg(short, long, conflicts_with = "job_text", required_unless_present = "job_text")]
    pub job: Option<PathBuf>,

    /// Job description text given inline
    #[arg(long)]
    pub job_text: Option<String>,

    /// Output format: console, json, markdown, html
    #[arg(short, long)]
    pub output: Option<String>,

    /// Save output to a file, or to a generated file name inside a directory
    #[arg(short, long)]
    pub save: Option<PathBuf>,

    /// Model name override
    #[arg(short, long)]
    pub model: Option<String>,

    /// Include analysis details in console output
    #[arg(short, long)]
    pub detailed: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Where the job description comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSource {
    File(PathBuf),
    Stdin,
    Inline(String),
}

impl AnalyzeArgs {
    pub fn job_source(&self) -> Option<JobSource> {
        match (&self.job, &self.job_text) {
            (Some(path), _) if path.as_os_str() == "-" => Some(JobSource::Stdin),
            (Some(path), _) => Some(JobSource::File(path.clone())),
            (None, Some(text)) => Some(JobSource::Inline(text.clone())),
            (None, None) => None,
        }
    }
}

impl JobSource {
    /// Short label used in report metadata.
    pub fn label(&self) -> String {
        match self {
            JobSource::File(path) => path.display().to_string(),
            JobSource::Stdin => "stdin".to_string(),
            JobSource::Inline(_) => "inline text".to_string(),
        }
    }
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        "html" => Ok(crate::config::OutputFormat::Html),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, html", format)),
    }
}
