//! ATS analyzer: score a resume against a job description with a hosted model

use ats_analyzer::cli::{self, AnalyzeArgs, Cli, Commands, ConfigAction, JobSource};
use ats_analyzer::config::{Config, OutputFormat};
use ats_analyzer::error::{AtsError, ErrorKind, Result};
use ats_analyzer::input::InputManager;
use ats_analyzer::llm::{AnalysisOutcome, ApiCredential, GeminiClient, GenerationSettings, ResumeAnalyzer};
use ats_analyzer::output::formatter::{save_report_to_file, suggest_filename};
use ats_analyzer::output::status::{self, Notice, NoticeLevel, StatusPrinter};
use ats_analyzer::output::{AnalysisReport, ReportGenerator};
use ats_analyzer::processing::AnalysisRequest;
use ats_analyzer::session::{AnalysisSession, Readiness};
use clap::Parser;
use indicatif::ProgressBar;
use log::{error, info, warn};
use std::path::Path;
use std::process;
use std::time::Duration;
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() {
    // Pick up GEMINI_API_KEY and RUST_LOG from a local .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("❌ Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config.as_deref()).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::Analyze(args) => run_analyze(args, config).await,

        Commands::Extract { file } => {
            match InputManager::new().extract_any(&file).await {
                Ok(text) => {
                    println!("Extracted text:");
                    println!("{}", text);
                }
                Err(e) if e.kind() == ErrorKind::ExtractionFailure => {
                    warn!("{}", e);
                    println!("No text extracted.");
                }
                Err(e) => return Err(e),
            }
            Ok(())
        }

        Commands::Config { action } => {
            let path = config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::config_path);

            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration ({})\n", path.display());
                    let rendered = toml::to_string_pretty(&config)
                        .map_err(|e| AtsError::Configuration(e.to_string()))?;
                    println!("{}", rendered);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
            Ok(())
        }
    }
}

async fn run_analyze(args: AnalyzeArgs, mut config: Config) -> Result<()> {
    if let Some(model) = &args.model {
        config.model.model_name = model.clone();
    }

    let format = match &args.output {
        Some(output) => cli::parse_output_format(output).map_err(AtsError::InvalidInput)?,
        None => config.output.format,
    };
    let use_colors = config.output.color_output && !args.no_color;
    let detailed = args.detailed || config.output.detailed;
    let printer = StatusPrinter::new(use_colors);

    let input_manager = InputManager::new();
    let mut session = AnalysisSession::new();

    let job_source = args
        .job_source()
        .ok_or_else(|| AtsError::InvalidInput("A job description is required".to_string()))?;
    // An unreadable job description leaves the session blocked, like a bad resume
    match read_job_description(&input_manager, &job_source).await {
        Ok(text) => session.set_job_description(text),
        Err(e) => {
            error!("Job description could not be read: {}", e);
            printer.print(&status::job_description_notice(&e));
        }
    }

    let loaded = session.load_resume(&input_manager, &args.resume).await;
    if let Err(e) = &loaded {
        error!("Resume extraction failed: {}", e);
    }
    printer.print(&status::resume_notice(&loaded));

    let request = match session.readiness() {
        Readiness::Ready(request) => request,
        Readiness::Blocked(reasons) => {
            printer.print_all(&status::blocked_notices(&reasons));
            return Err(AtsError::InvalidInput(format!("analysis blocked: {:?}", reasons)));
        }
    };

    let outcome = match run_model(&config, &request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            printer.print_all(&status::analysis_failure_notices(&e));
            return Err(e);
        }
    };
    printer.print(&Notice::new(NoticeLevel::Success, status::ANALYSIS_COMPLETE));

    let resume_label = args.resume.display().to_string();
    let report = AnalysisReport::new(outcome, resume_label.clone(), job_source.label());

    let report_generator = ReportGenerator::with_options(use_colors, detailed);
    let rendered = report_generator.generate_report(&report, &format)?;
    println!("{}", rendered);

    if let Some(save) = &args.save {
        let target = if save.is_dir() {
            save.join(suggest_filename(&format, &resume_label, true))
        } else {
            save.clone()
        };

        // Files never carry terminal color codes
        let content = if format == OutputFormat::Console && use_colors {
            ReportGenerator::with_options(false, detailed).generate_report(&report, &format)?
        } else {
            rendered
        };

        save_report_to_file(&content, &target)?;
        info!("Report saved to {}", target.display());
        printer.print(&Notice::new(
            NoticeLevel::Info,
            format!("Report saved to {}", target.display()),
        ));
    }

    Ok(())
}

async fn read_job_description(input_manager: &InputManager, source: &JobSource) -> Result<String> {
    match source {
        JobSource::File(path) => input_manager.read_job_description(path).await,
        JobSource::Stdin => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            Ok(buffer)
        }
        JobSource::Inline(text) => Ok(text.clone()),
    }
}

/// The single model call, with the credential resolved just before use.
async fn run_model(config: &Config, request: &AnalysisRequest) -> Result<AnalysisOutcome> {
    let credential = ApiCredential::from_env(&config.model.api_key_env)
        .inspect_err(|e| error!("{}", e))?;
    let client = GeminiClient::new(GenerationSettings::from(&config.model), credential);
    let analyzer = ResumeAnalyzer::new(client, config);

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(status::ANALYZING);
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = analyzer.analyze(request).await;
    spinner.finish_and_clear();
    result
}
