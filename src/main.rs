//! Contraudit - AI-powered contract analyzer
//!
//! A CLI tool that extracts text from a contract document (PDF/DOCX),
//! fans it out to three specialized analysis agents running
//! concurrently, and consolidates their findings into an executive
//! report via a fourth manager agent.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (extraction, config, IO failure, etc.)
//!   2 - Incomplete analysis with --fail-on-incomplete set

mod agents;
mod cli;
mod config;
mod extract;
mod llm;
mod models;
mod orchestrator;
mod report;

use agents::ManagerAgent;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use llm::{ChatModel, LlmConfig, MistralClient};
use models::{ContractReport, ReportMetadata, TextPayload};
use orchestrator::Orchestrator;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Contraudit v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the analysis
    match run_analysis(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .contraudit.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".contraudit.toml");

    if path.exists() {
        eprintln!("⚠️  .contraudit.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .contraudit.toml")?;

    println!("✅ Created .contraudit.toml with default settings.");
    println!("   Edit it to customize model, timeout, and prompt budget.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete analysis workflow. Returns exit code (0 or 2).
async fn run_analysis(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let file = args.file.clone().expect("validated");

    // Step 1: Extract the document text
    println!("📖 Extracting text from: {}", file.display());
    let payload: TextPayload = extract::extract_text(&file)
        .with_context(|| format!("Failed to extract text from {}", file.display()))?;

    if payload.is_empty() {
        warn!("Document produced no extractable text; agents will receive an empty payload");
    }
    println!("   Extracted {} characters", payload.char_count());

    // Handle --dry-run: show a preview and exit
    if args.dry_run {
        return handle_dry_run(&payload);
    }

    // Step 2: Initialize the chat model client
    println!("🤖 Initializing agents...");
    println!("   Model: {}", config.model.name);
    println!("   API: {}", config.model.api_url);
    println!("   Timeout: {}s per agent call", config.model.timeout_seconds);

    let llm_config = LlmConfig {
        api_url: config.model.api_url.clone(),
        api_key: args.api_key.clone().expect("validated"),
        model: config.model.name.clone(),
        temperature: config.model.temperature,
        max_tokens: config.model.max_tokens,
        timeout_seconds: config.model.timeout_seconds,
    };

    let client: Arc<dyn ChatModel> =
        Arc::new(MistralClient::new(llm_config).context("Failed to create API client")?);

    // Step 3: First-stage fan-out
    println!("\n🔬 Phase 1: Running Structure, Legal, and Negotiation agents in parallel...");
    let spinner = make_spinner(args.quiet, "Analyzing contract...");

    let orchestrator = Orchestrator::new(client.clone(), config.analysis.max_prompt_chars);
    let agent_results = orchestrator.run(&payload).await;

    spinner.finish_and_clear();
    for result in agent_results.entries() {
        match result.content() {
            Some(_) => println!("   ✅ {} agent finished", result.kind),
            None => println!(
                "   ⚠️  {} agent failed: {}",
                result.kind,
                result.error_detail().unwrap_or("unknown")
            ),
        }
    }

    // Step 4: Manager consolidation
    println!("\n👔 Phase 2: Manager agent consolidating results...");
    let spinner = make_spinner(args.quiet, "Consolidating...");

    let manager = ManagerAgent::new(client.clone());
    let executive = manager.consolidate(&agent_results).await;

    spinner.finish_and_clear();
    match executive.content() {
        Some(_) => println!("   ✅ Executive summary ready"),
        None => println!(
            "   ⚠️  Consolidation failed: {}",
            executive.error_detail().unwrap_or("unknown")
        ),
    }

    // Step 5: Build and save the report
    println!("\n📝 Generating report...");

    let duration = start_time.elapsed().as_secs_f64();
    let contract_report = ContractReport {
        metadata: ReportMetadata {
            source_file: file.display().to_string(),
            analysis_date: Utc::now(),
            model_used: client.model_name().to_string(),
            extracted_chars: payload.char_count(),
            agents_failed: agent_results.failed_count(),
            duration_seconds: duration,
        },
        agents: agent_results,
        executive,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&contract_report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&contract_report),
    };

    std::fs::write(&args.output, &output)
        .with_context(|| format!("Failed to write report to {}", args.output.display()))?;

    // Print summary
    let failed = contract_report.metadata.agents_failed;
    println!("\n📊 Analysis Summary:");
    println!("   Agents succeeded: {} of 3", 3 - failed);
    println!(
        "   Executive summary: {}",
        if contract_report.executive_summary().is_some() {
            "available"
        } else {
            "unavailable"
        }
    );
    println!("   Duration: {:.1}s", duration);
    println!(
        "\n✅ Analysis complete! Report saved to: {}",
        args.output.display()
    );

    // Check --fail-on-incomplete
    let incomplete = failed > 0 || !contract_report.executive.is_success();
    if args.fail_on_incomplete && incomplete {
        eprintln!("\n⛔ One or more agents failed. Failing (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Handle --dry-run: print an extraction preview, exit.
fn handle_dry_run(payload: &TextPayload) -> Result<i32> {
    println!("\n🔍 Dry run: extraction only (no LLM calls)...\n");

    const PREVIEW_CHARS: usize = 1000;
    let preview: String = payload.as_str().chars().take(PREVIEW_CHARS).collect();
    if preview.is_empty() {
        println!("   No text could be extracted from the document.");
    } else {
        println!("{}", preview);
        if payload.char_count() > PREVIEW_CHARS {
            println!("\n   ... ({} more characters)", payload.char_count() - PREVIEW_CHARS);
        }
    }

    println!("\n✅ Dry run complete. No LLM calls were made.");
    Ok(0)
}

/// Create a spinner for long-running LLM phases (hidden in quiet mode).
fn make_spinner(quiet: bool, message: &'static str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("   {spinner} {msg}").expect("static template is valid"),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .contraudit.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
