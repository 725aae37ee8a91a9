//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Contraudit - LLM-powered contract analyzer for PDF/DOCX documents
///
/// Runs three specialized analysis agents (structure, legal,
/// negotiation) concurrently over the extracted contract text, then a
/// manager agent consolidates their findings into an executive summary.
/// Markdown/JSON reports. Built in Rust.
///
/// Examples:
///   contraudit lease.pdf
///   contraudit nda.docx --model mistral-small-latest --format json
///   contraudit lease.pdf --dry-run
///   contraudit --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Contract document to analyze (PDF or DOCX)
    ///
    /// Not required when using --init-config.
    #[arg(value_name = "FILE", required_unless_present = "init_config")]
    pub file: Option<PathBuf>,

    /// Mistral model to use for analysis
    ///
    /// Can also be set via CONTRAUDIT_MODEL env var or .contraudit.toml config.
    #[arg(
        short,
        long,
        default_value = "mistral-large-latest",
        env = "CONTRAUDIT_MODEL"
    )]
    pub model: String,

    /// Mistral API key
    ///
    /// Required for analysis (not for --dry-run or --init-config).
    #[arg(long, env = "MISTRAL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Chat API base URL
    #[arg(long, default_value = "https://api.mistral.ai", env = "MISTRAL_API_URL")]
    pub api_url: String,

    /// Output file path for the report
    #[arg(short, long, default_value = "contract_report.md", value_name = "FILE")]
    pub output: PathBuf,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .contraudit.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Temperature for LLM responses (0.0 - 1.0)
    ///
    /// Lower values produce more consistent/deterministic output
    #[arg(long, default_value = "0.2")]
    pub temperature: f32,

    /// Request timeout in seconds, applied per agent call
    ///
    /// An agent whose call exceeds the timeout is reported as failed;
    /// the other agents are unaffected. Default: from config or 120s.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Maximum tokens per model response
    #[arg(long, value_name = "TOKENS")]
    pub max_tokens: Option<usize>,

    /// Maximum contract characters included in each agent prompt
    #[arg(long, value_name = "CHARS")]
    pub max_prompt_chars: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: extract the document text without calling the LLM
    ///
    /// Prints an extraction preview and exits.
    #[arg(long)]
    pub dry_run: bool,

    /// Fail if any analysis agent reported a failure
    ///
    /// Useful for scripting. Exit code 2 when the report is incomplete.
    #[arg(long)]
    pub fail_on_incomplete: bool,

    /// Generate a default .contraudit.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        let file = match &self.file {
            Some(file) => file,
            None => return Err("A contract document is required".to_string()),
        };

        if !file.exists() {
            return Err(format!("Document does not exist: {}", file.display()));
        }
        if !file.is_file() {
            return Err(format!("Document path is not a file: {}", file.display()));
        }

        // The API is only reached outside of dry runs
        if !self.dry_run {
            if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }

            match &self.api_key {
                Some(key) if !key.trim().is_empty() => {}
                _ => {
                    return Err(
                        "Mistral API key is required (--api-key or MISTRAL_API_KEY)".to_string()
                    )
                }
            }
        }

        // Validate temperature range
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err("Temperature must be between 0.0 and 1.0".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(0) = self.max_prompt_chars {
            return Err("Max prompt chars must be at least 1".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            file: Some(PathBuf::from("Cargo.toml")), // any existing file
            model: "mistral-large-latest".to_string(),
            api_key: Some("test-key".to_string()),
            api_url: "https://api.mistral.ai".to_string(),
            output: PathBuf::from("report.md"),
            format: OutputFormat::Markdown,
            config: None,
            temperature: 0.2,
            timeout: None,
            max_tokens: None,
            max_prompt_chars: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            fail_on_incomplete: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_ok() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_missing_file() {
        let mut args = make_args();
        args.file = Some(PathBuf::from("does-not-exist.pdf"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_api_key() {
        let mut args = make_args();
        args.api_key = None;
        assert!(args.validate().is_err());

        // A dry run never reaches the API.
        args.dry_run = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_api_url() {
        let mut args = make_args();
        args.api_url = "ftp://example.com".to_string();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_temperature_range() {
        let mut args = make_args();
        args.temperature = 1.5;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
