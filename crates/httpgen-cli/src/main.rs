//! httpgen CLI entrypoint
//! Parses command-line arguments and runs the conversion pipeline.

// Internal imports (std, crate)
use std::path::PathBuf;
use std::process::ExitCode;

// External imports (alphabetized)
use anyhow::Context;
use clap::{ArgGroup, Parser};
use httpgen_core::{Config, GenerationReport};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "httpgen")]
#[command(author, version, about = "Convert OpenAPI specs into .http request collections", long_about = None)]
#[command(group(ArgGroup::new("input").args(["source", "file"])))]
struct Cli {
    /// Path or URL to the OpenAPI spec (YAML or JSON)
    ///
    /// Can be a local file path or an HTTP/HTTPS URL
    /// Example: --source path/to/openapi.yaml
    /// Example: --source https://petstore3.swagger.io/api/v3/openapi.json
    #[arg(short, long, required_unless_present_any = ["file", "config"])]
    source: Option<String>,

    /// Legacy alias for --source
    #[arg(short, long)]
    file: Option<String>,

    /// Base URL overriding the servers declared in the document
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Output file (default: <derived name>.http in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Generate output even if the document has validation errors
    #[arg(short, long)]
    ignore: bool,

    /// Show diagnostics and request counts
    #[arg(short, long)]
    verbose: bool,

    /// Network timeout in seconds when fetching a remote spec [default: 30]
    #[arg(short, long)]
    timeout: Option<u64>,

    /// YAML file with conversion settings; command-line flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    async fn into_config(self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .await
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::new(String::new()),
        };

        if let Some(source) = self.source.or(self.file) {
            config.source = source;
        }
        if config.source.trim().is_empty() {
            anyhow::bail!("either --source or --file is required");
        }
        if self.endpoint.is_some() {
            config.endpoint = self.endpoint;
        }
        if self.output.is_some() {
            config.output = self.output;
        }
        config.ignore_errors |= self.ignore;
        config.verbose |= self.verbose;
        config.timeout_secs = self.timeout.unwrap_or(config.timeout_secs);
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let flag_verbose = cli.verbose;

    let config = match cli.into_config().await {
        Ok(config) => config,
        Err(e) => return report_error(&e, flag_verbose),
    };
    let verbose = config.verbose;
    init_logging(verbose);

    match run(&config).await {
        Ok(report) => {
            if verbose {
                println!(
                    "Generated {} ({} requests)",
                    report.output_path.display(),
                    report.request_count
                );
            } else {
                println!("Generated {}", report.output_path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e, verbose),
    }
}

fn report_error(e: &anyhow::Error, verbose: bool) -> ExitCode {
    if verbose {
        eprintln!("Error: {e:?}");
    } else {
        eprintln!("Error: {e:#}");
    }
    ExitCode::FAILURE
}

async fn run(config: &Config) -> anyhow::Result<GenerationReport> {
    tracing::debug!(?config, "Starting conversion");

    let report = httpgen_core::generate(config)
        .await
        .with_context(|| format!("Failed to convert {}", config.source))?;

    tracing::debug!(
        warnings = report.diagnostics.warnings.len(),
        errors = report.diagnostics.errors.len(),
        "Conversion finished"
    );
    Ok(report)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
