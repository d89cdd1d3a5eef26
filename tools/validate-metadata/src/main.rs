use std::{path::PathBuf, process::ExitCode};

use agenda_validator::{
    steps::parse_steps,
    FileReport, Pipeline, ValidationError, ValidationStep, ValidatorConfig,
};
use anyhow::{bail, Context, Result};
use clap::{error::ErrorKind, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "validate_metadata=info,agenda_validator=info";

/// Validate DAO agenda metadata files before they are merged.
///
/// Runs schema, format, PR-title, time, signature and on-chain transaction checks over
/// `data/agendas/<network>/agenda-<id>.json` submissions.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Metadata file(s) to validate.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Pull request title, eg `[Agenda] sepolia - 101 - My agenda`.
    #[arg(long, env = "PR_TITLE")]
    pr_title: Option<String>,

    /// Comma-separated steps to run: schema, format, pr-title, time, signature, transaction, all.
    #[arg(long = "check", value_delimiter = ',', default_value = "all")]
    checks: Vec<String>,

    /// Validate several files in one run instead of rejecting multi-file PRs.
    #[arg(long)]
    batch: bool,

    /// Mainnet JSON-RPC endpoint [default: $MAINNET_RPC_URL, then https://ethereum.drpc.org].
    #[arg(long)]
    mainnet_rpc_url: Option<String>,

    /// Sepolia JSON-RPC endpoint [default: $SEPOLIA_RPC_URL, then https://sepolia.drpc.org].
    #[arg(long)]
    sepolia_rpc_url: Option<String>,

    /// Repository (`org/repo`) whose main branch is probed for existing metadata files
    /// [default: $METADATA_REPOSITORY, then tokamak-network/dao-agenda-metadata-repository].
    #[arg(long)]
    metadata_repo: Option<String>,
}

impl Cli {
    /// Environment-derived configuration with command-line flags taking precedence.
    fn config(&self) -> ValidatorConfig {
        let mut config = ValidatorConfig::from_env();
        if let Some(url) = &self.mainnet_rpc_url {
            config.mainnet_rpc_url = url.clone();
        }
        if let Some(url) = &self.sepolia_rpc_url {
            config.sepolia_rpc_url = url.clone();
        }
        if let Some(repo) = &self.metadata_repo {
            config.metadata_repository = repo.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// `Ok(false)` means at least one file failed validation; `Err` is a usage or setup error.
async fn run(cli: Cli) -> Result<bool> {
    let steps = parse_steps(&cli.checks)?;
    if steps.contains(&ValidationStep::PrTitle) && cli.pr_title.is_none() {
        bail!("the pr-title step needs --pr-title <title> (or PR_TITLE)");
    }

    if cli.files.len() > 1 && !cli.batch {
        println!(
            "❌ Only one metadata file may be submitted per PR, found {}:",
            cli.files.len()
        );
        for file in &cli.files {
            println!("   - {}", file.display());
        }
        return Ok(false);
    }

    let config = cli.config();
    debug!(?config, ?steps, "resolved configuration");
    let pipeline = Pipeline::from_config(&config).context("failed to set up chain clients")?;

    let reports = pipeline
        .validate_files(&cli.files, cli.pr_title.as_deref(), &steps)
        .await;

    let mut all_valid = true;
    for report in &reports {
        print_report(report);
        all_valid &= report.is_valid();
    }
    if reports.len() > 1 {
        let failed = reports.iter().filter(|r| !r.is_valid()).count();
        println!("\n{} file(s) checked, {failed} failed", reports.len());
    }
    Ok(all_valid)
}

fn print_report(report: &FileReport) {
    println!("\n🔍 Validating {}", report.path);
    for step in &report.passed {
        println!("✅ {} passed", step.description());
    }
    match &report.failure {
        None => println!("🎉 {} is valid", report.path),
        Some(failure) => {
            let label = failure
                .step
                .map(|s| s.description())
                .unwrap_or("Loading metadata");
            println!("❌ {label} failed: {}", failure.error);
            if let ValidationError::Structural(issues) = &failure.error {
                for issue in issues {
                    println!("   - {issue}");
                }
            }
            println!("💥 {} is invalid", report.path);
        }
    }
}
