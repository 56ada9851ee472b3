//! Bulwark CLI
//!
//! Drives the standard resilience pipelines against a live URL so their
//! behaviour can be observed in the logs.

#![allow(clippy::print_stdout)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use application::{EventSink, RandomSource};
use clap::{Parser, Subcommand};
use domain::{HttpResponse, Outcome, PipelineKind, Probability};
use infrastructure::{
    AppConfig, HttpOperation, ThreadRandomSource, TracingEventSink, TransientErrorOperation,
    build_standard_registry, init_telemetry,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Bulwark CLI
#[derive(Parser)]
#[command(name = "bulwark-cli")]
#[command(author, version, about = "Resilience pipeline playground", long_about = None)]
struct Cli {
    /// Verbosity level (overrides the configured log filter)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./bulwark.toml if present)
    #[arg(short, long, global = true, env = "BULWARK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send requests through a named pipeline
    ///
    /// Example: bulwark-cli run --pipeline retry --url http://localhost:8080/ --requests 5
    Run {
        /// Pipeline name (see `list`)
        #[arg(short, long, default_value = "retry")]
        pipeline: String,

        /// Target URL
        #[arg(short, long, default_value = "http://localhost:8080/")]
        url: String,

        /// Number of sequential requests
        #[arg(short = 'n', long, default_value = "10")]
        requests: u32,

        /// Percent chance of simulating a transient error before each request
        #[arg(short, long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=100))]
        error_chance: u8,
    },

    /// List the available pipelines
    List,

    /// Print the effective configuration as TOML
    Config,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

fn error_probability(percent: u8) -> Result<Probability, domain::DomainError> {
    Probability::new(f64::from(percent) / 100.0)
}

/// One-line summary of a request outcome
fn describe(outcome: &Outcome<HttpResponse>) -> String {
    match outcome {
        Outcome::Success(response) => {
            format!("{} {}", response.status(), response.body().trim())
        },
        Outcome::Failure(failure) => format!("failed: {failure}"),
    }
}

/// Tally of outcomes by label
#[derive(Debug, Default)]
struct RunSummary {
    succeeded: u32,
    failed: BTreeMap<&'static str, u32>,
}

impl RunSummary {
    fn record(&mut self, outcome: &Outcome<HttpResponse>) {
        match outcome.error_kind() {
            None => self.succeeded += 1,
            Some(kind) => *self.failed.entry(kind.as_str()).or_default() += 1,
        }
    }

    fn total(&self) -> u32 {
        self.succeeded + self.failed.values().sum::<u32>()
    }
}

async fn run(
    config: &AppConfig,
    pipeline: &str,
    url: String,
    requests: u32,
    error_chance: u8,
) -> anyhow::Result<()> {
    let sink: Arc<dyn EventSink> = Arc::new(TracingEventSink::new());
    let random: Arc<dyn RandomSource> = Arc::new(ThreadRandomSource);
    let registry = build_standard_registry(config, sink, random.clone())?;

    let http = HttpOperation::new(url, &config.http).context("failed to build HTTP client")?;
    let operation = TransientErrorOperation::new(http, error_probability(error_chance)?, random);

    let cancellation = CancellationToken::new();
    let on_signal = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling in-flight request");
            on_signal.cancel();
        }
    });

    let mut summary = RunSummary::default();
    for request in 1..=requests {
        let outcome = registry
            .execute(pipeline, &operation, cancellation.clone())
            .await?;
        println!("#{request:<3} {}", describe(&outcome));
        summary.record(&outcome);
        if outcome.is_cancelled() {
            break;
        }
    }

    println!();
    println!("{} of {} succeeded", summary.succeeded, summary.total());
    for (kind, count) in &summary.failed {
        println!("  {kind}: {count}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    config.validate()?;
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.telemetry.log_filter = filter.to_string();
    }
    init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run {
            pipeline,
            url,
            requests,
            error_chance,
        } => {
            info!(%pipeline, %url, requests, error_chance, "Starting run");
            run(&config, &pipeline, url, requests, error_chance).await?;
        },

        Commands::List => {
            for kind in PipelineKind::ALL {
                println!("{:<24} {}", kind.as_str(), kind.description());
            }
            if !config.chaos.enabled {
                println!();
                println!("chaos is disabled: injectors are omitted");
            }
        },

        Commands::Config => {
            print!("{}", config.to_toml()?);
        },
    }

    Ok(())
}
