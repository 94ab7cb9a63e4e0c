//! CLI for mediafire-dl.

use clap::{Parser, ValueEnum};
use mfdl_core::config::{self, HttpConfig, RunConfig, DEFAULT_SLEEP_MS};
use mfdl_core::error::{ExitStatus, UsageError};
use mfdl_core::extract::ExtractorKind;
use mfdl_core::input::{self, UrlSource};
use mfdl_core::pipeline::{self, Reporter, RunSummary};
use mfdl_core::transport::CurlTransport;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Download files from hosting pages without a browser.
#[derive(Debug, Parser)]
#[command(name = "mediafire-dl", version)]
#[command(about = "Download files from MediaFire-style hosting pages", long_about = None)]
pub struct Cli {
    /// Hosting page URLs (required unless --input is given).
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Directory to save files into; created if missing.
    #[arg(short = 'o', long, value_name = "DIRECTORY", default_value = ".")]
    pub output_directory: PathBuf,

    /// Pause between consecutive URLs, in milliseconds.
    #[arg(
        short = 's',
        long,
        value_name = "MILLISECONDS",
        default_value_t = DEFAULT_SLEEP_MS as i64,
        allow_negative_numbers = true
    )]
    pub sleep_ms: i64,

    /// Read URLs from FILE, one per line ("-" for standard input).
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: Option<String>,

    /// How to find the filename and download link in a page.
    #[arg(short = 'e', long, value_enum, default_value_t = ExtractorArg::Selector)]
    pub extractor: ExtractorArg,

    /// TOML file with an [http] table (user_agent, timeouts, max_redirections).
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtractorArg {
    /// Parse the page and query CSS selectors.
    Selector,
    /// Match regular expressions against the raw markup.
    Pattern,
}

impl From<ExtractorArg> for ExtractorKind {
    fn from(arg: ExtractorArg) -> Self {
        match arg {
            ExtractorArg::Selector => ExtractorKind::Selector,
            ExtractorArg::Pattern => ExtractorKind::Pattern,
        }
    }
}

/// Validate arguments, resolve URLs and build the run configuration.
/// Nothing touches the network before this succeeds.
pub async fn resolve(cli: Cli) -> Result<(RunConfig, Vec<String>), UsageError> {
    let sleep_ms = input::validate_sleep_ms(cli.sleep_ms)?;
    let http = match &cli.config {
        Some(path) => config::load_from_path(path).map_err(UsageError::Config)?.http,
        None => HttpConfig::default(),
    };
    let urls = input::resolve_urls(UrlSource::from_args(cli.input.as_deref(), cli.urls)).await?;

    let cfg = RunConfig {
        output_directory: cli.output_directory,
        sleep_ms,
        extractor: cli.extractor.into(),
        http,
    };
    tracing::debug!("run config: {:?}", cfg);
    Ok((cfg, urls))
}

/// Resolve arguments and run the pipeline, reporting through `reporter`.
pub async fn run<O: Write, E: Write>(
    cli: Cli,
    reporter: &mut Reporter<O, E>,
) -> Result<RunSummary, UsageError> {
    let (cfg, urls) = resolve(cli).await?;
    let extractor = cfg.extractor.build();
    let transport = Arc::new(CurlTransport::new(cfg.http.clone()));
    pipeline::run_pipeline(&urls, &cfg, transport, extractor.as_ref(), reporter).await
}

/// Parse the process arguments, run, and map the outcome to an exit status.
pub async fn run_from_args() -> ExitStatus {
    let cli = Cli::parse();
    let mut reporter = Reporter::new(io::stdout(), io::stderr());

    match run(cli, &mut reporter).await {
        Ok(summary) => summary.exit_status(),
        Err(err) => {
            tracing::error!("{}", err);
            let _ = reporter.usage(&err);
            ExitStatus::Usage
        }
    }
}
