//! Fetch a URL and print the extraction result as JSON on stdout.
//!
//! Failures print an error body (`errorKind`, `message`, `stage`) and exit
//! non-zero. Logs go to stderr; set `RUST_LOG` to adjust.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use web_distill::{
    FetchMode, FetchRequest, LimitUnit, OutputFormat, Pipeline, PipelineConfig, JINA_READER_BASE,
};

/// Fetch a web page and print its main content, size-bounded, as JSON.
#[derive(Parser, Debug)]
#[command(name = "distill-url", version, about)]
struct Cli {
    /// Page to fetch (http or https).
    url: String,

    /// Size limit for the content; defaults to the configured limit.
    #[arg(short, long)]
    limit: Option<usize>,

    /// Unit of `--limit`: chars or tokens.
    #[arg(short, long, default_value = "chars")]
    unit: LimitUnit,

    /// Output format: markdown or text; defaults to the configured format.
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Fetch through the Jina reader proxy.
    #[arg(long, conflicts_with = "proxy_base")]
    proxy: bool,

    /// Fetch through a reader proxy at this base URL.
    #[arg(long, value_name = "URL")]
    proxy_base: Option<String>,

    /// API key sent to the reader proxy.
    #[arg(long, env = "WEB_DISTILL_PROXY_KEY", hide_env_values = true)]
    proxy_key: Option<String>,

    /// Path to a JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn request(&self) -> FetchRequest {
        let mut request = FetchRequest::new(self.url.clone()).with_unit(self.unit);
        if let Some(limit) = self.limit {
            request = request.with_limit(limit);
        }
        if let Some(format) = self.format {
            request = request.with_format(format);
        }
        request
    }

    fn proxy_base(&self) -> Option<String> {
        self.proxy_base
            .clone()
            .or_else(|| self.proxy.then(|| JINA_READER_BASE.to_string()))
    }

    fn load_config(&self) -> Result<PipelineConfig, String> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
                PipelineConfig::from_json(&json).map_err(|e| e.to_string())?
            }
            None => PipelineConfig::default(),
        };
        if let Some(base_url) = self.proxy_base() {
            config.fetcher.mode = FetchMode::Proxy {
                base_url,
                api_key: self.proxy_key.clone(),
            };
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let pipeline = match cli.load_config().and_then(|c| Pipeline::new(c).map_err(|e| e.to_string())) {
        Ok(pipeline) => pipeline,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    match pipeline.extract(&cli.request()).await {
        Ok(result) => {
            println!("{}", serde_json::to_string(&result).unwrap_or_default());
            ExitCode::SUCCESS
        }
        Err(failure) => {
            println!("{}", serde_json::to_string(&failure.to_response()).unwrap_or_default());
            ExitCode::FAILURE
        }
    }
}
