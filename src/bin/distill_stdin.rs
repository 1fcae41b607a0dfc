//! Read HTML from stdin and print the extraction result as JSON on stdout.

use std::io::{self, Read};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use web_distill::{extract_html, FetchRequest, OutputFormat, PipelineConfig};

/// Isolate the main content of an HTML page read from stdin.
#[derive(Parser, Debug)]
#[command(name = "distill-stdin", version, about)]
struct Cli {
    /// Character limit for the content.
    limit: Option<usize>,

    /// Output format: markdown or text.
    format: Option<OutputFormat>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let mut request = FetchRequest::new("stdin:");
    if let Some(limit) = cli.limit {
        request = request.with_limit(limit);
    }
    if let Some(format) = cli.format {
        request = request.with_format(format);
    }

    let mut html = String::new();
    if io::stdin().read_to_string(&mut html).is_err() {
        eprintln!("Failed to read from stdin");
        return ExitCode::from(2);
    }

    match extract_html(&html, &request, &PipelineConfig::default()) {
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
