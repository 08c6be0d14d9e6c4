//! bias-lens binary entry point.
//!
//! Reads an article from stdin and prints the analysis report as JSON on
//! stdout. All logs go to stderr.

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::io::Read;
use std::sync::Arc;

use bias_lens::anthropic::{AnthropicClient, ClientConfig};
use bias_lens::config::Config;
use bias_lens::detector::BiasDetector;
use bias_lens::error::AppError;
use bias_lens::patterns::PatternLibrary;
use bias_lens::pipeline::{AnalysisPipeline, Collaborators, PipelineConfig};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    // Logs to stderr only (stdout carries the report)
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string())
                .parse()
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    if let Err(e) = run().await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;
    tracing::info!(
        model = %config.model,
        api_key = %config.api_key.masked(),
        stage_timeout_ms = config.stage_timeout_ms,
        "Configuration loaded"
    );

    let library = match &config.pattern_library_path {
        Some(path) => PatternLibrary::from_path(path)?,
        None => PatternLibrary::standard()?,
    };
    let detector = Arc::new(BiasDetector::new(&library)?);

    let client = Arc::new(AnthropicClient::new(
        config.api_key.clone(),
        ClientConfig::from(&config),
    )?);
    let pipeline = AnalysisPipeline::new(
        detector,
        Collaborators::from_client(client),
        PipelineConfig::from(&config),
    );

    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;

    let output = pipeline.analyze(&text, None).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
