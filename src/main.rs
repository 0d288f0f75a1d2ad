use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use rpalette::config::PipelineConfig;
use rpalette::input;
use rpalette::logging;
use rpalette::output::RecordWriter;
use rpalette::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "rpalette")]
#[command(version)]
#[command(about = "Extract the three dominant colors of every image in a URL list")]
struct Cli {
    /// File with one image URL or local path per line
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Output CSV path
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Scan worker threads (defaults to available hardware threads)
    #[arg(short = 'j', long, value_name = "N")]
    concurrency: Option<usize>,

    /// Optional JSON config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_level.as_deref());

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }

    let urls = input::read_url_list(&cli.input)
        .with_context(|| format!("Failed to read url list from {}", cli.input.display()))?;
    tracing::info!(
        urls = urls.len(),
        concurrency = config.concurrency,
        "starting batch"
    );

    let out = File::create(&cli.output)
        .with_context(|| format!("Failed to create output file {}", cli.output.display()))?;
    let mut writer = RecordWriter::new(BufWriter::new(out));

    let started = Instant::now();
    let pipeline = Pipeline::new(config)?;
    let summary = pipeline.run(&urls, &mut writer).await?;

    tracing::info!(
        processed = summary.processed,
        failed = summary.failed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch finished"
    );
    if summary.failed > 0 {
        tracing::warn!(
            "{} of {} inputs failed; see error markers in {}",
            summary.failed,
            summary.total(),
            cli.output.display()
        );
    }

    Ok(())
}
