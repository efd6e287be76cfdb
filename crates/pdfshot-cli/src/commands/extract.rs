//! Extract command - rasterize pages of a single PDF.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::debug;

use pdfshot_core::{ExtractionOutcome, PageExtractor, PdfshotConfig};

use super::ExtractOptions;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    #[command(flatten)]
    options: ExtractOptions,

    /// Print the outcome as JSON instead of one path per line
    #[arg(long)]
    json: bool,
}

pub async fn run(args: ExtractArgs, config: PdfshotConfig) -> anyhow::Result<()> {
    let start = Instant::now();

    let request = args.options.request_for(&config, &args.input);
    let extractor = PageExtractor::new(args.options.engine(&config));

    debug!("Extraction request: {:?}", request);
    let outcome = tokio::task::spawn_blocking(move || extractor.run(request)).await??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    for path in &outcome.paths {
        println!("{}", path.display());
    }

    eprintln!(
        "{} {} in {:?}",
        style("✓").green(),
        summary(&outcome),
        start.elapsed()
    );
    for failure in &outcome.failures {
        eprintln!(
            "  {} page {}: {}",
            style("✗").red(),
            failure.page_index + 1,
            failure.error
        );
    }

    Ok(())
}

/// Written pages against requested ones, with the document's page count.
fn summary(outcome: &ExtractionOutcome) -> String {
    format!(
        "Extracted {} of {} requested pages ({} in document)",
        outcome.paths.len(),
        outcome.requested_pages,
        outcome.total_pages
    )
}
