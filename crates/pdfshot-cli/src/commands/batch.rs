//! Batch command - extract pages from every PDF matching a pattern.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{error, warn};

use pdfshot_core::{ExtractionOutcome, PageExtractor, PdfshotConfig};

use super::ExtractOptions;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    #[command(flatten)]
    options: ExtractOptions,

    /// Also write a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    outcome: Option<ExtractionOutcome>,
    error: Option<String>,
    processing_time_ms: u64,
}

/// One row of the summary CSV.
#[derive(Serialize)]
struct SummaryRow<'a> {
    filename: &'a str,
    status: &'static str,
    total_pages: usize,
    extracted_pages: usize,
    failed_pages: usize,
    processing_time_ms: u64,
    error: &'a str,
}

pub async fn run(args: BatchArgs, config: PdfshotConfig) -> anyhow::Result<()> {
    let start = Instant::now();

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_pdf(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching PDF files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // One engine for the whole batch, so the library is bound only once
    let extractor = Arc::new(PageExtractor::new(args.options.engine(&config)));
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let request = args.options.request_for(&config, &path);
        let worker = Arc::clone(&extractor);

        let result = tokio::task::spawn_blocking(move || worker.run(request)).await?;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(outcome) => results.push(FileResult {
                path,
                outcome: Some(outcome),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if !args.continue_on_error {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    pb.abandon();
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
                warn!("Failed to process {}: {}", path.display(), error_msg);
                results.push(FileResult {
                    path,
                    outcome: None,
                    error: Some(error_msg),
                    processing_time_ms,
                });
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = args
            .options
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        if let Some(parent) = summary_path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let pages: usize = results
        .iter()
        .filter_map(|r| r.outcome.as_ref())
        .map(|o| o.paths.len())
        .sum();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files ({} pages) in {:?}",
        style("✓").green(),
        results.len(),
        pages,
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

fn status_of(result: &FileResult) -> &'static str {
    match &result.outcome {
        None => "error",
        Some(outcome) if outcome.is_empty() => "empty",
        Some(outcome) if !outcome.failures.is_empty() => "partial",
        Some(_) => "success",
    }
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let (total_pages, extracted_pages, failed_pages) = result
            .outcome
            .as_ref()
            .map(|o| (o.total_pages, o.paths.len(), o.failures.len()))
            .unwrap_or_default();

        wtr.serialize(SummaryRow {
            filename,
            status: status_of(result),
            total_pages,
            extracted_pages,
            failed_pages,
            processing_time_ms: result.processing_time_ms,
            error: result.error.as_deref().unwrap_or(""),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfshot_core::PageFailure;

    fn result_with(outcome: Option<ExtractionOutcome>) -> FileResult {
        FileResult {
            path: PathBuf::from("scans/a.pdf"),
            error: outcome.is_none().then(|| "PDF file not found".to_string()),
            outcome,
            processing_time_ms: 12,
        }
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("a.pdf")));
        assert!(is_pdf(Path::new("dir/B.PDF")));
        assert!(!is_pdf(Path::new("a.jpg")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn test_status_of() {
        let partial = ExtractionOutcome {
            total_pages: 2,
            requested_pages: 2,
            paths: vec![PathBuf::from("a_page1.jpg")],
            failures: vec![PageFailure {
                page_index: 1,
                error: "boom".to_string(),
            }],
        };
        assert_eq!(status_of(&result_with(None)), "error");
        assert_eq!(status_of(&result_with(Some(ExtractionOutcome::default()))), "empty");
        assert_eq!(status_of(&result_with(Some(partial))), "partial");
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let ok = ExtractionOutcome {
            total_pages: 3,
            requested_pages: 1,
            paths: vec![PathBuf::from("a_page1.jpg")],
            failures: vec![],
        };

        write_summary(&path, &[result_with(Some(ok)), result_with(None)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "filename,status,total_pages,extracted_pages,failed_pages,processing_time_ms,error"
        );
        assert_eq!(lines[1], "a.pdf,success,3,1,0,12,");
        assert_eq!(lines[2], "a.pdf,error,0,0,0,12,PDF file not found");
    }
}
