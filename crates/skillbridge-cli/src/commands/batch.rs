//! Batch command - score many resumes concurrently.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use skillbridge_core::{AnalysisReport, ResumeAnalyzer};

use super::analyze::{format_score, OutputFormat};
use super::{is_supported, load_config, InputFile};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input glob pattern (e.g. "resumes/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Target role (default: analysis.default_role from config)
    #[arg(short, long)]
    role: Option<String>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue when a file cannot be read
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    report: Option<AnalysisReport>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let role = args
        .role
        .clone()
        .unwrap_or_else(|| config.analysis.default_role.clone());

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let analyzer = Arc::new(ResumeAnalyzer::with_config(&config)?);
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let role = Arc::new(role);

    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let analyzer = Arc::clone(&analyzer);
        let role = Arc::clone(&role);
        let pb = overall_pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let result = process_single_file(&analyzer, path, &role);
            pb.inc(1);
            result
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await?);
    }

    overall_pb.finish_with_message("Complete");

    if let Some(failed) = results.iter().find(|r| r.error.is_some()) {
        let error_msg = failed.error.as_deref().unwrap_or("unknown error");
        if args.continue_on_error {
            warn!("Failed to process {}: {}", failed.path.display(), error_msg);
        } else {
            error!("Failed to process {}: {}", failed.path.display(), error_msg);
            anyhow::bail!("Processing failed: {}", error_msg);
        }
    }

    let successful: Vec<_> = results.iter().filter(|r| r.report.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(report) = &result.report {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("resume");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_score(&report.score, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    let fallbacks = successful
        .iter()
        .filter(|r| r.report.as_ref().is_some_and(|rep| rep.used_fallback))
        .count();
    if fallbacks > 0 {
        println!("   {} scored with the fallback result", style(fallbacks).yellow());
    }

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

fn process_single_file(analyzer: &ResumeAnalyzer, path: PathBuf, role: &str) -> ProcessResult {
    let file_start = Instant::now();

    let outcome = InputFile::read(&path)
        .map(|input| analyzer.analyze_detailed(&input.document(), role));
    let processing_time_ms = file_start.elapsed().as_millis() as u64;

    match outcome {
        Ok(report) => ProcessResult {
            path,
            report: Some(report),
            error: None,
            processing_time_ms,
        },
        Err(e) => ProcessResult {
            path,
            report: None,
            error: Some(e.to_string()),
            processing_time_ms,
        },
    }
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "score",
        "completeness",
        "role_relevance",
        "skill_depth",
        "format_quality",
        "technical_skills",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(report) = &result.report {
            let score = &report.score;
            let status = if report.used_fallback { "fallback" } else { "success" };
            wtr.write_record([
                filename,
                status,
                &score.score.to_string(),
                &format!("{:.2}", score.breakdown.completeness),
                &format!("{:.2}", score.breakdown.role_relevance),
                &format!("{:.2}", score.breakdown.skill_depth),
                &format!("{:.2}", score.breakdown.format_quality),
                &score.technical_skills.len().to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
