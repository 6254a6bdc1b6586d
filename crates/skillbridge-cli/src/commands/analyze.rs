//! Analyze command - score a single resume.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use skillbridge_core::analysis::ROLE_MENU;
use skillbridge_core::{
    AnalysisReport, AnalysisRequest, ResumeAnalyzer, ResumeScore, ScoreComponent,
};

use super::{load_config, InputFile};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Resume file (PDF, DOCX or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Target role (default: analysis.default_role from config)
    #[arg(short, long)]
    role: Option<String>,

    /// Academic year (recorded, not used for scoring)
    #[arg(short, long)]
    year: Option<String>,

    /// Branch of study (recorded, not used for scoring)
    #[arg(short, long)]
    branch: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include sections, warnings and timing
    #[arg(long)]
    details: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let input = InputFile::read(&args.input)?;

    let mut request = AnalysisRequest::new(
        args.role
            .clone()
            .unwrap_or_else(|| config.analysis.default_role.clone()),
    );
    if let Some(year) = &args.year {
        request = request.with_academic_year(year.as_str());
    }
    if let Some(branch) = &args.branch {
        request = request.with_branch(branch.as_str());
    }

    let analyzer = ResumeAnalyzer::with_config(&config)?;
    let known = ROLE_MENU.contains(&request.role.as_str())
        || analyzer.corpus().has_profile(&request.role);
    if !known {
        warn!(
            "Role {:?} is not in the role menu, scoring with defaults",
            request.role
        );
    }

    info!("Processing file: {}", args.input.display());
    debug!(
        "Academic year {:?}, branch {:?}",
        request.academic_year, request.branch
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Analyzing {}...", input.file_name));

    let report = analyzer.analyze_detailed(&input.document(), &request.role);

    pb.finish_and_clear();

    if report.used_fallback {
        eprintln!(
            "{} Analysis failed, reporting the fallback score",
            style("⚠").yellow()
        );
    }

    let output = if args.details {
        format_report(&report, args.format)?
    } else {
        format_score(&report.score, args.format)?
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Render a score in the requested format.
pub fn format_score(score: &ResumeScore, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(score)?),
        OutputFormat::Csv => format_csv(score),
        OutputFormat::Text => Ok(format_text(score)),
    }
}

fn format_report(report: &AnalysisReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_csv(&report.score),
        OutputFormat::Text => {
            let mut output = format_text(&report.score);

            output.push_str("\nSections:\n");
            if report.sections.is_empty() {
                output.push_str("  (none found)\n");
            }
            for (name, text) in report.sections.iter() {
                output.push_str(&format!(
                    "  {:<15} {} chars\n",
                    name.as_str(),
                    text.chars().count()
                ));
            }

            for warning in &report.warnings {
                output.push_str(&format!("\nWarning: {}\n", warning));
            }

            output.push_str(&format!(
                "\nExtracted {} characters in {}ms\n",
                report.extracted_length, report.processing_time_ms
            ));
            Ok(output)
        }
    }
}

fn format_csv(score: &ResumeScore) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "score",
        "completeness",
        "role_relevance",
        "skill_depth",
        "format_quality",
        "strengths",
        "missing_skills",
        "technical_skills",
    ])?;

    let strengths: Vec<&str> = score.strengths.iter().map(|s| s.label.as_str()).collect();
    wtr.write_record([
        &score.score.to_string(),
        &format!("{:.2}", score.breakdown.completeness),
        &format!("{:.2}", score.breakdown.role_relevance),
        &format!("{:.2}", score.breakdown.skill_depth),
        &format!("{:.2}", score.breakdown.format_quality),
        &strengths.join("; "),
        &score.missing_skills.join("; "),
        &score.technical_skills.join("; "),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(score: &ResumeScore) -> String {
    let mut output = String::new();

    output.push_str(&format!("Score: {}/100\n", score.score));
    output.push('\n');

    output.push_str("Breakdown:\n");
    for component in ScoreComponent::ALL {
        output.push_str(&format!(
            "  {:<15} {:>5.1} / {}\n",
            component.as_str(),
            score.breakdown.get(component),
            component.max()
        ));
    }
    output.push('\n');

    output.push_str("Strengths:\n");
    for strength in &score.strengths {
        output.push_str(&format!("  [{}] {}\n", strength.icon, strength.label));
    }

    if !score.missing_skills.is_empty() {
        output.push_str(&format!("\nMissing skills: {}\n", score.missing_skills.join(", ")));
    }
    if !score.technical_skills.is_empty() {
        output.push_str(&format!(
            "Technical skills: {}\n",
            score.technical_skills.join(", ")
        ));
    }

    output
}
