//! Extract command - show the text the analyzer sees.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use skillbridge_core::{DocumentTextExtractor, SectionMap, TextExtractor};

use super::{load_config, InputFile};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Document file (PDF, DOCX or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Also print the detected resume sections
    #[arg(long)]
    sections: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let input = InputFile::read(&args.input)?;

    let extractor = DocumentTextExtractor::new().with_config(config.extraction);
    let text = extractor.extract(&input.document());
    info!("Extracted {} characters", text.chars().count());

    if text.is_empty() {
        eprintln!("{} No text could be extracted", style("⚠").yellow());
    } else {
        println!("{}", text);
    }

    if args.sections {
        let sections = SectionMap::segment(&text);
        println!();
        println!("{}", style("Sections:").bold());
        if sections.is_empty() {
            println!("  (none found)");
        }
        for (name, content) in sections.iter() {
            println!(
                "{} {} ({} chars)",
                style("▸").cyan(),
                name,
                content.chars().count()
            );
            for line in content.lines() {
                println!("    {}", line);
            }
        }
    }

    Ok(())
}
