//! Roles command - list target roles and their profiles.

use clap::Args;
use console::style;

use skillbridge_core::analysis::{ACADEMIC_YEARS, BRANCHES, ROLE_MENU};
use skillbridge_core::RoleCorpus;

use super::load_config;

/// Arguments for the roles command.
#[derive(Args)]
pub struct RolesArgs {
    /// Show the skill and keyword lists of one role
    #[arg(short, long)]
    role: Option<String>,
}

pub async fn run(args: RolesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let corpus = RoleCorpus::with_extra_roles(&config.analysis.extra_roles)?;

    match args.role {
        Some(role) => show_role(&corpus, &role),
        None => {
            list_roles(&corpus);
            Ok(())
        }
    }
}

fn list_roles(corpus: &RoleCorpus) {
    println!("{}", style("Roles:").bold());
    for role in ROLE_MENU {
        if corpus.has_profile(role) {
            println!("  {} {}", style("✓").green(), role);
        } else {
            println!("  {} {} (no profile, default scores)", style("-").dim(), role);
        }
    }

    let extra: Vec<&str> = corpus
        .profiles()
        .iter()
        .map(|p| p.name())
        .filter(|name| !ROLE_MENU.contains(name))
        .collect();
    for role in extra {
        println!("  {} {} (from config)", style("✓").green(), role);
    }

    println!();
    println!("Academic years: {}", ACADEMIC_YEARS.join(", "));
    println!("Branches: {}", BRANCHES.join(", "));
}

fn show_role(corpus: &RoleCorpus, role: &str) -> anyhow::Result<()> {
    let Some(profile) = corpus.profile(role) else {
        if ROLE_MENU.contains(&role) {
            println!(
                "{} {} has no profile; it scores with the default relevance and depth.",
                style("ℹ").blue(),
                role
            );
            return Ok(());
        }
        anyhow::bail!("Unknown role: {}", role);
    };

    println!("{}", style(profile.name()).bold());
    println!();
    println!("Skills:");
    for skill in profile.skill_names() {
        println!("  - {}", skill);
    }
    println!();
    println!("Keywords:");
    for keyword in profile.keyword_names() {
        println!("  - {}", keyword);
    }

    Ok(())
}
