mod cli;
mod git_log;
mod report;
mod reviews;
mod settings;
mod time_utils;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use timesheet_core::{PatternFormatter, RawCommit, Timesheet};
use tracing_subscriber::{fmt, EnvFilter};

use cli::Cli;
use settings::GitSettings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Read while the process is still single-threaded.
    let offset = time_utils::local_offset();

    dotenvy::from_filename(".env.local").ok();

    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt().with_env_filter(filter).with_target(false).init();

    let settings =
        settings::read_config(cli.config.as_deref()).context("Failed to load settings")?;
    let month = settings
        .resolve_month(cli.year, cli.month, time_utils::today(offset))
        .context("Invalid report month")?;
    let formatter = PatternFormatter::new(&settings.report.date_format)
        .with_context(|| format!("Invalid date format '{}'", settings.report.date_format))?;

    tracing::info!("Building timesheet for {}", month);

    let raw_commits = collect_commits(&settings.git);
    let raw_reviews = reviews::fetch_reviews(&settings.github, &month).await;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let timesheet = Timesheet::build(
        &settings.timesheet_config(month, offset),
        raw_commits,
        raw_reviews,
        &formatter,
        &mut rng,
    )?;

    let csv = timesheet.to_csv();
    if cli.dry_run {
        println!("{}", csv);
        return Ok(());
    }

    let dir = cli
        .output_dir
        .as_deref()
        .unwrap_or(settings.report.output_dir.as_path());
    let path = report::output_path(dir, &settings.report.file_prefix, &month);
    report::write_report(&path, &csv)?;

    tracing::info!(
        "Wrote {} rows ({:.2} hours) to {}",
        timesheet.rows().len(),
        timesheet.total_hours(),
        path.display()
    );

    Ok(())
}

/// Reads each project in turn; a project that cannot be read is skipped.
fn collect_commits(git: &GitSettings) -> Vec<RawCommit> {
    let mut commits = Vec::new();

    for project in &git.projects {
        match git_log::read_commits(project, git.skip_merges) {
            Ok(found) => {
                tracing::info!("Read {} commits from {}", found.len(), project.name);
                commits.extend(found);
            }
            Err(e) => tracing::error!("Skipping {}: {}", project.name, e),
        }
    }

    commits
}
