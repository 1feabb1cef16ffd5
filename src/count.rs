use crate::config::Config;
use crate::error::Result;
use crate::git::{clone_repository, count_insertions, WalkStrategy};
use crate::model::AuthorFilter;
use crate::platform::list_repositories;
use crate::report::{write_report, LineCountReport};
use crate::runner::{CommandRunner, LiveRunner};
use crate::scratch::ScratchDir;
use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub fn exec(config: &Config, show_progress: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    let runner = LiveRunner;

    let Some(report) = run(config, &runner, show_progress)? else {
        return Ok(());
    };

    let path = config.report_path();
    write_report(&report, &path)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    output_summary(&report, &path, started.elapsed());
    Ok(())
}

/// Lists, clones and counts. Returns `None` when the listing is empty, in
/// which case no report should be written.
pub fn run(
    config: &Config,
    runner: &dyn CommandRunner,
    show_progress: bool,
) -> Result<Option<LineCountReport>> {
    let repos = list_repositories(runner, &config.listing());
    if repos.is_empty() {
        info!("no repositories to process");
        return Ok(None);
    }
    collect(config, runner, &repos, show_progress).map(Some)
}

/// Processes `repos` one at a time. A repository that fails to clone gets
/// no entry; one whose history walk fails is recorded as 0.
pub fn collect(
    config: &Config,
    runner: &dyn CommandRunner,
    repos: &[String],
    show_progress: bool,
) -> Result<LineCountReport> {
    let filter = AuthorFilter::new(&config.authors);
    if filter.is_empty() {
        warn!("author filter is empty; every repository will count 0");
    }
    let strategy = if config.batched {
        WalkStrategy::Batched
    } else {
        WalkStrategy::PerCommit
    };

    let mut report = LineCountReport::new();
    for repo in repos {
        info!(%repo, "processing repository");
        let scratch = ScratchDir::new()?;
        let outcome = process_repository(
            config,
            runner,
            repo,
            scratch.path(),
            &filter,
            strategy,
            show_progress,
        );
        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            warn!("error removing temporary directory '{}': {e}", scratch_path.display());
        }

        match outcome {
            Ok(count) => {
                info!(%repo, lines = count, "lines added by filtered authors");
                if let Err(e) = report.insert(repo.as_str(), count) {
                    warn!("skipping {repo}: {e}");
                }
            }
            Err(e) => warn!("failed to process {repo}, skipping: {e}"),
        }
    }
    Ok(report)
}

fn process_repository(
    config: &Config,
    runner: &dyn CommandRunner,
    repo: &str,
    dir: &Path,
    filter: &AuthorFilter,
    strategy: WalkStrategy,
    show_progress: bool,
) -> Result<u64> {
    info!(
        "cloning {}/{repo} into temporary directory",
        config.account
    );
    clone_repository(runner, &config.clone_url(repo), config.clone_depth, dir)?;

    let pb = spinner(show_progress);
    pb.set_message(format!("Scanning {repo}"));
    let count = count_insertions(runner, dir, filter, strategy, &pb);
    pb.finish_and_clear();
    Ok(count)
}

pub(crate) fn spinner(show_progress: bool) -> ProgressBar {
    if !show_progress {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} ({pos} commits)")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn output_summary(report: &LineCountReport, path: &Path, elapsed: Duration) {
    println!("{}", style("Line Count Summary").bold());
    println!("{}", "─".repeat(50));
    for (name, count) in report.entries() {
        println!("{:<40} {:>9}", name, count);
    }
    println!("{}", "─".repeat(50));
    println!(
        "All repositories processed. Total lines added: {}",
        style(report.total()).green()
    );
    println!("Results saved to {}", style(path.display()).cyan());
    println!(
        "Elapsed: {}",
        style(humantime::format_duration(Duration::from_secs(elapsed.as_secs()))).dim()
    );
}
