//! Lines present at HEAD across the listed repositories.
//!
//! This is a different metric from `count`: it measures code that exists
//! today regardless of author, and is written to its own file.

use crate::config::Config;
use crate::error::Result;
use crate::git::{clone_repository, TreeCount, TreeRepo};
use crate::model::{TreeEntry, TreeOutput, SCHEMA_VERSION};
use crate::platform::list_repositories;
use crate::runner::{CommandRunner, LiveRunner};
use crate::scratch::ScratchDir;
use anyhow::Context;
use chrono::Utc;
use console::style;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub fn exec(config: &Config) -> anyhow::Result<()> {
    let runner = LiveRunner;
    let repos = list_repositories(&runner, &config.listing());
    if repos.is_empty() {
        info!("no repositories to process");
        return Ok(());
    }

    let entries = collect(config, &runner, &repos)?;
    let output = build_output(config, entries);
    let path = config.tree_path();
    write_output(&output, &path)
        .with_context(|| format!("Failed to write tree snapshot to {}", path.display()))?;

    println!("{}", style("Tree Snapshot").bold());
    println!("{}", "─".repeat(50));
    for e in &output.repositories {
        println!("{:<40} {:>6} files {:>9} lines", e.name, e.files, e.lines);
    }
    println!("Total lines present: {}", style(output.total_lines).green());
    println!("Results saved to {}", style(path.display()).cyan());
    Ok(())
}

pub fn collect(
    config: &Config,
    runner: &dyn CommandRunner,
    repos: &[String],
) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::with_capacity(repos.len());
    for repo in repos {
        info!(%repo, "snapshotting repository");
        let scratch = ScratchDir::new()?;
        let cloned = clone_repository(
            runner,
            &config.clone_url(repo),
            config.clone_depth,
            scratch.path(),
        );
        let outcome = cloned.map(|()| count_tree(repo, scratch.path()));

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            warn!("error removing temporary directory '{}': {e}", scratch_path.display());
        }

        match outcome {
            Ok(count) => entries.push(TreeEntry {
                name: repo.clone(),
                files: count.files,
                lines: count.lines,
            }),
            Err(e) => warn!("failed to process {repo}, skipping: {e}"),
        }
    }
    Ok(entries)
}

fn count_tree(repo: &str, dir: &Path) -> TreeCount {
    match TreeRepo::open(dir).and_then(|r| r.count_head_lines()) {
        Ok(count) => count,
        Err(e) => {
            warn!("could not read HEAD tree of {repo}: {e}");
            TreeCount::default()
        }
    }
}

pub fn build_output(config: &Config, repositories: Vec<TreeEntry>) -> TreeOutput {
    let total_lines = repositories.iter().map(|e| e.lines).sum();
    TreeOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        account: config.account.clone(),
        repositories,
        total_lines,
    }
}

pub fn write_output(output: &TreeOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(output)?)?;
    Ok(())
}
