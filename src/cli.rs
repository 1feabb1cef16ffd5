use crate::config::Config;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "locbadge")]
#[command(about = "Count lines contributed across public repositories and render an SVG badge")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Default)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to a TOML config file (default: ./locbadge.toml if present)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Directory for lines.json, banner.svg and tree_lines.json")]
    pub output_dir: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,
}

#[derive(Args, Clone, Default)]
pub struct SourceArgs {
    #[arg(long, help = "Account whose public repositories are scanned")]
    pub account: Option<String>,

    #[arg(long = "exclude", value_name = "REPO", help = "Additional repository to exclude (repeatable)")]
    pub exclude: Vec<String>,

    #[arg(long, help = "Clone depth; 0 clones full history")]
    pub depth: Option<u32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count lines inserted by the configured authors and write lines.json
    Count {
        #[clap(flatten)]
        source: SourceArgs,

        #[arg(long = "author", value_name = "SUBSTRING", help = "Author name substring (repeatable, replaces configured list)")]
        authors: Vec<String>,

        #[arg(long, help = "Read the whole history with a single git log call per repository")]
        batched: bool,

        #[arg(long, help = "Hide the progress spinner")]
        no_progress: bool,
    },
    /// Render banner.svg from an existing lines.json
    Banner,
    /// Count lines present at HEAD in every repository and write tree_lines.json
    Tree {
        #[clap(flatten)]
        source: SourceArgs,
    },
    /// Print the repositories that would be processed
    List {
        #[clap(flatten)]
        source: SourceArgs,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        let mut config = Config::load(self.common.config.as_deref()).context("Failed to load configuration")?;
        if let Some(dir) = &self.common.output_dir {
            config.output_dir = dir.clone();
        }

        match self.command {
            Commands::Count { source, authors, batched, no_progress } => {
                source.apply(&mut config);
                if !authors.is_empty() {
                    config.authors = authors;
                }
                config.batched |= batched;
                crate::count::exec(&config, !no_progress)
            }
            Commands::Banner => crate::banner::exec(&config),
            Commands::Tree { source } => {
                source.apply(&mut config);
                crate::snapshot::exec(&config)
            }
            Commands::List { source } => {
                source.apply(&mut config);
                crate::platform::exec(&config)
            }
        }
    }
}

impl SourceArgs {
    pub fn apply(self, config: &mut Config) {
        if let Some(account) = self.account {
            config.account = account;
        }
        config.excluded_repos.extend(self.exclude);
        if let Some(depth) = self.depth {
            config.clone_depth = depth;
        }
    }
}
