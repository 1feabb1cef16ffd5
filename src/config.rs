use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "locbadge.toml";

/// Run configuration. Built once in `main` and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Account whose repositories are listed.
    pub account: String,
    /// Lowercase substrings matched against commit author names.
    pub authors: Vec<String>,
    /// Repository names dropped from the listing (exact match).
    pub excluded_repos: Vec<String>,
    /// A forked repository that is still counted.
    pub fork_exception: Option<String>,
    pub list_limit: u32,
    pub clone_base_url: String,
    /// `0` clones full history.
    pub clone_depth: u32,
    /// Read author and shortstat for all commits in one `git log` call.
    pub batched: bool,
    pub output_dir: PathBuf,
    pub report_file: String,
    pub banner_file: String,
    pub tree_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account: "gg582".to_string(),
            authors: vec![
                "yunjin".to_string(),
                "yoonjin".to_string(),
                "gg582".to_string(),
            ],
            excluded_repos: vec![
                "CSharp-Arkanoid-based-Project".to_string(),
                "gg582.github.io".to_string(),
                "tk9.0".to_string(),
                "SampleBlog".to_string(),
                "RIOTOSMiniCarImplementation".to_string(),
                "exampleCodeFromAzureClass".to_string(),
            ],
            fork_exception: Some("gobus".to_string()),
            list_limit: 1000,
            clone_base_url: "https://github.com".to_string(),
            clone_depth: 1,
            batched: false,
            output_dir: PathBuf::from("public"),
            report_file: "lines.json".to_string(),
            banner_file: "banner.svg".to_string(),
            tree_file: "tree_lines.json".to_string(),
        }
    }
}

impl Config {
    /// Loads `path` if given, else `./locbadge.toml` when present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }

    pub fn banner_path(&self) -> PathBuf {
        self.output_dir.join(&self.banner_file)
    }

    pub fn tree_path(&self) -> PathBuf {
        self.output_dir.join(&self.tree_file)
    }

    pub fn clone_url(&self, repo: &str) -> String {
        format!(
            "{}/{}/{}.git",
            self.clone_base_url.trim_end_matches('/'),
            self.account,
            repo
        )
    }

    pub fn listing(&self) -> ListingConfig {
        ListingConfig {
            account: self.account.clone(),
            limit: self.list_limit,
            excluded: self.excluded_repos.clone(),
            fork_exception: self.fork_exception.clone(),
        }
    }
}

/// The subset of [`Config`] the repository lister needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingConfig {
    pub account: String,
    pub limit: u32,
    pub excluded: Vec<String>,
    pub fork_exception: Option<String>,
}
