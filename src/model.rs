use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Reserved report key holding the sum of all repository counts.
pub const TOTAL_KEY: &str = "total_lines";

/// One entry of `gh repo list --json name,isPrivate,isFork`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryDescriptor {
    pub name: String,
    pub is_private: bool,
    pub is_fork: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub author_name: String,
    pub insertions: u64,
}

/// Case-insensitive substring filter over commit author names.
#[derive(Debug, Clone, Default)]
pub struct AuthorFilter {
    needles: Vec<String>,
}

impl AuthorFilter {
    pub fn new<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let needles = needles
            .into_iter()
            .map(|n| n.as_ref().trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        Self { needles }
    }

    pub fn is_empty(&self) -> bool {
        self.needles.is_empty()
    }

    /// Matches against the lowercased name and against its compact form with
    /// separators removed, so "Yoon-Jin Kim" matches "yoonjin".
    pub fn matches(&self, author_name: &str) -> bool {
        let lowered = author_name.to_lowercase();
        let compact: String = lowered.chars().filter(|c| c.is_alphanumeric()).collect();
        self.needles
            .iter()
            .any(|n| lowered.contains(n.as_str()) || compact.contains(n.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    pub name: String,
    pub files: u64,
    pub lines: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub account: String,
    pub repositories: Vec<TreeEntry>,
    pub total_lines: u64,
}
