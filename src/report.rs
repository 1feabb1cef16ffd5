use crate::error::{LocError, Result};
use crate::model::TOTAL_KEY;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fs;
use std::path::Path;

/// Per-repository insertion counts in processing order.
///
/// Serializes as one JSON object: each repository name mapped to its count,
/// followed by [`TOTAL_KEY`] holding the sum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineCountReport {
    entries: Vec<(String, u64)>,
}

impl LineCountReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, repo: impl Into<String>, count: u64) -> Result<()> {
        let repo = repo.into();
        if repo == TOTAL_KEY {
            return Err(LocError::ReservedName(repo));
        }
        match self.entries.iter_mut().find(|(name, _)| *name == repo) {
            Some((_, existing)) => *existing = count,
            None => self.entries.push((repo, count)),
        }
        Ok(())
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for LineCountReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len() + 1))?;
        for (name, count) in &self.entries {
            map.serialize_entry(name, count)?;
        }
        map.serialize_entry(TOTAL_KEY, &self.total())?;
        map.end()
    }
}

/// Writes the report to `path`, creating parent directories and replacing
/// any previous file.
pub fn write_report(report: &LineCountReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, report.to_json()?)?;
    Ok(())
}
