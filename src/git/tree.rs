use crate::error::{LocError, Result};
use gix::Repository;
use std::path::Path;

/// Line and file totals for the blobs in one tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeCount {
    pub files: u64,
    pub lines: u64,
}

/// Read-only view of a clone used to count lines present at HEAD.
pub struct TreeRepo {
    repo: Repository,
}

impl TreeRepo {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            repo: gix::open(path.as_ref())?,
        })
    }

    /// Counts lines of every text blob reachable from the HEAD tree.
    pub fn count_head_lines(&self) -> Result<TreeCount> {
        let commit = self
            .repo
            .head_commit()
            .map_err(|e| LocError::GitRepo(format!("No HEAD commit: {e}")))?;
        let tree = commit.tree()?;

        let mut recorder = gix::traverse::tree::Recorder::default();
        tree.traverse()
            .breadthfirst(&mut recorder)
            .map_err(|e| LocError::GitRepo(format!("Tree traversal failed: {e}")))?;

        let mut count = TreeCount::default();
        for entry in recorder.records {
            if !entry.mode.is_blob() {
                continue;
            }
            let object = self.repo.find_object(entry.oid)?;
            let data = object.data.as_slice();
            if is_binary(data) {
                continue;
            }
            count.files += 1;
            count.lines += count_lines(data);
        }
        Ok(count)
    }
}

pub fn is_binary(data: &[u8]) -> bool {
    data.iter().take(8192).any(|&b| b == 0)
}

pub fn count_lines(data: &[u8]) -> u64 {
    std::str::from_utf8(data)
        .map(|t| t.lines().count() as u64)
        .unwrap_or(0)
}
