use crate::error::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Exclusively owned temporary directory holding one clone.
///
/// Dropping without [`ScratchDir::close`] still removes it, ignoring errors.
pub struct ScratchDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchDir {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("locbadge-").tempdir()?;
        let path = dir.path().to_path_buf();
        debug!(path = %path.display(), "created scratch dir");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the directory. Read-only entries (git pack files on some
    /// platforms) are made writable and removal is retried once.
    pub fn close(mut self) -> Result<()> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };
        if dir.close().is_ok() || !self.path.exists() {
            return Ok(());
        }
        make_writable(&self.path)?;
        fs::remove_dir_all(&self.path)?;
        Ok(())
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            if dir.close().is_err() && self.path.exists() {
                let _ = make_writable(&self.path);
                let _ = fs::remove_dir_all(&self.path);
            }
        }
    }
}

fn make_writable(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.file_type().is_symlink() {
        return Ok(());
    }
    let mut perms = meta.permissions();
    if perms.readonly() {
        perms.set_readonly(false);
        fs::set_permissions(path, perms)?;
    }
    if meta.is_dir() {
        for entry in fs::read_dir(path)? {
            make_writable(&entry?.path())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_removes_directory() {
        let scratch = ScratchDir::new().unwrap();
        let path = scratch.path().to_path_buf();
        fs::write(path.join("file.txt"), "x").unwrap();
        scratch.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn close_removes_read_only_entries() {
        let scratch = ScratchDir::new().unwrap();
        let path = scratch.path().to_path_buf();
        let nested = path.join("objects").join("pack");
        fs::create_dir_all(&nested).unwrap();
        let pack = nested.join("pack-1.idx");
        fs::write(&pack, "idx").unwrap();
        let mut perms = fs::metadata(&pack).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&pack, perms).unwrap();

        scratch.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn drop_removes_directory() {
        let path = {
            let scratch = ScratchDir::new().unwrap();
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
