use crate::error::{LocError, Result};
use crate::runner::CommandRunner;
use std::path::Path;
use tracing::debug;

/// Clones `url` into the existing empty directory `dest`.
///
/// `depth == 0` clones the full history; any other value makes a shallow
/// clone truncated to that many commits.
pub fn clone_repository(
    runner: &dyn CommandRunner,
    url: &str,
    depth: u32,
    dest: &Path,
) -> Result<()> {
    let dest = dest
        .to_str()
        .ok_or_else(|| LocError::GitRepo(format!("Non UTF-8 path: {}", dest.display())))?;
    let depth_arg = format!("--depth={depth}");
    let mut args = vec!["clone", "--quiet"];
    if depth > 0 {
        args.push(&depth_arg);
    }
    args.push(url);
    args.push(dest);
    debug!(%url, depth, "cloning");
    runner.run_checked("git", &args)?;
    Ok(())
}
