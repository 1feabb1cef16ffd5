use super::shortstat::sum_insertions;
use crate::error::{LocError, Result};
use crate::model::{AuthorFilter, CommitRecord};
use crate::runner::CommandRunner;
use indicatif::ProgressBar;
use std::path::Path;
use tracing::{debug, error};

const RECORD_SEP: char = '\u{1e}';
const FIELD_SEP: char = '\u{1f}';

/// How commit authors and stats are read from a clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkStrategy {
    /// Two `git show` calls per commit.
    #[default]
    PerCommit,
    /// One `git log --shortstat` call for the whole history.
    Batched,
}

/// Sums insertions by matching authors across every commit reachable from
/// any ref. A failing git call is logged and the repository counts as 0.
pub fn count_insertions(
    runner: &dyn CommandRunner,
    repo: &Path,
    filter: &AuthorFilter,
    strategy: WalkStrategy,
    progress: &ProgressBar,
) -> u64 {
    match try_count_insertions(runner, repo, filter, strategy, progress) {
        Ok(n) => n,
        Err(e) => {
            error!("error processing git history in '{}': {e}", repo.display());
            0
        }
    }
}

pub fn try_count_insertions(
    runner: &dyn CommandRunner,
    repo: &Path,
    filter: &AuthorFilter,
    strategy: WalkStrategy,
    progress: &ProgressBar,
) -> Result<u64> {
    let records = match strategy {
        WalkStrategy::PerCommit => walk_per_commit(runner, repo, filter, progress)?,
        WalkStrategy::Batched => {
            let all = read_history_batched(runner, repo)?;
            progress.inc(all.len() as u64);
            all.into_iter()
                .filter(|r| filter.matches(&r.author_name))
                .collect()
        }
    };
    Ok(records.iter().map(|r| r.insertions).sum())
}

/// Returns records for matching commits only; non-matching commits never
/// have their shortstat read.
pub fn walk_per_commit(
    runner: &dyn CommandRunner,
    repo: &Path,
    filter: &AuthorFilter,
    progress: &ProgressBar,
) -> Result<Vec<CommitRecord>> {
    let mut records = Vec::new();
    for hash in list_commits(runner, repo)? {
        let author_name = author_of(runner, repo, &hash)?;
        progress.inc(1);
        if !filter.matches(&author_name) {
            continue;
        }
        let insertions = sum_insertions(&shortstat_of(runner, repo, &hash)?);
        debug!(%hash, %author_name, insertions, "matched commit");
        records.push(CommitRecord {
            hash,
            author_name,
            insertions,
        });
    }
    Ok(records)
}

pub fn list_commits(runner: &dyn CommandRunner, repo: &Path) -> Result<Vec<String>> {
    let dir = repo_arg(repo)?;
    let stdout = runner.run_checked("git", &["-C", dir, "log", "--all", "--pretty=format:%H"])?;
    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Author display name of `hash`, lowercased.
pub fn author_of(runner: &dyn CommandRunner, repo: &Path, hash: &str) -> Result<String> {
    let dir = repo_arg(repo)?;
    let stdout = runner.run_checked(
        "git",
        &["-C", dir, "show", "--no-patch", "--pretty=format:%an", hash],
    )?;
    Ok(stdout.trim().to_lowercase())
}

pub fn shortstat_of(runner: &dyn CommandRunner, repo: &Path, hash: &str) -> Result<String> {
    let dir = repo_arg(repo)?;
    runner.run_checked("git", &["-C", dir, "show", "--shortstat", "--format=", hash])
}

/// Reads hash, author and insertions of every commit in one pass.
///
/// `--cc` makes merges report the same shortstat `git show` prints for them.
pub fn read_history_batched(runner: &dyn CommandRunner, repo: &Path) -> Result<Vec<CommitRecord>> {
    let dir = repo_arg(repo)?;
    let stdout = runner.run_checked(
        "git",
        &[
            "-C",
            dir,
            "log",
            "--all",
            "--cc",
            "--format=%x1e%H%x1f%an",
            "--shortstat",
        ],
    )?;
    parse_batched_log(&stdout)
}

pub fn parse_batched_log(text: &str) -> Result<Vec<CommitRecord>> {
    text.split(RECORD_SEP)
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| {
            let (header, body) = chunk.split_once('\n').unwrap_or((chunk, ""));
            let (hash, author) = header
                .split_once(FIELD_SEP)
                .ok_or_else(|| LocError::Parse(format!("Malformed log record: {header:?}")))?;
            Ok(CommitRecord {
                hash: hash.trim().to_string(),
                author_name: author.trim().to_lowercase(),
                insertions: sum_insertions(body),
            })
        })
        .collect()
}

fn repo_arg(repo: &Path) -> Result<&str> {
    repo.to_str()
        .ok_or_else(|| LocError::GitRepo(format!("Non UTF-8 path: {}", repo.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::scripted::ScriptedRunner;
    use pretty_assertions::assert_eq;

    const REPO: &str = "/tmp/clone";

    fn filter() -> AuthorFilter {
        AuthorFilter::new(["yunjin", "yoonjin", "gg582"])
    }

    fn scripted_history() -> ScriptedRunner {
        ScriptedRunner::new()
            .ok("git -C /tmp/clone log --all", "aaa\nbbb\nccc\nddd")
            .ok("git -C /tmp/clone show --no-patch --pretty=format:%an aaa", "Yoon-Jin Kim\n")
            .ok("git -C /tmp/clone show --no-patch --pretty=format:%an bbb", "Someoneelse\n")
            .ok("git -C /tmp/clone show --no-patch --pretty=format:%an ccc", "gg582")
            .ok("git -C /tmp/clone show --no-patch --pretty=format:%an ddd", "YUNJIN")
            .ok(
                "git -C /tmp/clone show --shortstat --format= aaa",
                "\n 2 files changed, 40 insertions(+), 3 deletions(-)\n",
            )
            .ok(
                "git -C /tmp/clone show --shortstat --format= bbb",
                " 1 file changed, 999 insertions(+)\n",
            )
            .ok(
                "git -C /tmp/clone show --shortstat --format= ccc",
                " 1 file changed, 1 insertion(+)\n",
            )
            .ok(
                "git -C /tmp/clone show --shortstat --format= ddd",
                " 1 file changed, 5 deletions(-)\n",
            )
    }

    #[test]
    fn sums_only_matching_authors() {
        let runner = scripted_history();
        let total = try_count_insertions(
            &runner,
            Path::new(REPO),
            &filter(),
            WalkStrategy::PerCommit,
            &ProgressBar::hidden(),
        )
        .unwrap();
        assert_eq!(total, 41);
        assert!(runner
            .calls_matching("git -C /tmp/clone show --shortstat --format= bbb")
            .is_empty());
    }

    #[test]
    fn records_keep_lowercased_author() {
        let runner = scripted_history();
        let records =
            walk_per_commit(&runner, Path::new(REPO), &filter(), &ProgressBar::hidden()).unwrap();
        let authors: Vec<_> = records.iter().map(|r| r.author_name.as_str()).collect();
        assert_eq!(authors, vec!["yoon-jin kim", "gg582", "yunjin"]);
        assert_eq!(records[2].insertions, 0);
    }

    #[test]
    fn failing_git_call_counts_as_zero() {
        let runner = ScriptedRunner::new()
            .ok("git -C /tmp/clone log --all", "aaa")
            .fail("git -C /tmp/clone show", "fatal: bad object aaa");
        let total = count_insertions(
            &runner,
            Path::new(REPO),
            &filter(),
            WalkStrategy::PerCommit,
            &ProgressBar::hidden(),
        );
        assert_eq!(total, 0);
    }

    #[test]
    fn empty_history_counts_as_zero() {
        let runner = ScriptedRunner::new().ok("git -C /tmp/clone log --all", "");
        let total = try_count_insertions(
            &runner,
            Path::new(REPO),
            &filter(),
            WalkStrategy::PerCommit,
            &ProgressBar::hidden(),
        )
        .unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn parses_batched_log() {
        let text = "\u{1e}aaa\u{1f}Yoon-Jin Kim\n\n 2 files changed, 40 insertions(+), 3 deletions(-)\n\
                    \u{1e}bbb\u{1f}Someoneelse\n\n 1 file changed, 9 insertions(+)\n\
                    \u{1e}ccc\u{1f}gg582\n";
        let records = parse_batched_log(text).unwrap();
        assert_eq!(
            records,
            vec![
                CommitRecord {
                    hash: "aaa".into(),
                    author_name: "yoon-jin kim".into(),
                    insertions: 40
                },
                CommitRecord {
                    hash: "bbb".into(),
                    author_name: "someoneelse".into(),
                    insertions: 9
                },
                CommitRecord {
                    hash: "ccc".into(),
                    author_name: "gg582".into(),
                    insertions: 0
                },
            ]
        );
    }

    #[test]
    fn batched_strategy_filters_authors() {
        let runner = ScriptedRunner::new().ok(
            "git -C /tmp/clone log --all --cc --format=%x1e%H%x1f%an --shortstat",
            "\u{1e}aaa\u{1f}Yoon-Jin Kim\n\n 1 file changed, 40 insertions(+)\n\
             \u{1e}bbb\u{1f}Someoneelse\n\n 1 file changed, 9 insertions(+)\n",
        );
        let total = try_count_insertions(
            &runner,
            Path::new(REPO),
            &filter(),
            WalkStrategy::Batched,
            &ProgressBar::hidden(),
        )
        .unwrap();
        assert_eq!(total, 40);
    }

    #[test]
    fn malformed_batched_record_is_an_error() {
        assert!(parse_batched_log("\u{1e}no-separator-here\n").is_err());
    }
}
