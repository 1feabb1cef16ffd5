use crate::config::{Config, ListingConfig};
use crate::error::{LocError, Result};
use crate::model::RepositoryDescriptor;
use crate::runner::{CommandRunner, LiveRunner};
use tracing::{error, info};

/// Lists the public repositories of `cfg.account` that should be counted.
///
/// Any failure talking to `gh` is logged and yields an empty list; callers
/// treat that as "nothing to process".
pub fn list_repositories(runner: &dyn CommandRunner, cfg: &ListingConfig) -> Vec<String> {
    info!(account = %cfg.account, "fetching public repositories");
    match fetch_descriptors(runner, cfg) {
        Ok(descriptors) => {
            let repos = select_repositories(&descriptors, cfg);
            info!(count = repos.len(), "found public repositories");
            repos
        }
        Err(e) => {
            error!("error fetching repositories with gh CLI: {e}");
            error!("please ensure you have authenticated with `gh auth login`");
            Vec::new()
        }
    }
}

pub fn exec(config: &Config) -> anyhow::Result<()> {
    for name in list_repositories(&LiveRunner, &config.listing()) {
        println!("{name}");
    }
    Ok(())
}

pub fn fetch_descriptors(
    runner: &dyn CommandRunner,
    cfg: &ListingConfig,
) -> Result<Vec<RepositoryDescriptor>> {
    let limit = cfg.limit.to_string();
    let stdout = runner.run_checked(
        "gh",
        &[
            "repo",
            "list",
            &cfg.account,
            "--limit",
            &limit,
            "--json",
            "name,isPrivate,isFork",
        ],
    )?;
    parse_descriptors(&stdout)
}

pub fn parse_descriptors(json: &str) -> Result<Vec<RepositoryDescriptor>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(json)
        .map_err(|e| LocError::Parse(format!("Unexpected gh repo list output: {e}")))
}

/// Keeps public repositories that are not forks (unless named as the fork
/// exception) and not excluded. Order is preserved.
pub fn select_repositories(
    descriptors: &[RepositoryDescriptor],
    cfg: &ListingConfig,
) -> Vec<String> {
    descriptors
        .iter()
        .filter(|d| !d.is_private)
        .map(|d| (d.name.trim(), d.is_fork))
        .filter(|(name, _)| !name.is_empty())
        .filter(|(name, is_fork)| !is_fork || cfg.fork_exception.as_deref() == Some(*name))
        .map(|(name, _)| name)
        .filter(|name| !cfg.excluded.iter().any(|x| x.as_str() == *name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::scripted::ScriptedRunner;
    use pretty_assertions::assert_eq;

    fn repo(name: &str, is_private: bool, is_fork: bool) -> RepositoryDescriptor {
        RepositoryDescriptor {
            name: name.to_string(),
            is_private,
            is_fork,
        }
    }

    #[test]
    fn excluded_site_repo_never_reaches_counter() {
        let cfg = Config::default().listing();
        let picked = select_repositories(
            &[repo("gg582.github.io", false, false), repo("myproj", false, false)],
            &cfg,
        );
        assert_eq!(picked, vec!["myproj".to_string()]);
    }

    #[test]
    fn exclusion_is_exact_and_case_sensitive() {
        let cfg = Config::default().listing();
        let picked = select_repositories(
            &[
                repo("tk9.0", false, false),
                repo("TK9.0", false, false),
                repo("tk9.0-extras", false, false),
            ],
            &cfg,
        );
        assert_eq!(picked, vec!["TK9.0".to_string(), "tk9.0-extras".to_string()]);
    }

    #[test]
    fn private_and_forked_repos_are_skipped_except_exception() {
        let cfg = Config::default().listing();
        let picked = select_repositories(
            &[
                repo("secret", true, false),
                repo("someones-fork", false, true),
                repo("gobus", false, true),
                repo("gobus-private", true, true),
                repo("tool", false, false),
            ],
            &cfg,
        );
        assert_eq!(picked, vec!["gobus".to_string(), "tool".to_string()]);
    }

    #[test]
    fn fork_exception_and_exclusion_see_trimmed_name() {
        let cfg = Config::default().listing();
        let picked = select_repositories(
            &[
                repo(" gobus\n", false, true),
                repo("  tk9.0 ", false, false),
                repo(" tool ", false, false),
            ],
            &cfg,
        );
        assert_eq!(picked, vec!["gobus".to_string(), "tool".to_string()]);
    }

    #[test]
    fn lists_through_gh() {
        let runner = ScriptedRunner::new().ok(
            "gh repo list gg582 --limit 1000 --json name,isPrivate,isFork",
            r#"[{"name":"myproj","isPrivate":false,"isFork":false},
                {"name":"gg582.github.io","isPrivate":false,"isFork":false}]"#,
        );
        let repos = list_repositories(&runner, &Config::default().listing());
        assert_eq!(repos, vec!["myproj".to_string()]);
    }

    #[test]
    fn gh_failure_yields_empty_list() {
        let runner = ScriptedRunner::new().fail("gh repo list", "To get started with GitHub CLI, please run: gh auth login");
        let repos = list_repositories(&runner, &Config::default().listing());
        assert!(repos.is_empty());
    }

    #[test]
    fn garbage_output_yields_empty_list() {
        let runner = ScriptedRunner::new().ok("gh repo list", "myproj\nother\n");
        let repos = list_repositories(&runner, &Config::default().listing());
        assert!(repos.is_empty());
    }

    #[test]
    fn empty_output_is_no_repositories() {
        assert!(parse_descriptors("\n").unwrap().is_empty());
    }
}
