use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LocError>;

#[derive(Error, Debug)]
pub enum LocError {
    #[error("Git error: {0}")]
    Git(#[from] Box<gix::open::Error>),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Report not found at {}; run `locbadge count` first", .0.display())]
    MissingReport(PathBuf),
    #[error("Repository name `{0}` collides with the reserved total key")]
    ReservedName(String),
}

impl From<gix::open::Error> for LocError {
    fn from(err: gix::open::Error) -> Self {
        LocError::Git(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for LocError {
    fn from(err: gix::object::commit::Error) -> Self {
        LocError::GitRepo(err.to_string())
    }
}

impl From<gix::object::find::existing::Error> for LocError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        LocError::GitRepo(err.to_string())
    }
}
