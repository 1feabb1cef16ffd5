//! Counts the lines a set of authors inserted across one account's public
//! repositories, and renders the total as an SVG badge.
//!
//! The `count` pipeline lists repositories with `gh`, shallow-clones each into
//! a scratch directory, walks `git log --all`, and writes `lines.json`. The
//! `banner` step turns that file into `banner.svg`.

pub mod banner;
pub mod cli;
pub mod config;
pub mod count;
pub mod error;
pub mod git;
pub mod model;
pub mod platform;
pub mod report;
pub mod runner;
pub mod scratch;
pub mod snapshot;
pub mod util;

pub use config::Config;
pub use error::{LocError, Result};
pub use report::LineCountReport;
