use crate::config::Config;
use crate::error::{LocError, Result};
use crate::model::TOTAL_KEY;
use crate::util::format_grouped;
use anyhow::Context;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

const SVG_TEMPLATE: &str = r##"
<svg width="400" height="100" viewBox="0 0 400 100" fill="none" xmlns="http://www.w3.org/2000/svg">
  <style>
    .bg { fill: #1C1C1C; }
    .border { stroke: #333333; }
    .title { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif; font-weight: 600; font-size: 20px; fill: #EBEBEB; }
    .stat-value { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif; font-weight: 700; font-size: 36px; fill: #A5FF24; }
    .stat-label { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif; font-weight: 400; font-size: 14px; fill: #C4C4C4; }
  </style>
  <rect x="0.5" y="0.5" width="399" height="99" rx="10" class="bg" stroke-width="1"/>
  <text x="20" y="35" class="title">Total Lines Contributed</text>
  <text x="20" y="75" class="stat-value">{total_lines}</text>
  <text x="20" y="85" class="stat-label">lines in {repo_count} public repos</text>
</svg>
"##;

/// Values substituted into the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerStats {
    pub total_lines: u64,
    pub repo_count: usize,
}

impl BannerStats {
    pub fn from_report_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let map = value
            .as_object()
            .ok_or_else(|| LocError::Parse("Report is not a JSON object".to_string()))?;

        let total_lines = match map.get(TOTAL_KEY) {
            None => 0,
            Some(v) => v.as_u64().ok_or_else(|| {
                LocError::Parse(format!("`{TOTAL_KEY}` is not a non-negative integer: {v}"))
            })?,
        };
        let repo_count = if map.contains_key(TOTAL_KEY) {
            map.len() - 1
        } else {
            map.len()
        };
        Ok(Self {
            total_lines,
            repo_count,
        })
    }
}

pub fn render_svg(stats: BannerStats) -> String {
    SVG_TEMPLATE
        .replace("{total_lines}", &format_grouped(stats.total_lines))
        .replace("{repo_count}", &stats.repo_count.to_string())
}

pub fn render_banner(report_json: &str) -> Result<String> {
    Ok(render_svg(BannerStats::from_report_json(report_json)?))
}

/// Renders `report_path` into `banner_path`. A missing report is an error
/// and nothing is written.
pub fn render_banner_file(report_path: &Path, banner_path: &Path) -> Result<BannerStats> {
    if !report_path.is_file() {
        return Err(LocError::MissingReport(report_path.to_path_buf()));
    }
    let json = fs::read_to_string(report_path)?;
    let stats = BannerStats::from_report_json(&json)?;
    if let Some(parent) = banner_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(banner_path, render_svg(stats))?;
    Ok(stats)
}

pub fn exec(config: &Config) -> anyhow::Result<()> {
    let report_path = config.report_path();
    let banner_path = config.banner_path();
    let stats = render_banner_file(&report_path, &banner_path)
        .with_context(|| format!("Failed to render banner from {}", report_path.display()))?;
    info!(
        total_lines = stats.total_lines,
        repos = stats.repo_count,
        "banner rendered"
    );
    println!("SVG banner created at {}", banner_path.display());
    Ok(())
}
