//! Parsing of git's human-readable `--shortstat` summary, e.g.
//! ` 3 files changed, 12 insertions(+), 4 deletions(-)`.
//!
//! This is the only place that knows the textual format.

/// Extracts the insertion count from one shortstat line, if present.
pub fn parse_insertion_count(line: &str) -> Option<u64> {
    line.trim()
        .split(", ")
        .map(str::trim)
        .find_map(|part| {
            let rest = part
                .strip_suffix(" insertions(+)")
                .or_else(|| part.strip_suffix(" insertion(+)"))?;
            rest.trim().parse().ok()
        })
}

/// Sums insertion counts over every summary line in `text`. Text without a
/// summary line contributes 0.
pub fn sum_insertions(text: &str) -> u64 {
    text.lines().filter_map(parse_insertion_count).sum()
}
