//! Zone list input.
//!
//! Bulk mode reads one zone per line. Blank lines and `#` comments are
//! skipped, and lines that are not valid zone names are logged and dropped.

use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::dns::Zone;

/// Parses zone names from already-read lines.
pub fn parse_zone_lines<I, S>(lines: I) -> Vec<Zone>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_line(line.as_ref()))
        .collect()
}

fn parse_line(line: &str) -> Option<Zone> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    match Zone::new(trimmed) {
        Ok(zone) => Some(zone),
        Err(e) => {
            warn!("Skipping invalid zone {trimmed:?}: {e}");
            None
        }
    }
}

/// Reads the zone list at `path`, or stdin when `path` is `-`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub async fn read_zones(path: &Path) -> Result<Vec<Zone>> {
    if path.as_os_str() == "-" {
        info!("Reading zones from stdin");
        return read_from(tokio::io::stdin()).await;
    }

    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open input file {}", path.display()))?;
    let zones = read_from(file)
        .await
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    info!("Total zones in {}: {}", path.display(), zones.len());
    Ok(zones)
}

async fn read_from<R>(reader: R) -> Result<Vec<Zone>>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut zones = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if let Some(zone) = parse_line(&line) {
            zones.push(zone);
        }
    }
    Ok(zones)
}
