use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::models::JobRecord;

/// Reads a saved `/api/jobs` response: a JSON array of job records.
pub fn load_records(path: &Path) -> Result<Vec<JobRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read jobs file: {}", path.display()))?;
    let jobs = parse_records(&content)
        .with_context(|| format!("Failed to parse jobs file: {}", path.display()))?;
    info!(count = jobs.len(), path = %path.display(), "loaded jobs");
    Ok(jobs)
}

pub fn parse_records(content: &str) -> Result<Vec<JobRecord>> {
    let jobs: Vec<JobRecord> = serde_json::from_str(content)?;
    Ok(jobs)
}
