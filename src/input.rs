use std::fs;
use std::path::Path;

use crate::errors::Result;

/// Read image references from a text file, one URL or local path per line.
/// Blank lines and surrounding whitespace are skipped.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
