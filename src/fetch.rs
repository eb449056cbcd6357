use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Return the cached documentation page, downloading it first if the cache is absent.
///
/// Once written, the snapshot is never refreshed by this function.
pub fn load_or_fetch(url: &str, cache_path: &Path) -> Result<String> {
    if cache_path.exists() {
        info!("Using cached documentation: {}", cache_path.display());
        return fs::read_to_string(cache_path)
            .with_context(|| format!("Failed to read {}", cache_path.display()));
    }

    info!("Fetching documentation: {}", url);
    let html = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.text())
        .with_context(|| format!("Failed to fetch {}", url))?;

    if let Some(parent) = cache_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(cache_path, &html)
        .with_context(|| format!("Failed to cache {}", cache_path.display()))?;
    info!("Cached {} bytes at {}", html.len(), cache_path.display());

    Ok(html)
}
