//! Writing the rendered collection to disk.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use tokio::fs;

/// File extension of request collection files
pub const HTTP_EXTENSION: &str = "http";

/// `{source_name}.http` inside `dir`
pub fn default_output_path(dir: &Path, source_name: &str) -> PathBuf {
    dir.join(format!("{source_name}.{HTTP_EXTENSION}"))
}

/// Write `text` to `path`, or to `{source_name}.http` in the current
/// directory when no path is given. Existing files are overwritten.
pub async fn write_output(
    path: Option<&Path>,
    source_name: &str,
    text: &str,
) -> crate::Result<PathBuf> {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => default_output_path(&std::env::current_dir()?, source_name),
    };

    fs::write(&target, text).await?;
    log::debug!("Wrote {} byte(s) to {}", text.len(), target.display());
    Ok(target)
}
