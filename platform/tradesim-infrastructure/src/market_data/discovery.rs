use std::fs;
use std::path::{Path, PathBuf};

const PRICE_FILE_EXTENSIONS: [&str; 2] = [".csv", ".parquet"];

/// Resolves the price file for `symbol`.
///
/// A file path is returned unchanged. For a directory, the first `.csv` or
/// `.parquet` entry (by file name) whose lower-cased name contains the
/// lower-cased symbol wins.
pub fn find_instrument_file(path: &Path, symbol: &str) -> Result<PathBuf, String> {
    if !path.is_dir() {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(format!("price data path not found: {}", path.display()));
    }

    let needle = symbol.to_lowercase();
    let entries = fs::read_dir(path)
        .map_err(|err| format!("failed to read data dir {}: {}", path.display(), err))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|err| format!("failed to read data dir {}: {}", path.display(), err))?;
        let name = entry.file_name().to_string_lossy().to_lowercase();
        let supported = PRICE_FILE_EXTENSIONS.iter().any(|ext| name.ends_with(ext));
        if name.contains(&needle) && supported && entry.path().is_file() {
            candidates.push(entry.path());
        }
    }
    candidates.sort();

    candidates.into_iter().next().ok_or_else(|| {
        format!(
            "no .csv or .parquet file containing '{}' found in {}",
            needle,
            path.display()
        )
    })
}
