use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The only container accepted as input
pub const INPUT_EXTENSION: &str = "mkv";

/// Suffix appended to the input stem for the output file
pub const OUTPUT_SUFFIX: &str = "_converted";

/// Check if a path has the `.mkv` extension (case-insensitive)
pub fn is_mkv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(INPUT_EXTENSION))
}

/// Scan a directory recursively for .mkv files and invoke a callback for each file found
pub fn scan_streaming<F>(root: &Path, mut on_file: F) -> Result<()>
where
    F: FnMut(PathBuf),
{
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && is_mkv_file(path) {
            on_file(path.to_path_buf());
        }
    }

    Ok(())
}

/// Scan a directory recursively for .mkv files
pub fn scan(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    scan_streaming(root, |path| files.push(path))?;
    Ok(files)
}

/// Turn user-supplied paths into queue entries: directories are scanned,
/// files must carry the .mkv extension.
pub fn expand_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            files.extend(scan(path)?);
        } else if !is_mkv_file(path) {
            bail!("Not an MKV file: {}", path.display());
        } else if !path.exists() {
            bail!("File not found: {}", path.display());
        } else {
            files.push(path.clone());
        }
    }

    Ok(files)
}

/// `<output_dir>/<input stem>_converted.mp4`
pub fn derive_output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());

    output_dir.join(format!("{}{}.mp4", stem, OUTPUT_SUFFIX))
}
