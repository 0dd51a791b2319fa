use std::path::{Path, PathBuf};

/// Output path for a converted table: `{dest}/{stem}{suffix}.csv`
pub fn output_path_for(input: &Path, destination_dir: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());

    destination_dir.join(format!("{}{}.csv", stem, suffix))
}

/// Whether a path has the given extension, ignoring case
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
