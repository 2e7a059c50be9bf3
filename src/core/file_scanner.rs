use std::path::{Path, PathBuf};

use glob::{Pattern, glob};
use tracing::warn;
use walkdir::WalkDir;

use super::resource::to_project_path;

pub const TEST_FILE_PATTERNS: &[&str] = &["**/*.spec.ts", "**/*.test.ts", "**/__tests__/**"];

const SOURCE_EXTENSION: &str = ".ts";
const DECLARATION_EXTENSION: &str = ".d.ts";

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning source files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Project-relative source paths, sorted.
    pub files: Vec<String>,
    pub skipped_count: usize,
}

pub fn scan_source_files(
    base_dir: &Path,
    includes: &[String],
    ignore_patterns: &[String],
    ignore_test_files: bool,
) -> ScanResult {
    let mut files = Vec::new();
    let mut skipped_count = 0;

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => warn!("Invalid ignore pattern '{}': {}", p, e),
            }
        } else {
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    if ignore_test_files {
        glob_patterns.extend(TEST_FILE_PATTERNS.iter().filter_map(|p| Pattern::new(p).ok()));
    }

    let dirs_to_scan: Vec<PathBuf> = if includes.is_empty() {
        vec![base_dir.to_path_buf()]
    } else {
        let mut paths = Vec::new();
        for inc in includes {
            if is_glob_pattern(inc) {
                let full_pattern = base_dir.join(inc);
                match glob(&full_pattern.to_string_lossy()) {
                    Ok(entries) => paths.extend(entries.flatten().filter(|entry| entry.is_dir())),
                    Err(e) => warn!("Invalid glob pattern '{}': {}", inc, e),
                }
            } else {
                let path = base_dir.join(inc);
                if path.exists() {
                    paths.push(path);
                } else {
                    warn!("Include path does not exist: {}", path.display());
                }
            }
        }
        paths
    };

    for dir in dirs_to_scan {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    warn!("Cannot access path: {}", e);
                    continue;
                }
            };
            let path = entry.path();
            let project_path = to_project_path(base_dir, path);

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }
            if glob_patterns.iter().any(|p| p.matches(&project_path)) {
                continue;
            }

            if entry.file_type().is_file()
                && project_path.ends_with(SOURCE_EXTENSION)
                && !project_path.ends_with(DECLARATION_EXTENSION)
            {
                files.push(project_path);
            }
        }
    }

    files.sort();
    files.dedup();
    ScanResult {
        files,
        skipped_count,
    }
}
