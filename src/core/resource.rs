use std::{
    io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

static URL_SCHEME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:").unwrap());

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Resource not found: {url}")]
    NotFound { url: String },
    #[error("Failed to load resource {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: io::Error,
    },
}

/// Loads template and stylesheet resources.
#[async_trait]
pub trait ResourceLoader: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, ResourceError>;
}

/// Reads resources from disk, relative to a project root.
#[derive(Debug, Clone)]
pub struct FsResourceLoader {
    root: PathBuf,
}

impl FsResourceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ResourceLoader for FsResourceLoader {
    async fn get(&self, url: &str) -> Result<String, ResourceError> {
        let path = self.root.join(url);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => ResourceError::NotFound {
                    url: url.to_string(),
                },
                _ => ResourceError::Io {
                    url: url.to_string(),
                    source,
                },
            })
    }
}

/// Resolves resource urls against the file that references them.
///
/// Paths are project-relative and use `/` separators. Urls carrying a scheme
/// are returned untouched; urls starting with `/` are project-absolute.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlResolver;

impl UrlResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, base_url: &str, url: &str) -> String {
        if URL_SCHEME_REGEX.is_match(url) {
            return url.to_string();
        }
        if let Some(absolute) = url.strip_prefix('/') {
            return normalize_segments(absolute.split('/'));
        }

        let base_dir = match base_url.rsplit_once('/') {
            Some((dir, _)) => dir,
            None => "",
        };
        normalize_segments(base_dir.split('/').chain(url.split('/')))
    }
}

fn normalize_segments<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    let mut out: Vec<&str> = Vec::new();
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out.join("/")
}

/// Convert a path below `root` to the project-relative `/`-separated form.
pub fn to_project_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
