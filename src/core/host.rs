use std::{fs, io, path::PathBuf, sync::Arc};

use super::{
    reflector::ReflectionError,
    resource::UrlResolver,
    symbols::ModuleMetadata,
};

const SOURCE_EXTENSION: &str = ".ts";
const METADATA_EXTENSION: &str = ".metadata.json";

/// File system access for the program being compiled.
///
/// Paths are project-relative with `/` separators.
pub trait CompilerHost: Send + Sync {
    fn read_file(&self, path: &str) -> io::Result<String>;
    fn file_exists(&self, path: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct FsCompilerHost {
    root: PathBuf,
}

impl FsCompilerHost {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CompilerHost for FsCompilerHost {
    fn read_file(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(self.root.join(path))
    }

    fn file_exists(&self, path: &str) -> bool {
        self.root.join(path).is_file()
    }
}

/// Supplies static metadata to the reflector.
pub trait ReflectorHost: Send + Sync {
    /// Metadata declared by `file_path`, `None` when it declares nothing.
    fn get_metadata_for(&self, file_path: &str) -> Result<Option<ModuleMetadata>, ReflectionError>;

    /// Resolve a module specifier used in `containing_file` to a source file.
    fn resolve_module(&self, module: &str, containing_file: &str) -> Option<String>;
}

/// Reflector host reading `*.metadata.json` sidecars through a compiler host.
pub struct MetadataReflectorHost {
    compiler_host: Arc<dyn CompilerHost>,
    url_resolver: UrlResolver,
}

impl MetadataReflectorHost {
    pub fn new(compiler_host: Arc<dyn CompilerHost>) -> Self {
        Self {
            compiler_host,
            url_resolver: UrlResolver::new(),
        }
    }
}

pub fn metadata_path(source_path: &str) -> String {
    let stem = source_path
        .strip_suffix(SOURCE_EXTENSION)
        .unwrap_or(source_path);
    format!("{}{}", stem, METADATA_EXTENSION)
}

impl ReflectorHost for MetadataReflectorHost {
    fn get_metadata_for(&self, file_path: &str) -> Result<Option<ModuleMetadata>, ReflectionError> {
        let path = metadata_path(file_path);
        if !self.compiler_host.file_exists(&path) {
            return Ok(None);
        }
        let content = self
            .compiler_host
            .read_file(&path)
            .map_err(|source| ReflectionError::Read {
                path: path.clone(),
                source,
            })?;
        let metadata = serde_json::from_str(&content)
            .map_err(|source| ReflectionError::Parse { path, source })?;
        Ok(Some(metadata))
    }

    fn resolve_module(&self, module: &str, containing_file: &str) -> Option<String> {
        if !module.starts_with('.') {
            return None;
        }
        let resolved = self.url_resolver.resolve(containing_file, module);
        [
            resolved.clone(),
            format!("{}{}", resolved, SOURCE_EXTENSION),
            format!("{}/index{}", resolved, SOURCE_EXTENSION),
        ]
        .into_iter()
        .find(|candidate| {
            candidate.ends_with(SOURCE_EXTENSION) && self.compiler_host.file_exists(candidate)
        })
    }
}
