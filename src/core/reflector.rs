use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex, PoisonError},
};

use thiserror::Error;

use super::{
    host::ReflectorHost,
    symbols::{ModuleMetadata, StaticSymbol, SymbolMetadata, SymbolReference},
};

#[derive(Debug, Error)]
pub enum ReflectionError {
    #[error("Failed to read metadata file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse metadata file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Cannot resolve module '{module}' referenced from {containing_file}")]
    UnresolvedModule {
        module: String,
        containing_file: String,
    },
}

type MetadataCache = HashMap<String, Option<Arc<ModuleMetadata>>>;

/// Answers questions about symbols using static metadata only.
///
/// Metadata of each file is loaded once through the reflector host and
/// cached for the lifetime of the reflector.
pub struct StaticReflector {
    host: Arc<dyn ReflectorHost>,
    cache: Mutex<MetadataCache>,
}

impl StaticReflector {
    pub fn new(host: Arc<dyn ReflectorHost>) -> Self {
        Self {
            host,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn static_symbol(&self, file_path: &str, name: &str) -> StaticSymbol {
        StaticSymbol::new(file_path, name)
    }

    /// Seed the cache with metadata loaded elsewhere.
    pub fn remember(
        &self,
        file_path: &str,
        metadata: Option<ModuleMetadata>,
    ) -> Option<Arc<ModuleMetadata>> {
        let metadata = metadata.map(Arc::new);
        self.lock_cache()
            .insert(file_path.to_string(), metadata.clone());
        metadata
    }

    pub fn module_metadata(
        &self,
        file_path: &str,
    ) -> Result<Option<Arc<ModuleMetadata>>, ReflectionError> {
        if let Some(cached) = self.lock_cache().get(file_path) {
            return Ok(cached.clone());
        }
        let metadata = self.host.get_metadata_for(file_path)?;
        Ok(self.remember(file_path, metadata))
    }

    /// The annotation declared for `symbol`, if any.
    pub fn annotation(&self, symbol: &StaticSymbol) -> Result<Option<SymbolMetadata>, ReflectionError> {
        let metadata = self.module_metadata(&symbol.file_path)?;
        Ok(metadata.and_then(|m| m.symbols.get(&symbol.name).cloned()))
    }

    /// Resolve a reference written inside `containing_file`.
    pub fn find_declaration(
        &self,
        reference: &str,
        containing_file: &str,
    ) -> Result<StaticSymbol, ReflectionError> {
        let SymbolReference { module, name } = SymbolReference::parse(reference);
        let file_path = match module {
            None => containing_file.to_string(),
            Some(module) => self
                .host
                .resolve_module(module, containing_file)
                .ok_or_else(|| ReflectionError::UnresolvedModule {
                    module: module.to_string(),
                    containing_file: containing_file.to_string(),
                })?,
        };
        Ok(self.static_symbol(&file_path, name))
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, MetadataCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
