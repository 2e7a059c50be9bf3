use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;
use tracing::{debug, warn};

use super::{
    metadata::{MetadataError, MetadataResolver, NgModuleDescriptor},
    symbols::StaticSymbol,
};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to analyze module {module}: {source}")]
    Module {
        module: StaticSymbol,
        #[source]
        source: MetadataError,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOptions {
    /// Follow imported and re-exported modules outside the program.
    pub transitive_modules: bool,
}

/// Directives and modules declared by one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub src_url: String,
    pub directives: Vec<StaticSymbol>,
    pub ng_modules: Vec<StaticSymbol>,
}

impl SourceFile {
    fn new(src_url: &str) -> Self {
        Self {
            src_url: src_url.to_string(),
            directives: Vec::new(),
            ng_modules: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct AnalyzedModules {
    /// Files in order of first appearance while walking the modules.
    pub files: Vec<SourceFile>,
    pub ng_modules: Vec<NgModuleDescriptor>,
    /// Program directives and pipes no module declares.
    pub symbols_missing_module: Vec<StaticSymbol>,
}

/// Group the directives reachable from the program's modules by source file.
///
/// Modules are visited breadth-first starting from the program symbols, in
/// program order. A directive declared by several modules is listed once.
pub fn analyze_modules(
    program_symbols: &[StaticSymbol],
    options: &AnalyzeOptions,
    resolver: &dyn MetadataResolver,
) -> Result<AnalyzedModules, AnalysisError> {
    let ng_modules = collect_ng_modules(program_symbols, options, resolver)?;

    let mut files = FilesBuilder::default();
    let mut declared: HashSet<&StaticSymbol> = HashSet::new();
    for module in &ng_modules {
        files
            .entry(&module.symbol.file_path)
            .ng_modules
            .push(module.symbol.clone());
        for directive in &module.declared_directives {
            if declared.insert(directive) {
                files
                    .entry(&directive.file_path)
                    .directives
                    .push(directive.clone());
            }
        }
        declared.extend(&module.declared_pipes);
    }

    let symbols_missing_module: Vec<StaticSymbol> = program_symbols
        .iter()
        .filter(|symbol| resolver.is_directive(symbol) || resolver.is_pipe(symbol))
        .filter(|symbol| !declared.contains(symbol))
        .cloned()
        .collect();
    for symbol in &symbols_missing_module {
        warn!("Cannot determine the module for {}", symbol);
    }

    let files = files.finish();
    debug!(
        "Analyzed {} module(s) across {} file(s)",
        ng_modules.len(),
        files.len()
    );

    Ok(AnalyzedModules {
        files,
        ng_modules,
        symbols_missing_module,
    })
}

fn collect_ng_modules(
    program_symbols: &[StaticSymbol],
    options: &AnalyzeOptions,
    resolver: &dyn MetadataResolver,
) -> Result<Vec<NgModuleDescriptor>, AnalysisError> {
    let mut queue: VecDeque<StaticSymbol> = program_symbols
        .iter()
        .filter(|symbol| resolver.is_ng_module(symbol))
        .cloned()
        .collect();
    let mut seen = HashSet::new();
    let mut modules = Vec::new();

    while let Some(symbol) = queue.pop_front() {
        if !seen.insert(symbol.clone()) {
            continue;
        }
        let module = resolver
            .ng_module_metadata(&symbol)
            .map_err(|source| AnalysisError::Module {
                module: symbol.clone(),
                source,
            })?;
        if options.transitive_modules {
            queue.extend(
                module
                    .imported_modules
                    .iter()
                    .chain(&module.exported_modules)
                    .cloned(),
            );
        }
        modules.push(module);
    }

    Ok(modules)
}

#[derive(Default)]
struct FilesBuilder {
    files: Vec<SourceFile>,
    index: HashMap<String, usize>,
}

impl FilesBuilder {
    fn entry(&mut self, src_url: &str) -> &mut SourceFile {
        let idx = match self.index.get(src_url) {
            Some(&idx) => idx,
            None => {
                self.files.push(SourceFile::new(src_url));
                self.index.insert(src_url.to_string(), self.files.len() - 1);
                self.files.len() - 1
            }
        };
        &mut self.files[idx]
    }

    fn finish(self) -> Vec<SourceFile> {
        self.files
    }
}
