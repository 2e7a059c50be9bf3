use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;
use tracing::debug;

use super::{
    host::ReflectorHost,
    options::CompilerOptions,
    reflector::{ReflectionError, StaticReflector},
    symbols::StaticSymbol,
};

/// Files produced by earlier compilation steps.
static GENERATED_FILE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.ngfactory\.ts$|\.ngstyle\.ts$|\.css\.shim\.ts$").unwrap());

/// The set of source files being compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    source_files: Vec<String>,
}

impl Program {
    pub fn new(mut source_files: Vec<String>) -> Self {
        source_files.sort();
        source_files.dedup();
        Self { source_files }
    }

    pub fn source_files(&self) -> &[String] {
        &self.source_files
    }
}

fn is_generated(file_path: &str, options: &CompilerOptions) -> bool {
    let in_gen_dir = options.gen_dir.as_deref().is_some_and(|gen_dir| {
        let gen_dir = gen_dir.trim_start_matches("./").trim_end_matches('/');
        !gen_dir.is_empty()
            && file_path
                .strip_prefix(gen_dir)
                .is_some_and(|rest| rest.starts_with('/'))
    });
    in_gen_dir || GENERATED_FILE_REGEX.is_match(file_path)
}

/// Enumerate every annotated symbol declared by the program's source files.
///
/// Metadata is read in parallel through `reflector_host` and handed to the
/// reflector's cache. Symbols come out in file order, then name order.
pub fn extract_program_symbols(
    program: &Program,
    reflector: &StaticReflector,
    reflector_host: &dyn ReflectorHost,
    options: &CompilerOptions,
) -> Result<Vec<StaticSymbol>, ReflectionError> {
    let loaded: Vec<_> = program
        .source_files()
        .par_iter()
        .filter(|file| !is_generated(file, options))
        .map(|file| (file, reflector_host.get_metadata_for(file)))
        .collect();

    let mut symbols = Vec::new();
    for (file, metadata) in loaded {
        let Some(metadata) = reflector.remember(file, metadata?) else {
            continue;
        };
        symbols.extend(
            metadata
                .symbols
                .keys()
                .map(|name| reflector.static_symbol(file, name)),
        );
    }

    debug!(
        "Found {} symbol(s) in {} source file(s)",
        symbols.len(),
        program.source_files().len()
    );
    Ok(symbols)
}
