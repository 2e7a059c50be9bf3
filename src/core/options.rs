/// Options of the compiler driving an extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Directory holding generated sources, skipped during symbol extraction.
    pub gen_dir: Option<String>,
    /// Enable debug information in generated code.
    pub debug: bool,
}
