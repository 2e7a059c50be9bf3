//! Collaborators of the extraction pipeline.
//!
//! ## Module Structure
//!
//! - `analyzer`: Groups directives by source file, following module imports
//! - `compiler_config`: Compiler settings and view encapsulation
//! - `file_scanner`: Source file discovery
//! - `host`: Compiler and reflector hosts (file access, metadata sidecars)
//! - `html`: Template markup parser
//! - `i18n`: Message extraction and the message bundle
//! - `interpolation`: Interpolation delimiters
//! - `metadata`: Directive and module descriptors
//! - `normalizer`: Template and style resolution for components
//! - `options`: Compiler options
//! - `program`: Program source files and symbol enumeration
//! - `reflector`: Static symbol reflection
//! - `resource`: Resource loading and url resolution
//! - `schema`: Native element registry
//! - `source`: Source locations and template errors
//! - `symbols`: Static symbols and the metadata sidecar format

pub mod analyzer;
pub mod compiler_config;
pub mod file_scanner;
pub mod host;
pub mod html;
pub mod i18n;
pub mod interpolation;
pub mod metadata;
pub mod normalizer;
pub mod options;
pub mod program;
pub mod reflector;
pub mod resource;
pub mod schema;
pub mod source;
pub mod symbols;

pub use analyzer::{AnalysisError, AnalyzeOptions, AnalyzedModules, SourceFile, analyze_modules};
pub use compiler_config::{CompilerConfig, ViewEncapsulation};
pub use host::{CompilerHost, FsCompilerHost, MetadataReflectorHost, ReflectorHost};
pub use i18n::{Message, MessageBundle, MessagePart};
pub use interpolation::InterpolationConfig;
pub use metadata::{
    CompileMetadataResolver, DirectiveDescriptor, MetadataError, MetadataResolver,
    NgModuleDescriptor,
};
pub use normalizer::{DirectiveNormalizer, NormalizationError, NormalizedComponent, TemplateNormalizer};
pub use options::CompilerOptions;
pub use program::{Program, extract_program_symbols};
pub use reflector::{ReflectionError, StaticReflector};
pub use resource::{FsResourceLoader, ResourceError, ResourceLoader, UrlResolver};
pub use schema::ElementSchemaRegistry;
pub use source::{SourceLocation, TemplateError};
pub use symbols::StaticSymbol;
