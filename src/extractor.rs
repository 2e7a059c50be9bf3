//! Extraction of i18n messages from the component templates of a program.
//!
//! The `Extractor` walks every source file of the program, normalizes all of
//! its components concurrently and feeds the resulting templates into a
//! fresh `MessageBundle`.
//!
//! # Failure model
//!
//! - Infrastructure failures (unreadable metadata, invalid modules, missing
//!   template resources) abort the run with an `ExtractError`.
//! - Malformed templates do not abort anything: their errors are collected
//!   across all files and returned as `Extraction::TemplateErrors`.
//!
//! In both cases no partial bundle is handed out.

use std::{fmt, str::FromStr, sync::Arc};

use futures::future::join_all;
use thiserror::Error;
use tracing::debug;

use crate::core::{
    AnalysisError, AnalyzeOptions, CompileMetadataResolver, CompilerConfig, CompilerHost,
    CompilerOptions, DirectiveNormalizer, ElementSchemaRegistry, MessageBundle,
    MetadataError, MetadataReflectorHost, MetadataResolver, NormalizationError,
    NormalizedComponent, Program, ReflectionError, ReflectorHost, ResourceLoader, SourceFile,
    StaticReflector, TemplateError, TemplateNormalizer, UrlResolver, analyze_modules,
    extract_program_symbols, html::HtmlParser, i18n::ImplicitAttrs,
};

/// Translation file formats a bundle can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationsFormat {
    Xliff,
    Xmb,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported translations format '{0}', expected 'xlf' or 'xmb'")]
pub struct UnsupportedFormatError(pub String);

impl FromStr for TranslationsFormat {
    type Err = UnsupportedFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlf" | "xliff" => Ok(TranslationsFormat::Xliff),
            "xmb" => Ok(TranslationsFormat::Xmb),
            _ => Err(UnsupportedFormatError(s.to_string())),
        }
    }
}

impl fmt::Display for TranslationsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationsFormat::Xliff => write!(f, "xlf"),
            TranslationsFormat::Xmb => write!(f, "xmb"),
        }
    }
}

/// Failures that abort an extraction run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Reflection(#[from] ReflectionError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
}

/// Outcome of a run that got through every template.
#[derive(Debug)]
pub enum Extraction {
    Bundle(MessageBundle),
    /// Every template error of the run, in file then component order.
    TemplateErrors(Vec<TemplateError>),
}

impl Extraction {
    pub fn into_result(self) -> Result<MessageBundle, AggregateExtractionError> {
        match self {
            Extraction::Bundle(bundle) => Ok(bundle),
            Extraction::TemplateErrors(errors) => Err(AggregateExtractionError { errors }),
        }
    }
}

/// All template errors of a run as a single failure.
///
/// Displays as the errors joined by newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateExtractionError {
    pub errors: Vec<TemplateError>,
}

impl fmt::Display for AggregateExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("\n"))
    }
}

impl std::error::Error for AggregateExtractionError {}

/// Everything an `Extractor` is made of.
pub struct ExtractorParts {
    pub options: CompilerOptions,
    pub translations_format: TranslationsFormat,
    pub program: Program,
    pub reflector: Arc<StaticReflector>,
    pub reflector_host: Arc<dyn ReflectorHost>,
    pub metadata_resolver: Arc<dyn MetadataResolver>,
    pub directive_normalizer: Arc<dyn DirectiveNormalizer>,
    pub html_parser: HtmlParser,
    pub implicit_tags: Vec<String>,
    pub implicit_attrs: ImplicitAttrs,
}

pub struct Extractor {
    options: CompilerOptions,
    translations_format: TranslationsFormat,
    program: Program,
    reflector: Arc<StaticReflector>,
    reflector_host: Arc<dyn ReflectorHost>,
    metadata_resolver: Arc<dyn MetadataResolver>,
    directive_normalizer: Arc<dyn DirectiveNormalizer>,
    html_parser: HtmlParser,
    implicit_tags: Vec<String>,
    implicit_attrs: ImplicitAttrs,
}

impl Extractor {
    pub fn from_parts(parts: ExtractorParts) -> Self {
        Self {
            options: parts.options,
            translations_format: parts.translations_format,
            program: parts.program,
            reflector: parts.reflector,
            reflector_host: parts.reflector_host,
            metadata_resolver: parts.metadata_resolver,
            directive_normalizer: parts.directive_normalizer,
            html_parser: parts.html_parser,
            implicit_tags: parts.implicit_tags,
            implicit_attrs: parts.implicit_attrs,
        }
    }

    /// Wire up the default collaborators.
    ///
    /// Without a `reflector_host`, metadata sidecars are read through
    /// `compiler_host`. The bundle gets no implicit tags or attributes.
    pub fn create(
        options: CompilerOptions,
        translations_format: &str,
        program: Program,
        compiler_host: Arc<dyn CompilerHost>,
        resource_loader: Arc<dyn ResourceLoader>,
        reflector_host: Option<Arc<dyn ReflectorHost>>,
    ) -> Result<Self, UnsupportedFormatError> {
        let translations_format: TranslationsFormat = translations_format.parse()?;
        let html_parser = HtmlParser::new();
        let url_resolver = UrlResolver::new();
        let reflector_host: Arc<dyn ReflectorHost> = match reflector_host {
            Some(host) => host,
            None => Arc::new(MetadataReflectorHost::new(compiler_host)),
        };
        let reflector = Arc::new(StaticReflector::new(reflector_host.clone()));
        let config = CompilerConfig::offline(&options);
        let normalizer = TemplateNormalizer::new(resource_loader, url_resolver, html_parser, config);
        let element_schema_registry = ElementSchemaRegistry::new();
        let resolver = CompileMetadataResolver::new(reflector.clone(), element_schema_registry);

        Ok(Self::from_parts(ExtractorParts {
            options,
            translations_format,
            program,
            reflector,
            reflector_host,
            metadata_resolver: Arc::new(resolver),
            directive_normalizer: Arc::new(normalizer),
            html_parser,
            implicit_tags: Vec::new(),
            implicit_attrs: ImplicitAttrs::new(),
        }))
    }

    pub fn translations_format(&self) -> TranslationsFormat {
        self.translations_format
    }

    /// Run one extraction pass over the whole program.
    ///
    /// Every call starts from an empty bundle, so repeated calls over
    /// unchanged inputs produce the same messages.
    pub async fn extract(&self) -> Result<Extraction, ExtractError> {
        let program_symbols = extract_program_symbols(
            &self.program,
            &self.reflector,
            self.reflector_host.as_ref(),
            &self.options,
        )?;
        let analyzed = analyze_modules(
            &program_symbols,
            &AnalyzeOptions {
                transitive_modules: true,
            },
            self.metadata_resolver.as_ref(),
        )?;

        let mut pending = Vec::with_capacity(analyzed.files.len());
        for file in &analyzed.files {
            let mut components = Vec::new();
            for directive in &file.directives {
                let descriptor = self.metadata_resolver.directive_metadata(directive)?;
                if descriptor.is_component {
                    components.push(descriptor);
                }
            }
            pending.push((file, components));
        }

        // All components of all files are normalized concurrently. Each file
        // joins its own components; the outer join waits for every file.
        let settled = join_all(pending.iter().map(|(file, components)| async move {
            let results = join_all(
                components
                    .iter()
                    .map(|component| self.directive_normalizer.normalize_directive(component)),
            )
            .await;
            debug!("Normalized {} component(s) of {}", results.len(), file.src_url);
            (*file, results)
        }))
        .await;

        let batches = settled
            .into_iter()
            .map(|(file, results)| {
                results
                    .into_iter()
                    .collect::<Result<Vec<_>, _>>()
                    .map(|components| (file, components))
            })
            .collect::<Result<Vec<(&SourceFile, Vec<NormalizedComponent>)>, _>>()?;

        let mut bundle = self.new_bundle();
        let mut errors = Vec::new();
        for (file, components) in &batches {
            for component in components {
                errors.extend(bundle.update_from_template(
                    &component.template,
                    &file.src_url,
                    &component.interpolation,
                ));
            }
        }

        if errors.is_empty() {
            debug!("Extracted {} message(s)", bundle.len());
            Ok(Extraction::Bundle(bundle))
        } else {
            debug!("Extraction found {} template error(s)", errors.len());
            Ok(Extraction::TemplateErrors(errors))
        }
    }

    fn new_bundle(&self) -> MessageBundle {
        MessageBundle::new(
            self.html_parser,
            self.implicit_tags.clone(),
            self.implicit_attrs.clone(),
        )
    }
}
