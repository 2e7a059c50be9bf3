use std::sync::{Arc, LazyLock};

use regex::Regex;
use thiserror::Error;

use super::{
    compiler_config::ViewEncapsulation,
    interpolation::{InterpolationConfig, InterpolationError},
    reflector::{ReflectionError, StaticReflector},
    schema::ElementSchemaRegistry,
    symbols::{StaticSymbol, SymbolMetadata},
};

/// A selector made of a single element name.
static ELEMENT_SELECTOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9\-]*$").unwrap());

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error(transparent)]
    Reflection(#[from] ReflectionError),
    #[error("{symbol} is not a directive")]
    NotADirective { symbol: StaticSymbol },
    #[error("{symbol} is not an NgModule")]
    NotAModule { symbol: StaticSymbol },
    #[error("Unexpected value '{value}' declared by the module '{module}'")]
    UnexpectedDeclaration { value: String, module: String },
    #[error("Unexpected value '{value}' imported by the module '{module}'")]
    UnexpectedImport { value: String, module: String },
    #[error("Unexpected value '{value}' exported by the module '{module}'")]
    UnexpectedExport { value: String, module: String },
    #[error("Invalid interpolation of {symbol}: {source}")]
    Interpolation {
        symbol: StaticSymbol,
        #[source]
        source: InterpolationError,
    },
    #[error("Selector '{selector}' of component {symbol} shadows a native element")]
    NativeElementSelector {
        selector: String,
        symbol: StaticSymbol,
    },
    #[error("No template specified for component {symbol}")]
    MissingTemplate { symbol: StaticSymbol },
}

/// Template-related metadata of a component, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMetadata {
    pub template: Option<String>,
    pub template_url: Option<String>,
    pub styles: Vec<String>,
    pub style_urls: Vec<String>,
    pub encapsulation: Option<ViewEncapsulation>,
    pub interpolation: InterpolationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveDescriptor {
    pub symbol: StaticSymbol,
    pub selector: Option<String>,
    pub is_component: bool,
    /// Source file of the directive; relative resource urls resolve against it.
    pub module_url: String,
    /// Present for components only.
    pub template: Option<TemplateMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgModuleDescriptor {
    pub symbol: StaticSymbol,
    pub declared_directives: Vec<StaticSymbol>,
    pub declared_pipes: Vec<StaticSymbol>,
    pub imported_modules: Vec<StaticSymbol>,
    /// Re-exported modules; exported directives and pipes are not tracked.
    pub exported_modules: Vec<StaticSymbol>,
}

/// Resolves symbols to directive and module descriptors.
pub trait MetadataResolver: Send + Sync {
    fn directive_metadata(&self, symbol: &StaticSymbol) -> Result<DirectiveDescriptor, MetadataError>;
    fn ng_module_metadata(&self, symbol: &StaticSymbol) -> Result<NgModuleDescriptor, MetadataError>;
    fn is_directive(&self, symbol: &StaticSymbol) -> bool;
    fn is_pipe(&self, symbol: &StaticSymbol) -> bool;
    fn is_ng_module(&self, symbol: &StaticSymbol) -> bool;
}

/// Metadata resolver backed by the static reflector.
pub struct CompileMetadataResolver {
    reflector: Arc<StaticReflector>,
    schema_registry: ElementSchemaRegistry,
}

impl CompileMetadataResolver {
    pub fn new(reflector: Arc<StaticReflector>, schema_registry: ElementSchemaRegistry) -> Self {
        Self {
            reflector,
            schema_registry,
        }
    }

    fn annotation(&self, symbol: &StaticSymbol) -> Option<SymbolMetadata> {
        self.reflector.annotation(symbol).ok().flatten()
    }
}

impl MetadataResolver for CompileMetadataResolver {
    fn directive_metadata(&self, symbol: &StaticSymbol) -> Result<DirectiveDescriptor, MetadataError> {
        let descriptor = match self.reflector.annotation(symbol)? {
            Some(SymbolMetadata::Directive(directive)) => DirectiveDescriptor {
                symbol: symbol.clone(),
                selector: directive.selector,
                is_component: false,
                module_url: symbol.file_path.clone(),
                template: None,
            },
            Some(SymbolMetadata::Component(component)) => {
                if let Some(selector) = &component.selector {
                    if ELEMENT_SELECTOR_REGEX.is_match(selector)
                        && self.schema_registry.has_element(selector)
                    {
                        return Err(MetadataError::NativeElementSelector {
                            selector: selector.clone(),
                            symbol: symbol.clone(),
                        });
                    }
                }
                if component.template.is_none() && component.template_url.is_none() {
                    return Err(MetadataError::MissingTemplate {
                        symbol: symbol.clone(),
                    });
                }
                let interpolation =
                    InterpolationConfig::from_array(component.interpolation.as_deref())
                        .map_err(|source| MetadataError::Interpolation {
                            symbol: symbol.clone(),
                            source,
                        })?;

                DirectiveDescriptor {
                    symbol: symbol.clone(),
                    selector: component.selector,
                    is_component: true,
                    module_url: symbol.file_path.clone(),
                    template: Some(TemplateMetadata {
                        template: component.template,
                        template_url: component.template_url,
                        styles: component.styles,
                        style_urls: component.style_urls,
                        encapsulation: component.encapsulation,
                        interpolation,
                    }),
                }
            }
            _ => {
                return Err(MetadataError::NotADirective {
                    symbol: symbol.clone(),
                });
            }
        };
        Ok(descriptor)
    }

    fn ng_module_metadata(&self, symbol: &StaticSymbol) -> Result<NgModuleDescriptor, MetadataError> {
        let Some(SymbolMetadata::Module(module)) = self.reflector.annotation(symbol)? else {
            return Err(MetadataError::NotAModule {
                symbol: symbol.clone(),
            });
        };

        let mut descriptor = NgModuleDescriptor {
            symbol: symbol.clone(),
            declared_directives: Vec::new(),
            declared_pipes: Vec::new(),
            imported_modules: Vec::new(),
            exported_modules: Vec::new(),
        };

        for reference in &module.declarations {
            let declared = self.reflector.find_declaration(reference, &symbol.file_path)?;
            if self.is_directive(&declared) {
                descriptor.declared_directives.push(declared);
            } else if self.is_pipe(&declared) {
                descriptor.declared_pipes.push(declared);
            } else {
                return Err(MetadataError::UnexpectedDeclaration {
                    value: declared.name,
                    module: symbol.name.clone(),
                });
            }
        }

        for reference in &module.imports {
            let imported = self.reflector.find_declaration(reference, &symbol.file_path)?;
            if !self.is_ng_module(&imported) {
                return Err(MetadataError::UnexpectedImport {
                    value: imported.name,
                    module: symbol.name.clone(),
                });
            }
            descriptor.imported_modules.push(imported);
        }

        for reference in &module.exports {
            let exported = self.reflector.find_declaration(reference, &symbol.file_path)?;
            if self.is_ng_module(&exported) {
                descriptor.exported_modules.push(exported);
            } else if !self.is_directive(&exported) && !self.is_pipe(&exported) {
                return Err(MetadataError::UnexpectedExport {
                    value: exported.name,
                    module: symbol.name.clone(),
                });
            }
        }

        Ok(descriptor)
    }

    fn is_directive(&self, symbol: &StaticSymbol) -> bool {
        matches!(
            self.annotation(symbol),
            Some(SymbolMetadata::Component(_) | SymbolMetadata::Directive(_))
        )
    }

    fn is_pipe(&self, symbol: &StaticSymbol) -> bool {
        matches!(self.annotation(symbol), Some(SymbolMetadata::Pipe(_)))
    }

    fn is_ng_module(&self, symbol: &StaticSymbol) -> bool {
        matches!(self.annotation(symbol), Some(SymbolMetadata::Module(_)))
    }
}
