//! Static symbols and the metadata sidecar format.
//!
//! Every source file `foo.ts` may have a `foo.metadata.json` sidecar that
//! describes the annotated symbols it declares:
//!
//! ```json
//! {
//!   "symbols": {
//!     "AppModule": { "kind": "module", "declarations": ["AppComponent"] },
//!     "AppComponent": { "kind": "component", "selector": "app-root", "template": "..." }
//!   }
//! }
//! ```

use std::{collections::BTreeMap, fmt};

use serde::Deserialize;

use crate::core::compiler_config::ViewEncapsulation;

/// Separates the module path from the symbol name in a reference.
const REFERENCE_SEPARATOR: char = '#';

/// Identity of a declared symbol: the file declaring it plus its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StaticSymbol {
    pub file_path: String,
    pub name: String,
}

impl StaticSymbol {
    pub fn new(file_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for StaticSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.name, self.file_path)
    }
}

/// A reference to a symbol as written in metadata.
///
/// `Name` refers to the containing file; `./path/to/module#Name` to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolReference<'a> {
    pub module: Option<&'a str>,
    pub name: &'a str,
}

impl<'a> SymbolReference<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw.rsplit_once(REFERENCE_SEPARATOR) {
            Some((module, name)) => Self {
                module: Some(module),
                name,
            },
            None => Self {
                module: None,
                name: raw,
            },
        }
    }
}

/// Contents of one metadata sidecar.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleMetadata {
    #[serde(default)]
    pub symbols: BTreeMap<String, SymbolMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SymbolMetadata {
    Module(NgModuleMetadata),
    Component(ComponentMetadata),
    Directive(DirectiveMetadata),
    Pipe(PipeMetadata),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NgModuleMetadata {
    #[serde(default)]
    pub declarations: Vec<String>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub exports: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveMetadata {
    pub selector: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    pub selector: Option<String>,
    pub template: Option<String>,
    pub template_url: Option<String>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub style_urls: Vec<String>,
    pub interpolation: Option<Vec<String>>,
    pub encapsulation: Option<ViewEncapsulation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipeMetadata {
    pub name: String,
}
