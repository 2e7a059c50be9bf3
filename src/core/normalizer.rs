use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use thiserror::Error;
use tracing::debug;

use super::{
    compiler_config::{CompilerConfig, ViewEncapsulation},
    html::{Element, HtmlParser, Node},
    interpolation::InterpolationConfig,
    metadata::DirectiveDescriptor,
    resource::{ResourceError, ResourceLoader, UrlResolver},
    symbols::StaticSymbol,
};

#[derive(Debug, Error)]
pub enum NormalizationError {
    #[error("{symbol} is not a component")]
    NotAComponent { symbol: StaticSymbol },
    #[error("Failed to normalize {symbol}: {source}")]
    Resource {
        symbol: StaticSymbol,
        #[source]
        source: ResourceError,
    },
}

/// A component whose template and styles have been fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedComponent {
    pub symbol: StaticSymbol,
    pub template: String,
    /// Resolved url of an external template.
    pub template_url: Option<String>,
    pub styles: Vec<String>,
    pub encapsulation: ViewEncapsulation,
    pub interpolation: InterpolationConfig,
}

/// Resolves a component's final template, possibly loading resources.
#[async_trait]
pub trait DirectiveNormalizer: Send + Sync {
    async fn normalize_directive(
        &self,
        directive: &DirectiveDescriptor,
    ) -> Result<NormalizedComponent, NormalizationError>;
}

/// Normalizer loading external templates and stylesheets through a
/// `ResourceLoader`.
pub struct TemplateNormalizer {
    resource_loader: Arc<dyn ResourceLoader>,
    url_resolver: UrlResolver,
    html_parser: HtmlParser,
    config: CompilerConfig,
}

impl TemplateNormalizer {
    pub fn new(
        resource_loader: Arc<dyn ResourceLoader>,
        url_resolver: UrlResolver,
        html_parser: HtmlParser,
        config: CompilerConfig,
    ) -> Self {
        Self {
            resource_loader,
            url_resolver,
            html_parser,
            config,
        }
    }

    async fn load_all(&self, urls: &[String]) -> Result<Vec<String>, ResourceError> {
        try_join_all(urls.iter().map(|url| self.resource_loader.get(url))).await
    }
}

#[async_trait]
impl DirectiveNormalizer for TemplateNormalizer {
    async fn normalize_directive(
        &self,
        directive: &DirectiveDescriptor,
    ) -> Result<NormalizedComponent, NormalizationError> {
        let symbol = &directive.symbol;
        let Some(metadata) = directive.template.as_ref().filter(|_| directive.is_component) else {
            return Err(NormalizationError::NotAComponent {
                symbol: symbol.clone(),
            });
        };
        let resource_error = |source| NormalizationError::Resource {
            symbol: symbol.clone(),
            source,
        };

        let (template, template_url) = match (&metadata.template, &metadata.template_url) {
            (Some(inline), _) => (inline.clone(), None),
            (None, Some(url)) => {
                let url = self.url_resolver.resolve(&directive.module_url, url);
                debug!("Loading template {} for {}", url, symbol);
                let template = self.resource_loader.get(&url).await.map_err(resource_error)?;
                (template, Some(url))
            }
            (None, None) => (String::new(), None),
        };

        // Styles declared inside the template itself. Parse problems are left
        // to message extraction, which reports them against the source file.
        let template_base = template_url.as_deref().unwrap_or(&directive.module_url);
        let parsed = self.html_parser.parse(&template, template_base);
        let mut template_styles = TemplateStyles::default();
        template_styles.visit(&parsed.root_nodes);

        let style_urls: Vec<String> = metadata
            .style_urls
            .iter()
            .map(|url| self.url_resolver.resolve(&directive.module_url, url))
            .chain(
                template_styles
                    .style_urls
                    .iter()
                    .map(|url| self.url_resolver.resolve(template_base, url)),
            )
            .collect();
        let loaded_styles = self.load_all(&style_urls).await.map_err(resource_error)?;

        let styles: Vec<String> = metadata
            .styles
            .iter()
            .cloned()
            .chain(template_styles.styles)
            .chain(loaded_styles)
            .collect();

        let mut encapsulation = metadata
            .encapsulation
            .unwrap_or(self.config.default_encapsulation);
        if encapsulation == ViewEncapsulation::Emulated && styles.is_empty() {
            encapsulation = ViewEncapsulation::None;
        }

        Ok(NormalizedComponent {
            symbol: symbol.clone(),
            template,
            template_url,
            styles,
            encapsulation,
            interpolation: metadata.interpolation.clone(),
        })
    }
}

/// `<style>` contents and `<link rel="stylesheet">` targets of a template.
#[derive(Default)]
struct TemplateStyles {
    styles: Vec<String>,
    style_urls: Vec<String>,
}

impl TemplateStyles {
    fn visit(&mut self, nodes: &[Node]) {
        for node in nodes {
            if let Node::Element(element) = node {
                self.visit_element(element);
            }
        }
    }

    fn visit_element(&mut self, element: &Element) {
        match element.name.to_ascii_lowercase().as_str() {
            "style" => {
                let css: String = element
                    .children
                    .iter()
                    .filter_map(|child| match child {
                        Node::Text(text) => Some(text.value.as_str()),
                        _ => None,
                    })
                    .collect();
                self.styles.push(css);
            }
            "link" => {
                let is_stylesheet = element
                    .attr("rel")
                    .is_some_and(|rel| rel.value.eq_ignore_ascii_case("stylesheet"));
                if let (true, Some(href)) = (is_stylesheet, element.attr("href")) {
                    self.style_urls.push(href.value.clone());
                }
            }
            _ => self.visit(&element.children),
        }
    }
}
