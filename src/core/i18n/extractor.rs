use std::collections::HashMap;

use super::message::{Message, MessageMeta, MessagePart};
use crate::core::{
    html::{Element, Node},
    interpolation::InterpolationConfig,
    source::{SourceLocation, TemplateError},
};

const I18N_ATTR: &str = "i18n";
const I18N_ATTR_PREFIX: &str = "i18n-";

/// Attributes translated without an explicit marker, keyed by element name.
pub type ImplicitAttrs = HashMap<String, Vec<String>>;

#[derive(Debug, Default)]
pub struct ExtractionResult {
    pub messages: Vec<Message>,
    pub errors: Vec<TemplateError>,
}

/// Collect the translatable messages of a parsed template.
///
/// An element is translatable when it carries an `i18n` attribute or its name
/// is listed in `implicit_tags`. Its whole content becomes one message, with
/// nested markup and interpolations replaced by placeholders. Attributes are
/// translatable through `i18n-<name>` markers or `implicit_attrs`.
pub fn extract_messages(
    nodes: &[Node],
    interpolation: &InterpolationConfig,
    implicit_tags: &[String],
    implicit_attrs: &ImplicitAttrs,
) -> ExtractionResult {
    let mut visitor = MessageVisitor {
        interpolation,
        implicit_tags,
        implicit_attrs,
        result: ExtractionResult::default(),
    };
    visitor.visit_nodes(nodes);
    visitor.result
}

struct MessageVisitor<'a> {
    interpolation: &'a InterpolationConfig,
    implicit_tags: &'a [String],
    implicit_attrs: &'a ImplicitAttrs,
    result: ExtractionResult,
}

impl MessageVisitor<'_> {
    fn visit_nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            if let Node::Element(element) = node {
                self.visit_element(element);
            }
        }
    }

    fn visit_element(&mut self, element: &Element) {
        self.extract_attributes(element);

        let Some(meta) = self.i18n_meta(element) else {
            self.visit_nodes(&element.children);
            return;
        };

        let mut builder = PartsBuilder::default();
        self.collect_parts(&element.children, &mut builder);
        if let Some(parts) = builder.finish() {
            self.result
                .messages
                .push(Message::new(parts, meta, element.location.clone()));
        }
    }

    fn i18n_meta(&self, element: &Element) -> Option<MessageMeta> {
        if let Some(attr) = element.attr(I18N_ATTR) {
            return Some(MessageMeta::parse(&attr.value));
        }
        self.implicit_tags
            .iter()
            .any(|tag| tag == &element.name)
            .then(MessageMeta::default)
    }

    fn extract_attributes(&mut self, element: &Element) {
        let implicit = self.implicit_attrs.get(&element.name);
        for attr in &element.attrs {
            if attr.name == I18N_ATTR || attr.name.starts_with(I18N_ATTR_PREFIX) {
                continue;
            }
            let marker = element.attr(&format!("{}{}", I18N_ATTR_PREFIX, attr.name));
            let meta = match marker {
                Some(marker) => MessageMeta::parse(&marker.value),
                None if implicit.is_some_and(|names| names.contains(&attr.name)) => {
                    MessageMeta::default()
                }
                None => continue,
            };

            let mut builder = PartsBuilder::default();
            self.add_interpolated(&attr.value, &attr.value_location, &mut builder);
            if let Some(parts) = builder.finish() {
                self.result
                    .messages
                    .push(Message::new(parts, meta, attr.location.clone()));
            }
        }
    }

    fn collect_parts(&mut self, nodes: &[Node], builder: &mut PartsBuilder) {
        for node in nodes {
            match node {
                Node::Text(text) => self.add_interpolated(&text.value, &text.location, builder),
                Node::Element(child) => {
                    if self.i18n_meta(child).is_some() {
                        self.result.errors.push(TemplateError::new(
                            "Could not mark an element as translatable inside a translatable section",
                            child.location.clone(),
                        ));
                        continue;
                    }
                    self.extract_attributes(child);

                    let tag = child.name.to_uppercase().replace('-', "_");
                    if crate::core::html::tags::is_void_element(&child.name) {
                        builder.placeholder(&format!("TAG_{}", tag), &format!("<{}>", child.name));
                        continue;
                    }
                    builder.placeholder(
                        &format!("START_TAG_{}", tag),
                        &format!("<{}>", child.name),
                    );
                    self.collect_parts(&child.children, builder);
                    builder.placeholder(
                        &format!("CLOSE_TAG_{}", tag),
                        &format!("</{}>", child.name),
                    );
                }
                Node::Comment(_) => {}
            }
        }
    }

    /// Split `value` into text and interpolation placeholders.
    fn add_interpolated(
        &mut self,
        value: &str,
        location: &SourceLocation,
        builder: &mut PartsBuilder,
    ) {
        let start = self.interpolation.start.as_str();
        let end = self.interpolation.end.as_str();
        let mut offset = 0;

        while let Some(found) = value[offset..].find(start) {
            let open = offset + found;
            builder.text(&value[offset..open]);

            let expr_start = open + start.len();
            let Some(expr_len) = value[expr_start..].find(end) else {
                self.result.errors.push(TemplateError::new(
                    format!("Unterminated interpolation, expected \"{}\"", end),
                    offset_location(location, &value[..open]),
                ));
                builder.text(&value[open..]);
                return;
            };
            let close = expr_start + expr_len + end.len();

            let expr = value[expr_start..expr_start + expr_len].trim();
            if expr.is_empty() {
                self.result.errors.push(TemplateError::new(
                    "Blank expressions are not allowed in interpolated strings",
                    offset_location(location, &value[..open]),
                ));
            } else {
                builder.placeholder("INTERPOLATION", &value[open..close]);
            }
            offset = close;
        }
        builder.text(&value[offset..]);
    }
}

/// Location of the character following `prefix`, given where `prefix` starts.
fn offset_location(start: &SourceLocation, prefix: &str) -> SourceLocation {
    let mut location = start.clone();
    for c in prefix.chars() {
        if c == '\n' {
            location.line += 1;
            location.col = 1;
        } else {
            location.col += 1;
        }
    }
    location
}

#[derive(Default)]
struct PartsBuilder {
    parts: Vec<MessagePart>,
    /// Placeholder name already assigned to a (base, source) pair.
    names: HashMap<(String, String), String>,
    /// How many distinct placeholders share a base name.
    counts: HashMap<String, usize>,
}

impl PartsBuilder {
    fn text(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }
        if let Some(MessagePart::Text(last)) = self.parts.last_mut() {
            last.push_str(value);
        } else {
            self.parts.push(MessagePart::Text(value.to_string()));
        }
    }

    fn placeholder(&mut self, base: &str, source: &str) {
        let key = (base.to_string(), source.to_string());
        let name = match self.names.get(&key) {
            Some(name) => name.clone(),
            None => {
                let count = self.counts.entry(base.to_string()).or_insert(0);
                let name = if *count == 0 {
                    base.to_string()
                } else {
                    format!("{}_{}", base, count)
                };
                *count += 1;
                self.names.insert(key, name.clone());
                name
            }
        };
        self.parts.push(MessagePart::Placeholder {
            name,
            source: source.to_string(),
        });
    }

    /// `None` when there is nothing worth translating.
    fn finish(self) -> Option<Vec<MessagePart>> {
        let blank = self.parts.iter().all(|part| match part {
            MessagePart::Text(text) => text.trim().is_empty(),
            MessagePart::Placeholder { .. } => false,
        });
        (!blank).then_some(self.parts)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::html::HtmlParser;

    fn extract(source: &str) -> ExtractionResult {
        extract_with(source, &InterpolationConfig::default(), &[], &ImplicitAttrs::new())
    }

    fn extract_with(
        source: &str,
        interpolation: &InterpolationConfig,
        implicit_tags: &[String],
        implicit_attrs: &ImplicitAttrs,
    ) -> ExtractionResult {
        let parsed = HtmlParser::new().parse(source, "app.html");
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        extract_messages(&parsed.root_nodes, interpolation, implicit_tags, implicit_attrs)
    }

    fn contents(result: &ExtractionResult) -> Vec<String> {
        result.messages.iter().map(Message::content).collect()
    }

    #[test]
    fn test_extracts_marked_elements_only() {
        let result = extract("<div><h1 i18n>Hello</h1><p>not marked</p></div>");
        assert!(result.errors.is_empty());
        assert_eq!(contents(&result), vec!["Hello"]);
        assert_eq!(
            result.messages[0].sources,
            vec![SourceLocation::new("app.html", 1, 6)]
        );
    }

    #[test]
    fn test_meta_from_marker() {
        let result = extract("<h1 i18n=\"header|Greeting@@greet\">Hi</h1>");
        let message = &result.messages[0];
        assert_eq!(message.id, "greet");
        assert_eq!(message.meaning, "header");
        assert_eq!(message.description, "Greeting");
    }

    #[test]
    fn test_placeholders_for_markup_and_interpolation() {
        let result = extract(
            "<p i18n>Hi <b>{{ user }}</b>, {{ user }} and {{count}}<br>bye</p>",
        );
        assert!(result.errors.is_empty());
        assert_eq!(
            contents(&result),
            vec![
                "Hi {$START_TAG_B}{$INTERPOLATION}{$CLOSE_TAG_B}, {$INTERPOLATION} and {$INTERPOLATION_1}{$TAG_BR}bye"
            ]
        );
    }

    #[test]
    fn test_attribute_messages() {
        let result = extract("<img i18n-title=\"Photo caption\" title=\"A cat\" alt=\"x\">");
        assert_eq!(contents(&result), vec!["A cat"]);
        assert_eq!(result.messages[0].description, "Photo caption");
    }

    #[test]
    fn test_implicit_tags_and_attrs() {
        let mut attrs = ImplicitAttrs::new();
        attrs.insert("input".to_string(), vec!["placeholder".to_string()]);
        let result = extract_with(
            "<my-title>Title</my-title><input placeholder=\"Search\">",
            &InterpolationConfig::default(),
            &["my-title".to_string()],
            &attrs,
        );
        assert_eq!(contents(&result), vec!["Title", "Search"]);
    }

    #[test]
    fn test_custom_interpolation() {
        let markers = vec!["[[".to_string(), "]]".to_string()];
        let config = InterpolationConfig::from_array(Some(&markers)).unwrap();
        let result = extract_with(
            "<p i18n>Hi [[name]] {{literal}}</p>",
            &config,
            &[],
            &ImplicitAttrs::new(),
        );
        assert_eq!(contents(&result), vec!["Hi {$INTERPOLATION} {{literal}}"]);
    }

    #[test]
    fn test_nested_marker_is_an_error() {
        let result = extract("<div i18n>outer <span i18n>inner</span></div>");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].to_string(),
            "Could not mark an element as translatable inside a translatable section: app.html@1:17"
        );
    }

    #[test]
    fn test_interpolation_errors() {
        let result = extract("<p i18n>\n  Hi {{ name</p>");
        assert_eq!(
            result.errors[0].to_string(),
            "Unterminated interpolation, expected \"}}\": app.html@2:6"
        );

        let result = extract("<p i18n>Hi {{ }}</p>");
        assert_eq!(
            result.errors[0].msg,
            "Blank expressions are not allowed in interpolated strings"
        );
    }

    #[test]
    fn test_attribute_interpolation_error_points_into_value() {
        let result = extract("<img i18n-title title=\"Hi {{ }}\">");
        assert_eq!(
            result.errors[0].to_string(),
            "Blank expressions are not allowed in interpolated strings: app.html@1:27"
        );
    }

    #[test]
    fn test_blank_content_is_skipped() {
        let result = extract("<p i18n>  \n </p><p i18n><!-- only a comment --></p>");
        assert!(result.messages.is_empty());
        assert!(result.errors.is_empty());
    }
}
