use std::collections::HashMap;

use super::{
    extractor::{ImplicitAttrs, extract_messages},
    message::Message,
};
use crate::core::{html::HtmlParser, interpolation::InterpolationConfig, source::TemplateError};

/// Accumulator of the messages extracted from every template of a run.
///
/// Messages are kept in discovery order. A message found again (same id)
/// keeps its first entry and gains the new source location.
#[derive(Debug, Clone, Default)]
pub struct MessageBundle {
    html_parser: HtmlParser,
    implicit_tags: Vec<String>,
    implicit_attrs: ImplicitAttrs,
    messages: Vec<Message>,
    index: HashMap<String, usize>,
}

impl MessageBundle {
    pub fn new(
        html_parser: HtmlParser,
        implicit_tags: Vec<String>,
        implicit_attrs: ImplicitAttrs,
    ) -> Self {
        Self {
            html_parser,
            implicit_tags,
            implicit_attrs,
            messages: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Parse one template and add its messages.
    ///
    /// Returns the problems found in the template. A template with any
    /// problem contributes no messages.
    pub fn update_from_template(
        &mut self,
        html: &str,
        url: &str,
        interpolation: &InterpolationConfig,
    ) -> Vec<TemplateError> {
        let parsed = self.html_parser.parse(html, url);
        if !parsed.errors.is_empty() {
            return parsed.errors;
        }

        let extracted = extract_messages(
            &parsed.root_nodes,
            interpolation,
            &self.implicit_tags,
            &self.implicit_attrs,
        );
        if !extracted.errors.is_empty() {
            return extracted.errors;
        }

        for message in extracted.messages {
            self.add(message);
        }
        Vec::new()
    }

    fn add(&mut self, message: Message) {
        match self.index.get(&message.id) {
            Some(&idx) => self.messages[idx].sources.extend(message.sources),
            None => {
                self.index.insert(message.id.clone(), self.messages.len());
                self.messages.push(message);
            }
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: &str) -> Option<&Message> {
        self.index.get(id).map(|&idx| &self.messages[idx])
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
