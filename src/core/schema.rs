use std::collections::HashSet;

const DOM_ELEMENTS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col",
    "colgroup", "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt",
    "em", "embed", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4",
    "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input", "ins",
    "kbd", "label", "legend", "li", "link", "main", "map", "mark", "menu", "meta", "meter",
    "nav", "noscript", "object", "ol", "optgroup", "option", "output", "p", "param", "picture",
    "pre", "progress", "q", "rp", "rt", "ruby", "s", "samp", "script", "section", "select",
    "slot", "small", "source", "span", "strong", "style", "sub", "summary", "sup", "svg",
    "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "time", "title",
    "tr", "track", "u", "ul", "var", "video", "wbr",
];

/// Registry of the native DOM elements.
#[derive(Debug, Clone)]
pub struct ElementSchemaRegistry {
    elements: HashSet<&'static str>,
}

impl Default for ElementSchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementSchemaRegistry {
    pub fn new() -> Self {
        Self {
            elements: DOM_ELEMENTS.iter().copied().collect(),
        }
    }

    pub fn has_element(&self, tag_name: &str) -> bool {
        self.elements.contains(tag_name.to_ascii_lowercase().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_element() {
        let registry = ElementSchemaRegistry::new();
        assert!(registry.has_element("div"));
        assert!(registry.has_element("BUTTON"));
        assert!(!registry.has_element("app-root"));
    }
}
