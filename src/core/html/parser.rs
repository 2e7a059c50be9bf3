use super::{
    ast::{Attribute, Comment, Element, Node, Text},
    tags::is_void_element,
};
use crate::core::source::{SourceLocation, TemplateError};

/// Parser for component template markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

/// Nodes of a parsed template together with the problems found on the way.
#[derive(Debug, Default)]
pub struct ParseTreeResult {
    pub root_nodes: Vec<Node>,
    pub errors: Vec<TemplateError>,
}

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse `source`, reporting locations against `url`.
    ///
    /// Elements still open at the end of input are closed implicitly; a
    /// closing tag that does not match the innermost open element is an error.
    pub fn parse(&self, source: &str, url: &str) -> ParseTreeResult {
        TreeBuilder::new(source, url).build()
    }
}

struct Cursor<'a> {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    url: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(source: &str, url: &'a str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            url,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn starts_with(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn location(&self) -> SourceLocation {
        SourceLocation::new(self.url, self.line, self.col)
    }

    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            out.push(c);
            self.advance();
        }
        out
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

fn is_attr_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'')
}

fn unexpected_character(c: Option<char>) -> String {
    match c {
        Some(c) => format!("Unexpected character \"{}\"", c),
        None => "Unexpected character \"EOF\"".to_string(),
    }
}

struct TreeBuilder<'a> {
    cursor: Cursor<'a>,
    stack: Vec<Element>,
    root_nodes: Vec<Node>,
    errors: Vec<TemplateError>,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &str, url: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source, url),
            stack: Vec::new(),
            root_nodes: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn build(mut self) -> ParseTreeResult {
        while let Some(c) = self.cursor.peek() {
            if self.cursor.starts_with("<!--") {
                self.consume_comment();
            } else if self.cursor.starts_with("</") {
                self.consume_end_tag();
            } else if c == '<' && self.cursor.peek_at(1).is_some_and(is_name_start) {
                self.consume_start_tag();
            } else {
                self.consume_text();
            }
        }

        while let Some(element) = self.stack.pop() {
            self.add_node(Node::Element(element));
        }

        ParseTreeResult {
            root_nodes: self.root_nodes,
            errors: self.errors,
        }
    }

    fn add_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root_nodes.push(node),
        }
    }

    fn error(&mut self, msg: impl Into<String>, location: SourceLocation) {
        self.errors.push(TemplateError::new(msg, location));
    }

    fn at_markup(&self) -> bool {
        self.cursor.starts_with("<!--")
            || self.cursor.starts_with("</")
            || (self.cursor.peek() == Some('<') && self.cursor.peek_at(1).is_some_and(is_name_start))
    }

    fn consume_text(&mut self) {
        let location = self.cursor.location();
        let mut value = String::new();
        // Always take the first char so a stray '<' cannot stall the loop.
        if let Some(c) = self.cursor.advance() {
            value.push(c);
        }
        while self.cursor.peek().is_some() && !self.at_markup() {
            if let Some(c) = self.cursor.advance() {
                value.push(c);
            }
        }
        self.add_node(Node::Text(Text { value, location }));
    }

    fn consume_comment(&mut self) {
        let location = self.cursor.location();
        self.cursor.advance_by(4);
        let mut value = String::new();
        loop {
            if self.cursor.starts_with("-->") {
                self.cursor.advance_by(3);
                break;
            }
            match self.cursor.advance() {
                Some(c) => value.push(c),
                None => {
                    let eof = self.cursor.location();
                    self.error(unexpected_character(None), eof);
                    return;
                }
            }
        }
        self.add_node(Node::Comment(Comment { value, location }));
    }

    fn consume_end_tag(&mut self) {
        let location = self.cursor.location();
        self.cursor.advance_by(2);
        let name = self.cursor.read_while(is_name_char);
        self.cursor.skip_whitespace();

        if self.cursor.peek() != Some('>') {
            let here = self.cursor.location();
            self.error(unexpected_character(self.cursor.peek()), here);
            // Resynchronize after the broken tag.
            while let Some(c) = self.cursor.advance() {
                if c == '>' {
                    break;
                }
            }
            return;
        }
        self.cursor.advance();

        if is_void_element(&name) {
            self.error(
                format!("Void elements do not have end tags \"{}\"", name),
                location,
            );
            return;
        }

        let matches_open = self
            .stack
            .last()
            .is_some_and(|open| open.name.eq_ignore_ascii_case(&name));
        if matches_open {
            if let Some(element) = self.stack.pop() {
                self.add_node(Node::Element(element));
            }
        } else {
            self.error(format!("Unexpected closing tag \"{}\"", name), location);
        }
    }

    fn consume_start_tag(&mut self) {
        let location = self.cursor.location();
        self.cursor.advance();
        let name = self.cursor.read_while(is_name_char);
        let mut attrs = Vec::new();
        let self_closing;

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                None => {
                    let eof = self.cursor.location();
                    self.error(unexpected_character(None), eof);
                    return;
                }
                Some('>') => {
                    self.cursor.advance();
                    self_closing = false;
                    break;
                }
                Some('/') if self.cursor.peek_at(1) == Some('>') => {
                    self.cursor.advance_by(2);
                    self_closing = true;
                    break;
                }
                Some(_) => {
                    if !self.consume_attribute(&mut attrs) {
                        return;
                    }
                }
            }
        }

        let element = Element {
            name,
            attrs,
            children: Vec::new(),
            location,
        };
        if self_closing || is_void_element(&element.name) {
            self.add_node(Node::Element(element));
        } else {
            self.stack.push(element);
        }
    }

    /// Returns `false` when the input ended inside the attribute.
    fn consume_attribute(&mut self, attrs: &mut Vec<Attribute>) -> bool {
        let location = self.cursor.location();
        let name = self.cursor.read_while(is_attr_name_char);
        if name.is_empty() {
            // Stray '/', quote or '=' inside a tag.
            let c = self.cursor.advance();
            self.error(unexpected_character(c), location);
            return true;
        }

        self.cursor.skip_whitespace();
        let mut value = String::new();
        let mut value_location = self.cursor.location();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            self.cursor.skip_whitespace();
            value_location = self.cursor.location();
            match self.cursor.peek() {
                Some(quote @ ('"' | '\'')) => {
                    self.cursor.advance();
                    value_location = self.cursor.location();
                    value = self.cursor.read_while(|c| c != quote);
                    if self.cursor.advance().is_none() {
                        let eof = self.cursor.location();
                        self.error(unexpected_character(None), eof);
                        return false;
                    }
                }
                _ => {
                    value = self
                        .cursor
                        .read_while(|c| !c.is_whitespace() && c != '>' && c != '/');
                }
            }
        }

        attrs.push(Attribute {
            name,
            value,
            location,
            value_location,
        });
        true
    }
}
