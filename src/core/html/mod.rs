//! Minimal HTML parser for component templates.
//!
//! Only what message extraction needs is understood: elements, attributes,
//! text and comments. Structural problems are reported as `TemplateError`s
//! alongside whatever tree could be built.
//!
//! ## Module Structure
//!
//! - `ast`: Parsed node types
//! - `parser`: Single-pass scanner producing the node tree
//! - `tags`: Void element definitions

pub mod ast;
mod parser;
pub mod tags;

pub use ast::{Attribute, Comment, Element, Node, Text};
pub use parser::{HtmlParser, ParseTreeResult};
