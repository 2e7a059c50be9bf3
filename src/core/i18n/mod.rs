//! Translatable message extraction.
//!
//! ## Module Structure
//!
//! - `message`: Message model and id digests
//! - `extractor`: Walks a parsed template and collects messages
//! - `bundle`: Accumulates messages across templates

mod bundle;
mod extractor;
pub mod message;

pub use bundle::MessageBundle;
pub use extractor::{ExtractionResult, ImplicitAttrs, extract_messages};
pub use message::{Message, MessageMeta, MessagePart, digest};
