use std::fmt;

use crate::core::source::SourceLocation;

/// Prefix marking a custom message id inside an `i18n` attribute value.
const CUSTOM_ID_SEPARATOR: &str = "@@";
const MEANING_SEPARATOR: char = '|';

/// Number of hex characters kept from the content digest.
const ID_LENGTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePart {
    Text(String),
    /// Interpolation or markup replaced by a named placeholder.
    Placeholder { name: String, source: String },
}

impl fmt::Display for MessagePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessagePart::Text(text) => write!(f, "{}", text),
            MessagePart::Placeholder { name, .. } => write!(f, "{{${}}}", name),
        }
    }
}

/// Parsed value of an `i18n` / `i18n-<attr>` marker: `meaning|description@@id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageMeta {
    pub meaning: String,
    pub description: String,
    pub custom_id: Option<String>,
}

impl MessageMeta {
    pub fn parse(value: &str) -> Self {
        let (rest, custom_id) = match value.split_once(CUSTOM_ID_SEPARATOR) {
            Some((rest, id)) => (rest, Some(id.trim().to_string()).filter(|id| !id.is_empty())),
            None => (value, None),
        };
        let (meaning, description) = match rest.split_once(MEANING_SEPARATOR) {
            Some((meaning, description)) => (meaning.trim(), description.trim()),
            None => ("", rest.trim()),
        };
        Self {
            meaning: meaning.to_string(),
            description: description.to_string(),
            custom_id,
        }
    }
}

/// A translatable unit found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub meaning: String,
    pub description: String,
    pub parts: Vec<MessagePart>,
    /// Every place the message was found, in discovery order.
    pub sources: Vec<SourceLocation>,
}

impl Message {
    pub fn new(parts: Vec<MessagePart>, meta: MessageMeta, source: SourceLocation) -> Self {
        let id = match meta.custom_id {
            Some(id) => id,
            None => digest(&parts, &meta.meaning),
        };
        Self {
            id,
            meaning: meta.meaning,
            description: meta.description,
            parts,
            sources: vec![source],
        }
    }

    /// Message text with placeholders rendered as `{$NAME}`.
    pub fn content(&self) -> String {
        self.parts.iter().map(ToString::to_string).collect()
    }
}

/// Stable id for a message: the same content and meaning always produce the
/// same id, independently of where the message was found.
pub fn digest(parts: &[MessagePart], meaning: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        match part {
            MessagePart::Text(text) => {
                hasher.update(b"t:");
                hasher.update(text.as_bytes());
            }
            MessagePart::Placeholder { name, .. } => {
                hasher.update(b"p:");
                hasher.update(name.as_bytes());
            }
        }
        hasher.update(&[0]);
    }
    hasher.update(b"m:");
    hasher.update(meaning.as_bytes());
    let hex = hasher.finalize().to_hex();
    hex.as_str()[..ID_LENGTH].to_string()
}
