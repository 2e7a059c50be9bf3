use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

pub const DEFAULT_INTERPOLATION_START: &str = "{{";
pub const DEFAULT_INTERPOLATION_END: &str = "}}";

/// Delimiters that can never be used as interpolation markers.
static UNUSABLE_SYMBOL_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^\s*$",          // empty
        r"[<>]",           // html tag
        r"^[{}]$",         // icu expansion
        r"(?i)&(#|[a-z])", // character reference
        r"^//",            // comment
    ]
    .iter()
    .map(|re| Regex::new(re).unwrap())
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpolationError {
    #[error("Expected 'interpolation' to be an array, [start, end].")]
    NotAPair,
    #[error("['{start}', '{end}'] contains unusable interpolation symbol.")]
    UnusableSymbol { start: String, end: String },
}

/// Start/end markers delimiting expressions inside template text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterpolationConfig {
    pub start: String,
    pub end: String,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            start: DEFAULT_INTERPOLATION_START.to_string(),
            end: DEFAULT_INTERPOLATION_END.to_string(),
        }
    }
}

impl InterpolationConfig {
    /// Build a config from the `interpolation` pair declared on a component.
    ///
    /// `None` yields the default `{{`/`}}` markers.
    pub fn from_array(markers: Option<&[String]>) -> Result<Self, InterpolationError> {
        let Some(markers) = markers else {
            return Ok(Self::default());
        };
        let [start, end] = markers else {
            return Err(InterpolationError::NotAPair);
        };
        let unusable = UNUSABLE_SYMBOL_REGEXES
            .iter()
            .any(|re| re.is_match(start) || re.is_match(end));
        if unusable {
            return Err(InterpolationError::UnusableSymbol {
                start: start.clone(),
                end: end.clone(),
            });
        }
        Ok(Self {
            start: start.clone(),
            end: end.clone(),
        })
    }
}
