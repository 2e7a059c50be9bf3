use std::fmt;

/// A position inside a template or source file.
///
/// `line` and `col` are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLocation {
    pub file_path: String,
    pub line: usize,
    pub col: usize,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.file_path, self.line, self.col)
    }
}

/// A single malformed-template condition found while extracting messages.
///
/// Produced both by the HTML parser (structural problems) and by the i18n
/// scanner (misplaced markers, broken interpolations). These are collected,
/// never thrown one by one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateError {
    pub msg: String,
    pub location: SourceLocation,
}

impl TemplateError {
    pub fn new(msg: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            msg: msg.into(),
            location,
        }
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.msg, self.location)
    }
}
