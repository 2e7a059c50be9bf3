use crate::core::{Message, TemplateError};
use crate::extractor::TranslationsFormat;

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub format: TranslationsFormat,
    /// Messages of the bundle, in extraction order. Empty when any template failed.
    pub messages: Vec<Message>,
    pub template_errors: Vec<TemplateError>,
    /// Number of source files handed to the extractor.
    pub source_files: usize,
    /// Number of files the scanner could not read.
    pub skipped_files: usize,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running xi18n commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Number of template errors; non-zero means the run produced no bundle.
    pub error_count: usize,
}
