//! Report formatting and printing utilities.
//!
//! Displays extracted messages and template errors in cargo-style format.
//! Separate from core logic to allow xi18n to be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::commands::{CommandResult, CommandSummary, ExtractSummary, InitSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::core::{Message, SourceLocation, TemplateError};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum display width of message content before it gets truncated.
const MAX_CONTENT_WIDTH: usize = 60;

/// Maximum number of source locations to display per message.
const MAX_SOURCES_DISPLAY: usize = 3;

pub fn print(result: &CommandResult, verbose: bool) {
    let mut stdout = io::stdout().lock();
    match &result.summary {
        CommandSummary::Extract(summary) => print_extract_to(summary, verbose, &mut stdout),
        CommandSummary::Init(summary) => print_init_to(summary, &mut stdout),
    }
}

pub fn print_extract_to<W: Write>(summary: &ExtractSummary, verbose: bool, writer: &mut W) {
    if !summary.template_errors.is_empty() {
        for error in &summary.template_errors {
            print_template_error(error, writer);
        }
        let count = summary.template_errors.len();
        let _ = writeln!(
            writer,
            "{} {} template {} found, no messages extracted",
            FAILURE_MARK.red(),
            count,
            if count == 1 { "error" } else { "errors" }.red()
        );
        return;
    }

    if verbose {
        for message in &summary.messages {
            print_message(message, writer);
        }
    }

    let count = summary.messages.len();
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Extracted {} {} from {} source {} ({})",
            count,
            if count == 1 { "message" } else { "messages" },
            summary.source_files,
            if summary.source_files == 1 { "file" } else { "files" },
            summary.format
        )
        .green()
    );

    if summary.skipped_files > 0 {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be read",
            "warning:".bold().yellow(),
            summary.skipped_files
        );
    }
}

fn print_init_to<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {} already exists",
            FAILURE_MARK.red(),
            CONFIG_FILE_NAME
        );
    }
}

fn print_template_error<W: Write>(error: &TemplateError, writer: &mut W) {
    let _ = writeln!(writer, "{}: {}", "error".bold().red(), error.msg);
    print_location(&error.location, writer);
    let _ = writeln!(writer);
}

fn print_message<W: Write>(message: &Message, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{}[{}]: \"{}\"",
        "message".bold().green(),
        message.id.dimmed(),
        truncate(&message.content(), MAX_CONTENT_WIDTH)
    );

    let total = message.sources.len();
    for source in message.sources.iter().take(MAX_SOURCES_DISPLAY) {
        print_location(source, writer);
    }
    if total > MAX_SOURCES_DISPLAY {
        let _ = writeln!(
            writer,
            "  {} (and {} more)",
            "...".blue(),
            total - MAX_SOURCES_DISPLAY
        );
    }

    if !message.meaning.is_empty() {
        let _ = writeln!(writer, "   {} {} {}", "=".blue(), "meaning:".bold(), message.meaning);
    }
    if !message.description.is_empty() {
        let _ = writeln!(
            writer,
            "   {} {} {}",
            "=".blue(),
            "description:".bold(),
            message.description
        );
    }
    let _ = writeln!(writer);
}

// Clickable location: --> path:line:col
fn print_location<W: Write>(location: &SourceLocation, writer: &mut W) {
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        location.file_path,
        location.line,
        location.col
    );
}

/// Cut `text` to at most `max_width` display columns, marking the cut with `...`.
fn truncate(text: &str, max_width: usize) -> String {
    let single_line = text.replace('\n', " ");
    if UnicodeWidthStr::width(single_line.as_str()) <= max_width {
        return single_line;
    }

    let mut width = 0;
    let mut truncated = String::new();
    for ch in single_line.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(3) {
            break;
        }
        width += ch_width;
        truncated.push(ch);
    }
    truncated.push_str("...");
    truncated
}
