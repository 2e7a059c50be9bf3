//! xi18n - i18n message extraction for component templates
//!
//! xi18n is a CLI tool and library that collects the translatable messages of
//! every component template in a program into a single message bundle. Files
//! are processed concurrently; template errors are aggregated across the whole
//! program instead of stopping at the first malformed template.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Collaborators of the pipeline (reflection, metadata, templates, messages)
//! - `extractor`: The extraction orchestrator

pub mod cli;
pub mod config;
pub mod core;
pub mod extractor;
