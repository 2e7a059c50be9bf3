use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::{CommandResult, CommandSummary, ExtractSummary};
use crate::{
    cli::args::ExtractCommand,
    config::load_config,
    core::{
        CompilerOptions, FsCompilerHost, FsResourceLoader, Program,
        file_scanner::scan_source_files,
    },
    extractor::{Extraction, Extractor},
};

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let args = cmd.args;
    let source_root = args
        .common
        .source_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let loaded = load_config(&source_root)?;
    let config = loaded.config;
    if loaded.from_file {
        debug!("Loaded config from {}", source_root.display());
    }

    let format = args.i18n_format.unwrap_or(config.i18n_format);
    let options = CompilerOptions {
        gen_dir: args.gen_dir.or(config.gen_dir),
        debug: args.debug || config.debug,
    };

    let scan = scan_source_files(
        &source_root,
        &config.includes,
        &config.ignores,
        config.ignore_test_files,
    );
    info!(
        "Scanned {} source file(s) under {}",
        scan.files.len(),
        source_root.display()
    );
    let source_files = scan.files.len();
    let program = Program::new(scan.files);

    let extractor = Extractor::create(
        options,
        &format,
        program,
        Arc::new(FsCompilerHost::new(&source_root)),
        Arc::new(FsResourceLoader::new(&source_root)),
        None,
    )?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    let extraction = runtime.block_on(extractor.extract())?;

    let (messages, template_errors) = match extraction {
        Extraction::Bundle(bundle) => (bundle.messages().to_vec(), Vec::new()),
        Extraction::TemplateErrors(errors) => (Vec::new(), errors),
    };

    Ok(CommandResult {
        error_count: template_errors.len(),
        summary: CommandSummary::Extract(ExtractSummary {
            format: extractor.translations_format(),
            messages,
            template_errors,
            source_files,
            skipped_files: scan.skipped_count,
        }),
    })
}
