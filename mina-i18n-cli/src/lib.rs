//! The `mina-i18n` command line tool.
//!
//! Converts a mini-program project into an internationalized copy: scripts
//! and templates are rewritten to look their texts up at runtime, the
//! recorded texts are machine translated, and the resulting dictionary is
//! written next to a generated WXS runtime module.

pub mod config;
pub mod error;
pub mod output;
pub mod processor;
pub mod project;
pub mod walker;

use std::sync::Arc;

use mina_i18n::{Dictionary, Runtime, ScriptOptions};
use mina_i18n_mt::{MachineTranslator, TranslationClient, TranslationQueue};
use tracing::info;

pub use config::{Config, ProviderKind};
pub use error::{CliError, PathError};
pub use processor::{Processor, RunReport};
pub use project::Project;

/// Runs one conversion from `config.source` into `config.destination`.
///
/// Layout problems are reported before anything is written. Scripts that
/// fail to parse do not abort the run; they are listed in the report.
pub async fn run(
    config: &Config,
    translator: Arc<dyn MachineTranslator>,
) -> Result<RunReport, CliError> {
    let project = Project::open(config)?;
    let runtime = Runtime::default();
    let script_options = ScriptOptions {
        inject_locale_data: config.inject_locale_data,
    };
    let mut dictionary = Dictionary::new(&config.base_locale, config.targets());

    let client = TranslationClient::new(translator, &config.base_locale);
    let mut queue = TranslationQueue::new(client, config.concurrency);
    if let Some(converter) = config.converter()? {
        queue = queue.with_converter(converter);
    }

    println!("🔄 Converting files...");
    let report = {
        let mut processor = Processor::new(
            &project,
            &runtime,
            script_options,
            &mut dictionary,
            &mut queue,
        );
        processor.convert_project()?;
        processor.report
    };
    info!(
        scripts = report.scripts,
        templates = report.templates,
        copied = report.copied,
        failed = report.failed.len(),
        "converted files"
    );

    println!("🌍 Translating {} texts...", dictionary.len());
    queue.finish(&mut dictionary).await;

    output::write_dictionary(&project.destination, &dictionary)?;
    output::write_runtime_module(&project.destination, &runtime, &dictionary)?;

    println!("✅ i18n mina project written to {}", project.destination.display());
    Ok(report)
}
