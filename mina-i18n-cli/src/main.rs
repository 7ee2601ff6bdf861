use std::process::ExitCode;

use mina_i18n_cli::{CliError, Config};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match Config::from_args(std::env::args_os()) {
        Ok(config) => config,
        Err(CliError::Args(e)) => e.exit(),
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing
    let level = if config.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let translator = match config.provider.build() {
        Ok(translator) => translator,
        Err(e) => {
            eprintln!("❌ Failed to initialize translator: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match mina_i18n_cli::run(&config, translator).await {
        Ok(report) if report.failed.is_empty() => ExitCode::SUCCESS,
        Ok(report) => {
            eprintln!("❌ {} script(s) could not be parsed:", report.failed.len());
            for path in &report.failed {
                eprintln!("  {}", path.display());
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}
