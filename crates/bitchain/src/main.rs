//! bitchain — bitstring-indexed matrix chain evaluator.

use anyhow::Result;
use bitchain_core::exit_codes;
use bitchain_lib::{app, config};

fn main() -> Result<()> {
    let config = config::AppConfig::parse();

    // Initialize tracing
    let level = if config.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let code = app::run(&config)?;
    if code != exit_codes::SUCCESS {
        std::process::exit(code);
    }
    Ok(())
}
