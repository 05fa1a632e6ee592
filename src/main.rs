#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use anyhow::Result;
use clap::Parser;
use versiongate::cli::Cli;
use versiongate::config::{Config, ConfigHandle};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load_or_init()?,
    };
    config.apply_env_overrides();
    config.validate()?;

    versiongate::observability::init_tracing(&config.observability);

    versiongate::app::dispatch(cli.command, ConfigHandle::new(config)).await
}
