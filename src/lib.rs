pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod form;
pub mod http;
pub mod prediction;
pub mod services;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use colored::Colorize;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::domain::option_catalog;
use crate::services::{PredictionService, ServerService, ValidationService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new().with_port(port);
        let service = ServerService::new(config);
        service.run().await
    })
}

pub fn handle_validate(source: &str) -> Result<()> {
    match ValidationService::run(source)? {
        Ok(config) => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Err(errors) => {
            for error in errors.iter() {
                eprintln!("{}: {}", error.field.as_str().red().bold(), error.message);
            }
            anyhow::bail!("{} field(s) invalid", errors.len())
        }
    }
}

pub fn handle_predict(source: &str) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(async {
        let service = PredictionService::new(AppConfig::new());
        service.run(source).await
    })?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub fn handle_options() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&option_catalog())?);
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
