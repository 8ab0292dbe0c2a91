use anyhow::Result;

use ipl_score_predictor::cli::Command;
use ipl_score_predictor::{
    handle_completions, handle_options, handle_predict, handle_serve, handle_validate, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Validate { source } => handle_validate(source),
        Command::Predict { source } => handle_predict(source),
        Command::Options => handle_options(),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
