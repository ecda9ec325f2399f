mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;
use pampa_predict::{adapter, resolve_model, sample, Config};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match execute(cli::Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: cli::Cli) -> Result<()> {
    match cli.command {
        cli::Command::Run {
            input,
            output,
            smiles_column,
            no_header,
            precision,
        } => {
            let config = Config {
                model_path: cli.model,
                smiles_column: smiles_column.unwrap_or_default(),
                has_header: !no_header,
                precision,
            };
            adapter::run(&config, &input, &output)
                .with_context(|| format!("run {} -> {}", input.display(), output.display()))?;
        }
        cli::Command::Example { output, count } => {
            sample::write_example(&output, count).context("writing example input")?;
        }
        cli::Command::Info => {
            let model = resolve_model(cli.model.as_deref())?;
            println!("{}", serde_json::to_string_pretty(model.card())?);
        }
    }
    Ok(())
}
