use clap::{Parser, Subcommand};
use pampa_predict::config::DEFAULT_PRECISION;
use pampa_predict::data::model::ColumnSelector;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pampa-predict",
    version,
    about = "PAMPA permeability predictor: SMILES in, probability of poor permeability out"
)]
pub struct Cli {
    /// Path to a pretrained model artifact (JSON); defaults to the bundled model
    #[arg(long, global = true, env = "PAMPA_MODEL_PATH")]
    pub model: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Predict every compound in INPUT and write INPUT columns + pampa5_proba1 to OUTPUT
    Run {
        input: PathBuf,
        output: PathBuf,

        /// Compound column: header name or 0-based index (default: `smiles` header, else first column)
        #[arg(long, value_name = "NAME|INDEX")]
        smiles_column: Option<ColumnSelector>,

        /// Treat the first row as data
        #[arg(long)]
        no_header: bool,

        /// Decimals kept in pampa5_proba1
        #[arg(long, default_value_t = DEFAULT_PRECISION, value_parser = clap::value_parser!(u8).range(0..=15))]
        precision: u8,
    },
    /// Write an example input file of well-known drugs
    Example {
        output: PathBuf,

        /// Number of compounds
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },
    /// Print the model card as JSON
    Info,
}
