use std::path::PathBuf;

use crate::chem::smiles::SmilesError;
use crate::model::InferenceError;

// ---------------------------------------------------------------------------
// Fatal errors – abort the run before or instead of writing output
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("model artifact not found: {}", path.display())]
    ModelNotFound { path: PathBuf },

    #[error("cannot read model artifact {}: {source}", path.display())]
    ModelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt model artifact {}: {reason}", path.display())]
    ModelCorrupt { path: PathBuf, reason: String },

    #[error("cannot read input {}: {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write output {}: {source}", path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("compound column not found: {0}")]
    ColumnNotFound(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

// ---------------------------------------------------------------------------
// Row errors – recovered locally, the row gets the missing marker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("row has no cell at column {0}")]
    MissingCell(usize),

    #[error("empty compound representation")]
    EmptySmiles,

    #[error("compound cell is not valid UTF-8")]
    InvalidUtf8,

    #[error("unparsable SMILES: {0}")]
    Smiles(#[from] SmilesError),

    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}
