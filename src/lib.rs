//! PAMPA permeability prediction.
//!
//! Reads compounds (SMILES) from a CSV file, featurizes them, evaluates a
//! pretrained SVM and writes `pampa5_proba1`, the probability that each
//! compound is poorly permeable, next to the input columns.

pub mod adapter;
pub mod chem;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod predict;
pub mod sample;

pub use adapter::run;
pub use config::Config;
pub use error::{Error, Result, RowError};
pub use model::{load_bundled_model, load_model, resolve_model, PermeabilityModel, OUTPUT_COLUMN};
pub use predict::{predict_batch, BatchSummary};
