use std::path::PathBuf;

use crate::data::model::ColumnSelector;

/// Decimals kept in `pampa5_proba1`.
pub const DEFAULT_PRECISION: u8 = 3;

/// Settings for one `run` invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model artifact; `None` uses the compiled-in demonstration model.
    pub model_path: Option<PathBuf>,
    pub smiles_column: ColumnSelector,
    pub has_header: bool,
    pub precision: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: None,
            smiles_column: ColumnSelector::Auto,
            has_header: true,
            precision: DEFAULT_PRECISION,
        }
    }
}
