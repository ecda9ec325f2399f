use std::path::Path;
use std::time::Instant;

use log::info;

use crate::config::Config;
use crate::data::loader::load_compounds;
use crate::data::writer::write_predictions;
use crate::error::Result;
use crate::model::resolve_model;
use crate::predict::{predict_batch, BatchSummary};

/// One batch run: model → input → predictions → output file.
///
/// The model is loaded and the input read before the output file is
/// created, so fatal errors never leave a partial output behind.
pub fn run(config: &Config, input: &Path, output: &Path) -> Result<BatchSummary> {
    let model = resolve_model(config.model_path.as_deref())?;
    let table = load_compounds(input, &config.smiles_column, config.has_header)?;
    info!(
        "predicting {} compounds from column {} with {} v{}",
        table.len(),
        table.smiles_column_name(),
        model.card().name,
        model.card().version
    );

    let started = Instant::now();
    let batch = predict_batch(&model, table.records);
    let elapsed = started.elapsed();
    write_predictions(output, &table.headers, &batch.predictions, config.precision)?;

    let s = batch.summary;
    info!(
        "wrote {} rows to {}: {} predicted ({} low permeability), {} failed; prediction took {:.3}s",
        s.total,
        output.display(),
        s.predicted,
        s.low_permeability,
        s.failed,
        elapsed.as_secs_f64()
    );
    Ok(s)
}
