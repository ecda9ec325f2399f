use log::warn;

use crate::data::model::{CompoundRecord, PredictionRecord};
use crate::model::{PermeabilityClass, PermeabilityModel};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub predicted: usize,
    pub failed: usize,
    /// Predicted rows at or above the model threshold.
    pub low_permeability: usize,
}

#[derive(Debug)]
pub struct BatchOutput {
    pub predictions: Vec<PredictionRecord>,
    pub summary: BatchSummary,
}

/// Predict every record in order. Row failures are logged and recorded in
/// the output; they never stop the batch.
pub fn predict_batch(model: &PermeabilityModel, records: Vec<CompoundRecord>) -> BatchOutput {
    let mut summary = BatchSummary {
        total: records.len(),
        ..BatchSummary::default()
    };

    let predictions = records
        .into_iter()
        .map(|record| {
            // Extraction failures were already reported by the loader.
            let outcome = match record.smiles {
                Ok(smiles) => {
                    let outcome = model.predict(&smiles);
                    if let Err(e) = &outcome {
                        warn!("row {} ({smiles}): {e}", record.row);
                    }
                    outcome
                }
                Err(e) => Err(e),
            };

            match &outcome {
                Ok(p) => {
                    summary.predicted += 1;
                    if model.classify(*p) == PermeabilityClass::Low {
                        summary.low_permeability += 1;
                    }
                }
                Err(_) => summary.failed += 1,
            }

            PredictionRecord {
                row: record.row,
                fields: record.fields,
                outcome,
            }
        })
        .collect();

    BatchOutput {
        predictions,
        summary,
    }
}
