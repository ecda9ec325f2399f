use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{ByteRecord, WriterBuilder};

use super::model::PredictionRecord;
use crate::error::{Error, Result};
use crate::model::OUTPUT_COLUMN;

/// Write the output CSV: input columns followed by `pampa5_proba1`.
///
/// Rows shorter than the header are padded with empty cells so the
/// probability always lands under its column. Failed rows get an empty
/// probability cell.
pub fn write_predictions(
    path: &Path,
    headers: &ByteRecord,
    predictions: &[PredictionRecord],
    precision: u8,
) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::OutputUnwritable {
        path: path.to_path_buf(),
        source,
    })?;
    write_predictions_to(file, headers, predictions, precision)
}

/// Same as [`write_predictions`] over any writer.
pub fn write_predictions_to<W: Write>(
    writer: W,
    headers: &ByteRecord,
    predictions: &[PredictionRecord],
    precision: u8,
) -> Result<()> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);

    let mut header = headers.clone();
    header.push_field(OUTPUT_COLUMN.as_bytes());
    writer.write_byte_record(&header)?;

    for prediction in predictions {
        let mut record = prediction.fields.clone();
        while record.len() < headers.len() {
            record.push_field(b"");
        }
        let cell = prediction
            .probability()
            .map(|p| format_probability(p, precision))
            .unwrap_or_default();
        record.push_field(cell.as_bytes());
        writer.write_byte_record(&record)?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Round to `precision` decimals and print in shortest form, keeping one
/// decimal for whole numbers (`0.42`, `0.0`, `1.0`).
pub fn format_probability(p: f64, precision: u8) -> String {
    let factor = 10f64.powi(i32::from(precision));
    let rounded = (p * factor).round() / factor;
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}
