use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use log::{debug, warn};

use super::model::{ColumnSelector, CompoundRecord, CompoundTable};
use crate::error::{Error, Result, RowError};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the compound table from a CSV file.
///
/// * With `has_header`, the first row names the columns.
/// * Ragged rows are kept; a row without the compound cell is marked
///   [`RowError::MissingCell`] rather than dropped.
/// * Rows wider than the header extend it with `column_N` names.
pub fn load_compounds(path: &Path, selector: &ColumnSelector, has_header: bool) -> Result<CompoundTable> {
    let unreadable = |source| Error::InputUnreadable {
        path: path.to_path_buf(),
        source,
    };
    if path.is_dir() {
        return Err(unreadable(std::io::Error::other("is a directory")));
    }
    let file = File::open(path).map_err(unreadable)?;
    let table = load_compounds_from_reader(file, selector, has_header)?;
    debug!(
        "read {} rows from {} (compound column {})",
        table.len(),
        path.display(),
        table.smiles_column_name()
    );
    Ok(table)
}

/// Same as [`load_compounds`] over any reader.
pub fn load_compounds_from_reader<R: Read>(
    reader: R,
    selector: &ColumnSelector,
    has_header: bool,
) -> Result<CompoundTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in reader.byte_records() {
        rows.push(result?);
    }

    let mut rows = rows.into_iter();
    let headers = if has_header {
        rows.next().unwrap_or_default()
    } else {
        ByteRecord::new()
    };
    let rows: Vec<ByteRecord> = rows.collect();

    let width = rows.iter().map(ByteRecord::len).max().unwrap_or(0);
    let (mut headers, smiles_column) = if has_header {
        let column = resolve_column(&headers, selector)?;
        (headers, column)
    } else {
        if let ColumnSelector::Name(name) = selector {
            return Err(Error::InvalidConfig(format!(
                "column name '{name}' needs a header row"
            )));
        }
        let headers: ByteRecord = (1..=width).map(|i| format!("column_{i}")).collect();
        let column = resolve_column(&headers, selector)?;
        (headers, column)
    };

    // Cells past the header get a synthesized name so every output cell,
    // the probability included, sits under its own header.
    if headers.len() < width {
        for (i, fields) in rows.iter().enumerate() {
            if fields.len() > headers.len() {
                warn!(
                    "row {}: {} cells, header has {}",
                    i + 1,
                    fields.len(),
                    headers.len()
                );
            }
        }
        for i in headers.len() + 1..=width {
            headers.push_field(format!("column_{i}").as_bytes());
        }
    }

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, fields)| {
            let row = i + 1;
            let smiles = extract_smiles(&fields, smiles_column);
            if let Err(e) = &smiles {
                warn!("row {row}: {e}");
            }
            CompoundRecord { row, fields, smiles }
        })
        .collect();

    Ok(CompoundTable {
        headers,
        smiles_column,
        records,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn header_name(cell: &[u8]) -> String {
    String::from_utf8_lossy(cell)
        .trim_start_matches('\u{feff}')
        .trim()
        .to_string()
}

/// Map a selector onto a column index. An input with no columns at all
/// (empty file) accepts any selector and yields column 0.
fn resolve_column(headers: &ByteRecord, selector: &ColumnSelector) -> Result<usize> {
    if headers.is_empty() {
        return Ok(0);
    }
    let names: Vec<String> = headers.iter().map(header_name).collect();

    match selector {
        ColumnSelector::Auto => Ok(names
            .iter()
            .position(|n| n.eq_ignore_ascii_case("smiles"))
            .unwrap_or(0)),
        ColumnSelector::Index(i) if *i < names.len() => Ok(*i),
        ColumnSelector::Index(i) => Err(Error::ColumnNotFound(format!(
            "index {i}, input has {} columns",
            names.len()
        ))),
        ColumnSelector::Name(name) => names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| Error::ColumnNotFound(format!("'{name}'"))),
    }
}

fn extract_smiles(fields: &ByteRecord, column: usize) -> std::result::Result<String, RowError> {
    let cell = fields.get(column).ok_or(RowError::MissingCell(column))?;
    let text = std::str::from_utf8(cell).map_err(|_| RowError::InvalidUtf8)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(RowError::EmptySmiles);
    }
    Ok(text.to_string())
}
