use std::fmt;
use std::str::FromStr;

use csv::ByteRecord;

use crate::error::RowError;

// ---------------------------------------------------------------------------
// ColumnSelector – which input column holds the SMILES
// ---------------------------------------------------------------------------

/// How the compound column is located in the input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnSelector {
    /// A header named `smiles` (any case) if present, else the first column.
    #[default]
    Auto,
    /// 0-based column index.
    Index(usize),
    /// Header name, matched case-insensitively.
    Name(String),
}

impl FromStr for ColumnSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("column selector must not be empty".into());
        }
        if s.eq_ignore_ascii_case("auto") {
            return Ok(ColumnSelector::Auto);
        }
        Ok(match s.parse::<usize>() {
            Ok(i) => ColumnSelector::Index(i),
            Err(_) => ColumnSelector::Name(s.to_string()),
        })
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::Auto => write!(f, "auto"),
            ColumnSelector::Index(i) => write!(f, "#{i}"),
            ColumnSelector::Name(n) => write!(f, "'{n}'"),
        }
    }
}

// ---------------------------------------------------------------------------
// CompoundRecord – one input row
// ---------------------------------------------------------------------------

/// One data row of the input, as read.
#[derive(Debug, Clone)]
pub struct CompoundRecord {
    /// 1-based data row number (header excluded).
    pub row: usize,
    /// Raw cells, passed through to the output untouched.
    pub fields: ByteRecord,
    /// The compound cell, or why it could not be extracted.
    pub smiles: Result<String, RowError>,
}

// ---------------------------------------------------------------------------
// PredictionRecord – one output row
// ---------------------------------------------------------------------------

/// One output row: the input cells plus the prediction outcome.
#[derive(Debug, Clone)]
pub struct PredictionRecord {
    pub row: usize,
    pub fields: ByteRecord,
    /// P(poorly permeable), or the row-level failure.
    pub outcome: Result<f64, RowError>,
}

impl PredictionRecord {
    pub fn probability(&self) -> Option<f64> {
        self.outcome.as_ref().ok().copied()
    }
}

// ---------------------------------------------------------------------------
// CompoundTable – the complete loaded input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CompoundTable {
    /// Header cells; synthesized as `column_N` for header-less input.
    pub headers: ByteRecord,
    /// Index of the compound column.
    pub smiles_column: usize,
    pub records: Vec<CompoundRecord>,
}

impl CompoundTable {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the input has no data rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Display name of the compound column.
    pub fn smiles_column_name(&self) -> String {
        self.headers
            .get(self.smiles_column)
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .unwrap_or_else(|| format!("column_{}", self.smiles_column + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_parsing() {
        assert_eq!("2".parse::<ColumnSelector>(), Ok(ColumnSelector::Index(2)));
        assert_eq!("SMILES".parse::<ColumnSelector>(), Ok(ColumnSelector::Name("SMILES".into())));
        assert_eq!("auto".parse::<ColumnSelector>(), Ok(ColumnSelector::Auto));
        assert!("  ".parse::<ColumnSelector>().is_err());
    }

    #[test]
    fn prediction_probability() {
        let ok = PredictionRecord {
            row: 1,
            fields: ByteRecord::from(vec!["CCO"]),
            outcome: Ok(0.25),
        };
        let failed = PredictionRecord {
            outcome: Err(RowError::EmptySmiles),
            ..ok.clone()
        };
        assert_eq!(ok.probability(), Some(0.25));
        assert_eq!(failed.probability(), None);
    }
}
