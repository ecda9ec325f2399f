/// Data layer: input rows, output rows, CSV in and out.
///
/// Architecture:
/// ```text
///  input.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → CompoundTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ CompoundRecord │  row, raw fields, SMILES cell
///   └───────────────┘
///        │   (predict)
///        ▼
///   ┌──────────┐
///   │  writer   │  fields + pampa5_proba1 → output.csv
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod writer;
