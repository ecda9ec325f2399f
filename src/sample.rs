use std::path::Path;

use log::warn;

use crate::error::{Error, Result};

/// Well-known drugs spanning the permeability range, used for the
/// `example` input file.
pub const EXAMPLE_COMPOUNDS: &[(&str, &str)] = &[
    ("aspirin", "CC(=O)Oc1ccccc1C(=O)O"),
    ("paracetamol", "CC(=O)Nc1ccc(O)cc1"),
    ("caffeine", "CN1C=NC2=C1C(=O)N(C(=O)N2C)C"),
    ("ibuprofen", "CC(C)Cc1ccc(cc1)C(C)C(=O)O"),
    ("metformin", "CN(C)C(=N)NC(=N)N"),
    ("propranolol", "CC(C)NCC(O)COc1cccc2ccccc12"),
    ("atenolol", "CC(C)NCC(O)COc1ccc(CC(N)=O)cc1"),
    ("diazepam", "CN1C(=O)CN=C(c2ccccc2)c2cc(Cl)ccc21"),
    ("furosemide", "NS(=O)(=O)c1cc(C(=O)O)c(NCc2ccco2)cc1Cl"),
    ("glucose", "OCC1OC(O)C(O)C(O)C1O"),
    ("verapamil", "COc1ccc(CCN(C)CCCC(C#N)(C(C)C)c2ccc(OC)c(OC)c2)cc1OC"),
    ("ciprofloxacin", "OC(=O)C1=CN(C2CC2)c2cc(N3CCNCC3)c(F)cc2C1=O"),
];

/// Write an example input CSV with a single `smiles` column holding the
/// first `count` built-in compounds.
pub fn write_example(path: &Path, count: usize) -> Result<()> {
    if count > EXAMPLE_COMPOUNDS.len() {
        warn!(
            "only {} example compounds available, requested {count}",
            EXAMPLE_COMPOUNDS.len()
        );
    }
    let unwritable = |source| Error::OutputUnwritable {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::create(path).map_err(unwritable)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(["smiles"])?;
    for (_, smiles) in EXAMPLE_COMPOUNDS.iter().take(count) {
        writer.write_record([smiles])?;
    }
    writer.flush().map_err(unwritable)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::smiles;

    #[test]
    fn all_examples_parse() {
        for (name, s) in EXAMPLE_COMPOUNDS {
            assert!(smiles::parse(s).is_ok(), "{name}: {s}");
        }
    }

    #[test]
    fn writes_requested_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.csv");
        write_example(&path, 3).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "smiles");
        assert_eq!(lines[1], EXAMPLE_COMPOUNDS[0].1);
    }

    #[test]
    fn caps_at_available() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.csv");
        write_example(&path, 1000).unwrap();
        let rows = std::fs::read_to_string(&path).unwrap().lines().count() - 1;
        assert_eq!(rows, EXAMPLE_COMPOUNDS.len());
    }
}
