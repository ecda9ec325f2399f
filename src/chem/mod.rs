//! Chemistry layer: SMILES → molecular graph → fixed-length feature vector.
//!
//! ```text
//!   "CC(=O)O"
//!       │
//!       ▼
//!   ┌──────────┐
//!   │  smiles   │  tokenize + parse → Molecule
//!   └──────────┘
//!       │
//!       ▼
//!   ┌──────────┐
//!   │ molecule  │  rings, implicit H, valence checks
//!   └──────────┘
//!       │
//!       ├──────────────┐
//!       ▼              ▼
//!   descriptors    fingerprint
//!       └──────┬───────┘
//!              ▼
//!          Vec<f64>
//! ```

pub mod descriptors;
pub mod element;
pub mod fingerprint;
pub mod molecule;
pub mod smiles;

use serde::{Deserialize, Serialize};

use self::smiles::SmilesError;

/// Circular fingerprint settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintSpec {
    pub radius: u32,
    pub bits: usize,
}

/// Which feature blocks make up the model input, in order:
/// descriptors first, then fingerprint bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSpec {
    #[serde(default = "default_true")]
    pub descriptors: bool,
    #[serde(default)]
    pub fingerprint: Option<FingerprintSpec>,
}

fn default_true() -> bool {
    true
}

impl FeatureSpec {
    /// Length of the vector [`FeatureSpec::featurize`] produces.
    pub fn dimension(&self) -> usize {
        let descriptors = if self.descriptors {
            descriptors::DESCRIPTOR_COUNT
        } else {
            0
        };
        descriptors + self.fingerprint.map_or(0, |fp| fp.bits)
    }

    /// Parse `smiles` and build its feature vector.
    pub fn featurize(&self, smiles: &str) -> Result<Vec<f64>, SmilesError> {
        let mol = smiles::parse(smiles)?;
        let mut features = Vec::with_capacity(self.dimension());
        if self.descriptors {
            features.extend_from_slice(&descriptors::compute(&mol));
        }
        if let Some(fp) = self.fingerprint {
            features.extend(fingerprint::morgan(&mol, fp.radius, fp.bits));
        }
        Ok(features)
    }
}
