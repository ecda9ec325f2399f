use serde::{Deserialize, Serialize};

use super::svm::{Kernel, Platt, StandardScaler};
use crate::chem::FeatureSpec;

/// On-disk model format (JSON).
///
/// ```json
/// {
///   "name": "pampa5-svm",
///   "version": "1.0.0",
///   "features": { "descriptors": true, "fingerprint": { "radius": 2, "bits": 1024 } },
///   "scaler": { "mean": [...], "scale": [...] },
///   "kernel": { "type": "rbf", "gamma": 0.01 },
///   "support_vectors": [[...], ...],
///   "dual_coef": [...],
///   "intercept": -0.3,
///   "platt": { "a": -1.7, "b": 0.05 }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    /// Probability at or above which a compound is called poorly permeable.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    pub features: FeatureSpec,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    pub kernel: Kernel,
    pub support_vectors: Vec<Vec<f64>>,
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
    pub platt: Platt,
}

fn default_threshold() -> f64 {
    0.5
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

impl ModelArtifact {
    /// Structural checks done once at load time, so inference never sees a
    /// vector of the wrong shape.
    pub fn validate(&self) -> Result<(), String> {
        let dim = self.features.dimension();
        if dim == 0 {
            return Err("feature specification selects no features".into());
        }
        if self.support_vectors.is_empty() {
            return Err("no support vectors".into());
        }
        if self.dual_coef.len() != self.support_vectors.len() {
            return Err(format!(
                "{} dual coefficients for {} support vectors",
                self.dual_coef.len(),
                self.support_vectors.len()
            ));
        }
        for (i, sv) in self.support_vectors.iter().enumerate() {
            if sv.len() != dim {
                return Err(format!(
                    "support vector {i} has {} values, features produce {dim}",
                    sv.len()
                ));
            }
            if !all_finite(sv) {
                return Err(format!("support vector {i} has non-finite values"));
            }
        }
        if !all_finite(&self.dual_coef) || !all_finite(&[self.intercept, self.platt.a, self.platt.b]) {
            return Err("non-finite coefficient".into());
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!("threshold {} outside [0, 1]", self.threshold));
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != dim || scaler.scale.len() != dim {
                return Err(format!(
                    "scaler has {}/{} values, features produce {dim}",
                    scaler.mean.len(),
                    scaler.scale.len()
                ));
            }
            if !all_finite(&scaler.mean) || scaler.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
                return Err("scaler has non-finite or zero entries".into());
            }
        }
        self.kernel.validate()
    }
}
