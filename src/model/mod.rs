//! Pretrained permeability classifier: artifact loading and inference.

pub mod artifact;
pub mod svm;

use std::fmt;
use std::path::Path;

use log::debug;
use serde::Serialize;

use self::artifact::ModelArtifact;
use self::svm::{Platt, StandardScaler, Svm};
use crate::chem::FeatureSpec;
use crate::error::{Error, Result, RowError};

/// Name of the appended output column: probability of poor permeability.
pub const OUTPUT_COLUMN: &str = "pampa5_proba1";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("feature vector has {got} values, model expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("classifier produced a non-finite probability")]
    NonFinite,
}

/// Anything that maps a feature vector to P(class 1).
pub trait Classifier: Send + Sync {
    fn dimension(&self) -> usize;
    fn predict_proba(&self, features: &[f64]) -> std::result::Result<f64, InferenceError>;
}

// ---------------------------------------------------------------------------
// SVM-backed classifier
// ---------------------------------------------------------------------------

pub struct SvmClassifier {
    dimension: usize,
    scaler: Option<StandardScaler>,
    svm: Svm,
    platt: Platt,
}

impl Classifier for SvmClassifier {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn predict_proba(&self, features: &[f64]) -> std::result::Result<f64, InferenceError> {
        if features.len() != self.dimension {
            return Err(InferenceError::DimensionMismatch {
                expected: self.dimension,
                got: features.len(),
            });
        }
        let decision = match &self.scaler {
            Some(scaler) => self.svm.decision_function(&scaler.transform(features)),
            None => self.svm.decision_function(features),
        };
        let p = self.platt.probability(decision);
        if !p.is_finite() {
            return Err(InferenceError::NonFinite);
        }
        Ok(p.clamp(0.0, 1.0))
    }
}

// ---------------------------------------------------------------------------
// Permeability class label
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermeabilityClass {
    Low,
    ModerateOrHigh,
}

impl fmt::Display for PermeabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermeabilityClass::Low => write!(f, "low permeability"),
            PermeabilityClass::ModerateOrHigh => write!(f, "moderate or high permeability"),
        }
    }
}

// ---------------------------------------------------------------------------
// Model card – what `info` prints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ModelCard {
    pub name: String,
    pub version: String,
    pub description: String,
    pub input: &'static str,
    pub output: &'static str,
    pub output_type: &'static str,
    pub feature_dimension: usize,
    pub threshold: f64,
}

// ---------------------------------------------------------------------------
// PermeabilityModel – featurizer + classifier, loaded once per process
// ---------------------------------------------------------------------------

pub struct PermeabilityModel {
    features: FeatureSpec,
    classifier: Box<dyn Classifier>,
    threshold: f64,
    card: ModelCard,
}

impl PermeabilityModel {
    pub fn from_artifact(artifact: ModelArtifact) -> std::result::Result<Self, String> {
        artifact.validate()?;
        let dimension = artifact.features.dimension();
        let card = ModelCard {
            name: artifact.name,
            version: artifact.version,
            description: artifact.description,
            input: "Compound (SMILES)",
            output: OUTPUT_COLUMN,
            output_type: "Probability",
            feature_dimension: dimension,
            threshold: artifact.threshold,
        };
        let classifier = SvmClassifier {
            dimension,
            scaler: artifact.scaler,
            svm: Svm {
                kernel: artifact.kernel,
                support_vectors: artifact.support_vectors,
                dual_coef: artifact.dual_coef,
                intercept: artifact.intercept,
            },
            platt: artifact.platt,
        };
        Ok(Self::with_classifier(
            artifact.features,
            Box::new(classifier),
            artifact.threshold,
            card,
        ))
    }

    /// Pair a featurizer with any [`Classifier`].
    pub fn with_classifier(
        features: FeatureSpec,
        classifier: Box<dyn Classifier>,
        threshold: f64,
        card: ModelCard,
    ) -> Self {
        Self {
            features,
            classifier,
            threshold,
            card,
        }
    }

    pub fn card(&self) -> &ModelCard {
        &self.card
    }

    /// Featurize one compound and return P(poorly permeable).
    pub fn predict(&self, smiles: &str) -> std::result::Result<f64, RowError> {
        let features = self.features.featurize(smiles)?;
        if features.len() != self.classifier.dimension() {
            return Err(InferenceError::DimensionMismatch {
                expected: self.classifier.dimension(),
                got: features.len(),
            }
            .into());
        }
        Ok(self.classifier.predict_proba(&features)?)
    }

    pub fn classify(&self, probability: f64) -> PermeabilityClass {
        if probability >= self.threshold {
            PermeabilityClass::Low
        } else {
            PermeabilityClass::ModerateOrHigh
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Label used in messages for the compiled-in artifact.
pub const BUNDLED_MODEL: &str = "checkpoints/pampa5_svm.json";

/// The artifact shipped in `checkpoints/`, compiled into the binary so it
/// loads the same way whatever the working directory.
const BUNDLED_ARTIFACT: &str = include_str!("../../checkpoints/pampa5_svm.json");

/// Load the artifact at `path`, or the bundled one when no path is given.
pub fn resolve_model(path: Option<&Path>) -> Result<PermeabilityModel> {
    match path {
        Some(path) => load_model(path),
        None => load_bundled_model(),
    }
}

/// Load and validate the model artifact at `path`.
pub fn load_model(path: &Path) -> Result<PermeabilityModel> {
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => Error::ModelNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::ModelRead {
            path: path.to_path_buf(),
            source,
        },
    })?;
    parse_model(&text, path)
}

/// Load the compiled-in demonstration artifact.
pub fn load_bundled_model() -> Result<PermeabilityModel> {
    parse_model(BUNDLED_ARTIFACT, Path::new(BUNDLED_MODEL))
}

fn parse_model(text: &str, origin: &Path) -> Result<PermeabilityModel> {
    let corrupt = |reason: String| Error::ModelCorrupt {
        path: origin.to_path_buf(),
        reason,
    };
    let artifact: ModelArtifact = serde_json::from_str(text).map_err(|e| corrupt(e.to_string()))?;
    let model = PermeabilityModel::from_artifact(artifact).map_err(corrupt)?;

    debug!(
        "loaded model {} v{} ({} features) from {}",
        model.card.name,
        model.card.version,
        model.card.feature_dimension,
        origin.display()
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::FingerprintSpec;

    struct Constant(f64);

    impl Classifier for Constant {
        fn dimension(&self) -> usize {
            16
        }
        fn predict_proba(&self, _: &[f64]) -> std::result::Result<f64, InferenceError> {
            Ok(self.0)
        }
    }

    fn card() -> ModelCard {
        ModelCard {
            name: "test".into(),
            version: "0".into(),
            description: String::new(),
            input: "Compound (SMILES)",
            output: OUTPUT_COLUMN,
            output_type: "Probability",
            feature_dimension: 16,
            threshold: 0.5,
        }
    }

    fn descriptors_only() -> FeatureSpec {
        FeatureSpec {
            descriptors: true,
            fingerprint: None,
        }
    }

    #[test]
    fn opaque_classifier_is_used() {
        let model = PermeabilityModel::with_classifier(descriptors_only(), Box::new(Constant(0.7)), 0.5, card());
        assert_eq!(model.predict("CCO"), Ok(0.7));
        assert_eq!(model.classify(0.7), PermeabilityClass::Low);
        assert_eq!(model.classify(0.2).to_string(), "moderate or high permeability");
        assert!(matches!(model.predict("C1CC"), Err(RowError::Smiles(_))));
    }

    #[test]
    fn featurizer_classifier_mismatch_is_row_error() {
        let features = FeatureSpec {
            descriptors: true,
            fingerprint: Some(FingerprintSpec { radius: 1, bits: 8 }),
        };
        let model = PermeabilityModel::with_classifier(features, Box::new(Constant(0.7)), 0.5, card());
        assert!(matches!(
            model.predict("CCO"),
            Err(RowError::Inference(InferenceError::DimensionMismatch { expected: 16, got: 24 }))
        ));
    }

    #[test]
    fn missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(&dir.path().join("absent.json")).err().unwrap();
        assert!(matches!(err, Error::ModelNotFound { .. }));
    }

    #[test]
    fn garbage_artifact_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_model(&path), Err(Error::ModelCorrupt { .. })));
    }

    #[test]
    fn bundled_artifact_loads_and_predicts() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("checkpoints/pampa5_svm.json");
        let model = load_model(&path).unwrap();
        assert_eq!(model.card().output, OUTPUT_COLUMN);
        for smiles in ["CCO", "CC(=O)Oc1ccccc1C(=O)O", "CCCCCCCCCCCCCCCC"] {
            let p = model.predict(smiles).unwrap();
            assert!((0.0..=1.0).contains(&p), "{smiles}: {p}");
        }
    }

    #[test]
    fn compiled_in_artifact_matches_the_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(BUNDLED_MODEL);
        let from_file = load_model(&path).unwrap();
        let bundled = resolve_model(None).unwrap();
        assert_eq!(bundled.card().name, from_file.card().name);
        for smiles in ["CCO", "c1ccncc1", "OCC1OC(O)C(O)C(O)C1O"] {
            assert_eq!(bundled.predict(smiles), from_file.predict(smiles));
        }
    }
}
