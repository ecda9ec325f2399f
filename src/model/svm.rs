use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Kernels
// ---------------------------------------------------------------------------

/// Kernel functions understood by the model artifact, libsvm-compatible
/// plus Tanimoto for binary fingerprints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    Linear,
    Rbf { gamma: f64 },
    Polynomial { gamma: f64, coef0: f64, degree: u32 },
    Sigmoid { gamma: f64, coef0: f64 },
    Tanimoto,
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl Kernel {
    pub fn eval(&self, a: &[f64], b: &[f64]) -> f64 {
        match *self {
            Kernel::Linear => dot(a, b),
            Kernel::Rbf { gamma } => {
                let dist: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
                (-gamma * dist).exp()
            }
            Kernel::Polynomial {
                gamma,
                coef0,
                degree,
            } => (gamma * dot(a, b) + coef0).powi(degree as i32),
            Kernel::Sigmoid { gamma, coef0 } => (gamma * dot(a, b) + coef0).tanh(),
            Kernel::Tanimoto => {
                let ab = dot(a, b);
                let denom = dot(a, a) + dot(b, b) - ab;
                // Two empty fingerprints are identical.
                if denom == 0.0 {
                    1.0
                } else {
                    ab / denom
                }
            }
        }
    }

    /// Reject parameters that make the kernel meaningless.
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Kernel::Rbf { gamma } if !(gamma.is_finite() && gamma > 0.0) => {
                Err(format!("rbf gamma must be positive, got {gamma}"))
            }
            Kernel::Polynomial { degree: 0, .. } => Err("polynomial degree must be >= 1".into()),
            Kernel::Polynomial { gamma, coef0, .. } | Kernel::Sigmoid { gamma, coef0 }
                if !(gamma.is_finite() && coef0.is_finite()) =>
            {
                Err("kernel parameters must be finite".into())
            }
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Support vector machine (binary, dual form)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Svm {
    pub kernel: Kernel,
    pub support_vectors: Vec<Vec<f64>>,
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
}

impl Svm {
    /// `f(x) = Σ αᵢ K(svᵢ, x) + b`; positive values lean to class 1.
    pub fn decision_function(&self, x: &[f64]) -> f64 {
        self.support_vectors
            .iter()
            .zip(&self.dual_coef)
            .map(|(sv, alpha)| alpha * self.kernel.eval(sv, x))
            .sum::<f64>()
            + self.intercept
    }
}

// ---------------------------------------------------------------------------
// Platt scaling
// ---------------------------------------------------------------------------

/// Sigmoid calibration of decision values: `p = 1 / (1 + exp(a·f + b))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platt {
    pub a: f64,
    pub b: f64,
}

impl Platt {
    pub fn probability(&self, decision: f64) -> f64 {
        let f = decision * self.a + self.b;
        // Branch on sign so exp() never overflows.
        if f >= 0.0 {
            let e = (-f).exp();
            e / (1.0 + e)
        } else {
            1.0 / (1.0 + f.exp())
        }
    }
}

// ---------------------------------------------------------------------------
// Feature standardization
// ---------------------------------------------------------------------------

/// `(x - mean) / scale`, fitted at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn transform(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(v, (m, s))| (v - m) / s)
            .collect()
    }
}
