//! Classifier artifacts and per-model prediction outcomes
//!
//! Every artifact kind is adapted at load time to one capability,
//! [`ModelArtifact::produce_probabilities`]. A prediction attempt never fails
//! the request: it either yields a probability vector of the expected width or
//! a [`SkipReason`].

use crate::vectorizer::FeatureVector;
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{Linear, Module};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use vartha_core::{Error, Result};

/// In-process probability function
pub type ProbabilityFn = Arc<dyn Fn(&FeatureVector) -> Result<Vec<f32>> + Send + Sync>;

/// A loaded classifier artifact
#[derive(Clone)]
pub enum ModelArtifact {
    /// Softmax-normalized linear head over the feature vector
    Linear(LinearModel),

    /// A fixed probability vector returned for every input
    Precomputed(Vec<f32>),

    /// An arbitrary function registered in-process
    Callable(ProbabilityFn),
}

impl ModelArtifact {
    /// Wrap a closure as an artifact
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&FeatureVector) -> Result<Vec<f32>> + Send + Sync + 'static,
    {
        Self::Callable(Arc::new(f))
    }

    /// Produce a probability vector for one feature vector
    pub fn produce_probabilities(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        match self {
            Self::Linear(model) => model.predict_proba(features),
            Self::Precomputed(probabilities) => Ok(probabilities.clone()),
            Self::Callable(f) => f(features),
        }
    }

    /// Output width when known without running the model
    pub fn output_width(&self) -> Option<usize> {
        match self {
            Self::Linear(model) => Some(model.num_classes()),
            Self::Precomputed(probabilities) => Some(probabilities.len()),
            Self::Callable(_) => None,
        }
    }

    /// Short kind name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::Precomputed(_) => "probabilities",
            Self::Callable(_) => "callable",
        }
    }
}

impl fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear(model) => f.debug_tuple("Linear").field(model).finish(),
            Self::Precomputed(p) => f.debug_tuple("Precomputed").field(p).finish(),
            Self::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// Multinomial logistic regression head: `softmax(W · x + b)`
#[derive(Clone)]
pub struct LinearModel {
    linear: Linear,
    num_classes: usize,
    num_features: usize,
    device: Device,
}

impl LinearModel {
    /// Build from a `[num_classes, num_features]` weight and optional `[num_classes]` bias
    pub fn new(weight: Tensor, bias: Option<Tensor>) -> Result<Self> {
        let weight = weight.to_dtype(DType::F32).map_err(candle_err("weight dtype"))?;
        let (num_classes, num_features) = weight.dims2().map_err(candle_err("weight shape"))?;

        let bias = match bias {
            Some(bias) => {
                let bias = bias.to_dtype(DType::F32).map_err(candle_err("bias dtype"))?;
                let width = bias.dims1().map_err(candle_err("bias shape"))?;
                if width != num_classes {
                    return Err(Error::model(format!(
                        "bias has {} entries but weight has {} classes",
                        width, num_classes
                    )));
                }
                Some(bias)
            }
            None => None,
        };

        let device = weight.device().clone();
        Ok(Self {
            linear: Linear::new(weight, bias),
            num_classes,
            num_features,
            device,
        })
    }

    /// Build from row-major weights on the CPU
    pub fn from_weights(
        weights: Vec<f32>,
        num_classes: usize,
        num_features: usize,
        bias: Option<Vec<f32>>,
    ) -> Result<Self> {
        let device = Device::Cpu;
        let weight = Tensor::from_vec(weights, (num_classes, num_features), &device)
            .map_err(candle_err("weight tensor"))?;
        let bias = match bias {
            Some(b) => {
                let len = b.len();
                Some(Tensor::from_vec(b, len, &device).map_err(candle_err("bias tensor"))?)
            }
            None => None,
        };
        Self::new(weight, bias)
    }

    /// Load `weight` and optional `bias` tensors from a safetensors file
    pub fn from_safetensors(path: &Path) -> Result<Self> {
        let mut tensors = candle_core::safetensors::load(path, &Device::Cpu).map_err(|e| {
            Error::artifact(format!("Failed to load SafeTensors {}: {}", path.display(), e))
        })?;

        let weight = tensors.remove("weight").ok_or_else(|| {
            Error::artifact(format!("{} has no 'weight' tensor", path.display()))
        })?;
        let bias = tensors.remove("bias");

        Self::new(weight, bias)
    }

    /// Number of output classes
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Expected input width
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Class probabilities for one feature vector
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        if features.dim() != self.num_features {
            return Err(Error::model(format!(
                "feature width {} does not match model input {}",
                features.dim(),
                self.num_features
            )));
        }

        let x = Tensor::from_vec(features.to_dense(), (1, self.num_features), &self.device)
            .map_err(candle_err("input tensor"))?;
        let logits = self.linear.forward(&x).map_err(candle_err("forward"))?;

        candle_nn::ops::softmax(&logits, D::Minus1)
            .map_err(candle_err("softmax"))?
            .squeeze(0)
            .map_err(candle_err("squeeze"))?
            .to_vec1::<f32>()
            .map_err(candle_err("to_vec1"))
    }
}

impl fmt::Debug for LinearModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearModel")
            .field("num_classes", &self.num_classes)
            .field("num_features", &self.num_features)
            .finish()
    }
}

fn candle_err(stage: &'static str) -> impl Fn(candle_core::Error) -> Error {
    move |e| Error::model(format!("{} failed: {}", stage, e))
}

/// First entry that is not a finite value in [0, 1]
pub fn first_invalid_probability(probabilities: &[f32]) -> Option<(usize, f32)> {
    probabilities
        .iter()
        .copied()
        .enumerate()
        .find(|(_, p)| !(p.is_finite() && (0.0..=1.0).contains(p)))
}

/// Why a model's output was left out of the ensemble
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The artifact returned an error
    InvocationFailed(String),

    /// The output width differs from the label encoder's class count
    LengthMismatch { expected: usize, actual: usize },

    /// An entry is NaN, infinite or outside [0, 1]
    InvalidProbabilities { index: usize, value: f32 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvocationFailed(msg) => write!(f, "invocation failed: {}", msg),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected {} probabilities, got {}", expected, actual)
            }
            Self::InvalidProbabilities { index, value } => {
                write!(f, "probability {} at index {} is not in [0, 1]", value, index)
            }
        }
    }
}

/// Result of one per-model prediction attempt
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Probabilities(Vec<f32>),
    Skipped { model: String, reason: SkipReason },
}

impl PredictionOutcome {
    /// Run `artifact` and check its output against `num_classes` and the
    /// [0, 1] range
    pub fn attempt(
        model: &str,
        artifact: &ModelArtifact,
        features: &FeatureVector,
        num_classes: usize,
    ) -> Self {
        match artifact.produce_probabilities(features) {
            Ok(probabilities) if probabilities.len() != num_classes => Self::Skipped {
                model: model.to_string(),
                reason: SkipReason::LengthMismatch {
                    expected: num_classes,
                    actual: probabilities.len(),
                },
            },
            Ok(probabilities) => match first_invalid_probability(&probabilities) {
                Some((index, value)) => Self::Skipped {
                    model: model.to_string(),
                    reason: SkipReason::InvalidProbabilities { index, value },
                },
                None => Self::Probabilities(probabilities),
            },
            Err(e) => Self::Skipped {
                model: model.to_string(),
                reason: SkipReason::InvocationFailed(e.to_string()),
            },
        }
    }

    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Probabilities(_))
    }
}
