//! Fitted classifiers for win/loss probability.
//!
//! Classifiers are inference-only: they are built from stored parameters and
//! never trained here. Two kinds are supported:
//! - [`RandomForestClassifier`]: averages per-tree leaf class distributions.
//! - [`LogisticClassifier`]: binary logistic regression.
//!
//! Both store their parameters as a [`ClassifierParams`] variant so either one
//! loads into the [`Classifier`] slot of the artifact store.

pub mod forest;
pub mod logistic;

pub use forest::{Node, RandomForestClassifier, RandomForestParams, TreeParams};
pub use logistic::{LogisticClassifier, LogisticParams};

use std::collections::HashSet;
use std::path::Path;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{ArtifactLoadError, LoadFailure, PredictorError, Result, Stage};
use crate::serialization::{read_artifact, write_artifact, ArtifactKind};

/// A fitted model that maps one scaled feature vector to class probabilities.
///
/// # Guarantees
/// - `predict_proba` returns one value per entry of `classes()`, in that order.
/// - `extract_params()` + `from_params()` is a round-trip.
pub trait InferenceModel: Sized {
    /// Integer class labels, in the column order of `predict_proba`.
    fn classes(&self) -> &[i64];

    /// Width of the input vector.
    fn n_features_in(&self) -> usize;

    /// Class probabilities for a single sample.
    ///
    /// # Errors
    /// `ShapeMismatch` (stage `classifier`) if the input width is wrong.
    fn predict_proba(&self, input: &Array1<f64>) -> Result<Array1<f64>>;

    fn extract_params(&self) -> ClassifierParams;

    /// Reconstruct a model from parameters, checking their consistency.
    fn from_params(params: ClassifierParams) -> std::result::Result<Self, String>;

    /// Save the model as a classifier artifact.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_artifact(path, ArtifactKind::Classifier, &self.extract_params())
    }

    /// Load a model from a classifier artifact.
    fn load_from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ArtifactLoadError> {
        let path = path.as_ref();
        let params: ClassifierParams = read_artifact(path, ArtifactKind::Classifier)?;
        Self::from_params(params).map_err(|reason| {
            ArtifactLoadError::new(ArtifactKind::Classifier, path, LoadFailure::Invalid(reason))
        })
    }

    /// Column of `predict_proba` holding `label`, if the model knows it.
    fn class_index(&self, label: i64) -> Option<usize> {
        self.classes().iter().position(|&c| c == label)
    }
}

/// Parameters of any supported classifier, tagged by kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierParams {
    RandomForest(RandomForestParams),
    Logistic(LogisticParams),
}

impl ClassifierParams {
    fn kind_name(&self) -> &'static str {
        match self {
            ClassifierParams::RandomForest(_) => "random_forest",
            ClassifierParams::Logistic(_) => "logistic",
        }
    }
}

/// A fitted classifier of either kind.
#[derive(Clone, Debug)]
pub enum Classifier {
    RandomForest(RandomForestClassifier),
    Logistic(LogisticClassifier),
}

impl From<RandomForestClassifier> for Classifier {
    fn from(model: RandomForestClassifier) -> Self {
        Classifier::RandomForest(model)
    }
}

impl From<LogisticClassifier> for Classifier {
    fn from(model: LogisticClassifier) -> Self {
        Classifier::Logistic(model)
    }
}

impl InferenceModel for Classifier {
    fn classes(&self) -> &[i64] {
        match self {
            Classifier::RandomForest(m) => m.classes(),
            Classifier::Logistic(m) => m.classes(),
        }
    }

    fn n_features_in(&self) -> usize {
        match self {
            Classifier::RandomForest(m) => m.n_features_in(),
            Classifier::Logistic(m) => m.n_features_in(),
        }
    }

    fn predict_proba(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        match self {
            Classifier::RandomForest(m) => m.predict_proba(input),
            Classifier::Logistic(m) => m.predict_proba(input),
        }
    }

    fn extract_params(&self) -> ClassifierParams {
        match self {
            Classifier::RandomForest(m) => m.extract_params(),
            Classifier::Logistic(m) => m.extract_params(),
        }
    }

    fn from_params(params: ClassifierParams) -> std::result::Result<Self, String> {
        match params {
            p @ ClassifierParams::RandomForest(_) => {
                RandomForestClassifier::from_params(p).map(Self::from)
            }
            p @ ClassifierParams::Logistic(_) => LogisticClassifier::from_params(p).map(Self::from),
        }
    }
}

fn check_width(expected: usize, input: &Array1<f64>) -> Result<()> {
    if input.len() != expected {
        return Err(PredictorError::ShapeMismatch {
            stage: Stage::Classifier,
            expected,
            got: input.len(),
        });
    }
    Ok(())
}

fn check_classes(classes: &[i64]) -> std::result::Result<(), String> {
    if classes.len() < 2 {
        return Err(format!("need at least 2 classes, got {}", classes.len()));
    }
    let unique: HashSet<i64> = classes.iter().copied().collect();
    if unique.len() != classes.len() {
        return Err(format!("duplicate class labels in {:?}", classes));
    }
    Ok(())
}
