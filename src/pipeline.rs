//! Inference pipeline: feature record → encoder → scaler → classifier.
//!
//! ```text
//! MatchState ──FeatureBuilder──▶ FeatureRecord ──encoder──▶ EncodedVector
//!     ──scaler──▶ ScaledVector ──classifier.predict_proba──▶ [p_0, p_1, ...]
//!     ──positive class column──▶ win probability
//! ```
//!
//! Every call is synchronous and pure: nothing in the artifacts is mutated,
//! so the same input always produces the same output bit for bit.

use std::sync::Arc;

use log::{debug, error, warn};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::artifacts::Artifacts;
use crate::config::Config;
use crate::error::{ErrorClass, PredictorError, Result, Stage};
use crate::features::{FeatureBuilder, FeatureRecord, MatchState, ValidationPolicy};
use crate::model::InferenceModel;
use crate::preprocessing::FittedTransformer;

/// Distance outside [0, 1] that is treated as rounding noise and clamped.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Outcome of one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Probability that the batting side wins, in [0, 1].
    pub win_probability: f64,
}

impl PredictionResult {
    /// The probability as a percentage with two decimals, e.g. `"63.25%"`.
    pub fn as_percent(&self) -> String {
        format!("{:.2}%", self.win_probability * 100.0)
    }
}

/// Runs one feature record through the three artifacts.
#[derive(Debug, Clone, Copy)]
pub struct InferencePipeline<'a> {
    artifacts: &'a Artifacts,
}

impl<'a> InferencePipeline<'a> {
    pub fn new(artifacts: &'a Artifacts) -> Self {
        Self { artifacts }
    }

    /// One-hot encode the record.
    pub fn encode(&self, record: &FeatureRecord) -> Result<Array1<f64>> {
        let encoded = self.artifacts.encoder().transform(record)?;
        debug!("encoded {} columns into {} features", record.len(), encoded.len());
        Ok(encoded)
    }

    /// Scale an encoded vector, rejecting non-finite results.
    pub fn scale(&self, encoded: &Array1<f64>) -> Result<Array1<f64>> {
        let scaled = self.artifacts.scaler().transform(encoded)?;
        if scaled.iter().any(|v| !v.is_finite()) {
            return Err(PredictorError::NonFinite {
                stage: Stage::Scaler,
            });
        }
        debug!("scaled {} features", scaled.len());
        Ok(scaled)
    }

    /// Probability of the positive class for a scaled vector.
    pub fn classify(&self, scaled: &Array1<f64>) -> Result<f64> {
        let proba = self.artifacts.classifier().predict_proba(scaled)?;
        let p = proba[self.artifacts.positive_index()];
        debug!(
            "class probabilities {:?}, positive class {} -> {}",
            proba.to_vec(),
            self.artifacts.positive_class(),
            p
        );
        checked_probability(p)
    }

    /// Full pipeline for one record. Failures are logged by class before
    /// being returned.
    pub fn predict(&self, record: &FeatureRecord) -> Result<f64> {
        self.run(record).map_err(|err| {
            log_failure(&err);
            err
        })
    }

    fn run(&self, record: &FeatureRecord) -> Result<f64> {
        let encoded = self.encode(record)?;
        let scaled = self.scale(&encoded)?;
        self.classify(&scaled)
    }
}

/// Snap values within [`PROBABILITY_TOLERANCE`] of [0, 1] onto the bound;
/// anything further out or non-finite is a defect.
fn checked_probability(p: f64) -> Result<f64> {
    if !p.is_finite() || p < -PROBABILITY_TOLERANCE || p > 1.0 + PROBABILITY_TOLERANCE {
        return Err(PredictorError::InvalidProbability(p));
    }
    Ok(p.clamp(0.0, 1.0))
}

fn log_failure(err: &PredictorError) {
    match err.class() {
        ErrorClass::UserInput => warn!("prediction rejected: {}", err),
        ErrorClass::Systemic => error!(target: "artifact_skew", "{}", err),
        ErrorClass::Defect => error!("prediction defect: {}", err),
        ErrorClass::Fatal => error!("prediction failed: {}", err),
    }
}

/// Predict the batting side's win probability from the six raw inputs,
/// using the default (permissive) validation policy.
pub fn predict_win_probability(
    artifacts: &Artifacts,
    batting_team: &str,
    bowling_team: &str,
    city: &str,
    target_score: i64,
    current_score: i64,
    overs_remaining: f64,
) -> Result<f64> {
    let state = MatchState::new(
        batting_team,
        bowling_team,
        city,
        target_score,
        current_score,
        overs_remaining,
    );
    predict_state(artifacts, &FeatureBuilder::default(), &state).map(|r| r.win_probability)
}

/// Shared, cloneable entry point for presentation code.
#[derive(Debug, Clone)]
pub struct Predictor {
    artifacts: Arc<Artifacts>,
    builder: FeatureBuilder,
}

impl Predictor {
    pub fn new(artifacts: Arc<Artifacts>, policy: ValidationPolicy) -> Self {
        Self {
            artifacts,
            builder: FeatureBuilder::new(policy),
        }
    }

    /// Load the artifacts and validation policy named in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let artifacts = Artifacts::load(&config.artifacts)?;
        Ok(Self::new(Arc::new(artifacts), config.validation.clone()))
    }

    pub fn artifacts(&self) -> &Arc<Artifacts> {
        &self.artifacts
    }

    pub fn policy(&self) -> &ValidationPolicy {
        self.builder.policy()
    }

    /// Validate the state, build its record and run the pipeline.
    pub fn predict(&self, state: &MatchState) -> Result<PredictionResult> {
        predict_state(&self.artifacts, &self.builder, state)
    }
}

fn predict_state(
    artifacts: &Artifacts,
    builder: &FeatureBuilder,
    state: &MatchState,
) -> Result<PredictionResult> {
    let record = builder.build(state).map_err(|err| {
        log_failure(&err);
        err
    })?;
    let win_probability = InferencePipeline::new(artifacts).predict(&record)?;
    Ok(PredictionResult { win_probability })
}
