//! Artifact store: the fitted encoder, scaler and classifier, loaded once.
//!
//! [`Artifacts`] is immutable after construction. Share it across threads
//! behind an `Arc`; no locking is needed.

use std::path::Path;

use log::{debug, info, warn};

use crate::config::ArtifactConfig;
use crate::error::{ArtifactLoadError, LoadFailure, PredictorError, Result, Stage};
use crate::model::{Classifier, InferenceModel};
use crate::preprocessing::{FittedOneHotEncoder, FittedScaler, FittedTransformer};
use crate::serialization::ArtifactKind;

/// Default label of the "batting side wins" class.
pub const DEFAULT_POSITIVE_CLASS: i64 = 1;

/// The three fitted objects plus the resolved positive-class column.
#[derive(Debug, Clone)]
pub struct Artifacts {
    encoder: FittedOneHotEncoder,
    scaler: FittedScaler,
    classifier: Classifier,
    positive_class: i64,
    positive_index: usize,
}

impl Artifacts {
    /// Load all three artifacts named in `config`.
    ///
    /// # Errors
    /// The first artifact that is missing, corrupt or inconsistent, or a
    /// positive class the classifier does not know.
    pub fn load(config: &ArtifactConfig) -> std::result::Result<Self, ArtifactLoadError> {
        Self::load_from_paths(
            &config.encoder,
            &config.scaler,
            &config.classifier,
            config.positive_class,
        )
    }

    pub fn load_from_paths(
        encoder: impl AsRef<Path>,
        scaler: impl AsRef<Path>,
        classifier: impl AsRef<Path>,
        positive_class: i64,
    ) -> std::result::Result<Self, ArtifactLoadError> {
        let encoder_path = encoder.as_ref();
        let encoder = FittedOneHotEncoder::load_from_file(encoder_path)?;
        debug!(
            "loaded encoder from {} ({} -> {} features)",
            encoder_path.display(),
            encoder.n_features_in(),
            encoder.n_features_out()
        );

        let scaler_path = scaler.as_ref();
        let scaler = FittedScaler::load_from_file(scaler_path)?;
        debug!(
            "loaded scaler from {} ({} features)",
            scaler_path.display(),
            scaler.n_features_in()
        );

        let classifier_path = classifier.as_ref();
        let classifier = Classifier::load_from_file(classifier_path)?;
        debug!(
            "loaded classifier from {} (classes {:?}, {} features)",
            classifier_path.display(),
            classifier.classes(),
            classifier.n_features_in()
        );

        Self::from_parts(encoder, scaler, classifier, positive_class).map_err(|reason| {
            ArtifactLoadError::new(ArtifactKind::Classifier, classifier_path, reason)
        })
    }

    /// Assemble already-built artifacts.
    ///
    /// Fails only when `positive_class` is not one of the classifier's labels.
    /// Width disagreements between the stages are logged, not rejected; they
    /// surface per request as `ShapeMismatch`.
    pub fn from_parts(
        encoder: FittedOneHotEncoder,
        scaler: impl Into<FittedScaler>,
        classifier: impl Into<Classifier>,
        positive_class: i64,
    ) -> std::result::Result<Self, LoadFailure> {
        let scaler = scaler.into();
        let classifier = classifier.into();

        let positive_index =
            classifier
                .class_index(positive_class)
                .ok_or_else(|| LoadFailure::MissingPositiveClass {
                    label: positive_class,
                    classes: classifier.classes().to_vec(),
                })?;

        let artifacts = Self {
            encoder,
            scaler,
            classifier,
            positive_class,
            positive_index,
        };
        artifacts.warn_on_width_skew();
        info!(
            "artifacts ready: {} encoded features, positive class {} at column {}",
            artifacts.encoder.n_features_out(),
            positive_class,
            positive_index
        );
        Ok(artifacts)
    }

    fn warn_on_width_skew(&self) {
        let encoded = self.encoder.n_features_out();
        let scaler_in = self.scaler.n_features_in();
        let classifier_in = self.classifier.n_features_in();
        if encoded != scaler_in {
            warn!(
                target: "artifact_skew",
                "encoder produces {} features but scaler expects {}",
                encoded,
                scaler_in
            );
        }
        if self.scaler.n_features_out() != classifier_in {
            warn!(
                target: "artifact_skew",
                "scaler produces {} features but classifier expects {}",
                self.scaler.n_features_out(),
                classifier_in
            );
        }
    }

    /// Whether all three stages agree on their widths.
    pub fn widths_consistent(&self) -> bool {
        self.encoder.n_features_out() == self.scaler.n_features_in()
            && self.scaler.n_features_out() == self.classifier.n_features_in()
    }

    /// First stage whose input width disagrees with its upstream output.
    pub fn width_mismatch(&self) -> Option<PredictorError> {
        let encoded = self.encoder.n_features_out();
        if encoded != self.scaler.n_features_in() {
            return Some(PredictorError::ShapeMismatch {
                stage: Stage::Scaler,
                expected: self.scaler.n_features_in(),
                got: encoded,
            });
        }
        let scaled = self.scaler.n_features_out();
        if scaled != self.classifier.n_features_in() {
            return Some(PredictorError::ShapeMismatch {
                stage: Stage::Classifier,
                expected: self.classifier.n_features_in(),
                got: scaled,
            });
        }
        None
    }

    pub fn encoder(&self) -> &FittedOneHotEncoder {
        &self.encoder
    }

    pub fn scaler(&self) -> &FittedScaler {
        &self.scaler
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn positive_class(&self) -> i64 {
        self.positive_class
    }

    /// Column of `predict_proba` reported as the win probability.
    pub fn positive_index(&self) -> usize {
        self.positive_index
    }

    /// Save all three artifacts; each format follows its file extension.
    pub fn save(
        &self,
        encoder: impl AsRef<Path>,
        scaler: impl AsRef<Path>,
        classifier: impl AsRef<Path>,
    ) -> Result<()> {
        self.encoder.save_to_file(encoder)?;
        self.scaler.save_to_file(scaler)?;
        self.classifier.save_to_file(classifier)?;
        Ok(())
    }
}
