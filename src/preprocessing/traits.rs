//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: unfitted, carries hyperparameters and learns from data.
//! - [`FittedTransformer`]: holds learned parameters, transforms one row at a
//!   time and round-trips through an artifact file.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ArtifactLoadError, LoadFailure, Result};
use crate::serialization::{read_artifact, write_artifact, ArtifactKind};

/// Trait for unfitted transformers with hyperparameters.
///
/// Fitting is only used to build fixtures; production artifacts are fitted
/// offline and loaded through [`FittedTransformer::load_from_file`].
///
/// # Example
/// ```ignore
/// let scaler = StandardScaler::new();
/// let fitted = scaler.fit(&rows)?;
/// let scaled = fitted.transform(&row)?;
/// ```
pub trait Transformer: Clone {
    /// Training data the transformer learns from.
    type Data: ?Sized;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer;

    /// Learn parameters from the training data.
    ///
    /// # Errors
    /// Returns an error if the data is empty or has an inconsistent layout.
    fn fit(&self, data: &Self::Data) -> Result<Self::Fitted>;
}

/// Trait for fitted transformers ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `from_params()` rejects parameters that could not have come from a fit
///   (mismatched lengths, non-finite statistics).
pub trait FittedTransformer: Sized {
    /// One input row.
    type Input: ?Sized;
    /// One output row.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: Serialize + DeserializeOwned;

    /// Artifact slot this transformer is stored in.
    const KIND: ArtifactKind;

    /// Transform one row using learned parameters.
    ///
    /// # Errors
    /// Returns an error if the row does not have the fitted layout.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    ///
    /// The error string describes which consistency check failed.
    fn from_params(params: Self::Params) -> std::result::Result<Self, String>;

    /// Number of values in an input row.
    fn n_features_in(&self) -> usize;

    /// Number of values in an output row.
    fn n_features_out(&self) -> usize;

    /// Save the fitted transformer as an artifact file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_artifact(path, Self::KIND, &self.extract_params())
    }

    /// Load a fitted transformer from an artifact file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ArtifactLoadError> {
        let path = path.as_ref();
        let params: Self::Params = read_artifact(path, Self::KIND)?;
        Self::from_params(params).map_err(|reason| {
            ArtifactLoadError::new(Self::KIND, path, LoadFailure::Invalid(reason))
        })
    }
}
