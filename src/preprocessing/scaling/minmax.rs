//! Min-Max Scaler.
//!
//! Transforms features by scaling each feature to a given range (default [0, 1]).
//!
//! ```text
//! X_scaled = (X - X_min) / (X_max - X_min) * (max - min) + min
//! ```
//!
//! Constant features use a range of 1, so they map to `min + (X - X_min)`.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::{check_finite, check_width, ScalerParams};
use crate::error::{PredictorError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::serialization::ArtifactKind;

/// Serializable parameters for a fitted MinMaxScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScalerParams {
    /// Target range `(min, max)`.
    pub feature_range: (f64, f64),
    /// Minimum of each feature seen during fit.
    pub data_min: Vec<f64>,
    /// Maximum of each feature seen during fit.
    pub data_max: Vec<f64>,
}

/// MinMaxScaler transformer (unfitted).
#[derive(Clone, Debug)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl Default for MinMaxScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl MinMaxScaler {
    /// Create a new MinMaxScaler with default range [0, 1].
    pub fn new() -> Self {
        Self { min: 0.0, max: 1.0 }
    }

    /// Set the target range.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

impl Transformer for MinMaxScaler {
    type Data = Array2<f64>;
    type Fitted = FittedMinMaxScaler;

    fn fit(&self, data: &Array2<f64>) -> Result<FittedMinMaxScaler> {
        if data.nrows() == 0 {
            return Err(PredictorError::EmptyData(
                "Cannot fit MinMaxScaler on empty data".to_string(),
            ));
        }

        let data_min = data.fold_axis(Axis(0), f64::INFINITY, |&acc, &x| acc.min(x));
        let data_max = data.fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &x| acc.max(x));

        FittedMinMaxScaler::new((self.min, self.max), data_min, data_max)
            .map_err(PredictorError::InvalidParameter)
    }
}

/// Fitted MinMaxScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedMinMaxScaler {
    feature_range: (f64, f64),
    data_min: Array1<f64>,
    data_max: Array1<f64>,
    /// (max - min) / (data_max - data_min), with a zero range replaced by 1.
    scale: Array1<f64>,
}

impl FittedMinMaxScaler {
    fn new(
        feature_range: (f64, f64),
        data_min: Array1<f64>,
        data_max: Array1<f64>,
    ) -> std::result::Result<Self, String> {
        let (min, max) = feature_range;
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(format!("invalid feature range ({}, {})", min, max));
        }
        if data_min.len() != data_max.len() {
            return Err(format!(
                "data_min has {} entries but data_max has {}",
                data_min.len(),
                data_max.len()
            ));
        }
        check_finite("data_min", &data_min)?;
        check_finite("data_max", &data_max)?;

        let range = &data_max - &data_min;
        if let Some(i) = range.iter().position(|&r| r < 0.0) {
            return Err(format!("data_max[{}] is below data_min[{}]", i, i));
        }
        let scale = range.mapv(|r| (max - min) / if r == 0.0 { 1.0 } else { r });

        Ok(Self {
            feature_range,
            data_min,
            data_max,
            scale,
        })
    }

    /// Get the per-feature minimum seen during fit.
    pub fn data_min(&self) -> &Array1<f64> {
        &self.data_min
    }

    /// Get the per-feature maximum seen during fit.
    pub fn data_max(&self) -> &Array1<f64> {
        &self.data_max
    }
}

impl FittedTransformer for FittedMinMaxScaler {
    type Input = Array1<f64>;
    type Output = Array1<f64>;
    type Params = ScalerParams;

    const KIND: ArtifactKind = ArtifactKind::Scaler;

    fn transform(&self, data: &Array1<f64>) -> Result<Array1<f64>> {
        check_width(self.data_min.len(), data)?;
        Ok((data - &self.data_min) * &self.scale + self.feature_range.0)
    }

    fn extract_params(&self) -> ScalerParams {
        ScalerParams::MinMax(MinMaxScalerParams {
            feature_range: self.feature_range,
            data_min: self.data_min.to_vec(),
            data_max: self.data_max.to_vec(),
        })
    }

    fn from_params(params: ScalerParams) -> std::result::Result<Self, String> {
        match params {
            ScalerParams::MinMax(p) => Self::new(
                p.feature_range,
                Array1::from(p.data_min),
                Array1::from(p.data_max),
            ),
            other => Err(format!("expected a min_max scaler, found {}", other.kind_name())),
        }
    }

    fn n_features_in(&self) -> usize {
        self.data_min.len()
    }

    fn n_features_out(&self) -> usize {
        self.data_min.len()
    }
}
