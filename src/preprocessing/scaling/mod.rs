//! Scaling transformers for the encoded feature vector.
//!
//! | Transformer | Description |
//! |-------------|-------------|
//! | [`StandardScaler`] | Z-score normalization (mean=0, std=1) |
//! | [`MinMaxScaler`] | Scale to [0, 1] or a custom range |
//!
//! Both store their parameters as a [`ScalerParams`] variant, so a file
//! written by either one loads into the [`FittedScaler`] slot of the
//! artifact store.

pub mod minmax;
pub mod standard;

pub use minmax::{FittedMinMaxScaler, MinMaxScaler, MinMaxScalerParams};
pub use standard::{FittedStandardScaler, StandardScaler, StandardScalerParams};

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result, Stage};
use crate::preprocessing::traits::FittedTransformer;
use crate::serialization::ArtifactKind;

/// Parameters of any supported scaler, tagged by kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerParams {
    Standard(StandardScalerParams),
    MinMax(MinMaxScalerParams),
}

impl ScalerParams {
    fn kind_name(&self) -> &'static str {
        match self {
            ScalerParams::Standard(_) => "standard",
            ScalerParams::MinMax(_) => "min_max",
        }
    }
}

/// A fitted scaler of either kind.
#[derive(Clone, Debug)]
pub enum FittedScaler {
    Standard(FittedStandardScaler),
    MinMax(FittedMinMaxScaler),
}

impl From<FittedStandardScaler> for FittedScaler {
    fn from(scaler: FittedStandardScaler) -> Self {
        FittedScaler::Standard(scaler)
    }
}

impl From<FittedMinMaxScaler> for FittedScaler {
    fn from(scaler: FittedMinMaxScaler) -> Self {
        FittedScaler::MinMax(scaler)
    }
}

impl FittedTransformer for FittedScaler {
    type Input = Array1<f64>;
    type Output = Array1<f64>;
    type Params = ScalerParams;

    const KIND: ArtifactKind = ArtifactKind::Scaler;

    fn transform(&self, data: &Array1<f64>) -> Result<Array1<f64>> {
        match self {
            FittedScaler::Standard(s) => s.transform(data),
            FittedScaler::MinMax(s) => s.transform(data),
        }
    }

    fn extract_params(&self) -> ScalerParams {
        match self {
            FittedScaler::Standard(s) => s.extract_params(),
            FittedScaler::MinMax(s) => s.extract_params(),
        }
    }

    fn from_params(params: ScalerParams) -> std::result::Result<Self, String> {
        match params {
            p @ ScalerParams::Standard(_) => FittedStandardScaler::from_params(p).map(Self::from),
            p @ ScalerParams::MinMax(_) => FittedMinMaxScaler::from_params(p).map(Self::from),
        }
    }

    fn n_features_in(&self) -> usize {
        match self {
            FittedScaler::Standard(s) => s.n_features_in(),
            FittedScaler::MinMax(s) => s.n_features_in(),
        }
    }

    fn n_features_out(&self) -> usize {
        self.n_features_in()
    }
}

fn check_width(expected: usize, data: &Array1<f64>) -> Result<()> {
    if data.len() != expected {
        return Err(PredictorError::ShapeMismatch {
            stage: Stage::Scaler,
            expected,
            got: data.len(),
        });
    }
    Ok(())
}

fn check_finite(name: &str, values: &Array1<f64>) -> std::result::Result<(), String> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(format!("{}[{}] is not finite", name, i)),
        None => Ok(()),
    }
}
