//! Standard Scaler (Z-score normalization).
//!
//! The standard score of a sample `x` is calculated as:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the mean of the training samples and `s` the population
//! standard deviation. Constant features get `s = 1`.
//!
//! # Example
//! ```ignore
//! use ipl_predictor::preprocessing::{StandardScaler, Transformer, FittedTransformer};
//!
//! let fitted = StandardScaler::new().fit(&encoded_rows)?;
//! let scaled = fitted.transform(&encoded_row)?;
//!
//! // Later, for inference:
//! let loaded = FittedStandardScaler::load_from_file("scaler.bin")?;
//! ```

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::{check_finite, check_width, ScalerParams};
use crate::error::{PredictorError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::serialization::ArtifactKind;

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Mean of each feature (zeros if fitted without centering).
    pub mean: Vec<f64>,
    /// Divisor of each feature (ones if fitted without scaling).
    pub scale: Vec<f64>,
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug)]
pub struct StandardScaler {
    with_mean: bool,
    with_std: bool,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    /// Create a new StandardScaler that centers and scales.
    pub fn new() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.with_std = with_std;
        self
    }
}

impl Transformer for StandardScaler {
    type Data = Array2<f64>;
    type Fitted = FittedStandardScaler;

    fn fit(&self, data: &Array2<f64>) -> Result<FittedStandardScaler> {
        let (rows, cols) = data.dim();
        if rows == 0 {
            return Err(PredictorError::EmptyData(
                "Cannot fit StandardScaler on empty data".to_string(),
            ));
        }

        let mean = if self.with_mean {
            data.mean_axis(Axis(0))
                .ok_or_else(|| PredictorError::EmptyData("no rows to average".to_string()))?
        } else {
            Array1::zeros(cols)
        };

        let scale = if self.with_std {
            // population std (ddof=0)
            data.std_axis(Axis(0), 0.0)
                .mapv(|s| if s == 0.0 { 1.0 } else { s })
        } else {
            Array1::ones(cols)
        };

        FittedStandardScaler::new(mean, scale).map_err(PredictorError::InvalidParameter)
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedStandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl FittedStandardScaler {
    fn new(mean: Array1<f64>, scale: Array1<f64>) -> std::result::Result<Self, String> {
        if mean.len() != scale.len() {
            return Err(format!(
                "mean has {} entries but scale has {}",
                mean.len(),
                scale.len()
            ));
        }
        check_finite("mean", &mean)?;
        check_finite("scale", &scale)?;
        if let Some(i) = scale.iter().position(|&s| s < 0.0) {
            return Err(format!("scale[{}] is negative", i));
        }
        // Zero-variance columns divide by 1
        let scale = scale.mapv(|s| if s == 0.0 { 1.0 } else { s });
        if let Some(i) = scale.iter().position(|&s| !(1.0 / s).is_finite()) {
            return Err(format!("scale[{}] = {:e} is too small to divide by", i, scale[i]));
        }
        Ok(Self { mean, scale })
    }

    /// Get the mean values for each feature.
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Get the divisor for each feature.
    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Input = Array1<f64>;
    type Output = Array1<f64>;
    type Params = ScalerParams;

    const KIND: ArtifactKind = ArtifactKind::Scaler;

    fn transform(&self, data: &Array1<f64>) -> Result<Array1<f64>> {
        check_width(self.mean.len(), data)?;
        Ok((data - &self.mean) / &self.scale)
    }

    fn extract_params(&self) -> ScalerParams {
        ScalerParams::Standard(StandardScalerParams {
            mean: self.mean.to_vec(),
            scale: self.scale.to_vec(),
        })
    }

    fn from_params(params: ScalerParams) -> std::result::Result<Self, String> {
        match params {
            ScalerParams::Standard(p) => Self::new(Array1::from(p.mean), Array1::from(p.scale)),
            other => Err(format!("expected a standard scaler, found {}", other.kind_name())),
        }
    }

    fn n_features_in(&self) -> usize {
        self.mean.len()
    }

    fn n_features_out(&self) -> usize {
        self.mean.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;
    use ndarray::array;

    fn create_test_data() -> Array2<f64> {
        array![[0.0, 1.0], [0.0, 1.0], [1.0, 3.0]]
    }

    #[test]
    fn test_standard_scaler_fit() {
        let fitted = StandardScaler::new().fit(&create_test_data()).unwrap();

        // Mean: [1/3, 5/3]
        let mean = fitted.mean();
        assert!((mean[0] - 1.0 / 3.0).abs() < 1e-10);
        assert!((mean[1] - 5.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_standard_scaler_transform() {
        let data = create_test_data();
        let fitted = StandardScaler::new().fit(&data).unwrap();

        let rows: Vec<Array1<f64>> = data
            .outer_iter()
            .map(|row| fitted.transform(&row.to_owned()).unwrap())
            .collect();
        let views: Vec<_> = rows.iter().map(|r| r.view()).collect();
        let transformed = ndarray::stack(Axis(0), &views).unwrap();

        let mean = transformed.mean_axis(Axis(0)).unwrap();
        let std = transformed.std_axis(Axis(0), 0.0);
        for j in 0..2 {
            assert!(mean[j].abs() < 1e-10, "mean[{}] = {}", j, mean[j]);
            assert!((std[j] - 1.0).abs() < 1e-8, "std[{}] = {}", j, std[j]);
        }
    }

    #[test]
    fn test_standard_scaler_constant_feature() {
        let data = array![[5.0, 1.0], [5.0, 2.0]];
        let fitted = StandardScaler::new().fit(&data).unwrap();
        assert_eq!(fitted.scale()[0], 1.0);

        let scaled = fitted.transform(&array![7.0, 1.5]).unwrap();
        assert_eq!(scaled[0], 2.0);
        assert!(scaled.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_standard_scaler_without_mean() {
        let fitted = StandardScaler::new()
            .with_mean(false)
            .fit(&create_test_data())
            .unwrap();
        assert!(fitted.mean().iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_standard_scaler_without_std() {
        let fitted = StandardScaler::new()
            .with_std(false)
            .fit(&create_test_data())
            .unwrap();
        assert!(fitted.scale().iter().all(|&s| s == 1.0));
    }

    #[test]
    fn test_standard_scaler_serialization() {
        let data = create_test_data();
        let fitted = StandardScaler::new().fit(&data).unwrap();

        let restored = FittedStandardScaler::from_params(fitted.extract_params()).unwrap();
        let row = array![1.0, 3.0];
        assert_eq!(fitted.transform(&row).unwrap(), restored.transform(&row).unwrap());
    }

    #[test]
    fn test_standard_scaler_feature_mismatch() {
        let fitted = StandardScaler::new().fit(&create_test_data()).unwrap();

        let result = fitted.transform(&array![1.0, 2.0, 3.0]);
        assert!(matches!(
            result,
            Err(PredictorError::ShapeMismatch {
                stage: Stage::Scaler,
                expected: 2,
                got: 3
            })
        ));
    }

    #[test]
    fn test_standard_scaler_empty_data() {
        let result = StandardScaler::new().fit(&Array2::zeros((0, 3)));
        assert!(matches!(result, Err(PredictorError::EmptyData(_))));
    }

    #[test]
    fn test_standard_scaler_from_params_validation() {
        let mismatched = ScalerParams::Standard(StandardScalerParams {
            mean: vec![0.0, 1.0],
            scale: vec![1.0],
        });
        assert!(FittedStandardScaler::from_params(mismatched).is_err());

        let nan = ScalerParams::Standard(StandardScalerParams {
            mean: vec![f64::NAN],
            scale: vec![1.0],
        });
        assert!(FittedStandardScaler::from_params(nan).is_err());

        let zero = ScalerParams::Standard(StandardScalerParams {
            mean: vec![2.0],
            scale: vec![0.0],
        });
        let fitted = FittedStandardScaler::from_params(zero).unwrap();
        assert_eq!(fitted.transform(&array![3.0]).unwrap(), array![1.0]);
    }

    #[test]
    fn test_standard_scaler_rejects_subnormal_scale() {
        let subnormal = ScalerParams::Standard(StandardScalerParams {
            mean: vec![0.0, 0.0],
            scale: vec![1.0, 1e-310],
        });
        let err = FittedStandardScaler::from_params(subnormal).unwrap_err();
        assert!(err.contains("scale[1]"), "{}", err);

        let tiny_but_normal = ScalerParams::Standard(StandardScalerParams {
            mean: vec![0.0],
            scale: vec![1e-300],
        });
        assert!(FittedStandardScaler::from_params(tiny_but_normal).is_ok());
    }
}
