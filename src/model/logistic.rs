//! Binary logistic regression: `p = sigmoid(w^T x + b)`.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::{check_classes, check_width, ClassifierParams, InferenceModel};
use crate::error::Result;

/// Serializable parameters of a logistic classifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    /// `[negative, positive]`; the sigmoid output is the probability of `classes[1]`.
    pub classes: Vec<i64>,
    pub weights: Vec<f64>,
    pub intercept: f64,
}

/// Fitted binary logistic regression.
#[derive(Clone, Debug)]
pub struct LogisticClassifier {
    classes: Vec<i64>,
    weights: Array1<f64>,
    intercept: f64,
}

impl LogisticClassifier {
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl InferenceModel for LogisticClassifier {
    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_features_in(&self) -> usize {
        self.weights.len()
    }

    fn predict_proba(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        check_width(self.weights.len(), input)?;
        let p = sigmoid(self.weights.dot(input) + self.intercept);
        Ok(Array1::from(vec![1.0 - p, p]))
    }

    fn extract_params(&self) -> ClassifierParams {
        ClassifierParams::Logistic(LogisticParams {
            classes: self.classes.clone(),
            weights: self.weights.to_vec(),
            intercept: self.intercept,
        })
    }

    fn from_params(params: ClassifierParams) -> std::result::Result<Self, String> {
        let params = match params {
            ClassifierParams::Logistic(p) => p,
            other => {
                return Err(format!(
                    "expected a logistic classifier, found {}",
                    other.kind_name()
                ))
            }
        };

        check_classes(&params.classes)?;
        if params.classes.len() != 2 {
            return Err(format!(
                "logistic regression is binary, got {} classes",
                params.classes.len()
            ));
        }
        if params.weights.is_empty() {
            return Err("no weights".to_string());
        }
        if let Some(i) = params.weights.iter().position(|w| !w.is_finite()) {
            return Err(format!("weights[{}] is not finite", i));
        }
        if !params.intercept.is_finite() {
            return Err("intercept is not finite".to_string());
        }

        Ok(Self {
            classes: params.classes,
            weights: Array1::from(params.weights),
            intercept: params.intercept,
        })
    }
}
