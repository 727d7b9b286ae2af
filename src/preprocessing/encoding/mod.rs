//! Categorical feature encoding.
//!
//! ## OneHotEncoder
//! Expands each categorical column of a [`FeatureRecord`](crate::features::FeatureRecord)
//! into one indicator per category seen during fitting and passes the numeric
//! columns through unchanged.
//!
//! ```ignore
//! // categories of `city`: ["Chennai", "Delhi", "Mumbai"]
//! // row {city: "Delhi", target_score: 180}
//! // output: [0, 1, 0, 180]
//! ```

mod one_hot;

pub use one_hot::{CategoricalColumn, FittedOneHotEncoder, OneHotEncoder, OneHotEncoderParams};

use serde::{Deserialize, Serialize};

/// Strategy for handling unknown categories during transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Fail with `UnknownCategory` when an unseen value is encountered.
    #[default]
    Error,
    /// Encode unseen values as an all-zero block.
    Ignore,
}

/// Whether a category is dropped from each one-hot block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPolicy {
    /// One indicator per category.
    #[default]
    Keep,
    /// Drop the first (lowest sorted) category; it encodes as all zeros.
    First,
}
