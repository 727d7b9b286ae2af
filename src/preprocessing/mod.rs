//! Preprocessing transformers that turn a feature record into the vector the
//! classifier scores.
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer with hyperparameters
//! - [`FittedTransformer`]: Fitted transformer ready for inference
//!
//! # Available Transformers
//!
//! ## Encoding
//! - [`OneHotEncoder`]: One indicator per category, numeric columns passed through
//!
//! ## Scaling
//! - [`StandardScaler`]: Z-score normalization
//! - [`MinMaxScaler`]: Scale to [0, 1] or custom range
//!
//! # Example
//!
//! ```ignore
//! use ipl_predictor::preprocessing::{FittedTransformer, FittedOneHotEncoder, FittedScaler};
//!
//! let encoder = FittedOneHotEncoder::load_from_file("encoder.bin")?;
//! let scaler = FittedScaler::load_from_file("scaler.bin")?;
//!
//! let encoded = encoder.transform(&record)?;
//! let scaled = scaler.transform(&encoded)?;
//! ```

pub mod encoding;
pub mod scaling;
pub mod traits;

pub use encoding::{
    CategoricalColumn, DropPolicy, FittedOneHotEncoder, HandleUnknown, OneHotEncoder,
    OneHotEncoderParams,
};
pub use scaling::{
    FittedMinMaxScaler, FittedScaler, FittedStandardScaler, MinMaxScaler, MinMaxScalerParams,
    ScalerParams, StandardScaler, StandardScalerParams,
};
pub use traits::{FittedTransformer, Transformer};
