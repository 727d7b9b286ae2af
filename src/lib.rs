//! # ipl-predictor
//!
//! Win-probability inference for IPL run chases, plus the descriptive
//! aggregates behind the dataset pages.
//!
//! ## Core Design Principles
//!
//! - **Fit/Inference Separation**: Encoders, scalers and classifiers are fitted
//!   elsewhere and loaded as read-only artifacts. Nothing here mutates them.
//! - **Typed Artifacts**: Every artifact file carries its kind and format version,
//!   so a scaler can never be loaded into the classifier slot.
//! - **Classified Errors**: Every failure is a [`PredictorError`] with an
//!   [`ErrorClass`] that tells the caller whether to abort or keep serving.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ipl_predictor::{Config, MatchState, Predictor};
//!
//! let config = Config::load("ipl-predictor.toml")?;
//! let predictor = Predictor::from_config(&config)?;
//!
//! let state = MatchState::new("Mumbai Indians", "Chennai Super Kings", "Mumbai", 180, 90, 10.0);
//! let result = predictor.predict(&state)?;
//! println!("The predicted win probability for Mumbai Indians is: {}", result.as_percent());
//! ```
//!
//! ## Module Structure
//!
//! - `features`: Match state validation and feature record layout
//! - `preprocessing`: One-hot encoder and feature scalers
//! - `model`: Fitted classifiers (random forest, logistic)
//! - `serialization`: Artifact envelope and on-disk formats
//! - `artifacts`: Loading and cross-checking the three artifacts
//! - `pipeline`: Encoder → scaler → classifier composition
//! - `dataset`: CSV datasets and drop-down vocabulary
//! - `analysis`: Top-N and grouped aggregates for the dataset pages
//! - `config`: TOML configuration

/// Descriptive aggregates over the loaded datasets.
pub mod analysis;

/// The encoder, scaler and classifier loaded as one unit.
pub mod artifacts;

/// TOML configuration for artifact and dataset paths.
pub mod config;

/// CSV datasets and the drop-down vocabulary.
pub mod dataset;

pub mod error;

/// Match state and the feature record handed to the encoder.
pub mod features;

/// Fitted classifiers.
pub mod model;

/// Single-request inference.
pub mod pipeline;

/// Fitted feature transformers.
pub mod preprocessing;

/// Artifact persistence.
pub mod serialization;

pub use artifacts::Artifacts;
pub use config::Config;
pub use error::{ErrorClass, PredictorError, Result};
pub use features::{FeatureBuilder, FeatureRecord, MatchState, ValidationPolicy};
pub use pipeline::{predict_win_probability, InferencePipeline, PredictionResult, Predictor};
