//! Shared fixtures: a small reference set of artifacts fitted in memory.
#![allow(dead_code)]

use std::path::PathBuf;

use ipl_predictor::features::{build_features, FeatureRecord, BATTING_TEAM, BOWLING_TEAM, CITY};
use ipl_predictor::model::{
    Classifier, ClassifierParams, InferenceModel, LogisticClassifier, LogisticParams, Node,
    RandomForestClassifier, RandomForestParams, TreeParams,
};
use ipl_predictor::preprocessing::{
    FittedOneHotEncoder, FittedStandardScaler, FittedTransformer, HandleUnknown, OneHotEncoder,
    ScalerParams, StandardScaler, StandardScalerParams, Transformer,
};
use ipl_predictor::Artifacts;
use ndarray::{Array1, Array2, Axis};
use tempfile::TempDir;

/// Encoded width of the reference encoder: 4 + 4 + 4 one-hot columns plus
/// the three numeric passthrough columns.
pub const N_ENCODED: usize = 15;
pub const TARGET_COL: usize = 12;
pub const CURRENT_COL: usize = 13;
pub const OVERS_COL: usize = 14;
/// One-hot columns of the city block.
pub const CITY_COLS: std::ops::Range<usize> = 8..12;

/// Expected forest output for the Mumbai chase (180 target, 90 scored,
/// 10 overs left).
pub const REFERENCE_PROBABILITY: f64 = 0.375;

/// Current scores average 90 and overs average 12.5.
pub fn training_rows() -> Vec<FeatureRecord> {
    vec![
        build_features("Mumbai Indians", "Chennai Super Kings", "Mumbai", 180, 30, 20.0).unwrap(),
        build_features("Chennai Super Kings", "Mumbai Indians", "Chennai", 160, 60, 15.0).unwrap(),
        build_features("Delhi Capitals", "Kolkata Knight Riders", "Delhi", 200, 120, 10.0)
            .unwrap(),
        build_features("Kolkata Knight Riders", "Delhi Capitals", "Kolkata", 150, 150, 5.0)
            .unwrap(),
    ]
}

pub fn fit_encoder(policy: HandleUnknown) -> FittedOneHotEncoder {
    OneHotEncoder::new([BATTING_TEAM, BOWLING_TEAM, CITY])
        .with_handle_unknown(policy)
        .fit(&training_rows())
        .unwrap()
}

pub fn fit_scaler(encoder: &FittedOneHotEncoder) -> FittedStandardScaler {
    let encoded: Vec<Array1<f64>> = training_rows()
        .iter()
        .map(|r| encoder.transform(r).unwrap())
        .collect();
    let views: Vec<_> = encoded.iter().map(|e| e.view()).collect();
    let matrix: Array2<f64> = ndarray::stack(Axis(0), &views).unwrap();
    StandardScaler::new().fit(&matrix).unwrap()
}

/// Standard scaler built directly from stored statistics.
pub fn scaler_from(mean: Vec<f64>, scale: Vec<f64>) -> FittedStandardScaler {
    FittedStandardScaler::from_params(ScalerParams::Standard(StandardScalerParams { mean, scale }))
        .unwrap()
}

/// Reference encoder and forest around a hand-built scaler.
pub fn artifacts_with_scaler(scaler: FittedStandardScaler) -> Artifacts {
    Artifacts::from_parts(fit_encoder(HandleUnknown::Error), scaler, reference_forest(), 1).unwrap()
}

fn stump(feature: usize, threshold: f64, left: Vec<f64>, right: Vec<f64>) -> TreeParams {
    TreeParams {
        nodes: vec![
            Node::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
            },
            Node::Leaf { value: left },
            Node::Leaf { value: right },
        ],
    }
}

/// Two stumps: one favours the batting side once the scaled current score
/// passes 0.5, the other is a coin flip whichever way overs fall.
pub fn reference_forest() -> RandomForestClassifier {
    RandomForestClassifier::from_params(ClassifierParams::RandomForest(RandomForestParams {
        classes: vec![0, 1],
        n_features: N_ENCODED,
        trees: vec![
            stump(CURRENT_COL, 0.5, vec![3.0, 1.0], vec![1.0, 3.0]),
            stump(OVERS_COL, 0.0, vec![2.0, 2.0], vec![2.0, 2.0]),
        ],
    }))
    .unwrap()
}

/// Logistic model driven by the scaled current score alone.
pub fn current_score_logistic(weight: f64) -> LogisticClassifier {
    let mut weights = vec![0.0; N_ENCODED];
    weights[CURRENT_COL] = weight;
    LogisticClassifier::from_params(ClassifierParams::Logistic(LogisticParams {
        classes: vec![0, 1],
        weights,
        intercept: 0.0,
    }))
    .unwrap()
}

pub fn artifacts_with(classifier: impl Into<Classifier>, policy: HandleUnknown) -> Artifacts {
    let encoder = fit_encoder(policy);
    let scaler = fit_scaler(&encoder);
    Artifacts::from_parts(encoder, scaler, classifier, 1).unwrap()
}

/// Forest artifacts with the `error` unknown-category policy.
pub fn reference_artifacts() -> Artifacts {
    artifacts_with(reference_forest(), HandleUnknown::Error)
}

/// Artifact files written into a temporary directory.
pub struct ArtifactFiles {
    pub dir: TempDir,
    pub encoder: PathBuf,
    pub scaler: PathBuf,
    pub classifier: PathBuf,
}

/// Save `artifacts` with the given file extension (`bin` or `json`).
pub fn write_artifacts(artifacts: &Artifacts, extension: &str) -> ArtifactFiles {
    let dir = tempfile::tempdir().unwrap();
    let encoder = dir.path().join(format!("one_hot_encoder.{}", extension));
    let scaler = dir.path().join(format!("standard_scaler.{}", extension));
    let classifier = dir.path().join(format!("classifier.{}", extension));
    artifacts.save(&encoder, &scaler, &classifier).unwrap();
    ArtifactFiles {
        dir,
        encoder,
        scaler,
        classifier,
    }
}

pub fn assert_unit_interval(p: f64) {
    assert!(p.is_finite(), "probability is not finite: {}", p);
    assert!((0.0..=1.0).contains(&p), "probability out of range: {}", p);
}

/// Sanity check on the fixture layout itself.
pub fn assert_reference_widths(artifacts: &Artifacts) {
    assert_eq!(artifacts.encoder().n_features_out(), N_ENCODED);
    assert_eq!(artifacts.classifier().n_features_in(), N_ENCODED);
    assert!(artifacts.widths_consistent());
}
