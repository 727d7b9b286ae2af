//! Random forest classifier.
//!
//! Each tree is a flat node array with the root at index 0. Split nodes send
//! a sample left when `x[feature] <= threshold` and right otherwise; children
//! always sit at a higher index than their parent, so traversal terminates.
//!
//! ```text
//! nodes[0] = Split { feature: 3, threshold: 120.5, left: 1, right: 2 }
//! nodes[1] = Leaf { value: [30.0, 10.0] }   // class counts, normalized on load
//! nodes[2] = Leaf { value: [5.0, 45.0] }
//! ```
//!
//! The forest probability is the mean of the normalized leaf distributions
//! reached in every tree.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::{check_classes, check_width, ClassifierParams, InferenceModel};
use crate::error::Result;

/// One node of a decision tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Per-class weights, in the order of the forest's `classes`.
        value: Vec<f64>,
    },
}

/// Serializable decision tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub nodes: Vec<Node>,
}

/// Serializable parameters of a random forest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomForestParams {
    pub classes: Vec<i64>,
    pub n_features: usize,
    pub trees: Vec<TreeParams>,
}

#[derive(Clone, Debug)]
enum FittedNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(Array1<f64>),
}

#[derive(Clone, Debug)]
struct DecisionTree {
    nodes: Vec<FittedNode>,
    /// Leaf weights as stored, kept for `extract_params`.
    raw: TreeParams,
}

impl DecisionTree {
    fn from_params(
        tree: TreeParams,
        n_classes: usize,
        n_features: usize,
    ) -> std::result::Result<Self, String> {
        if tree.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        let len = tree.nodes.len();
        let mut nodes = Vec::with_capacity(len);
        for (i, node) in tree.nodes.iter().enumerate() {
            let fitted = match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} of {}",
                            i, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", i));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= len {
                            return Err(format!("node {} has invalid child index {}", i, child));
                        }
                    }
                    FittedNode::Split {
                        feature: *feature,
                        threshold: *threshold,
                        left: *left,
                        right: *right,
                    }
                }
                Node::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(format!(
                            "leaf {} has {} values for {} classes",
                            i,
                            value.len(),
                            n_classes
                        ));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(format!("leaf {} has a negative or non-finite weight", i));
                    }
                    let total: f64 = value.iter().sum();
                    if total <= 0.0 {
                        return Err(format!("leaf {} has zero total weight", i));
                    }
                    FittedNode::Leaf(Array1::from(value.clone()) / total)
                }
            };
            nodes.push(fitted);
        }

        Ok(Self { nodes, raw: tree })
    }

    fn leaf(&self, input: &Array1<f64>) -> &Array1<f64> {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                FittedNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if input[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                FittedNode::Leaf(distribution) => return distribution,
            }
        }
    }
}

/// Fitted random forest ready for inference.
#[derive(Clone, Debug)]
pub struct RandomForestClassifier {
    classes: Vec<i64>,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForestClassifier {
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl InferenceModel for RandomForestClassifier {
    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        check_width(self.n_features, input)?;
        let mut proba = Array1::<f64>::zeros(self.classes.len());
        for tree in &self.trees {
            proba += tree.leaf(input);
        }
        proba /= self.trees.len() as f64;
        Ok(proba)
    }

    fn extract_params(&self) -> ClassifierParams {
        ClassifierParams::RandomForest(RandomForestParams {
            classes: self.classes.clone(),
            n_features: self.n_features,
            trees: self.trees.iter().map(|t| t.raw.clone()).collect(),
        })
    }

    fn from_params(params: ClassifierParams) -> std::result::Result<Self, String> {
        let params = match params {
            ClassifierParams::RandomForest(p) => p,
            other => {
                return Err(format!(
                    "expected a random_forest classifier, found {}",
                    other.kind_name()
                ))
            }
        };

        check_classes(&params.classes)?;
        if params.n_features == 0 {
            return Err("forest expects zero features".to_string());
        }
        if params.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }

        let n_classes = params.classes.len();
        let trees = params
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, tree)| {
                DecisionTree::from_params(tree, n_classes, params.n_features)
                    .map_err(|e| format!("tree {}: {}", i, e))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            classes: params.classes,
            n_features: params.n_features,
            trees,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PredictorError, Stage};
    use ndarray::array;

    fn stump(feature: usize, threshold: f64, left: [f64; 2], right: [f64; 2]) -> TreeParams {
        TreeParams {
            nodes: vec![
                Node::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                Node::Leaf {
                    value: left.to_vec(),
                },
                Node::Leaf {
                    value: right.to_vec(),
                },
            ],
        }
    }

    fn forest(trees: Vec<TreeParams>) -> std::result::Result<RandomForestClassifier, String> {
        RandomForestClassifier::from_params(ClassifierParams::RandomForest(RandomForestParams {
            classes: vec![0, 1],
            n_features: 2,
            trees,
        }))
    }

    #[test]
    fn test_forest_two_tree_inference() {
        let model = forest(vec![
            stump(0, 50.0, [3.0, 1.0], [1.0, 3.0]),
            stump(1, 30.0, [1.0, 0.0], [0.0, 1.0]),
        ])
        .unwrap();
        assert_eq!(model.n_trees(), 2);

        // tree1: 30 <= 50 -> left [0.75, 0.25]; tree2: 20 <= 30 -> left [1, 0]
        let proba = model.predict_proba(&array![30.0, 20.0]).unwrap();
        assert_eq!(proba, array![0.875, 0.125]);

        // tree1: right [0.25, 0.75]; tree2: right [0, 1]
        let proba = model.predict_proba(&array![60.0, 40.0]).unwrap();
        assert_eq!(proba, array![0.125, 0.875]);
    }

    #[test]
    fn test_forest_threshold_goes_left() {
        let model = forest(vec![stump(0, 50.0, [1.0, 0.0], [0.0, 1.0])]).unwrap();
        let proba = model.predict_proba(&array![50.0, 0.0]).unwrap();
        assert_eq!(proba, array![1.0, 0.0]);
    }

    #[test]
    fn test_forest_deterministic_inference_repeated() {
        let model = forest(vec![
            stump(0, 0.3, [2.0, 7.0], [5.0, 1.0]),
            stump(1, -0.1, [1.0, 1.0], [0.0, 3.0]),
        ])
        .unwrap();
        let input = array![0.1, 0.4];
        let first = model.predict_proba(&input).unwrap();
        for _ in 0..100 {
            assert_eq!(model.predict_proba(&input).unwrap(), first);
        }
    }

    #[test]
    fn test_forest_shape_mismatch() {
        let model = forest(vec![stump(0, 1.0, [1.0, 0.0], [0.0, 1.0])]).unwrap();
        assert!(matches!(
            model.predict_proba(&array![1.0]),
            Err(PredictorError::ShapeMismatch {
                stage: Stage::Classifier,
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_forest_rejects_feature_out_of_range() {
        let err = forest(vec![stump(5, 1.0, [1.0, 0.0], [0.0, 1.0])]).unwrap_err();
        assert!(err.contains("feature 5"), "{}", err);
    }

    #[test]
    fn test_forest_rejects_backward_child() {
        let tree = TreeParams {
            nodes: vec![
                Node::Split {
                    feature: 0,
                    threshold: 1.0,
                    left: 1,
                    right: 0,
                },
                Node::Leaf {
                    value: vec![1.0, 1.0],
                },
            ],
        };
        assert!(forest(vec![tree]).is_err());
    }

    #[test]
    fn test_forest_rejects_bad_leaves() {
        assert!(forest(vec![stump(0, 1.0, [1.0, 0.0], [0.0, 0.0])]).is_err());
        assert!(forest(vec![stump(0, 1.0, [-1.0, 2.0], [0.0, 1.0])]).is_err());

        let wrong_width = TreeParams {
            nodes: vec![Node::Leaf {
                value: vec![1.0, 2.0, 3.0],
            }],
        };
        assert!(forest(vec![wrong_width]).is_err());
    }

    #[test]
    fn test_forest_rejects_empty() {
        assert!(forest(vec![]).is_err());
        assert!(forest(vec![TreeParams { nodes: vec![] }]).is_err());
    }

    #[test]
    fn test_forest_params_round_trip() {
        let model = forest(vec![stump(1, 2.5, [4.0, 1.0], [1.0, 4.0])]).unwrap();
        let restored = RandomForestClassifier::from_params(model.extract_params()).unwrap();
        let input = array![0.0, 3.0];
        assert_eq!(
            model.predict_proba(&input).unwrap(),
            restored.predict_proba(&input).unwrap()
        );
    }
}
