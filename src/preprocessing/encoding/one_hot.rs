//! One-hot encoding for the categorical columns of a feature record.
//!
//! The output layout is the one-hot block of every categorical column, in the
//! order the columns were configured, followed by the remaining numeric
//! columns in record order.

use std::collections::{BTreeSet, HashMap, HashSet};

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};
use crate::features::{FeatureRecord, FeatureValue};
use crate::preprocessing::encoding::{DropPolicy, HandleUnknown};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::serialization::ArtifactKind;

/// One-hot encoder for the categorical columns of a feature record.
///
/// # Example
/// ```ignore
/// use ipl_predictor::preprocessing::{OneHotEncoder, Transformer, FittedTransformer};
///
/// let encoder = OneHotEncoder::new(["batting_team", "bowling_team", "city"]);
/// let fitted = encoder.fit(&training_rows)?;
/// let encoded = fitted.transform(&row)?;
/// ```
#[derive(Clone, Debug)]
pub struct OneHotEncoder {
    categorical_columns: Vec<String>,
    /// How to handle unknown categories during transform.
    handle_unknown: HandleUnknown,
    drop: DropPolicy,
}

impl OneHotEncoder {
    /// Create an encoder for the given categorical columns.
    pub fn new<I, S>(categorical_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categorical_columns: categorical_columns.into_iter().map(Into::into).collect(),
            handle_unknown: HandleUnknown::default(),
            drop: DropPolicy::default(),
        }
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }

    /// Set whether the first category of each column is dropped.
    pub fn with_drop(mut self, drop: DropPolicy) -> Self {
        self.drop = drop;
        self
    }
}

/// Categories learned for one column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub name: String,
    /// Sorted, unique category values.
    pub categories: Vec<String>,
}

/// Serializable parameters for a fitted OneHotEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoderParams {
    /// Record columns, in order, that the encoder was fitted on.
    pub feature_names_in: Vec<String>,
    /// Categorical columns and their categories.
    pub categorical: Vec<CategoricalColumn>,
    /// Numeric columns passed through after the one-hot blocks.
    pub passthrough: Vec<String>,
    pub handle_unknown: HandleUnknown,
    pub drop: DropPolicy,
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder {
    feature_names_in: Vec<String>,
    categorical: Vec<CategoricalColumn>,
    /// Category → position within its block, one map per categorical column.
    lookup: Vec<HashMap<String, usize>>,
    passthrough: Vec<String>,
    handle_unknown: HandleUnknown,
    drop: DropPolicy,
    n_features_out: usize,
}

impl FittedOneHotEncoder {
    /// Categories learned for each categorical column.
    pub fn categorical_columns(&self) -> &[CategoricalColumn] {
        &self.categorical
    }

    /// Categories of one column, if it is categorical.
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.categorical
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.categories.as_slice())
    }

    /// Whether `value` was seen for `column` during fitting.
    pub fn knows(&self, column: &str, value: &str) -> bool {
        self.categorical
            .iter()
            .position(|c| c.name == column)
            .is_some_and(|i| self.lookup[i].contains_key(value))
    }

    pub fn handle_unknown(&self) -> HandleUnknown {
        self.handle_unknown
    }

    pub fn feature_names_in(&self) -> &[String] {
        &self.feature_names_in
    }

    /// Output column names: `<column>_<category>` then the passthrough columns.
    pub fn feature_names_out(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.n_features_out);
        for column in &self.categorical {
            for category in column.categories.iter().skip(self.dropped()) {
                names.push(format!("{}_{}", column.name, category));
            }
        }
        names.extend(self.passthrough.iter().cloned());
        names
    }

    fn dropped(&self) -> usize {
        match self.drop {
            DropPolicy::Keep => 0,
            DropPolicy::First => 1,
        }
    }

    fn check_schema(&self, record: &FeatureRecord) -> Result<()> {
        let matches = record.len() == self.feature_names_in.len()
            && record
                .column_names()
                .zip(&self.feature_names_in)
                .all(|(got, expected)| got == expected);
        if matches {
            Ok(())
        } else {
            Err(PredictorError::SchemaMismatch {
                expected: self.feature_names_in.clone(),
                got: record.column_names().map(str::to_string).collect(),
            })
        }
    }
}

fn type_mismatch(column: &str, expected: &str, got: &str) -> PredictorError {
    PredictorError::SchemaMismatch {
        expected: vec![format!("{}: {}", column, expected)],
        got: vec![format!("{}: {}", column, got)],
    }
}

impl Transformer for OneHotEncoder {
    type Data = [FeatureRecord];
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, data: &Self::Data) -> Result<Self::Fitted> {
        let first = data.first().ok_or_else(|| {
            PredictorError::EmptyData("Cannot fit OneHotEncoder on empty data".to_string())
        })?;
        let feature_names_in: Vec<String> = first.column_names().map(str::to_string).collect();

        for column in &self.categorical_columns {
            if !feature_names_in.contains(column) {
                return Err(PredictorError::InvalidParameter(format!(
                    "categorical column '{}' is not in the records",
                    column
                )));
            }
        }

        let mut seen: Vec<BTreeSet<String>> = vec![BTreeSet::new(); self.categorical_columns.len()];
        for (row, record) in data.iter().enumerate() {
            if !record.column_names().eq(feature_names_in.iter().map(String::as_str)) {
                return Err(PredictorError::InvalidParameter(format!(
                    "record {} has a different column layout",
                    row
                )));
            }
            for (name, value) in record.iter() {
                match self.categorical_columns.iter().position(|c| c == name) {
                    Some(i) => match value {
                        FeatureValue::Categorical(category) => {
                            seen[i].insert(category.clone());
                        }
                        FeatureValue::Numeric(_) => {
                            return Err(PredictorError::InvalidParameter(format!(
                                "record {} has a numeric value in categorical column '{}'",
                                row, name
                            )));
                        }
                    },
                    None => {
                        if value.as_numeric().is_none() {
                            return Err(PredictorError::InvalidParameter(format!(
                                "record {} has a categorical value in numeric column '{}'",
                                row, name
                            )));
                        }
                    }
                }
            }
        }

        let categorical = self
            .categorical_columns
            .iter()
            .zip(seen)
            .map(|(name, categories)| CategoricalColumn {
                name: name.clone(),
                categories: categories.into_iter().collect(),
            })
            .collect();
        let passthrough = feature_names_in
            .iter()
            .filter(|name| !self.categorical_columns.contains(name))
            .cloned()
            .collect();

        FittedOneHotEncoder::from_params(OneHotEncoderParams {
            feature_names_in,
            categorical,
            passthrough,
            handle_unknown: self.handle_unknown,
            drop: self.drop,
        })
        .map_err(PredictorError::InvalidParameter)
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Input = FeatureRecord;
    type Output = Array1<f64>;
    type Params = OneHotEncoderParams;

    const KIND: ArtifactKind = ArtifactKind::Encoder;

    fn transform(&self, record: &FeatureRecord) -> Result<Array1<f64>> {
        self.check_schema(record)?;

        let mut encoded = Array1::<f64>::zeros(self.n_features_out);
        let dropped = self.dropped();
        let mut offset = 0;

        for (column, lookup) in self.categorical.iter().zip(&self.lookup) {
            let value = record
                .get(&column.name)
                .and_then(FeatureValue::as_categorical)
                .ok_or_else(|| type_mismatch(&column.name, "categorical", "numeric"))?;

            match lookup.get(value) {
                Some(&idx) if idx >= dropped => encoded[offset + idx - dropped] = 1.0,
                Some(_) => {}
                None => {
                    if self.handle_unknown == HandleUnknown::Error {
                        return Err(PredictorError::UnknownCategory {
                            column: column.name.clone(),
                            value: value.to_string(),
                        });
                    }
                    // With Ignore, leave the block as zeros
                }
            }

            offset += column.categories.len() - dropped;
        }

        for name in &self.passthrough {
            let value = record
                .get(name)
                .and_then(FeatureValue::as_numeric)
                .ok_or_else(|| type_mismatch(name, "numeric", "categorical"))?;
            encoded[offset] = value;
            offset += 1;
        }

        Ok(encoded)
    }

    fn extract_params(&self) -> Self::Params {
        OneHotEncoderParams {
            feature_names_in: self.feature_names_in.clone(),
            categorical: self.categorical.clone(),
            passthrough: self.passthrough.clone(),
            handle_unknown: self.handle_unknown,
            drop: self.drop,
        }
    }

    fn from_params(params: Self::Params) -> std::result::Result<Self, String> {
        let mut covered: HashSet<&str> = HashSet::new();
        for name in params
            .categorical
            .iter()
            .map(|c| c.name.as_str())
            .chain(params.passthrough.iter().map(String::as_str))
        {
            if !params.feature_names_in.iter().any(|n| n == name) {
                return Err(format!("column '{}' is not an input feature", name));
            }
            if !covered.insert(name) {
                return Err(format!("column '{}' is encoded twice", name));
            }
        }
        if covered.len() != params.feature_names_in.len() {
            return Err(format!(
                "{} input features but only {} are encoded",
                params.feature_names_in.len(),
                covered.len()
            ));
        }

        let mut lookup = Vec::with_capacity(params.categorical.len());
        for column in &params.categorical {
            if column.categories.is_empty() {
                return Err(format!("column '{}' has no categories", column.name));
            }
            let map: HashMap<String, usize> = column
                .categories
                .iter()
                .enumerate()
                .map(|(i, c)| (c.clone(), i))
                .collect();
            if map.len() != column.categories.len() {
                return Err(format!("column '{}' has duplicate categories", column.name));
            }
            lookup.push(map);
        }

        let dropped = match params.drop {
            DropPolicy::Keep => 0,
            DropPolicy::First => 1,
        };
        let n_features_out = params
            .categorical
            .iter()
            .map(|c| c.categories.len() - dropped)
            .sum::<usize>()
            + params.passthrough.len();

        Ok(FittedOneHotEncoder {
            feature_names_in: params.feature_names_in,
            categorical: params.categorical,
            lookup,
            passthrough: params.passthrough,
            handle_unknown: params.handle_unknown,
            drop: params.drop,
            n_features_out,
        })
    }

    fn n_features_in(&self) -> usize {
        self.feature_names_in.len()
    }

    fn n_features_out(&self) -> usize {
        self.n_features_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{build_features, FeatureValue};

    fn training_rows() -> Vec<FeatureRecord> {
        vec![
            build_features("Mumbai Indians", "Chennai Super Kings", "Mumbai", 180, 90, 10.0)
                .unwrap(),
            build_features("Chennai Super Kings", "Mumbai Indians", "Chennai", 160, 40, 14.0)
                .unwrap(),
            build_features("Delhi Capitals", "Mumbai Indians", "Delhi", 200, 150, 4.0).unwrap(),
        ]
    }

    fn encoder() -> OneHotEncoder {
        OneHotEncoder::new(["batting_team", "bowling_team", "city"])
    }

    #[test]
    fn test_one_hot_encoder_fit() {
        let fitted = encoder().fit(&training_rows()).unwrap();

        assert_eq!(fitted.n_features_in(), 6);
        // 3 batting + 2 bowling + 3 cities + 3 numeric
        assert_eq!(fitted.n_features_out(), 11);
        assert_eq!(
            fitted.categories("batting_team").unwrap(),
            &["Chennai Super Kings", "Delhi Capitals", "Mumbai Indians"]
        );
        assert_eq!(
            fitted.categories("bowling_team").unwrap(),
            &["Chennai Super Kings", "Mumbai Indians"]
        );
        assert!(fitted.categories("target_score").is_none());
    }

    #[test]
    fn test_one_hot_encoder_transform() {
        let fitted = encoder().fit(&training_rows()).unwrap();
        let row = build_features("Delhi Capitals", "Chennai Super Kings", "Mumbai", 170, 60, 12.5)
            .unwrap();

        let encoded = fitted.transform(&row).unwrap();
        let expected = [
            0.0, 1.0, 0.0, // batting: Delhi Capitals
            1.0, 0.0, // bowling: Chennai Super Kings
            0.0, 0.0, 1.0, // city: Mumbai
            170.0, 60.0, 12.5,
        ];
        assert_eq!(encoded.to_vec(), expected.to_vec());
    }

    #[test]
    fn test_one_hot_encoder_feature_names_out() {
        let fitted = encoder().fit(&training_rows()).unwrap();
        let names = fitted.feature_names_out();
        assert_eq!(names.len(), fitted.n_features_out());
        assert_eq!(names[0], "batting_team_Chennai Super Kings");
        assert_eq!(names[7], "city_Mumbai");
        assert_eq!(&names[8..], &["target_score", "current_score", "overs_remaining"]);
    }

    #[test]
    fn test_one_hot_encoder_unknown_error() {
        let fitted = encoder().fit(&training_rows()).unwrap();
        let row =
            build_features("Mumbai Indians", "Chennai Super Kings", "Atlantis", 180, 90, 10.0)
                .unwrap();

        let err = fitted.transform(&row).unwrap_err();
        match err {
            PredictorError::UnknownCategory { column, value } => {
                assert_eq!(column, "city");
                assert_eq!(value, "Atlantis");
            }
            other => panic!("expected UnknownCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_one_hot_encoder_unknown_ignore() {
        let fitted = encoder()
            .with_handle_unknown(HandleUnknown::Ignore)
            .fit(&training_rows())
            .unwrap();
        let row =
            build_features("Mumbai Indians", "Chennai Super Kings", "Atlantis", 180, 90, 10.0)
                .unwrap();

        let encoded = fitted.transform(&row).unwrap();
        // city block is all zeros
        assert_eq!(encoded.slice(ndarray::s![5..8]).to_vec(), vec![0.0, 0.0, 0.0]);
        // other blocks unaffected
        assert_eq!(encoded[2], 1.0);
        assert_eq!(encoded[3], 1.0);
        assert_eq!(encoded[8], 180.0);
    }

    #[test]
    fn test_one_hot_encoder_drop_first() {
        let fitted = encoder()
            .with_drop(DropPolicy::First)
            .fit(&training_rows())
            .unwrap();
        // (3-1) + (2-1) + (3-1) + 3
        assert_eq!(fitted.n_features_out(), 8);

        let first_categories = build_features(
            "Chennai Super Kings",
            "Chennai Super Kings",
            "Chennai",
            100,
            10,
            19.0,
        )
        .unwrap();
        let encoded = fitted.transform(&first_categories).unwrap();
        assert_eq!(
            encoded.to_vec(),
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 100.0, 10.0, 19.0]
        );
    }

    #[test]
    fn test_one_hot_encoder_schema_mismatch() {
        let fitted = encoder().fit(&training_rows()).unwrap();
        let reordered = FeatureRecord::from_columns(vec![
            ("bowling_team".to_string(), FeatureValue::Categorical("Mumbai Indians".into())),
            ("batting_team".to_string(), FeatureValue::Categorical("Delhi Capitals".into())),
            ("city".to_string(), FeatureValue::Categorical("Delhi".into())),
            ("target_score".to_string(), FeatureValue::Numeric(150.0)),
            ("current_score".to_string(), FeatureValue::Numeric(50.0)),
            ("overs_remaining".to_string(), FeatureValue::Numeric(8.0)),
        ]);

        let result = fitted.transform(&reordered);
        assert!(matches!(result, Err(PredictorError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_one_hot_encoder_type_mismatch() {
        let fitted = encoder().fit(&training_rows()).unwrap();
        let numeric_city = FeatureRecord::from_columns(vec![
            ("batting_team".to_string(), FeatureValue::Categorical("Delhi Capitals".into())),
            ("bowling_team".to_string(), FeatureValue::Categorical("Mumbai Indians".into())),
            ("city".to_string(), FeatureValue::Numeric(3.0)),
            ("target_score".to_string(), FeatureValue::Numeric(150.0)),
            ("current_score".to_string(), FeatureValue::Numeric(50.0)),
            ("overs_remaining".to_string(), FeatureValue::Numeric(8.0)),
        ]);

        assert!(matches!(
            fitted.transform(&numeric_city),
            Err(PredictorError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_one_hot_encoder_empty_data() {
        let result = encoder().fit(&[]);
        assert!(matches!(result, Err(PredictorError::EmptyData(_))));
    }

    #[test]
    fn test_one_hot_encoder_missing_column() {
        let result = OneHotEncoder::new(["venue"]).fit(&training_rows());
        assert!(matches!(result, Err(PredictorError::InvalidParameter(_))));
    }

    #[test]
    fn test_one_hot_encoder_knows() {
        let fitted = encoder().fit(&training_rows()).unwrap();
        assert!(fitted.knows("city", "Delhi"));
        assert!(!fitted.knows("city", "Jaipur"));
        assert!(!fitted.knows("target_score", "180"));
    }

    #[test]
    fn test_one_hot_encoder_from_params_rejects_duplicates() {
        let mut params = encoder().fit(&training_rows()).unwrap().extract_params();
        params.categorical[2].categories.push("Delhi".to_string());
        assert!(FittedOneHotEncoder::from_params(params).is_err());
    }

    #[test]
    fn test_one_hot_encoder_from_params_rejects_uncovered_column() {
        let mut params = encoder().fit(&training_rows()).unwrap().extract_params();
        params.passthrough.pop();
        let err = FittedOneHotEncoder::from_params(params).unwrap_err();
        assert!(err.contains("only 5 are encoded"), "{}", err);
    }

    #[test]
    fn test_one_hot_encoder_save_load_file() {
        let fitted = encoder().fit(&training_rows()).unwrap();
        let dir = tempfile::tempdir().unwrap();

        for file in ["encoder.bin", "encoder.json"] {
            let path = dir.path().join(file);
            fitted.save_to_file(&path).unwrap();
            let loaded = FittedOneHotEncoder::load_from_file(&path).unwrap();

            assert_eq!(loaded.extract_params(), fitted.extract_params());
            let row = &training_rows()[1];
            assert_eq!(loaded.transform(row).unwrap(), fitted.transform(row).unwrap());
        }
    }
}
