//! Feature building: match state → single-row feature record.
//!
//! The record layout is fixed by what the encoder was fitted on:
//!
//! | column            | kind        |
//! |-------------------|-------------|
//! | `batting_team`    | categorical |
//! | `bowling_team`    | categorical |
//! | `city`            | categorical |
//! | `target_score`    | numeric     |
//! | `current_score`   | numeric     |
//! | `overs_remaining` | numeric     |
//!
//! The builder only checks the lower bounds that make a state meaningful.
//! Upper bounds are business rules and live in [`ValidationPolicy`].

use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};

pub const BATTING_TEAM: &str = "batting_team";
pub const BOWLING_TEAM: &str = "bowling_team";
pub const CITY: &str = "city";
pub const TARGET_SCORE: &str = "target_score";
pub const CURRENT_SCORE: &str = "current_score";
pub const OVERS_REMAINING: &str = "overs_remaining";

/// Column names in the order the encoder expects them.
pub const FEATURE_COLUMNS: [&str; 6] = [
    BATTING_TEAM,
    BOWLING_TEAM,
    CITY,
    TARGET_SCORE,
    CURRENT_SCORE,
    OVERS_REMAINING,
];

/// In-match state collected from the user for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub batting_team: String,
    pub bowling_team: String,
    pub city: String,
    pub target_score: i64,
    pub current_score: i64,
    pub overs_remaining: f64,
}

impl MatchState {
    pub fn new(
        batting_team: impl Into<String>,
        bowling_team: impl Into<String>,
        city: impl Into<String>,
        target_score: i64,
        current_score: i64,
        overs_remaining: f64,
    ) -> Self {
        Self {
            batting_team: batting_team.into(),
            bowling_team: bowling_team.into(),
            city: city.into(),
            target_score,
            current_score,
            overs_remaining,
        }
    }

    /// Runs still needed to reach the target (never negative).
    pub fn runs_required(&self) -> i64 {
        (self.target_score - self.current_score).max(0)
    }
}

/// A single cell of a feature record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureValue {
    Categorical(String),
    Numeric(f64),
}

impl FeatureValue {
    pub fn as_categorical(&self) -> Option<&str> {
        match self {
            FeatureValue::Categorical(s) => Some(s),
            FeatureValue::Numeric(_) => None,
        }
    }

    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            FeatureValue::Numeric(v) => Some(*v),
            FeatureValue::Categorical(_) => None,
        }
    }
}

/// Single-row table of named feature cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    columns: Vec<(String, FeatureValue)>,
}

impl FeatureRecord {
    /// Build a record from arbitrary named cells. Order is preserved.
    pub fn from_columns(columns: Vec<(String, FeatureValue)>) -> Self {
        Self { columns }
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Business rules on top of the hard lower bounds.
///
/// Both checks are off by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Reject states where the batting side has already passed the target.
    pub reject_score_above_target: bool,
    /// Reject `overs_remaining` above this many overs (20.0 for a T20 innings).
    pub max_overs: Option<f64>,
}

/// Turns a [`MatchState`] into a [`FeatureRecord`].
#[derive(Debug, Clone, Default)]
pub struct FeatureBuilder {
    policy: ValidationPolicy,
}

impl FeatureBuilder {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Validate the state and lay it out in encoder column order.
    pub fn build(&self, state: &MatchState) -> Result<FeatureRecord> {
        self.validate(state)?;

        Ok(FeatureRecord::from_columns(vec![
            (
                BATTING_TEAM.to_string(),
                FeatureValue::Categorical(state.batting_team.trim().to_string()),
            ),
            (
                BOWLING_TEAM.to_string(),
                FeatureValue::Categorical(state.bowling_team.trim().to_string()),
            ),
            (
                CITY.to_string(),
                FeatureValue::Categorical(state.city.trim().to_string()),
            ),
            (
                TARGET_SCORE.to_string(),
                FeatureValue::Numeric(state.target_score as f64),
            ),
            (
                CURRENT_SCORE.to_string(),
                FeatureValue::Numeric(state.current_score as f64),
            ),
            (
                OVERS_REMAINING.to_string(),
                FeatureValue::Numeric(state.overs_remaining),
            ),
        ]))
    }

    fn validate(&self, state: &MatchState) -> Result<()> {
        for (field, value) in [
            (BATTING_TEAM, &state.batting_team),
            (BOWLING_TEAM, &state.bowling_team),
            (CITY, &state.city),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be blank".to_string()));
            }
        }

        if state.target_score < 1 {
            return Err(invalid(
                TARGET_SCORE,
                format!("must be at least 1, got {}", state.target_score),
            ));
        }
        if state.current_score < 0 {
            return Err(invalid(
                CURRENT_SCORE,
                format!("must not be negative, got {}", state.current_score),
            ));
        }
        if !state.overs_remaining.is_finite() || state.overs_remaining < 0.0 {
            return Err(invalid(
                OVERS_REMAINING,
                format!("must be a non-negative number, got {}", state.overs_remaining),
            ));
        }

        if self.policy.reject_score_above_target && state.current_score > state.target_score {
            return Err(invalid(
                CURRENT_SCORE,
                format!(
                    "{} already exceeds the target of {}",
                    state.current_score, state.target_score
                ),
            ));
        }
        if let Some(max_overs) = self.policy.max_overs {
            if state.overs_remaining > max_overs {
                return Err(invalid(
                    OVERS_REMAINING,
                    format!(
                        "{} exceeds the {} overs of an innings",
                        state.overs_remaining, max_overs
                    ),
                ));
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> PredictorError {
    PredictorError::InvalidInput { field, reason }
}

/// Build a feature record from the six raw inputs with the default policy.
pub fn build_features(
    batting_team: &str,
    bowling_team: &str,
    city: &str,
    target_score: i64,
    current_score: i64,
    overs_remaining: f64,
) -> Result<FeatureRecord> {
    FeatureBuilder::default().build(&MatchState::new(
        batting_team,
        bowling_team,
        city,
        target_score,
        current_score,
        overs_remaining,
    ))
}
