//! Drop-down vocabulary: the team and city names a user can pick.
//!
//! The drop-downs are filled from the IPL dataset while the encoder only
//! knows what it was fitted on. Any value in the first set but not the second
//! fails at prediction time with `UnknownCategory` (under the `error`
//! policy), so [`Vocabulary::unknown_to`] lists them up front.

use std::collections::BTreeSet;

use log::warn;
use serde::Serialize;

use crate::dataset::IplRow;
use crate::features::{BATTING_TEAM, BOWLING_TEAM, CITY};
use crate::preprocessing::FittedOneHotEncoder;

/// Sorted unique values offered by each drop-down.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Vocabulary {
    pub batting_teams: Vec<String>,
    pub bowling_teams: Vec<String>,
    pub cities: Vec<String>,
}

/// A drop-down value the encoder has never seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabularyGap {
    pub column: &'static str,
    pub value: String,
}

impl Vocabulary {
    /// Collect the drop-down values from IPL rows. Blank cells are skipped.
    pub fn from_ipl(rows: &[IplRow]) -> Self {
        let mut batting = BTreeSet::new();
        let mut bowling = BTreeSet::new();
        let mut cities = BTreeSet::new();
        for row in rows {
            insert_non_blank(&mut batting, &row.batting_team);
            insert_non_blank(&mut bowling, &row.bowling_team);
            insert_non_blank(&mut cities, &row.city);
        }
        Self {
            batting_teams: batting.into_iter().collect(),
            bowling_teams: bowling.into_iter().collect(),
            cities: cities.into_iter().collect(),
        }
    }

    /// Values offered by the drop-downs that `encoder` cannot encode.
    pub fn unknown_to(&self, encoder: &FittedOneHotEncoder) -> Vec<VocabularyGap> {
        let mut gaps = Vec::new();
        for (column, values) in self.columns() {
            for value in values {
                if !encoder.knows(column, value) {
                    gaps.push(VocabularyGap {
                        column,
                        value: value.clone(),
                    });
                }
            }
        }
        gaps
    }

    /// Like [`unknown_to`](Self::unknown_to), logging one warning per gap.
    pub fn warn_unknown(&self, encoder: &FittedOneHotEncoder) -> Vec<VocabularyGap> {
        let gaps = self.unknown_to(encoder);
        for gap in &gaps {
            warn!(
                "{} '{}' is offered for selection but unknown to the encoder",
                gap.column, gap.value
            );
        }
        gaps
    }

    pub fn is_empty(&self) -> bool {
        self.batting_teams.is_empty() && self.bowling_teams.is_empty() && self.cities.is_empty()
    }

    fn columns(&self) -> [(&'static str, &Vec<String>); 3] {
        [
            (BATTING_TEAM, &self.batting_teams),
            (BOWLING_TEAM, &self.bowling_teams),
            (CITY, &self.cities),
        ]
    }
}

fn insert_non_blank(set: &mut BTreeSet<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        set.insert(value.to_string());
    }
}
