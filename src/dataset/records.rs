//! Row types of the four CSV datasets.
//!
//! Field names follow the CSV headers. Extra columns are ignored. Numeric
//! cells that are empty or unparsable deserialize to `None`.

use serde::{Deserialize, Serialize};

/// One match from the match summary file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "City", default)]
    pub city: String,
    #[serde(rename = "Season", default)]
    pub season: String,
    #[serde(rename = "Team1")]
    pub team1: String,
    #[serde(rename = "Team2")]
    pub team2: String,
    #[serde(rename = "Venue", default)]
    pub venue: String,
    #[serde(rename = "WinningTeam", default)]
    pub winning_team: Option<String>,
}

/// One ball from the ball-by-ball file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(deserialize_with = "csv::invalid_option", default)]
    pub innings: Option<i64>,
    #[serde(deserialize_with = "csv::invalid_option", default)]
    pub overs: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option", default)]
    pub ballnumber: Option<i64>,
    pub batter: String,
    pub bowler: String,
    #[serde(deserialize_with = "csv::invalid_option", default)]
    pub batsman_run: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option", default)]
    pub total_run: Option<f64>,
    #[serde(
        rename = "isWicketDelivery",
        deserialize_with = "csv::invalid_option",
        default
    )]
    pub is_wicket_delivery: Option<i64>,
    #[serde(rename = "BattingTeam")]
    pub batting_team: String,
}

/// One player sale from the auction file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionSale {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Country", default)]
    pub country: String,
    #[serde(rename = "Year", deserialize_with = "csv::invalid_option", default)]
    pub year: Option<i64>,
    #[serde(
        rename = "Winning bid",
        deserialize_with = "csv::invalid_option",
        default
    )]
    pub winning_bid: Option<f64>,
}

/// One chase state from the merged IPL dataset the classifier was fitted on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IplRow {
    pub batting_team: String,
    pub bowling_team: String,
    #[serde(default)]
    pub city: String,
    #[serde(deserialize_with = "csv::invalid_option", default)]
    pub total_runs_x: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option", default)]
    pub crr: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option", default)]
    pub rrr: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option", default)]
    pub wickets_left: Option<f64>,
    /// 1 when the batting side won the chase.
    #[serde(deserialize_with = "csv::invalid_option", default)]
    pub result: Option<i64>,
}
