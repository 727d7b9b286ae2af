//! Descriptive aggregates for the three analysis pages.
//!
//! Each page starts from the top [`TOP_N`] rows of its dataset by one numeric
//! column and derives the series a chart needs: bars, scatter points, counts
//! and per-group value lists (for box plots). Nothing here draws; every
//! output is plain serializable data.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::dataset::{AuctionSale, Datasets, Delivery, IplRow};

/// Rows kept for every page.
pub const TOP_N: usize = 30;

/// The `n` rows with the largest key, descending.
///
/// Rows whose key is absent (or NaN) sort after every present key. Ties keep
/// their input order.
pub fn top_n_by<T, F>(rows: &[T], n: usize, key: F) -> Vec<&T>
where
    F: Fn(&T) -> Option<f64>,
{
    let mut keyed: Vec<(Option<f64>, &T)> = rows
        .iter()
        .map(|row| (key(row).filter(|k| !k.is_nan()), row))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    keyed.into_iter().take(n).map(|(_, row)| row).collect()
}

/// Number of rows per key, ordered by key.
pub fn count_by<T, K, F>(rows: &[T], key: F) -> Vec<Count<K>>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(key(row)).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(key, count)| Count { key, count })
        .collect()
}

/// Present values per key, ordered by key; values keep input order.
pub fn group_values_by<T, K, F, V>(rows: &[T], key: F, value: V) -> Vec<Group<K>>
where
    K: Ord,
    F: Fn(&T) -> K,
    V: Fn(&T) -> Option<f64>,
{
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for row in rows {
        let values = groups.entry(key(row)).or_default();
        if let Some(v) = value(row) {
            values.push(v);
        }
    }
    groups
        .into_iter()
        .map(|(key, values)| Group { key, values })
        .collect()
}

/// Sum of present values per key, ordered by key.
pub fn sum_by<T, K, F, V>(rows: &[T], key: F, value: V) -> Vec<Total<K>>
where
    K: Ord,
    F: Fn(&T) -> K,
    V: Fn(&T) -> Option<f64>,
{
    group_values_by(rows, key, value)
        .into_iter()
        .map(|g| Total {
            key: g.key,
            total: g.values.iter().sum(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Count<K> {
    pub key: K,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<K> {
    pub key: K,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Total<K> {
    pub key: K,
    pub total: f64,
}

/// A bar at category `x` with height `y`, colored by `color`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub x: String,
    pub y: f64,
    pub color: String,
}

/// A scatter or line point labelled by `label`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

fn bars<T>(
    rows: &[&T],
    x: impl Fn(&T) -> &str,
    y: impl Fn(&T) -> Option<f64>,
    color: impl Fn(&T) -> &str,
) -> Vec<Bar> {
    rows.iter()
        .copied()
        .filter_map(|row| {
            y(row).map(|y| Bar {
                x: x(row).to_string(),
                y,
                color: color(row).to_string(),
            })
        })
        .collect()
}

fn points<T>(
    rows: &[&T],
    x: impl Fn(&T) -> Option<f64>,
    y: impl Fn(&T) -> Option<f64>,
    label: impl Fn(&T) -> &str,
) -> Vec<Point> {
    rows.iter()
        .copied()
        .filter_map(|row| {
            Some(Point {
                x: x(row)?,
                y: y(row)?,
                label: label(row).to_string(),
            })
        })
        .collect()
}

/// IPL team performance page.
#[derive(Debug, Clone, Serialize)]
pub struct IplPage {
    /// Top rows by `total_runs_x`.
    pub top: Vec<IplRow>,
    /// Runs by batting team, colored by bowling team.
    pub runs_by_team: Vec<Bar>,
    /// Current vs required run rate, labelled by city.
    pub run_rates: Vec<Point>,
    /// Rows per (city, result).
    pub results_by_city: Vec<Count<(String, Option<i64>)>>,
    /// Wickets left per batting team.
    pub wickets_by_batting_team: Vec<Group<String>>,
}

impl IplPage {
    pub fn build(rows: &[IplRow]) -> Self {
        let top = top_n_by(rows, TOP_N, |r| r.total_runs_x);
        debug!("IPL page from {} of {} rows", top.len(), rows.len());

        let owned: Vec<IplRow> = top.iter().map(|r| (*r).clone()).collect();
        Self {
            runs_by_team: bars(
                &top,
                |r| r.batting_team.as_str(),
                |r| r.total_runs_x,
                |r| r.bowling_team.as_str(),
            ),
            run_rates: points(&top, |r| r.crr, |r| r.rrr, |r| r.city.as_str()),
            results_by_city: count_by(&owned, |r| (r.city.clone(), r.result)),
            wickets_by_batting_team: group_values_by(
                &owned,
                |r| r.batting_team.clone(),
                |r| r.wickets_left,
            ),
            top: owned,
        }
    }
}

/// Ball-by-ball performance page.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveriesPage {
    /// Top deliveries by `total_run`.
    pub top: Vec<Delivery>,
    /// Total runs per over, labelled by batting team.
    pub runs_over_time: Vec<Point>,
    /// Batter runs, colored by bowler.
    pub runs_by_batter: Vec<Bar>,
    /// Deliveries per wicket flag.
    pub wicket_counts: Vec<Count<Option<i64>>>,
    /// Batter runs per over, labelled by batter.
    pub runs_by_overs: Vec<Point>,
}

impl DeliveriesPage {
    pub fn build(rows: &[Delivery]) -> Self {
        let top = top_n_by(rows, TOP_N, |d| d.total_run);
        debug!("deliveries page from {} of {} rows", top.len(), rows.len());

        let owned: Vec<Delivery> = top.iter().map(|d| (*d).clone()).collect();
        Self {
            runs_over_time: points(&top, |d| d.overs, |d| d.total_run, |d| d.batting_team.as_str()),
            runs_by_batter: bars(
                &top,
                |d| d.batter.as_str(),
                |d| d.batsman_run,
                |d| d.bowler.as_str(),
            ),
            wicket_counts: count_by(&owned, |d| d.is_wicket_delivery),
            runs_by_overs: points(&top, |d| d.overs, |d| d.batsman_run, |d| d.batter.as_str()),
            top: owned,
        }
    }
}

/// Auction trends page.
#[derive(Debug, Clone, Serialize)]
pub struct AuctionPage {
    /// Top sales by winning bid.
    pub top: Vec<AuctionSale>,
    /// Winning bid by team, colored by player.
    pub bids_by_team: Vec<Bar>,
    /// Winning bids per country.
    pub bids_by_country: Vec<Group<String>>,
    /// Sum of winning bids per year.
    pub totals_by_year: Vec<Total<Option<i64>>>,
    /// Winning bid per player, colored by country.
    pub player_bids: Vec<Bar>,
}

impl AuctionPage {
    pub fn build(rows: &[AuctionSale]) -> Self {
        let top = top_n_by(rows, TOP_N, |s| s.winning_bid);
        debug!("auction page from {} of {} rows", top.len(), rows.len());

        let owned: Vec<AuctionSale> = top.iter().map(|s| (*s).clone()).collect();
        Self {
            bids_by_team: bars(&top, |s| s.team.as_str(), |s| s.winning_bid, |s| s.player.as_str()),
            bids_by_country: group_values_by(&owned, |s| s.country.clone(), |s| s.winning_bid),
            totals_by_year: sum_by(&owned, |s| s.year, |s| s.winning_bid),
            player_bids: bars(
                &top,
                |s| s.player.as_str(),
                |s| s.winning_bid,
                |s| s.country.as_str(),
            ),
            top: owned,
        }
    }
}

/// All three pages.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub ipl: IplPage,
    pub deliveries: DeliveriesPage,
    pub auction: AuctionPage,
}

impl Dashboard {
    pub fn build(datasets: &Datasets) -> Self {
        Self {
            ipl: IplPage::build(&datasets.ipl),
            deliveries: DeliveriesPage::build(&datasets.deliveries),
            auction: AuctionPage::build(&datasets.auction),
        }
    }
}
