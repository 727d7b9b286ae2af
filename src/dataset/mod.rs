//! Dataset store: the four CSV files behind the descriptive pages and the
//! drop-down vocabulary.
//!
//! | Dataset      | Row type          | Used for                      |
//! |--------------|-------------------|-------------------------------|
//! | `matches`    | [`MatchSummary`]  | match-level lookups           |
//! | `deliveries` | [`Delivery`]      | ball-by-ball page             |
//! | `auction`    | [`AuctionSale`]   | auction page                  |
//! | `ipl`        | [`IplRow`]        | IPL page, drop-down vocabulary |
//!
//! # Example
//!
//! ```ignore
//! use ipl_predictor::config::DatasetConfig;
//! use ipl_predictor::dataset::Datasets;
//!
//! let datasets = Datasets::load(&DatasetConfig::default())?;
//! println!("{} deliveries", datasets.deliveries.len());
//! ```

pub mod records;
pub mod vocabulary;

pub use records::{AuctionSale, Delivery, IplRow, MatchSummary};
pub use vocabulary::{Vocabulary, VocabularyGap};

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::info;
use serde::de::DeserializeOwned;

use crate::config::DatasetConfig;
use crate::error::{PredictorError, Result};

/// All four datasets, loaded once at start-up.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub matches: Vec<MatchSummary>,
    pub deliveries: Vec<Delivery>,
    pub auction: Vec<AuctionSale>,
    pub ipl: Vec<IplRow>,
}

impl Datasets {
    /// Load every dataset named in `config`.
    ///
    /// # Errors
    /// `Dataset { path, reason }` for the first file that cannot be read or
    /// has a row that does not match its schema.
    pub fn load(config: &DatasetConfig) -> Result<Self> {
        let datasets = Self {
            matches: load_matches(&config.matches)?,
            deliveries: load_deliveries(&config.deliveries)?,
            auction: load_auction(&config.auction)?,
            ipl: load_ipl(&config.ipl)?,
        };
        info!(
            "loaded {} matches, {} deliveries, {} auction sales, {} IPL rows",
            datasets.matches.len(),
            datasets.deliveries.len(),
            datasets.auction.len(),
            datasets.ipl.len()
        );
        Ok(datasets)
    }

    /// Drop-down vocabulary derived from the IPL dataset.
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::from_ipl(&self.ipl)
    }
}

pub fn load_matches(path: impl AsRef<Path>) -> Result<Vec<MatchSummary>> {
    read_csv(path)
}

pub fn load_deliveries(path: impl AsRef<Path>) -> Result<Vec<Delivery>> {
    read_csv(path)
}

pub fn load_auction(path: impl AsRef<Path>) -> Result<Vec<AuctionSale>> {
    read_csv(path)
}

pub fn load_ipl(path: impl AsRef<Path>) -> Result<Vec<IplRow>> {
    read_csv(path)
}

/// Read every row of a headered CSV file into `T`.
pub fn read_csv<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| dataset_error(path, e.to_string()))?;
    let rows = parse_csv(file).map_err(|e| dataset_error(path, e.to_string()))?;
    log::debug!("read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn parse_csv<T: DeserializeOwned, R: Read>(reader: R) -> std::result::Result<Vec<T>, csv::Error> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect()
}

fn dataset_error(path: &Path, reason: String) -> PredictorError {
    PredictorError::Dataset {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    #[test]
    fn test_parse_ipl_rows() {
        let data = "\
batting_team,bowling_team,city,runs_left,total_runs_x,crr,rrr,wickets_left,result
Mumbai Indians,Chennai Super Kings,Mumbai,90,180,9.0,9.0,7,1
Delhi Capitals,Punjab Kings,Delhi,40,,8.5,NA,3,0
";
        let rows: Vec<IplRow> = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].batting_team, "Mumbai Indians");
        assert_eq!(rows[0].total_runs_x, Some(180.0));
        assert_eq!(rows[0].result, Some(1));
        // empty and unparsable numeric cells are absent
        assert_eq!(rows[1].total_runs_x, None);
        assert_eq!(rows[1].rrr, None);
        assert_eq!(rows[1].crr, Some(8.5));
    }

    #[test]
    fn test_parse_auction_with_spaced_header() {
        let data = "\
Player,Team,Country,Year,Winning bid,Base price
Mitchell Starc,KKR,Australia,2024,247500000,20000000
Pat Cummins,SRH,Australia,2024,205000000,20000000
";
        let rows: Vec<AuctionSale> = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(rows[0].winning_bid, Some(247_500_000.0));
        assert_eq!(rows[1].team, "SRH");
        assert_eq!(rows[1].year, Some(2024));
    }

    #[test]
    fn test_parse_deliveries() {
        let data = "\
ID,innings,overs,ballnumber,batter,bowler,non-striker,extra_type,batsman_run,extras_run,total_run,non_boundary,isWicketDelivery,player_out,kind,fielders_involved,BattingTeam
1312200,1,0,1,YBK Jaiswal,Mohammed Shami,JC Buttler,,0,0,0,0,0,,,,Rajasthan Royals
1312200,1,0,2,YBK Jaiswal,Mohammed Shami,JC Buttler,legbyes,0,1,1,0,0,,,,Rajasthan Royals
";
        let rows: Vec<Delivery> = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].total_run, Some(1.0));
        assert_eq!(rows[1].is_wicket_delivery, Some(0));
        assert_eq!(rows[0].batting_team, "Rajasthan Royals");
    }

    #[test]
    fn test_parse_matches() {
        let data = "\
ID,City,Date,Season,MatchNumber,Team1,Team2,Venue,TossWinner,TossDecision,SuperOver,WinningTeam
1312200,Ahmedabad,2022-05-29,2022,Final,Rajasthan Royals,Gujarat Titans,Narendra Modi Stadium,Rajasthan Royals,bat,N,Gujarat Titans
1312199,Ahmedabad,2022-05-27,2022,Qualifier 2,Royal Challengers Bangalore,Rajasthan Royals,Narendra Modi Stadium,Rajasthan Royals,field,N,
";
        let rows: Vec<MatchSummary> = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(rows[0].winning_team.as_deref(), Some("Gujarat Titans"));
        assert_eq!(rows[1].winning_team, None);
        assert_eq!(rows[1].season, "2022");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_ipl(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, PredictorError::Dataset { .. }));
        assert_eq!(err.class(), ErrorClass::Fatal);
    }

    #[test]
    fn test_read_row_missing_required_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auction.csv");
        std::fs::write(&path, "Player,Country\nSomeone,India\n").unwrap();
        let err = load_auction(&path).unwrap_err();
        match err {
            PredictorError::Dataset { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected Dataset error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_all_datasets() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatasetConfig {
            matches: dir.path().join("matches.csv"),
            deliveries: dir.path().join("ballbyball.csv"),
            auction: dir.path().join("auction.csv"),
            ipl: dir.path().join("ipl_data.csv"),
        };
        std::fs::write(
            &config.matches,
            "ID,City,Season,Team1,Team2,Venue,WinningTeam\n1,Pune,2017,A,B,MCA,A\n",
        )
        .unwrap();
        std::fs::write(
            &config.deliveries,
            "ID,innings,overs,ballnumber,batter,bowler,batsman_run,total_run,isWicketDelivery,BattingTeam\n1,1,0,1,X,Y,4,4,0,A\n",
        )
        .unwrap();
        std::fs::write(
            &config.auction,
            "Player,Team,Country,Year,Winning bid\nX,A,India,2020,100\n",
        )
        .unwrap();
        std::fs::write(
            &config.ipl,
            "batting_team,bowling_team,city,total_runs_x,crr,rrr,wickets_left,result\nA,B,Pune,150,7.5,8.0,6,1\n",
        )
        .unwrap();

        let datasets = Datasets::load(&config).unwrap();
        assert_eq!(datasets.matches.len(), 1);
        assert_eq!(datasets.deliveries[0].batsman_run, Some(4.0));
        assert_eq!(datasets.auction[0].player, "X");
        assert_eq!(datasets.vocabulary().cities, vec!["Pune".to_string()]);
    }
}
