//! IPL Win Predictor CLI
//!
//! Scores a chase state against the fitted artifacts and prints the
//! descriptive dataset pages as JSON.

use clap::{Parser, Subcommand};
use ipl_predictor::config::DEFAULT_CONFIG_PATH;
use ipl_predictor::{Config, ErrorClass, Result};

#[derive(Parser)]
#[command(name = "ipl-predictor")]
#[command(about = "IPL run-chase win probability and dataset summaries", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the batting side's win probability
    Predict {
        /// Chasing team
        batting_team: String,
        /// Defending team
        bowling_team: String,
        /// Host city
        city: String,
        /// Runs the batting side must reach
        #[arg(long)]
        target: i64,
        /// Runs scored so far
        #[arg(long)]
        current_score: i64,
        /// Overs left in the innings
        #[arg(long)]
        overs_remaining: f64,
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// List the teams and cities offered for selection
    Vocab,
    /// Print the descriptive dataset pages as JSON
    Analyze {
        /// Page to print
        #[arg(long, default_value = "all")]
        page: Page,
    },
    /// Load the artifacts and report inconsistencies
    Check,
    /// Initialize a new project with default config
    Init,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json.", s)),
        }
    }
}

#[derive(Clone, Debug)]
enum Page {
    Ipl,
    Deliveries,
    Auction,
    All,
}

impl std::str::FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ipl" => Ok(Page::Ipl),
            "deliveries" | "ballbyball" => Ok(Page::Deliveries),
            "auction" => Ok(Page::Auction),
            "all" => Ok(Page::All),
            _ => Err(format!(
                "Unknown page: {}. Use ipl, deliveries, auction, or all.",
                s
            )),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    if let Commands::Init = cli.command {
        if let Err(e) = commands::init(&cli.config) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Predict {
            batting_team,
            bowling_team,
            city,
            target,
            current_score,
            overs_remaining,
            format,
        } => commands::predict(
            &config,
            &batting_team,
            &bowling_team,
            &city,
            target,
            current_score,
            overs_remaining,
            format,
        ),
        Commands::Vocab => commands::vocab(&config),
        Commands::Analyze { page } => commands::analyze(&config, page),
        Commands::Check => commands::check(&config),
        Commands::Init => Ok(()),
    };

    if let Err(e) = result {
        if e.class() != ErrorClass::UserInput {
            log::error!("{}", e);
        }
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use ipl_predictor::analysis::{AuctionPage, Dashboard, DeliveriesPage, IplPage};
    use ipl_predictor::dataset::{self, Datasets};
    use ipl_predictor::model::InferenceModel;
    use ipl_predictor::preprocessing::FittedTransformer;
    use ipl_predictor::{MatchState, Predictor};
    use serde::Serialize;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        log::info!("Created config file: {}", config_path);
        log::info!(
            "Place the fitted artifacts under {} and the datasets under {}",
            config
                .artifacts
                .encoder
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            config
                .datasets
                .ipl
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        );
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn predict(
        config: &Config,
        batting_team: &str,
        bowling_team: &str,
        city: &str,
        target: i64,
        current_score: i64,
        overs_remaining: f64,
        format: OutputFormat,
    ) -> Result<()> {
        let predictor = Predictor::from_config(config)?;
        let state = MatchState::new(
            batting_team,
            bowling_team,
            city,
            target,
            current_score,
            overs_remaining,
        );
        let result = predictor.predict(&state)?;

        match format {
            OutputFormat::Text => println!(
                "The predicted win probability for {} is: {}",
                state.batting_team,
                result.as_percent()
            ),
            OutputFormat::Json => {
                #[derive(Serialize)]
                struct Output<'a> {
                    #[serde(flatten)]
                    state: &'a MatchState,
                    runs_required: i64,
                    win_probability: f64,
                }
                print_json(&Output {
                    state: &state,
                    runs_required: state.runs_required(),
                    win_probability: result.win_probability,
                })?;
            }
        }
        Ok(())
    }

    pub fn vocab(config: &Config) -> Result<()> {
        let rows = dataset::load_ipl(&config.datasets.ipl)?;
        let vocabulary = dataset::Vocabulary::from_ipl(&rows);
        print_json(&vocabulary)?;

        match ipl_predictor::Artifacts::load(&config.artifacts) {
            Ok(artifacts) => {
                let gaps = vocabulary.warn_unknown(artifacts.encoder());
                if gaps.is_empty() {
                    log::info!("Every selectable value is known to the encoder");
                }
            }
            Err(e) => log::warn!("Skipping encoder comparison: {}", e),
        }
        Ok(())
    }

    pub fn analyze(config: &Config, page: Page) -> Result<()> {
        match page {
            Page::Ipl => print_json(&IplPage::build(&dataset::load_ipl(&config.datasets.ipl)?)),
            Page::Deliveries => print_json(&DeliveriesPage::build(&dataset::load_deliveries(
                &config.datasets.deliveries,
            )?)),
            Page::Auction => print_json(&AuctionPage::build(&dataset::load_auction(
                &config.datasets.auction,
            )?)),
            Page::All => {
                let datasets = Datasets::load(&config.datasets)?;
                print_json(&Dashboard::build(&datasets))
            }
        }
    }

    pub fn check(config: &Config) -> Result<()> {
        let artifacts = ipl_predictor::Artifacts::load(&config.artifacts)?;
        let encoder = artifacts.encoder();
        let scaler = artifacts.scaler();
        let classifier = artifacts.classifier();

        println!(
            "Encoder:    {} columns -> {} features",
            encoder.n_features_in(),
            encoder.n_features_out()
        );
        for column in encoder.categorical_columns() {
            println!("  {:<14} {} categories", column.name, column.categories.len());
        }
        println!("Scaler:     {} features", scaler.n_features_in());
        println!(
            "Classifier: {} features, classes {:?}, positive class {}",
            classifier.n_features_in(),
            classifier.classes(),
            artifacts.positive_class()
        );

        if let Some(err) = artifacts.width_mismatch() {
            return Err(err);
        }

        if config.datasets.ipl.exists() {
            let rows = dataset::load_ipl(&config.datasets.ipl)?;
            let gaps = dataset::Vocabulary::from_ipl(&rows).warn_unknown(encoder);
            println!("Vocabulary: {} values unknown to the encoder", gaps.len());
        }

        println!("OK");
        Ok(())
    }

    fn print_json<T: Serialize>(value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
