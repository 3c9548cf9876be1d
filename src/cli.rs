//! Command-line interface argument parsing.
//!
//! Every flag is optional; the defaults reproduce the fixed layout
//! `csv/csv-{sender,receiver}-all.csv` -> `csv/{mean,std}{Sender,Receiver}all.csv`.

use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

use crate::pipeline::AggregatorConfig;

/// Per-key mean and standard deviation of sender/receiver benchmark CSVs
///
/// Examples:
///   perf_summary
///   perf_summary --type udp --type tcp
///   perf_summary --csv-dir results/csv --key window -v
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the input tables and receiving the summaries
    #[arg(long, default_value = "csv", value_name = "DIR")]
    pub csv_dir: PathBuf,

    /// Directory created for plots if it does not exist
    #[arg(long, default_value = "graphes", value_name = "DIR")]
    pub graphs_dir: PathBuf,

    /// Dataset category; reads csv-sender-<NAME>.csv and csv-receiver-<NAME>.csv
    ///
    /// May be repeated to process several categories in one run.
    #[arg(short = 't', long = "type", default_value = "all", value_name = "NAME")]
    pub types: Vec<String>,

    /// Column whose values define the groups
    #[arg(short, long, default_value = "key", value_name = "COLUMN")]
    pub key: String,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    pub fn to_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            csv_dir: self.csv_dir.clone(),
            graphs_dir: self.graphs_dir.clone(),
            categories: self.types.clone(),
            key_column: self.key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_layout() {
        let args = Args::try_parse_from(["perf_summary"]).unwrap();
        let config = args.to_config();
        assert_eq!(config.csv_dir, PathBuf::from("csv"));
        assert_eq!(config.graphs_dir, PathBuf::from("graphes"));
        assert_eq!(config.categories, vec!["all".to_string()]);
        assert_eq!(config.key_column, "key");
        assert_eq!(args.log_level(), Level::INFO);
    }

    #[test]
    fn test_repeated_types_replace_default() {
        let args =
            Args::try_parse_from(["perf_summary", "-t", "udp", "--type", "tcp"]).unwrap();
        assert_eq!(args.types, vec!["udp".to_string(), "tcp".to_string()]);
    }

    #[test]
    fn test_log_levels() {
        let verbose = Args::try_parse_from(["perf_summary", "-v"]).unwrap();
        assert_eq!(verbose.log_level(), Level::DEBUG);

        let quiet = Args::try_parse_from(["perf_summary", "--quiet"]).unwrap();
        assert_eq!(quiet.log_level(), Level::ERROR);

        assert!(Args::try_parse_from(["perf_summary", "-v", "-q"]).is_err());
    }
}
