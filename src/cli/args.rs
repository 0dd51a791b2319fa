use crate::models::{Hemisphere, OutputMode};
use crate::utils::constants::{DEFAULT_ZONE, PREFERENCES_FILE};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "utm-converter")]
#[command(about = "Batch converter of UTM coordinates in CSV tables to geographic coordinates")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide the progress bar")]
    pub quiet: bool,

    #[arg(
        long,
        global = true,
        default_value = PREFERENCES_FILE,
        help = "Preferences file remembering the last batch settings"
    )]
    pub preferences: PathBuf,
}

/// Reference system shared by every subcommand that projects coordinates
#[derive(Args, Debug, Clone)]
pub struct ProjectionArgs {
    #[arg(long, default_value_t = DEFAULT_ZONE, help = "UTM zone (1-60)")]
    pub zone: u8,

    #[arg(long, default_value = "S", help = "Hemisphere: N or S")]
    pub hemisphere: Hemisphere,

    #[arg(long, default_value = "GRS80", help = "Ellipsoid: GRS80 (SIRGAS2000) or WGS84")]
    pub ellipsoid: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert every CSV table in a directory
    Convert {
        #[arg(short, long, help = "Directory containing the CSV tables")]
        input_dir: Option<PathBuf>,

        #[arg(short, long, help = "Directory receiving the *_convertido.csv files")]
        output_dir: Option<PathBuf>,

        #[arg(short = 'x', long, help = "Easting column letters (e.g. B)")]
        x_column: Option<String>,

        #[arg(short = 'y', long, help = "Northing column letters (e.g. D)")]
        y_column: Option<String>,

        #[arg(long, value_delimiter = ',', help = "Header substrings locating the easting column")]
        x_patterns: Option<Vec<String>>,

        #[arg(long, value_delimiter = ',', help = "Header substrings locating the northing column")]
        y_patterns: Option<Vec<String>>,

        #[arg(long, help = "Locate coordinate columns from common header names")]
        detect: bool,

        #[arg(short, long, help = "Output mode: append or in-place [default: append]")]
        mode: Option<OutputMode>,

        #[command(flatten)]
        projection: ProjectionArgs,

        #[arg(short, long, default_value = ";", help = "Output field separator: ';', ',' or tab")]
        delimiter: char,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,

        #[arg(long, help = "Also write the batch report as JSON")]
        report_json: Option<PathBuf>,

        #[arg(long, help = "Remember directories, columns and mode for the next run")]
        save_preferences: bool,
    },

    /// Convert a single easting/northing pair
    Point {
        #[arg(help = "Easting in meters (decimal comma allowed)")]
        easting: String,

        #[arg(help = "Northing in meters (decimal comma allowed)")]
        northing: String,

        #[command(flatten)]
        projection: ProjectionArgs,
    },

    /// Show how a CSV table is read: encoding, separator, columns
    Inspect {
        #[arg(help = "CSV file to inspect")]
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from([
            "utm-converter",
            "convert",
            "--input-dir",
            "entrada",
            "-x",
            "B",
            "-y",
            "D",
            "--mode",
            "in-place",
            "--zone",
            "22",
            "--x-patterns",
            "este,easting",
        ])
        .unwrap();

        match cli.command {
            Commands::Convert {
                input_dir,
                x_column,
                mode,
                projection,
                x_patterns,
                delimiter,
                ..
            } => {
                assert_eq!(input_dir, Some(PathBuf::from("entrada")));
                assert_eq!(x_column.as_deref(), Some("B"));
                assert_eq!(mode, Some(OutputMode::InPlace));
                assert_eq!(projection.zone, 22);
                assert_eq!(projection.hemisphere, Hemisphere::South);
                assert_eq!(x_patterns, Some(vec!["este".to_string(), "easting".to_string()]));
                assert_eq!(delimiter, ';');
            }
            _ => panic!("expected convert"),
        }
        assert_eq!(cli.preferences, PathBuf::from(PREFERENCES_FILE));
    }

    #[test]
    fn test_parse_point() {
        let cli = Cli::try_parse_from([
            "utm-converter",
            "--quiet",
            "point",
            "500000",
            "7000000,0",
            "--hemisphere",
            "N",
        ])
        .unwrap();

        assert!(cli.quiet);
        match cli.command {
            Commands::Point {
                easting,
                northing,
                projection,
            } => {
                assert_eq!(easting, "500000");
                assert_eq!(northing, "7000000,0");
                assert_eq!(projection.hemisphere, Hemisphere::North);
            }
            _ => panic!("expected point"),
        }
    }
}
