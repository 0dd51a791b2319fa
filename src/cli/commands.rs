use crate::cli::args::{Cli, Commands, ProjectionArgs};
use crate::error::{ConversionError, Result};
use crate::models::{BatchReport, GeodeticEllipsoid, ProjectionConfig};
use crate::preferences::Preferences;
use crate::processors::{BatchConverter, BatchRequest, RowConverter};
use crate::readers::{detect_utm_columns, index_to_letter, ColumnSelector, Separator, TableLoader};
use crate::utils::progress::ProgressReporter;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            input_dir,
            output_dir,
            x_column,
            y_column,
            x_patterns,
            y_patterns,
            detect,
            mode,
            projection,
            delimiter,
            max_workers,
            report_json,
            save_preferences,
        } => {
            let preferences = Preferences::load_or_default(&cli.preferences);

            let source_dir = input_dir
                .or_else(|| preferences.source_dir.clone())
                .ok_or_else(|| missing_setting("input directory"))?;
            let destination_dir = output_dir
                .or_else(|| preferences.destination_dir.clone())
                .ok_or_else(|| missing_setting("output directory"))?;

            let x_selector = choose_selector(
                x_column,
                x_patterns,
                detect,
                preferences.x_column.as_deref(),
                ColumnSelector::default_x,
            );
            let y_selector = choose_selector(
                y_column,
                y_patterns,
                detect,
                preferences.y_column.as_deref(),
                ColumnSelector::default_y,
            );

            let separator = Separator::from_char(delimiter).ok_or_else(|| {
                ConversionError::Config(format!(
                    "Invalid delimiter '{}'. Expected ';', ',' or a tab",
                    delimiter
                ))
            })?;

            let request = BatchRequest {
                source_dir,
                destination_dir,
                x_column: x_selector,
                y_column: y_selector,
                mode: mode.or(preferences.mode).unwrap_or_default(),
            };
            request.validate()?;

            let config = projection_config(&projection)?;
            println!("Converting UTM tables ({})", config);
            println!("Input directory: {}", request.source_dir.display());
            println!("Output directory: {}", request.destination_dir.display());
            println!(
                "X: {}, Y: {}, mode: {}, workers: {}",
                request.x_column, request.y_column, request.mode, max_workers
            );

            let converter = BatchConverter::new(config)
                .with_max_workers(max_workers)
                .with_output_delimiter(separator.as_byte());

            let tasks = converter.discover_tasks(&request.source_dir, &request.destination_dir)?;
            if tasks.is_empty() {
                println!("No CSV files found in {}", request.source_dir.display());
                return Ok(());
            }

            let progress = ProgressReporter::new(tasks.len() as u64, "Converting files...", cli.quiet);
            let report = converter.run(&request, &progress)?;
            drop(progress);

            println!("\n{}", report.summary());

            if let Some(path) = report_json {
                write_report_json(&report, &path)?;
                println!("Report written to {}", path.display());
            }

            if save_preferences {
                remember(&preferences, &request).save(&cli.preferences)?;
                info!("Preferences saved to {}", cli.preferences.display());
            }

            if report.files_succeeded == 0 {
                return Err(ConversionError::Config(format!(
                    "none of the {} file(s) could be converted",
                    report.files.len()
                )));
            }
        }

        Commands::Point {
            easting,
            northing,
            projection,
        } => {
            let config = projection_config(&projection)?;
            let converter = RowConverter::new(config);
            let row = converter.convert_cells(&easting, &northing)?;

            println!("Reference system: {}", config);
            println!("Longitude: {}  ({})", row.lon_dec, row.lon_dms);
            println!("Latitude:  {}  ({})", row.lat_dec, row.lat_dms);
            println!("Longitude (BR): {}", row.lon_dms_br);
            println!("Latitude (BR):  {}", row.lat_dms_br);
        }

        Commands::Inspect { file } => {
            let loaded = TableLoader::new().load(&file)?;
            let table = &loaded.table;

            println!("File: {}", file.display());
            println!("Encoding: {}", loaded.encoding);
            println!("Separator: '{}'", loaded.separator);
            println!(
                "Rows: {} (first row is treated as a header row)",
                table.row_count()
            );
            println!("\nColumns:");
            for (index, header) in table.headers.iter().enumerate() {
                println!("  {:>3}  {}", index_to_letter(index), header);
            }

            match detect_utm_columns(&table.headers) {
                Some(detected) => println!(
                    "\nDetected X: column {} ({}), Y: column {} ({})",
                    index_to_letter(detected.x),
                    table.headers[detected.x],
                    index_to_letter(detected.y),
                    table.headers[detected.y]
                ),
                None => println!("\nNo coordinate columns detected from the headers"),
            }
        }
    }

    Ok(())
}

fn missing_setting(name: &str) -> ConversionError {
    ConversionError::Config(format!(
        "no {} given and none saved in preferences",
        name
    ))
}

/// Explicit letters win, then explicit patterns, then `--detect`, then the
/// saved letters, then the built-in patterns.
fn choose_selector(
    letters: Option<String>,
    patterns: Option<Vec<String>>,
    detect: bool,
    saved: Option<&str>,
    default: fn() -> ColumnSelector,
) -> ColumnSelector {
    if let Some(letters) = letters {
        return ColumnSelector::letter(&letters);
    }
    if let Some(patterns) = patterns {
        return ColumnSelector::patterns(&patterns);
    }
    if detect {
        return default();
    }
    match saved {
        Some(letters) => ColumnSelector::letter(letters),
        None => default(),
    }
}

fn projection_config(args: &ProjectionArgs) -> Result<ProjectionConfig> {
    let ellipsoid = GeodeticEllipsoid::from_name(&args.ellipsoid).ok_or_else(|| {
        ConversionError::Config(format!(
            "Unknown ellipsoid '{}'. Expected GRS80 or WGS84",
            args.ellipsoid
        ))
    })?;
    ProjectionConfig::new(ellipsoid, args.zone, args.hemisphere)
}

fn write_report_json(report: &BatchReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, serde_json::to_string_pretty(report)?)?;
    Ok(())
}

fn remember(previous: &Preferences, request: &BatchRequest) -> Preferences {
    let letters = |selector: &ColumnSelector, fallback: &Option<String>| match selector {
        ColumnSelector::Letter(letters) => Some(letters.to_uppercase()),
        ColumnSelector::Patterns(_) => fallback.clone(),
    };

    Preferences {
        source_dir: Some(absolute(&request.source_dir)),
        destination_dir: Some(absolute(&request.destination_dir)),
        x_column: letters(&request.x_column, &previous.x_column),
        y_column: letters(&request.y_column, &previous.y_column),
        mode: Some(request.mode),
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
