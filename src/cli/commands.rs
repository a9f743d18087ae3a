use crate::analyzers::{build_station_day_features, RideAnalyzer};
use crate::cli::args::{Cli, Commands, InputArgs};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::processors::{IntegrityChecker, Pipeline, PipelineOutput};
use crate::utils::constants::OBSERVATIONS_FILE;
use crate::utils::{generate_default_output_dir, ProgressReporter};
use crate::writers::{AggregateWriter, ParquetWriter, RunSummary};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;
use validator::Validate;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Process {
            input,
            output_dir,
            compression,
            batch_size,
            row_group_size,
            top_stations,
        } => {
            let config = load_config(cli.config.as_deref(), &input)?;
            let output_dir = output_dir.unwrap_or_else(generate_default_output_dir);
            // Fail on a bad codec before spending time on the pipeline.
            let parquet = ParquetWriter::new()
                .with_compression(&compression)?
                .with_batch_size(batch_size)
                .with_row_group_size(row_group_size);

            let progress = ProgressReporter::new_spinner("Preprocessing...", cli.quiet);
            let output = Pipeline::new(config).run(Some(&progress))?;
            progress.println(&IntegrityChecker::new().generate_summary(&output.report));

            let analysis = ProgressReporter::new_spinner("Aggregating...", cli.quiet);
            let bundle = RideAnalyzer::new().analyze(&output.table)?;
            let station_days = build_station_day_features(&output.table.observations);
            analysis.finish_with_message("Aggregation complete");

            let writer = AggregateWriter::new(&output_dir)?;
            let observations_path = output_dir.join(OBSERVATIONS_FILE);
            parquet.write_observations(&output.table.observations, &observations_path)?;
            writer.write_bundle(&bundle)?;
            writer.write_station_days(&station_days)?;
            writer.write_summary(&run_summary(&output, station_days.len()))?;

            let file_info = parquet.get_file_info(&observations_path)?;
            progress.println(&format!("\n{}", file_info.summary()));

            progress.println(&format!("\nTop {} stations:", top_stations));
            for (rank, station) in bundle.station_activity.top(top_stations).iter().enumerate() {
                progress.println(&format!(
                    "{:>3}. {} ({}): {} trips",
                    rank + 1,
                    station.station_name,
                    station.station_id,
                    station.trips
                ));
            }

            info!(dir = %output_dir.display(), "Processing complete");
            progress.println(&format!("\nOutput written to {}", output_dir.display()));
        }

        Commands::Validate { input } => {
            let config = load_config(cli.config.as_deref(), &input)?;
            let progress = ProgressReporter::new_spinner("Validating...", cli.quiet);
            let output = Pipeline::new(config).run(Some(&progress))?;

            progress.println(&IntegrityChecker::new().generate_summary(&output.report));
            if output.report.is_fully_matched() {
                progress.println("All trips matched an hour of weather data");
            } else {
                progress.println(&format!(
                    "{} trips had no weather for their hour and were imputed",
                    output.report.total_records - output.report.match_stats.matched
                ));
            }
        }

        Commands::Info { file } => {
            let file_info = ParquetWriter::new().get_file_info(&file)?;
            println!("Parquet file: {}", file.display());
            println!("{}", file_info.summary());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>, input: &InputArgs) -> Result<PipelineConfig> {
    let config = input.apply(PipelineConfig::load(path)?);
    config.validate()?;
    Ok(config)
}

fn run_summary(output: &PipelineOutput, station_day_rows: usize) -> RunSummary<'_> {
    let table = &output.table;
    RunSummary {
        generated_at: chrono::Local::now().naive_local(),
        total_records: table.len(),
        match_stats: table.match_stats,
        match_rate_pct: table.match_stats.percentage(),
        unknown_station_rows: table.unknown_station_rows,
        temperature_edges: &table.temperature_bins.edges,
        defaulted_weather_columns: &output.defaulted_weather_columns,
        cleaning: &output.cleaning,
        integrity: &output.report,
        station_day_rows,
    }
}

/// `RUST_LOG` decides the filter unless `--verbose` or `--quiet` is given.
fn init_logging(verbose: bool, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    Ok(())
}
