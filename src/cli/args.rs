use crate::config::PipelineConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bikeshare-processor")]
#[command(about = "Joins bike-share trips with hourly weather and station data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only log warnings and hide progress")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Configuration file (TOML, JSON or YAML)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the pipeline and write the observation table, aggregates and summary
    Process {
        #[command(flatten)]
        input: InputArgs,

        #[arg(
            short,
            long,
            help = "Output directory [default: output/bikeshare-{YYMMDD}]"
        )]
        output_dir: Option<PathBuf>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, default_value = "8192")]
        batch_size: usize,

        #[arg(long, default_value = "10000", help = "Maximum rows per Parquet row group")]
        row_group_size: usize,

        #[arg(long, default_value = "10", help = "Busiest stations to list")]
        top_stations: usize,
    },

    /// Run the pipeline and print the integrity report without writing output
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Display information about a written observations Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,
    },
}

/// Input selection shared by `process` and `validate`.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    #[arg(short, long, help = "Directory holding the three input files")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, help = "Trip CSV, overrides the configured path")]
    pub trips: Option<PathBuf>,

    #[arg(long, help = "Station CSV, overrides the configured path")]
    pub stations: Option<PathBuf>,

    #[arg(long, help = "Weather CSV, overrides the configured path")]
    pub weather: Option<PathBuf>,

    #[arg(short, long, help = "Input text encoding label, e.g. utf-8 or gbk")]
    pub encoding: Option<String>,

    #[arg(long, help = "Memory-map input files")]
    pub mmap: bool,
}

impl InputArgs {
    /// Command line values win over the configuration file and environment.
    pub fn apply(&self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(dir) = &self.data_dir {
            config.input.trips_file = dir.join(&config.input.trips_file);
            config.input.stations_file = dir.join(&config.input.stations_file);
            config.input.weather_file = dir.join(&config.input.weather_file);
        }
        if let Some(path) = &self.trips {
            config = config.with_trips_file(path.clone());
        }
        if let Some(path) = &self.stations {
            config = config.with_stations_file(path.clone());
        }
        if let Some(path) = &self.weather {
            config = config.with_weather_file(path.clone());
        }
        if let Some(encoding) = &self.encoding {
            config = config.with_encoding(encoding);
        }
        if self.mmap {
            config = config.with_mmap(true);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_input_args_override_config() {
        let args = InputArgs {
            data_dir: Some(PathBuf::from("data")),
            weather: Some(PathBuf::from("/tmp/weather.csv")),
            encoding: Some("gbk".to_string()),
            ..InputArgs::default()
        };
        let config = args.apply(PipelineConfig::default());

        assert_eq!(
            config.input.trips_file,
            Path::new("data").join("cleaned_daily_rent_data.csv")
        );
        assert_eq!(config.input.weather_file, PathBuf::from("/tmp/weather.csv"));
        assert_eq!(config.input.encoding, "gbk");
        assert!(!config.input.use_mmap);
    }

    #[test]
    fn test_parse_process_command() {
        let cli = Cli::try_parse_from([
            "bikeshare-processor",
            "--quiet",
            "process",
            "--data-dir",
            "data",
            "--compression",
            "zstd",
            "--row-group-size",
            "500",
        ])
        .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Process {
                input,
                compression,
                batch_size,
                row_group_size,
                ..
            } => {
                assert_eq!(input.data_dir, Some(PathBuf::from("data")));
                assert_eq!(compression, "zstd");
                assert_eq!(batch_size, 8192);
                assert_eq!(row_group_size, 500);
            }
            _ => panic!("expected process command"),
        }
    }
}
