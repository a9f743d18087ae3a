pub mod data_merger;
pub mod duration;
pub mod imputation;
pub mod integrity_checker;
pub mod pipeline;
pub mod temperature_binner;
pub mod time_features;
pub mod trip_cleaner;
pub mod weather_normalizer;

pub use data_merger::DataMerger;
pub use imputation::{FallbackChain, FillReport, GroupBy};
pub use integrity_checker::{ColumnSummary, IntegrityChecker, IntegrityReport};
pub use pipeline::{Pipeline, PipelineOutput};
pub use temperature_binner::{TemperatureBinner, TemperatureBins};
pub use trip_cleaner::{clean_trips, CleaningStats};
pub use weather_normalizer::{WeatherNormalizer, WeatherSchema};
