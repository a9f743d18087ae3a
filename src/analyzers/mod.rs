pub mod ride_analyzer;
pub mod station_day;

pub use ride_analyzer::{AnalysisBundle, RideAnalyzer, StationActivity, StationCount, TempImpact, WindImpact};
pub use station_day::{build_station_day_features, StationDayFeature};
