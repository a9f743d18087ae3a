pub mod bands;
pub mod observation;
pub mod station;
pub mod trip;
pub mod weather;

pub use bands::{TempBand, WindBand};
pub use observation::{MatchStats, Observation, UnifiedTable};
pub use station::{StationRecord, StationTable};
pub use trip::{RawTrip, TimeFeatures, TripRecord};
pub use weather::{WeatherRecord, WeatherTable};
