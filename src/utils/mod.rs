pub mod constants;
pub mod datetime;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use datetime::{parse_timestamp, DateHour};
pub use filename::generate_default_output_dir;
pub use progress::ProgressReporter;
