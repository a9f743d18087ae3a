use crate::utils::constants::DEFAULT_OUTPUT_DIR;
use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Generate default output directory with format: output/bikeshare-{YYMMDD}
pub fn generate_default_output_dir() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let dirname = format!("bikeshare-{:02}{:02}{:02}", year, month, day);
    PathBuf::from(DEFAULT_OUTPUT_DIR).join(dirname)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_output_dir() {
        let dir = generate_default_output_dir();
        let dir_str = dir.to_string_lossy();

        let parts: Vec<&str> = dir_str.split('/').collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], "output");

        let name = parts[1];
        assert!(name.starts_with("bikeshare-"));
        assert_eq!(name.len(), "bikeshare-".len() + 6);
        assert!(name["bikeshare-".len()..].chars().all(|c| c.is_ascii_digit()));
    }
}
