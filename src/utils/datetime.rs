use crate::utils::constants::DATE_HOUR_FORMAT;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a local timestamp in any of the layouts the input exports use.
///
/// Bare dates resolve to midnight. Returns `None` for blank or unrecognised input.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Hour-bucket join key, formatted `YYYY-MM-DD HH`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateHour(String);

impl DateHour {
    pub fn from_datetime(datetime: &NaiveDateTime) -> Self {
        Self(datetime.format(DATE_HOUR_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 3)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap();

        assert_eq!(parse_timestamp("2024-05-03 14:07:09"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-03T14:07:09"), Some(expected));
        assert_eq!(parse_timestamp("2024/05/03 14:07:09"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-05-03 14:07:09.250").map(|t| t.second()),
            Some(9)
        );
        assert_eq!(
            parse_timestamp("2024-05-03 14:07").map(|t| t.minute()),
            Some(7)
        );
    }

    #[test]
    fn test_parse_bare_date_is_midnight() {
        let parsed = parse_timestamp("2024-05-03").unwrap();
        assert_eq!(parsed.hour(), 0);
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-40 10:00:00"), None);
    }

    #[test]
    fn test_date_hour_key() {
        let datetime = parse_timestamp("2024-01-09 07:59:59").unwrap();
        assert_eq!(DateHour::from_datetime(&datetime).as_str(), "2024-01-09 07");
    }
}
