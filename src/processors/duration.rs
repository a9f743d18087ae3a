/// Convert an elapsed-time string to whole minutes.
///
/// Accepts `HH:MM:SS` and `D days HH:MM:SS` (pandas timedelta rendering,
/// including signed forms like `-1 days +23:59:00`). Seconds are truncated.
/// Anything else, including a missing value, yields `None`.
pub fn parse_duration(value: Option<&str>) -> Option<i64> {
    let parts: Vec<&str> = value?.split_whitespace().collect();

    let (days, clock) = if parts.iter().any(|p| *p == "days" || *p == "day") {
        (parts.first()?.parse::<i64>().ok()?, *parts.get(2)?)
    } else {
        (0, *parts.first()?)
    };

    let mut fields = clock.split(':');
    let hours = fields.next()?.parse::<i64>().ok()?;
    let minutes = fields.next()?.parse::<i64>().ok()?;

    days.checked_mul(1440)?
        .checked_add(hours.checked_mul(60)?)?
        .checked_add(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_clock() {
        assert_eq!(parse_duration(Some("01:05:00")), Some(65));
        assert_eq!(parse_duration(Some("00:00:59")), Some(0));
        assert_eq!(parse_duration(Some("00:12")), Some(12));
    }

    #[test]
    fn test_parse_with_days() {
        assert_eq!(parse_duration(Some("2 days 03:15:00")), Some(3075));
        assert_eq!(parse_duration(Some("1 day 00:01:30")), Some(1441));
        assert_eq!(parse_duration(Some("0 days 00:25:41.123000")), Some(25));
    }

    #[test]
    fn test_parse_signed_timedelta() {
        assert_eq!(parse_duration(Some("-1 days +23:59:00")), Some(-1));
    }

    #[test]
    fn test_unparsable_yields_missing() {
        assert_eq!(parse_duration(Some("not-a-duration")), None);
        assert_eq!(parse_duration(Some("")), None);
        assert_eq!(parse_duration(Some("2 days")), None);
        assert_eq!(parse_duration(Some("ab:cd:ef")), None);
        assert_eq!(parse_duration(Some("12")), None);
        assert_eq!(parse_duration(None), None);
    }
}
