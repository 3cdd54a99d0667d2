//! Timestamp formatting for transcript segments.

/// Format a second offset as `MM:SS` with floored minutes and seconds.
///
/// There is no hour component: offsets beyond 99 minutes keep accumulating
/// in the minute field, which callers must reinterpret themselves.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(5.9), "00:05");
        assert_eq!(format_timestamp(65.0), "01:05");
        assert_eq!(format_timestamp(600.0), "10:00");
    }

    #[test]
    fn test_format_timestamp_clamps_negative() {
        assert_eq!(format_timestamp(-3.0), "00:00");
    }

    #[test]
    fn test_format_timestamp_past_an_hour() {
        // 1h41m5s renders as 101 minutes, by contract
        assert_eq!(format_timestamp(6065.0), "101:05");
    }
}
