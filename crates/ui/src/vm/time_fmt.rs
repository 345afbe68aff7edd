use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

/// `45s`, `3m 05s`.
#[must_use]
pub fn format_duration(secs: u32) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else {
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adventure_core::time::fixed_now;

    #[test]
    fn durations_switch_to_minutes() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(185), "3m 05s");
    }

    #[test]
    fn datetime_has_minute_precision() {
        assert_eq!(format_datetime(fixed_now()).len(), "2024-01-01 00:00".len());
    }
}
