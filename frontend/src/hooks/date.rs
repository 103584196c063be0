//! 日期格式化

use chrono::{DateTime, Utc};

/// 超过该天数后不再显示相对时间
const RELATIVE_LIMIT_DAYS: i64 = 30;

/// 绝对日期，例如 `Mar 5, 2024`
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y").to_string()
}

/// 相对于 `now` 的时间描述
pub fn format_relative(value: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(value);
    if elapsed.num_days() >= RELATIVE_LIMIT_DAYS {
        return format_date(value);
    }

    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if hours < 1 {
        plural(minutes, "minute")
    } else if days < 1 {
        plural(hours, "hour")
    } else {
        plural(days, "day")
    }
}

/// 相对于当前时间
pub fn time_ago(value: DateTime<Utc>) -> String {
    format_relative(value, Utc::now())
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_absolute_format() {
        assert_eq!(format_date(now()), "Mar 5, 2024");
        let new_year = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(format_date(new_year), "Jan 15, 2025");
    }

    #[test]
    fn test_relative_buckets() {
        let now = now();
        assert_eq!(format_relative(now - Duration::seconds(20), now), "just now");
        assert_eq!(format_relative(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_relative(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(format_relative(now - Duration::hours(2), now), "2 hours ago");
        assert_eq!(format_relative(now - Duration::days(3), now), "3 days ago");
    }

    #[test]
    fn test_old_dates_fall_back_to_absolute() {
        let now = now();
        assert_eq!(format_relative(now - Duration::days(45), now), "Jan 20, 2024");
    }

    #[test]
    fn test_future_timestamps_read_as_just_now() {
        let now = now();
        assert_eq!(format_relative(now + Duration::minutes(3), now), "just now");
    }
}
