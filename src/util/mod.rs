//
//  sonar-web-api
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Utility functions for rendering values in the terminal.

use chrono::{DateTime, Utc};

/// Formats a timestamp relative to `now` ("3 days ago").
pub fn format_relative_time(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - time).num_seconds();

    if diff < 0 {
        return "in the future".to_string();
    }

    let plural = |n: i64, unit: &str| format!("{} {}{} ago", n, unit, if n == 1 { "" } else { "s" });

    match diff {
        d if d < 60 => "just now".to_string(),
        d if d < 3_600 => plural(d / 60, "minute"),
        d if d < 86_400 => plural(d / 3_600, "hour"),
        d if d < 604_800 => plural(d / 86_400, "day"),
        d if d < 2_592_000 => plural(d / 604_800, "week"),
        d if d < 31_536_000 => plural(d / 2_592_000, "month"),
        d => plural(d / 31_536_000, "year"),
    }
}

/// Formats an optional analysis date, `-` when the item was never analyzed.
pub fn format_analysis_date(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| format_relative_time(t, Utc::now()))
        .unwrap_or_else(|| "-".to_string())
}

/// Truncates a string to `max_len` characters, ending with `...` when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_relative_time() {
        let now = Utc::now();
        assert_eq!(format_relative_time(now, now), "just now");
        assert_eq!(format_relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_relative_time(now - Duration::days(3), now), "3 days ago");
        assert_eq!(format_relative_time(now + Duration::days(1), now), "in the future");
    }

    #[test]
    fn test_format_analysis_date_missing() {
        assert_eq!(format_analysis_date(None), "-");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }
}
