//! Shared domain vocabulary: reporting periods, entity status enums, the
//! rating-based sentiment heuristic, and small text helpers used by the
//! analytics output.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Reporting period selectable by the caller. Resolves to a fixed-offset
/// window ending "now", not a calendar-aligned one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Quarter,
}

impl Period {
    /// Number of days the window reaches back from "now".
    #[must_use]
    pub fn days(self) -> i64 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::Quarter => 90,
        }
    }

    /// Resolves the period to a closed `[start, end]` date range ending at
    /// `now`'s calendar date.
    #[must_use]
    pub fn window(self, now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
        let end = now.date_naive();
        let start = (now - Duration::days(self.days())).date_naive();
        (start, end)
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "quarter" => Ok(Period::Quarter),
            other => Err(format!(
                "unknown period '{other}' (expected week, month, or quarter)"
            )),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
            Period::Quarter => write!(f, "quarter"),
        }
    }
}

/// Sentiment classification derived from the star rating alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Neutral => "NEUTRAL",
            Sentiment::Negative => "NEGATIVE",
        }
    }
}

/// Rating-based sentiment heuristic: 4–5 positive, 1–2 negative, 3 neutral.
///
/// Review text is deliberately not analyzed. A future text classifier can
/// replace this function behind the same signature without touching call
/// sites.
#[must_use]
pub fn sentiment_from_rating(rating: i16) -> Sentiment {
    if rating >= 4 {
        Sentiment::Positive
    } else if rating <= 2 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Truncates `text` to at most `max_chars` characters, appending an ellipsis
/// marker only when truncation actually happened.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}

/// Short human label for a trend-series point, e.g. `"Jan 5"`.
#[must_use]
pub fn short_date_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn period_days_match_fixed_offsets() {
        assert_eq!(Period::Week.days(), 7);
        assert_eq!(Period::Month.days(), 30);
        assert_eq!(Period::Quarter.days(), 90);
    }

    #[test]
    fn period_window_is_fixed_offset_not_calendar_aligned() {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        let (start, end) = Period::Month.window(now);
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 2, 13).unwrap());
    }

    #[test]
    fn period_parses_from_str() {
        assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("quarter".parse::<Period>().unwrap(), Period::Quarter);
        assert!("year".parse::<Period>().is_err());
    }

    #[test]
    fn sentiment_thresholds() {
        assert_eq!(sentiment_from_rating(5), Sentiment::Positive);
        assert_eq!(sentiment_from_rating(4), Sentiment::Positive);
        assert_eq!(sentiment_from_rating(3), Sentiment::Neutral);
        assert_eq!(sentiment_from_rating(2), Sentiment::Negative);
        assert_eq!(sentiment_from_rating(1), Sentiment::Negative);
    }

    #[test]
    fn truncate_leaves_short_text_unmodified() {
        let text = "a".repeat(80);
        assert_eq!(truncate_with_ellipsis(&text, 100), text);
    }

    #[test]
    fn truncate_at_exact_boundary_adds_no_marker() {
        let text = "b".repeat(100);
        assert_eq!(truncate_with_ellipsis(&text, 100), text);
    }

    #[test]
    fn truncate_long_text_keeps_exactly_max_chars_plus_marker() {
        let text = "c".repeat(150);
        let out = truncate_with_ellipsis(&text, 100);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 103);
        assert_eq!(&out[..100], "c".repeat(100).as_str());
    }

    #[test]
    fn short_date_label_format() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(short_date_label(date), "Jan 5");
    }
}
