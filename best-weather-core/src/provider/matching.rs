//! Picking the timeseries entry closest to a target time.
//!
//! Providers first turn their raw entries into [`Timed`] candidates with
//! [`candidates`], which drops (and logs) entries whose time does not parse.
//! They then pick one candidate with the strategy that suits their feed.

use chrono::{DateTime, FixedOffset, NaiveDateTime, ParseResult, Utc};

use super::ProviderId;

/// How far ahead of "now" the forecast is taken.
pub const FORECAST_HORIZON_HOURS: i64 = 24;

pub fn target_time(now: DateTime<Utc>) -> DateTime<Utc> {
    now + chrono::Duration::hours(FORECAST_HORIZON_HOURS)
}

/// An entry paired with its parsed timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<T> {
    pub time: DateTime<FixedOffset>,
    pub entry: T,
}

/// Parse each entry's time lazily, skipping entries that fail to parse.
pub fn candidates<T, I, F, P>(
    id: ProviderId,
    entries: I,
    time_of: F,
    parse: P,
) -> impl Iterator<Item = Timed<T>>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> &str,
    P: Fn(&str) -> ParseResult<DateTime<FixedOffset>>,
{
    entries.into_iter().filter_map(move |entry| {
        let raw = time_of(&entry);
        match parse(raw) {
            Ok(time) => Some(Timed { time, entry }),
            Err(e) => {
                tracing::warn!(provider = %id, time = raw, error = %e, "Skipping entry with unparseable time");
                None
            }
        }
    })
}

/// The candidate with the smallest absolute distance to `target`, in whole
/// seconds. The first candidate wins a tie.
pub fn nearest_by_abs_difference<T>(
    candidates: impl IntoIterator<Item = Timed<T>>,
    target: DateTime<Utc>,
) -> Option<Timed<T>> {
    candidates
        .into_iter()
        .min_by_key(|c| (c.time.with_timezone(&Utc) - target).num_seconds().abs())
}

/// The first candidate, in input order, whose time is not before `target`.
/// Candidates after the match are never inspected.
pub fn first_at_or_after<T>(
    candidates: impl IntoIterator<Item = Timed<T>>,
    target: DateTime<Utc>,
) -> Option<Timed<T>> {
    candidates
        .into_iter()
        .find(|c| c.time.with_timezone(&Utc) >= target)
}

/// RFC 3339 timestamp with an explicit offset, e.g. `2024-06-02T12:00:00Z`.
pub fn parse_rfc3339(raw: &str) -> ParseResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
}

/// Offset-less local time such as `2024-06-02T12:00`, taken as UTC.
pub fn parse_naive_utc(raw: &str) -> ParseResult<DateTime<FixedOffset>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map(|ndt| ndt.and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn target() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap()
    }

    fn timed(offset_secs: i64, label: &'static str) -> Timed<&'static str> {
        Timed {
            time: (target() + Duration::seconds(offset_secs)).fixed_offset(),
            entry: label,
        }
    }

    #[test]
    fn target_is_a_day_ahead() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(target_time(now), target());
    }

    #[test]
    fn nearest_prefers_smaller_absolute_distance() {
        let picked =
            nearest_by_abs_difference(vec![timed(-3600, "before"), timed(1800, "after")], target());

        assert_eq!(picked.map(|c| c.entry), Some("after"));
    }

    #[test]
    fn nearest_tie_goes_to_first_entry() {
        let picked =
            nearest_by_abs_difference(vec![timed(1800, "first"), timed(-1800, "second")], target());
        assert_eq!(picked.map(|c| c.entry), Some("first"));

        let picked =
            nearest_by_abs_difference(vec![timed(-1800, "first"), timed(1800, "second")], target());
        assert_eq!(picked.map(|c| c.entry), Some("first"));
    }

    #[test]
    fn nearest_compares_instants_across_offsets() {
        // 13:30+02:00 is 11:30Z, 30 minutes from target; 12:45Z is 45 minutes.
        let plus_two = Timed {
            time: DateTime::parse_from_rfc3339("2024-06-02T13:30:00+02:00").unwrap(),
            entry: "plus_two",
        };
        let picked = nearest_by_abs_difference(vec![timed(2700, "utc"), plus_two], target());

        assert_eq!(picked.map(|c| c.entry), Some("plus_two"));
    }

    #[test]
    fn nearest_of_nothing_is_none() {
        let picked = nearest_by_abs_difference(Vec::<Timed<&str>>::new(), target());
        assert!(picked.is_none());
    }

    #[test]
    fn forward_scan_stops_at_first_entry_not_before_target() {
        // Hourly grid where index 5 is the first at or after the target. Index 4
        // is closer in absolute terms but precedes the target.
        let hourly: Vec<_> = (0..10)
            .map(|i| Timed {
                time: (target() - Duration::minutes(4 * 60 + 10) + Duration::hours(i)).fixed_offset(),
                entry: i,
            })
            .collect();

        let picked = first_at_or_after(hourly, target());
        assert_eq!(picked.map(|c| c.entry), Some(5));
    }

    #[test]
    fn forward_scan_accepts_exact_match() {
        let picked = first_at_or_after(vec![timed(-60, "early"), timed(0, "exact")], target());
        assert_eq!(picked.map(|c| c.entry), Some("exact"));
    }

    #[test]
    fn forward_scan_without_match_is_none() {
        let picked = first_at_or_after(vec![timed(-7200, "a"), timed(-3600, "b")], target());
        assert!(picked.is_none());
    }

    #[test]
    fn candidates_skip_unparseable_times() {
        let raw = vec!["not a time", "2024-06-02T12:00:00Z", ""];
        let parsed: Vec<_> = candidates(ProviderId::Smhi, raw, |s| *s, parse_rfc3339).collect();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].entry, "2024-06-02T12:00:00Z");
        assert_eq!(parsed[0].time.with_timezone(&Utc), target());
    }

    #[test]
    fn naive_times_are_utc() {
        let parsed = parse_naive_utc("2024-06-02T12:00").unwrap();
        assert_eq!(parsed.with_timezone(&Utc), target());
        assert_eq!(parsed.offset().local_minus_utc(), 0);

        assert!(parse_naive_utc("2024-06-02T12:00:00").is_ok());
        assert!(parse_naive_utc("tomorrow").is_err());
    }
}
