// Splitting a long date range into provider-sized request spans.
use chrono::{Days, NaiveDate};

pub const DEFAULT_MAX_SEGMENT_DAYS: i64 = 365;

/// Upper bound accepted for a configured segment span.
pub const MAX_SEGMENT_DAYS_LIMIT: i64 = 36_500;

/// An inclusive `[from, to]` span sent to the upstream source in one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Splits `[from, to]` into consecutive segments with `to - from <= max_days`.
///
/// Segments are ordered oldest first, each starts the day after the previous
/// one ends, and the last one ends on `to`. A range whose span already fits is
/// returned as a single segment. Returns nothing when `from > to`.
///
/// Date arithmetic is checked, so ranges ending near the last representable
/// date are clamped to `to` instead of overflowing.
pub fn plan_segments(from: NaiveDate, to: NaiveDate, max_days: i64) -> Vec<Segment> {
    if from > to {
        return Vec::new();
    }
    let max_days = max_days.max(0);
    if (to - from).num_days() <= max_days {
        return vec![Segment { from, to }];
    }
    let step = Days::new(max_days as u64);

    let mut segments = Vec::new();
    let mut current_from = from;
    loop {
        let current_to = current_from.checked_add_days(step).map_or(to, |end| end.min(to));
        segments.push(Segment { from: current_from, to: current_to });
        match current_to.succ_opt() {
            Some(next) if current_to < to => current_from = next,
            _ => break,
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shared::utils::parse_date;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_tiles(segments: &[Segment], from: NaiveDate, to: NaiveDate, max_days: i64) {
        assert!(!segments.is_empty());
        assert_eq!(segments.first().unwrap().from, from);
        assert_eq!(segments.last().unwrap().to, to);
        for seg in segments {
            assert!(seg.from <= seg.to, "inverted segment {:?}", seg);
            assert!((seg.to - seg.from).num_days() <= max_days, "segment too long {:?}", seg);
        }
        for pair in segments.windows(2) {
            assert_eq!(pair[1].from, pair[0].to + Duration::days(1), "gap or overlap between {:?}", pair);
        }
    }

    #[test]
    fn test_short_range_is_one_segment() {
        let segments = plan_segments(date(2024, 1, 1), date(2024, 1, 31), 365);
        assert_eq!(segments, vec![Segment { from: date(2024, 1, 1), to: date(2024, 1, 31) }]);
    }

    #[test]
    fn test_exactly_max_span_is_one_segment() {
        let from = date(2023, 1, 1);
        let to = from + Duration::days(365);
        assert_eq!(plan_segments(from, to, 365).len(), 1);
    }

    #[test]
    fn test_single_day_range() {
        let d = date(2024, 2, 29);
        assert_eq!(plan_segments(d, d, 365), vec![Segment { from: d, to: d }]);
    }

    #[test]
    fn test_reversed_range_is_empty() {
        assert!(plan_segments(date(2024, 2, 1), date(2024, 1, 1), 365).is_empty());
    }

    #[test]
    fn test_multi_year_range_covers_without_gaps() {
        let from = date(2020, 1, 1);
        let to = date(2022, 6, 15);
        let segments = plan_segments(from, to, 365);
        assert_eq!(segments.len(), 3);
        assert_tiles(&segments, from, to, 365);
        assert_eq!(segments[0], Segment { from: date(2020, 1, 1), to: date(2020, 12, 31) });
        assert_eq!(segments[1], Segment { from: date(2021, 1, 1), to: date(2022, 1, 1) });
        assert_eq!(segments[2], Segment { from: date(2022, 1, 2), to: date(2022, 6, 15) });
    }

    #[test]
    fn test_single_day_remainder_is_kept() {
        // Two full segments of 366 calendar days each, then one lone day.
        let from = date(2021, 1, 1);
        let to = from + Duration::days(366 + 366);
        let segments = plan_segments(from, to, 365);
        assert_tiles(&segments, from, to, 365);
        assert_eq!(segments.last().unwrap().from, to);
    }

    #[test]
    fn test_small_max_span() {
        let from = date(2024, 1, 1);
        let to = date(2024, 1, 10);
        let segments = plan_segments(from, to, 2);
        assert_tiles(&segments, from, to, 2);
        assert_eq!(segments.len(), 4);
    }

    #[test]
    fn test_range_near_last_representable_date_does_not_overflow() {
        let from = parse_date("+262141-06-01").unwrap();
        let to = parse_date("+262142-12-31").unwrap();
        let segments = plan_segments(from, to, 365);
        assert_tiles(&segments, from, to, 365);
        assert_eq!(segments.len(), 2);

        let last = NaiveDate::MAX;
        let segments = plan_segments(last - Duration::days(400), last, 365);
        assert_tiles(&segments, last - Duration::days(400), last, 365);
    }

    #[test]
    fn test_huge_max_span_is_one_segment() {
        let from = date(2000, 1, 1);
        let to = date(2024, 1, 1);
        assert_eq!(plan_segments(from, to, i64::MAX), vec![Segment { from, to }]);
    }
}
