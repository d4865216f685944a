//! Expansion of recurring date patterns into concrete trip windows.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use farescout_shared::{DatePattern, DateRange, PatternKind};

/// Upper bound on ranges produced by a single expansion
pub const MAX_RANGES: usize = 48;

/// Horizon used when sampling, in months of four weeks
pub const SAMPLE_HORIZON_MONTHS: u32 = 12;

/// Longest trip a pattern may ask for: the whole sampling horizon
pub const MAX_TRIP_DAYS: u32 = SAMPLE_HORIZON_MONTHS * 28;

const WEEKEND_NIGHTS: i64 = 2;
const ONE_WEEK_DEFAULT: u32 = 7;
const TWO_WEEKS_DEFAULT: u32 = 14;

/// Trip length in days for a pattern, or `None` when it cannot produce a range
pub fn trip_length(pattern: &DatePattern) -> Option<i64> {
    let days = match pattern.kind {
        PatternKind::Weekend => return Some(WEEKEND_NIGHTS),
        PatternKind::OneWeek if pattern.duration == 0 => ONE_WEEK_DEFAULT,
        PatternKind::TwoWeeks if pattern.duration == 0 => TWO_WEEKS_DEFAULT,
        _ => pattern.duration,
    };
    (days > 0).then_some(days as i64)
}

/// Expands `pattern` into at most [`MAX_RANGES`] non-overlapping ranges whose
/// outbound date falls before `today + horizon_months * 4 weeks`.
pub fn expand(pattern: &DatePattern, horizon_months: u32, today: NaiveDate) -> Vec<DateRange> {
    let mut ranges = Vec::new();
    let Some(length) = trip_length(pattern) else {
        return ranges;
    };

    let horizon_end = today
        .checked_add_signed(Duration::weeks(horizon_months as i64 * 4))
        .unwrap_or(NaiveDate::MAX);
    let mut cursor = today;

    // Stops early when a date would leave the calendar range
    while cursor < horizon_end && ranges.len() < MAX_RANGES {
        let next = match range_starting_on(cursor, pattern, length) {
            Candidate::Range(range) => {
                let next = range.return_date.succ_opt();
                ranges.push(range);
                next
            }
            Candidate::Skip => cursor.succ_opt(),
            Candidate::OutOfRange => None,
        };
        match next {
            Some(next) => cursor = next,
            None => break,
        }
    }

    ranges
}

enum Candidate {
    Range(DateRange),
    Skip,
    OutOfRange,
}

fn range_starting_on(start: NaiveDate, pattern: &DatePattern, length: i64) -> Candidate {
    if let Some(days) = pattern.preferred_days.as_deref() {
        let weekday = start.weekday().num_days_from_sunday() as u8;
        if !days.is_empty() && !days.contains(&weekday) {
            return Candidate::Skip;
        }
    }

    if pattern.kind == PatternKind::Weekend && start.weekday() != Weekday::Fri {
        return Candidate::Skip;
    }

    let Some(return_date) = start.checked_add_signed(Duration::days(length)) else {
        return Candidate::OutOfRange;
    };

    let day_month = start.format("%d/%m");
    let label = match pattern.kind {
        PatternKind::Weekend => format!("Weekend {day_month}"),
        PatternKind::OneWeek => format!("Week {day_month}"),
        PatternKind::TwoWeeks => format!("2 weeks {day_month}"),
        PatternKind::Custom => format!("{length} days {day_month}"),
    };

    Candidate::Range(DateRange {
        outbound: start,
        return_date,
        label,
    })
}

/// Evenly spaced subset of the 12-month expansion, at most `sample_size` long.
///
/// Takes indices `0, stride, 2*stride, ..` with `stride = max(len / sample_size, 1)`,
/// so a list shorter than `sample_size` comes back whole.
pub fn sample(pattern: &DatePattern, sample_size: usize, today: NaiveDate) -> Vec<DateRange> {
    if sample_size == 0 {
        return Vec::new();
    }

    let all = expand(pattern, SAMPLE_HORIZON_MONTHS, today);
    let stride = (all.len() / sample_size).max(1);

    all.into_iter().step_by(stride).take(sample_size).collect()
}

/// Approximate French school holiday windows for `year`
pub fn school_holidays(year: i32) -> Vec<DateRange> {
    let windows = [
        ((year, 2, 10), (year, 2, 25), "Winter holidays"),
        ((year, 4, 8), (year, 4, 23), "Spring holidays"),
        ((year, 7, 8), (year, 8, 31), "Summer holidays"),
        ((year, 10, 21), (year, 11, 5), "All Saints holidays"),
        ((year, 12, 22), (year.saturating_add(1), 1, 6), "Christmas holidays"),
    ];

    // Windows outside the calendar range are dropped
    windows
        .into_iter()
        .filter_map(|(from, to, label)| {
            Some(DateRange {
                outbound: NaiveDate::from_ymd_opt(from.0, from.1, from.2)?,
                return_date: NaiveDate::from_ymd_opt(to.0, to.1, to.2)?,
                label: label.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekend_starts_on_friday() {
        // 2025-03-05 is a Wednesday
        let ranges = expand(&DatePattern::weekend(), 1, day(2025, 3, 5));
        assert_eq!(ranges[0].outbound, day(2025, 3, 7));
        assert_eq!(ranges[0].return_date, day(2025, 3, 9));
        assert_eq!(ranges[0].label, "Weekend 07/03");
        assert_eq!(ranges[1].outbound, day(2025, 3, 14));
        assert_eq!(ranges.len(), 4);
    }

    #[test]
    fn test_one_week_defaults_and_advances_past_return() {
        let pattern = DatePattern::new(PatternKind::OneWeek, 0);
        let ranges = expand(&pattern, 1, day(2025, 3, 5));
        assert_eq!(ranges[0].return_date, day(2025, 3, 12));
        assert_eq!(ranges[0].label, "Week 05/03");
        assert_eq!(ranges[1].outbound, day(2025, 3, 13));
    }

    #[test]
    fn test_custom_label_and_zero_duration() {
        let pattern = DatePattern::new(PatternKind::Custom, 10);
        let ranges = expand(&pattern, 1, day(2025, 1, 1));
        assert_eq!(ranges[0].label, "10 days 01/01");
        assert_eq!(ranges[0].nights(), 10);

        let empty = DatePattern::new(PatternKind::Custom, 0);
        assert!(expand(&empty, 12, day(2025, 1, 1)).is_empty());
    }

    #[test]
    fn test_preferred_days_filter_start() {
        // Saturdays only
        let pattern = DatePattern::new(PatternKind::TwoWeeks, 14).with_preferred_days(vec![6]);
        let ranges = expand(&pattern, 3, day(2025, 3, 5));
        assert!(!ranges.is_empty());
        assert!(ranges.iter().all(|r| r.outbound.weekday() == Weekday::Sat));
        assert_eq!(ranges[0].label, "2 weeks 08/03");
    }

    #[test]
    fn test_expansion_is_capped() {
        let pattern = DatePattern::new(PatternKind::Custom, 1);
        let ranges = expand(&pattern, 12, day(2025, 1, 1));
        assert_eq!(ranges.len(), MAX_RANGES);
    }

    #[test]
    fn test_sample_spreads_over_expansion() {
        let today = day(2025, 3, 5);
        let all = expand(&DatePattern::weekend(), SAMPLE_HORIZON_MONTHS, today);
        let picked = sample(&DatePattern::weekend(), 3, today);
        let stride = all.len() / 3;
        assert_eq!(picked.len(), 3);
        assert_eq!(picked[0], all[0]);
        assert_eq!(picked[1], all[stride]);
        assert_eq!(picked[2], all[2 * stride]);
    }

    #[test]
    fn test_short_expansion_sampled_whole() {
        // Two 200-day trips fit in the horizon
        let pattern = DatePattern::new(PatternKind::Custom, 200);
        let today = day(2025, 3, 5);
        let all = expand(&pattern, SAMPLE_HORIZON_MONTHS, today);
        assert_eq!(all.len(), 2);
        assert_eq!(sample(&pattern, 5, today), all);
        assert!(sample(&pattern, 0, today).is_empty());
    }

    #[test]
    fn test_school_holidays() {
        let holidays = school_holidays(2025);
        assert_eq!(holidays.len(), 5);
        assert_eq!(holidays[0].outbound, day(2025, 2, 10));
        assert_eq!(holidays[4].return_date, day(2026, 1, 6));
        assert!(holidays.iter().all(|r| r.return_date > r.outbound));
    }

    #[test]
    fn test_overlong_trip_stops_at_calendar_end() {
        let pattern = DatePattern::new(PatternKind::Custom, 100_000_000);
        assert!(sample(&pattern, 2, day(2025, 3, 5)).is_empty());

        let near_end = NaiveDate::MAX - Duration::days(10);
        let ranges = expand(&DatePattern::weekend(), SAMPLE_HORIZON_MONTHS, near_end);
        assert!(ranges.len() <= 2);
        assert!(ranges.iter().all(|r| r.return_date > r.outbound));
    }

    #[test]
    fn test_school_holidays_at_calendar_edges() {
        assert!(school_holidays(i32::MAX).is_empty());
        assert!(school_holidays(i32::MIN).is_empty());

        let last = school_holidays(NaiveDate::MAX.year());
        assert_eq!(last.len(), 4);
        assert!(last.iter().all(|r| r.label != "Christmas holidays"));
    }

    fn any_pattern() -> impl Strategy<Value = DatePattern> {
        let kind = prop_oneof![
            Just(PatternKind::Weekend),
            Just(PatternKind::OneWeek),
            Just(PatternKind::TwoWeeks),
            Just(PatternKind::Custom),
        ];
        let days = proptest::option::of(proptest::collection::vec(0u8..7, 0..4));
        (kind, 0u32..30, days).prop_map(|(kind, duration, preferred_days)| DatePattern {
            kind,
            duration,
            preferred_days,
            flexibility: None,
        })
    }

    proptest! {
        #[test]
        fn prop_expand_bounded_and_ordered(pattern in any_pattern(), offset in 0i64..3650) {
            let today = day(2020, 1, 1) + Duration::days(offset);
            let ranges = expand(&pattern, SAMPLE_HORIZON_MONTHS, today);
            prop_assert!(ranges.len() <= MAX_RANGES);
            for r in &ranges {
                prop_assert!(r.return_date > r.outbound);
                prop_assert!(r.outbound >= today);
                if pattern.kind == PatternKind::Weekend {
                    prop_assert_eq!(r.outbound.weekday(), Weekday::Fri);
                }
            }
            for pair in ranges.windows(2) {
                prop_assert!(pair[1].outbound > pair[0].return_date);
            }
        }

        #[test]
        fn prop_sample_is_deterministic_subset(
            pattern in any_pattern(),
            offset in 0i64..3650,
            n in 0usize..8,
        ) {
            let today = day(2020, 1, 1) + Duration::days(offset);
            let first = sample(&pattern, n, today);
            let second = sample(&pattern, n, today);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.len() <= n);

            let all = expand(&pattern, SAMPLE_HORIZON_MONTHS, today);
            prop_assert!(first.iter().all(|r| all.contains(r)));
        }
    }
}
