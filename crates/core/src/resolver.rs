use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::domain::recommendation::DatedRecommendation;

pub const DEFAULT_MIN_GAP_MINUTES: u32 = 60;

/// Latest hour a pushed post may land in. Minutes are kept as computed, so a
/// push past the ceiling compresses clustered posts onto the same late slot
/// instead of rolling into the next day.
const LATEST_HOUR: i64 = 22;

/// Spaces same-day recommendations at least `min_gap_minutes` apart. Within a
/// date, posts are walked in proposed-time order (ties keep input order) and
/// any post closer than the gap to its predecessor is pushed to predecessor
/// plus gap. `was_adjusted` is rewritten on every call.
pub fn resolve_time_conflicts(
    recommendations: Vec<DatedRecommendation>,
    min_gap_minutes: u32,
) -> Vec<DatedRecommendation> {
    let mut by_date: BTreeMap<NaiveDate, Vec<DatedRecommendation>> = BTreeMap::new();
    for rec in recommendations {
        by_date.entry(rec.date).or_default().push(rec);
    }

    let gap = i64::from(min_gap_minutes);
    let mut resolved = Vec::new();
    for (_, mut day) in by_date {
        day.sort_by_key(|rec| rec.rec.optimized_time);

        let mut last_minutes: Option<i64> = None;
        for mut rec in day {
            let proposed = rec.rec.optimized_time;
            let mut minutes = minutes_since_midnight(proposed);
            if let Some(last) = last_minutes {
                if minutes - last < gap {
                    minutes = cap_at_latest_hour(last + gap);
                }
            }

            let finalized = time_from_minutes(minutes);
            rec.was_adjusted = finalized != proposed;
            rec.rec.optimized_time = finalized;
            last_minutes = Some(minutes);
            resolved.push(rec);
        }
    }

    resolved
}

fn minutes_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

fn cap_at_latest_hour(total_minutes: i64) -> i64 {
    let hour = total_minutes / 60;
    if hour > LATEST_HOUR {
        LATEST_HOUR * 60 + total_minutes % 60
    } else {
        total_minutes
    }
}

fn time_from_minutes(total_minutes: i64) -> NaiveTime {
    let clamped = total_minutes.clamp(0, 23 * 60 + 59);
    NaiveTime::from_hms_opt((clamped / 60) as u32, (clamped % 60) as u32, 0)
        .unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recommendation::Recommendation;
    use crate::domain::timefmt;

    fn dated(id: &str, date: &str, optimized: &str) -> DatedRecommendation {
        Recommendation {
            post_id: id.to_string(),
            original_time: timefmt::parse_hh_mm("09:00").unwrap(),
            optimized_time: timefmt::parse_hh_mm(optimized).unwrap(),
            platform: "Instagram".to_string(),
            confidence: 90,
            reason: "peak window".to_string(),
        }
        .on_date(date.parse().unwrap())
    }

    fn times(recs: &[DatedRecommendation]) -> Vec<String> {
        recs.iter()
            .map(|r| timefmt::format_hh_mm(r.rec.optimized_time))
            .collect()
    }

    #[test]
    fn spaced_posts_pass_through_unadjusted() {
        let input = vec![
            dated("a", "2025-06-02", "11:00"),
            dated("b", "2025-06-02", "13:00"),
            dated("c", "2025-06-02", "19:00"),
        ];
        let resolved = resolve_time_conflicts(input, DEFAULT_MIN_GAP_MINUTES);
        assert_eq!(times(&resolved), ["11:00", "13:00", "19:00"]);
        assert!(resolved.iter().all(|r| !r.was_adjusted));
    }

    #[test]
    fn conflicting_posts_are_pushed_by_the_gap() {
        let input = vec![
            dated("a", "2025-06-02", "11:30"),
            dated("b", "2025-06-02", "11:00"),
            dated("c", "2025-06-02", "11:00"),
        ];
        let resolved = resolve_time_conflicts(input, DEFAULT_MIN_GAP_MINUTES);
        // Sorted by proposed time first: b, c, a.
        assert_eq!(
            resolved.iter().map(|r| r.rec.post_id.as_str()).collect::<Vec<_>>(),
            ["b", "c", "a"]
        );
        assert_eq!(times(&resolved), ["11:00", "12:00", "13:00"]);
        assert_eq!(
            resolved.iter().map(|r| r.was_adjusted).collect::<Vec<_>>(),
            [false, true, true]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let input = vec![
            dated("first", "2025-06-02", "10:00"),
            dated("second", "2025-06-02", "10:00"),
        ];
        let resolved = resolve_time_conflicts(input, 30);
        assert_eq!(resolved[0].rec.post_id, "first");
        assert_eq!(resolved[1].rec.post_id, "second");
        assert_eq!(times(&resolved), ["10:00", "10:30"]);
    }

    #[test]
    fn late_evening_pushes_compress_at_the_ceiling() {
        let input = vec![
            dated("a", "2025-06-02", "21:50"),
            dated("b", "2025-06-02", "21:55"),
            dated("c", "2025-06-02", "21:58"),
        ];
        let resolved = resolve_time_conflicts(input, DEFAULT_MIN_GAP_MINUTES);
        // 21:55 pushes to 22:50; the next push would pass midnight, so its
        // hour caps at 22 and both land on the same slot.
        assert_eq!(times(&resolved), ["21:50", "22:50", "22:50"]);
        assert!(resolved[1].was_adjusted);
        assert!(resolved[2].was_adjusted);
    }

    #[test]
    fn dates_are_resolved_independently_and_emitted_in_order() {
        let input = vec![
            dated("late", "2025-06-03", "09:00"),
            dated("early-b", "2025-06-02", "09:00"),
            dated("early-a", "2025-06-02", "09:00"),
        ];
        let resolved = resolve_time_conflicts(input, DEFAULT_MIN_GAP_MINUTES);
        assert_eq!(
            resolved.iter().map(|r| r.rec.post_id.as_str()).collect::<Vec<_>>(),
            ["early-b", "early-a", "late"]
        );
        // The lone post on June 3rd never conflicts with June 2nd.
        assert_eq!(times(&resolved), ["09:00", "10:00", "09:00"]);
        assert!(!resolved[2].was_adjusted);
    }

    #[test]
    fn custom_gap_is_honored() {
        let input = vec![
            dated("a", "2025-06-02", "09:00"),
            dated("b", "2025-06-02", "09:10"),
        ];
        let resolved = resolve_time_conflicts(input, 15);
        assert_eq!(times(&resolved), ["09:00", "09:15"]);
    }

    #[test]
    fn resolution_is_deterministic() {
        let input = vec![
            dated("a", "2025-06-02", "11:00"),
            dated("b", "2025-06-02", "11:00"),
            dated("c", "2025-06-03", "21:55"),
            dated("d", "2025-06-03", "21:50"),
        ];
        let first = resolve_time_conflicts(input.clone(), DEFAULT_MIN_GAP_MINUTES);
        let second = resolve_time_conflicts(input, DEFAULT_MIN_GAP_MINUTES);
        assert_eq!(first, second);
    }
}
