//! Property-based tests for tweetpack.
//!
//! These tests generate random inputs to find edge cases.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use tweetpack::Record;
use tweetpack::config::TimeZoneSetting;
use tweetpack::core::{DayKey, DedupTracker, Index, escape_markdown, newest_first, partition, render_index};

const MODERN: &str = "%a %b %d %H:%M:%S %z %Y";

/// Characters that matter to the escaper, mixed with plain text.
fn arb_body() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "a", "Z", " ", "*", "-", "[", "]", "\n", "\\", "#", "é", "🎉",
        ]),
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

fn arb_time() -> impl Strategy<Value = DateTime<Utc>> {
    // 2010-01-01 .. roughly 2025
    (0i64..(15 * 365 * 24 * 3600)).prop_map(|secs| {
        Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    })
}

fn arb_records(max_len: usize) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec((0u64..50, arb_time()), 0..max_len).prop_map(|items| {
        items
            .into_iter()
            .map(|(id, ts)| Record::new(id.to_string(), "x", ts.format(MODERN).to_string()))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================
    // ESCAPING
    // ============================================

    /// Every special character gains exactly one backslash and every newline
    /// becomes a hard break.
    #[test]
    fn escape_transforms_each_char_once(body in arb_body()) {
        let escaped = escape_markdown(&body);
        let specials = body.chars().filter(|c| matches!(c, '*' | '-' | '[' | ']')).count();
        let newlines = body.matches('\n').count();
        prop_assert_eq!(escaped.chars().count(), body.chars().count() + specials + 2 * newlines);
        prop_assert_eq!(escaped.matches('\n').count(), newlines);
    }

    // ============================================
    // DEDUP
    // ============================================

    /// Admitting the same batch twice admits nothing the second time.
    #[test]
    fn dedup_is_idempotent(records in arb_records(30)) {
        let mut tracker = DedupTracker::new();
        let (first, _) = tracker.admit(records.clone());
        let (second, skipped) = tracker.admit(records.clone());
        prop_assert!(second.is_empty());
        prop_assert_eq!(skipped, records.len());

        let mut ids: Vec<&str> = first.iter().map(Record::id_str).collect();
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), before);
    }

    // ============================================
    // PARTITIONING
    // ============================================

    /// Every record lands in the bucket of its own local day, and sorted
    /// buckets are non-increasing in time.
    #[test]
    fn partition_buckets_are_consistent(records in arb_records(40)) {
        let total = records.len();
        let buckets = partition(records, MODERN, TimeZoneSetting::utc()).unwrap();
        prop_assert_eq!(buckets.values().map(Vec::len).sum::<usize>(), total);

        for (key, mut day) in buckets {
            newest_first(&mut day);
            for dated in &day {
                prop_assert_eq!(&DayKey::from_datetime(&dated.local_time), &key);
            }
            for pair in day.windows(2) {
                prop_assert!(pair[0].local_time >= pair[1].local_time);
            }
        }
    }

    // ============================================
    // INDEX
    // ============================================

    /// Rendered years and months are descending, days ascending.
    #[test]
    fn index_render_ordering(times in prop::collection::vec(arb_time(), 1..30)) {
        let mut index = Index::new();
        for ts in &times {
            index.insert(&DayKey::from_datetime(ts));
        }
        let rendered = render_index(&index, ".");

        let years: Vec<&str> = rendered
            .lines()
            .filter_map(|l| l.strip_prefix("### "))
            .collect();
        prop_assert!(years.windows(2).all(|w| w[0] > w[1]));

        let mut month_lines = 0;
        let mut last_month: Option<String> = None;
        for line in rendered.lines() {
            if line.starts_with("### ") {
                last_month = None;
                continue;
            }
            let Some(rest) = line.strip_prefix("* ") else { continue };
            month_lines += 1;
            let (month, links) = rest.split_once(" |").unwrap();
            if let Some(prev) = &last_month {
                prop_assert!(prev.as_str() > month);
            }
            last_month = Some(month.to_string());

            let days: Vec<&str> = links
                .split(" [")
                .skip(1)
                .map(|l| &l[..2])
                .collect();
            prop_assert!(!days.is_empty());
            prop_assert!(days.windows(2).all(|w| w[0] < w[1]));
        }
        prop_assert!(month_lines > 0);
        prop_assert_eq!(rendered.matches(".md)").count(), index.len());
    }
}
