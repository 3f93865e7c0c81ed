//! Property tests for the time arithmetic layer.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

use stillbell_core::clock::ClockTime;
use stillbell_core::scheduler::{normalize, random_interval};

const MINUTE_MILLIS: i64 = 60 * 1000;

/// Interval lengths that divide the hour evenly, in minutes.
fn hour_dividing_minutes() -> impl Strategy<Value = i64> {
    prop::sample::select(vec![1_i64, 2, 3, 4, 5, 6, 10, 12, 15, 20, 30, 60])
}

proptest! {
    #[test]
    fn random_interval_within_half_mean_bounds(
        mean_min in 1_i64..=24 * 60,
        seed in any::<u64>(),
    ) {
        let mean = mean_min * MINUTE_MILLIS;
        let mut rng = Mcg128Xsl64::seed_from_u64(seed);
        for _ in 0..16 {
            let value = random_interval(mean, &mut rng);
            prop_assert!(value >= mean / 2);
            prop_assert!(value <= mean * 3 / 2);
        }
    }

    #[test]
    fn normalize_is_idempotent(
        time in 0_i64..=4_000_000_000_000,
        interval_min in hour_dividing_minutes(),
        offset_min in 0_i64..60,
    ) {
        let interval = interval_min * MINUTE_MILLIS;
        let offset = offset_min * MINUTE_MILLIS;
        let once = normalize(time, interval, offset);
        prop_assert_eq!(normalize(once, interval, offset), once);
    }

    #[test]
    fn normalize_moves_at_most_half_an_interval(
        time in 0_i64..=4_000_000_000_000,
        interval_min in hour_dividing_minutes(),
    ) {
        let interval = interval_min * MINUTE_MILLIS;
        let snapped = normalize(time, interval, 0);
        prop_assert!((snapped - time).abs() <= interval / 2);
    }

    #[test]
    fn clock_time_round_trips_through_display(
        hour in 0_u32..24,
        minute in 0_u32..60,
    ) {
        let original = ClockTime::new(hour, minute).unwrap();
        let parsed = ClockTime::parse(&original.to_string()).unwrap();
        prop_assert_eq!(parsed, original);
    }

    #[test]
    fn interval_membership_is_total(
        h in 0_u32..24, m in 0_u32..60,
        sh in 0_u32..24, sm in 0_u32..60,
        eh in 0_u32..24, em in 0_u32..60,
    ) {
        // Every (time, window) combination has a defined answer, and a
        // time is inside [start, end) or inside the complementary window
        // [end, start) -- never neither, except at the shared boundaries.
        let t = ClockTime::new(h, m).unwrap();
        let start = ClockTime::new(sh, sm).unwrap();
        let end = ClockTime::new(eh, em).unwrap();
        let in_window = t.is_in_interval(&start, &end);
        let in_complement = t.is_in_interval(&end, &start);
        if !start.is_same_time(&end) && !t.is_same_time(&start) && !t.is_same_time(&end) {
            prop_assert!(in_window != in_complement);
        }
    }
}
