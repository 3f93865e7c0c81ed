//! Pure time arithmetic for the next trigger instant.
//!
//! Everything here is a synchronous function over epoch-millisecond
//! instants: gaussian-jittered intervals, minute-grid normalization, and
//! snapping night-time targets to the next active day start. The
//! randomization source is injected by the caller so tests can use a
//! seeded generator.

use chrono::{DateTime, Datelike, Duration, Local, LocalResult, NaiveDate};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::clock::{ClockTime, WeekdaySet};
use crate::config::BellConfig;
use crate::error::{ConfigError, CoreError, Result};

const HOUR_MILLIS: i64 = 60 * 60 * 1000;

/// Compute the next trigger instant after `now_millis`.
///
/// The mean interval is jittered if randomization is on, snapped to the
/// configured minute grid if normalization is on, and finally moved to the
/// next active day start if the raw target lands outside the day window.
/// When snapping to a day start the already-drawn jitter is re-applied
/// relative to the mean (instead of being discarded) and the grid offset is
/// added back so the first ring of the day lands on the configured minute.
pub fn next_target_millis<R: Rng>(
    now_millis: i64,
    config: &BellConfig,
    rng: &mut R,
) -> Result<i64> {
    let mean = config.interval_millis();
    let randomized = if config.randomize {
        random_interval(mean, rng)
    } else {
        mean
    };

    let mut target = now_millis + randomized;
    if let Some(offset) = config.normalize_offset_millis() {
        target = normalize(target, mean, offset);
    }

    let target_time = ClockTime::from_millis(target)?;
    if !config.is_daytime(&target_time) {
        let mut snapped =
            next_daytime_start_millis(target, &config.day_start, &config.active_weekdays)?;
        if config.randomize {
            snapped += randomized - mean / 2;
        }
        if let Some(offset) = config.normalize_offset_millis() {
            snapped += offset;
        }
        target = snapped;
    }

    Ok(target)
}

/// Draw a jittered interval: `mean * (1 + 0.3 * gaussian)`, clamped to
/// `[mean/2, 3*mean/2]`. Bell-shaped around the mean, never more than
/// +/-50% away from it.
pub fn random_interval<R: Rng>(mean_millis: i64, rng: &mut R) -> i64 {
    let gaussian: f64 = rng.sample(StandardNormal);
    let value = (mean_millis as f64 * (1.0 + 0.3 * gaussian)) as i64;
    value.clamp(mean_millis / 2, mean_millis.saturating_mul(3) / 2)
}

/// Snap `time_millis` to the nearest multiple of `interval_millis`
/// measured from the top of the containing hour plus `offset_millis`,
/// rounding half up. Idempotent for intervals that divide the hour.
pub fn normalize(time_millis: i64, interval_millis: i64, offset_millis: i64) -> i64 {
    let hour = time_millis - time_millis.rem_euclid(HOUR_MILLIS);
    let rest = time_millis - hour;
    // round-half-up of (rest - offset) / interval, in integers
    let steps = (2 * (rest - offset_millis) + interval_millis).div_euclid(2 * interval_millis);
    hour + steps * interval_millis + offset_millis
}

/// Next instant at `day_start`'s hour:minute strictly after `reference`,
/// advanced day by day until the weekday is active.
///
/// Fails with [`ConfigError::NoActiveWeekdays`] on an empty set, which
/// would otherwise loop forever.
pub fn next_daytime_start_millis(
    reference_millis: i64,
    day_start: &ClockTime,
    active: &WeekdaySet,
) -> Result<i64> {
    if active.is_empty() {
        return Err(ConfigError::NoActiveWeekdays.into());
    }
    let mut candidate = next_occurrence(reference_millis, day_start)?;
    while !active.contains(&weekday_number(&candidate)) {
        candidate = advance_one_day(&candidate, day_start)?;
    }
    Ok(candidate.timestamp_millis())
}

/// Next occurrence of `time`'s hour:minute strictly after `reference`, as
/// epoch milliseconds. Weekday activation is ignored.
pub fn next_occurrence_millis(reference_millis: i64, time: &ClockTime) -> Result<i64> {
    Ok(next_occurrence(reference_millis, time)?.timestamp_millis())
}

/// The next potential day/night boundary after `reference`: whichever of
/// the window's start or end comes first. Weekday activation is ignored;
/// callers use this to know when the day/night state may flip regardless
/// of whether a ring is scheduled there.
pub fn next_day_night_change_millis(reference_millis: i64, config: &BellConfig) -> Result<i64> {
    let start = next_occurrence_millis(reference_millis, &config.day_start)?;
    let end = next_occurrence_millis(reference_millis, &config.day_end)?;
    Ok(start.min(end))
}

fn next_occurrence(reference_millis: i64, time: &ClockTime) -> Result<DateTime<Local>> {
    let reference = local_datetime(reference_millis)?;
    let candidate = at_clock_time(reference.date_naive(), time)?;
    if candidate.timestamp_millis() <= reference_millis {
        advance_one_day(&candidate, time)
    } else {
        Ok(candidate)
    }
}

fn local_datetime(millis: i64) -> Result<DateTime<Local>> {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&Local))
        .ok_or_else(|| CoreError::InvalidArgument(format!("timestamp out of range: {millis}")))
}

/// Resolve a local calendar date + clock time to an instant. Ambiguous
/// times (DST fall-back) take the first occurrence; nonexistent times
/// (DST spring-forward) shift one hour later.
fn at_clock_time(date: NaiveDate, time: &ClockTime) -> Result<DateTime<Local>> {
    let naive = date
        .and_hms_opt(time.hour(), time.minute(), 0)
        .ok_or_else(|| CoreError::InvalidArgument(format!("invalid local time: {time}")))?;
    match naive.and_local_timezone(Local) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(first, _) => Ok(first),
        LocalResult::None => (naive + Duration::hours(1))
            .and_local_timezone(Local)
            .earliest()
            .ok_or_else(|| {
                CoreError::InvalidArgument(format!("unresolvable local time: {time}"))
            }),
    }
}

fn advance_one_day(dt: &DateTime<Local>, time: &ClockTime) -> Result<DateTime<Local>> {
    let next_date = dt
        .date_naive()
        .succ_opt()
        .ok_or_else(|| CoreError::InvalidArgument("date out of range".into()))?;
    at_clock_time(next_date, time)
}

fn weekday_number(dt: &DateTime<Local>) -> u8 {
    dt.weekday().num_days_from_sunday() as u8 + 1
}
