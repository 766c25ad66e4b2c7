use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone};

/// Next occurrence of wall-clock time `at` strictly after `now`, in `now`'s timezone
pub fn next_run_after<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();

    // Try today's execution time
    let today_execution = resolve_local(&tz, today.and_time(at));
    if *now < today_execution {
        return today_execution;
    }

    // Today's execution time has passed, schedule for tomorrow
    let tomorrow = today + Duration::days(1);
    resolve_local(&tz, tomorrow.and_time(at))
}

/// Attach `tz` to a local wall-clock time.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// spring-forward gap move to the first minute that exists.
fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    let mut candidate = local;
    for _ in 0..=MAX_GAP_MINUTES {
        if let Some(resolved) = tz.from_local_datetime(&candidate).earliest() {
            return resolved;
        }
        candidate += Duration::minutes(1);
    }
    tz.from_utc_datetime(&local)
}

const MAX_GAP_MINUTES: u32 = 180;
