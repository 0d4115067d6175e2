//! Distance and opening-hours evaluation for restaurant ranking.
//!
//! Both functions are pure. Time is evaluated on the UTC wall clock.

use chrono::{DateTime, Datelike, NaiveTime, Timelike, Utc, Weekday};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two points given in decimal degrees.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair outside [0, 1] for near-antipodal points.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Whether a restaurant is open at `now`.
///
/// `working_days` holds weekday names (`"Monday"` or `"Mon"`, any case).
/// The current weekday must be listed, whatever the time. The window is
/// `[start, end)`; when `end` is earlier than `start` it wraps past
/// midnight, so on a working day both the late evening and the early
/// morning count as open. Equal bounds and unparseable times mean closed.
pub fn is_open_now<D: AsRef<str>>(
    working_days: &[D],
    start: &str,
    end: &str,
    now: DateTime<Utc>,
) -> bool {
    if working_days.is_empty() {
        return false;
    }

    let (Some(start), Some(end)) = (parse_hhmm(start), parse_hhmm(end)) else {
        tracing::warn!(start, end, "Unparseable working hours; treating as closed");
        return false;
    };

    let works_on = |day: Weekday| {
        working_days
            .iter()
            .filter_map(|name| name.as_ref().trim().parse::<Weekday>().ok())
            .any(|d| d == day)
    };

    let time = NaiveTime::from_hms_opt(now.hour(), now.minute(), now.second())
        .unwrap_or(NaiveTime::MIN);

    if !works_on(now.weekday()) {
        return false;
    }
    if start < end {
        start <= time && time < end
    } else if start > end {
        time >= start || time < end
    } else {
        false
    }
}

fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}
