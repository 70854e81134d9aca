/// Calendar helpers for date cells
///
/// Dates are held as days since the Unix epoch (1970-01-01) and datetimes as
/// milliseconds since the epoch. Parsing accepts ISO 8601 dates
/// (`YYYY-MM-DD`) and datetimes (`YYYY-MM-DDTHH:MM[:SS[.fff]][Z]`, with `T` or
/// a space as separator). Anything else parses to `None`; callers treat that
/// as an incomparable value rather than an error.

pub const MS_PER_DAY: i64 = 86_400_000;

/// Largest year magnitude accepted when parsing. Matches the range of an
/// ECMAScript `Date`; every date inside it fits an `i32` day count.
pub const MAX_YEAR: i32 = 275_760;

/// Convert days since Unix epoch (1970-01-01) to (year, month, day).
///
/// Total over every `i64` day count a datetime can produce.
pub fn ymd_from_days(days: i64) -> (i64, u32, u32) {
    // https://howardhinnant.github.io/date_algorithms.html
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if m <= 2 { y + 1 } else { y };
    (year, m, d)
}

/// Convert (year, month, day) to days since Unix epoch.
///
/// Returns `None` for an invalid calendar date or a year outside
/// `[-MAX_YEAR, MAX_YEAR]`.
pub fn days_from_ymd(year: i32, month: u32, day: u32) -> Option<i32> {
    if year.unsigned_abs() > MAX_YEAR as u32
        || !(1..=12).contains(&month)
        || day < 1
        || day > days_in_month(year, month)
    {
        return None;
    }

    let y = if month <= 2 { year as i64 - 1 } else { year as i64 };
    let era = y.div_euclid(400);
    let yoe = y.rem_euclid(400) as u32;
    let doy = (153 * (if month > 2 { month - 3 } else { month + 9 }) + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    i32::try_from(era * 146_097 + doe as i64 - 719_468).ok()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
            if leap { 29 } else { 28 }
        }
    }
}

fn format_ymd(year: i64, month: u32, day: u32) -> String {
    if year < 0 {
        format!("-{:04}-{:02}-{:02}", -year, month, day)
    } else {
        format!("{:04}-{:02}-{:02}", year, month, day)
    }
}

/// Format a date (days since epoch) as `YYYY-MM-DD`
pub fn format_date(days: i32) -> String {
    let (year, month, day) = ymd_from_days(days as i64);
    format_ymd(year, month, day)
}

/// Format a datetime (milliseconds since epoch) as `YYYY-MM-DDTHH:MM:SS[.mmm]`
pub fn format_datetime(ms: i64) -> String {
    let days = ms.div_euclid(MS_PER_DAY);
    let time_ms = ms.rem_euclid(MS_PER_DAY) as u32;

    let (year, month, day) = ymd_from_days(days);
    let hour = time_ms / 3_600_000;
    let minute = (time_ms % 3_600_000) / 60_000;
    let second = (time_ms % 60_000) / 1000;
    let millisecond = time_ms % 1000;

    let date = format_ymd(year, month, day);
    if millisecond > 0 {
        format!(
            "{}T{:02}:{:02}:{:02}.{:03}",
            date, hour, minute, second, millisecond
        )
    } else {
        format!("{}T{:02}:{:02}:{:02}", date, hour, minute, second)
    }
}

/// Parse `YYYY-MM-DD` to days since epoch
pub fn parse_date(s: &str) -> Option<i32> {
    let mut parts = s.trim().splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    days_from_ymd(year, month, day)
}

/// Parse an ISO 8601 date or datetime to milliseconds since epoch.
/// A bare date is read as midnight UTC.
pub fn parse_datetime(s: &str) -> Option<i64> {
    let s = s.trim();
    let (date_part, time_part) = match s.split_once('T').or_else(|| s.split_once(' ')) {
        Some(split) => split,
        None => return parse_date(s).map(|d| (d as i64) * MS_PER_DAY),
    };

    let days = parse_date(date_part)?;

    let time_part = time_part.trim_end_matches('Z');
    let (time_str, ms) = match time_part.split_once('.') {
        Some((hms, frac)) => {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            // ".1" -> 100, ".12" -> 120, ".123456" -> 123
            let padded = format!("{:0<3}", frac);
            let ms: u32 = padded[..3].parse().ok()?;
            (hms, ms)
        }
        None => (time_part, 0),
    };

    let mut hms = time_str.split(':');
    let hour: u32 = hms.next()?.parse().ok()?;
    let minute: u32 = hms.next()?.parse().ok()?;
    let second: u32 = match hms.next() {
        Some(sec) => sec.parse().ok()?,
        None => 0,
    };
    if hms.next().is_some() || hour > 23 || minute > 59 || second > 59 {
        return None;
    }

    let time_ms = (hour as i64) * 3_600_000
        + (minute as i64) * 60_000
        + (second as i64) * 1000
        + (ms as i64);

    Some((days as i64) * MS_PER_DAY + time_ms)
}
