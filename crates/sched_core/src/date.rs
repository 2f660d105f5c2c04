use crate::error::AppError;
use time::{Date, Month, OffsetDateTime, UtcOffset, Weekday};

/// Parse a `YYYY-MM-DD` deadline into a calendar date.
///
/// The string is split on `-` and the date is built from its components,
/// so the result is always the literal calendar day. Routing the string
/// through a timestamp parser would interpret it as UTC midnight and
/// shift it off by one day in western timezones.
pub fn parse_local_date(value: &str) -> Result<Date, AppError> {
    let trimmed = value.trim();
    let mut parts = trimmed.splitn(3, '-');
    let year = parts.next().unwrap_or_default();
    let month = parts.next().unwrap_or_default();
    let day = parts.next().unwrap_or_default();

    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return Err(AppError::invalid_input("deadline must be YYYY-MM-DD"));
    }

    let year: i32 = year
        .parse()
        .map_err(|_| AppError::invalid_input("deadline must be YYYY-MM-DD"))?;
    let month: u8 = month
        .parse()
        .map_err(|_| AppError::invalid_input("deadline must be YYYY-MM-DD"))?;
    let day: u8 = day
        .parse()
        .map_err(|_| AppError::invalid_input("deadline must be YYYY-MM-DD"))?;

    let month = Month::try_from(month)
        .map_err(|_| AppError::invalid_input("deadline month out of range"))?;
    Date::from_calendar_date(year, month, day)
        .map_err(|_| AppError::invalid_input("deadline day out of range"))
}

/// `2025-03-04 (화)` style label for deadline group headers.
pub fn date_label(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02} ({})",
        date.year(),
        u8::from(date.month()),
        date.day(),
        weekday_label(date.weekday())
    )
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "월",
        Weekday::Tuesday => "화",
        Weekday::Wednesday => "수",
        Weekday::Thursday => "목",
        Weekday::Friday => "금",
        Weekday::Saturday => "토",
        Weekday::Sunday => "일",
    }
}

/// Calendar-day difference `later - earlier`, ignoring time of day.
pub fn days_between(earlier: Date, later: Date) -> i64 {
    i64::from(later.to_julian_day()) - i64::from(earlier.to_julian_day())
}

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(local_offset())
}
