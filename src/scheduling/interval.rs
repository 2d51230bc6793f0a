//! Half-open time intervals on a calendar day or a recurring weekday.
//!
//! Three booking shapes feed into [`Interval`]:
//!
//! - absolute start/end timestamps (classroom schedules)
//! - a date plus `"HH:MM"` bounds (exams)
//! - a composite `"Monday 09:00 AM - 10:00 AM"` slot (timetable entries)
//!
//! All of them are decomposed here, on ingress, and compared only in structured form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("Invalid time format '{0}'. Use HH:MM")]
    InvalidTime(String),

    #[error("Invalid time slot '{0}'. Use e.g. 'Monday 09:00 AM - 10:00 AM'")]
    InvalidTimeSlot(String),

    #[error("Invalid weekday '{0}'")]
    InvalidWeekday(String),

    #[error("End time must be after start time")]
    EmptyRange,
}

/// The axis an interval lives on. Dated bookings never collide with weekday ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayKey {
    Date(NaiveDate),
    Weekday(Weekday),
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayKey::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DayKey::Weekday(day) => f.write_str(weekday_name(*day)),
        }
    }
}

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Bounds are minutes from midnight of `day`. A dated interval built from
/// timestamps may run past midnight (`end > 1440`); weekday intervals never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    day: DayKey,
    start: i64,
    end: i64,
}

impl Interval {
    pub fn new(day: DayKey, start: NaiveTime, end: NaiveTime) -> Result<Self, IntervalError> {
        let (start, end) = (minute_of_day(start), minute_of_day(end));
        if start >= end {
            return Err(IntervalError::EmptyRange);
        }
        Ok(Self { day, start, end })
    }

    /// Builds an interval from two strict 24-hour `"HH:MM"` strings.
    pub fn parse(day: DayKey, start: &str, end: &str) -> Result<Self, IntervalError> {
        Self::new(day, parse_hhmm(start)?, parse_hhmm(end)?)
    }

    /// Builds a dated interval from absolute timestamps, keyed on the UTC start date.
    /// Seconds are dropped; the range may cross midnight.
    pub fn from_timestamps(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, IntervalError> {
        let length = end.timestamp().div_euclid(60) - start.timestamp().div_euclid(60);
        if length <= 0 {
            return Err(IntervalError::EmptyRange);
        }
        let from = minute_of_day(start.time());
        Ok(Self {
            day: DayKey::Date(start.date_naive()),
            start: from,
            end: from + length,
        })
    }

    /// The whole calendar day, for picking out bookings that touch it.
    pub fn whole_day(date: NaiveDate) -> Self {
        Self {
            day: DayKey::Date(date),
            start: 0,
            end: MINUTES_PER_DAY,
        }
    }

    pub fn day(&self) -> DayKey {
        self.day
    }

    /// Wall-clock start time.
    pub fn start(&self) -> NaiveTime {
        clock(self.start)
    }

    /// Wall-clock end time; `00:00` for a range ending at midnight.
    pub fn end(&self) -> NaiveTime {
        clock(self.end)
    }

    pub fn duration_minutes(&self) -> i64 {
        self.end - self.start
    }

    /// Half-open overlap. Touching intervals (`a.end == b.start`) do not overlap.
    ///
    /// Dated intervals compare on one continuous timeline, so a booking that
    /// runs past midnight still collides with one early the next day. Weekday
    /// intervals compare within their weekday. A dated and a weekday interval
    /// never overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        match (self.day, other.day) {
            (DayKey::Date(_), DayKey::Date(_)) => {
                let (a_start, a_end) = self.timeline();
                let (b_start, b_end) = other.timeline();
                a_start < b_end && b_start < a_end
            }
            (DayKey::Weekday(a), DayKey::Weekday(b)) => {
                a == b && self.start < other.end && other.start < self.end
            }
            _ => false,
        }
    }

    fn timeline(&self) -> (i64, i64) {
        let origin = match self.day {
            DayKey::Date(date) => i64::from(date.num_days_from_ce()) * MINUTES_PER_DAY,
            DayKey::Weekday(_) => 0,
        };
        (origin + self.start, origin + self.end)
    }
}

fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour() * 60 + time.minute())
}

fn clock(minutes: i64) -> NaiveTime {
    let minutes = minutes.rem_euclid(MINUTES_PER_DAY);
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0).unwrap_or_default()
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.day, format_hhmm(self.start()), format_hhmm(self.end()))
    }
}

/// Parses `"HH:MM"` with a two-digit hour 00-23 and minute 00-59.
pub fn parse_hhmm(raw: &str) -> Result<NaiveTime, IntervalError> {
    let invalid = || IntervalError::InvalidTime(raw.to_string());

    let bytes = raw.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(invalid());
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    let hour = u32::from(digits[0] - b'0') * 10 + u32::from(digits[1] - b'0');
    let minute = u32::from(digits[2] - b'0') * 10 + u32::from(digits[3] - b'0');
    if hour > 23 || minute > 59 {
        return Err(invalid());
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn parse_weekday(raw: &str) -> Result<Weekday, IntervalError> {
    Weekday::from_str(raw.trim()).map_err(|_| IntervalError::InvalidWeekday(raw.to_string()))
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// A recurring weekly slot, written `"Monday 09:00 AM - 10:00 AM"` at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
    interval: Interval,
}

impl TimeSlot {
    pub fn new(day: Weekday, start: NaiveTime, end: NaiveTime) -> Result<Self, IntervalError> {
        Ok(Self {
            interval: Interval::new(DayKey::Weekday(day), start, end)?,
        })
    }

    pub fn weekday(&self) -> Weekday {
        match self.interval.day() {
            DayKey::Weekday(day) => day,
            // constructors only ever build weekday-keyed slots
            DayKey::Date(date) => date.weekday(),
        }
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }
}

impl FromStr for TimeSlot {
    type Err = IntervalError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || IntervalError::InvalidTimeSlot(raw.to_string());

        let (day, range) = raw.trim().split_once(char::is_whitespace).ok_or_else(invalid)?;
        let (start, end) = range.split_once('-').ok_or_else(invalid)?;

        let day = parse_weekday(day)?;
        let start = parse_clock_12h(start).ok_or_else(invalid)?;
        let end = parse_clock_12h(end).ok_or_else(invalid)?;

        TimeSlot::new(day, start, end)
    }
}

fn parse_clock_12h(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%I:%M %p")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%I:%M%p"))
        .ok()
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {}",
            weekday_name(self.weekday()),
            self.interval.start().format("%I:%M %p"),
            self.interval.end().format("%I:%M %p"),
        )
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = IntervalError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(raw: &str) -> NaiveTime {
        parse_hhmm(raw).unwrap()
    }

    #[test]
    fn strict_hhmm_rejects_loose_forms() {
        assert!(parse_hhmm("09:00").is_ok());
        assert!(parse_hhmm("23:59").is_ok());
        assert!(parse_hhmm("9:00").is_err());
        assert!(parse_hhmm("24:00").is_err());
        assert!(parse_hhmm("12:60").is_err());
        assert!(parse_hhmm("12-30").is_err());
        assert!(parse_hhmm("ab:cd").is_err());
    }

    #[test]
    fn time_slot_display_is_stable() {
        let slot: TimeSlot = "monday 9:00 AM - 10:30 AM".parse().unwrap();
        assert_eq!(slot.to_string(), "Monday 09:00 AM - 10:30 AM");
        assert_eq!(slot.interval().start(), t("09:00"));
        assert_eq!(slot.interval().end(), t("10:30"));
    }

    #[test]
    fn time_slot_afternoon_is_24h_internally() {
        let slot: TimeSlot = "Friday 01:00 PM - 02:00 PM".parse().unwrap();
        assert_eq!(slot.interval().start(), t("13:00"));
        assert_eq!(slot.weekday(), Weekday::Fri);
    }

    #[test]
    fn overlap_is_half_open_and_keyed_by_day() {
        let monday = DayKey::Weekday(Weekday::Mon);
        let a = Interval::parse(monday, "09:00", "10:00").unwrap();
        let touching = Interval::parse(monday, "10:00", "11:00").unwrap();
        let inside = Interval::parse(monday, "09:15", "09:45").unwrap();
        let tuesday = Interval::parse(DayKey::Weekday(Weekday::Tue), "09:00", "10:00").unwrap();

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside) && inside.overlaps(&a));
        assert!(!a.overlaps(&tuesday));
    }

    #[test]
    fn empty_ranges_are_rejected() {
        let day = DayKey::Date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(Interval::parse(day, "10:00", "10:00"), Err(IntervalError::EmptyRange));
        assert_eq!(Interval::parse(day, "11:00", "10:00"), Err(IntervalError::EmptyRange));

        let start: DateTime<Utc> = "2024-05-01T10:00:30Z".parse().unwrap();
        let end: DateTime<Utc> = "2024-05-01T10:00:50Z".parse().unwrap();
        assert_eq!(Interval::from_timestamps(start, end), Err(IntervalError::EmptyRange));
    }

    fn ts(raw: &str) -> DateTime<Utc> {
        raw.parse().unwrap()
    }

    #[test]
    fn timestamps_may_run_past_midnight() {
        let to_midnight = Interval::from_timestamps(ts("2024-05-01T23:00:00Z"), ts("2024-05-02T00:00:00Z")).unwrap();
        assert_eq!(to_midnight.duration_minutes(), 60);
        assert_eq!(to_midnight.end(), t("00:00"));

        let overnight = Interval::from_timestamps(ts("2024-05-01T23:00:00Z"), ts("2024-05-02T01:00:00Z")).unwrap();
        let next_morning = Interval::from_timestamps(ts("2024-05-02T00:30:00Z"), ts("2024-05-02T01:30:00Z")).unwrap();
        let after = Interval::from_timestamps(ts("2024-05-02T01:00:00Z"), ts("2024-05-02T02:00:00Z")).unwrap();
        assert!(overnight.overlaps(&next_morning) && next_morning.overlaps(&overnight));
        assert!(!overnight.overlaps(&after));
        assert!(!to_midnight.overlaps(&after));
    }

    #[test]
    fn offsets_are_compared_as_instants() {
        let local: DateTime<Utc> = chrono::DateTime::parse_from_rfc3339("2024-05-01T05:00:00+05:30")
            .unwrap()
            .with_timezone(&Utc);
        let local_end = local + chrono::TimeDelta::hours(1);
        let class = Interval::from_timestamps(local, local_end).unwrap();
        assert_eq!(class.day(), DayKey::Date(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()));

        let same_instant = Interval::from_timestamps(ts("2024-04-30T23:45:00Z"), ts("2024-05-01T00:15:00Z")).unwrap();
        assert!(class.overlaps(&same_instant));
    }

    #[test]
    fn timestamps_are_truncated_to_the_minute() {
        let start: DateTime<Utc> = "2024-05-01T09:00:59Z".parse().unwrap();
        let end: DateTime<Utc> = "2024-05-01T10:00:00Z".parse().unwrap();
        let interval = Interval::from_timestamps(start, end).unwrap();
        assert_eq!(interval.start(), t("09:00"));
        assert_eq!(interval.duration_minutes(), 60);
    }
}
