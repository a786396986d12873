//! Calendar primitives: year-month, wall-clock time, public holidays and the
//! working-day rule used for nominal hours.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, Weekday};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CalendarError {
    #[error("invalid month '{0}', expected YYYY-MM")]
    Month(String),

    #[error("invalid time '{0}', expected HH:MM")]
    Clock(String),
}

/// A calendar month, serialized as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    pub year: i32,
    pub month: Month,
}

impl YearMonth {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// Zero-based month index, the key of the required-hours table.
    pub fn index(&self) -> usize {
        self.month as usize - 1
    }

    pub fn days_in_month(&self) -> u8 {
        self.month.length(self.year)
    }

    pub fn first_day(&self) -> Date {
        // day 1 exists in every month of every representable year
        Date::from_calendar_date(self.year, self.month, 1).unwrap_or(Date::MIN)
    }

    pub fn last_day(&self) -> Date {
        self.first_day() + Duration::days(self.days_in_month() as i64 - 1)
    }

    pub fn day(&self, day: u8) -> Option<Date> {
        Date::from_calendar_date(self.year, self.month, day).ok()
    }

    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn days(&self) -> impl Iterator<Item = Date> {
        let first = self.first_day();
        (0..self.days_in_month() as i64).map(move |offset| first + Duration::days(offset))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}

impl FromStr for YearMonth {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || CalendarError::Month(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u8 = month.parse().map_err(|_| err())?;
        let month = Month::try_from(month).map_err(|_| err())?;
        Ok(Self::new(year, month))
    }
}

impl TryFrom<String> for YearMonth {
    type Error = CalendarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Wall-clock time of day with minute precision, serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    pub fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then(|| Self(hour as u16 * 60 + minute as u16))
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.0 % 60) as u8
    }

    /// Minutes from `self` forward to `later`, wrapping past midnight.
    pub fn minutes_until(&self, later: ClockTime) -> u16 {
        (later.0 + MINUTES_PER_DAY - self.0) % MINUTES_PER_DAY
    }

    /// `(later - self) mod 24h` in hours.
    pub fn hours_until(&self, later: ClockTime) -> f64 {
        self.minutes_until(later) as f64 / 60.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || CalendarError::Clock(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(err)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(err());
        }
        let h: u8 = h.parse().map_err(|_| err())?;
        let m: u8 = m.parse().map_err(|_| err())?;
        ClockTime::from_hm(h, m).ok_or_else(err)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = CalendarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Serde helper for optional clock times where the client sends `""` for
/// an empty field.
pub mod optional_clock {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::ClockTime;

    pub fn serialize<S: Serializer>(value: &Option<ClockTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => s.serialize_str(&t.to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ClockTime>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}

/// Easter Sunday (Gregorian, anonymous algorithm).
pub fn easter_sunday(year: i32) -> Option<Date> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    let month = Month::try_from(month as u8).ok()?;
    Date::from_calendar_date(year, month, day as u8).ok()
}

/// Public holidays observed by the operator in a given year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holidays {
    year: i32,
    dates: Vec<Date>,
}

impl Holidays {
    /// Statutory holidays: fixed dates plus the Easter-relative ones.
    pub fn for_year(year: i32) -> Self {
        let mut fixed = vec![
            (Month::January, 1),
            (Month::January, 6),
            (Month::May, 1),
            (Month::May, 3),
            (Month::August, 15),
            (Month::November, 1),
            (Month::November, 11),
            (Month::December, 25),
            (Month::December, 26),
        ];
        if year >= 2025 {
            fixed.push((Month::December, 24));
        }

        let mut dates: Vec<Date> = fixed
            .into_iter()
            .filter_map(|(m, d)| Date::from_calendar_date(year, m, d).ok())
            .collect();

        if let Some(easter) = easter_sunday(year) {
            for offset in [0, 1, 49, 60] {
                dates.push(easter + Duration::days(offset));
            }
        }

        dates.sort();
        dates.dedup();
        Self { year, dates }
    }

    pub fn from_dates(year: i32, mut dates: Vec<Date>) -> Self {
        dates.sort();
        dates.dedup();
        Self { year, dates }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    pub fn contains(&self, date: Date) -> bool {
        self.dates.binary_search(&date).is_ok()
    }

    pub fn is_working_day(&self, date: Date) -> bool {
        !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday) && !self.contains(date)
    }

    pub fn working_days(&self, month: YearMonth) -> usize {
        month.days().filter(|d| self.is_working_day(*d)).count()
    }
}
