//! Shift-code vocabulary: fixed crew shifts, on-call duty, the absence marker
//! and free-text custom hour ranges.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::calendar::ClockTime;
use super::round2;

/// Hours credited per assigned fixed or custom shift in the monthly grid.
pub const GRID_SHIFT_HOURS: f64 = 8.0;

pub const ABSENCE_CODE: &str = "NU";

static HOUR_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{1,2})(?::(\d{2}))?\s*-\s*(\d{1,2})(?::(\d{2}))?\s*$")
        .expect("hour range pattern is valid")
});

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ShiftCodeError {
    #[error("shift code is empty")]
    Empty,

    #[error("unrecognised shift code '{0}'")]
    Unrecognised(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedShift {
    Morning,
    Afternoon,
    Night,
}

impl FixedShift {
    pub const ALL: [FixedShift; 3] = [FixedShift::Morning, FixedShift::Afternoon, FixedShift::Night];

    pub fn code(&self) -> &'static str {
        match self {
            FixedShift::Morning => "6-14",
            FixedShift::Afternoon => "14-22",
            FixedShift::Night => "22-6",
        }
    }

    pub fn start_hour(&self) -> u8 {
        match self {
            FixedShift::Morning => 6,
            FixedShift::Afternoon => 14,
            FixedShift::Night => 22,
        }
    }

    pub fn end_hour(&self) -> u8 {
        match self {
            FixedShift::Morning => 14,
            FixedShift::Afternoon => 22,
            FixedShift::Night => 6,
        }
    }

    pub fn duration_hours(&self) -> f64 {
        8.0
    }

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

/// On-call duty. Each duty code covers the same hours as one fixed shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DutyShift {
    D1,
    D2,
    D3,
}

impl DutyShift {
    pub fn code(&self) -> &'static str {
        match self {
            DutyShift::D1 => "D1",
            DutyShift::D2 => "D2",
            DutyShift::D3 => "D3",
        }
    }

    pub fn covers(&self) -> FixedShift {
        match self {
            DutyShift::D1 => FixedShift::Morning,
            DutyShift::D2 => FixedShift::Afternoon,
            DutyShift::D3 => FixedShift::Night,
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "D1" => Some(DutyShift::D1),
            "D2" => Some(DutyShift::D2),
            "D3" => Some(DutyShift::D3),
            _ => None,
        }
    }
}

/// A resolved time block: start, end and length in hours (wrapping midnight).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduledTime {
    pub from: ClockTime,
    pub to: ClockTime,
    pub total: f64,
}

impl ScheduledTime {
    pub fn new(from: ClockTime, to: ClockTime) -> Self {
        Self {
            from,
            to,
            total: round2(from.hours_until(to)),
        }
    }
}

/// Free-text hour range entered by a dispatcher. Always rendered as
/// `HH:MM-HH:MM` so it never reads back as a fixed code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomShift {
    pub from: ClockTime,
    pub to: ClockTime,
}

impl CustomShift {
    pub fn time(&self) -> ScheduledTime {
        ScheduledTime::new(self.from, self.to)
    }
}

impl fmt::Display for CustomShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ShiftCode {
    Fixed(FixedShift),
    Duty(DutyShift),
    Absence,
    Custom(CustomShift),
}

impl ShiftCode {
    /// Parses a custom hour range (`H-H` or `HH:MM-HH:MM`).
    pub fn custom(text: &str) -> Result<Self, ShiftCodeError> {
        let (from, to) = parse_hour_range(text)
            .ok_or_else(|| ShiftCodeError::Unrecognised(text.trim().to_string()))?;
        Ok(ShiftCode::Custom(CustomShift { from, to }))
    }

    pub fn is_duty(&self) -> bool {
        matches!(self, ShiftCode::Duty(_))
    }

    pub fn is_absence(&self) -> bool {
        matches!(self, ShiftCode::Absence)
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ShiftCode::Custom(_))
    }

    /// Contribution to the monthly grid total. Duty is standby, not work.
    pub fn assigned_hours(&self) -> f64 {
        match self {
            ShiftCode::Fixed(_) | ShiftCode::Custom(_) => GRID_SHIFT_HOURS,
            ShiftCode::Duty(_) | ShiftCode::Absence => 0.0,
        }
    }

    /// Planned time for the work card. Duty and absence have none.
    pub fn scheduled_time(&self, has_disability_certificate: bool) -> Option<ScheduledTime> {
        match self {
            ShiftCode::Fixed(fixed) => {
                parse_shift(&adjust_shift_for_disability(fixed.code(), has_disability_certificate))
            }
            ShiftCode::Custom(custom) => Some(custom.time()),
            ShiftCode::Duty(_) | ShiftCode::Absence => None,
        }
    }
}

impl fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftCode::Fixed(s) => f.write_str(s.code()),
            ShiftCode::Duty(d) => f.write_str(d.code()),
            ShiftCode::Absence => f.write_str(ABSENCE_CODE),
            ShiftCode::Custom(c) => c.fmt(f),
        }
    }
}

impl FromStr for ShiftCode {
    type Err = ShiftCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.is_empty() {
            return Err(ShiftCodeError::Empty);
        }
        if code.eq_ignore_ascii_case(ABSENCE_CODE) {
            return Ok(ShiftCode::Absence);
        }
        if let Some(duty) = DutyShift::from_code(&code.to_ascii_uppercase()) {
            return Ok(ShiftCode::Duty(duty));
        }
        if let Some(fixed) = FixedShift::from_code(code) {
            return Ok(ShiftCode::Fixed(fixed));
        }
        ShiftCode::custom(code)
    }
}

impl TryFrom<String> for ShiftCode {
    type Error = ShiftCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShiftCode> for String {
    fn from(value: ShiftCode) -> Self {
        value.to_string()
    }
}

fn parse_hour_range(text: &str) -> Option<(ClockTime, ClockTime)> {
    let caps = HOUR_RANGE.captures(text)?;
    let part = |h: usize, m: usize| -> Option<ClockTime> {
        let hour: u8 = caps.get(h)?.as_str().parse().ok()?;
        let minute: u8 = match caps.get(m) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        ClockTime::from_hm(hour, minute)
    };
    Some((part(1, 2)?, part(3, 4)?))
}

/// Resolves an hour-range string such as `"22-6"` into a time block.
pub fn parse_shift(text: &str) -> Option<ScheduledTime> {
    parse_hour_range(text).map(|(from, to)| ScheduledTime::new(from, to))
}

/// Moves the end of a fixed shift one hour earlier for employees holding a
/// disability certificate. Other codes pass through unchanged.
pub fn adjust_shift_for_disability(code: &str, has_disability_certificate: bool) -> String {
    if !has_disability_certificate {
        return code.to_string();
    }
    match FixedShift::from_code(code.trim()) {
        Some(fixed) => format!("{}-{}", fixed.start_hour(), (fixed.end_hour() + 23) % 24),
        None => code.to_string(),
    }
}
