//! Planned vs. actual reconciliation of a work card: monthly totals, night
//! hours, duty hours and overtime/idle classification.

use std::fmt;

use serde::{Serialize, Serializer};

use super::calendar::{ClockTime, MINUTES_PER_DAY};
use super::work_card::{actual_hours, DayRow, WorkCard};
use super::{fmt_hours, round2};

const NIGHT_STEP_MINUTES: u32 = 15;
const NIGHT_START_HOUR: u32 = 22;
const NIGHT_END_HOUR: u32 = 6;

/// Night-time hours inside an actual interval, sampled in 15-minute steps.
/// The interval wraps past midnight when `to <= from`.
pub fn night_hours(from: ClockTime, to: ClockTime) -> f64 {
    let start = from.minutes() as u32;
    let mut end = to.minutes() as u32;
    if end <= start {
        end += MINUTES_PER_DAY as u32;
    }

    let mut night_minutes = 0;
    let mut cursor = start;
    while cursor < end {
        let hour = (cursor / 60) % 24;
        if hour >= NIGHT_START_HOUR || hour < NIGHT_END_HOUR {
            night_minutes += NIGHT_STEP_MINUTES;
        }
        cursor += NIGHT_STEP_MINUTES;
    }
    round2(night_minutes as f64 / 60.0)
}

/// Overtime classification of a single day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OvertimeCell {
    /// Hours paid at the 100% rate (work on an unplanned day).
    pub rate_100: f64,
    /// Hours paid at the 50% rate.
    pub rate_50: f64,
    /// Shortfall against plan ("postojowe").
    pub idle: f64,
    /// Custom shift and absence recorded together.
    pub conflict: bool,
}

impl OvertimeCell {
    pub fn is_none(&self) -> bool {
        !self.conflict && self.rate_100 == 0.0 && self.rate_50 == 0.0 && self.idle == 0.0
    }
}

impl fmt::Display for OvertimeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflict {
            return f.write_str("konflikt");
        }
        let mut parts = Vec::new();
        if self.rate_100 > 0.0 {
            parts.push(format!("{}h x 100", fmt_hours(self.rate_100)));
        }
        if self.rate_50 > 0.0 {
            parts.push(format!("{}h x 50", fmt_hours(self.rate_50)));
        }
        if self.idle > 0.0 {
            parts.push(format!("{}h x postojowe", fmt_hours(self.idle)));
        }
        f.write_str(&parts.join(", "))
    }
}

impl Serialize for OvertimeCell {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

/// Splits actual time against plan. With no plan, the first `hours_per_day`
/// hours are 100%-rate and the rest 50%-rate.
pub fn classify_hours(planned: Option<f64>, actual: f64, hours_per_day: f64) -> OvertimeCell {
    match planned {
        None => OvertimeCell {
            rate_100: round2(actual.min(hours_per_day)),
            rate_50: round2((actual - hours_per_day).max(0.0)),
            ..OvertimeCell::default()
        },
        Some(planned) => {
            let diff = round2(actual - planned);
            if diff > 0.0 {
                OvertimeCell { rate_50: diff, ..OvertimeCell::default() }
            } else if diff < 0.0 {
                OvertimeCell { idle: -diff, ..OvertimeCell::default() }
            } else {
                OvertimeCell::default()
            }
        }
    }
}

pub fn overtime_cell(row: &DayRow, hours_per_day: f64) -> OvertimeCell {
    if row.has_entry_conflict() {
        return OvertimeCell { conflict: true, ..OvertimeCell::default() };
    }
    if row.has_absence() {
        return OvertimeCell::default();
    }
    let Some((from, to)) = row.actual_pair() else {
        return OvertimeCell::default();
    };
    let planned = if row.is_duty_only() {
        None
    } else {
        row.scheduled.map(|s| s.total)
    };
    classify_hours(planned, actual_hours(from, to), hours_per_day)
}

/// Offsets 50%-rate overtime against idle hours; the larger absorbs the
/// smaller. Returns `(net_50, net_idle)`.
pub fn net_overtime(total_50: f64, total_idle: f64) -> (f64, f64) {
    (
        round2((total_50 - total_idle).max(0.0)),
        round2((total_idle - total_50).max(0.0)),
    )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub nominal_hours: f64,
    pub planned_hours: f64,
    /// Actual hours plus absence hours.
    pub worked_hours: f64,
    pub actual_hours: f64,
    pub absence_hours: f64,
    pub night_hours: f64,
    pub duty_hours: f64,
    pub overtime_100: f64,
    pub overtime_50: f64,
    pub idle_hours: f64,
    pub net_overtime_50: f64,
    pub net_idle_hours: f64,
    pub conflict_days: Vec<u8>,
}

pub fn summarize(card: &WorkCard) -> MonthlySummary {
    let per_day = card.hours_per_day();
    let mut s = MonthlySummary {
        nominal_hours: card.rows.iter().filter(|r| r.is_working_day).count() as f64 * per_day,
        ..MonthlySummary::default()
    };

    for row in &card.rows {
        if let Some(planned) = row.scheduled.filter(|_| !row.is_duty_only()) {
            s.planned_hours += planned.total;
        }

        match row.actual_pair() {
            Some((from, to)) => {
                s.actual_hours += row.actual_total.unwrap_or_else(|| actual_hours(from, to));
                s.night_hours += night_hours(from, to);
            }
            None => {
                if row.has_absence() {
                    s.absence_hours += per_day;
                }
                if row.is_duty_only() {
                    s.duty_hours += per_day;
                }
            }
        }

        let cell = overtime_cell(row, per_day);
        s.overtime_100 += cell.rate_100;
        s.overtime_50 += cell.rate_50;
        s.idle_hours += cell.idle;
        if cell.conflict {
            s.conflict_days.push(row.day);
        }
    }

    s.planned_hours = round2(s.planned_hours);
    s.actual_hours = round2(s.actual_hours);
    s.absence_hours = round2(s.absence_hours);
    s.worked_hours = round2(s.actual_hours + s.absence_hours);
    s.night_hours = round2(s.night_hours);
    s.duty_hours = round2(s.duty_hours);
    s.overtime_100 = round2(s.overtime_100);
    s.overtime_50 = round2(s.overtime_50);
    s.idle_hours = round2(s.idle_hours);
    (s.net_overtime_50, s.net_idle_hours) = net_overtime(s.overtime_50, s.idle_hours);
    s
}
