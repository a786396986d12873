//! Per-day work card rows for one employee and month, merging the planned
//! shift with recorded clock-in/out times, absences and on-call flags.

use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::calendar::{optional_clock, ClockTime, Holidays, YearMonth};
use super::grid::ScheduleEntry;
use super::round2;
use super::shift_code::{ScheduledTime, ShiftCode};
use crate::models::employee::Employee;

pub const FULL_DAY_HOURS: f64 = 8.0;
pub const DISABILITY_DAY_HOURS: f64 = 7.0;

pub fn hours_per_day(has_disability_certificate: bool) -> f64 {
    if has_disability_certificate {
        DISABILITY_DAY_HOURS
    } else {
        FULL_DAY_HOURS
    }
}

/// `(to - from) mod 24h`, rounded to two decimals.
pub fn actual_hours(from: ClockTime, to: ClockTime) -> f64 {
    round2(from.hours_until(to))
}

/// A persisted work-card record for one day of the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCardEntry {
    pub day: u8,
    #[serde(default, with = "optional_clock")]
    pub actual_from: Option<ClockTime>,
    #[serde(default, with = "optional_clock")]
    pub actual_to: Option<ClockTime>,
    pub actual_total: Option<f64>,
    pub absence_type_id: Option<Uuid>,
    #[serde(default)]
    pub on_call: bool,
}

impl WorkCardEntry {
    pub fn empty(day: u8) -> Self {
        Self {
            day,
            actual_from: None,
            actual_to: None,
            actual_total: None,
            absence_type_id: None,
            on_call: false,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.actual_from.is_none()
            && self.actual_to.is_none()
            && self.actual_total.is_none()
            && self.absence_type_id.is_none()
            && !self.on_call
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRow {
    pub day: u8,
    pub date: Date,
    pub is_working_day: bool,
    pub shift: Option<ShiftCode>,
    pub scheduled: Option<ScheduledTime>,
    #[serde(with = "optional_clock")]
    pub actual_from: Option<ClockTime>,
    #[serde(with = "optional_clock")]
    pub actual_to: Option<ClockTime>,
    pub actual_total: Option<f64>,
    pub absence_type_id: Option<Uuid>,
    pub on_call: bool,
}

impl DayRow {
    /// Both clock-in and clock-out are recorded.
    pub fn actual_pair(&self) -> Option<(ClockTime, ClockTime)> {
        self.actual_from.zip(self.actual_to)
    }

    pub fn has_actual(&self) -> bool {
        self.actual_pair().is_some()
    }

    pub fn has_absence(&self) -> bool {
        self.absence_type_id.is_some()
    }

    /// Duty day with no work logged: shows the duty badge, counts as duty.
    pub fn is_duty_only(&self) -> bool {
        matches!(self.shift, Some(s) if s.is_duty()) && !self.has_actual()
    }

    /// A custom shift and an absence on the same day; neither takes precedence.
    pub fn has_entry_conflict(&self) -> bool {
        self.has_absence() && matches!(self.shift, Some(s) if s.is_custom())
    }

    pub fn set_actual_from(&mut self, from: Option<ClockTime>) {
        self.actual_from = from;
        self.recompute_total();
    }

    pub fn set_actual_to(&mut self, to: Option<ClockTime>) {
        self.actual_to = to;
        self.recompute_total();
    }

    /// Refreshes the total once both times are present; otherwise the prior
    /// total is kept.
    fn recompute_total(&mut self) {
        if let Some((from, to)) = self.actual_pair() {
            self.actual_total = Some(actual_hours(from, to));
        }
    }

    fn apply_entry(&mut self, entry: &WorkCardEntry) {
        self.actual_from = entry.actual_from;
        self.actual_to = entry.actual_to;
        self.actual_total = entry.actual_total;
        self.absence_type_id = entry.absence_type_id;
        self.on_call = entry.on_call;
        self.recompute_total();
    }

    pub fn to_entry(&self) -> WorkCardEntry {
        WorkCardEntry {
            day: self.day,
            actual_from: self.actual_from,
            actual_to: self.actual_to,
            actual_total: self.actual_total,
            absence_type_id: self.absence_type_id,
            on_call: self.on_call,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkCard {
    pub month: YearMonth,
    pub employee: Employee,
    pub rows: Vec<DayRow>,
}

impl WorkCard {
    pub fn build(
        month: YearMonth,
        employee: &Employee,
        holidays: &Holidays,
        schedule: &[ScheduleEntry],
        entries: &[WorkCardEntry],
    ) -> Self {
        let disabled = employee.has_disability_certificate;
        let rows = month
            .days()
            .map(|date| {
                let shift = schedule.iter().find(|e| e.date == date).map(|e| e.shift);
                let mut row = DayRow {
                    day: date.day(),
                    date,
                    is_working_day: holidays.is_working_day(date),
                    shift,
                    scheduled: shift.and_then(|s| s.scheduled_time(disabled)),
                    actual_from: None,
                    actual_to: None,
                    actual_total: None,
                    absence_type_id: None,
                    on_call: false,
                };
                if let Some(entry) = entries.iter().find(|e| e.day == row.day) {
                    row.apply_entry(entry);
                }
                row
            })
            .collect();

        Self {
            month,
            employee: employee.clone(),
            rows,
        }
    }

    pub fn hours_per_day(&self) -> f64 {
        hours_per_day(self.employee.has_disability_certificate)
    }

    pub fn row(&self, day: u8) -> Option<&DayRow> {
        self.rows.iter().find(|r| r.day == day)
    }

    pub fn row_mut(&mut self, day: u8) -> Option<&mut DayRow> {
        self.rows.iter_mut().find(|r| r.day == day)
    }

    /// Replaces recorded data with the given entries; days not listed are
    /// reset to blank.
    pub fn replace_entries(&mut self, entries: &[WorkCardEntry]) {
        for row in self.rows.iter_mut() {
            let entry = entries
                .iter()
                .find(|e| e.day == row.day)
                .cloned()
                .unwrap_or_else(|| WorkCardEntry::empty(row.day));
            row.apply_entry(&entry);
        }
    }

    /// Non-blank rows in persistable form.
    pub fn entries(&self) -> Vec<WorkCardEntry> {
        self.rows
            .iter()
            .map(DayRow::to_entry)
            .filter(|e| !e.is_blank())
            .collect()
    }

    pub fn conflict_days(&self) -> Vec<u8> {
        self.rows.iter().filter(|r| r.has_entry_conflict()).map(|r| r.day).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::shift_code::{DutyShift, FixedShift};
    use time::macros::date;
    use time::Month;

    fn clock(s: &str) -> Option<ClockTime> {
        Some(s.parse().unwrap())
    }

    fn employee(disabled: bool) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: "Ewa".into(),
            surname: "Lis".into(),
            position: "loader".into(),
            has_disability_certificate: disabled,
        }
    }

    fn card(disabled: bool, schedule: &[ScheduleEntry], entries: &[WorkCardEntry]) -> WorkCard {
        let month = YearMonth::new(2024, Month::June);
        WorkCard::build(month, &employee(disabled), &Holidays::for_year(2024), schedule, entries)
    }

    #[test]
    fn builds_one_row_per_day_with_planned_time() {
        let schedule = [
            ScheduleEntry { date: date!(2024 - 06 - 03), shift: ShiftCode::Fixed(FixedShift::Afternoon) },
            ScheduleEntry { date: date!(2024 - 06 - 04), shift: ShiftCode::Duty(DutyShift::D1) },
        ];
        let c = card(true, &schedule, &[]);
        assert_eq!(c.rows.len(), 30);
        assert_eq!(c.hours_per_day(), 7.0);

        let afternoon = c.row(3).unwrap();
        let planned = afternoon.scheduled.unwrap();
        assert_eq!(planned.to.to_string(), "21:00");
        assert_eq!(planned.total, 7.0);

        let duty = c.row(4).unwrap();
        assert!(duty.scheduled.is_none());
        assert!(duty.is_duty_only());
        assert!(!c.row(1).unwrap().is_working_day);
    }

    #[test]
    fn duty_badge_suppressed_once_work_is_logged() {
        let schedule = [ScheduleEntry { date: date!(2024 - 06 - 04), shift: ShiftCode::Duty(DutyShift::D3) }];
        let entry = WorkCardEntry {
            actual_from: clock("22:00"),
            actual_to: clock("02:30"),
            ..WorkCardEntry::empty(4)
        };
        let c = card(false, &schedule, &[entry]);
        let row = c.row(4).unwrap();
        assert!(!row.is_duty_only());
        assert_eq!(row.actual_total, Some(4.5));
    }

    #[test]
    fn total_recomputed_only_when_both_times_present() {
        let mut c = card(false, &[], &[]);
        let row = c.row_mut(10).unwrap();
        row.set_actual_from(clock("06:00"));
        assert_eq!(row.actual_total, None);
        row.set_actual_to(clock("14:20"));
        assert_eq!(row.actual_total, Some(8.33));
        row.set_actual_to(None);
        assert_eq!(row.actual_total, Some(8.33));
        row.set_actual_to(clock("05:00"));
        assert_eq!(row.actual_total, Some(23.0));
    }

    #[test]
    fn custom_shift_with_absence_is_a_conflict() {
        let schedule = [ScheduleEntry { date: date!(2024 - 06 - 05), shift: ShiftCode::custom("8-12").unwrap() }];
        let entry = WorkCardEntry { absence_type_id: Some(Uuid::new_v4()), ..WorkCardEntry::empty(5) };
        let c = card(false, &schedule, &[entry]);
        assert_eq!(c.conflict_days(), vec![5]);
    }

    #[test]
    fn entries_skip_blank_days_and_replace_resets() {
        let entry = WorkCardEntry { on_call: true, ..WorkCardEntry::empty(7) };
        let mut c = card(false, &[], &[entry.clone()]);
        assert_eq!(c.entries(), vec![entry]);
        c.replace_entries(&[]);
        assert!(c.entries().is_empty());
    }
}
