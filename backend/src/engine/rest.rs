//! Daily (11h) and weekly (35h) rest-period checks over a work card.

use serde::Serialize;

use super::calendar::{ClockTime, MINUTES_PER_DAY};
use super::fmt_hours_fixed;
use super::work_card::{DayRow, WorkCard};

pub const MIN_DAILY_REST_HOURS: f64 = 11.0;
pub const MIN_WEEKLY_REST_HOURS: f64 = 35.0;
const WINDOW_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RestViolation {
    Daily { first_day: u8, second_day: u8, rest_hours: f64 },
    Weekly { first_day: u8, last_day: u8, rest_hours: f64 },
}

impl RestViolation {
    pub fn message(&self) -> String {
        match self {
            RestViolation::Daily { first_day, second_day, rest_hours } => format!(
                "Daily rest between day {} and day {} is {}h (minimum {}h)",
                first_day,
                second_day,
                fmt_hours_fixed(*rest_hours),
                MIN_DAILY_REST_HOURS
            ),
            RestViolation::Weekly { first_day, last_day, rest_hours } => format!(
                "Weekly rest between day {} and day {} is {}h (minimum {}h)",
                first_day,
                last_day,
                fmt_hours_fixed(*rest_hours),
                MIN_WEEKLY_REST_HOURS
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RestReport {
    pub has_violation: bool,
    pub messages: Vec<String>,
    pub violations: Vec<RestViolation>,
}

impl RestReport {
    fn from_violations(violations: Vec<RestViolation>) -> Self {
        Self {
            has_violation: !violations.is_empty(),
            messages: violations.iter().map(RestViolation::message).collect(),
            violations,
        }
    }

    /// Banner text shown after a save that overrode the violations.
    pub fn warning_banner(&self) -> Option<String> {
        let daily = self.violations.iter().any(|v| matches!(v, RestViolation::Daily { .. }));
        let weekly = self.violations.iter().any(|v| matches!(v, RestViolation::Weekly { .. }));
        let mut rules = Vec::new();
        if daily {
            rules.push(format!("daily rest ({}h)", MIN_DAILY_REST_HOURS));
        }
        if weekly {
            rules.push(format!("weekly rest ({}h)", MIN_WEEKLY_REST_HOURS));
        }
        (!rules.is_empty()).then(|| format!("Saved despite rest-period violations: {}", rules.join(", ")))
    }
}

fn qualifying(row: &DayRow) -> Option<(ClockTime, ClockTime)> {
    if row.has_absence() {
        return None;
    }
    row.actual_pair()
}

/// Qualifying rows on consecutive calendar days must be separated by at least
/// 11 hours, measured as `(next_from - current_to) mod 24h`.
pub fn daily_violations(rows: &[DayRow]) -> Vec<RestViolation> {
    rows.windows(2)
        .filter_map(|pair| {
            let (current, next) = (&pair[0], &pair[1]);
            if next.day != current.day + 1 {
                return None;
            }
            let (_, current_to) = qualifying(current)?;
            let (next_from, _) = qualifying(next)?;
            let rest = current_to.hours_until(next_from);
            (rest < MIN_DAILY_REST_HOURS).then_some(RestViolation::Daily {
                first_day: current.day,
                second_day: next.day,
                rest_hours: rest,
            })
        })
        .collect()
}

/// Every 7-day window of the month holding at least two qualifying days must
/// contain an uninterrupted break of 35 hours. Breaks run between consecutive
/// worked intervals; at the window edges they extend to the nearest worked
/// interval of the month outside the window, or stop at the edge.
pub fn weekly_violations(rows: &[DayRow]) -> Vec<RestViolation> {
    if rows.len() < WINDOW_DAYS {
        return Vec::new();
    }
    let day_minutes = MINUTES_PER_DAY as u32;

    // (row index, day, begin, end) in minutes from the first row's midnight
    let worked: Vec<(usize, u8, u32, u32)> = rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            let (from, to) = qualifying(row)?;
            let begin = idx as u32 * day_minutes + from.minutes() as u32;
            Some((idx, row.day, begin, begin + from.minutes_until(to) as u32))
        })
        .collect();

    (0..=rows.len() - WINDOW_DAYS)
        .filter_map(|start| {
            let stop = start + WINDOW_DAYS;
            let inside: Vec<_> = worked.iter().filter(|w| w.0 >= start && w.0 < stop).collect();
            if inside.len() < 2 {
                return None;
            }

            let mut busy_until = worked
                .iter()
                .filter(|w| w.0 < start)
                .map(|w| w.3)
                .max()
                .unwrap_or(start as u32 * day_minutes);
            let mut longest = 0;
            for &&(_, _, begin, end) in &inside {
                longest = longest.max(begin.saturating_sub(busy_until));
                busy_until = busy_until.max(end);
            }
            let next_begin = worked
                .iter()
                .find(|w| w.0 >= stop)
                .map(|w| w.2)
                .unwrap_or(stop as u32 * day_minutes);
            longest = longest.max(next_begin.saturating_sub(busy_until));

            let rest = longest as f64 / 60.0;
            (rest < MIN_WEEKLY_REST_HOURS).then(|| RestViolation::Weekly {
                first_day: inside[0].1,
                last_day: inside[inside.len() - 1].1,
                rest_hours: rest,
            })
        })
        .collect()
}

pub fn validate(card: &WorkCard) -> RestReport {
    let mut violations = daily_violations(&card.rows);
    violations.extend(weekly_violations(&card.rows));
    RestReport::from_violations(violations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::calendar::{Holidays, YearMonth};
    use crate::engine::work_card::WorkCardEntry;
    use crate::models::employee::Employee;
    use time::Month;
    use uuid::Uuid;

    fn worked(day: u8, from: &str, to: &str) -> WorkCardEntry {
        WorkCardEntry {
            actual_from: Some(from.parse().unwrap()),
            actual_to: Some(to.parse().unwrap()),
            ..WorkCardEntry::empty(day)
        }
    }

    fn card(entries: &[WorkCardEntry]) -> WorkCard {
        let employee = Employee {
            id: Uuid::new_v4(),
            name: "Marek".into(),
            surname: "Zając".into(),
            position: "driver".into(),
            has_disability_certificate: false,
        };
        WorkCard::build(
            YearMonth::new(2024, Month::September),
            &employee,
            &Holidays::for_year(2024),
            &[],
            entries,
        )
    }

    #[test]
    fn short_daily_rest_names_both_days() {
        let report = validate(&card(&[worked(3, "14:00", "22:00"), worked(4, "05:00", "13:00")]));
        assert!(report.has_violation);
        assert_eq!(
            report.violations,
            vec![RestViolation::Daily { first_day: 3, second_day: 4, rest_hours: 7.0 }]
        );
        assert_eq!(report.messages[0], "Daily rest between day 3 and day 4 is 7,00h (minimum 11h)");
    }

    #[test]
    fn daily_rest_ignores_absences_and_gaps() {
        let absent = WorkCardEntry { absence_type_id: Some(Uuid::new_v4()), ..worked(4, "05:00", "13:00") };
        assert!(daily_violations(&card(&[worked(3, "14:00", "22:00"), absent]).rows).is_empty());
        assert!(daily_violations(&card(&[worked(3, "14:00", "22:00"), worked(5, "05:00", "13:00")]).rows).is_empty());
        assert!(daily_violations(&card(&[worked(3, "06:00", "14:00"), worked(4, "06:00", "14:00")]).rows).is_empty());
    }

    #[test]
    fn seven_straight_workdays_break_weekly_rest() {
        let entries: Vec<_> = (2..=8).map(|d| worked(d, "06:00", "14:00")).collect();
        let report = validate(&card(&entries));
        assert!(report.violations.contains(&RestViolation::Weekly {
            first_day: 2,
            last_day: 8,
            rest_hours: 16.0
        }));
        assert!(report.violations.iter().all(|v| matches!(v, RestViolation::Weekly { .. })));
    }

    #[test]
    fn a_free_day_gives_weekly_rest() {
        // days 2-6 worked, 7 free, 8 worked: 14:00 on the 6th to 06:00 on the 8th is 40h
        let mut entries: Vec<_> = (2..=6).map(|d| worked(d, "06:00", "14:00")).collect();
        entries.push(worked(8, "06:00", "14:00"));
        assert!(weekly_violations(&card(&entries).rows).is_empty());
    }

    #[test]
    fn single_worked_day_in_window_is_not_checked() {
        assert!(weekly_violations(&card(&[worked(10, "00:00", "23:59")]).rows).is_empty());
    }

    #[test]
    fn banner_names_violated_rules() {
        let entries: Vec<_> = (2..=8).map(|d| worked(d, "14:00", "22:00")).chain([worked(9, "05:00", "13:00")]).collect();
        let report = validate(&card(&entries));
        assert_eq!(
            report.warning_banner().as_deref(),
            Some("Saved despite rest-period violations: daily rest (11h), weekly rest (35h)")
        );
        assert_eq!(RestReport::default().warning_banner(), None);
    }
}
