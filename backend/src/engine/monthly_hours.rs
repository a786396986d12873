//! Save-time check of grid hours against the month's required total.

use serde::Serialize;
use uuid::Uuid;

use super::calendar::{Holidays, YearMonth};
use super::grid::ShiftGrid;
use super::shift_code::GRID_SHIFT_HOURS;
use super::{fmt_hours, round2};
use crate::models::employee::Employee;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("required monthly hours must be 12 comma-separated numbers, got '{0}'")]
pub struct RequiredHoursError(pub String);

/// Required hours per month index (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RequiredMonthlyHours([f64; 12]);

impl RequiredMonthlyHours {
    pub fn from_table(table: [f64; 12]) -> Self {
        Self(table)
    }

    /// Working days of each month times a full shift.
    pub fn for_year(holidays: &Holidays) -> Self {
        let mut table = [0.0; 12];
        for (idx, slot) in table.iter_mut().enumerate() {
            let month = time::Month::try_from(idx as u8 + 1).unwrap_or(time::Month::January);
            let ym = YearMonth::new(holidays.year(), month);
            *slot = holidays.working_days(ym) as f64 * GRID_SHIFT_HOURS;
        }
        Self(table)
    }

    pub fn parse(raw: &str) -> Result<Self, RequiredHoursError> {
        let values: Vec<f64> = raw
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| RequiredHoursError(raw.to_string()))?;
        let table: [f64; 12] = values
            .try_into()
            .map_err(|_| RequiredHoursError(raw.to_string()))?;
        Ok(Self(table))
    }

    pub fn for_month(&self, month: YearMonth) -> f64 {
        self.0[month.index()]
    }

    pub fn table(&self) -> &[f64; 12] {
        &self.0
    }
}

pub fn assigned_hours(grid: &ShiftGrid, employee_id: Uuid) -> f64 {
    round2(grid.employee_shifts(employee_id).map(|s| s.assigned_hours()).sum())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoursMismatch {
    pub employee_id: Uuid,
    pub employee_name: String,
    pub assigned: f64,
    pub required: f64,
}

impl HoursMismatch {
    pub fn message(&self) -> String {
        format!(
            "{}: {}h assigned, {}h required",
            self.employee_name,
            fmt_hours(self.assigned),
            fmt_hours(self.required)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyHoursReport {
    pub mismatched: Vec<HoursMismatch>,
}

impl MonthlyHoursReport {
    pub fn is_ok(&self) -> bool {
        self.mismatched.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.mismatched.iter().map(HoursMismatch::message).collect()
    }
}

/// Lists employees whose grid total differs from the month's requirement.
pub fn validate(grid: &ShiftGrid, required: &RequiredMonthlyHours, employees: &[Employee]) -> MonthlyHoursReport {
    let target = required.for_month(grid.month());
    let mismatched = employees
        .iter()
        .filter_map(|e| {
            let assigned = assigned_hours(grid, e.id);
            (assigned != target).then(|| HoursMismatch {
                employee_id: e.id,
                employee_name: e.full_name(),
                assigned,
                required: target,
            })
        })
        .collect();
    MonthlyHoursReport { mismatched }
}
