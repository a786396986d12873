use serde::{Deserialize, Serialize};
use time::Date;
use validator::Validate;

use crate::engine::{calendar::YearMonth, grid::ScheduleEntry, monthly_hours::HoursMismatch};

/// Bulk replacement of one employee's month in the shift grid.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveScheduleRequest {
    pub month: YearMonth,
    #[validate(length(max = 31, message = "at most one shift per day of the month"))]
    pub shifts: Vec<ScheduleEntry>,
    /// Save even when the month's hours do not match the requirement.
    #[serde(default)]
    pub confirm_override: bool,
}

#[derive(Debug, Serialize)]
pub struct SaveScheduleResponse {
    pub saved: usize,
    /// Mismatches that were overridden on this save.
    pub overridden: Vec<HoursMismatch>,
}

/// Raw `schedule_entries` row; the shift is parsed after fetch.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScheduleRow {
    pub date: Date,
    pub shift: String,
}
