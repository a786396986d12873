use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;
use uuid::Uuid;
use validator::Validate;

use crate::engine::{
    calendar::{CalendarError, ClockTime, YearMonth},
    reconcile::{MonthlySummary, OvertimeCell},
    rest::RestReport,
    work_card::{DayRow, WorkCardEntry},
};
use crate::models::employee::Employee;

/// Work-card entry as posted by the client. `day` and `actual_total` arrive
/// loosely typed and are normalised by [`RawWorkCardEntry::normalize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawWorkCardEntry {
    #[serde(default)]
    pub day: Value,
    #[serde(default)]
    pub actual_from: Option<String>,
    #[serde(default)]
    pub actual_to: Option<String>,
    #[serde(default)]
    pub actual_total: Value,
    #[serde(default)]
    pub absence_type_id: Option<Uuid>,
    #[serde(default)]
    pub on_call: Option<bool>,
}

fn parse_clock(raw: &Option<String>) -> Result<Option<ClockTime>, CalendarError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

fn coerce_total(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

impl RawWorkCardEntry {
    /// Drops entries whose `day` is not an integer in `[1, 31]` within the
    /// month; coerces `actual_total` to a number or null.
    pub fn normalize(&self, month: YearMonth) -> Result<Option<WorkCardEntry>, CalendarError> {
        let Some(day) = self.day.as_u64() else {
            return Ok(None);
        };
        if !(1..=31).contains(&day) || day > month.days_in_month() as u64 {
            return Ok(None);
        }
        Ok(Some(WorkCardEntry {
            day: day as u8,
            actual_from: parse_clock(&self.actual_from)?,
            actual_to: parse_clock(&self.actual_to)?,
            actual_total: coerce_total(&self.actual_total),
            absence_type_id: self.absence_type_id,
            on_call: self.on_call.unwrap_or(false),
        }))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveWorkCardRequest {
    pub month: YearMonth,
    #[validate(length(max = 62))]
    pub entries: Vec<RawWorkCardEntry>,
    /// Save even when rest periods are violated.
    #[serde(default)]
    pub confirm_override: bool,
}

/// Raw `work_card_entries` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkCardRow {
    pub date: Date,
    pub actual_from: Option<String>,
    pub actual_to: Option<String>,
    pub actual_total: Option<f64>,
    pub absence_type_id: Option<Uuid>,
    pub on_call: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayRowView {
    #[serde(flatten)]
    pub row: DayRow,
    pub duty_badge: bool,
    pub overtime: OvertimeCell,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkCardView {
    pub employee: Employee,
    pub month: YearMonth,
    pub hours_per_day: f64,
    pub rows: Vec<DayRowView>,
    pub summary: MonthlySummary,
    pub rest: RestReport,
    /// Banner left by the last save that overrode rest violations.
    pub warning: Option<String>,
}
