use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use time::Date;

use crate::{
    auth::AuthUser,
    engine::calendar::Holidays,
    error::{AppError, Result},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct CalendarYear {
    pub year: i32,
    pub holidays: Vec<Date>,
    /// Required grid hours per month, January first.
    pub required_monthly_hours: [f64; 12],
}

pub async fn year_view(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(year): Path<i32>,
) -> Result<Json<CalendarYear>> {
    if !(2000..=2100).contains(&year) {
        return Err(AppError::BadRequest("year must be between 2000 and 2100".into()));
    }

    let holidays = Holidays::for_year(year);
    Ok(Json(CalendarYear {
        year,
        holidays: holidays.dates().to_vec(),
        required_monthly_hours: *state.required_hours(year).table(),
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}
