use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthUser,
    engine::{
        calendar::YearMonth,
        grid::ScheduleEntry,
        monthly_hours::{self, MonthlyHoursReport},
        session::{SaveOutcome, ScheduleSession},
    },
    error::{AppError, Result},
    guard,
    models::{
        common::MonthQuery,
        employee::Employee,
        schedule::{SaveScheduleRequest, SaveScheduleResponse},
    },
    store::{PgStore, ScheduleStore},
    AppState,
};

pub async fn get_employee_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(q): Query<MonthQuery>,
) -> Result<Json<Vec<ScheduleEntry>>> {
    if !auth.can_view_employee(id) {
        return Err(AppError::Forbidden);
    }

    guard::verify_employee(&state.pool, id).await?;
    let store = PgStore::new(state.pool.clone());
    Ok(Json(store.schedule(id, q.month).await?))
}

/// Replaces one employee's month. Blocked with 409 when the assigned hours
/// differ from the month's requirement, unless `confirm_override` is set.
pub async fn save_employee_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveScheduleRequest>,
) -> Result<Json<SaveScheduleResponse>> {
    req.validate()?;

    if !auth.role.can_manage_schedule() {
        return Err(AppError::Forbidden);
    }

    if let Some(outside) = req.shifts.iter().find(|e| !req.month.contains(e.date)) {
        return Err(AppError::BadRequest(format!(
            "date {} is outside {}",
            outside.date, req.month
        )));
    }

    let store = PgStore::new(state.pool.clone());
    let employee = store.employee(id).await?;

    let mut session = ScheduleSession::new(req.month, vec![employee], state.required_hours(req.month.year));
    for entry in &req.shifts {
        session.grid_mut().apply_to_range(id, entry.date, entry.date, entry.shift);
    }

    let overridden = match session.save(&store, req.confirm_override).await? {
        SaveOutcome::Blocked(report) => {
            return Err(AppError::Advisory {
                kind: "monthly_hours",
                messages: report.messages(),
            })
        }
        SaveOutcome::Saved => Vec::new(),
        SaveOutcome::SavedWithOverride(report) => report.mismatched,
    };

    Ok(Json(SaveScheduleResponse {
        saved: session.grid().employee_entries(id).len(),
        overridden,
    }))
}

#[derive(Debug, Serialize)]
pub struct GridRow {
    pub employee: Employee,
    pub assigned_hours: f64,
    pub shifts: Vec<ScheduleEntry>,
}

#[derive(Debug, Serialize)]
pub struct GridView {
    pub month: YearMonth,
    pub required_hours: f64,
    pub rows: Vec<GridRow>,
    pub hours_check: MonthlyHoursReport,
}

/// The whole roster's month, as the grid editor loads it.
pub async fn grid_view(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(q): Query<MonthQuery>,
) -> Result<Json<GridView>> {
    if !auth.role.can_manage_schedule() {
        return Err(AppError::Forbidden);
    }

    let store = PgStore::new(state.pool.clone());
    let employees = store.employees().await?;
    let required = state.required_hours(q.month.year);
    let session = ScheduleSession::load(&store, q.month, employees, required).await?;

    let rows = session
        .employees()
        .iter()
        .map(|e| GridRow {
            employee: e.clone(),
            assigned_hours: monthly_hours::assigned_hours(session.grid(), e.id),
            shifts: session.grid().employee_entries(e.id),
        })
        .collect();

    Ok(Json(GridView {
        month: q.month,
        required_hours: required.for_month(q.month),
        rows,
        hours_check: session.validate(),
    }))
}
