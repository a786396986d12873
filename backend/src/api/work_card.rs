use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthUser,
    engine::{
        calendar::Holidays,
        session::{SaveOutcome, WorkCardSession},
    },
    error::{AppError, Result},
    guard,
    models::{
        common::MonthQuery,
        work_card::{DayRowView, SaveWorkCardRequest, WorkCardView},
    },
    store::PgStore,
    AppState,
};

fn view(session: &WorkCardSession) -> WorkCardView {
    let card = session.card();
    let cells = session.overtime_cells();
    let rows = card
        .rows
        .iter()
        .zip(cells)
        .map(|(row, (_, overtime))| DayRowView {
            duty_badge: row.is_duty_only(),
            row: row.clone(),
            overtime,
        })
        .collect();

    WorkCardView {
        employee: card.employee.clone(),
        month: card.month,
        hours_per_day: card.hours_per_day(),
        rows,
        summary: session.summary(),
        rest: session.validate(),
        warning: session.warning().map(str::to_string),
    }
}

pub async fn get_card(
    State(store): State<PgStore>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(q): Query<MonthQuery>,
) -> Result<Json<WorkCardView>> {
    if !auth.can_view_employee(id) {
        return Err(AppError::Forbidden);
    }

    let holidays = Holidays::for_year(q.month.year);
    let session = WorkCardSession::load(&store, id, q.month, &holidays).await?;
    Ok(Json(view(&session)))
}

/// Replaces the month's work card. Blocked with 409 on rest-period violations
/// unless `confirm_override` is set; an overridden save leaves a warning.
pub async fn save_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveWorkCardRequest>,
) -> Result<Json<WorkCardView>> {
    req.validate()?;

    if !auth.role.can_manage_schedule() {
        return Err(AppError::Forbidden);
    }

    let mut entries = Vec::with_capacity(req.entries.len());
    for raw in &req.entries {
        if let Some(entry) = raw.normalize(req.month)? {
            entries.push(entry);
        }
    }
    let absence_ids: Vec<Uuid> = entries.iter().filter_map(|e| e.absence_type_id).collect();
    guard::verify_absence_types(&state.pool, &absence_ids).await?;

    let store = PgStore::new(state.pool.clone());
    let holidays = Holidays::for_year(req.month.year);
    let mut session = WorkCardSession::load(&store, id, req.month, &holidays).await?;
    session.replace_entries(&entries);

    match session.save(&store, req.confirm_override).await? {
        SaveOutcome::Blocked(report) => Err(AppError::Advisory {
            kind: "rest_period",
            messages: report.messages,
        }),
        SaveOutcome::Saved | SaveOutcome::SavedWithOverride(_) => Ok(Json(view(&session))),
    }
}
