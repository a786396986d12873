use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    models::employee::{Employee, EmployeeListParams},
    store::{PgStore, ScheduleStore},
};

pub async fn list(
    State(store): State<PgStore>,
    auth: AuthUser,
    Query(params): Query<EmployeeListParams>,
) -> Result<Json<Vec<Employee>>> {
    if !auth.role.can_manage_schedule() {
        return Err(AppError::Forbidden);
    }

    Ok(Json(store.list_employees(&params).await?))
}

pub async fn get_one(
    State(store): State<PgStore>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>> {
    if !auth.can_view_employee(id) {
        return Err(AppError::Forbidden);
    }

    Ok(Json(store.employee(id).await?))
}
