use axum::{extract::State, Json};

use crate::{
    auth::AuthUser,
    error::Result,
    models::absence::AbsenceType,
    store::{PgStore, ScheduleStore},
};

pub async fn list(State(store): State<PgStore>, _auth: AuthUser) -> Result<Json<Vec<AbsenceType>>> {
    Ok(Json(store.absence_types().await?))
}
