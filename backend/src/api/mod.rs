pub mod absence;
pub mod auth;
pub mod calendar;
pub mod employees;
pub mod schedule;
pub mod work_card;

use axum::{routing::{get, post}, Router};
use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(calendar::health))
        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        // Employees and their monthly schedule
        .route("/api/employees", get(employees::list))
        .route("/api/employees/:id", get(employees::get_one))
        .route(
            "/api/employees/:id/schedule",
            get(schedule::get_employee_schedule).post(schedule::save_employee_schedule),
        )
        // Whole-roster grid with the monthly hours check
        .route("/api/schedule", get(schedule::grid_view))
        // Work cards
        .route("/api/work-card/:id", get(work_card::get_card).post(work_card::save_card))
        // Reference data
        .route("/api/absence-types", get(absence::list))
        .route("/api/calendar/:year", get(calendar::year_view))
        .with_state(state)
}
