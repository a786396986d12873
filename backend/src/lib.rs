pub mod api;
pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod guard;
pub mod models;
pub mod store;

use sqlx::PgPool;

use engine::calendar::Holidays;
use engine::monthly_hours::RequiredMonthlyHours;
use store::PgStore;

/// Shared application state available to all handlers via axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub required_monthly_hours: Option<RequiredMonthlyHours>,
}

impl AppState {
    /// Configured table if present, otherwise derived from the year's calendar.
    pub fn required_hours(&self, year: i32) -> RequiredMonthlyHours {
        self.required_monthly_hours
            .unwrap_or_else(|| RequiredMonthlyHours::for_year(&Holidays::for_year(year)))
    }
}

impl axum::extract::FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl axum::extract::FromRef<AppState> for PgStore {
    fn from_ref(state: &AppState) -> Self {
        PgStore::new(state.pool.clone())
    }
}
