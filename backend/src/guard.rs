//! Reference checks run before writes, so a bad id surfaces as a 404 naming
//! the record instead of a constraint failure.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};

pub async fn verify_employee(pool: &PgPool, employee_id: Uuid) -> Result<()> {
    let ok = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE id = $1 AND is_active = true)",
    )
    .bind(employee_id)
    .fetch_one(pool)
    .await?;

    if !ok {
        return Err(AppError::NotFound("Employee not found".into()));
    }
    Ok(())
}

pub async fn verify_absence_types(pool: &PgPool, ids: &[Uuid]) -> Result<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let mut unique = ids.to_vec();
    unique.sort();
    unique.dedup();

    let found = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM absence_types WHERE id = ANY($1) AND is_active = true",
    )
    .bind(unique.as_slice())
    .fetch_one(pool)
    .await?;

    if found != unique.len() as i64 {
        return Err(AppError::NotFound("Absence type not found".into()));
    }
    Ok(())
}
