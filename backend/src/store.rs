//! Persistence seam for scheduling sessions.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    engine::{
        calendar::{ClockTime, YearMonth},
        grid::ScheduleEntry,
        work_card::WorkCardEntry,
    },
    error::{AppError, Result},
    models::{
        absence::AbsenceType,
        employee::{Employee, EmployeeListParams},
        schedule::ScheduleRow,
        work_card::WorkCardRow,
    },
};

/// Work-card data persisted for one employee and month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredWorkCard {
    pub entries: Vec<WorkCardEntry>,
    pub warning: Option<String>,
}

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Active roster in display order.
    async fn employees(&self) -> Result<Vec<Employee>>;

    async fn employee(&self, id: Uuid) -> Result<Employee>;

    async fn schedule(&self, employee_id: Uuid, month: YearMonth) -> Result<Vec<ScheduleEntry>>;

    /// Replaces the employee's schedule for the month.
    async fn save_schedule(&self, employee_id: Uuid, month: YearMonth, entries: &[ScheduleEntry]) -> Result<()>;

    async fn work_card(&self, employee_id: Uuid, month: YearMonth) -> Result<StoredWorkCard>;

    /// Replaces the employee's work card for the month and records the
    /// rest-violation banner (or clears it).
    async fn save_work_card(
        &self,
        employee_id: Uuid,
        month: YearMonth,
        entries: &[WorkCardEntry],
        warning: Option<&str>,
    ) -> Result<()>;

    async fn absence_types(&self) -> Result<Vec<AbsenceType>>;
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_employees(&self, params: &EmployeeListParams) -> Result<Vec<Employee>> {
        let rows = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, surname, position, has_disability_certificate
            FROM employees
            WHERE is_active = true
              AND ($1::text IS NULL OR position = $1)
            ORDER BY surname, name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(params.position.as_deref())
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

fn stored_clock(raw: Option<String>) -> Option<ClockTime> {
    raw.and_then(|s| match s.parse() {
        Ok(t) => Some(t),
        Err(e) => {
            tracing::warn!("Ignoring stored clock time: {}", e);
            None
        }
    })
}

#[async_trait]
impl ScheduleStore for PgStore {
    async fn employees(&self) -> Result<Vec<Employee>> {
        let rows = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, surname, position, has_disability_certificate
            FROM employees
            WHERE is_active = true
            ORDER BY surname, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn employee(&self, id: Uuid) -> Result<Employee> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, surname, position, has_disability_certificate
            FROM employees WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))
    }

    async fn schedule(&self, employee_id: Uuid, month: YearMonth) -> Result<Vec<ScheduleEntry>> {
        let rows = sqlx::query_as::<_, ScheduleRow>(
            r#"
            SELECT date, shift
            FROM schedule_entries
            WHERE employee_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date
            "#,
        )
        .bind(employee_id)
        .bind(month.first_day())
        .bind(month.last_day())
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .filter_map(|r| match r.shift.parse() {
                Ok(shift) => Some(ScheduleEntry { date: r.date, shift }),
                Err(e) => {
                    tracing::warn!("Skipping stored shift for {} on {}: {}", employee_id, r.date, e);
                    None
                }
            })
            .collect();

        Ok(entries)
    }

    async fn save_schedule(&self, employee_id: Uuid, month: YearMonth, entries: &[ScheduleEntry]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM schedule_entries WHERE employee_id = $1 AND date BETWEEN $2 AND $3")
            .bind(employee_id)
            .bind(month.first_day())
            .bind(month.last_day())
            .execute(&mut *tx)
            .await?;

        for entry in entries.iter().filter(|e| month.contains(e.date)) {
            sqlx::query("INSERT INTO schedule_entries (employee_id, date, shift) VALUES ($1, $2, $3)")
                .bind(employee_id)
                .bind(entry.date)
                .bind(entry.shift.to_string())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn work_card(&self, employee_id: Uuid, month: YearMonth) -> Result<StoredWorkCard> {
        let rows = sqlx::query_as::<_, WorkCardRow>(
            r#"
            SELECT date, actual_from, actual_to, actual_total, absence_type_id, on_call
            FROM work_card_entries
            WHERE employee_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date
            "#,
        )
        .bind(employee_id)
        .bind(month.first_day())
        .bind(month.last_day())
        .fetch_all(&self.pool)
        .await?;

        let warning = sqlx::query_scalar::<_, Option<String>>(
            "SELECT rest_warning FROM work_card_months WHERE employee_id = $1 AND month = $2",
        )
        .bind(employee_id)
        .bind(month.to_string())
        .fetch_optional(&self.pool)
        .await?
        .flatten();

        let entries = rows
            .into_iter()
            .map(|r| WorkCardEntry {
                day: r.date.day(),
                actual_from: stored_clock(r.actual_from),
                actual_to: stored_clock(r.actual_to),
                actual_total: r.actual_total,
                absence_type_id: r.absence_type_id,
                on_call: r.on_call,
            })
            .collect();

        Ok(StoredWorkCard { entries, warning })
    }

    async fn save_work_card(
        &self,
        employee_id: Uuid,
        month: YearMonth,
        entries: &[WorkCardEntry],
        warning: Option<&str>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM work_card_entries WHERE employee_id = $1 AND date BETWEEN $2 AND $3")
            .bind(employee_id)
            .bind(month.first_day())
            .bind(month.last_day())
            .execute(&mut *tx)
            .await?;

        for entry in entries {
            let Some(date) = month.day(entry.day) else {
                continue;
            };
            sqlx::query(
                r#"
                INSERT INTO work_card_entries
                    (employee_id, date, actual_from, actual_to, actual_total, absence_type_id, on_call)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(employee_id)
            .bind(date)
            .bind(entry.actual_from.map(|t| t.to_string()))
            .bind(entry.actual_to.map(|t| t.to_string()))
            .bind(entry.actual_total)
            .bind(entry.absence_type_id)
            .bind(entry.on_call)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO work_card_months (employee_id, month, rest_warning, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (employee_id, month)
            DO UPDATE SET rest_warning = EXCLUDED.rest_warning, updated_at = now()
            "#,
        )
        .bind(employee_id)
        .bind(month.to_string())
        .bind(warning)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn absence_types(&self) -> Result<Vec<AbsenceType>> {
        let rows = sqlx::query_as::<_, AbsenceType>(
            "SELECT id, code, name FROM absence_types WHERE is_active = true ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
