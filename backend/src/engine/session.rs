//! Scheduling sessions: in-memory editable documents keyed by
//! `(employee, date)` that load from a store, run the save-time validators
//! and persist only on an explicit save.

use uuid::Uuid;

use super::calendar::{Holidays, YearMonth};
use super::grid::ShiftGrid;
use super::monthly_hours::{self, MonthlyHoursReport, RequiredMonthlyHours};
use super::reconcile::{self, MonthlySummary, OvertimeCell};
use super::rest::{self, RestReport};
use super::work_card::{WorkCard, WorkCardEntry};
use crate::error::Result;
use crate::models::employee::Employee;
use crate::store::ScheduleStore;

/// Result of a save attempt guarded by an overridable advisory.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome<A> {
    Saved,
    /// Saved although the advisory fired; the caller confirmed.
    SavedWithOverride(A),
    /// Nothing written; the advisory must be confirmed first.
    Blocked(A),
}

impl<A> SaveOutcome<A> {
    pub fn is_saved(&self) -> bool {
        !matches!(self, SaveOutcome::Blocked(_))
    }
}

/// Monthly shift grid for a roster.
#[derive(Debug, Clone)]
pub struct ScheduleSession {
    grid: ShiftGrid,
    employees: Vec<Employee>,
    required: RequiredMonthlyHours,
}

impl ScheduleSession {
    pub fn new(month: YearMonth, employees: Vec<Employee>, required: RequiredMonthlyHours) -> Self {
        let grid = ShiftGrid::new(month, employees.iter().map(|e| e.id));
        Self {
            grid,
            employees,
            required,
        }
    }

    /// Fetches each employee's persisted month into a fresh grid.
    pub async fn load(
        store: &dyn ScheduleStore,
        month: YearMonth,
        employees: Vec<Employee>,
        required: RequiredMonthlyHours,
    ) -> Result<Self> {
        let mut session = Self::new(month, employees, required);
        for id in session.grid.roster().to_vec() {
            let entries = store.schedule(id, month).await?;
            session.grid.load_employee(id, entries);
        }
        Ok(session)
    }

    pub fn grid(&self) -> &ShiftGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut ShiftGrid {
        &mut self.grid
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn validate(&self) -> MonthlyHoursReport {
        monthly_hours::validate(&self.grid, &self.required, &self.employees)
    }

    /// Writes every employee's row, one store call per employee, after the
    /// hours check. A failed write leaves the in-memory grid untouched.
    pub async fn save(
        &self,
        store: &dyn ScheduleStore,
        confirm_override: bool,
    ) -> Result<SaveOutcome<MonthlyHoursReport>> {
        let report = self.validate();
        if !report.is_ok() && !confirm_override {
            return Ok(SaveOutcome::Blocked(report));
        }

        let month = self.grid.month();
        for employee in &self.employees {
            let entries = self.grid.employee_entries(employee.id);
            store.save_schedule(employee.id, month, &entries).await?;
        }

        if report.is_ok() {
            tracing::info!(%month, employees = self.employees.len(), "Schedule saved");
            Ok(SaveOutcome::Saved)
        } else {
            tracing::warn!(
                %month,
                mismatched = report.mismatched.len(),
                "Schedule saved with monthly hours override"
            );
            Ok(SaveOutcome::SavedWithOverride(report))
        }
    }
}

/// One employee's work card for a month.
#[derive(Debug, Clone)]
pub struct WorkCardSession {
    card: WorkCard,
    warning: Option<String>,
}

impl WorkCardSession {
    pub async fn load(
        store: &dyn ScheduleStore,
        employee_id: Uuid,
        month: YearMonth,
        holidays: &Holidays,
    ) -> Result<Self> {
        let employee = store.employee(employee_id).await?;
        let schedule = store.schedule(employee_id, month).await?;
        let stored = store.work_card(employee_id, month).await?;
        Ok(Self {
            card: WorkCard::build(month, &employee, holidays, &schedule, &stored.entries),
            warning: stored.warning,
        })
    }

    pub fn card(&self) -> &WorkCard {
        &self.card
    }

    /// Banner left by the last save that overrode rest violations.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn replace_entries(&mut self, entries: &[WorkCardEntry]) {
        self.card.replace_entries(entries);
    }

    pub fn summary(&self) -> MonthlySummary {
        reconcile::summarize(&self.card)
    }

    pub fn overtime_cells(&self) -> Vec<(u8, OvertimeCell)> {
        let per_day = self.card.hours_per_day();
        self.card
            .rows
            .iter()
            .map(|row| (row.day, reconcile::overtime_cell(row, per_day)))
            .collect()
    }

    pub fn validate(&self) -> RestReport {
        rest::validate(&self.card)
    }

    /// Persists the card after the rest check. An overridden save records the
    /// warning banner; a clean save clears it.
    pub async fn save(
        &mut self,
        store: &dyn ScheduleStore,
        confirm_override: bool,
    ) -> Result<SaveOutcome<RestReport>> {
        let report = self.validate();
        if report.has_violation && !confirm_override {
            return Ok(SaveOutcome::Blocked(report));
        }

        let warning = report.warning_banner();
        store
            .save_work_card(
                self.card.employee.id,
                self.card.month,
                &self.card.entries(),
                warning.as_deref(),
            )
            .await?;
        self.warning = warning;

        if report.has_violation {
            tracing::warn!(
                employee_id = %self.card.employee.id,
                month = %self.card.month,
                violations = report.violations.len(),
                "Work card saved with rest-period override"
            );
            Ok(SaveOutcome::SavedWithOverride(report))
        } else {
            tracing::info!(
                employee_id = %self.card.employee.id,
                month = %self.card.month,
                "Work card saved"
            );
            Ok(SaveOutcome::Saved)
        }
    }
}
