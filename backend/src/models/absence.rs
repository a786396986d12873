use serde::Serialize;
use uuid::Uuid;

/// Absence reason offered in the work-card picker (leave, sick leave, ...).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AbsenceType {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}
