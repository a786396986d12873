use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Crew member as kept in the employee registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub position: String,
    pub has_disability_certificate: bool,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

#[derive(Debug, Deserialize)]
pub struct EmployeeListParams {
    pub position: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl EmployeeListParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(100).clamp(1, 500)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}
