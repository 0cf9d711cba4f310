use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum LeaveType {
    Sick,
    Casual,
    Earned,
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 7)]
    pub user_id: i64,
    #[schema(example = "Family function")]
    pub reason: String,
    #[schema(example = "2025-03-10", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2025-03-12", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    pub leave_type: LeaveType,
    pub status: LeaveStatus,
    /// Set once, on approval or rejection.
    pub approved_by: Option<i64>,
    /// Populated on rejection.
    pub remarks: Option<String>,
    #[schema(format = "date-time", value_type = String, nullable)]
    pub created_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    pub fn is_terminal(&self) -> bool {
        self.status != LeaveStatus::Pending
    }
}
