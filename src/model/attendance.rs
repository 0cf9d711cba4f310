use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
pub enum AttendanceStatus {
    Incomplete,
    Present,
    Absent,
    Holiday,
}

/// One row per (user, calendar day); the row exists only once the day was
/// started, and is written exactly once more when it is ended.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 7)]
    pub user_id: i64,
    #[schema(example = "2025-03-10", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(format = "date-time", value_type = String)]
    pub start_time: DateTime<Utc>,
    #[schema(format = "date-time", value_type = String, nullable)]
    pub end_time: Option<DateTime<Utc>>,
    #[schema(example = 8.25)]
    pub total_hours: f64,
    pub status: AttendanceStatus,
    #[schema(example = "https://cdn.example.com/checkin/7.jpg")]
    pub start_photo: String,
    pub end_photo: Option<String>,
}

impl AttendanceRecord {
    pub fn is_closed(&self) -> bool {
        self.end_time.is_some()
    }
}
