use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum HolidayType {
    Public,
    Company,
    Optional,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Holiday {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Republic Day")]
    pub name: String,
    #[schema(example = "2025-01-26", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = 2025)]
    pub year: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: HolidayType,
    pub created_by: i64,
}
