use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub department: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub is_on_leave: bool,
    pub leave_balance: i64,
    /// Single parent pointer; its role must match `role.expected_superior()`.
    pub superior_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

/// User shape returned by the API (no password hash).
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "jdoe")]
    pub user_name: String,
    #[schema(example = "jdoe@company.com")]
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub is_on_leave: bool,
    #[schema(example = 12)]
    pub leave_balance: i64,
    pub superior_id: Option<i64>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            user_name: u.user_name,
            email: u.email,
            role: u.role,
            department: u.department,
            phone_number: u.phone_number,
            is_active: u.is_active,
            is_on_leave: u.is_on_leave,
            leave_balance: u.leave_balance,
            superior_id: u.superior_id,
        }
    }
}
