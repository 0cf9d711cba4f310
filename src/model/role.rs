use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Closed role set for the four-tier hierarchy. Stored as TEXT.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    sqlx::Type,
    ToSchema,
)]
pub enum Role {
    SuperAdmin,
    Hr,
    Manager,
    Employee,
}

impl Role {
    /// Role an actor of this role is allowed to create (one level down).
    pub fn creates(&self) -> Option<Role> {
        match self {
            Role::SuperAdmin => Some(Role::Hr),
            Role::Hr => Some(Role::Manager),
            Role::Manager => Some(Role::Employee),
            Role::Employee => None,
        }
    }

    /// Expected role of the superior pointed to by `superior_id`.
    pub fn expected_superior(&self) -> Option<Role> {
        match self {
            Role::SuperAdmin => None,
            Role::Hr => Some(Role::SuperAdmin),
            Role::Manager => Some(Role::Hr),
            Role::Employee => Some(Role::Manager),
        }
    }
}
