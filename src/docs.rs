use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{openapi, Modify, OpenApi};

use crate::api::attendance::AttendancePhoto;
use crate::api::holiday::CreateHoliday;
use crate::api::leave::{ApplyLeave, RejectLeave};
use crate::api::users::CreateUser;
use crate::auth::handlers::{LoginRequest, RefreshRequest, SeedRequest};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::holiday::{Holiday, HolidayType};
use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::role::Role;
use crate::model::user::UserResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "StaffSync API",
        version = "1.0.0",
        description = r#"
## Attendance & Leave Lifecycle Engine

Tracks employee presence (daily check-in/check-out with photographic proof)
and leave requests inside a four-tier hierarchy
(SuperAdmin → HR → Manager → Employee).

- **Attendance**: one record per user per day; start/end with photo proof;
  holidays block check-in; short days close as Incomplete.
- **Leave**: pending → approved/rejected by the direct superior, or cancelled
  by the requester; approval decrements the leave balance and queues a
  notification.
- **Holidays**: designated non-working dates, unique per date.
- **Visibility**: every listing is scoped by the actor's place in the
  hierarchy.

Most endpoints require **JWT Bearer authentication**.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::seed_super_admin,

        crate::api::users::create,
        crate::api::users::me,
        crate::api::users::team,
        crate::api::users::deactivate,
        crate::api::users::activate,

        crate::api::attendance::start,
        crate::api::attendance::end,
        crate::api::attendance::list_mine,
        crate::api::attendance::list_team,

        crate::api::leave::apply,
        crate::api::leave::cancel,
        crate::api::leave::approve,
        crate::api::leave::reject,
        crate::api::leave::list_mine,
        crate::api::leave::list_team,

        crate::api::holiday::add,
        crate::api::holiday::list,
        crate::api::holiday::upcoming,
    ),
    components(schemas(
        LoginRequest,
        RefreshRequest,
        SeedRequest,
        CreateUser,
        UserResponse,
        Role,
        AttendancePhoto,
        AttendanceRecord,
        AttendanceStatus,
        ApplyLeave,
        RejectLeave,
        LeaveRequest,
        LeaveStatus,
        LeaveType,
        CreateHoliday,
        Holiday,
        HolidayType,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login, refresh, bootstrap"),
        (name = "Users", description = "Hierarchy management"),
        (name = "Attendance", description = "Daily check-in/check-out"),
        (name = "Leave", description = "Leave request lifecycle"),
        (name = "Holiday", description = "Designated non-working dates"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
