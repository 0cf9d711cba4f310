use actix_web::{web, HttpResponse, Responder};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::core::holiday;
use crate::model::holiday::{Holiday, HolidayType};

#[derive(Deserialize, ToSchema)]
pub struct CreateHoliday {
    #[schema(example = "Republic Day")]
    pub name: String,
    #[schema(example = "2025-01-26", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[serde(rename = "type", default = "default_kind")]
    #[schema(example = "PUBLIC")]
    pub kind: HolidayType,
}

fn default_kind() -> HolidayType {
    HolidayType::Public
}

#[derive(Deserialize, IntoParams)]
pub struct HolidayFilter {
    /// Filter by calendar year.
    pub year: Option<i32>,
}

/// Designate a non-working date (HR/SuperAdmin only).
#[utoipa::path(
    post,
    path = "/api/holiday",
    request_body = CreateHoliday,
    responses(
        (status = 201, description = "Holiday added", body = Holiday),
        (status = 400, description = "Name missing"),
        (status = 403, description = "HR/SuperAdmin only"),
        (status = 409, description = "Holiday already exists for this date")
    ),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn add(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateHoliday>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_super()?;

    let holiday = holiday::add_holiday(
        pool.get_ref(),
        &payload.name,
        payload.date,
        payload.kind,
        auth.user_id,
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Public holiday added successfully",
        "data": holiday,
    })))
}

/// All designated holidays, optionally restricted to a year.
#[utoipa::path(
    get,
    path = "/api/holiday",
    params(HolidayFilter),
    responses((status = 200, description = "Holidays, ascending by date", body = [Holiday])),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn list(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
    query: web::Query<HolidayFilter>,
) -> actix_web::Result<impl Responder> {
    let holidays = holiday::list(pool.get_ref(), query.year).await?;
    Ok(HttpResponse::Ok().json(json!({ "data": holidays })))
}

/// Holidays from today on, ascending.
#[utoipa::path(
    get,
    path = "/api/holiday/upcoming",
    responses((status = 200, description = "Upcoming holidays", body = [Holiday])),
    security(("bearer_auth" = [])),
    tag = "Holiday"
)]
pub async fn upcoming(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> actix_web::Result<impl Responder> {
    let holidays = holiday::list_upcoming(pool.get_ref(), Utc::now().date_naive()).await?;
    Ok(HttpResponse::Ok().json(json!({ "data": holidays })))
}
