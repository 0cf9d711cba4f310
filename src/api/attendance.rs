use actix_web::{web, HttpResponse, Responder};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::core::{attendance, scope};
use crate::model::attendance::AttendanceRecord;

#[derive(Deserialize, ToSchema)]
pub struct AttendancePhoto {
    /// Already-uploaded proof photo; the engine never performs the upload.
    #[schema(example = "https://cdn.example.com/checkin/7.jpg")]
    pub photo_url: String,
    /// Defaults to today.
    #[schema(example = "2025-03-10", format = "date", value_type = Option<String>)]
    pub date: Option<NaiveDate>,
}

#[derive(Deserialize, IntoParams)]
pub struct TeamAttendanceFilter {
    /// Restrict to a single day.
    pub date: Option<NaiveDate>,
    /// Inclusive start of a date range, for monthly reports.
    pub from: Option<NaiveDate>,
    /// Inclusive end of a date range.
    pub to: Option<NaiveDate>,
    /// Restrict to a single subject; ids outside the actor's scope yield an
    /// empty list.
    pub subject_id: Option<i64>,
}

/// Open today's attendance with a check-in photo.
#[utoipa::path(
    post,
    path = "/api/attendance/start",
    request_body = AttendancePhoto,
    responses(
        (status = 201, description = "Attendance started", body = AttendanceRecord),
        (status = 400, description = "Start photo missing"),
        (status = 403, description = "Public holiday"),
        (status = 409, description = "Already started")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn start(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<AttendancePhoto>,
) -> actix_web::Result<impl Responder> {
    let date = payload.date.unwrap_or_else(|| Utc::now().date_naive());
    let record = attendance::start(pool.get_ref(), auth.user_id, date, &payload.photo_url).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Attendance started",
        "data": record,
    })))
}

/// Close today's attendance with a check-out photo. A short day is closed as
/// Incomplete and the response says how many hours were missing.
#[utoipa::path(
    post,
    path = "/api/attendance/end",
    request_body = AttendancePhoto,
    responses(
        (status = 200, description = "Attendance ended", body = AttendanceRecord),
        (status = 400, description = "Photo missing or attendance not started"),
        (status = 409, description = "Already ended")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn end(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    payload: web::Json<AttendancePhoto>,
) -> actix_web::Result<impl Responder> {
    let date = payload.date.unwrap_or_else(|| Utc::now().date_naive());
    let outcome = attendance::end(
        pool.get_ref(),
        auth.user_id,
        date,
        &payload.photo_url,
        config.required_hours,
    )
    .await?;

    let message = outcome
        .message
        .unwrap_or_else(|| "Attendance completed".to_string());

    Ok(HttpResponse::Ok().json(json!({
        "message": message,
        "data": outcome.record,
    })))
}

/// The actor's own attendance history, newest first.
#[utoipa::path(
    get,
    path = "/api/attendance",
    responses((status = 200, description = "Attendance history", body = [AttendanceRecord])),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_mine(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> actix_web::Result<impl Responder> {
    let records = attendance::list_for_user(pool.get_ref(), auth.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "data": records })))
}

/// Attendance of the actor's team, filtered by visibility scope.
#[utoipa::path(
    get,
    path = "/api/attendance/team",
    params(TeamAttendanceFilter),
    responses((status = 200, description = "Scoped attendance records", body = [AttendanceRecord])),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_team(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    query: web::Query<TeamAttendanceFilter>,
) -> actix_web::Result<impl Responder> {
    let visible = scope::resolve(pool.get_ref(), auth.user_id, auth.role, true).await?;
    let filter = attendance::AttendanceFilter {
        date: query.date,
        from: query.from,
        to: query.to,
        subject_id: query.subject_id,
    };
    let records = attendance::list_team(pool.get_ref(), &visible, &filter).await?;

    Ok(HttpResponse::Ok().json(json!({
        "count": records.len(),
        "data": records,
    })))
}
