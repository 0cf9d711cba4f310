use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::core::leave::{self, LeaveDecision};
use crate::core::scope;
use crate::model::leave::{LeaveRequest, LeaveType};

#[derive(Deserialize, ToSchema)]
pub struct ApplyLeave {
    #[schema(example = "Family function")]
    pub reason: String,
    #[schema(example = "2025-03-10", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2025-03-12", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    #[schema(example = "CASUAL")]
    pub leave_type: LeaveType,
}

#[derive(Deserialize, ToSchema)]
pub struct RejectLeave {
    #[schema(example = "Short staffed that week")]
    pub remarks: Option<String>,
}

/// Apply for leave. Ranges overlapping a holiday are rejected; holidays are
/// absorbed automatically and should not be requested.
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body = ApplyLeave,
    responses(
        (status = 201, description = "Leave applied", body = LeaveRequest),
        (status = 400, description = "Missing fields, bad range, or holiday overlap")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn apply(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<ApplyLeave>,
) -> actix_web::Result<impl Responder> {
    let leave = leave::apply(
        pool.get_ref(),
        auth.user_id,
        &payload.reason,
        payload.from_date,
        payload.to_date,
        payload.leave_type,
    )
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Leave applied successfully",
        "data": leave,
    })))
}

/// Cancel an own, still-pending leave request.
#[utoipa::path(
    put,
    path = "/api/leave/{id}/cancel",
    params(("id" = i64, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave cancelled", body = LeaveRequest),
        (status = 400, description = "Not pending anymore"),
        (status = 404, description = "No such leave owned by the actor")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn cancel(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let leave = leave::cancel(pool.get_ref(), path.into_inner(), auth.user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave cancelled successfully",
        "data": leave,
    })))
}

/// Approve a pending request (direct superior only).
#[utoipa::path(
    put,
    path = "/api/leave/{id}/approve",
    params(("id" = i64, Path, description = "Leave request id")),
    responses(
        (status = 200, description = "Leave approved", body = LeaveRequest),
        (status = 400, description = "Already processed"),
        (status = 403, description = "Not the requester's superior"),
        (status = 404, description = "Leave not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let leave = leave::decide(
        pool.get_ref(),
        path.into_inner(),
        auth.user_id,
        LeaveDecision::Approve,
        None,
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave approved",
        "data": leave,
    })))
}

/// Reject a pending request (direct superior only).
#[utoipa::path(
    put,
    path = "/api/leave/{id}/reject",
    params(("id" = i64, Path, description = "Leave request id")),
    request_body = RejectLeave,
    responses(
        (status = 200, description = "Leave rejected", body = LeaveRequest),
        (status = 400, description = "Already processed"),
        (status = 403, description = "Not the requester's superior"),
        (status = 404, description = "Leave not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn reject(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<RejectLeave>,
) -> actix_web::Result<impl Responder> {
    let leave = leave::decide(
        pool.get_ref(),
        path.into_inner(),
        auth.user_id,
        LeaveDecision::Reject,
        payload.remarks.clone(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave rejected",
        "data": leave,
    })))
}

/// The actor's own leave history, newest first.
#[utoipa::path(
    get,
    path = "/api/leave",
    responses((status = 200, description = "Leave history", body = [LeaveRequest])),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn list_mine(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> actix_web::Result<impl Responder> {
    let leaves = leave::list_for_user(pool.get_ref(), auth.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "data": leaves })))
}

/// Leave requests of the actor's team, filtered by visibility scope.
/// Deactivated subordinates stay visible here so pending history remains
/// reachable.
#[utoipa::path(
    get,
    path = "/api/leave/team",
    responses((status = 200, description = "Scoped leave requests", body = [LeaveRequest])),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn list_team(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> actix_web::Result<impl Responder> {
    let visible = scope::resolve(pool.get_ref(), auth.user_id, auth.role, false).await?;
    let leaves = leave::list_team(pool.get_ref(), &visible).await?;

    Ok(HttpResponse::Ok().json(json!({ "data": leaves })))
}
