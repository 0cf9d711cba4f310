use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::auth::password::hash_password;
use crate::core::{hierarchy, scope};
use crate::error::ApiError;
use crate::model::role::Role;
use crate::model::user::UserResponse;

#[derive(Deserialize, ToSchema)]
pub struct CreateUser {
    #[schema(example = "jdoe")]
    pub user_name: String,
    #[schema(example = "jdoe@company.com")]
    pub email: String,
    pub password: String,
    #[schema(example = "Engineering")]
    pub department: Option<String>,
    pub phone_number: Option<String>,
    /// Starting leave balance.
    #[serde(default)]
    #[schema(example = 12)]
    pub leave_balance: i64,
}

/// Create the next role down the chain: SuperAdmin creates HR, HR creates
/// Managers, Manager creates Employees. The actor becomes the superior.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Missing fields"),
        (status = 403, description = "Employees cannot create users"),
        (status = 409, description = "Username or email already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn create(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateUser>,
) -> actix_web::Result<impl Responder> {
    let role = auth
        .role
        .creates()
        .ok_or_else(|| ApiError::forbidden("Not allowed"))?;

    if payload.user_name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(ApiError::validation("Enter the fields").into());
    }

    // Superior-pointer invariant holds by construction, but keep the write
    // guarded so a re-assignment path cannot sneak a mismatched parent in.
    hierarchy::check_superior(pool.get_ref(), role, Some(auth.user_id)).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO users
            (user_name, email, password, role, department, phone_number, leave_balance, superior_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.user_name.trim())
    .bind(payload.email.trim())
    .bind(hash_password(&payload.password))
    .bind(role)
    .bind(&payload.department)
    .bind(&payload.phone_number)
    .bind(payload.leave_balance)
    .bind(auth.user_id)
    .execute(pool.get_ref())
    .await;

    let id = match result {
        Ok(done) => done.last_insert_rowid(),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(ApiError::conflict("User already exists with this email or username").into());
        }
        Err(e) => return Err(ApiError::from(e).into()),
    };

    let user = hierarchy::fetch_user(pool.get_ref(), id).await?;

    info!(user_id = id, role = %role, created_by = auth.user_id, "user created");

    Ok(HttpResponse::Created().json(json!({
        "message": "Successfully created",
        "data": UserResponse::from(user),
    })))
}

/// The actor's own profile.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses((status = 200, description = "Profile", body = UserResponse)),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn me(auth: AuthUser, pool: web::Data<SqlitePool>) -> actix_web::Result<impl Responder> {
    let user = hierarchy::fetch_user(pool.get_ref(), auth.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "data": UserResponse::from(user) })))
}

/// Direct reports of the actor (Managers for HR, Employees for a Manager).
#[utoipa::path(
    get,
    path = "/api/users/team",
    responses((status = 200, description = "Direct reports", body = [UserResponse])),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn team(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> actix_web::Result<impl Responder> {
    let visible = scope::resolve(pool.get_ref(), auth.user_id, auth.role, false).await?;

    let users: Vec<UserResponse> = hierarchy::fetch_users_in_scope(pool.get_ref(), &visible)
        .await?
        .into_iter()
        .filter(|user| user.id != auth.user_id)
        .map(UserResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(json!({ "data": users })))
}

async fn set_active(
    auth: &AuthUser,
    pool: &SqlitePool,
    target_id: i64,
    active: bool,
) -> Result<(), ApiError> {
    let target = hierarchy::fetch_user(pool, target_id).await?;

    // Soft flag flip only, and only one level down; history stays valid.
    let allowed = auth.role == Role::SuperAdmin || target.superior_id == Some(auth.user_id);
    if !allowed {
        return Err(ApiError::not_found("User not found"));
    }

    sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
        .bind(active)
        .bind(target_id)
        .execute(pool)
        .await?;

    info!(target_id, active, by = auth.user_id, "user active flag changed");
    Ok(())
}

/// Deactivate a direct report (soft delete).
#[utoipa::path(
    put,
    path = "/api/users/{id}/deactivate",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deactivated"),
        (status = 404, description = "Not found or not a direct report")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn deactivate(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    set_active(&auth, pool.get_ref(), path.into_inner(), false).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "User deactivated" })))
}

/// Reactivate a previously deactivated direct report.
#[utoipa::path(
    put,
    path = "/api/users/{id}/activate",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User activated"),
        (status = 404, description = "Not found or not a direct report")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn activate(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    set_active(&auth, pool.get_ref(), path.into_inner(), true).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "User activated" })))
}
