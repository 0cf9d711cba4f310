use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::auth::jwt::{generate_token, verify_token, TokenType};
use crate::auth::password::{hash_password, verify_password};
use crate::config::Config;
use crate::error::ApiError;
use crate::model::role::Role;
use crate::model::user::{User, UserResponse};

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jdoe@company.com")]
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SeedRequest {
    #[schema(example = "root")]
    pub user_name: String,
    #[schema(example = "root@company.com")]
    pub email: String,
    pub password: String,
}

/// Login with email + password; returns access and refresh tokens.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful"),
        (status = 400, description = "Unknown user or wrong password"),
        (status = 403, description = "Account deactivated")
    ),
    tag = "Auth"
)]
pub async fn login(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    payload: web::Json<LoginRequest>,
) -> actix_web::Result<impl Responder> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Enter all fields").into());
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(payload.email.trim())
        .fetch_optional(pool.get_ref())
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::validation("User not found"))?;

    if !user.is_active {
        return Err(ApiError::forbidden("Account is deactivated").into());
    }

    if verify_password(&payload.password, &user.password).is_err() {
        warn!(email = %payload.email, "failed login attempt");
        return Err(ApiError::validation("Password incorrect").into());
    }

    let access_token = generate_token(
        user.id,
        user.user_name.clone(),
        user.role,
        TokenType::Access,
        &config.jwt_secret,
        config.access_token_ttl,
    );
    let refresh_token = generate_token(
        user.id,
        user.user_name.clone(),
        user.role,
        TokenType::Refresh,
        &config.jwt_secret,
        config.refresh_token_ttl,
    );

    info!(user_id = user.id, role = %user.role, "login successful");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "access_token": access_token,
        "refresh_token": refresh_token,
        "data": UserResponse::from(user),
    })))
}

/// Exchange a refresh token for a new access token.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token issued"),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "Auth"
)]
pub async fn refresh_token(
    config: web::Data<Config>,
    payload: web::Json<RefreshRequest>,
) -> actix_web::Result<impl Responder> {
    let claims = verify_token(&payload.refresh_token, &config.jwt_secret)
        .map_err(|_| actix_web::error::ErrorUnauthorized("Invalid or expired token"))?;

    if claims.token_type != TokenType::Refresh {
        return Err(actix_web::error::ErrorUnauthorized("Refresh token required"));
    }

    let access_token = generate_token(
        claims.user_id,
        claims.sub,
        claims.role,
        TokenType::Access,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    Ok(HttpResponse::Ok().json(json!({ "access_token": access_token })))
}

/// One-shot bootstrap of the root SuperAdmin. Fails once one exists; every
/// other account is created down the chain via `POST /users`.
#[utoipa::path(
    post,
    path = "/auth/seed",
    request_body = SeedRequest,
    responses(
        (status = 201, description = "SuperAdmin created"),
        (status = 409, description = "SuperAdmin already exists")
    ),
    tag = "Auth"
)]
pub async fn seed_super_admin(
    pool: web::Data<SqlitePool>,
    payload: web::Json<SeedRequest>,
) -> actix_web::Result<impl Responder> {
    if payload.user_name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(ApiError::validation("Enter the fields").into());
    }

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT 1 FROM users WHERE role = 'SuperAdmin' LIMIT 1",
    )
    .fetch_optional(pool.get_ref())
    .await
    .map_err(ApiError::from)?;

    if existing.is_some() {
        return Err(ApiError::conflict("SuperAdmin already exists").into());
    }

    let done = sqlx::query(
        "INSERT INTO users (user_name, email, password, role) VALUES (?, ?, ?, ?)",
    )
    .bind(payload.user_name.trim())
    .bind(payload.email.trim())
    .bind(hash_password(&payload.password))
    .bind(Role::SuperAdmin)
    .execute(pool.get_ref())
    .await
    .map_err(ApiError::from)?;

    info!(user_id = done.last_insert_rowid(), "SuperAdmin seeded");

    Ok(HttpResponse::Created().json(json!({
        "message": "SuperAdmin created successfully",
        "id": done.last_insert_rowid(),
    })))
}
